//! Domain objects whose constructors and mutators are generated at build time.
//!
//! Each module declares its structs and validation rules by hand; `build.rs`
//! compiles `schemas/*.json` and the generated items are included next to
//! the declarations they extend.

use domain_forge_runtime::{DomainError, DomainObject, DomainResult, RuleOutcome, Violation};

/// ISO 4217 style currency code.
///
/// Not generated: implements [`DomainObject`] by hand and is still treated as
/// a nested domain object by schemas that hold one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    code: String,
}

impl Currency {
    pub fn parse(code: &str) -> DomainResult<Self> {
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
            DomainResult::Success(Self {
                code: code.to_string(),
            })
        } else {
            DomainResult::Failure(vec![DomainError::root(format!(
                "{} is not a currency code",
                code
            ))])
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl DomainObject for Currency {
    fn to_result(self) -> DomainResult<Self> {
        DomainResult::Success(self)
    }
}

/// A value with a non-blank tag
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    tag: String,
    value: T,
}

impl<T> Tagged<T> {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    #[allow(clippy::ptr_arg)]
    fn tag_not_blank(tag: &String) -> RuleOutcome {
        if tag.trim().is_empty() {
            RuleOutcome::Violations(vec![Violation::Message("tag must not be blank".to_string())])
        } else {
            RuleOutcome::Valid
        }
    }
}

include!(concat!(env!("OUT_DIR"), "/crate.domain.rs"));

pub mod numbers {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PositiveInt {
        value: i32,
    }

    impl PositiveInt {
        pub fn value(&self) -> i32 {
            self.value
        }

        fn value_is_not_zero(value: &i32) -> Vec<&'static str> {
            if *value == 0 {
                vec!["Value is zero"]
            } else {
                Vec::new()
            }
        }

        fn value_is_not_negative(value: &i32) -> Vec<String> {
            if *value < 0 {
                vec![format!("Value {} is negative", value)]
            } else {
                Vec::new()
            }
        }
    }

    /// Whole percentage between 0 and 100
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Percent {
        value: i32,
    }

    impl Percent {
        pub fn value(&self) -> i32 {
            self.value
        }

        fn within_range(value: &i32) -> Option<Vec<String>> {
            if (0..=100).contains(value) {
                None
            } else {
                Some(vec!["must be between 0 and 100".to_string()])
            }
        }
    }

    include!(concat!(env!("OUT_DIR"), "/numbers.domain.rs"));
}

pub mod shapes {
    use domain_forge_runtime::DomainError;

    use crate::numbers::{Percent, PositiveInt};
    use crate::Currency;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Pair {
        a: i32,
        b: PositiveInt,
    }

    impl Pair {
        pub fn a(&self) -> i32 {
            self.a
        }

        pub fn b(&self) -> PositiveInt {
            self.b
        }

        fn a_less_than_b(a: &i32, b: &PositiveInt) -> Vec<String> {
            if *a < b.value() {
                Vec::new()
            } else {
                vec!["a must be less than b".to_string()]
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Grade {
        score: Percent,
    }

    impl Grade {
        pub fn score(&self) -> Percent {
            self.score
        }
    }

    /// Labelled, non-empty list of positive numbers
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Batch {
        items: Vec<PositiveInt>,
        label: String,
        revision: u32,
    }

    impl Batch {
        pub fn items(&self) -> &[PositiveInt] {
            &self.items
        }

        pub fn label(&self) -> &str {
            &self.label
        }

        pub fn revision(&self) -> u32 {
            self.revision
        }

        #[allow(clippy::ptr_arg)]
        fn enough_items(items: &Vec<PositiveInt>, revision: &u32) -> Vec<&'static str> {
            if items.is_empty() && *revision == 0 {
                vec!["at least one number is required"]
            } else {
                Vec::new()
            }
        }

        #[allow(clippy::ptr_arg)]
        fn label_is_short(label: &String) -> Vec<DomainError> {
            if label.len() > 16 {
                vec![DomainError::root("label is longer than 16 characters")]
            } else {
                Vec::new()
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Price {
        amount: PositiveInt,
        currency: Currency,
    }

    impl Price {
        pub fn amount(&self) -> PositiveInt {
            self.amount
        }

        pub fn currency(&self) -> &Currency {
            &self.currency
        }
    }

    include!(concat!(env!("OUT_DIR"), "/shapes.domain.rs"));
}
