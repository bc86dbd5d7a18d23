//! Drift detection for generated units
//!
//! Regenerated units are compared with the files on disk. A file differs
//! either because the declarations changed (stale) or because someone edited
//! generated code by hand (the recorded fingerprint no longer matches).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use walkdir::WalkDir;

use crate::checksum::Fingerprint;
use crate::codegen::GeneratedOutput;
use crate::error::{ForgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum DriftStatus {
    UpToDate,
    /// Expected file does not exist
    Missing,
    /// File differs from regenerated output
    Stale {
        added: usize,
        removed: usize,
        /// Fingerprint in the file no longer matches its own body
        hand_edited: bool,
        diff: String,
    },
    /// Generated file for a module that no longer has schemas
    Orphaned,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriftEntry {
    pub file: PathBuf,
    #[serde(flatten)]
    pub status: DriftStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DriftReport {
    pub entries: Vec<DriftEntry>,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        self.entries.iter().any(|e| e.status != DriftStatus::UpToDate)
    }

    pub fn drifted(&self) -> impl Iterator<Item = &DriftEntry> {
        self.entries.iter().filter(|e| e.status != DriftStatus::UpToDate)
    }

    /// `Err(Drift)` naming the first drifted file
    pub fn into_result(self) -> Result<Self> {
        let first = self.drifted().next().map(|e| e.file.clone());
        match first {
            Some(file) => Err(ForgeError::Drift { file }),
            None => Ok(self),
        }
    }
}

/// Compare regenerated output with the unit files in `dir`
pub fn verify(output: &GeneratedOutput, dir: &Path) -> Result<DriftReport> {
    let mut report = DriftReport::default();
    let mut expected = HashSet::new();

    for unit in &output.units {
        let file = dir.join(&unit.file_name);
        expected.insert(unit.file_name.clone());

        let status = if !file.exists() {
            DriftStatus::Missing
        } else {
            let on_disk = fs::read_to_string(&file)?;
            compare(&on_disk, &unit.code, &unit.file_name)
        };
        report.entries.push(DriftEntry { file, status });
    }

    if dir.is_dir() {
        let mut orphans: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|n| n.ends_with(".domain.rs") && !expected.contains(n))
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .collect();
        orphans.sort();
        report.entries.extend(orphans.into_iter().map(|file| DriftEntry {
            file,
            status: DriftStatus::Orphaned,
        }));
    }

    Ok(report)
}

fn compare(on_disk: &str, regenerated: &str, name: &str) -> DriftStatus {
    if on_disk == regenerated {
        return DriftStatus::UpToDate;
    }

    let hand_edited = Fingerprint::read_header(on_disk)
        .map(|(recorded, body)| !recorded.verify(body))
        .unwrap_or(false);

    let diff = TextDiff::from_lines(on_disk, regenerated);
    let mut added = 0;
    let mut removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }

    DriftStatus::Stale {
        added,
        removed,
        hand_edited,
        diff: diff
            .unified_diff()
            .header(&format!("{} (on disk)", name), &format!("{} (regenerated)", name))
            .to_string(),
    }
}
