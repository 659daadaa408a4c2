#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use similar::TextDiff;

use crate::{
    analyzer::ConflictReport, artifact::ArtifactIdentity, constants::LOCK_FILE_HEADER,
    error::LockError,
};

/// Renders the canonical lock file for every configuration's findings.
///
/// Returns `None` when no configuration has a differing conflict, meaning the
/// lock file should not exist. All ordering of the output is decided here:
/// sections by configuration name, artifacts and class names
/// lexicographically, and groups by their rendered artifact line.
pub fn render(results: &BTreeMap<String, Option<ConflictReport>>) -> Option<String> {
    let mut out = String::new();

    for (configuration, report) in results {
        let Some(report) = report else {
            continue;
        };
        if report.groups.is_empty() {
            continue;
        }

        out.push_str(&format!("## {configuration}\n"));
        let groups = report
            .groups
            .iter()
            .map(|group| {
                let artifacts = group
                    .artifacts
                    .iter()
                    .map(ArtifactIdentity::module_key)
                    .sorted()
                    .dedup()
                    .join(", ");
                let classes = group
                    .class_names
                    .iter()
                    .sorted()
                    .dedup()
                    .map(|class_name| format!("  - {class_name}\n"))
                    .join("");
                (format!("[{artifacts}]\n"), classes)
            })
            .sorted();

        for (artifacts, classes) in groups {
            out.push_str(&artifacts);
            out.push_str(&classes);
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(format!("{LOCK_FILE_HEADER}\n{out}"))
    }
}

/// How to treat a lock file that disagrees with the current findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Fail on any disagreement.
    Check,
    /// Rewrite or delete the lock file to match.
    Write,
}

/// How the on-disk lock file relates to the canonical contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// There is no lock file, but there should be one.
    Absent,
    /// The lock file (or its absence) matches exactly.
    Current,
    /// The lock file exists and does not match, or should not exist.
    Stale,
}

impl LockState {
    /// Compares on-disk contents against the canonical contents. `None`
    /// stands for "no file" on either side.
    pub fn classify(existing: Option<&str>, expected: Option<&str>) -> Self {
        match (existing, expected) {
            (existing, expected) if existing == expected => LockState::Current,
            (None, Some(_)) => LockState::Absent,
            _ => LockState::Stale,
        }
    }
}

/// What reconciling a lock file did, or would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockAction {
    /// Nothing to change.
    Unchanged,
    /// Write these contents.
    Write(String),
    /// Delete the file.
    Delete,
}

/// Decides what to do with a lock file. Pure: no file system access.
///
/// * `path`: lock file location, used in error messages
/// * `existing`: current contents, `None` if the file does not exist
/// * `expected`: canonical contents, `None` if the file should not exist
pub fn plan(
    mode: LockMode,
    path: &Path,
    existing: Option<&str>,
    expected: Option<&str>,
) -> Result<LockAction, LockError> {
    let state = LockState::classify(existing, expected);
    match (mode, state, expected) {
        (LockMode::Check, LockState::Current, _) => Ok(LockAction::Unchanged),
        (LockMode::Check, LockState::Absent, expected) => Err(LockError::Missing {
            path:     path.to_path_buf(),
            expected: expected.unwrap_or_default().to_string(),
        }),
        (LockMode::Check, LockState::Stale, None) => Err(LockError::Stale {
            path: path.to_path_buf(),
        }),
        (LockMode::Check, LockState::Stale, Some(expected)) => Err(LockError::OutOfDate {
            path: path.to_path_buf(),
            diff: unified_diff(path, existing.unwrap_or_default(), expected),
        }),
        (LockMode::Write, _, Some(expected)) => Ok(LockAction::Write(expected.to_string())),
        (LockMode::Write, LockState::Stale, None) => Ok(LockAction::Delete),
        (LockMode::Write, _, None) => Ok(LockAction::Unchanged),
    }
}

/// Unified diff turning `existing` into `expected`.
fn unified_diff(path: &Path, existing: &str, expected: &str) -> String {
    let current = path.display().to_string();
    TextDiff::from_lines(existing, expected)
        .unified_diff()
        .context_radius(3)
        .header(&current, "expected")
        .to_string()
}

/// A lock file on disk.
#[derive(Debug, Clone)]
pub struct LockFile {
    /// location of the file
    path: PathBuf,
}

impl LockFile {
    /// Points at the lock file at `path`; nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents, or `None` if the file does not exist.
    pub fn read(&self) -> Result<Option<String>, LockError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LockError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Brings the lock file in line with `expected` according to `mode`, and
    /// returns what was done.
    pub fn reconcile(
        &self,
        mode: LockMode,
        expected: Option<&str>,
    ) -> Result<LockAction, LockError> {
        let existing = self.read()?;
        let action = plan(mode, &self.path, existing.as_deref(), expected)?;
        let io_error = |source: std::io::Error| LockError::Io {
            path: self.path.clone(),
            source,
        };

        match &action {
            LockAction::Unchanged => {
                tracing::debug!("{} is up to date", self.path.display());
            }
            LockAction::Write(contents) => {
                fs::write(&self.path, contents).map_err(io_error)?;
                tracing::info!("Updated {}", self.path.display());
            }
            LockAction::Delete => {
                fs::remove_file(&self.path).map_err(io_error)?;
                tracing::info!("Deleted {}, no conflicts remain", self.path.display());
            }
        }

        Ok(action)
    }
}
