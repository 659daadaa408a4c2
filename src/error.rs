#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use crate::constants::WRITE_LOCKS_COMMAND;

/// Failures while reading a jar. A broken archive is a broken build input, so
/// these always abort the run.
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    /// The file exists but is not a readable zip archive.
    #[error("Could not open archive {}", path.display())]
    Open {
        /// offending archive
        path:   PathBuf,
        /// underlying zip failure
        #[source]
        source: zip::result::ZipError,
    },
    /// An entry could not be read while streaming the archive.
    #[error("Could not read {entry} from archive {}", path.display())]
    Read {
        /// offending archive
        path:   PathBuf,
        /// name of the entry being read
        entry:  String,
        /// underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// The central directory could not be walked.
    #[error("Could not read entry #{index} of archive {}", path.display())]
    Entry {
        /// offending archive
        path:   PathBuf,
        /// index of the entry in the central directory
        index:  usize,
        /// underlying zip failure
        #[source]
        source: zip::result::ZipError,
    },
}

impl ArchiveError {
    /// The archive this error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ArchiveError::Open { path, .. }
            | ArchiveError::Read { path, .. }
            | ArchiveError::Entry { path, .. } => path,
        }
    }
}

/// Lock file policy violations and I/O failures.
#[derive(thiserror::Error, Debug)]
pub enum LockError {
    /// No conflicts were found, yet a lock file is present.
    #[error(
        "{} should not exist, no jars contain identically named classes with differing \
         contents. Run `{cmd}` to delete it.",
        path.display(),
        cmd = WRITE_LOCKS_COMMAND
    )]
    Stale {
        /// location of the stale lock file
        path: PathBuf,
    },
    /// Conflicts were found, but no lock file documents them.
    #[error(
        "Multiple jars contain identically named classes with differing contents. Please resolve \
         these problems, or run `{cmd}` to accept them in {}:\n\n{expected}",
        path.display(),
        cmd = WRITE_LOCKS_COMMAND
    )]
    Missing {
        /// location where the lock file was expected
        path:     PathBuf,
        /// canonical lock file contents
        expected: String,
    },
    /// The lock file disagrees with the current conflicts.
    #[error(
        "{} is out of date, please run `{cmd}` to update it. The diff is:\n\n{diff}",
        path.display(),
        cmd = WRITE_LOCKS_COMMAND
    )]
    OutOfDate {
        /// location of the lock file
        path: PathBuf,
        /// unified diff from the on-disk contents to the canonical contents
        diff: String,
    },
    /// Reading, writing or deleting the lock file failed.
    #[error("Could not access lock file {}", path.display())]
    Io {
        /// location of the lock file
        path:   PathBuf,
        /// underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Raised by the strict duplicate check; the message is the full report.
#[derive(thiserror::Error, Debug)]
#[error("{report}")]
pub struct DuplicateClassesError {
    /// rendered report listing every duplicated class and its jars
    pub report:     String,
    /// number of class names found in more than one file
    pub duplicates: usize,
}

/// Failures while loading the resolved dependency manifest.
#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("Could not read dependency manifest {}", path.display())]
    Read {
        /// manifest location
        path:   PathBuf,
        /// underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// The manifest is not valid JSON of the expected shape.
    #[error("Could not parse dependency manifest {}", path.display())]
    Parse {
        /// manifest location
        path:   PathBuf,
        /// underlying parse failure
        #[source]
        source: serde_json::Error,
    },
    /// A configuration lists two versions of the same module.
    #[error(
        "Configuration `{configuration}` lists module {module} more than once, each module may \
         appear at a single version"
    )]
    DuplicateModule {
        /// offending configuration
        configuration: String,
        /// `group:name` listed twice
        module:        String,
    },
    /// A requested configuration is not in the manifest.
    #[error("Configuration `{name}` is not present in the dependency manifest")]
    UnknownConfiguration {
        /// requested configuration name
        name: String,
    },
}
