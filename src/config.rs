#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use crate::constants::{
    LOCK_FILE_ENV, LOCK_FILE_NAME, MANIFEST_ENV, MANIFEST_FILE_NAME, ROOT_DIR_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the checks read their inputs and keep their lock file.
pub struct Settings {
    /// Root directory of the project.
    root_dir:  PathBuf,
    /// Class uniqueness lock file.
    lock_file: PathBuf,
    /// Resolved dependency manifest.
    manifest:  PathBuf,
}

impl Settings {
    /// Settings rooted at `root_dir` with the default file names.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::from_parts(root_dir.into(), None, None)
    }

    /// Construct settings from optional overrides.
    pub fn from_parts(
        root_dir: PathBuf,
        lock_file: Option<PathBuf>,
        manifest: Option<PathBuf>,
    ) -> Self {
        let lock_file = lock_file.unwrap_or_else(|| root_dir.join(LOCK_FILE_NAME));
        let manifest = manifest.unwrap_or_else(|| root_dir.join(MANIFEST_FILE_NAME));
        Self {
            root_dir,
            lock_file,
            manifest,
        }
    }

    /// Reads `BASELINE_ROOT_DIR`, `BASELINE_LOCK_FILE` and `BASELINE_MANIFEST`,
    /// falling back to the current directory and default file names.
    pub fn from_env() -> Self {
        let root_dir = read_path(ROOT_DIR_ENV).unwrap_or_else(|| PathBuf::from("."));
        Self::from_parts(root_dir, read_path(LOCK_FILE_ENV), read_path(MANIFEST_ENV))
    }

    /// Returns a copy with explicitly supplied overrides applied on top.
    pub fn with_overrides(
        self,
        root_dir: Option<PathBuf>,
        lock_file: Option<PathBuf>,
        manifest: Option<PathBuf>,
    ) -> Self {
        match root_dir {
            // A new root moves the defaults with it, unless they were
            // overridden in the environment.
            Some(root_dir) => {
                let lock_file = lock_file.or_else(|| read_path(LOCK_FILE_ENV));
                let manifest = manifest.or_else(|| read_path(MANIFEST_ENV));
                Self::from_parts(root_dir, lock_file, manifest)
            }
            None => Self {
                lock_file: lock_file.unwrap_or(self.lock_file),
                manifest: manifest.unwrap_or(self.manifest),
                ..self
            },
        }
    }

    /// Root directory of the project.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Class uniqueness lock file.
    pub fn lock_file(&self) -> &Path {
        &self.lock_file
    }

    /// Resolved dependency manifest.
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Reads a non-empty path from the environment.
fn read_path(env: &str) -> Option<PathBuf> {
    std::env::var(env)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Global storage for the process-wide settings.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<Settings>>>> = OnceLock::new();

/// Returns the mutex guarding the global settings slot.
fn slot() -> &'static Mutex<Option<Arc<Settings>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Installs `settings` as the process-wide settings, replacing any previous
/// value.
pub fn install(settings: Settings) -> Arc<Settings> {
    let settings = Arc::new(settings);
    let mut guard = slot().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(Arc::clone(&settings));
    settings
}

/// Returns the process-wide settings, reading the environment on first use.
pub fn get() -> Arc<Settings> {
    let mut guard = slot().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(guard.get_or_insert_with(|| Arc::new(Settings::from_env())))
}
