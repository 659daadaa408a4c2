#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};
use zip::result::ZipError;

use crate::{
    archive::JarReader,
    error::{ArchiveError, DuplicateClassesError},
};

/// Strict check: every class name may come from one file only.
///
/// Unlike the lock file workflow there is no way to accept a duplicate, and
/// contents are never compared.
#[derive(Debug, Default)]
pub struct DuplicateClassReporter {
    /// every file each class name was seen in
    class_to_files: HashMap<String, BTreeSet<PathBuf>>,
}

/// One row of the summary table.
#[derive(Tabled)]
struct SummaryRow {
    /// the files sharing classes
    #[tabled(rename = "Files")]
    files:      String,
    /// how many class names they share
    #[tabled(rename = "Duplicate classes")]
    duplicates: usize,
}

impl DuplicateClassReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the class names of every file in `files`.
    pub fn scan<P: AsRef<Path>>(
        files: impl IntoIterator<Item = P>,
    ) -> Result<Self, ArchiveError> {
        let mut reporter = Self::new();
        for file in files {
            reporter.add_file(file.as_ref())?;
        }
        Ok(reporter)
    }

    /// Reads the class names of one jar. Returns `Ok(false)` when the file
    /// does not exist and was skipped.
    ///
    /// Files are recorded by their canonical path, so one jar reached through
    /// two spellings of its path is still a single file.
    pub fn add_file(&mut self, path: &Path) -> Result<bool, ArchiveError> {
        let Some(reader) = JarReader::open(path)? else {
            return Ok(false);
        };
        let file = path.canonicalize().map_err(|e| ArchiveError::Open {
            path:   path.to_path_buf(),
            source: ZipError::Io(e),
        })?;

        for class_name in reader.class_names() {
            self.class_to_files
                .entry(class_name?)
                .or_default()
                .insert(file.clone());
        }
        Ok(true)
    }

    /// Class names found in more than one file, with those files.
    pub fn duplicates(&self) -> BTreeMap<&str, &BTreeSet<PathBuf>> {
        self.class_to_files
            .iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(class_name, files)| (class_name.as_str(), files))
            .collect()
    }

    /// Duplicated class names grouped by the exact set of files sharing
    /// them, keyed and sorted by the set's `[a, b]` rendering.
    fn jar_sets(&self) -> BTreeMap<String, Vec<&str>> {
        let mut sets: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for (class_name, files) in self.duplicates() {
            let key = format!("[{}]", files.iter().map(|f| f.display()).join(", "));
            sets.entry(key).or_default().push(class_name);
        }
        sets
    }

    /// Fails with a full report if any class name is found in more than one
    /// file.
    pub fn report(&self) -> Result<(), DuplicateClassesError> {
        let duplicates = self.duplicates().len();
        if duplicates == 0 {
            return Ok(());
        }

        let sets = self.jar_sets();
        let mut report = format!(
            "{duplicates} identically named classes found in {} sets of files:\n",
            sets.len()
        );
        for (files, classes) in &sets {
            report.push('\n');
            report.push_str(files);
            report.push('\n');
            for class_name in classes {
                report.push_str(&format!("  - {class_name}\n"));
            }
        }

        let rows = sets
            .iter()
            .map(|(files, classes)| SummaryRow {
                files:      files.clone(),
                duplicates: classes.len(),
            })
            .collect_vec();
        report.push('\n');
        report.push_str(
            &Table::new(&rows)
                .with(Panel::header("Summary"))
                .with(Style::modern())
                .to_string(),
        );

        Err(DuplicateClassesError { report, duplicates })
    }
}
