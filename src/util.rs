#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// A glob utility function to find paths to files with certain extension
///
/// * `extension`: the file extension to find paths for
/// * `root_dir`: the root directory where search starts, searched recursively
pub fn find_files(extension: &str, root_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root_dir.join("**").join(format!("*.{extension}"));
    let pattern = pattern
        .to_str()
        .context("Could not convert root_dir to string")?
        .to_string();

    let mut found: Vec<PathBuf> = glob(&pattern)
        .context("Could not create glob")?
        .filter_map(Result::ok)
        .collect();
    found.sort();
    Ok(found)
}

/// Replaces every directory in `paths` with the jars found beneath it, sorted.
/// Other paths are kept as given, whether or not they exist.
pub fn expand_jars(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut jars = Vec::new();
    for path in paths {
        if path.is_dir() {
            jars.extend(
                find_files("jar", path)
                    .with_context(|| format!("Could not search {} for jars", path.display()))?,
            );
        } else {
            jars.push(path.clone());
        }
    }
    Ok(jars)
}
