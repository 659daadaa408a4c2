//! # baseline
//!
//! Finds identically named classes across the jars of a resolved Java
//! dependency graph. Classes whose bytes differ between jars are conflicts;
//! accepted conflicts are recorded in a checked-in lock file so that new ones
//! fail the build while existing ones are tolerated.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Class uniqueness analysis over one configuration
pub mod analyzer;
/// Reading classes out of jar files
pub mod archive;
/// Maven coordinates and resolved artifacts
pub mod artifact;
/// Settings and their environment overrides
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// The strict duplicate class check
pub mod duplicates;
/// Error types
pub mod error;
/// Rendering and verifying the lock file
pub mod lock;
/// The resolved dependency manifest
pub mod manifest;
/// Utility functions for convenience
pub mod util;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use analyzer::{AnalysisResult, ClassUniquenessAnalyzer, ConfigurationSummary, ConflictReport};
use anyhow::{Context, Result};
use config::Settings;
use duplicates::DuplicateClassReporter;
use error::DuplicateClassesError;
use futures::future::try_join_all;
use itertools::Itertools;
use lock::{LockAction, LockFile, LockMode};
use manifest::Manifest;

/// Analyzes every configuration of `manifest`. Configurations share nothing,
/// so each runs on its own blocking task.
pub async fn analyze_configurations(
    manifest: &Manifest,
) -> Result<BTreeMap<String, AnalysisResult>> {
    manifest.validate()?;
    let handles = manifest
        .configurations()
        .iter()
        .map(|(name, artifacts)| {
            let name = name.clone();
            let artifacts = artifacts.clone();
            tokio::task::spawn_blocking(move || {
                let result = ClassUniquenessAnalyzer::analyze(&artifacts)
                    .with_context(|| format!("Could not analyze configuration `{name}`"))?;
                Ok::<_, anyhow::Error>((name, result))
            })
        });

    try_join_all(handles)
        .await
        .context("Analysis task panicked")?
        .into_iter()
        .collect()
}

/// Logs jar sets whose shared classes are all byte-identical. These never fail
/// a check.
fn log_identical_duplicates(configuration: &str, result: &AnalysisResult) {
    for group in result.identical_duplicate_groups() {
        let classes = result.identical_class_names(group);
        tracing::info!(
            "{configuration}: [{}] share {} identical classes",
            group.iter().join(", "),
            classes.len()
        );
    }
}

/// Runs the lock file workflow: analyze every configuration of the manifest
/// named by `settings`, then check or rewrite the lock file.
pub async fn check_class_uniqueness(settings: &Settings, mode: LockMode) -> Result<LockAction> {
    let manifest = Manifest::load(settings.manifest())?;
    let results = analyze_configurations(&manifest).await?;

    let reports: BTreeMap<String, Option<ConflictReport>> = results
        .iter()
        .map(|(name, result)| {
            log_identical_duplicates(name, result);
            (name.clone(), result.conflict_report())
        })
        .collect();
    let expected = lock::render(&reports);

    let action = LockFile::new(settings.lock_file()).reconcile(mode, expected.as_deref())?;
    Ok(action)
}

/// Runs the strict check over `files`; directories are searched for jars.
pub fn check_unique_class_names(files: &[PathBuf]) -> Result<()> {
    let jars = util::expand_jars(files)?;
    tracing::debug!("Checking {} jars for duplicate classes", jars.len());
    DuplicateClassReporter::scan(&jars)?.report()?;
    Ok(())
}

/// Runs the strict check over one configuration of the manifest.
pub fn check_configuration_class_names(manifest: &Manifest, configuration: &str) -> Result<()> {
    let jars = manifest
        .configuration(configuration)?
        .iter()
        .map(|artifact| artifact.path())
        .collect::<Vec<&Path>>();
    DuplicateClassReporter::scan(jars)?.report()?;
    Ok(())
}

/// Runs the strict check over `configuration`, or over every configuration
/// of the manifest when none is named. Failures of all configurations are
/// collected into one report, each under a `## <configuration>` heading.
pub fn check_all_configuration_class_names(
    manifest: &Manifest,
    configuration: Option<&str>,
) -> Result<()> {
    let configurations = match configuration {
        Some(name) => vec![name],
        None => manifest.configurations().keys().map(String::as_str).collect(),
    };

    let mut failures = Vec::new();
    for name in configurations {
        match check_configuration_class_names(manifest, name) {
            Ok(()) => {}
            Err(e) if e.is::<DuplicateClassesError>() => failures.push(format!("## {name}\n{e}")),
            Err(e) => return Err(e),
        }
    }

    if !failures.is_empty() {
        anyhow::bail!("{}", failures.join("\n"));
    }
    Ok(())
}

/// Sorted, serializable findings for every configuration.
pub fn describe(
    results: &BTreeMap<String, AnalysisResult>,
) -> BTreeMap<String, ConfigurationSummary> {
    results
        .iter()
        .map(|(name, result)| (name.clone(), result.summary()))
        .collect()
}
