#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{artifact::ResolvedArtifact, error::ManifestError};

/// Resolved dependency sets, one per named configuration (eg.
/// `runtimeClasspath`), as produced by the build tool.
///
/// ```json
/// {
///   "configurations": {
///     "runtimeClasspath": [
///       { "group": "com.x", "name": "a", "version": "1.0", "path": "libs/a-1.0.jar" }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// configuration name mapped to its resolved artifacts
    #[serde(default)]
    configurations: BTreeMap<String, Vec<ResolvedArtifact>>,
}

impl Manifest {
    /// Builds a manifest in memory.
    pub fn new(configurations: BTreeMap<String, Vec<ResolvedArtifact>>) -> Self {
        Self { configurations }
    }

    /// Reads a manifest from disk. Relative jar paths are resolved against
    /// the manifest's directory.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json(&contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.validate()?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(manifest.relative_to(base))
    }

    /// Parses a manifest from JSON, leaving paths as written.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Rejects a configuration that lists one `group:name` more than once.
    /// Lock files key jars by module without a version, so two versions of
    /// one module would collapse into a single entry.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (configuration, artifacts) in &self.configurations {
            let mut seen = HashSet::new();
            for artifact in artifacts {
                let module = artifact.identity().module_key();
                if !seen.insert(module.clone()) {
                    return Err(ManifestError::DuplicateModule {
                        configuration: configuration.clone(),
                        module,
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolves every relative jar path against `base`.
    pub fn relative_to(self, base: &Path) -> Self {
        let configurations = self
            .configurations
            .into_iter()
            .map(|(name, artifacts)| {
                let artifacts = artifacts
                    .into_iter()
                    .map(|artifact| artifact.relative_to(base))
                    .collect();
                (name, artifacts)
            })
            .collect();
        Self { configurations }
    }

    /// All configurations, sorted by name.
    pub fn configurations(&self) -> &BTreeMap<String, Vec<ResolvedArtifact>> {
        &self.configurations
    }

    /// The artifacts of one configuration.
    pub fn configuration(&self, name: &str) -> Result<&[ResolvedArtifact], ManifestError> {
        self.configurations
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ManifestError::UnknownConfiguration {
                name: name.to_string(),
            })
    }
}
