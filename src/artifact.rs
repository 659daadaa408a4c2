#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Identifies one resolved dependency by its maven coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactIdentity {
    /// maven group, eg. `com.google.guava`
    group:   String,
    /// artifact name, eg. `guava`
    name:    String,
    /// resolved version
    version: String,
}

impl ArtifactIdentity {
    /// Creates a new identity from its coordinates.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group:   group.into(),
            name:    name.into(),
            version: version.into(),
        }
    }

    /// The maven group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The artifact name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `group:name`, the version-less key used in lock files.
    pub fn module_key(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }
}

impl Display for ArtifactIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// A resolved dependency paired with the jar backing it. The file may not
/// exist on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    /// coordinates of the dependency
    #[serde(flatten)]
    identity: ArtifactIdentity,
    /// path to the jar
    path:     PathBuf,
}

impl ResolvedArtifact {
    /// Pairs an identity with its jar.
    pub fn new(identity: ArtifactIdentity, path: impl Into<PathBuf>) -> Self {
        Self {
            identity,
            path: path.into(),
        }
    }

    /// Coordinates of the dependency.
    pub fn identity(&self) -> &ArtifactIdentity {
        &self.identity
    }

    /// Path to the jar.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves a relative jar path against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.path.is_relative() {
            self.path = base.join(&self.path);
        }
        self
    }
}
