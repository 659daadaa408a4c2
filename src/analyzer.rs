#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    archive::{ClassEntry, ContentHash, JarReader},
    artifact::{ArtifactIdentity, ResolvedArtifact},
    error::ArchiveError,
};

/// A set of artifacts that together contain an identically named class.
pub type JarSet = BTreeSet<ArtifactIdentity>;

/// Accumulates class names and content hashes across the jars of one resolved
/// configuration.
///
/// Feed it every artifact with [`ClassUniquenessAnalyzer::add_artifact`], then
/// call [`ClassUniquenessAnalyzer::finish`].
#[derive(Debug, Default)]
pub struct ClassUniquenessAnalyzer {
    /// every artifact each class name was seen in
    class_to_jars:   HashMap<String, HashSet<ArtifactIdentity>>,
    /// every distinct digest each class name was seen with
    class_to_hashes: HashMap<String, HashSet<ContentHash>>,
    /// number of jars actually read
    jars_read:       usize,
}

impl ClassUniquenessAnalyzer {
    /// Creates an empty analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes a whole configuration in one go.
    pub fn analyze<'a>(
        artifacts: impl IntoIterator<Item = &'a ResolvedArtifact>,
    ) -> Result<AnalysisResult, ArchiveError> {
        let mut analyzer = Self::new();
        for artifact in artifacts {
            analyzer.add_artifact(artifact)?;
        }
        Ok(analyzer.finish())
    }

    /// Reads every class of `artifact`.
    ///
    /// Returns `Ok(false)` when the jar does not exist and was skipped.
    pub fn add_artifact(&mut self, artifact: &ResolvedArtifact) -> Result<bool, ArchiveError> {
        let Some(reader) = JarReader::open(artifact.path())? else {
            return Ok(false);
        };

        let mut classes = 0usize;
        for entry in reader.classes() {
            let ClassEntry {
                class_name,
                content_hash,
            } = entry?;

            self.class_to_hashes
                .entry(class_name.clone())
                .or_default()
                .insert(content_hash);
            self.class_to_jars
                .entry(class_name)
                .or_default()
                .insert(artifact.identity().clone());
            classes += 1;
        }

        tracing::debug!("Read {classes} classes from {}", artifact.identity());
        self.jars_read += 1;
        Ok(true)
    }

    /// Builds the indexes. Class names seen in a single jar, or with a single
    /// digest, are dropped here.
    pub fn finish(self) -> AnalysisResult {
        let mut jars_to_classes: HashMap<JarSet, HashSet<String>> = HashMap::new();
        for (class_name, jars) in self.class_to_jars {
            if jars.len() < 2 {
                continue;
            }
            jars_to_classes
                .entry(jars.into_iter().collect())
                .or_default()
                .insert(class_name);
        }

        let class_to_hashes = self
            .class_to_hashes
            .into_iter()
            .filter(|(_, hashes)| hashes.len() >= 2)
            .collect();

        AnalysisResult {
            jars_to_classes,
            class_to_hashes,
            jars_read: self.jars_read,
        }
    }
}

/// Findings for one configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// jar sets mapped to the class names they all contain
    jars_to_classes: HashMap<JarSet, HashSet<String>>,
    /// class names seen with at least two distinct digests
    class_to_hashes: HashMap<String, HashSet<ContentHash>>,
    /// number of jars that were read
    jars_read:       usize,
}

impl AnalysisResult {
    /// Every jar set sharing at least one class name, whatever the contents.
    pub fn problem_groups(&self) -> impl Iterator<Item = &JarSet> {
        self.jars_to_classes.keys()
    }

    /// Class names shared by exactly `group`.
    pub fn shared_class_names(&self, group: &JarSet) -> Option<&HashSet<String>> {
        self.jars_to_classes.get(group)
    }

    /// Distinct digests observed for `class_name`, if it has more than one.
    pub fn class_hashes(&self, class_name: &str) -> Option<&HashSet<ContentHash>> {
        self.class_to_hashes.get(class_name)
    }

    /// Whether `class_name` has differing implementations.
    fn is_differing(&self, class_name: &str) -> bool {
        self.class_to_hashes.contains_key(class_name)
    }

    /// Jar sets sharing at least one identically named class whose contents
    /// differ.
    pub fn differing_conflict_groups(&self) -> impl Iterator<Item = &JarSet> {
        self.jars_to_classes
            .iter()
            .filter(|(_, classes)| classes.iter().any(|c| self.is_differing(c)))
            .map(|(group, _)| group)
    }

    /// Class names shared by exactly `group` whose contents differ.
    pub fn differing_class_names(&self, group: &JarSet) -> HashSet<&str> {
        self.jars_to_classes
            .get(group)
            .into_iter()
            .flatten()
            .filter(|c| self.is_differing(c))
            .map(String::as_str)
            .collect()
    }

    /// Jar sets whose shared classes are all byte-identical.
    pub fn identical_duplicate_groups(&self) -> impl Iterator<Item = &JarSet> {
        self.jars_to_classes
            .iter()
            .filter(|(_, classes)| !classes.iter().any(|c| self.is_differing(c)))
            .map(|(group, _)| group)
    }

    /// Class names shared by exactly `group` whose contents are identical.
    pub fn identical_class_names(&self, group: &JarSet) -> HashSet<&str> {
        self.jars_to_classes
            .get(group)
            .into_iter()
            .flatten()
            .filter(|c| !self.is_differing(c))
            .map(String::as_str)
            .collect()
    }

    /// Whether any jar set shares a class with differing contents.
    pub fn has_differing_conflicts(&self) -> bool {
        self.differing_conflict_groups().next().is_some()
    }

    /// Number of jars that were read; missing files are not counted.
    pub fn jars_read(&self) -> usize {
        self.jars_read
    }

    /// The differing conflicts, in no particular order, or `None` when there
    /// are none.
    pub fn conflict_report(&self) -> Option<ConflictReport> {
        let groups: Vec<ConflictGroup> = self
            .differing_conflict_groups()
            .map(|group| ConflictGroup {
                artifacts:   group.iter().cloned().collect(),
                class_names: self
                    .differing_class_names(group)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        if groups.is_empty() {
            None
        } else {
            Some(ConflictReport { groups })
        }
    }

    /// A sorted, serializable view of this result.
    pub fn summary(&self) -> ConfigurationSummary {
        let group_summary = |group: &JarSet, classes: HashSet<&str>| GroupSummary {
            artifacts: group.iter().map(ToString::to_string).collect(),
            classes:   classes.into_iter().sorted().map(str::to_string).collect(),
        };

        let differing = self
            .differing_conflict_groups()
            .map(|group| group_summary(group, self.differing_class_names(group)))
            .sorted_by(|a, b| a.artifacts.cmp(&b.artifacts))
            .collect();
        let identical = self
            .identical_duplicate_groups()
            .map(|group| group_summary(group, self.identical_class_names(group)))
            .sorted_by(|a, b| a.artifacts.cmp(&b.artifacts))
            .collect();
        let hashes: BTreeMap<String, Vec<ContentHash>> = self
            .class_to_hashes
            .iter()
            .map(|(name, hashes)| (name.clone(), hashes.iter().copied().sorted().collect_vec()))
            .collect();

        ConfigurationSummary {
            jars_read: self.jars_read,
            differing,
            identical,
            hashes,
        }
    }
}

/// The differing conflicts of one configuration, as rendered into the lock
/// file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    /// one entry per differing jar set
    pub groups: Vec<ConflictGroup>,
}

/// A differing jar set and the class names that differ within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictGroup {
    /// the jars sharing the classes
    pub artifacts:   Vec<ArtifactIdentity>,
    /// the shared classes with differing contents
    pub class_names: Vec<String>,
}

/// Serializable findings for one configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationSummary {
    /// number of jars read
    pub jars_read: usize,
    /// jar sets sharing classes with differing contents
    pub differing: Vec<GroupSummary>,
    /// jar sets whose shared classes are all identical
    pub identical: Vec<GroupSummary>,
    /// digests of every class with differing contents
    pub hashes:    BTreeMap<String, Vec<ContentHash>>,
}

/// One jar set in a [`ConfigurationSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    /// `group:name:version` of each jar, sorted
    pub artifacts: Vec<String>,
    /// class names, sorted
    pub classes:   Vec<String>,
}
