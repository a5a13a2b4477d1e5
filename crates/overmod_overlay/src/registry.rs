//! Override registry.
//!
//! Maps each original resource path to every override declared for it, in
//! ascending priority order. The last candidate for a path is the one that
//! wins.

use overmod_manifest::ModMetadata;
use std::collections::BTreeMap;

/// One mod's override for one original path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    /// Display name of the mod that declared the override.
    pub mod_name: String,
    /// Priority of that mod.
    pub priority: i64,
    /// Replacement resource path.
    pub override_path: String,
    /// Position of the mod in the ordered mod list, used to break priority ties.
    pub discovery_index: usize,
}

/// Original path -> candidate overrides, sorted by `(priority, discovery_index)`.
///
/// Built once from the ordered mod list and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct OverrideRegistry {
    entries: BTreeMap<String, Vec<OverrideEntry>>,
}

impl OverrideRegistry {
    /// Build the registry from mods already sorted ascending by priority.
    ///
    /// Candidates for each path are collected across all mods, then each list
    /// is sorted once. When two mods share a priority, the one that comes later
    /// in `ordered_mods` wins.
    pub fn build(ordered_mods: &[ModMetadata]) -> Self {
        let mut entries: BTreeMap<String, Vec<OverrideEntry>> = BTreeMap::new();

        for (discovery_index, meta) in ordered_mods.iter().enumerate() {
            for (original, override_path) in &meta.overrides {
                entries
                    .entry(original.clone())
                    .or_default()
                    .push(OverrideEntry {
                        mod_name: meta.name.clone(),
                        priority: meta.priority,
                        override_path: override_path.clone(),
                        discovery_index,
                    });
            }
        }

        for candidates in entries.values_mut() {
            candidates.sort_by_key(|entry| (entry.priority, entry.discovery_index));
        }

        tracing::debug!("Registered overrides for {} path(s)", entries.len());

        Self { entries }
    }

    /// Return the winning override for `original`, or `original` itself when no
    /// mod overrides it.
    pub fn resolve<'a>(&'a self, original: &'a str) -> &'a str {
        match self.active(original) {
            Some(entry) => entry.override_path.as_str(),
            None => original,
        }
    }

    /// The winning candidate for `original`, if any.
    pub fn active(&self, original: &str) -> Option<&OverrideEntry> {
        self.entries.get(original).and_then(|list| list.last())
    }

    /// All candidates for `original`, lowest priority first.
    pub fn candidates(&self, original: &str) -> &[OverrideEntry] {
        self.entries
            .get(original)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Paths claimed by more than one mod, in path order.
    pub fn conflicts(&self) -> impl Iterator<Item = (&str, &[OverrideEntry])> {
        self.entries
            .iter()
            .filter(|(_, list)| list.len() > 1)
            .map(|(path, list)| (path.as_str(), list.as_slice()))
    }

    /// All overridden original paths, in path order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct overridden paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
