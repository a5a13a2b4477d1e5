//! Resource path resolution.
//!
//! [`ModContext`] is built once at startup and handed by reference to whatever
//! loads resources. Its [`resolve`](ModContext::resolve) redirects a base
//! resource path to the winning mod override, falling back to the path itself.

use crate::error::Result;
use crate::loader::{LoadedMods, ModLoader, SkippedMod};
use crate::registry::OverrideRegistry;
use camino::Utf8Path;
use overmod_archive::{ModNamespace, MountError, MountedArchive};
use std::collections::BTreeMap;

/// Redirects resource paths through an [`OverrideRegistry`].
#[derive(Debug, Default, Clone)]
pub struct ResourceResolver {
    registry: OverrideRegistry,
}

impl ResourceResolver {
    pub fn new(registry: OverrideRegistry) -> Self {
        Self { registry }
    }

    /// The path to load in place of `path`.
    pub fn resolve(&self, path: &str) -> String {
        self.registry.resolve(path).to_string()
    }

    pub fn registry(&self) -> &OverrideRegistry {
        &self.registry
    }
}

/// Summary of a loaded mod, kept for reporting after its metadata has been
/// folded into the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModSummary {
    pub id: String,
    pub name: String,
    pub priority: i64,
    pub override_count: usize,
}

/// Loaded mod state for the lifetime of the process.
pub struct ModContext {
    resolver: ResourceResolver,
    mods: Vec<ModSummary>,
    mounts: BTreeMap<String, MountedArchive>,
    skipped: Vec<SkippedMod>,
}

impl ModContext {
    /// Discover mods in `mods_dir` and build the resolver.
    pub fn load(mods_dir: &Utf8Path) -> Result<Self> {
        let loaded = ModLoader::new(mods_dir).load()?;
        Ok(Self::from_loaded(loaded))
    }

    /// Build the context from the result of a discovery pass.
    pub fn from_loaded(loaded: LoadedMods) -> Self {
        let registry = OverrideRegistry::build(&loaded.mods);
        tracing::info!(
            "Override registry ready: {} path(s) from {} mod(s)",
            registry.len(),
            loaded.mods.len()
        );

        let mods = loaded
            .mods
            .into_iter()
            .map(|meta| ModSummary {
                override_count: meta.overrides.len(),
                id: meta.id,
                name: meta.name,
                priority: meta.priority,
            })
            .collect();

        let mounts = loaded
            .mounts
            .into_iter()
            .map(|mounted| (mounted.id, mounted.archive))
            .collect();

        Self {
            resolver: ResourceResolver::new(registry),
            mods,
            mounts,
            skipped: loaded.skipped,
        }
    }

    /// The path to load in place of `path`.
    pub fn resolve(&self, path: &str) -> String {
        self.resolver.resolve(path)
    }

    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &OverrideRegistry {
        self.resolver.registry()
    }

    /// Loaded mods, ascending by priority.
    pub fn mods(&self) -> &[ModSummary] {
        &self.mods
    }

    /// Candidates that were not loaded.
    pub fn skipped(&self) -> &[SkippedMod] {
        &self.skipped
    }

    /// Resolve `path` and read it from the mounted mod archive it points into.
    ///
    /// The first path segment selects the archive. Returns `Ok(None)` when no
    /// mounted archive holds the resolved path, leaving the caller to load it
    /// from the base application.
    pub fn read_resource(&mut self, path: &str) -> std::result::Result<Option<Vec<u8>>, MountError> {
        let resolved = self.resolver.resolve(path);
        let Some((mod_id, _)) = resolved.split_once('/') else {
            return Ok(None);
        };

        match self.mounts.get_mut(mod_id) {
            Some(archive) if archive.contains(&resolved) => archive.read(&resolved).map(Some),
            _ => Ok(None),
        }
    }
}
