//! Mod discovery and resource override resolution.
//!
//! At startup the [`ModLoader`] scans a mods directory, mounts every `.pak`
//! archive and parses its manifest. The resulting mods, ordered by priority,
//! feed an [`OverrideRegistry`] that maps each original resource path to the
//! overrides declared for it. A [`ModContext`] bundles the registry with the
//! mounted archives and is passed to whatever loads resources.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use overmod_overlay::ModContext;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ModContext::load(Utf8Path::new("user/mods"))?;
//!
//! // Highest-priority override, or the path unchanged.
//! let path = ctx.resolve("scenes/tree.tscn");
//! println!("loading {}", path);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;
pub mod registry;
pub mod resolver;

pub use error::{LoaderError, Result};
pub use loader::{discover_mods, LoadedMods, ModLoader, MountedMod, SkippedMod};
pub use registry::{OverrideEntry, OverrideRegistry};
pub use resolver::{ModContext, ModSummary, ResourceResolver};
