//! Mod archive packing and mounting.
//!
//! [`pack`] bundles a directory tree into a single `.pak` archive under a root
//! name. [`MountedArchive`] opens such an archive as a read-only
//! [`ModNamespace`] so the mod's manifest and resources can be read without
//! extracting them.

pub mod error;
mod mount;
mod packer;

pub use error::{MountError, PackError};
pub use mount::{MemoryNamespace, ModNamespace, MountedArchive};
pub use packer::{pack, pack_default, PackSummary};

/// File extension used for packed mod archives.
pub const ARCHIVE_EXTENSION: &str = "pak";
