//! Error types for mod loading.
//!
//! Per-mod problems (an archive that won't mount, a broken manifest) are never
//! errors at this level: the loader logs them and moves on. Only a mods
//! directory that can't be created or listed stops startup.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while discovering mods.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The mods directory could not be created or listed.
    #[error("Mods directory is not accessible: {path}")]
    ModsDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
