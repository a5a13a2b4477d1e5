use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort a packing run.
///
/// Every variant leaves nothing behind at the requested output path.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(Utf8PathBuf),

    #[error("Failed to open archive for writing: {path}")]
    OpenFailed {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write archive entry '{entry}'")]
    WriteFailed {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to finalize archive: {path}")]
    FlushFailed {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while mounting or reading a mod archive.
#[derive(Error, Debug)]
pub enum MountError {
    #[error("Cannot mount archive: {path}")]
    CannotMount {
        path: Utf8PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Failed to read entry '{entry}'")]
    Read {
        entry: String,
        #[source]
        source: io::Error,
    },
}
