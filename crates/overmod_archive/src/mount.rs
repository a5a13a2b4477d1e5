//! Read-only access to packed mod archives.
//!
//! A mounted archive exposes its entries as a logical namespace of
//! `/`-separated paths, without extracting anything to disk.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};

use camino::{Utf8Path, Utf8PathBuf};
use zip::ZipArchive;

use crate::error::MountError;

/// Upper bound on the buffer reserved up front for an entry. The declared
/// size comes from the archive header and is not trusted beyond this.
const MAX_PREALLOCATION: u64 = 1 << 20;

fn initial_capacity(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOCATION) as usize
}

/// A readable namespace of logical file paths.
///
/// Implemented by [`MountedArchive`] for archives on disk and by
/// [`MemoryNamespace`] for content held in memory. Reads take `&mut self`
/// so archive-backed implementations can seek.
pub trait ModNamespace {
    /// Whether a file exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// Read the full contents of the file at `path`.
    fn read(&mut self, path: &str) -> Result<Vec<u8>, MountError>;

    /// All file paths in the namespace, sorted.
    fn entries(&self) -> Vec<String>;

    /// Read the file at `path` as UTF-8 text.
    fn read_to_string(&mut self, path: &str) -> Result<String, MountError> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| MountError::Read {
            entry: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }

    /// File paths located under the logical directory `prefix`.
    fn list_dir(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return self.entries();
        }

        self.entries()
            .into_iter()
            .filter(|entry| {
                entry
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
            })
            .collect()
    }
}

/// An archive file mounted as a [`ModNamespace`].
pub struct MountedArchive {
    path: Utf8PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl MountedArchive {
    /// Open the archive at `path`.
    pub fn mount(path: &Utf8Path) -> Result<Self, MountError> {
        let cannot_mount = |source: zip::result::ZipError| MountError::CannotMount {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path.as_std_path()).map_err(|e| cannot_mount(e.into()))?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(cannot_mount)?;

        tracing::debug!("Mounted {} ({} entries)", path, archive.len());

        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// The archive file this namespace was mounted from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl ModNamespace for MountedArchive {
    fn contains(&self, path: &str) -> bool {
        !path.ends_with('/') && self.archive.index_for_name(path).is_some()
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>, MountError> {
        let mut file = self.archive.by_name(path).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => MountError::EntryNotFound(path.to_string()),
            other => MountError::Read {
                entry: path.to_string(),
                source: other.into(),
            },
        })?;

        if file.is_dir() {
            return Err(MountError::EntryNotFound(path.to_string()));
        }

        let mut buffer = Vec::with_capacity(initial_capacity(file.size()));
        file.read_to_end(&mut buffer)
            .map_err(|source| MountError::Read {
                entry: path.to_string(),
                source,
            })?;
        Ok(buffer)
    }

    fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(String::from)
            .collect();
        names.sort();
        names
    }
}

/// An in-memory namespace.
#[derive(Debug, Default, Clone)]
pub struct MemoryNamespace {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl ModNamespace for MemoryNamespace {
    fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>, MountError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| MountError::EntryNotFound(path.to_string()))
    }

    fn entries(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }
}
