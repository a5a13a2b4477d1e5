use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::NamedTempFile;
use zip::{write::SimpleFileOptions, ZipWriter};

use crate::error::PackError;

/// Result of a successful packing run.
#[derive(Debug, Clone)]
pub struct PackSummary {
    /// Where the archive was written.
    pub output: Utf8PathBuf,
    /// Logical entry names written to the archive.
    pub entries: Vec<String>,
    /// Source files and directories that could not be read and were left out.
    pub skipped: Vec<Utf8PathBuf>,
}

/// Pack `source_dir` into a single archive at `output_path`, rooted at the
/// output file's stem.
///
/// Discovery mounts an archive under its file stem, so this is the layout an
/// installed mod is expected to have.
pub fn pack_default(
    source_dir: &Utf8Path,
    output_path: &Utf8Path,
) -> Result<PackSummary, PackError> {
    let root_name = output_path.file_stem().unwrap_or("mod");
    pack(source_dir, root_name, output_path)
}

/// Pack every file under `source_dir` into an archive at `output_path`.
///
/// Each file is stored as `archive_root_name/<path relative to source_dir>`.
/// The archive is assembled in a temporary file next to `output_path` and only
/// moved into place once it has been finalized, so a failed run never leaves a
/// half-written archive at the destination.
///
/// Files that vanish or become unreadable during the walk are logged and
/// skipped. Symbolic-link cycles are not detected.
pub fn pack(
    source_dir: &Utf8Path,
    archive_root_name: &str,
    output_path: &Utf8Path,
) -> Result<PackSummary, PackError> {
    if !source_dir.as_std_path().is_dir() {
        return Err(PackError::SourceNotFound(source_dir.to_path_buf()));
    }
    // Walk and exclusion checks work on canonical paths, so `.` and `out/x.pak`
    // still match the files the walk reaches.
    let source_root = canonicalize(source_dir)
        .map_err(|_| PackError::SourceNotFound(source_dir.to_path_buf()))?;

    let open_failed = |source: std::io::Error| PackError::OpenFailed {
        path: output_path.to_path_buf(),
        source,
    };

    let output_dir = match output_path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let output_dir = canonicalize(output_dir).map_err(open_failed)?;
    let output_file = output_path.file_name().ok_or_else(|| {
        open_failed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "output path has no file name",
        ))
    })?;
    let output_target = output_dir.join(output_file);

    let temp = NamedTempFile::new_in(output_dir.as_std_path()).map_err(open_failed)?;

    tracing::info!(
        "Packing {} as '{}' into {}",
        source_dir,
        archive_root_name,
        output_path
    );

    let temp_path = temp.path().to_path_buf();
    let mut zip = ZipWriter::new(BufWriter::new(temp.as_file()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let root_name = archive_root_name.trim_matches('/');
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let mut stack = vec![source_root.clone()];

    while let Some(dir) = stack.pop() {
        let listing = match std::fs::read_dir(dir.as_std_path()) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory {}: {}", dir, e);
                skipped.push(dir);
                continue;
            }
        };

        for entry in listing {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", dir, e);
                    continue;
                }
            };

            let path = match Utf8PathBuf::from_path_buf(path) {
                Ok(p) => p,
                Err(p) => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                    continue;
                }
            };

            // The archive may be written inside the tree it is packing.
            if path.as_std_path() == temp_path || path == output_target {
                continue;
            }

            // Follows symlinks; a dangling link reads as a vanished file.
            let metadata = match std::fs::metadata(path.as_std_path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path, e);
                    skipped.push(path);
                    continue;
                }
            };

            if metadata.is_dir() {
                stack.push(path);
                continue;
            }

            if !metadata.is_file() {
                tracing::debug!("Skipping non-regular file {}", path);
                continue;
            }

            let bytes = match std::fs::read(path.as_std_path()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path, e);
                    skipped.push(path);
                    continue;
                }
            };

            let entry_name = archive_entry_name(root_name, &source_root, &path);
            tracing::debug!("Adding {} as {}", path, entry_name);

            zip.start_file(entry_name.as_str(), options)
                .map_err(|source| PackError::WriteFailed {
                    entry: entry_name.clone(),
                    source,
                })?;
            zip.write_all(&bytes)
                .map_err(|source| PackError::WriteFailed {
                    entry: entry_name.clone(),
                    source: source.into(),
                })?;

            entries.push(entry_name);
        }
    }

    let flush_failed = |source: std::io::Error| PackError::FlushFailed {
        path: output_path.to_path_buf(),
        source,
    };

    let writer = zip.finish().map_err(|e| flush_failed(e.into()))?;
    writer
        .into_inner()
        .map_err(|e| flush_failed(e.into_error()))?;
    temp.persist(output_path.as_std_path())
        .map_err(|e| flush_failed(e.error))?;

    tracing::info!(
        "Packed {} file(s) into {} ({} skipped)",
        entries.len(),
        output_path,
        skipped.len()
    );

    Ok(PackSummary {
        output: output_path.to_path_buf(),
        entries,
        skipped,
    })
}

fn canonicalize(path: &Utf8Path) -> std::io::Result<Utf8PathBuf> {
    let canonical = std::fs::canonicalize(path.as_std_path())?;
    Utf8PathBuf::from_path_buf(canonical).map_err(|p| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("path is not valid UTF-8: {}", p.display()),
        )
    })
}

/// Build the archive entry name for a file, always with `/` separators.
fn archive_entry_name(root_name: &str, source_dir: &Utf8Path, file: &Utf8Path) -> String {
    let relative = file
        .strip_prefix(source_dir)
        .unwrap_or(file)
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/");

    if root_name.is_empty() {
        relative
    } else {
        format!("{}/{}", root_name, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs::{self, File};
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    fn entry_names(archive: &Utf8Path) -> BTreeSet<String> {
        let file = File::open(archive.as_std_path()).unwrap();
        let zip = ZipArchive::new(file).unwrap();
        zip.file_names().map(String::from).collect()
    }

    #[test]
    fn test_pack_preserves_tree() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/B"), b"b").unwrap();

        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("r.pak"));
        let summary = pack(&utf8(src.path()), "R", &output).unwrap();

        assert_eq!(summary.entries.len(), 2);
        assert!(summary.skipped.is_empty());

        let expected: BTreeSet<String> = ["R/A", "R/sub/B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(entry_names(&output), expected);
    }

    #[test]
    fn test_pack_default_uses_output_stem() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("mod.json"), b"{}").unwrap();

        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("cool_mod.pak"));
        pack_default(&utf8(src.path()), &output).unwrap();

        assert!(entry_names(&output).contains("cool_mod/mod.json"));
    }

    #[test]
    fn test_pack_deep_tree() {
        let src = tempdir().unwrap();
        let deep = src.path().join("a/b/c/d/e");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("leaf.txt"), b"leaf").unwrap();
        fs::create_dir_all(src.path().join("empty")).unwrap();

        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("deep.pak"));
        let summary = pack(&utf8(src.path()), "deep", &output).unwrap();

        assert_eq!(summary.entries, vec!["deep/a/b/c/d/e/leaf.txt".to_string()]);
    }

    #[test]
    fn test_pack_missing_source() {
        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("x.pak"));
        let missing = utf8(&out.path().join("does-not-exist"));

        let result = pack(&missing, "x", &output);
        assert!(matches!(result, Err(PackError::SourceNotFound(_))));
        assert!(!output.as_std_path().exists());
    }

    #[test]
    fn test_pack_unopenable_output() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();

        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("no/such/dir/x.pak"));

        let result = pack(&utf8(src.path()), "x", &output);
        assert!(matches!(result, Err(PackError::OpenFailed { .. })));
        assert!(!output.as_std_path().exists());
    }

    #[test]
    fn test_pack_leaves_source_untouched() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();

        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("x.pak"));
        pack(&utf8(src.path()), "x", &output).unwrap();

        let names: Vec<_> = fs::read_dir(src.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
        assert_eq!(fs::read(src.path().join("A")).unwrap(), b"a");
    }

    #[test]
    fn test_pack_into_source_dir_excludes_archive() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();

        let output = utf8(&src.path().join("self.pak"));
        pack(&utf8(src.path()), "self", &output).unwrap();
        // A second run must not pick up the archive from the first one.
        let summary = pack(&utf8(src.path()), "self", &output).unwrap();

        assert_eq!(summary.entries, vec!["self/A".to_string()]);
    }

    #[test]
    fn test_pack_excludes_archive_with_differently_spelled_paths() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();
        fs::create_dir_all(src.path().join("out")).unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();

        // `<tmp>/sub/..` walks `<tmp>/sub/../out/...`, which never compares
        // equal to `<tmp>/out/self.pak` without canonicalizing.
        let source = utf8(&src.path().join("sub").join(".."));
        let output = utf8(&src.path().join("out").join("self.pak"));

        pack(&source, "self", &output).unwrap();
        let summary = pack(&source, "self", &output).unwrap();

        assert_eq!(summary.entries, vec!["self/A".to_string()]);
        assert_eq!(entry_names(&output).len(), 1);
    }

    #[test]
    fn test_pack_relative_paths_exclude_archive() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();
        fs::create_dir_all(src.path().join("out")).unwrap();

        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(src.path()).unwrap();
        let first = pack(Utf8Path::new("."), "self", Utf8Path::new("out/self.pak"));
        let second = pack(Utf8Path::new("."), "self", Utf8Path::new("out/self.pak"));
        std::env::set_current_dir(previous).unwrap();

        assert_eq!(first.unwrap().entries, vec!["self/A".to_string()]);
        assert_eq!(second.unwrap().entries, vec!["self/A".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_pack_skips_vanished_file() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/B"), b"b").unwrap();
        std::os::unix::fs::symlink(src.path().join("gone"), src.path().join("sub/dangling"))
            .unwrap();

        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("x.pak"));
        let summary = pack(&utf8(src.path()), "x", &output).unwrap();

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].file_name(), Some("dangling"));

        let expected: BTreeSet<String> = ["x/A", "x/sub/B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(entry_names(&output), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_pack_skips_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let src = tempdir().unwrap();
        fs::write(src.path().join("A"), b"a").unwrap();
        let locked = src.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("secret"), b"s").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits don't bind a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let out = tempdir().unwrap();
        let output = utf8(&out.path().join("x.pak"));
        let result = pack(&utf8(src.path()), "x", &output);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let summary = result.unwrap();
        assert_eq!(summary.entries, vec!["x/A".to_string()]);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].file_name(), Some("locked"));
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let name = archive_entry_name(
            "root",
            Utf8Path::new("/src"),
            Utf8Path::new("/src/textures/grass.png"),
        );
        assert_eq!(name, "root/textures/grass.png");

        let bare = archive_entry_name("", Utf8Path::new("/src"), Utf8Path::new("/src/a.txt"));
        assert_eq!(bare, "a.txt");
    }
}
