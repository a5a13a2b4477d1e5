//! Mod discovery.
//!
//! The [`ModLoader`] scans a mods directory for `.pak` archives, mounts each
//! one under its file stem and parses its manifest. A mod that fails at any
//! step is logged and skipped; it never prevents the remaining mods from
//! loading.
//!
//! Candidates are processed in file-name order and the resulting list is
//! stable-sorted by priority, so mods with equal priority keep file-name
//! order regardless of how the filesystem enumerates the directory.

use crate::error::{LoaderError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use overmod_archive::{MountedArchive, ARCHIVE_EXTENSION};
use overmod_manifest::{parse_manifest, ModMetadata};
use std::collections::HashSet;

/// A mod archive that was mounted and kept open.
pub struct MountedMod {
    /// Identifier the archive was mounted under.
    pub id: String,
    pub archive: MountedArchive,
}

/// A candidate archive that was not loaded.
#[derive(Debug, Clone)]
pub struct SkippedMod {
    pub id: String,
    pub archive: Utf8PathBuf,
    pub reason: String,
}

/// Everything produced by a discovery pass.
pub struct LoadedMods {
    /// Successfully parsed mods, ascending by priority.
    pub mods: Vec<ModMetadata>,
    /// Mounted archives of the mods in [`mods`](Self::mods).
    pub mounts: Vec<MountedMod>,
    /// Candidates that were skipped, in processing order.
    pub skipped: Vec<SkippedMod>,
}

/// Discovers and loads mods from a directory.
pub struct ModLoader {
    mods_dir: Utf8PathBuf,
}

impl ModLoader {
    pub fn new(mods_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            mods_dir: mods_dir.into(),
        }
    }

    pub fn mods_dir(&self) -> &Utf8Path {
        &self.mods_dir
    }

    /// Scan the mods directory and load every valid mod.
    ///
    /// The directory is created if it does not exist yet.
    pub fn load(&self) -> Result<LoadedMods> {
        tracing::info!("Scanning mods directory: {}", self.mods_dir);

        let candidates = self.candidates()?;
        tracing::info!("Found {} candidate archive(s)", candidates.len());

        let mut mods = Vec::new();
        let mut mounts = Vec::new();
        let mut skipped = Vec::new();
        let mut seen_ids = HashSet::new();

        for archive_path in candidates {
            let id = archive_path.file_stem().unwrap_or_default().to_string();
            let mut skip = |reason: String| {
                tracing::warn!("Skipping mod '{}' ({}): {}", id, archive_path, reason);
                skipped.push(SkippedMod {
                    id: id.clone(),
                    archive: archive_path.clone(),
                    reason,
                });
            };

            if !seen_ids.insert(id.clone()) {
                skip("another archive is already mounted under this id".to_string());
                continue;
            }

            let mut archive = match MountedArchive::mount(&archive_path) {
                Ok(archive) => archive,
                Err(e) => {
                    skip(e.to_string());
                    continue;
                }
            };

            let meta = match parse_manifest(&mut archive, &id) {
                Ok(meta) => meta,
                Err(e) => {
                    skip(e.to_string());
                    continue;
                }
            };

            tracing::info!(
                "Loaded mod '{}' (id={}, priority={}, overrides={})",
                meta.name,
                id,
                meta.priority,
                meta.overrides.len()
            );

            mods.push(meta);
            mounts.push(MountedMod { id, archive });
        }

        // Stable: equal priorities keep processing order.
        mods.sort_by_key(|meta| meta.priority);

        tracing::info!(
            "Loaded {} mod(s), skipped {}",
            mods.len(),
            skipped.len()
        );

        Ok(LoadedMods {
            mods,
            mounts,
            skipped,
        })
    }

    /// List archive files in the mods directory, sorted by file name.
    fn candidates(&self) -> Result<Vec<Utf8PathBuf>> {
        let dir_error = |source: std::io::Error| LoaderError::ModsDir {
            path: self.mods_dir.clone(),
            source,
        };

        if !self.mods_dir.as_std_path().exists() {
            tracing::info!("Creating mods directory: {}", self.mods_dir);
            std::fs::create_dir_all(self.mods_dir.as_std_path()).map_err(dir_error)?;
        }

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(self.mods_dir.as_std_path()).map_err(dir_error)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", self.mods_dir, e);
                    continue;
                }
            };

            let path = match Utf8PathBuf::from_path_buf(entry.path()) {
                Ok(p) => p,
                Err(p) => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                    continue;
                }
            };

            if !path.as_std_path().is_file() || !is_archive_path(&path) {
                continue;
            }
            candidates.push(path);
        }

        candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(candidates)
    }
}

/// Discover mods in `mods_dir` and return their metadata ordered by priority.
pub fn discover_mods(mods_dir: &Utf8Path) -> Result<Vec<ModMetadata>> {
    Ok(ModLoader::new(mods_dir).load()?.mods)
}

fn is_archive_path(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    /// Write `<dir>/<id>.pak` containing the given files under `<id>/`.
    fn write_mod(dir: &Utf8Path, id: &str, files: &[(&str, &str)]) {
        let file = File::create(dir.join(format!("{}.pak", id)).as_std_path()).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, contents) in files {
            zip.start_file(format!("{}/{}", id, name), SimpleFileOptions::default())
                .unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn manifest(name: &str, priority: i64, overrides: &str) -> String {
        format!(
            r#"{{"name": "{}", "priority": {}, "overrides": {}}}"#,
            name, priority, overrides
        )
    }

    #[test]
    fn test_creates_missing_mods_dir() {
        let root = tempdir().unwrap();
        let mods_dir = utf8(&root.path().join("user/mods"));

        let mods = discover_mods(&mods_dir).unwrap();
        assert!(mods.is_empty());
        assert!(mods_dir.as_std_path().is_dir());
    }

    #[test]
    fn test_orders_by_priority() {
        let root = tempdir().unwrap();
        let dir = utf8(root.path());
        write_mod(&dir, "a_high", &[("mod.json", manifest("High", 10, "{}").as_str())]);
        write_mod(&dir, "b_low", &[("mod.json", manifest("Low", -1, "{}").as_str())]);
        write_mod(&dir, "c_mid", &[("mod.json", manifest("Mid", 3, "{}").as_str())]);

        let names: Vec<String> = discover_mods(&dir)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Low", "Mid", "High"]);
    }

    #[test]
    fn test_equal_priority_keeps_file_name_order() {
        let root = tempdir().unwrap();
        let dir = utf8(root.path());
        write_mod(&dir, "zeta", &[("mod.json", manifest("Zeta", 0, "{}").as_str())]);
        write_mod(&dir, "alpha", &[("mod.json", manifest("Alpha", 0, "{}").as_str())]);

        let ids: Vec<String> = discover_mods(&dir)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_bad_mods_are_isolated() {
        let root = tempdir().unwrap();
        let dir = utf8(root.path());

        write_mod(&dir, "good_one", &[("mod.json", manifest("Good One", 1, "{}").as_str())]);
        // Not an archive at all.
        fs::write(dir.join("broken.pak").as_std_path(), b"garbage").unwrap();
        // No manifest.
        write_mod(&dir, "empty", &[("readme.txt", "hi")]);
        // Manifest root is an array; must not stop the scan.
        write_mod(&dir, "array_root", &[("mod.json", "[]")]);
        // Missing priority.
        write_mod(
            &dir,
            "no_priority",
            &[("mod.json", r#"{"name": "x", "overrides": {}}"#)],
        );
        write_mod(&dir, "zz_good_two", &[("mod.json", manifest("Good Two", 2, "{}").as_str())]);

        let loaded = ModLoader::new(dir.clone()).load().unwrap();

        let names: Vec<&str> = loaded.mods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Good One", "Good Two"]);
        assert_eq!(loaded.mounts.len(), 2);

        let skipped: Vec<&str> = loaded.skipped.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(skipped, vec!["array_root", "broken", "empty", "no_priority"]);
    }

    #[test]
    fn test_ignores_other_files() {
        let root = tempdir().unwrap();
        let dir = utf8(root.path());
        fs::write(dir.join("notes.txt").as_std_path(), b"not a mod").unwrap();
        fs::create_dir_all(dir.join("folder.pak").as_std_path()).unwrap();
        write_mod(&dir, "real", &[("mod.json", manifest("Real", 0, "{}").as_str())]);

        let loaded = ModLoader::new(dir).load().unwrap();
        assert_eq!(loaded.mods.len(), 1);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_manifest_under_wrong_root_is_missing() {
        let root = tempdir().unwrap();
        let dir = utf8(root.path());

        // Archive packed under "mod" but installed as "renamed.pak".
        let file = File::create(dir.join("renamed.pak").as_std_path()).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file("mod/mod.json", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(manifest("Renamed", 0, "{}").as_bytes())
            .unwrap();
        zip.finish().unwrap();

        let loaded = ModLoader::new(dir).load().unwrap();
        assert!(loaded.mods.is_empty());
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].reason.contains("renamed/mod.json"));
    }
}
