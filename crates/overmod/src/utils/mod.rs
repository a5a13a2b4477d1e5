use crate::errors::CliError;
use camino::Utf8PathBuf;
use miette::Result;
use regex::Regex;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

pub fn is_valid_slug(name: impl AsRef<str>) -> bool {
    Regex::new(r"^[[:word:]-]+$")
        .unwrap()
        .is_match(name.as_ref())
}

pub fn validate_root_name(name: impl AsRef<str>) -> Result<()> {
    let name_str = name.as_ref();
    if !is_valid_slug(name_str) {
        return Err(CliError::invalid_root_name(name_str.to_string()).into());
    }

    Ok(())
}

/// Pick the mods directory: the `--mods-dir` flag, then the config file, then
/// the platform data directory.
pub fn resolve_mods_dir(flag: Option<String>) -> Result<Utf8PathBuf> {
    if let Some(dir) = flag {
        return Ok(Utf8PathBuf::from(dir));
    }

    if let Some(dir) = config::load_config().mods_dir {
        return Ok(dir);
    }

    config::default_mods_dir().ok_or_else(|| CliError::NoDefaultModsDir.into())
}

/// Append the archive extension unless the name already ends with it.
pub fn with_archive_extension(name: &str) -> String {
    let suffix = format!(".{}", overmod_archive::ARCHIVE_EXTENSION);
    if name.to_ascii_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}
