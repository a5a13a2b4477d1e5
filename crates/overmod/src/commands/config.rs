use crate::utils::config::{self, AppConfig};
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;

/// Print a config path entry with status indicator
fn print_path_config(name: &str, path: Option<&Utf8PathBuf>, note: &str) {
    match path {
        Some(p) => {
            let status = if p.as_std_path().is_dir() {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println!("  {} {} {}", format!("{}:", name).bright_white(), p, status);
        }
        None => {
            println!(
                "  {} {} {}",
                format!("{}:", name).bright_white(),
                "(not set)".bright_yellow(),
                note.dimmed()
            );
        }
    }
}

pub fn show_config() -> Result<()> {
    let cfg = config::load_config();
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let fallback = config::default_mods_dir()
        .map(|p| format!("using {}", p))
        .unwrap_or_default();

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);
    print_path_config("mods_dir", cfg.mods_dir.as_ref(), &fallback);
    println!();

    Ok(())
}

pub fn set_mods_dir(path: String) -> Result<()> {
    let path = Utf8PathBuf::from(&path);

    let mut cfg = config::load_config();
    cfg.mods_dir = Some(path.clone());
    config::save_config(&cfg).map_err(|e| miette::miette!("Failed to save config: {}", e))?;

    println!("{}", "✓ Mods directory set successfully!".bright_green().bold());
    println!();
    println!(
        "  {} {}",
        "Path:".bright_white().bold(),
        path.as_str().bright_green()
    );
    if !path.as_std_path().exists() {
        println!(
            "  {}",
            "The directory does not exist yet; it will be created on first use.".bright_yellow()
        );
    }

    Ok(())
}

pub fn reset_config() -> Result<()> {
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    config::save_config(&AppConfig::default())
        .map_err(|e| miette::miette!("Failed to reset config: {}", e))?;

    println!(
        "{}",
        "✓ Configuration reset to defaults".bright_green().bold()
    );
    println!();
    println!("  {} {}", "Config file:".bright_white().bold(), config_path);
    println!();

    Ok(())
}
