use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use crate::{
    errors::CliError,
    println_pad,
    utils::{validate_root_name, with_archive_extension},
};

#[derive(Debug)]
pub struct PackModDirArgs {
    pub source_dir: String,
    pub output: String,
    pub root: Option<String>,
}

pub fn pack_mod_dir(args: PackModDirArgs) -> Result<()> {
    let source_dir = Utf8PathBuf::from(&args.source_dir);
    let output = Utf8PathBuf::from(with_archive_extension(&args.output));
    let root_name = resolve_root_name(args.root, &output);

    validate_root_name(&root_name)?;

    println!(
        "{} {}",
        "📦 Packing mod directory:".bright_blue().bold(),
        source_dir.as_str().bright_cyan().bold()
    );

    if let Some(output_dir) = output.parent().filter(|p| !p.as_str().is_empty()) {
        if !output_dir.as_std_path().exists() {
            println!(
                "{} {}",
                "📁 Creating output directory:".bright_yellow(),
                output_dir.as_str().bright_white().bold()
            );
            std::fs::create_dir_all(output_dir.as_std_path()).into_diagnostic()?;
        }
    }

    let summary =
        overmod_archive::pack(&source_dir, &root_name, &output).map_err(CliError::from)?;

    if !summary.skipped.is_empty() {
        println!(
            "{}",
            "⚠️  Some files could not be read and were left out:"
                .bright_yellow()
                .bold()
        );
        for path in &summary.skipped {
            println_pad!("{} {}", "•".bright_red(), path.as_str().bright_red());
        }
    }

    println!(
        "{}\n{} {}\n{} {} {}",
        "✅ Mod archive created successfully!".bright_green().bold(),
        "📍 Path:".bright_green(),
        summary.output.as_str().bright_white().bold(),
        "🗂️  Entries:".bright_green(),
        summary.entries.len().to_string().bright_white().bold(),
        format!("(root: {})", root_name).dimmed()
    );

    Ok(())
}

/// The archive root defaults to the output file stem, which is the id the mod
/// is mounted under once the archive is dropped into a mods directory.
fn resolve_root_name(root: Option<String>, output: &Utf8Path) -> String {
    root.unwrap_or_else(|| output.file_stem().unwrap_or("mod").to_string())
}
