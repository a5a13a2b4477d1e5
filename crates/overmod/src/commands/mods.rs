use colored::Colorize;
use miette::Result;
use overmod_overlay::ModContext;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::resolve_mods_dir;

fn load_context(mods_dir: Option<String>) -> Result<ModContext> {
    let mods_dir = resolve_mods_dir(mods_dir)?;
    let ctx = ModContext::load(&mods_dir).map_err(CliError::from)?;
    Ok(ctx)
}

pub fn list_mods(mods_dir: Option<String>) -> Result<()> {
    let ctx = load_context(mods_dir)?;

    if ctx.mods().is_empty() {
        println!("{}", "No mods installed.".bright_yellow());
    } else {
        println!(
            "{}",
            "🧩 Installed mods (lowest priority first):"
                .bright_magenta()
                .bold()
        );
        for summary in ctx.mods() {
            println_pad!(
                "{} {} {} {}",
                "•".bright_cyan(),
                summary.name.bright_cyan().bold(),
                format!("[{}]", summary.id).dimmed(),
                format!(
                    "(priority: {}, overrides: {})",
                    summary.priority, summary.override_count
                )
                .dimmed()
            );
        }
    }

    if !ctx.skipped().is_empty() {
        println!();
        println!("{}", "⚠️  Skipped:".bright_yellow().bold());
        for skipped in ctx.skipped() {
            println_pad!(
                "{} {} {}",
                "•".bright_red(),
                skipped.archive.as_str().bright_red().bold(),
                skipped.reason.dimmed()
            );
        }
    }

    Ok(())
}

pub fn resolve_paths(mods_dir: Option<String>, paths: Vec<String>) -> Result<()> {
    let ctx = load_context(mods_dir)?;

    for path in &paths {
        match ctx.registry().active(path) {
            Some(entry) => println!(
                "{} {} {} {}",
                path.bright_white(),
                "→".bright_green(),
                entry.override_path.bright_green().bold(),
                format!("({})", entry.mod_name).dimmed()
            ),
            None => println!(
                "{} {} {}",
                path.bright_white(),
                "→".dimmed(),
                ctx.resolve(path).dimmed()
            ),
        }
    }

    Ok(())
}

pub fn show_conflicts(mods_dir: Option<String>) -> Result<()> {
    let ctx = load_context(mods_dir)?;

    let mut any = false;
    for (path, candidates) in ctx.registry().conflicts() {
        any = true;
        println!("{}", path.bright_white().bold());

        // Highest priority first, so the winner leads.
        for (i, entry) in candidates.iter().rev().enumerate() {
            let marker = if i == 0 {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println_pad!(
                "{} {} {} {}",
                marker,
                entry.mod_name.bright_cyan(),
                format!("(priority: {})", entry.priority).dimmed(),
                entry.override_path
            );
        }
    }

    if !any {
        println!("{}", "No conflicting overrides.".bright_green());
    }

    Ok(())
}
