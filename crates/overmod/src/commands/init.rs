use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::IntoDiagnostic;
use overmod_manifest::{ModManifest, MANIFEST_FILE_NAME};
use std::collections::BTreeMap;

use crate::errors::CliError;
use crate::println_pad;

#[derive(Debug, Clone)]
pub struct InitModSourceArgs {
    pub name: String,
    pub output_dir: Option<String>,
}

pub fn init_mod_source(args: InitModSourceArgs) -> miette::Result<()> {
    let id = slug::slugify(&args.name);
    let parent = Utf8PathBuf::from(args.output_dir.unwrap_or_else(|| ".".to_string()));
    let mod_dir = parent.join(&id);

    if mod_dir.as_std_path().exists() {
        return Err(CliError::already_exists(mod_dir).into());
    }

    println_pad!(
        "{} {}",
        "🚀 Initializing new mod:".bright_blue().bold(),
        args.name.bright_cyan().bold()
    );

    create_mod_source(&mod_dir, &args.name)?;

    println_pad!(
        "{} {}",
        "📁 Created mod directory at:".bright_yellow(),
        mod_dir.as_str().bright_white().bold()
    );
    println_pad!(
        "{} {}",
        "💡 Next:".bright_cyan().bold(),
        format!(
            "add files and overrides, then run 'overmod pack {} -o {}.pak'",
            mod_dir, id
        )
        .bright_yellow()
    );

    Ok(())
}

fn create_mod_source(mod_dir: &Utf8Path, name: &str) -> miette::Result<()> {
    std::fs::create_dir_all(mod_dir.as_std_path()).into_diagnostic()?;

    let manifest = ModManifest {
        name: name.to_string(),
        priority: 0,
        overrides: BTreeMap::new(),
    };
    let content = serde_json::to_string_pretty(&manifest).into_diagnostic()?;
    std::fs::write(mod_dir.join(MANIFEST_FILE_NAME).as_std_path(), content).into_diagnostic()?;

    Ok(())
}
