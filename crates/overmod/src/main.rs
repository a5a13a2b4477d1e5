use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    init_mod_source, list_mods, pack_mod_dir, resolve_paths, show_conflicts, InitModSourceArgs,
    PackModDirArgs,
};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Mods directory to scan (defaults to the configured or platform data directory)
    #[arg(long, global = true)]
    mods_dir: Option<String>,

    /// Log per-entry discovery and packing detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new mod source directory with a starter mod.json
    Init {
        /// Display name of the mod
        name: String,

        /// The directory to create the mod source directory in
        #[arg(short, long)]
        output_dir: Option<String>,
    },
    /// Pack a mod source directory into an archive
    Pack {
        /// The directory to pack
        source_dir: String,

        /// The archive to write
        #[arg(short, long, default_value = "mod_export.pak")]
        output: String,

        /// Root directory name inside the archive (defaults to the output file stem)
        #[arg(long)]
        root: Option<String>,
    },
    /// List installed mods in priority order
    List,
    /// Show which path each resource resolves to
    Resolve {
        /// Original resource paths
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Show resources overridden by more than one mod
    Conflicts,
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set the default mods directory
    SetModsDir { path: String },
    /// Reset the configuration to defaults
    Reset,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

const WORKSPACE_CRATES: [&str; 4] = [
    "overmod",
    "overmod_archive",
    "overmod_manifest",
    "overmod_overlay",
];

/// Default filter: `warn` for dependencies, `info` (or `debug` with `-v`) for
/// the workspace crates.
fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    std::iter::once("warn".to_string())
        .chain(
            WORKSPACE_CRATES
                .iter()
                .map(|krate| format!("{}={}", krate, level)),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Log to stderr. `RUST_LOG` overrides the default filter, e.g.
/// `RUST_LOG=overmod_overlay=trace`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(args.verbose);

    let mods_dir = args.mods_dir;

    match args.command {
        Commands::Init { name, output_dir } => {
            init_mod_source(InitModSourceArgs { name, output_dir })
        }
        Commands::Pack {
            source_dir,
            output,
            root,
        } => pack_mod_dir(PackModDirArgs {
            source_dir,
            output,
            root,
        }),
        Commands::List => list_mods(mods_dir),
        Commands::Resolve { paths } => resolve_paths(mods_dir, paths),
        Commands::Conflicts => show_conflicts(mods_dir),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::show_config(),
            ConfigAction::SetModsDir { path } => commands::set_mods_dir(path),
            ConfigAction::Reset => commands::reset_config(),
        },
    }
}
