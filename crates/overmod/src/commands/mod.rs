mod config;
mod init;
mod mods;
mod pack;

pub use config::{reset_config, set_mods_dir, show_config};
pub use init::{init_mod_source, InitModSourceArgs};
pub use mods::{list_mods, resolve_paths, show_conflicts};
pub use pack::{pack_mod_dir, PackModDirArgs};
