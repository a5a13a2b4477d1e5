use camino::Utf8PathBuf;
use miette::Diagnostic;
use overmod_archive::PackError;
use overmod_overlay::LoaderError;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Source directory not found: {path}")]
    #[diagnostic(
        code(pack::source_not_found),
        help("Point the pack command at the folder that contains your mod.json")
    )]
    PackSourceNotFound { path: Utf8PathBuf },

    #[error("Could not open the archive for writing")]
    #[diagnostic(
        code(pack::open_failed),
        help("Check that the output directory exists and is writable")
    )]
    PackOpenFailed {
        #[source]
        source: PackError,
    },

    #[error("Could not write a file into the archive")]
    #[diagnostic(code(pack::write_failed), help("Check available disk space"))]
    PackWriteFailed {
        #[source]
        source: PackError,
    },

    #[error("Could not finalize the archive")]
    #[diagnostic(
        code(pack::flush_failed),
        help("The archive was discarded. Check available disk space and permissions")
    )]
    PackFlushFailed {
        #[source]
        source: PackError,
    },

    #[error("Invalid archive root name: {name}")]
    #[diagnostic(
        code(pack::invalid_root),
        help("Root names must be alphanumeric and contain no spaces or special characters except '_' and '-'")
    )]
    InvalidRootName { name: String },

    #[error("Mods directory is not accessible")]
    #[diagnostic(
        code(mods::dir_unavailable),
        help("Pass --mods-dir or run 'overmod config set-mods-dir <path>'")
    )]
    ModsDirUnavailable {
        #[source]
        source: LoaderError,
    },

    #[error("Could not determine a default mods directory")]
    #[diagnostic(
        code(mods::no_default_dir),
        help("Pass --mods-dir or run 'overmod config set-mods-dir <path>'")
    )]
    NoDefaultModsDir,

    #[error("Directory already exists: {path}")]
    #[diagnostic(
        code(init::already_exists),
        help("Choose a different name or output directory")
    )]
    AlreadyExists { path: Utf8PathBuf },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn invalid_root_name(name: String) -> Self {
        Self::InvalidRootName { name }
    }

    pub fn already_exists(path: Utf8PathBuf) -> Self {
        Self::AlreadyExists { path }
    }
}

impl From<PackError> for CliError {
    fn from(error: PackError) -> Self {
        match error {
            PackError::SourceNotFound(path) => Self::PackSourceNotFound { path },
            source @ PackError::OpenFailed { .. } => Self::PackOpenFailed { source },
            source @ PackError::WriteFailed { .. } => Self::PackWriteFailed { source },
            source @ PackError::FlushFailed { .. } => Self::PackFlushFailed { source },
        }
    }
}

impl From<LoaderError> for CliError {
    fn from(source: LoaderError) -> Self {
        Self::ModsDirUnavailable { source }
    }
}
