//! Error taxonomy for scaffold generation

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while planning or writing scaffolding
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Entity or option configuration the generator cannot work with.
    /// Always raised before any file is touched.
    #[error("{0}")]
    Configuration(String),

    /// A per-entity artifact exists and overwrite was not requested
    #[error("Unable to generate the {kind} as it already exists: {}", path.display())]
    AlreadyExists { kind: &'static str, path: PathBuf },

    /// The routing group key is already present in the routing document
    #[error("Bundle \"{bundle}\" is already imported under \"{key}\" in {}", path.display())]
    DuplicateRoute {
        bundle: String,
        key: String,
        path: PathBuf,
    },

    /// A structured document (YAML/XML) could not be read
    #[error("Could not parse {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        message: String,
        line: Option<usize>,
        snippet: Option<String>,
    },

    #[error("Failed to render template '{name}'")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The extension class does not have the `load` method shape we patch
    #[error("Cannot register the services loader in {}: {reason}", path.display())]
    ExtensionLayout { path: PathBuf, reason: String },

    #[error("Bundle \"{name}\" was not found under {}", search_root.display())]
    BundleNotFound { name: String, search_root: PathBuf },

    #[error("No Doctrine mapping for entity \"{entity}\" (expected {})", path.display())]
    MetadataNotFound { entity: String, path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a parse error from a serde_yaml failure, keeping its location
    pub fn yaml(path: impl AsRef<Path>, source: &str, err: &serde_yaml::Error) -> Self {
        let line = err.location().map(|loc| loc.line());
        let snippet = line.and_then(|l| source.lines().nth(l.saturating_sub(1)).map(str::to_string));
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
            line,
            snippet,
        }
    }

    /// Whether the generation run may continue past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DuplicateRoute { .. } | Self::Parse { .. })
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
