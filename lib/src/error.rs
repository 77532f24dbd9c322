use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by gobuilder operations.
#[derive(Debug, Error)]
pub enum BuilderGenError {
    #[error("The Go grammar is incompatible with the linked tree-sitter runtime")]
    Grammar,

    #[error("Syntax error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Code generation failed: {0}")]
    Generation(String),

    #[error("Failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk `{path}`: {source}")]
    Discover {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read config `{path}`: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config `{path}`: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Output `{output}` is already generated from `{first}`")]
    OutputCollision { output: PathBuf, first: PathBuf },

    #[error("`{path}`: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<BuilderGenError>,
    },
}

impl BuilderGenError {
    /// Attaches the input file path to a per-file failure.
    ///
    /// Errors that already carry a path are returned unchanged.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::InFile { .. } | Self::Read { .. } | Self::Write { .. } => self,
            other => Self::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns true when the root cause is a syntax error in the input.
    pub fn is_parse_error(&self) -> bool {
        match self {
            Self::Parse { .. } => true,
            Self::InFile { source, .. } => source.is_parse_error(),
            _ => false,
        }
    }
}
