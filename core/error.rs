use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory Listing Error: Path '{path}', Error: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("UTF-8 Decode Error: Path '{path}', Error: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Glob Pattern Error: {0}")]
    Glob(String),
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

/// Why a single collected file could not be turned into text.
///
/// Kept separate from [`AppError`] so the collector can decide per file
/// whether the failure aborts the run or is only reported.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("cannot read '{path}': {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
}

impl ReadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ReadError::Access { path, .. } | ReadError::Decode { path, .. } => path,
        }
    }
}

impl From<ReadError> for AppError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Access { path, source } => AppError::FileRead { path, source },
            ReadError::Decode { path, source } => AppError::Decode { path, source },
        }
    }
}
