//! Error types for the tweet loader. Every variant aborts the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("bad time string {text:?}")]
    MalformedTimestamp { text: String },

    #[error("{}: line {line}: field `{field}` is not valid UTF-8", .path.display())]
    Decode {
        path: PathBuf,
        line: u64,
        field: String,
    },

    #[error("insert rejected for row {row}: {source}")]
    Insertion {
        row: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: missing required column `{column}`", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: unknown column `{column}`", .path.display())]
    UnknownColumn { path: PathBuf, column: String },

    #[error("{}: line {line}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LoadError>;
