//! Error types for font catalog and download operations.

use std::{io, path::PathBuf, result};

/// Errors that can occur while managing hosted fonts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to load the `{}` file: {source}", path.display())]
    LoadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode `{}`: the file is not valid JSON: {source}", path.display())]
    DecodeFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{0}` is not a valid font id")]
    InvalidFontId(String),

    #[error("font `{0}` is not in the catalog")]
    UnknownFont(String),

    #[error("failed to get filename from URL `{0}`")]
    Filename(String),

    #[error("HTTP request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = result::Result<T, Error>;
