//! Shared JSON file I/O.

use std::{fs, path::Path};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Load and decode a JSON file, carrying the path in any error.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| Error::LoadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| Error::DecodeFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode a value as JSON and write it to a file.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string(value)?;
    fs::write(path, contents)?;
    Ok(())
}
