//! Blob encoding for the durable tier.
//!
//! Each cached value lives in its own file, encoded with `bincode`. Any
//! `Serialize + DeserializeOwned` value can be stored; encoding a value and
//! decoding it back yields an equal value.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CacheError;

/// File extension given to value blobs.
pub const BLOB_EXTENSION: &str = "blob";

/// Encodes `value` into bytes.
pub fn encode<V: Serialize>(value: &V) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(value)
}

/// Decodes bytes produced by [`encode`].
pub fn decode<V: DeserializeOwned>(bytes: &[u8]) -> Result<V, bincode::Error> {
    bincode::deserialize(bytes)
}

/// Writes `value` to `path`, creating or truncating the file.
pub fn write_blob<V: Serialize>(path: &Path, value: &V) -> Result<(), CacheError> {
    let file = File::create(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, value).map_err(|source| CacheError::Codec {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and decodes the value stored at `path`.
pub fn read_blob<V: DeserializeOwned>(path: &Path) -> Result<V, CacheError> {
    let file = File::open(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|source| CacheError::Codec {
        path: path.to_path_buf(),
        source,
    })
}

/// Deletes the blob at `path`. A file that is already gone is not an error.
pub fn delete_blob(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
