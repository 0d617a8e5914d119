//! Error types shared by the viewer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, decoding or exporting images.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The uploaded bytes are not an image we can decode.
    #[error("could not decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// Encoding the exported raster failed.
    #[error("could not encode export: {0}")]
    Encode(#[source] image::ImageError),

    /// Export was requested before the tile's image finished decoding.
    #[error("image is not decoded yet")]
    NotDecoded,

    /// Invalid command line or configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
