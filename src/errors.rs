// src/errors.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a run before or while the dossier is read.
///
/// Field-level gaps inside a profile are never reported through this type; the
/// mapper simply omits the field.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("input file {} not found", path.display())]
    InputMissing { path: PathBuf },
    #[error("code table asset {} is missing", path.display())]
    AssetMissing { path: PathBuf },
    #[error("code table asset {} could not be parsed: {reason}", path.display())]
    MalformedAsset { path: PathBuf, reason: String },
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("document ended inside <{element}>")]
    TruncatedDocument { element: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type MapperResult<T> = std::result::Result<T, MapperError>;
