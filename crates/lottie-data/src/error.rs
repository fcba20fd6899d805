use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid animation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("animation root must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
