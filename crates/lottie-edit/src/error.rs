use lottie_data::DocumentError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("no layer matching {0:?} to copy")]
    NoTemplate(String),
    #[error("template {index} out of range: only {count} matching layers")]
    TemplateOutOfRange { index: usize, count: usize },
    #[error("output {0} is the input animation")]
    OutputIsInput(PathBuf),
    #[error("no input animation given")]
    MissingInput,
    #[error("embedded animation is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

pub type EditResult<T> = Result<T, EditError>;
