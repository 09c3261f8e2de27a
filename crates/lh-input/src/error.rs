use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input format error: {0}")]
    InputFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InputResult<T> = Result<T, InputError>;
