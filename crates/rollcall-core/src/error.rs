use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("document unavailable: {0}")]
    Unavailable(String),
    #[error("stale element handle {0}")]
    StaleHandle(usize),
    #[error("page backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, PageError>;
