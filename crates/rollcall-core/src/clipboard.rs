use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard rejected the write: {0}")]
    Rejected(String),
    #[error("clipboard io error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Clipboard {
    fn backend_name(&self) -> &str;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClipboard;

impl Clipboard for DisabledClipboard {
    fn backend_name(&self) -> &str {
        "disabled"
    }

    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("clipboard disabled".to_string()))
    }
}
