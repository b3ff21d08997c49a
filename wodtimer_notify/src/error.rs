use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{0} is not available on this device")]
    Unavailable(&'static str),
    #[error("audio output failed: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
