use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },
    #[error("{collaborator} unavailable")]
    CollaboratorUnavailable { collaborator: &'static str },
    #[error("scheduler error: {0}")]
    Scheduler(String),
    /// The session was interrupted before the countdown finished.
    #[error("session interrupted by shutdown request")]
    Shutdown,
    #[error("max run time of {max_run_ms} ms elapsed before the countdown finished")]
    MaxRuntime { max_run_ms: u64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
