use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected at setup time: thresholds outside `[0, 1]`, zero intervals,
    /// non-finite offsets and the like. Never raised while the page runs.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration(message.into())
    }
}
