/// Failures of the one-shot setup calls. Logging itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("another logger is already registered with the `log` facade")]
    LoggerAlreadySet,
}
