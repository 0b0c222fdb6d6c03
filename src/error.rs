use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not open log file {}: {source}", path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("A logger is already installed for the log facade")]
    AlreadyInstalled,

    #[error("The logger was called from inside its own sink")]
    Reentrant,
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(_: log::SetLoggerError) -> Self {
        Error::AlreadyInstalled
    }
}
