use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffzError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}: input file is empty")]
    EmptyInput(String),

    #[error("Archive format error: {0}")]
    Format(String),

    #[error("Corrupt archive: {0}")]
    Corrupt(String),
}

impl HuffzError {
    pub fn invalid_argument<T: fmt::Display>(msg: T) -> Self {
        HuffzError::InvalidArgument(msg.to_string())
    }

    pub fn config<T: fmt::Display>(msg: T) -> Self {
        HuffzError::Config(msg.to_string())
    }

    pub fn format<T: fmt::Display>(msg: T) -> Self {
        HuffzError::Format(msg.to_string())
    }

    pub fn corrupt<T: fmt::Display>(msg: T) -> Self {
        HuffzError::Corrupt(msg.to_string())
    }

    /// Process exit code for this error, gzip-style: distinct codes for
    /// usage, I/O, empty-input and bad-archive failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            HuffzError::Io(_) => 2,
            HuffzError::EmptyInput(_) => 3,
            HuffzError::Format(_) | HuffzError::Corrupt(_) => 4,
            HuffzError::InvalidArgument(_) | HuffzError::Config(_) => 1,
        }
    }
}

pub type HuffzResult<T> = Result<T, HuffzError>;
