use thiserror::Error;
use std::io::Error as IoError;

use crate::security::ValidationError;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("A turn is already in flight")]
    TurnInFlight,

    #[error("Duplicate message id: {0}")]
    DuplicateMessageId(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;
