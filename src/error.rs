//! Errori del browser remoto

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    #[error("Path no longer exists: {}", .0.display())]
    Vanished(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    SizeExceeded { size: u64, limit: u64 },

    #[error("Transfer cancelled")]
    Cancelled,

    #[error("Destination already exists: {}", .0.display())]
    Collision(PathBuf),

    #[error("A transfer is already running for key {0}")]
    TransferActive(String),

    #[error("Unauthorized user: {0}")]
    Unauthorized(i64),

    #[error("Invalid command payload: {0}")]
    InvalidCommand(String),

    #[error("No active folder for this conversation")]
    NoActiveFolder,

    #[error("Messenger error: {0}")]
    Messenger(String),
}

/// Classificazione degli errori verso l'utente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    SizeExceeded,
    Cancelled,
    Collision,
    Rejected,
}

impl BrowserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrowserError::UnknownHandle(_) | BrowserError::Vanished(_) => ErrorKind::NotFound,
            BrowserError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            BrowserError::Io(_) | BrowserError::Messenger(_) => ErrorKind::Io,
            BrowserError::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            BrowserError::Cancelled => ErrorKind::Cancelled,
            BrowserError::Collision(_) => ErrorKind::Collision,
            BrowserError::TransferActive(_)
            | BrowserError::Unauthorized(_)
            | BrowserError::InvalidCommand(_)
            | BrowserError::NoActiveFolder => ErrorKind::Rejected,
        }
    }

    /// Testo mostrato all'utente quando un handler fallisce
    pub fn user_message(&self) -> String {
        match self {
            BrowserError::UnknownHandle(_) => {
                "This entry is no longer available. Please navigate again.".to_string()
            }
            BrowserError::Vanished(path) => format!(
                "{} no longer exists on the server. Please navigate again.",
                path.display()
            ),
            BrowserError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("Not found: {}. Please navigate again.", e)
            }
            BrowserError::Io(e) => format!("Error: {}", e),
            BrowserError::SizeExceeded { .. } => {
                "The file exceeds the allowed size limit.".to_string()
            }
            BrowserError::Cancelled => "Operation cancelled.".to_string(),
            BrowserError::Collision(path) => format!("{} already exists.", path.display()),
            BrowserError::TransferActive(_) => {
                "A transfer for this item is already in progress.".to_string()
            }
            BrowserError::Unauthorized(_) => "You are not authorized to use this bot.".to_string(),
            BrowserError::InvalidCommand(_) => "Invalid parameters.".to_string(),
            BrowserError::NoActiveFolder => {
                "You are not in any folder. Navigate to a drive or folder first.".to_string()
            }
            BrowserError::Messenger(e) => format!("Error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, BrowserError>;
