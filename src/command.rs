//! Payload dei controlli: campi separati da `|`, il primo è l'azione

use std::fmt;
use std::str::FromStr;

use crate::error::BrowserError;

pub const SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Home,
    Back,
    Drive(String),
    Folder(String),
    ListSubfolders { folder: String, page: usize },
    ListFiles { folder: String, page: usize },
    Upload(String),
    Cancel(String),
    Delete(String),
    ConfirmDelete(String),
    CancelDelete(String),
    Execute(String),
    ConfirmExecute(String),
    CancelExecute(String),
    Overwrite(String),
    Rename(String),
}

impl Command {
    pub fn action(&self) -> &'static str {
        match self {
            Command::Home => "home",
            Command::Back => "back",
            Command::Drive(_) => "drive",
            Command::Folder(_) => "folder",
            Command::ListSubfolders { .. } => "list_subfolders",
            Command::ListFiles { .. } => "list_files",
            Command::Upload(_) => "upload",
            Command::Cancel(_) => "cancel",
            Command::Delete(_) => "delete",
            Command::ConfirmDelete(_) => "confirm_delete",
            Command::CancelDelete(_) => "cancel_delete",
            Command::Execute(_) => "execute",
            Command::ConfirmExecute(_) => "confirm_execute",
            Command::CancelExecute(_) => "cancel_execute",
            Command::Overwrite(_) => "overwrite",
            Command::Rename(_) => "rename",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = self.action();
        match self {
            Command::Home | Command::Back => write!(f, "{}", action),
            Command::ListSubfolders { folder, page } | Command::ListFiles { folder, page } => {
                write!(f, "{action}{SEPARATOR}{folder}{SEPARATOR}{page}")
            }
            Command::Drive(id)
            | Command::Folder(id)
            | Command::Upload(id)
            | Command::Cancel(id)
            | Command::Delete(id)
            | Command::ConfirmDelete(id)
            | Command::CancelDelete(id)
            | Command::Execute(id)
            | Command::ConfirmExecute(id)
            | Command::CancelExecute(id)
            | Command::Overwrite(id)
            | Command::Rename(id) => write!(f, "{action}{SEPARATOR}{id}"),
        }
    }
}

impl FromStr for Command {
    type Err = BrowserError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let invalid = || BrowserError::InvalidCommand(payload.to_string());
        let fields: Vec<&str> = payload.split(SEPARATOR).collect();

        let id = |index: usize| -> Result<String, BrowserError> {
            match fields.get(index) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(invalid()),
            }
        };
        let page = |index: usize| -> Result<usize, BrowserError> {
            // pagina assente = prima pagina
            match fields.get(index) {
                Some(value) => value.parse().map_err(|_| invalid()),
                None => Ok(0),
            }
        };

        let command = match fields[0] {
            "home" => Command::Home,
            "back" => Command::Back,
            "drive" => Command::Drive(id(1)?),
            "folder" => Command::Folder(id(1)?),
            "list_subfolders" => Command::ListSubfolders {
                folder: id(1)?,
                page: page(2)?,
            },
            "list_files" => Command::ListFiles {
                folder: id(1)?,
                page: page(2)?,
            },
            "upload" => Command::Upload(id(1)?),
            // compatibilità con i vecchi pulsanti di annullamento download
            "cancel" | "cancel_download" => Command::Cancel(id(1)?),
            "delete" => Command::Delete(id(1)?),
            "confirm_delete" => Command::ConfirmDelete(id(1)?),
            "cancel_delete" => Command::CancelDelete(id(1)?),
            "execute" => Command::Execute(id(1)?),
            "confirm_execute" => Command::ConfirmExecute(id(1)?),
            "cancel_execute" => Command::CancelExecute(id(1)?),
            "overwrite" => Command::Overwrite(id(1)?),
            "rename" => Command::Rename(id(1)?),
            _ => return Err(invalid()),
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_travels_in_payload() {
        let command = Command::ListFiles {
            folder: "abc".into(),
            page: 3,
        };
        assert_eq!(command.to_string(), "list_files|abc|3");
        assert_eq!("list_files|abc|3".parse::<Command>().unwrap(), command);
        assert_eq!(
            "list_subfolders|abc".parse::<Command>().unwrap(),
            Command::ListSubfolders {
                folder: "abc".into(),
                page: 0
            }
        );
    }

    #[test]
    fn test_legacy_cancel_download_alias() {
        assert_eq!(
            "cancel_download|k1".parse::<Command>().unwrap(),
            Command::Cancel("k1".into())
        );
    }

    #[test]
    fn test_malformed_payloads() {
        for payload in ["", "drive", "folder|", "list_files|abc|x", "screenshot"] {
            assert!(
                matches!(payload.parse::<Command>(), Err(BrowserError::InvalidCommand(_))),
                "payload {:?} should be rejected",
                payload
            );
        }
    }

    #[test]
    fn test_payload_fits_in_callback_data() {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let longest = Command::ConfirmExecute(id).to_string();
        assert!(longest.len() <= 64);
    }
}
