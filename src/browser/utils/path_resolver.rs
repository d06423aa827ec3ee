use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use log::warn;

use crate::error::{BrowserError, Result};

pub struct PathResolver {
    drives: Vec<PathBuf>,
}

impl PathResolver {
    pub fn new(drives: Vec<PathBuf>) -> Self {
        Self { drives }
    }

    pub fn drives(&self) -> &[PathBuf] {
        &self.drives
    }

    /// Unità disponibili sulla macchina
    pub fn platform_drives() -> Vec<PathBuf> {
        if cfg!(windows) {
            ('A'..='Z')
                .map(|letter| PathBuf::from(format!("{}:/", letter)))
                .filter(|drive| drive.exists())
                .collect()
        } else {
            vec![PathBuf::from("/")]
        }
    }

    /// Padre distinto dal path stesso, se esiste
    pub fn parent_of(path: &Path) -> Option<PathBuf> {
        path.parent()
            .filter(|parent| !parent.as_os_str().is_empty() && *parent != path)
            .map(Path::to_path_buf)
    }

    /// Vero per gli antenati stretti di un'unità, cioè la risalita oltre la sua radice
    pub fn is_above_drives(&self, path: &Path) -> bool {
        self.drives
            .iter()
            .any(|drive| drive.as_path() != path && drive.starts_with(path))
    }

    /// Il path deve restare dentro una delle unità esposte
    pub fn confine(&self, path: &Path) -> Result<PathBuf> {
        let canonical = path.canonicalize().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BrowserError::Vanished(path.to_path_buf()),
            _ => BrowserError::Io(e),
        })?;

        if self.drives.iter().any(|drive| canonical.starts_with(drive)) {
            Ok(canonical)
        } else {
            warn!("Access outside exposed drives: {:?}", canonical);
            Err(BrowserError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{} is outside the exposed drives", canonical.display()),
            )))
        }
    }

    /// Destinazione di un file in arrivo: il nome viene ridotto a un solo componente
    pub fn destination(folder: &Path, file_name: &str) -> Result<PathBuf> {
        let name = Path::new(file_name)
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .next_back()
            .ok_or_else(|| BrowserError::InvalidCommand(file_name.to_string()))?;

        Ok(folder.join(name))
    }

    /// `nome_YYYYmmddHHMMSS.ext` accanto all'originale
    pub fn timestamped(path: &Path, now: DateTime<Local>) -> PathBuf {
        Self::suffixed(path, &now.format("%Y%m%d%H%M%S").to_string())
    }

    /// `nome_N.ext`, per quando anche il nome scelto è già occupato
    pub fn numbered(path: &Path, n: usize) -> PathBuf {
        Self::suffixed(path, &n.to_string())
    }

    fn suffixed(path: &Path, suffix: &str) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match path.extension() {
            Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
            None => format!("{}_{}", stem, suffix),
        };
        path.with_file_name(name)
    }
}
