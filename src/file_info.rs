use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::warn;
use tokio::fs;

use crate::browser::utils::metadata::MetadataConverter;

const OPENABLE_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "jpeg", "jpg", "png", "pdf", "doc", "docx", "xls", "xlsx", "mkv", "avi",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub created: Option<SystemTime>,
    pub is_dir: bool,
}

impl FileInfo {
    pub async fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        let metadata = fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self {
            name,
            size: metadata.len(),
            created: MetadataConverter::created(&metadata),
            is_dir: metadata.is_dir(),
            path,
        })
    }

    /// Estensioni che possono essere eseguite o aperte con l'applicazione predefinita
    pub fn is_openable(&self) -> bool {
        has_extension(&self.path, OPENABLE_EXTENSIONS)
    }
}

fn has_extension(path: &Path, list: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| list.contains(&ext.to_lowercase().as_str()))
}

/// Contenuto di una directory diviso in sottocartelle e file
#[derive(Debug, Default)]
pub struct DirContents {
    pub folders: Vec<FileInfo>,
    pub files: Vec<FileInfo>,
}

impl DirContents {
    pub async fn read(path: &Path) -> Result<Self, std::io::Error> {
        let mut read_dir = fs::read_dir(path).await?;
        let mut contents = DirContents::default();

        while let Some(entry) = read_dir.next_entry().await? {
            // le voci illeggibili (link rotti, permessi) vengono saltate
            match FileInfo::new(entry.path()).await {
                Ok(info) if info.is_dir => contents.folders.push(info),
                Ok(info) => contents.files.push(info),
                Err(e) => warn!("Skipping {:?}: {}", entry.path(), e),
            }
        }

        Ok(contents)
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}
