//! Composizione delle viste: elenco unità, cartelle paginate, file e controlli

use std::path::{Path, PathBuf};

use crate::browser::handles::{Handle, HandleId, HandleKind, HandleRegistry};
use crate::browser::utils::metadata::MetadataConverter;
use crate::browser::utils::path_resolver::PathResolver;
use crate::command::Command;
use crate::file_info::{DirContents, FileInfo};
use crate::messenger::{Control, Controls, View};
use crate::transfer::{Direction, TransferKey};

pub const DEFAULT_PAGE_SIZE: usize = 10;
const PROGRESS_SEGMENTS: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub has_more: bool,
}

/// Fetta `[page*size, page*size+size)` e presenza di una pagina successiva
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size);

    Page {
        items: items.iter().skip(start).take(page_size).cloned().collect(),
        page,
        has_more: end < items.len(),
    }
}

/// Più recenti prima; a parità di data decide il nome
pub fn sort_files(files: &mut [FileInfo]) {
    files.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.name.cmp(&b.name)));
}

pub fn sort_folders(folders: &mut [FileInfo]) {
    folders.sort_by(|a, b| a.name.cmp(&b.name));
}

pub struct MenuRenderer {
    page_size: usize,
    max_transfer_size: u64,
}

impl MenuRenderer {
    pub fn new(page_size: usize, max_transfer_size: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            max_transfer_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn list_page(&self, path: &Path, page: usize) -> std::io::Result<Page<FileInfo>> {
        let mut contents = DirContents::read(path).await?;
        sort_files(&mut contents.files);
        Ok(paginate(&contents.files, page, self.page_size))
    }

    pub async fn list_subfolders_page(
        &self,
        path: &Path,
        page: usize,
    ) -> std::io::Result<Page<FileInfo>> {
        let mut contents = DirContents::read(path).await?;
        sort_folders(&mut contents.folders);
        Ok(paginate(&contents.folders, page, self.page_size))
    }

    /// "Indietro" solo se esiste un padre distinto, "Home" sempre
    pub fn nav_controls(registry: &mut HandleRegistry, path: Option<&Path>) -> Vec<Control> {
        let mut controls = Vec::new();
        if let Some(parent) = path.and_then(PathResolver::parent_of) {
            let parent_id = registry.allocate(parent, HandleKind::Folder);
            controls.push(Control::new("Back", &Command::Folder(parent_id)));
        }
        controls.push(Control::new("Home", &Command::Home));
        controls
    }

    pub fn drive_list(registry: &mut HandleRegistry, drives: &[PathBuf]) -> View {
        let controls = drives
            .iter()
            .map(|drive| {
                let id = registry.allocate(drive.clone(), HandleKind::Drive);
                vec![Control::new(drive.display().to_string(), &Command::Drive(id))]
            })
            .collect();

        View::with_controls("File manager\n\nSelect a drive:", controls)
    }

    pub fn folder_summary(
        registry: &mut HandleRegistry,
        folder: &Handle,
        contents: &DirContents,
    ) -> View {
        let header = match folder.kind {
            HandleKind::Drive => "Drive",
            _ => "Folder",
        };
        let text = format!(
            "{}: {}\nSubfolders: {}\nFiles: {}",
            header,
            folder.target.display(),
            contents.folders.len(),
            contents.files.len()
        );

        let mut controls = vec![Self::nav_controls(registry, Some(&folder.target))];
        if !contents.folders.is_empty() {
            controls.push(vec![Control::new(
                "List subfolders",
                &Command::ListSubfolders {
                    folder: folder.id.clone(),
                    page: 0,
                },
            )]);
        }
        if !contents.files.is_empty() {
            controls.push(vec![Control::new(
                "List files",
                &Command::ListFiles {
                    folder: folder.id.clone(),
                    page: 0,
                },
            )]);
        }

        View::with_controls(text, controls)
    }

    pub fn subfolder_page(
        &self,
        registry: &mut HandleRegistry,
        folder: &Handle,
        page: &Page<FileInfo>,
    ) -> View {
        let mut controls = vec![Self::nav_controls(registry, Some(&folder.target))];
        for sub in &page.items {
            let id = registry.allocate(sub.path.clone(), HandleKind::Folder);
            controls.push(vec![Control::new(sub.name.clone(), &Command::Folder(id))]);
        }
        if page.has_more {
            controls.push(vec![Control::new(
                format!("Next {}", self.page_size),
                &Command::ListSubfolders {
                    folder: folder.id.clone(),
                    page: page.page + 1,
                },
            )]);
        }

        View::with_controls(
            format!("Subfolders in {}:", folder.target.display()),
            controls,
        )
    }

    pub fn file_item(&self, registry: &mut HandleRegistry, file: &FileInfo) -> View {
        let id = registry.allocate(file.path.clone(), HandleKind::File);
        let text = format!(
            "File: {}\nCreated: {}\nSize: {}",
            file.name,
            MetadataConverter::format_time(file.created),
            MetadataConverter::format_size(file.size)
        );
        View::with_controls(text, self.file_controls(&id, file))
    }

    /// Upload solo entro il limite, elimina sempre, apri solo per le estensioni note
    pub fn file_controls(&self, id: &HandleId, file: &FileInfo) -> Controls {
        let mut controls = Vec::new();
        if file.size <= self.max_transfer_size {
            controls.push(vec![Control::new("Upload", &Command::Upload(id.clone()))]);
        }
        controls.push(vec![Control::new("Delete", &Command::Delete(id.clone()))]);
        if file.is_openable() {
            controls.push(vec![Control::new("Open", &Command::Execute(id.clone()))]);
        }
        controls
    }

    pub fn files_nav(&self, folder: &Handle, page: &Page<FileInfo>) -> View {
        let mut row = vec![
            Control::new("Home", &Command::Home),
            Control::new("Back", &Command::Folder(folder.id.clone())),
        ];
        if page.has_more {
            row.push(Control::new(
                format!("Next {}", self.page_size),
                &Command::ListFiles {
                    folder: folder.id.clone(),
                    page: page.page + 1,
                },
            ));
        }
        View::with_controls("Navigation:", vec![row])
    }

    /// Messaggio d'errore o avviso con i controlli di navigazione
    pub fn notice(
        registry: &mut HandleRegistry,
        text: impl Into<String>,
        path: Option<&Path>,
    ) -> View {
        View::with_controls(text, vec![Self::nav_controls(registry, path)])
    }

    pub fn confirm(question: impl Into<String>, yes: Command, no: Command) -> View {
        View::with_controls(
            question,
            vec![
                vec![Control::new("Yes", &yes)],
                vec![Control::new("No", &no)],
            ],
        )
    }

    pub fn progress(direction: Direction, percentage: f64, key: &TransferKey) -> View {
        let verb = match direction {
            Direction::Upload => "Uploading",
            Direction::Download => "Downloading",
        };
        let filled =
            ((PROGRESS_SEGMENTS as f64 * percentage / 100.0) as usize).min(PROGRESS_SEGMENTS);
        let bar = format!(
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(PROGRESS_SEGMENTS - filled)
        );
        View::with_controls(
            format!("{}: {:.2}%\n{}", verb, percentage, bar),
            Self::cancel_controls(key),
        )
    }

    pub fn cancel_controls(key: &TransferKey) -> Controls {
        vec![vec![Control::new("Cancel", &Command::Cancel(key.clone()))]]
    }
}
