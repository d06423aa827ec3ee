use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use uuid::Uuid;

use crate::error::{BrowserError, Result};

pub type HandleId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Drive,
    Folder,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    pub id: HandleId,
    pub target: PathBuf,
    pub kind: HandleKind,
}

#[derive(Debug)]
struct Entry {
    handle: Handle,
    last_used: u64,
}

/// Identificatori opachi e brevi al posto dei path nei payload dei controlli.
///
/// Ogni `allocate` genera un id nuovo, anche per lo stesso path. Con
/// `max_entries` a zero la crescita non ha limite; altrimenti, a registro
/// pieno, viene rimosso l'handle usato meno di recente.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    entries: HashMap<HandleId, Entry>,
    max_entries: usize,
    clock: u64,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::default()
        }
    }

    pub fn allocate(&mut self, target: impl Into<PathBuf>, kind: HandleKind) -> HandleId {
        if self.max_entries > 0 && self.entries.len() >= self.max_entries {
            self.evict_least_recent();
        }

        let id = Uuid::new_v4().simple().to_string();
        let handle = Handle {
            id: id.clone(),
            target: target.into(),
            kind,
        };
        debug!("allocated handle {} -> {:?} ({:?})", id, handle.target, kind);

        let last_used = self.tick();
        self.entries.insert(id.clone(), Entry { handle, last_used });
        id
    }

    /// Solo lookup: non verifica che il path esista ancora
    pub fn resolve(&mut self, id: &str) -> Result<&Handle> {
        let now = self.tick();
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.last_used = now;
                Ok(&entry.handle)
            }
            None => {
                warn!("Unknown handle: {}", id);
                Err(BrowserError::UnknownHandle(id.to_string()))
            }
        }
    }

    /// Come [`resolve`](Self::resolve), ma distingue un path sparito dal disco
    pub fn resolve_existing(&mut self, id: &str) -> Result<Handle> {
        let handle = self.resolve(id)?.clone();
        if handle.target.exists() {
            Ok(handle)
        } else {
            warn!("Handle {} points to vanished path {:?}", id, handle.target);
            Err(BrowserError::Vanished(handle.target))
        }
    }

    pub fn release(&mut self, id: &str) -> Option<Handle> {
        self.entries.remove(id).map(|entry| entry.handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aliases(&self, target: &Path) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.handle.target == target)
            .count()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| id.clone());

        if let Some(id) = oldest {
            debug!("evicting handle {}", id);
            self.entries.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_even_for_same_target() {
        let mut registry = HandleRegistry::new();
        let a = registry.allocate("/data", HandleKind::Folder);
        let b = registry.allocate("/data", HandleKind::Folder);

        assert_ne!(a, b);
        assert_eq!(registry.aliases(Path::new("/data")), 2);
        assert_eq!(registry.resolve(&a).unwrap().target, PathBuf::from("/data"));
    }

    #[test]
    fn test_released_handle_is_unknown() {
        let mut registry = HandleRegistry::new();
        let id = registry.allocate("/data/a.txt", HandleKind::File);

        assert!(registry.release(&id).is_some());
        assert!(registry.release(&id).is_none());
        assert!(matches!(
            registry.resolve(&id),
            Err(BrowserError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_stale_target_is_distinct_from_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        std::fs::write(&path, b"x").unwrap();

        let mut registry = HandleRegistry::new();
        let id = registry.allocate(&path, HandleKind::File);
        assert!(registry.resolve_existing(&id).is_ok());

        std::fs::remove_file(&path).unwrap();
        // il lookup puro continua a funzionare
        assert!(registry.resolve(&id).is_ok());
        assert!(matches!(
            registry.resolve_existing(&id),
            Err(BrowserError::Vanished(p)) if p == path
        ));
    }

    #[test]
    fn test_bounded_registry_evicts_least_recently_resolved() {
        let mut registry = HandleRegistry::with_limit(2);
        let a = registry.allocate("/a", HandleKind::Folder);
        let b = registry.allocate("/b", HandleKind::Folder);

        registry.resolve(&a).unwrap();
        let c = registry.allocate("/c", HandleKind::Folder);

        assert_eq!(registry.len(), 2);
        assert!(registry.resolve(&a).is_ok());
        assert!(registry.resolve(&b).is_err());
        assert!(registry.resolve(&c).is_ok());
    }
}
