use std::collections::HashMap;
use std::path::PathBuf;

use crate::messenger::IncomingMedia;
use crate::transfer::TransferController;

use super::handles::HandleRegistry;
use super::navigation::NavigationSession;

/// Allegato in attesa di una scelta sovrascrivi/rinomina
#[derive(Debug, Clone)]
pub struct PendingMedia {
    pub media: IncomingMedia,
    pub destination: PathBuf,
}

pub type PendingKey = String;

/// Tutto lo stato in memoria del processo, posseduto dall'orchestratore
pub struct SessionState {
    pub handles: HandleRegistry,
    pub navigation: NavigationSession,
    pub transfers: TransferController,
    pub pending_media: HashMap<PendingKey, PendingMedia>,
}

impl SessionState {
    pub fn new(handles: HandleRegistry, transfers: TransferController) -> Self {
        Self {
            handles,
            navigation: NavigationSession::new(),
            transfers,
            pending_media: HashMap::new(),
        }
    }
}
