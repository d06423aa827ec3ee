use std::{path::PathBuf, sync::Arc};

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::browser::SessionOrchestrator;
use crate::error::{BrowserError, Result};
use crate::menu::DEFAULT_PAGE_SIZE;
use crate::messenger::{InboundEvent, Messenger, UserId};
use crate::transfer::{TransferEvent, TransferLimits};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub owner_id: UserId,
    pub drives: Vec<PathBuf>,
    pub page_size: usize,
    /// 0 = nessun limite
    pub max_handles: usize,
    pub limits: TransferLimits,
}

impl ServerConfig {
    pub fn new(owner_id: UserId, drives: Vec<PathBuf>) -> Self {
        Self {
            owner_id,
            drives,
            page_size: DEFAULT_PAGE_SIZE,
            max_handles: 0,
            limits: TransferLimits::default(),
        }
    }
}

/// Solo il proprietario configurato può usare il bot
#[derive(Debug, Clone, Copy)]
pub struct OwnerGuard {
    owner: UserId,
}

impl OwnerGuard {
    pub fn new(owner: UserId) -> Self {
        Self { owner }
    }

    pub fn check(&self, event: &InboundEvent) -> Result<()> {
        if event.origin == self.owner {
            Ok(())
        } else {
            Err(BrowserError::Unauthorized(event.origin))
        }
    }
}

pub struct Server<M: Messenger> {
    pub config: Arc<ServerConfig>,
    guard: OwnerGuard,
    orchestrator: SessionOrchestrator<M>,
    transfer_events: mpsc::UnboundedReceiver<TransferEvent>,
}

impl<M: Messenger> Server<M> {
    pub fn new(config: ServerConfig, messenger: Arc<M>) -> Self {
        let config = Arc::new(config);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            guard: OwnerGuard::new(config.owner_id),
            orchestrator: SessionOrchestrator::new(config.clone(), messenger, events_tx),
            transfer_events: events_rx,
            config,
        }
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator<M> {
        &self.orchestrator
    }

    pub async fn dispatch(&mut self, event: InboundEvent) {
        match self.guard.check(&event) {
            Ok(()) => self.orchestrator.handle(event).await,
            Err(e) => self.orchestrator.reject(&event, &e).await,
        }
    }

    /// Serve gli eventi finché il canale in ingresso resta aperto, poi
    /// attende la chiusura dei trasferimenti ancora attivi.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<InboundEvent>) {
        info!(
            "Serving owner {} on {} drive(s)",
            self.config.owner_id,
            self.config.drives.len()
        );

        loop {
            tokio::select! {
                event = inbound.recv() => match event {
                    Some(event) => {
                        debug!("inbound event: {:?}", event.kind);
                        self.dispatch(event).await;
                    }
                    None => break,
                },
                Some(event) = self.transfer_events.recv() => {
                    self.orchestrator.on_transfer_event(event).await;
                }
            }
        }

        let pending = self.orchestrator.active_transfers();
        if pending > 0 {
            info!("Input closed, waiting for {} transfer(s)", pending);
        }
        while self.orchestrator.active_transfers() > 0 {
            match self.transfer_events.recv().await {
                Some(event) => self.orchestrator.on_transfer_event(event).await,
                None => {
                    warn!("Transfer channel closed with transfers still active");
                    break;
                }
            }
        }
        info!("Server stopped");
    }
}
