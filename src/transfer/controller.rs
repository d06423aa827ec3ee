use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::error::{BrowserError, Result};
use crate::messenger::{ConversationId, MessageId};

use super::throttle::ProgressThrottle;

pub type TransferKey = String;

/// 2 GiB
pub const DEFAULT_MAX_TRANSFER_SIZE: u64 = 2 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Dal filesystem verso la chat
    Upload,
    /// Dalla chat verso il filesystem
    Download,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed,
    Cancelled,
    Failed(String),
}

/// Messaggio di avanzamento da aggiornare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTarget {
    pub conversation: ConversationId,
    pub message_id: MessageId,
}

/// Eventi consegnati al loop principale dai trasferimenti in corso
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    Progress {
        key: TransferKey,
        direction: Direction,
        target: ProgressTarget,
        percentage: f64,
    },
    Finished {
        key: TransferKey,
        outcome: TransferOutcome,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct TransferLimits {
    pub max_size: u64,
    pub threshold: f64,
    pub min_interval: Duration,
}

impl Default for TransferLimits {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_TRANSFER_SIZE,
            threshold: super::throttle::DEFAULT_THRESHOLD,
            min_interval: super::throttle::DEFAULT_MIN_INTERVAL,
        }
    }
}

#[derive(Debug)]
pub struct TransferSession {
    pub key: TransferKey,
    pub direction: Direction,
    pub target: ProgressTarget,
    pub path: PathBuf,
    cancel_requested: Arc<AtomicBool>,
    throttle: Arc<Mutex<ProgressThrottle>>,
}

impl TransferSession {
    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    pub fn last_reported_percentage(&self) -> f64 {
        lock_throttle(&self.throttle).last_percentage()
    }
}

/// Callback di avanzamento passato alla primitiva di trasferimento.
///
/// Può essere invocato da qualsiasi thread: non tocca mai lo stato della UI,
/// accoda soltanto un [`TransferEvent::Progress`] verso il loop.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    key: TransferKey,
    direction: Direction,
    target: ProgressTarget,
    cancel_requested: Arc<AtomicBool>,
    throttle: Arc<Mutex<ProgressThrottle>>,
    events: UnboundedSender<TransferEvent>,
}

impl ProgressSink {
    /// Un `Err(Cancelled)` impone alla primitiva di non schedulare altri blocchi
    pub fn report(&self, transferred: u64, total: u64) -> Result<()> {
        if self.is_cancelled() {
            debug!("Transfer {} observed cancellation", self.key);
            return Err(BrowserError::Cancelled);
        }

        // l'invio avviene sotto lock per non riordinare gli aggiornamenti
        let mut throttle = lock_throttle(&self.throttle);
        if let Some(percentage) = throttle.observe(transferred, total, Instant::now()) {
            let event = TransferEvent::Progress {
                key: self.key.clone(),
                direction: self.direction,
                target: self.target,
                percentage,
            };
            if self.events.send(event).is_err() {
                debug!("Event loop closed, dropping progress for {}", self.key);
            }
        }

        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }
}

fn lock_throttle(
    throttle: &Mutex<ProgressThrottle>,
) -> std::sync::MutexGuard<'_, ProgressThrottle> {
    throttle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Al massimo un trasferimento attivo per chiave
pub struct TransferController {
    limits: TransferLimits,
    sessions: HashMap<TransferKey, TransferSession>,
    events: UnboundedSender<TransferEvent>,
}

impl TransferController {
    pub fn new(limits: TransferLimits, events: UnboundedSender<TransferEvent>) -> Self {
        Self {
            limits,
            sessions: HashMap::new(),
            events,
        }
    }

    pub fn limits(&self) -> &TransferLimits {
        &self.limits
    }

    /// Verifica dimensione e chiave senza creare alcuna sessione
    pub fn admit(&self, key: &str, size: u64) -> Result<()> {
        if size > self.limits.max_size {
            warn!(
                "Transfer {} rejected: {} bytes exceeds limit of {}",
                key, size, self.limits.max_size
            );
            return Err(BrowserError::SizeExceeded {
                size,
                limit: self.limits.max_size,
            });
        }
        if self.sessions.contains_key(key) {
            warn!("Transfer {} rejected: key already in use", key);
            return Err(BrowserError::TransferActive(key.to_string()));
        }
        Ok(())
    }

    /// Avvia il trasferimento su un task separato.
    ///
    /// L'esito arriva sia dal `JoinHandle` sia come [`TransferEvent::Finished`]
    /// sul canale del loop; la sessione resta registrata finché il loop non
    /// chiama [`TransferController::finish`].
    pub fn start<F, Fut>(
        &mut self,
        key: TransferKey,
        direction: Direction,
        size: u64,
        target: ProgressTarget,
        path: PathBuf,
        transfer: F,
    ) -> Result<JoinHandle<TransferOutcome>>
    where
        F: FnOnce(ProgressSink) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.admit(&key, size)?;

        let cancel_requested = Arc::new(AtomicBool::new(false));
        let throttle = Arc::new(Mutex::new(ProgressThrottle::new(
            self.limits.threshold,
            self.limits.min_interval,
        )));

        let sink = ProgressSink {
            key: key.clone(),
            direction,
            target,
            cancel_requested: cancel_requested.clone(),
            throttle: throttle.clone(),
            events: self.events.clone(),
        };

        info!(
            "Starting {:?} {} for {:?} ({} bytes)",
            direction, key, path, size
        );

        self.sessions.insert(
            key.clone(),
            TransferSession {
                key: key.clone(),
                direction,
                target,
                path,
                cancel_requested: cancel_requested.clone(),
                throttle,
            },
        );

        let work = tokio::spawn(transfer(sink));
        let events = self.events.clone();

        Ok(tokio::spawn(async move {
            let outcome = match work.await {
                Ok(Ok(())) => TransferOutcome::Completed,
                Ok(Err(BrowserError::Cancelled)) => TransferOutcome::Cancelled,
                Ok(Err(_)) if cancel_requested.load(Ordering::Acquire) => {
                    TransferOutcome::Cancelled
                }
                Ok(Err(e)) => {
                    warn!("Transfer {} failed: {}", key, e);
                    TransferOutcome::Failed(e.to_string())
                }
                Err(e) => {
                    error!("Transfer task {} aborted: {}", key, e);
                    TransferOutcome::Failed("transfer task aborted".to_string())
                }
            };

            info!("Transfer {} finished: {:?}", key, outcome);
            let finished = TransferEvent::Finished {
                key,
                outcome: outcome.clone(),
            };
            if events.send(finished).is_err() {
                debug!("Event loop closed before transfer completion was delivered");
            }
            outcome
        }))
    }

    /// Idempotente: richiederla due volte equivale a una
    pub fn cancel(&self, key: &str) -> bool {
        match self.sessions.get(key) {
            Some(session) => {
                session.cancel_requested.store(true, Ordering::Release);
                info!("Cancellation requested for transfer {}", key);
                true
            }
            None => {
                warn!("Transfer not found for cancel: {}", key);
                false
            }
        }
    }

    /// Distrugge la sessione e libera la chiave
    pub fn finish(&mut self, key: &str) -> Option<TransferSession> {
        let session = self.sessions.remove(key);
        if session.is_some() {
            debug!("Released transfer key {}", key);
        }
        session
    }

    pub fn get(&self, key: &str) -> Option<&TransferSession> {
        self.sessions.get(key)
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Vero se un download attivo sta scrivendo su `path`
    pub fn is_writing(&self, path: &Path) -> bool {
        self.sessions
            .values()
            .any(|session| session.direction == Direction::Download && session.path == path)
    }
}
