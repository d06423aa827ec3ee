use std::time::{Duration, Instant};

pub const DEFAULT_THRESHOLD: f64 = 5.0;
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(3);

/// Filtro a doppia soglia sugli aggiornamenti di avanzamento.
///
/// Un aggiornamento passa solo se la percentuale si è mossa di almeno
/// `threshold` e sono trascorsi almeno `min_interval` dall'ultimo emesso.
/// Il 100% passa sempre, una sola volta, ed è l'ultimo valore emesso.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    threshold: f64,
    min_interval: Duration,
    last_percentage: f64,
    last_report: Option<Instant>,
    finished: bool,
}

impl ProgressThrottle {
    pub fn new(threshold: f64, min_interval: Duration) -> Self {
        Self {
            threshold,
            min_interval,
            last_percentage: 0.0,
            last_report: None,
            finished: false,
        }
    }

    pub fn last_percentage(&self) -> f64 {
        self.last_percentage
    }

    pub fn percentage(transferred: u64, total: u64) -> f64 {
        if total == 0 {
            return 100.0;
        }
        (transferred as f64 * 100.0 / total as f64).min(100.0)
    }

    /// Restituisce la percentuale da mostrare, se l'aggiornamento va emesso
    pub fn observe(&mut self, transferred: u64, total: u64, now: Instant) -> Option<f64> {
        if self.finished {
            return None;
        }

        let percentage = Self::percentage(transferred, total);
        if percentage >= 100.0 {
            self.finished = true;
            return Some(self.emit(100.0, now));
        }

        // mai all'indietro
        if percentage < self.last_percentage {
            return None;
        }

        let moved = percentage - self.last_percentage >= self.threshold;
        let waited = self
            .last_report
            .is_none_or(|last| now.saturating_duration_since(last) >= self.min_interval);

        if moved && waited {
            Some(self.emit(percentage, now))
        } else {
            None
        }
    }

    fn emit(&mut self, percentage: f64, now: Instant) -> f64 {
        self.last_percentage = percentage;
        self.last_report = Some(now);
        percentage
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_MIN_INTERVAL)
    }
}
