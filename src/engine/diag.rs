use crate::model::{Period, PostId, WorkerId};
use chrono::NaiveDate;

/// Événement structuré émis pendant une génération.
#[derive(Debug, Clone)]
pub enum DiagEvent {
    Scored {
        worker: WorkerId,
        post: PostId,
        date: NaiveDate,
        score: f64,
    },
    Rejected {
        worker: WorkerId,
        post: PostId,
        date: NaiveDate,
        reason: String,
    },
    Assigned {
        worker: WorkerId,
        post: PostId,
        date: NaiveDate,
        relaxed: bool,
    },
    Unfilled {
        post: PostId,
        date: NaiveDate,
        period: Period,
    },
}

/// Collecteur injecté : le moteur reste une fonction pure, les tests
/// s'appuient sur les événements plutôt que sur du texte.
pub trait DiagSink {
    fn record(&mut self, event: DiagEvent);
}

/// Collecteur muet (défaut).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagSink for NullSink {
    fn record(&mut self, _event: DiagEvent) {}
}

/// Accumule les événements en mémoire.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<DiagEvent>,
}

impl DiagSink for MemorySink {
    fn record(&mut self, event: DiagEvent) {
        self.events.push(event);
    }
}
