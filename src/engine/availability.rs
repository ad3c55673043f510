use crate::model::{Period, Worker};
use chrono::NaiveDate;

/// Préférence d'un garde pour un couple (date, période).
///
/// Sans dépôt de préférences pour la date, le garde est entièrement
/// ouvert ; seul un refus explicite l'exclut de la candidature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// Demande explicite à travailler ce créneau.
    Prefers,
    /// Aucune indication : disponible, priorité moyenne.
    Open,
    /// Refus explicite : exclu de la candidature.
    Unavailable,
}

impl Preference {
    /// Poids dans le score composite.
    pub fn weight(self) -> f64 {
        match self {
            Preference::Prefers => 1.0,
            Preference::Open => 0.5,
            Preference::Unavailable => 0.0,
        }
    }
}

/// Résout la préférence par consultation pure des dépôts du garde.
pub fn resolve_preference(worker: &Worker, date: NaiveDate, period: Period) -> Preference {
    let Some(day) = worker.availability_on(date) else {
        return Preference::Open;
    };
    match day.statuses.get(period.index()) {
        Some(Some(true)) => Preference::Prefers,
        Some(Some(false)) => Preference::Unavailable,
        _ => Preference::Open,
    }
}
