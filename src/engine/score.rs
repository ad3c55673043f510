use crate::model::{Worker, WorkerId};
use crate::time::week_anchor;
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::availability::Preference;
use super::demand::DemandSlot;
use super::types::RunState;

/// Candidat scoré pour un créneau, prêt pour le tri de départage.
#[derive(Debug)]
pub(crate) struct Candidate<'a> {
    pub worker: &'a Worker,
    pub score: f64,
    pub week_count: usize,
    pub night_count: usize,
}

/// Source de bruit de départage. Avec une base, le générateur est dérivé
/// par (garde, date) : le bruit ne dépend pas de l'ordre de parcours.
#[derive(Debug, Clone, Copy)]
pub(crate) enum JitterSource {
    Off,
    Mixed(u64),
}

impl JitterSource {
    pub fn new(jitter: bool, seed: Option<u64>) -> Self {
        if !jitter {
            return Self::Off;
        }
        Self::Mixed(seed.unwrap_or_else(rand::random))
    }

    pub fn sample(&self, worker: &WorkerId, date: NaiveDate) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Mixed(base) => {
                let mixed =
                    base ^ fnv1a(worker.as_str()) ^ (i64::from(date.num_days_from_ce()) as u64);
                let mut rng = SmallRng::seed_from_u64(mixed);
                rng.random_range(-10.0..=10.0)
            }
        }
    }
}

fn fnv1a(s: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in s.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Score composite d'un couple (garde, créneau).
///
/// Préférence dominante, expérience en appoint, pénalités de charge, de
/// nuits, de monotonie de poste et de période, correction d'équité et
/// pénalité de jours adjacents, bruit de départage en dernier.
pub(crate) fn score_candidate<'a>(
    worker: &'a Worker,
    slot: &DemandSlot,
    preference: Preference,
    state: &RunState,
    week_start: NaiveDate,
    ideal_per_worker: usize,
    jitter: &JitterSource,
) -> Candidate<'a> {
    let anchor = week_anchor(week_start);
    let in_week = |date: NaiveDate| week_anchor(date) == anchor;

    let history = state.history_of(&worker.id);
    let assigned = state.assigned_of(&worker.id);

    let experience = history.len();
    let week_count = state.assigned_in_week(&worker.id, week_start);
    let night_count = assigned
        .iter()
        .filter(|s| in_week(s.date) && s.period == crate::model::Period::Night)
        .count();
    let same_post = assigned
        .iter()
        .filter(|s| in_week(s.date) && s.post_id == slot.post.id)
        .count();
    let same_period = history
        .iter()
        .chain(assigned.iter())
        .filter(|s| in_week(s.date) && s.period == slot.post.period)
        .count();

    let mut score = preference.weight() * 1000.0 + experience as f64
        - 120.0 * week_count as f64
        - 500.0 * night_count as f64
        - 400.0 * same_post as f64
        - 400.0 * same_period as f64;

    let week_total = state.week_total(&worker.id, week_start);
    score += (ideal_per_worker as f64 - week_total as f64) * 200.0;
    if week_total >= ideal_per_worker + 1 {
        score -= 2000.0;
    }

    let day_before = slot.date - Duration::days(1);
    let day_after = slot.date + Duration::days(1);
    if assigned
        .iter()
        .any(|s| s.date == day_before || s.date == day_after)
    {
        score -= 300.0;
    }

    score += jitter.sample(&worker.id, slot.date);

    Candidate {
        worker,
        score,
        week_count,
        night_count,
    }
}
