//! Prédicats indépendants du vérificateur de contraintes. Un échec
//! disqualifie le couple (garde, créneau), jamais l'exécution.

use crate::model::{Period, Worker};
use crate::time::{friday_on_or_after, longest_daily_run, rest_ok, shift_instants};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use std::collections::BTreeSet;

use super::demand::{DemandSlot, NightQuota};
use super::types::{RejectReason, RunState};

/// Plafond de vacations par semaine ancrée.
pub const MAX_WEEK_SHIFTS: usize = 6;
/// Plus longue suite de jours travaillés tolérée.
pub const MAX_CONSECUTIVE_DAYS: u32 = 6;
/// Plus longue suite de nuits tolérée.
pub const MAX_CONSECUTIVE_NIGHTS: u32 = 2;
/// Battement minimal entre deux vacations, en heures.
pub const MIN_REST_HOURS: i64 = 8;

/// Passe l'ensemble des contraintes pour une affectation hypothétique.
pub(crate) fn check(
    worker: &Worker,
    slot: &DemandSlot,
    state: &RunState,
    week_start: NaiveDate,
    quota: &NightQuota,
) -> Result<(), RejectReason> {
    let history = state.history_of(&worker.id);
    let assigned = state.assigned_of(&worker.id);

    if !slot.post.double_shift && assigned.iter().any(|s| s.date == slot.date) {
        return Err(RejectReason::SameDay);
    }

    let candidate = shift_instants(slot.date, slot.post.start_time, slot.post.end_time);
    if let Some(with) = rest_conflict(history.iter().chain(assigned.iter()), candidate) {
        return Err(RejectReason::RestConflict { with });
    }

    let mut days: BTreeSet<NaiveDate> = history
        .iter()
        .chain(assigned.iter())
        .map(|s| s.date)
        .collect();
    days.insert(slot.date);
    let run = longest_daily_run(&days);
    if run > MAX_CONSECUTIVE_DAYS {
        return Err(RejectReason::ConsecutiveDays { run });
    }

    let dates = history
        .iter()
        .chain(assigned.iter())
        .map(|s| s.date)
        .chain(std::iter::once(slot.date));
    if let Some((from, to)) = sabbath_streak(dates, week_start) {
        return Err(RejectReason::SabbathStreak { from, to });
    }

    if slot.post.period == Period::Night {
        let cap = quota.cap_for(slot.post.required_role.as_ref());
        let nights_in_week = state
            .assigned_of(&worker.id)
            .iter()
            .filter(|s| {
                s.period == Period::Night
                    && crate::time::week_anchor(s.date) == crate::time::week_anchor(week_start)
            })
            .count();
        if nights_in_week as u32 >= cap {
            return Err(RejectReason::NightQuota { limit: cap });
        }

        let mut nights: BTreeSet<NaiveDate> = history
            .iter()
            .chain(assigned.iter())
            .filter(|s| s.period == Period::Night)
            .map(|s| s.date)
            .collect();
        nights.insert(slot.date);
        let run = longest_daily_run(&nights);
        if run > MAX_CONSECUTIVE_NIGHTS {
            return Err(RejectReason::ConsecutiveNights { run });
        }
    }

    Ok(())
}

/// Première vacation en conflit de repos avec le créneau candidat.
pub(crate) fn rest_conflict<'a, I>(
    shifts: I,
    candidate: (NaiveDateTime, NaiveDateTime),
) -> Option<NaiveDate>
where
    I: IntoIterator<Item = &'a crate::model::ShiftAssignment>,
{
    shifts
        .into_iter()
        .find(|s| !rest_ok(s.instants(), candidate, MIN_REST_HOURS))
        .map(|s| s.date)
}

/// Détecte un enchaînement de quatre Shabbat travaillés sur la fenêtre
/// glissante ancrée au vendredi de la semaine cible.
///
/// Une vacation du vendredi marque son propre vendredi, une vacation du
/// samedi marque le vendredi de la veille. Retourne les bornes de la
/// fenêtre en cas de violation.
pub fn sabbath_streak<I>(dates: I, week_start: NaiveDate) -> Option<(NaiveDate, NaiveDate)>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut worked: BTreeSet<NaiveDate> = BTreeSet::new();
    for date in dates {
        match date.weekday() {
            Weekday::Fri => {
                worked.insert(date);
            }
            Weekday::Sat => {
                worked.insert(date - Duration::days(1));
            }
            _ => {}
        }
    }

    let target = friday_on_or_after(week_start);
    let window: Vec<NaiveDate> = (0..4)
        .rev()
        .map(|i| target - Duration::days(7 * i))
        .collect();
    if window.iter().all(|friday| worked.contains(friday)) {
        Some((window[0], window[3]))
    } else {
        None
    }
}
