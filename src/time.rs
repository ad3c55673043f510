//! Aides calendaires : semaine ancrée sur le vendredi, instants de
//! vacation avec report de minuit, écarts de repos.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

/// Vendredi précédant (ou égal à) la date : clef de semaine pour les
/// plafonds hebdomadaires.
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    let back = (date.weekday().num_days_from_sunday() + 2) % 7;
    date - Duration::days(i64::from(back))
}

/// Vendredi suivant (ou égal à) la date : ancre de la fenêtre Shabbat.
pub fn friday_on_or_after(date: NaiveDate) -> NaiveDate {
    let fwd = (5 + 7 - date.weekday().num_days_from_sunday()) % 7;
    date + Duration::days(i64::from(fwd))
}

/// Les 7 dates de la semaine cible à partir de son premier jour.
pub fn week_dates_from(start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|i| start + Duration::days(i)).collect()
}

/// Vendredi ou samedi.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Fri | chrono::Weekday::Sat)
}

/// Instants de début/fin d'une vacation ; une fin numériquement
/// inférieure ou égale au début bascule au jour suivant.
pub fn shift_instants(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let start_dt = date.and_time(start);
    let end_date = if end <= start {
        date.succ_opt().unwrap_or(date)
    } else {
        date
    };
    (start_dt, end_date.and_time(end))
}

/// Vrai si les deux vacations ne se chevauchent pas et laissent au moins
/// `min_hours` heures de battement, dans un ordre temporel ou l'autre.
pub fn rest_ok(
    a: (NaiveDateTime, NaiveDateTime),
    b: (NaiveDateTime, NaiveDateTime),
    min_hours: i64,
) -> bool {
    if a.0 < b.1 && b.0 < a.1 {
        return false;
    }
    let gap = if a.1 <= b.0 { b.0 - a.1 } else { a.0 - b.1 };
    gap >= Duration::hours(min_hours)
}

/// Longueur de la plus longue suite de dates consécutives.
pub fn longest_daily_run(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut current = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &date in dates {
        current = match prev {
            Some(p) if date - p == Duration::days(1) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        prev = Some(date);
    }
    longest
}
