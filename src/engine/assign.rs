//! Boucle centrale d'affectation : gloutonne, sans retour arrière. Le
//! premier candidat qui survit à toutes les contraintes est commis.

use crate::model::{Period, ShiftAssignment, Worker};
use chrono::NaiveDate;

use super::availability::{resolve_preference, Preference};
use super::constraints::{self, MAX_WEEK_SHIFTS};
use super::demand::{DemandSlot, NightQuota};
use super::diag::{DiagEvent, DiagSink};
use super::score::{score_candidate, Candidate, JitterSource};
use super::types::{GenerateOptions, RunState};

pub(crate) fn fill_demand(
    demand: &[DemandSlot],
    workers: &[Worker],
    week_start: NaiveDate,
    quota: &NightQuota,
    ideal_per_worker: usize,
    jitter: &JitterSource,
    state: &mut RunState,
    opts: &GenerateOptions,
    sink: &mut dyn DiagSink,
) {
    for slot in demand {
        let period = slot.post.period;

        let mut candidates: Vec<Candidate<'_>> = workers
            .iter()
            .filter(|w| w.qualifies_for(&slot.post))
            .filter_map(|w| {
                let preference = resolve_preference(w, slot.date, period);
                if preference == Preference::Unavailable {
                    return None;
                }
                if state.week_total(&w.id, week_start) >= MAX_WEEK_SHIFTS {
                    return None;
                }
                Some(score_candidate(
                    w,
                    slot,
                    preference,
                    state,
                    week_start,
                    ideal_per_worker,
                    jitter,
                ))
            })
            .filter(|c| {
                period != Period::Night
                    || (c.night_count as u32) < quota.cap_for(slot.post.required_role.as_ref())
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.week_count.cmp(&b.week_count))
                .then_with(|| a.worker.id.cmp(&b.worker.id))
        });

        if debug_enabled(opts) {
            for c in &candidates {
                if debug_covers(opts, c.worker) {
                    sink.record(DiagEvent::Scored {
                        worker: c.worker.id.clone(),
                        post: slot.post.id.clone(),
                        date: slot.date,
                        score: c.score,
                    });
                }
            }
        }

        let mut filled = false;
        for candidate in &candidates {
            match constraints::check(candidate.worker, slot, state, week_start, quota) {
                Ok(()) => {
                    let shift = ShiftAssignment::new(&slot.post, slot.date);
                    tracing::debug!(
                        worker = %candidate.worker.handle,
                        post = %slot.post.id.as_str(),
                        date = %slot.date,
                        "slot filled"
                    );
                    sink.record(DiagEvent::Assigned {
                        worker: candidate.worker.id.clone(),
                        post: slot.post.id.clone(),
                        date: slot.date,
                        relaxed: false,
                    });
                    state.commit(&candidate.worker.id, shift);
                    filled = true;
                    break;
                }
                Err(reason) => {
                    if debug_enabled(opts) && debug_covers(opts, candidate.worker) {
                        sink.record(DiagEvent::Rejected {
                            worker: candidate.worker.id.clone(),
                            post: slot.post.id.clone(),
                            date: slot.date,
                            reason: reason.to_string(),
                        });
                    }
                }
            }
        }

        if !filled {
            tracing::warn!(
                post = %slot.post.id.as_str(),
                date = %slot.date,
                candidates = candidates.len(),
                "no candidate survived the constraint checks"
            );
            sink.record(DiagEvent::Unfilled {
                post: slot.post.id.clone(),
                date: slot.date,
                period,
            });
            state.unfilled.push(slot.clone());
        }
    }
}

fn debug_enabled(opts: &GenerateOptions) -> bool {
    opts.debug
}

fn debug_covers(opts: &GenerateOptions, worker: &Worker) -> bool {
    opts.debug_worker
        .as_ref()
        .map_or(true, |id| id == &worker.id)
}
