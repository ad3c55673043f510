//! Passe de repli : uniquement les créneaux non pourvus du rôle le plus
//! critique, avec un jeu de contraintes réduit. Le repos minimal reste
//! inviolable et tout succès est consigné en avertissement.

use crate::model::{Role, ShiftAssignment, Worker};
use crate::time::shift_instants;
use chrono::NaiveDate;

use super::constraints::{rest_conflict, MAX_WEEK_SHIFTS};
use super::demand::DemandSlot;
use super::diag::{DiagEvent, DiagSink};
use super::types::RunState;

pub(crate) fn relax_unfilled(
    workers: &[Worker],
    week_start: NaiveDate,
    state: &mut RunState,
    sink: &mut dyn DiagSink,
) {
    let pending: Vec<DemandSlot> = state
        .unfilled
        .iter()
        .filter(|slot| slot.post.required_role == Some(Role::ShiftManager))
        .cloned()
        .collect();

    for slot in pending {
        let mut candidates: Vec<&Worker> = workers
            .iter()
            .filter(|w| w.qualifies_for(&slot.post))
            .filter(|w| {
                super::availability::resolve_preference(w, slot.date, slot.post.period)
                    != super::availability::Preference::Unavailable
            })
            .filter(|w| state.week_total(&w.id, week_start) < MAX_WEEK_SHIFTS)
            .collect();
        candidates.sort_by(|a, b| {
            state
                .assigned_in_week(&a.id, week_start)
                .cmp(&state.assigned_in_week(&b.id, week_start))
                .then_with(|| a.id.cmp(&b.id))
        });

        for worker in candidates {
            let candidate = shift_instants(slot.date, slot.post.start_time, slot.post.end_time);
            let others = state
                .history_of(&worker.id)
                .iter()
                .chain(state.assigned_of(&worker.id).iter());
            if rest_conflict(others, candidate).is_some() {
                continue;
            }

            let mut shift = ShiftAssignment::new(&slot.post, slot.date);
            shift.remark = Some("assigned with relaxed constraints".to_owned());
            tracing::warn!(
                worker = %worker.handle,
                post = %slot.post.id.as_str(),
                date = %slot.date,
                "relaxed assignment"
            );
            sink.record(DiagEvent::Assigned {
                worker: worker.id.clone(),
                post: slot.post.id.clone(),
                date: slot.date,
                relaxed: true,
            });
            state.warnings.push(format!(
                "relaxed assignment: {} covers post \"{}\" on {} ({})",
                worker.display_name, slot.post.title, slot.date, slot.post.period
            ));
            state.commit(&worker.id, shift);
            state
                .unfilled
                .retain(|u| !(u.post.id == slot.post.id && u.date == slot.date));
            break;
        }
    }
}
