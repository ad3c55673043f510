use crate::catalog::Catalog;
use crate::model::{Period, Post, Role, Worker};
use crate::time::is_weekend;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Un créneau à pourvoir : exactement un garde par couple (poste, date).
#[derive(Debug, Clone)]
pub struct DemandSlot {
    pub post: Post,
    pub date: NaiveDate,
}

/// Rang d'un rôle dans l'ordre de remplissage (1 = le plus critique).
pub(crate) fn role_priority(role: Option<&Role>) -> u8 {
    match role {
        Some(Role::ShiftManager) => 1,
        Some(Role::ShiftLeader) => 2,
        Some(Role::Guard) => 3,
        Some(Role::Custom(_)) | None => 9,
    }
}

/// Construit la liste des créneaux de la semaine cible.
///
/// Un poste week-end ne sort que vendredi/samedi ; un poste de semaine
/// disparaît ces jours-là si une variante week-end le remplace.
pub(crate) fn build(catalog: &Catalog, week_dates: &[NaiveDate]) -> Vec<DemandSlot> {
    let posts = catalog.posts();
    let mut slots = Vec::new();
    for &date in week_dates {
        let weekend = is_weekend(date);
        for post in posts {
            if post.weekend_only && !weekend {
                continue;
            }
            if !post.weekend_only && weekend {
                let shadowed = posts
                    .iter()
                    .any(|p| p.weekend_only && p.shadows.as_ref() == Some(&post.id));
                if shadowed {
                    continue;
                }
            }
            slots.push(DemandSlot {
                post: post.clone(),
                date,
            });
        }
    }
    slots.sort_by(|a, b| {
        role_priority(a.post.required_role.as_ref())
            .cmp(&role_priority(b.post.required_role.as_ref()))
            .then_with(|| a.date.cmp(&b.date))
            .then_with(|| a.post.id.cmp(&b.post.id))
    });
    slots
}

/// Plafonds de nuits hebdomadaires par rôle : répartit les créneaux de
/// nuit d'un rôle entre les gardes qui le portent.
#[derive(Debug)]
pub(crate) struct NightQuota {
    per_role: BTreeMap<Option<Role>, u32>,
    default_cap: u32,
}

impl NightQuota {
    pub fn compute(demand: &[DemandSlot], workers: &[Worker]) -> Self {
        let mut slots_per_role: BTreeMap<Option<Role>, u32> = BTreeMap::new();
        for slot in demand {
            if slot.post.period != Period::Night {
                continue;
            }
            *slots_per_role
                .entry(slot.post.required_role.clone())
                .or_insert(0) += 1;
        }

        let mut per_role = BTreeMap::new();
        for (role, slots) in &slots_per_role {
            let eligible = match role {
                None => workers.len(),
                Some(r) => workers.iter().filter(|w| w.roles.contains(r)).count(),
            }
            .max(1) as u32;
            per_role.insert(role.clone(), slots.div_ceil(eligible).max(1));
        }

        let total_nights: u32 = slots_per_role.values().sum();
        let default_cap = total_nights
            .div_ceil(workers.len().max(1) as u32)
            .max(1);

        Self {
            per_role,
            default_cap,
        }
    }

    pub fn cap_for(&self, role: Option<&Role>) -> u32 {
        self.per_role
            .get(&role.cloned())
            .copied()
            .unwrap_or(self.default_cap)
    }
}
