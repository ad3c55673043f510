//! Moteur de génération du planning hebdomadaire.
//!
//! Calcul pur, synchrone et monothread : catalogue + gardes en entrée,
//! rapport complet en sortie. Les issues métier (créneau impourvable,
//! relâchement toléré) sont des chaînes du rapport, jamais des `Err`.

mod assign;
mod audit;
mod availability;
mod constraints;
mod demand;
mod diag;
mod relax;
mod report;
mod score;
mod types;

pub use audit::{audit_rest, audit_sabbath, RestFinding};
pub use availability::{resolve_preference, Preference};
pub use constraints::{
    sabbath_streak, MAX_CONSECUTIVE_DAYS, MAX_CONSECUTIVE_NIGHTS, MAX_WEEK_SHIFTS, MIN_REST_HOURS,
};
pub use demand::DemandSlot;
pub use diag::{DiagEvent, DiagSink, MemorySink, NullSink};
pub use report::assignment_signature;
pub use types::{GenerateOptions, RejectReason, RunReport};

use crate::catalog::Catalog;
use crate::model::Worker;
use chrono::NaiveDate;
use demand::NightQuota;
use score::JitterSource;
use types::RunState;

/// Moteur : encapsule un catalogue validé.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Catalog,
}

impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Liste des créneaux à pourvoir pour les dates données, dans l'ordre
    /// déterministe de remplissage (rôle critique, date, poste).
    pub fn demand_for(&self, week_dates: &[NaiveDate]) -> Vec<DemandSlot> {
        demand::build(&self.catalog, week_dates)
    }

    /// Génère le planning de la semaine cible.
    ///
    /// Chaque appel est une simulation indépendante : relancer sur le
    /// même instantané ne tient pas compte du premier résultat. Pour un
    /// comportement incrémental, fusionner d'abord via
    /// [`crate::storage::merge_run`].
    pub fn generate(
        &self,
        workers: &[Worker],
        week_start: NaiveDate,
        week_dates: &[NaiveDate],
        opts: &GenerateOptions,
    ) -> RunReport {
        self.generate_with_sink(workers, week_start, week_dates, opts, &mut NullSink)
    }

    /// Variante avec collecteur de diagnostics injecté.
    pub fn generate_with_sink(
        &self,
        workers: &[Worker],
        week_start: NaiveDate,
        week_dates: &[NaiveDate],
        opts: &GenerateOptions,
        sink: &mut dyn DiagSink,
    ) -> RunReport {
        let mut first = self.run_once(workers, week_start, week_dates, opts, sink);

        if opts.self_check {
            let second = self.run_once(workers, week_start, week_dates, opts, &mut NullSink);
            if let Some(warning) = report::consistency_warning(&first, &second) {
                tracing::warn!("{warning}");
                first.warnings.push(warning);
            }
        }

        first
    }

    fn run_once(
        &self,
        workers: &[Worker],
        week_start: NaiveDate,
        week_dates: &[NaiveDate],
        opts: &GenerateOptions,
        sink: &mut dyn DiagSink,
    ) -> RunReport {
        tracing::info!(
            workers = workers.len(),
            posts = self.catalog.posts().len(),
            %week_start,
            "starting schedule generation"
        );

        let demand = demand::build(&self.catalog, week_dates);
        let quota = NightQuota::compute(&demand, workers);
        let ideal_per_worker = demand.len().div_ceil(workers.len().max(1)).max(1);
        let jitter = JitterSource::new(opts.jitter, opts.seed);

        let mut state = RunState::new(workers, opts.force_fresh);
        assign::fill_demand(
            &demand,
            workers,
            week_start,
            &quota,
            ideal_per_worker,
            &jitter,
            &mut state,
            opts,
            sink,
        );
        relax::relax_unfilled(workers, week_start, &mut state, sink);
        report::finalize(state, workers, week_start)
    }
}
