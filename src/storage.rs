use crate::engine::RunReport;
use crate::model::Worker;
use crate::time::week_anchor;
use anyhow::Context;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge une équipe depuis un support.
    fn load(&self) -> anyhow::Result<Vec<Worker>>;
    /// Sauvegarde de manière atomique.
    fn save(&self, workers: &[Worker]) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Vec<Worker>> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let workers: Vec<Worker> =
            serde_json::from_slice(&data).with_context(|| "parsing workers.json")?;
        Ok(workers)
    }

    fn save(&self, workers: &[Worker]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(workers)?;
        let mut tmp = NamedTempFile::new_in(
            self.path.parent().unwrap_or_else(|| Path::new(".")),
        )
        .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

/// Fusionne le résultat d'une génération dans l'équipe : les vacations
/// existantes de la semaine cible sont écartées avant l'ajout des
/// nouvelles, pour éviter tout doublon.
pub fn merge_run(workers: &mut [Worker], report: &RunReport, week_start: NaiveDate) {
    let anchor = week_anchor(week_start);
    for worker in workers.iter_mut() {
        let Some(new_shifts) = report.assignments.get(&worker.id) else {
            continue;
        };
        if new_shifts.is_empty() {
            continue;
        }
        worker.shifts.retain(|s| week_anchor(s.date) != anchor);
        worker.shifts.extend(new_shifts.iter().cloned());
    }
}
