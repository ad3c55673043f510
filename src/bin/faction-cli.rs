#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use faction::{
    catalog::{load_catalog, save_catalog, Catalog},
    engine::{audit_rest, audit_sabbath, Engine, GenerateOptions},
    io,
    render::{SummaryRenderer, TextSummary},
    storage::{merge_run, JsonStorage, Storage},
    time::week_dates_from,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planification de postes de garde (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Écrire le catalogue d'exemple
    InitCatalog {
        #[arg(long)]
        out: String,
    },

    /// Valider un catalogue JSON
    CheckCatalog {
        #[arg(long)]
        catalog: String,
    },

    /// Importer des préférences depuis un CSV
    ImportAvailability {
        #[arg(long)]
        workers: String,
        #[arg(long)]
        csv: String,
    },

    /// Générer le planning d'une semaine
    Generate {
        #[arg(long)]
        workers: String,
        #[arg(long)]
        catalog: String,
        /// Premier jour de la semaine cible (YYYY-MM-DD)
        #[arg(long)]
        week_start: String,
        #[arg(long)]
        seed: Option<u64>,
        /// Désactive le bruit de départage
        #[arg(long)]
        no_jitter: bool,
        /// Ignore l'historique (simulation)
        #[arg(long)]
        fresh: bool,
        /// Rejoue la génération et compare les signatures
        #[arg(long)]
        self_check: bool,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        /// Fusionne le résultat dans le fichier d'équipe
        #[arg(long)]
        apply: bool,
    },

    /// Auditer repos minimal et Shabbat sur les vacations enregistrées
    Audit {
        #[arg(long)]
        workers: String,
        /// Premier jour de la semaine de référence (YYYY-MM-DD)
        #[arg(long)]
        week_start: String,
        /// Export CSV des constats (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::InitCatalog { out } => {
            save_catalog(&out, &Catalog::sample())?;
            println!("sample catalog written to {out}");
            0
        }
        Commands::CheckCatalog { catalog } => {
            let loaded = load_catalog(&catalog)?;
            println!("OK: {} post(s)", loaded.posts().len());
            0
        }
        Commands::ImportAvailability { workers, csv } => {
            let storage = JsonStorage::open(&workers)?;
            let mut team = storage.load()?;
            let rows = io::import_availability_csv(&csv)?;
            let count = rows.len();
            io::apply_availability(&mut team, rows)?;
            storage.save(&team)?;
            println!("imported {count} availability row(s)");
            0
        }
        Commands::Generate {
            workers,
            catalog,
            week_start,
            seed,
            no_jitter,
            fresh,
            self_check,
            out_json,
            out_csv,
            apply,
        } => {
            let storage = JsonStorage::open(&workers)?;
            let team = storage.load()?;
            let catalog = load_catalog(&catalog)?;
            let week_start = parse_date(&week_start)?;
            let week_dates = week_dates_from(week_start);

            let opts = GenerateOptions {
                force_fresh: fresh,
                seed,
                jitter: !no_jitter,
                self_check,
                ..GenerateOptions::default()
            };

            let engine = Engine::new(catalog);
            let report = engine.generate(&team, week_start, &week_dates, &opts);

            print!("{}", TextSummary.render(&team, &report, week_start));

            if let Some(path) = out_json {
                io::export_report_json(path, &report)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &team, &report)?;
            }
            if apply {
                let mut team = team;
                merge_run(&mut team, &report, week_start);
                storage.save(&team)?;
            }

            // Code 2 = WARNING/INCOMPLETE
            if report.errors.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::Audit {
            workers,
            week_start,
            report,
        } => {
            let storage = JsonStorage::open(&workers)?;
            let team = storage.load()?;
            let week_start = parse_date(&week_start)?;

            let rest = audit_rest(&team);
            let sabbath = audit_sabbath(&team, week_start);

            if rest.is_empty() && sabbath.is_empty() {
                println!("OK: no findings");
                0
            } else {
                eprintln!("Found {} finding(s)", rest.len() + sabbath.len());
                for f in &rest {
                    let name = team
                        .iter()
                        .find(|w| w.id == f.worker)
                        .map(|w| w.display_name.as_str())
                        .unwrap_or(f.worker.as_str());
                    eprintln!("rest: {} between {} and {}", name, f.first, f.second);
                }
                for s in &sabbath {
                    eprintln!("sabbath: {s}");
                }
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["kind", "worker", "detail"])?;
                    for f in &rest {
                        let detail = format!("{} / {}", f.first, f.second);
                        w.write_record(["rest", f.worker.as_str(), detail.as_str()])?;
                    }
                    for s in &sabbath {
                        w.write_record(["sabbath", "", s.as_str()])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
    };

    std::process::exit(code);
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}
