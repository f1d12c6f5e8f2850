use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;

use plan_cli::config::{AppConfig, Overrides};
use plan_cli::plan_file::PlanFile;
use plan_cli::report::{self, ListFormat};
use plan_cli::{app, logging};
use plan_core::{Catalog, PlanDraft, Step, SubmitError, Wizard};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Production planning: capture fabric plans step by step and keep a log of
/// submitted plans.
#[derive(Debug, Parser)]
#[command(name = "fabric-planner", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend (`json` or `sqlite`). Defaults to `json`.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Backend connection string.
    /// For json a file path, for SQLite a file path or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level or EnvFilter directive, e.g. `debug` or `plan_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enter a plan file through the wizard and submit it.
    Submit {
        plan: PathBuf,
    },
    /// Check a plan file without submitting it.
    Validate {
        plan: PathBuf,
        /// Only check this step (1-3).
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        step: Option<u8>,
    },
    /// List submitted plans.
    List {
        #[arg(long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
    /// Print the fabric, process and stage catalogs.
    Catalog,
}

// ─── commands ────────────────────────────────────────────────────────────────

async fn submit(config: &AppConfig, path: &Path) -> Result<()> {
    let plan = PlanFile::load(path)?;
    let registry = app::build_registry();
    let db_config = config.db_config();
    debug!("connecting to {} backend", db_config.backend);
    let repo = registry.create(&db_config).await?;

    let mut wizard = Wizard::new(Catalog::global());
    let replay = app::replay(&mut wizard, &plan);
    app::print_rejections(&replay.rejections, io::stderr())?;

    if let Some((step, result)) = &replay.blocked {
        report::render_step_result(*step, result, io::stderr())?;
        bail!("{} did not validate; nothing was submitted", step);
    }

    match wizard.submit(&*repo).await {
        Ok(submission) => {
            println!("Submitted plan {}", submission.id);
            Ok(())
        }
        Err(SubmitError::Invalid(result)) => {
            report::render_step_result(wizard.step(), &result, io::stderr())?;
            bail!("the plan is not valid; nothing was submitted")
        }
        Err(e) => Err(e).context("Failed to submit plan"),
    }
}

fn validate(path: &Path, step: Option<u8>) -> Result<()> {
    let plan = PlanFile::load(path)?;
    let mut draft = PlanDraft::new(Catalog::global());
    let rejections = app::fill_draft(&mut draft, &plan);
    app::print_rejections(&rejections, io::stderr())?;

    let only = step.and_then(|n| Step::from_number(usize::from(n)));
    let results = app::validate_plan(&draft, only);

    let mut stdout = io::stdout().lock();
    for (step, result) in &results {
        report::render_step_result(*step, result, &mut stdout)?;
    }
    if only.is_none_or(|s| s == Step::FabricDetails) && !draft.plan().fabrics.is_empty() {
        report::render_allocation(draft.plan(), &mut stdout)?;
    }

    if results.iter().all(|(_, r)| r.is_valid) {
        Ok(())
    } else {
        bail!("plan has validation errors")
    }
}

async fn list(config: &AppConfig, format: ListFormat) -> Result<()> {
    let registry = app::build_registry();
    let repo = registry.create(&config.db_config()).await?;
    let submissions = repo
        .list_all()
        .await
        .context("Failed to read submissions")?;
    report::render_submissions(&submissions, format, io::stdout().lock())
}

fn print_catalog() {
    let catalog = Catalog::global();
    println!("Fabrics:   {}", catalog.fabrics.join(", "));
    println!("Processes: {}", catalog.processes.join(", "));
    println!("Stages:    {}", catalog.stages.join(", "));
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_optional(cli.config.as_deref())?.with_overrides(Overrides {
        backend: cli.backend,
        db: cli.db,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });

    logging::init_logging(config.log_level.as_deref(), config.log_file.as_deref())?;

    if config.catalog.is_some() && Catalog::install(config.catalog()).is_err() {
        bail!("catalog was already in use before the configured one could be installed");
    }
    debug!(backend = %config.db_config().backend, "fabric-planner starting");

    match &cli.command {
        Command::Submit { plan } => submit(&config, plan).await,
        Command::Validate { plan, step } => validate(plan, *step),
        Command::List { format } => list(&config, *format).await,
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
    }
}
