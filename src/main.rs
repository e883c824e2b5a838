//! Urbis import console
//!
//! Validates city batch files locally, uploads clean batches to the import
//! service and shows the import history.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use urbis_lib::modules::data_import::{render_grouped, BatchDocument, BatchValidator, ImportOutcome};
use urbis_lib::modules::jobs::HistoryView;
use urbis_lib::shared::config::ENV_API_BASE_URL;
use urbis_lib::shared::utils::init_logger;
use urbis_lib::shared::AppConfig;
use urbis_lib::{log_error, log_info, log_warn, ImportConsole};

const DEFAULT_WAIT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// City bulk import console
#[derive(Parser, Debug)]
#[command(name = "urbis")]
#[command(about = "Validate and import city batches, track import jobs", long_about = None)]
struct Args {
    /// Base URL of the import service
    #[arg(long, env = ENV_API_BASE_URL)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a batch file without uploading it
    Validate {
        /// JSON file holding an array of cities
        file: PathBuf,
    },
    /// Validate and upload a batch file
    Import {
        file: PathBuf,

        /// Keep polling the history until the displayed jobs have finished
        #[arg(long)]
        wait: bool,
    },
    /// Show one page of the import history
    History {
        /// 0-based page index
        #[arg(short, long, default_value_t = 0)]
        page: u32,

        /// Rows per page (defaults to URBIS_HISTORY_PAGE_SIZE)
        #[arg(short, long)]
        size: Option<u32>,
    },
    /// Check that referenced coordinates and governors exist
    CheckRefs {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    init_logger();

    if let Err(e) = run(Args::parse()).await {
        log_error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(url) = args.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    log_info!("Using import service at {}", config.api_base_url);

    match args.command {
        Command::Validate { file } => validate(file).await,
        Command::Import { file, wait } => import(config, file, wait).await,
        Command::History { page, size } => history(config, page, size).await,
        Command::CheckRefs { file } => check_refs(config, file).await,
    }
}

async fn validate(file: PathBuf) -> Result<()> {
    let document = BatchDocument::load(&file).await?;
    let report = BatchValidator::validate_records(document.records());

    if report.ok() {
        println!("{}: {} records, no problems found", document.name(), report.record_count());
        return Ok(());
    }

    print!("{}", render_grouped(report.diagnostics()));
    bail!(
        "{} problems in {} records",
        report.diagnostics().len(),
        report.record_count()
    )
}

async fn import(mut config: AppConfig, file: PathBuf, wait: bool) -> Result<()> {
    if wait && config.poll_interval.is_none() {
        config.poll_interval = Some(DEFAULT_WAIT_POLL_INTERVAL);
    }
    let console = ImportConsole::from_config(config)?;
    let mut session = console.new_session();

    let problems = session.load_file(&file).await?;
    if problems > 0 {
        print!("{}", render_grouped(session.displayed_diagnostics()));
        bail!("Upload blocked by {} local problems", problems);
    }

    let outcome = session.upload().await?.clone();
    println!("{}", outcome);
    if let ImportOutcome::RejectedByValidation { items, .. } = &outcome {
        print!("{}", render_grouped(items));
    }

    if wait && outcome.is_accepted() {
        wait_for_jobs(&console).await;
    }

    print_history(&console.tracker.view().await);

    if outcome.is_accepted() {
        Ok(())
    } else {
        bail!("Import was not accepted")
    }
}

async fn wait_for_jobs(console: &ImportConsole) {
    let check_every = console
        .config
        .poll_interval
        .unwrap_or(DEFAULT_WAIT_POLL_INTERVAL);
    // the CLI has no push channel, so only polling runs
    let tasks = console.start_background(None);

    log_info!("Waiting for import jobs to finish");
    tokio::select! {
        _ = console.wait_until_settled(check_every) => {}
        _ = tokio::signal::ctrl_c() => log_warn!("Stopped waiting for import jobs"),
    }

    for task in tasks {
        task.shutdown().await;
    }
}

async fn history(config: AppConfig, page: u32, size: Option<u32>) -> Result<()> {
    let size = size.unwrap_or(config.history_page_size);
    let console = ImportConsole::from_config(config)?;
    console.tracker.open_page(page, size).await?;
    print_history(&console.tracker.view().await);
    Ok(())
}

async fn check_refs(config: AppConfig, file: PathBuf) -> Result<()> {
    let document = BatchDocument::load(&file).await?;
    let batch = match BatchValidator::validate_records(document.records()).into_validated() {
        Ok(batch) => batch,
        Err(diagnostics) => {
            print!("{}", render_grouped(&diagnostics));
            bail!("Fix local problems before checking references");
        }
    };

    let console = ImportConsole::from_config(config)?;
    let missing = console.reference_checks.check_batch(&batch).await;
    if missing.is_empty() {
        println!("All referenced coordinates and governors exist");
    } else {
        print!("{}", render_grouped(&missing));
    }
    Ok(())
}

fn print_history(view: &HistoryView) {
    println!(
        "Imports {}-{} of {} (page {}/{})",
        view.from,
        view.to,
        view.total_elements,
        view.page.saturating_add(1),
        view.total_pages.max(1)
    );
    for op in &view.rows {
        println!(
            "  #{:<6} {:<8} added={:<6} started={} finished={}",
            op.id,
            op.status.to_string(),
            op.added_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            op.started_at.format("%Y-%m-%d %H:%M:%S"),
            op.finished_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
        if let Some(error) = &op.error_message {
            println!("          {}", error);
        }
    }
}
