//! rerank-parity entrypoint.

use anyhow::Context;
use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use parity::backend::{ReferenceBackend, ServedBackend};
use parity::cli::{Cli, CompareArgs, Commands};
use parity::config::Config;
use parity::fixture::{TestCase, load_test_cases};
use parity::report::{self, BackendRun, BackendRunStats, RunSummary, console};
use parity::runner::{compare_runs, failed_run, run_backend};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            tracing::error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = cli.paths.apply(Config::from_env()?);
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Served => {
            let cases = load_cases(&config)?;
            let run = run_served(&config, &cases).await?;
            print_run(&run);
        }
        Commands::Reference => {
            let cases = load_cases(&config)?;
            let run = run_reference(&config, &cases).await?;
            print_run(&run);
        }
        Commands::Compare(args) => run_compare(&config, &args).await?,
        Commands::Config => show_config(&config),
    }

    Ok(())
}

fn load_cases(config: &Config) -> anyhow::Result<Vec<TestCase>> {
    let cases = load_test_cases(&config.fixtures_dir).with_context(|| {
        format!(
            "failed to load fixtures from {}",
            config.fixtures_dir.display()
        )
    })?;

    if cases.is_empty() {
        tracing::warn!(
            dir = %config.fixtures_dir.display(),
            "No test_*.json fixtures found"
        );
    } else {
        tracing::info!(count = cases.len(), "Loaded test cases");
    }

    Ok(cases)
}

async fn run_served(config: &Config, cases: &[TestCase]) -> anyhow::Result<BackendRun> {
    console::print_header("Served reranker");

    let backend = ServedBackend::new(config.served_config())
        .context("failed to build HTTP client for the served backend")?;

    tracing::info!(
        url = %config.served_url,
        model = %config.model_name,
        timeout_secs = config.timeout.as_secs(),
        "Running served backend"
    );

    let run = run_backend(&backend, cases).await;
    save_run(config, ServedBackend::NAME, &run)?;
    Ok(run)
}

async fn run_reference(config: &Config, cases: &[TestCase]) -> anyhow::Result<BackendRun> {
    console::print_header("Reference reranker");

    let reranker_config = config.reranker_config();
    if reranker_config.model_path.is_none() {
        tracing::warn!(
            "No {} configured, reference backend runs in stub mode",
            Config::ENV_RERANKER_PATH
        );
    }

    let run = match ReferenceBackend::load(reranker_config) {
        Ok(backend) => run_backend(&backend, cases).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load reference reranker");
            failed_run(cases, &e.to_string())
        }
    };

    save_run(config, ReferenceBackend::NAME, &run)?;
    Ok(run)
}

fn save_run(config: &Config, backend: &str, run: &BackendRun) -> anyhow::Result<()> {
    let path = config.backend_results_path(backend);
    report::write_json(&path, run)
        .with_context(|| format!("failed to write {backend} results"))?;
    Ok(())
}

fn print_run(run: &BackendRun) {
    for entry in run.values() {
        console::print_test_case(&entry.test_case);
        console::print_backend_outcome("Result", &entry.result);
    }
    console::print_backend_summary(&BackendRunStats::from_run(run));
}

/// Existing results are reused unless `--rerun` is given.
async fn run_compare(config: &Config, args: &CompareArgs) -> anyhow::Result<()> {
    let cases = load_cases(config)?;

    let served = match reuse_run(config, ServedBackend::NAME, args.rerun)? {
        Some(run) => run,
        None => run_served(config, &cases).await?,
    };
    let reference = match reuse_run(config, ReferenceBackend::NAME, args.rerun)? {
        Some(run) => run,
        None => run_reference(config, &cases).await?,
    };

    println!();
    console::print_header("Comparison");

    let comparison = compare_runs(&cases, &served, &reference);
    if comparison.is_empty() {
        tracing::warn!("No test cases present in both runs");
    }

    for entry in comparison.values() {
        console::print_comparison(entry);
    }

    let summary = RunSummary::from_report(&comparison);

    report::write_json(&config.comparison_path(), &comparison)
        .context("failed to write comparison results")?;
    report::write_json(&config.summary_path(), &summary).context("failed to write summary")?;

    console::print_summary(&summary);
    Ok(())
}

fn reuse_run(config: &Config, backend: &str, rerun: bool) -> anyhow::Result<Option<BackendRun>> {
    if rerun {
        return Ok(None);
    }

    let path = config.backend_results_path(backend);
    let run = report::load_backend_run(&path)
        .with_context(|| format!("failed to read existing {backend} results"))?;

    if let Some(ref run) = run {
        tracing::info!(
            backend,
            path = %path.display(),
            test_cases = run.len(),
            "Reusing existing results"
        );
    }

    Ok(run)
}

fn show_config(config: &Config) {
    console::print_header("Configuration");
    println!("Served URL:     {}", config.served_url);
    println!("Model name:     {}", config.model_name);
    println!("Timeout:        {}s", config.timeout.as_secs());
    println!("Fixtures dir:   {}", config.fixtures_dir.display());
    println!("Results dir:    {}", config.results_dir.display());
    match &config.reranker_path {
        Some(path) => println!("Reranker path:  {}", path.display()),
        None => println!("Reranker path:  (stub mode)"),
    }

    println!();
    println!("Environment:");
    for var in Config::ENV_VARS {
        let state = if std::env::var_os(var).is_some() {
            "set"
        } else {
            "unset"
        };
        println!("  {var}: {state}");
    }
}
