//! search-client: command-line front end
//!
//! Runs a single query when one is given on the command line, otherwise
//! reads one query per line from stdin.
//!
//! # Usage
//!
//! ```bash
//! # One-shot query against the default endpoint
//! search-client java programming
//!
//! # Interactive session against another backend, JSON output
//! search-client --endpoint http://search.internal:8080/search --json
//!
//! # Show the effective configuration
//! search-client --config client.toml --print-config
//! ```

use clap::Parser;
use search_client::config::{LogFormat, LoggingConfig};
use search_client::output::{format_human, format_json};
use search_client::{
    ClientConfig, HttpSearchClient, Projector, QueryCoordinator, QueryOutcome, SearchTransport,
};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "search-client")]
#[command(about = "Query a ranked search service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search endpoint URL (overrides configuration)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request deadline in seconds (overrides configuration)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Number of rows to display (overrides configuration)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Query text; omit to start an interactive session
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint.url = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        config.endpoint.timeout_seconds = timeout;
    }
    if let Some(top_k) = cli.top_k {
        config.display.top_k = top_k;
    }
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&config.logging);

    info!("Starting search-client v{}", env!("CARGO_PKG_VERSION"));
    info!("Search endpoint: {}", config.endpoint.url);

    let transport = HttpSearchClient::from_config(&config)?;
    let coordinator = QueryCoordinator::from_config(transport, &config);
    let projector = Projector::from_config(&config);

    if !cli.query.is_empty() {
        let query = cli.query.join(" ");
        coordinator.submit(query).await;

        let failed = render(&coordinator, &projector, cli.json).await;
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    run_interactive(&coordinator, &projector, cli.json).await
}

/// Initialize logging on stderr so stdout carries only results
fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("search_client={}", config.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Read one query per line until EOF or `:q`
async fn run_interactive<T: SearchTransport + 'static>(
    coordinator: &QueryCoordinator<T>,
    projector: &Projector,
    json: bool,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Search articles: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if line == ":q" {
            break;
        }

        coordinator.set_query_text(line).await;
        coordinator.submit_current().await;
        render(coordinator, projector, json).await;
        println!();
    }

    Ok(())
}

/// Print the session's last outcome; returns true when it failed
async fn render<T: SearchTransport>(
    coordinator: &QueryCoordinator<T>,
    projector: &Projector,
    json: bool,
) -> bool {
    let session = coordinator.session().await;
    let failed = session
        .last_outcome()
        .map(QueryOutcome::is_failed)
        .unwrap_or(false);

    if json {
        println!("{}", format_json(&session, projector));
    } else if failed {
        eprintln!("{}", format_human(&session, projector));
    } else {
        println!("{}", format_human(&session, projector));
    }

    failed
}
