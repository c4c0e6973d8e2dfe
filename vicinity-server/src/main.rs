use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use vicinity_core::{Category, Dataset, TransportMode, score_all};
use vicinity_server::http::{AppState, serve};
use vicinity_server::{CliError, Config};

#[derive(Parser, Debug)]
#[command(version, about = "Neighborhood amenity reachability scores", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "vicinity.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Score all neighborhoods once and print the JSON report
    Score {
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<TransportMode>,
        /// Maximum travel time in minutes
        #[arg(short = 't', long)]
        max_time: Option<f64>,
        /// POI category, may be repeated
        #[arg(short, long = "category", value_parser = parse_category)]
        categories: Vec<Category>,
        /// Only print the best N neighborhoods
        #[arg(long)]
        top: Option<usize>,
    },
}

fn parse_mode(value: &str) -> Result<TransportMode, String> {
    value.parse().map_err(|err: vicinity_core::Error| err.to_string())
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|err: vicinity_core::Error| err.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vicinity_server=info,vicinity_core=info".into()),
        )
        .with_target(true)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load(&cli.config)?;

    if let Some(threads) = config.server.worker_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    info!("Loading dataset from {}", cli.config.display());
    let dataset = Dataset::load(&config.dataset)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let state = AppState::new(
                dataset,
                config.analysis.clone(),
                config.server.request_timeout(),
            );
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(serve(&config.server, state))?;
        }
        Command::Score {
            mode,
            max_time,
            categories,
            top,
        } => {
            let categories = (!categories.is_empty()).then_some(categories);
            let params = config.analysis.resolve(categories, mode, max_time)?;

            let mut report = score_all(
                dataset.graph(params.mode()),
                &dataset.neighborhoods,
                &dataset.pois,
                &params,
            )?;
            if let Some(top) = top {
                report = report.top(top);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
