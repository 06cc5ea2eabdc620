use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use statquery_core::logging::init_for_client;
use statquery_core::serde_utils::to_pretty_json;
use statquery_core::ClientConfig;
use statquery_protocol::prelude::*;
use tracing::info;

mod query_args;

use query_args::QueryArgs;

#[derive(Parser)]
#[command(name = "statquery")]
#[command(about = "Build statistics API request parameters from analytics queries", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "STATQUERY_LOG")]
    log: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized request parameters for a query
    Normalize(NormalizeArgs),
    /// Print the full request URL for a query against STATQUERY_API_URL
    Url(QueryArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
struct NormalizeArgs {
    #[command(flatten)]
    query: QueryArgs,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON object
    Json,
    /// URL-encoded query string
    Query,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("loading configuration")?;

    init_for_client(&config, cli.log.as_deref())?;

    let output = run(cli.command, &config)?;
    println!("{output}");
    Ok(())
}

fn run(command: Commands, config: &ClientConfig) -> anyhow::Result<String> {
    match command {
        Commands::Normalize(args) => {
            let query = args.query.into_query(config, Utc::now())?;
            let params = Normalizer::new().normalize(&query);
            info!(parameters = params.len(), "query normalized");
            render(&params, args.format)
        }
        Commands::Url(args) => {
            let mut url = config.require_api_url()?.clone();
            let query = args.into_query(config, Utc::now())?;
            let params = Normalizer::new().normalize(&query);
            url.set_query(Some(&params.to_query_string()));
            Ok(url.to_string())
        }
        Commands::Version => Ok(format!("statquery {}", env!("CARGO_PKG_VERSION"))),
    }
}

fn render(params: &NormalizedParameters, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(to_pretty_json(params)?),
        OutputFormat::Query => Ok(params.to_query_string()),
    }
}
