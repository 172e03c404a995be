//! Command-line front end for the directory and draw operations.
//!
//! Reads the same configuration as the server (`config.yaml` plus `RAFFLE_`
//! environment variables) and prints JSON to stdout.
//!
//! ```text
//! raffle members --company-id biz_123
//! raffle draw --count 3 --status active
//! raffle openapi > openapi.json
//! ```

#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use raffle_api::{
    config::Config,
    directory::{
        CanonicalMember, DirectoryRequest, DirectoryService, DirectorySettings, WhopDirectory,
    },
    draw::WinnerSet,
    http::raffle::{DirectoryResponse, DrawResponse},
    rest::ApiDoc,
    whop::HttpWhopClient,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

#[derive(Parser, Debug)]
#[command(version, about = "Pull a community's members from Whop and draw winners")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the member directory
    Members(DirectoryArgs),
    /// Fetch the directory and draw winners from it
    Draw {
        /// Number of winners to draw
        #[arg(short, long, default_value_t = 1)]
        count: i64,

        #[command(flatten)]
        directory: DirectoryArgs,
    },
    /// Print the OpenAPI document for the HTTP routes
    Openapi,
}

#[derive(Args, Debug)]
struct DirectoryArgs {
    /// Community (company) id; defaults to the configured one
    #[arg(long)]
    company_id: Option<String>,

    /// Page size hint
    #[arg(long)]
    per: Option<i64>,

    /// Page count hint
    #[arg(long)]
    max_pages: Option<i64>,

    /// Membership status filter
    #[arg(long)]
    status: Option<String>,
}

impl From<DirectoryArgs> for DirectoryRequest {
    fn from(args: DirectoryArgs) -> Self {
        Self {
            company_id: args.company_id,
            per: args.per,
            max_pages: args.max_pages,
            status: args.status,
        }
    }
}

async fn fetch_directory(
    config: &Config,
    args: DirectoryArgs,
) -> anyhow::Result<Vec<CanonicalMember>> {
    let client = HttpWhopClient::from_config(&config.whop)?;
    let settings = DirectorySettings::from_config(&config.directory, &config.whop);
    let directory = WhopDirectory::new(client, settings);

    Ok(directory.build_directory(&args.into()).await?)
}

fn init(config_path: &str) -> anyhow::Result<Config> {
    let config = Config::load_from(config_path).map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .with_writer(std::io::stderr)
        .init();

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let output = match cli.command {
        Command::Openapi => ApiDoc::openapi().to_pretty_json()?,
        Command::Members(args) => {
            let config = init(&cli.config)?;
            let members = fetch_directory(&config, args).await?;
            serde_json::to_string_pretty(&DirectoryResponse {
                count: members.len(),
                members,
            })?
        }
        Command::Draw { count, directory } => {
            let config = init(&cli.config)?;
            let members = fetch_directory(&config, directory).await?;
            let set = WinnerSet::draw(&members, count, &mut rand::thread_rng())
                .context("directory is empty")?;
            serde_json::to_string_pretty(&DrawResponse::from(set))?
        }
    };

    println!("{output}");
    Ok(())
}
