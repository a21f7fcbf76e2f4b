//! Command-line front end for the FFLBizHub client.
//!
//! ```text
//! fflbizhub auth [--force]
//! fflbizhub search --body filter.json [--url URL]
//! ```
//!
//! Credentials come from `--email`/`--password` or `FFL_EMAIL`/`FFL_PASSWORD`
//! (a `.env` file in the working directory is honored).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use futures_util::TryStreamExt;
use tracing_subscriber::EnvFilter;

use fflbizhub_rs::models::{DEFAULT_BASE_URL, EMAIL_ENV, PASSWORD_ENV};
use fflbizhub_rs::{ClientConfig, Credentials, FflBizHubClient, Result};

#[derive(Parser, Debug)]
#[command(name = "fflbizhub", version, about = "FFLBizHub portal client")]
struct Cli {
    /// Login email
    #[arg(long, env = EMAIL_ENV)]
    email: String,

    /// Login password
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    password: String,

    /// Portal base URL
    #[arg(long, env = "FFL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Token cache file
    #[arg(long, env = "FFL_TOKEN_CACHE", default_value = fflbizhub_rs::client::DEFAULT_TOKEN_CACHE)]
    token_cache: PathBuf,

    /// FFL list mirror file
    #[arg(long, env = "FFL_BOOKS_CACHE", default_value = fflbizhub_rs::client::DEFAULT_ENTITIES_CACHE)]
    books_cache: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a valid token, logging in only when the cache has none
    Auth {
        /// Log in even if the cached token is still valid
        #[arg(long)]
        force: bool,
    },
    /// Run an ad search and print every row as one JSON line
    Search {
        /// JSON file with the request body, including `pagingParams`
        #[arg(long)]
        body: PathBuf,

        /// Search endpoint URL override
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::default()
        .with_base_url(cli.base_url)
        .with_token_cache(cli.token_cache)
        .with_entities_cache(cli.books_cache);
    let client = FflBizHubClient::new(Credentials::new(cli.email, cli.password), config)?;

    match cli.command {
        Command::Auth { force } => {
            let token = client.token(force).await?;
            println!("{token}");
        }
        Command::Search { body, url } => {
            let raw = tokio::fs::read(&body).await?;
            let body: serde_json::Value = serde_json::from_slice(&raw)?;

            let mut pages = match url {
                Some(url) => {
                    let headers = client.auth_headers().await?;
                    client.search().stream_with(headers, &body, Some(&url))?
                }
                None => client.search().stream(&body).await?,
            };

            let mut total = 0usize;
            while let Some(rows) = pages.try_next().await? {
                total += rows.len();
                for row in rows {
                    println!("{}", serde_json::Value::Object(row));
                }
            }
            tracing::info!(rows = total, pages = pages.pages_fetched(), "search complete");
        }
    }

    Ok(())
}
