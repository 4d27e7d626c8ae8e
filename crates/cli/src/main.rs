//! Folio CLI - command-line access to the portfolio content API.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password read from stdin) and inspect the session
//! folio login -e owner@example.com
//! folio status
//!
//! # Read and edit content
//! folio list skills
//! folio get websites 3
//! folio create skills --data '{"name":"Rust","description":"Systems"}'
//! folio update skills 4 --data '{"name":"Rust","description":"Systems and CLIs"}'
//! folio delete skills 4
//!
//! # Users
//! folio users
//! folio register -n "Owner" -e owner@example.com
//!
//! # Rebuild the cached home page
//! folio revalidate --site http://localhost:3000 --secret "$REVALIDATION_SECRET"
//! ```
//!
//! # Environment Variables
//!
//! - `NEXT_PUBLIC_API_BASE_URL` - API base URL (overridden by `--base-url`)
//! - `FOLIO_API_TIMEOUT_SECS` - Request timeout
//! - `FOLIO_SESSION_FILE` - Session file (default `~/.folio/session.json`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use folio_core::Resource;
use secrecy::SecretString;

mod commands;
mod error;

use commands::Context;
use error::CliError;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Folio content API tools")]
struct Cli {
    /// API base URL, e.g. `http://localhost:5000/api`
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in; the password is read from stdin
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Clear the stored session
    Logout,
    /// Show whether a login is stored
    Status,
    /// List every record of a resource
    List {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
    },
    /// Show one record
    Get {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        id: String,
    },
    /// Create a record
    Create {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        /// Record as a JSON object
        #[arg(short, long)]
        data: String,
    },
    /// Replace a record
    Update {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        id: String,
        /// Record as a JSON object
        #[arg(short, long)]
        data: String,
    },
    /// Delete a record
    Delete {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        id: String,
    },
    /// List registered users
    Users,
    /// Register a user; the password is read from stdin
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
    },
    /// Clear the site's cached pages
    Revalidate {
        /// Site base URL, e.g. `http://localhost:3000`
        #[arg(long)]
        site: String,
        /// Revalidation secret
        #[arg(long, env = "REVALIDATION_SECRET", hide_env_values = true)]
        secret: String,
    },
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    s.parse().map_err(|_| {
        let valid: Vec<&str> = Resource::CONTENT
            .iter()
            .map(|r| r.path())
            .chain(["user"])
            .collect();
        format!("valid resources: {}", valid.join(", "))
    })
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_cli=warn,folio_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::new(cli.base_url.as_deref())?;

    match cli.command {
        Commands::Login { email } => commands::auth::login(&ctx, &email).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Status => commands::auth::status(&ctx),
        Commands::List { resource } => commands::content::list(&ctx, resource).await,
        Commands::Get { resource, id } => commands::content::get(&ctx, resource, &id).await,
        Commands::Create { resource, data } => {
            commands::content::create(&ctx, resource, &data).await
        }
        Commands::Update { resource, id, data } => {
            commands::content::update(&ctx, resource, &id, &data).await
        }
        Commands::Delete { resource, id } => {
            commands::content::delete(&ctx, resource, &id).await
        }
        Commands::Users => commands::users::list(&ctx).await,
        Commands::Register { name, email } => {
            commands::users::register(&ctx, &name, &email).await
        }
        Commands::Revalidate { site, secret } => {
            commands::revalidate::run(&site, &SecretString::from(secret)).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resource_accepts_aliases() {
        assert_eq!(parse_resource("music-works").unwrap(), Resource::Music);
        let err = parse_resource("posts").unwrap_err();
        assert!(err.contains("websites"));
    }

    #[test]
    fn test_update_arguments() {
        let cli = Cli::try_parse_from([
            "folio",
            "--base-url",
            "http://api.test/api",
            "update",
            "skills",
            "4",
            "--data",
            "{}",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://api.test/api"));
        assert!(matches!(
            cli.command,
            Commands::Update { resource: Resource::Skills, ref id, .. } if id == "4"
        ));
    }
}
