//! Signout CLI - Issue and inspect end-session callbacks.
//!
//! # Usage
//!
//! ```bash
//! # Issue a callback for an authenticated session (new session id generated)
//! signout issue --subject alice --client web --client mobile
//!
//! # Issue for an explicit session, requesting a specific session id
//! signout issue --session-id s1 --subject alice --requested-sid s1 --redeem
//!
//! # Resolve a local path under the base URL
//! signout relative-url ~/account/loggedout
//!
//! # Print the issuer URI
//! signout issuer-uri
//! ```
//!
//! # Commands
//!
//! - `issue` - Run the issuer against an in-memory session and store
//! - `relative-url` - Resolve a local path against the base URL
//! - `issuer-uri` - Print the configured or derived issuer URI
//!
//! Configuration comes from the `SIGNOUT_*` environment variables unless
//! `--origin` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use signout_issuer::IssuerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "signout")]
#[command(author, version, about = "Sign-out callback tools")]
struct Cli {
    /// Public origin (overrides `SIGNOUT_ORIGIN` and the rest of the environment)
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Base path under the origin (only used with `--origin`)
    #[arg(long, global = true, default_value = "")]
    base_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a sign-out callback URL
    Issue(IssueArgs),
    /// Resolve a local path against the base URL
    RelativeUrl {
        /// Path starting with `/` or `~/`
        path: String,
    },
    /// Print the issuer URI
    IssuerUri,
}

#[derive(Args)]
pub struct IssueArgs {
    /// Current session id (generated if omitted)
    #[arg(long)]
    pub session_id: Option<String>,

    /// Subject id of the signed-in user
    #[arg(long)]
    pub subject: Option<String>,

    /// Client that took part in the session (repeatable, order kept)
    #[arg(long = "client")]
    pub clients: Vec<String>,

    /// Session id the caller asks to notify
    #[arg(long)]
    pub requested_sid: Option<String>,

    /// Simulate a caller without a session
    #[arg(long, conflicts_with_all = ["session_id", "subject"])]
    pub anonymous: bool,

    /// Read the notification back through the callback token
    #[arg(long)]
    pub redeem: bool,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "signout_cli=info,signout_issuer=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match cli.origin.as_deref() {
        Some(origin) => IssuerConfig::new(origin, &cli.base_path)?,
        None => IssuerConfig::from_env()?,
    };

    match cli.command {
        Commands::Issue(args) => commands::issue::run(config, args).await?,
        Commands::RelativeUrl { path } => commands::urls::relative_url(&config, &path)?,
        Commands::IssuerUri => commands::urls::issuer_uri(&config),
    }
    Ok(())
}
