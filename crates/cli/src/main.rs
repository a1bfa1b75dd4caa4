//! Relyce CLI - Database migrations and allow-list management.
//!
//! # Usage
//!
//! ```bash
//! # Run document store and session migrations
//! relyce-cli migrate
//!
//! # Show the allow-list
//! relyce-cli admin list
//!
//! # Grant or revoke dashboard access
//! relyce-cli admin promote --uid 110248495921238986420
//! relyce-cli admin demote --uid 110248495921238986420
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "relyce-cli")]
#[command(author, version, about = "Relyce operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (document store and admin sessions)
    Migrate,
    /// Manage the admin allow-list
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List every allow-list record
    List,
    /// Give an identity the admin role
    Promote {
        /// Identity-provider uid, as shown on the refusal page
        #[arg(short, long)]
        uid: String,
    },
    /// Revoke the admin role
    Demote {
        #[arg(short, long)]
        uid: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => {
            let store = commands::admin::connect().await?;
            match action {
                AdminAction::List => {
                    for line in commands::admin::list(&store).await? {
                        tracing::info!("{line}");
                    }
                }
                AdminAction::Promote { uid } => {
                    commands::admin::promote(&store, &uid).await?;
                }
                AdminAction::Demote { uid } => {
                    commands::admin::demote(&store, &uid).await?;
                }
            }
        }
    }
    Ok(())
}
