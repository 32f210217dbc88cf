//! Store manager CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! store-cli migrate
//!
//! # Create a credential record
//! store-cli user create -e admin@example.com -s 's3cret'
//! STORE_USER_SECRET='s3cret' store-cli user create -e admin@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a login credential with a hashed secret

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "store-cli")]
#[command(author, version, about = "Store manager CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage login credentials
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new credential record
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Login secret (prefer the environment variable over the flag)
        #[arg(short, long, env = "STORE_USER_SECRET", hide_env_values = true)]
        secret: String,
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

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { email, secret } => {
                commands::user::create(&email, &SecretString::from(secret)).await?;
            }
        },
    }
    Ok(())
}
