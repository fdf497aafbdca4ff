//! AIMS CLI - Backend management tools.
//!
//! # Usage
//!
//! ```bash
//! # Check backend health
//! aims-cli health
//!
//! # Seed the catalog from a JSON file of product drafts
//! aims-cli seed products demo-catalog.json
//!
//! # Create a user
//! aims-cli users create -e manager@aims.example -n "Pham Van C" -r PRODUCT_MANAGER
//! ```
//!
//! # Environment
//!
//! - `AIMS_BACKEND_URL` - backend base URL (required)
//! - `AIMS_ADMIN_TOKEN` - bearer token for mutating commands

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "aims-cli")]
#[command(author, version, about = "AIMS management tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend health
    Health,
    /// Seed backend data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load a product catalog from a JSON file
    Products {
        /// Path to a JSON array of product drafts
        file: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`ADMIN`, `PRODUCT_MANAGER`, `CUSTOMER`)
        #[arg(short, long, default_value = "CUSTOMER")]
        role: String,

        /// Initial password (prompted-for secrets belong in a real
        /// deployment; this tool targets dev environments)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Health => commands::health::check().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(&file).await?,
        },
        Commands::Users { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                password,
            } => commands::users::create(&email, &name, &role, &password).await?,
        },
    }
    Ok(())
}
