//! Shopping cart CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! cart-cli migrate
//!
//! # Insert the default product catalog
//! cart-cli seed products
//!
//! # Insert products from a JSON file
//! cart-cli seed products --file products.json
//!
//! # Create a customer
//! cart-cli customer create --user-name puterism --password password
//! ```
//!
//! All commands read `CART_API_DATABASE_URL` (or `DATABASE_URL`), loading
//! `.env` first if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Shopping cart API CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products into the catalog
    Products {
        /// JSON file with `[{"name", "price", "imageUrl"}]` (default catalog if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Register a new customer
    Create {
        /// Login name (no whitespace, at most 32 characters)
        #[arg(short, long)]
        user_name: String,

        /// Password (8 to 64 characters)
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(file.as_deref()).await?,
        },
        Commands::Customer { action } => match action {
            CustomerAction::Create {
                user_name,
                password,
            } => commands::customer::create(&user_name, &password).await?,
        },
    }
    Ok(())
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
    fn test_parse_customer_create() {
        let cli = Cli::try_parse_from([
            "cart-cli",
            "customer",
            "create",
            "--user-name",
            "puterism",
            "--password",
            "password",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Customer {
                action: CustomerAction::Create { ref user_name, .. }
            } if user_name == "puterism"
        ));
    }

    #[test]
    fn test_parse_seed_products_with_file() {
        let cli = Cli::try_parse_from(["cart-cli", "seed", "products", "-f", "catalog.json"])
            .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Seed {
                target: SeedTarget::Products { file: Some(ref path) }
            } if path == &PathBuf::from("catalog.json")
        ));
    }
}
