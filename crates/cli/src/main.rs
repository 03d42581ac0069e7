//! Basket CLI - Drive a session cart from the command line.
//!
//! Each invocation opens the cart kept in the session directory, applies one
//! command, and exits. The cart survives between invocations the same way a
//! browser cart survives page reloads.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (repeat to add more units)
//! basket add --id p1 --name Tea --price 5 --image /img/tea.png
//!
//! # Set, bump, or drop quantities
//! basket set p1 5
//! basket inc p1
//! basket dec p1
//! basket remove p1
//!
//! # Inspect and reset
//! basket show
//! basket show --json
//! basket clear
//! ```
//!
//! # Environment Variables
//!
//! - `BASKET_STORAGE_KEY` - Session storage key (default: `restaurant_cart`)
//! - `BASKET_SESSION_DIR` - Session directory (default: `.basket-session`)
//! - `BASKET_LOG_FORMAT` - `pretty` or `json`
//! - `RUST_LOG` - Log filter (default: `basket_store=info,basket_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use basket_core::{Price, ProductId};
use basket_store::{CartConfig, CartStore, FileStorage, LogFormat};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "basket")]
#[command(author, version, about = "Basket session cart tools")]
struct Cli {
    /// Session directory (overrides `BASKET_SESSION_DIR`)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    /// Session storage key (overrides `BASKET_STORAGE_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// Display name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Price,

        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Set a line's quantity (0 removes it)
    Set {
        /// Product id
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit to an existing line
    Inc {
        /// Product id
        id: ProductId,
    },
    /// Take one unit off an existing line
    Dec {
        /// Product id
        id: ProductId,
    },
    /// Print the cart
    Show {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Empty the cart
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = apply_overrides(config, &cli);

    init_tracing(config.log_format);

    if let Err(e) = run(cli.command, &config) {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn apply_overrides(mut config: CartConfig, cli: &Cli) -> CartConfig {
    if let Some(dir) = &cli.session_dir {
        config.session_dir.clone_from(dir);
    }
    if let Some(key) = &cli.key {
        config.storage_key.clone_from(key);
    }
    config
}

/// Initialize tracing with `EnvFilter`, writing to stderr so stdout stays
/// clean for cart output.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "basket_store=info,basket_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn run(command: Commands, config: &CartConfig) -> Result<(), commands::CliError> {
    let storage = FileStorage::new(&config.session_dir);
    let store = CartStore::from_config(storage, config);
    commands::cart::report_restore(&store);

    match command {
        Commands::Add {
            id,
            name,
            price,
            image,
        } => commands::cart::add(&store, id, name, price, image),
        Commands::Remove { id } => commands::cart::remove(&store, &id),
        Commands::Set { id, quantity } => commands::cart::set(&store, &id, quantity),
        Commands::Inc { id } => commands::cart::increment(&store, &id),
        Commands::Dec { id } => commands::cart::decrement(&store, &id),
        Commands::Show { json } => commands::cart::show(&store, json),
        Commands::Clear => commands::cart::clear(&store),
    }
}
