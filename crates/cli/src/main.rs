//! Metasync CLI - run syncs and manage webhooks by hand.
//!
//! # Usage
//!
//! ```bash
//! # Copy marketing consent into metafields for every customer
//! metasync backfill
//!
//! # Sync a single customer (numeric or gid://shopify/Customer/... ID)
//! metasync sync-customer 7421
//!
//! # Show or add favorites
//! metasync favorites list 7421
//! metasync favorites add 7421 100 1001 /products/linen-shirt
//!
//! # Point customers/create webhooks at a deployed server
//! metasync webhooks list
//! metasync webhooks register https://sync.example.com/webhooks/customers/create
//! ```
//!
//! # Commands
//!
//! - `backfill` - Sync consent for every customer
//! - `sync-customer` - Sync consent for one customer
//! - `favorites` - Read and append the favorites metafield
//! - `webhooks` - List and register webhook subscriptions
//!
//! Configuration comes from the same environment variables as the server
//! (`SHOPIFY_STORE`, `SHOPIFY_ACCESS_TOKEN`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use metasync_core::{CustomerId, ProductId, VariantId};
use metasync_server::config::ServerConfig;
use metasync_server::shopify::AdminClient;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "metasync")]
#[command(author, version, about = "Metasync CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync marketing consent for every customer
    Backfill,
    /// Sync marketing consent for one customer
    SyncCustomer {
        /// Customer ID (numeric or global ID)
        customer_id: CustomerId,
    },
    /// Read and append customer favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Manage webhook subscriptions
    Webhooks {
        #[command(subcommand)]
        action: WebhooksAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Print a customer's favorites as JSON
    List {
        /// Customer ID
        customer_id: CustomerId,
    },
    /// Add a product to a customer's favorites
    Add {
        /// Customer ID
        customer_id: CustomerId,
        /// Product ID
        product_id: ProductId,
        /// Variant ID
        variant_id: VariantId,
        /// Storefront URL of the product page
        product_url: String,
    },
}

#[derive(Subcommand)]
enum WebhooksAction {
    /// List customers/create subscriptions
    List,
    /// Register a customers/create subscription (no-op if already present)
    Register {
        /// Public URL of the server's webhook endpoint
        callback_url: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = ServerConfig::from_env()?;
    let client = AdminClient::new(&config.shopify)?;

    match cli.command {
        Commands::Backfill => commands::sync::backfill(&client, &config.sync).await?,
        Commands::SyncCustomer { customer_id } => {
            commands::sync::customer(&client, customer_id).await?;
        }
        Commands::Favorites { action } => match action {
            FavoritesAction::List { customer_id } => {
                commands::favorites::list(&client, customer_id).await?;
            }
            FavoritesAction::Add {
                customer_id,
                product_id,
                variant_id,
                product_url,
            } => {
                commands::favorites::add(&client, customer_id, product_id, variant_id, product_url)
                    .await?;
            }
        },
        Commands::Webhooks { action } => match action {
            WebhooksAction::List => commands::webhooks::list(&client).await?,
            WebhooksAction::Register { callback_url } => {
                commands::webhooks::register(&client, &callback_url).await?;
            }
        },
    }
    Ok(())
}
