//! RocketShoes cart CLI - drive the persisted cart against a live catalog API.
//!
//! # Usage
//!
//! ```bash
//! ROCKETSHOES_API_URL=http://localhost:3333 rocketshoes add 1
//! rocketshoes update 1 3
//! rocketshoes remove 1
//! rocketshoes list
//! ```
//!
//! Every command prints the resulting cart as JSON on stdout. Rejections
//! (out of stock, failed lookups) are logged as notices on stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rocketshoes_cart::{
    CartConfig, CartManager, HttpCatalogApi, ProductId, TracingNotifier, UpdateProductAmount,
};
use rocketshoes_observability::LogFormat;

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    /// Catalog API base URL (overrides ROCKETSHOES_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Emit JSON logs instead of compact lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current cart
    List,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.json_logs {
        rocketshoes_observability::init();
    } else {
        rocketshoes_observability::tracing::init(LogFormat::Pretty);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CartConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let store = config.open_store().context("failed to open cart storage")?;
    tracing::debug!(dir = ?store.dir(), api_url = %config.api_url, "cart storage opened");

    let manager = CartManager::with_key(
        HttpCatalogApi::new(config.api_url.clone()),
        store,
        TracingNotifier,
        config.cart_key.clone(),
    );

    match cli.command {
        Commands::List => {}
        Commands::Add { product_id } => manager.add_product(product_id).await,
        Commands::Remove { product_id } => manager.remove_product(product_id),
        Commands::Update { product_id, amount } => {
            manager
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await
        }
        Commands::Clear => manager.clear().context("failed to clear cart")?,
    }

    let cart = manager.cart();
    let rendered = serde_json::to_string_pretty(&*cart).context("failed to render cart")?;
    println!("{rendered}");
    tracing::info!(
        items = cart.len(),
        units = cart.total_amount(),
        total = cart.total(),
        "cart"
    );

    Ok(())
}
