//! # price-basket
//!
//! Prices a basket of goods given by name, accounting for special offers.
//!
//! ## Usage
//! ```bash
//! # Price one apple, one loaf of bread and two milks
//! cargo run -p checkout-cli -- Apples Bread Milk Milk
//!
//! # Use other documents and print JSON
//! CHECKOUT_OFFERS_PATH=./weekend.json cargo run -p checkout-cli -- --format json Soup Soup Bread
//!
//! # See which offers and products were skipped, and why
//! RUST_LOG=debug cargo run -p checkout-cli -- Apples
//! ```
//!
//! ## Output
//! ```text
//! Subtotal: £3.10
//! Apples 10% off: -10p
//! Total: £3.00
//! ```

mod cli;
mod config;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use checkout_core::{
    offers_from_json, price_basket, Basket, CoreError, Gbp, Offer, PricedBasket, ProductId,
    ProductTable, TracingSink,
};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, OutputFormat};
use crate::config::CheckoutConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CheckoutConfig::load()?
        .with_overrides(cli.products_file.clone(), cli.offers_file.clone());
    info!(
        products = %config.products_path.display(),
        offers = %config.offers_path.display(),
        "Configuration loaded"
    );

    let products = load_products(&config.products_path)?;
    let offers = load_offers(&config.offers_path, &products)?;
    let basket = build_basket(&products, &cli.products)?;

    let priced = price_basket(&basket, &offers);
    info!(total = %Gbp(priced.total()), "Basket priced");

    match cli.format {
        OutputFormat::Text => print!("{priced}"),
        OutputFormat::Json => {
            let summary = JsonSummary::new(&basket, &priced);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays a clean summary.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn load_products(path: &Path) -> Result<ProductTable> {
    let products = ProductTable::from_json(open(path)?, TracingSink::new("products"))
        .with_context(|| format!("Failed to load products from {}", path.display()))?;
    info!(count = products.len(), "Products loaded");
    Ok(products)
}

fn load_offers<'a>(path: &Path, products: &'a ProductTable) -> Result<Vec<Offer<'a>>> {
    let offers = offers_from_json(open(path)?, products, TracingSink::new("special offers"))
        .with_context(|| format!("Failed to load special offers from {}", path.display()))?;
    info!(count = offers.len(), "Special offers loaded");
    Ok(offers)
}

/// Builds the basket, naming the known products when an entry is unknown.
fn build_basket<'a>(products: &'a ProductTable, names: &[String]) -> Result<Basket<'a>> {
    match Basket::from_names(products, names) {
        Ok(basket) => Ok(basket),
        Err(CoreError::UnknownProduct(name)) => {
            let known: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
            bail!(
                "Unknown product: {name} (choose from: {})",
                known.join(", ")
            )
        }
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Debug, Serialize)]
struct JsonSummary<'p> {
    items: Vec<JsonItem<'p>>,
    #[serde(flatten)]
    priced: &'p PricedBasket,
    summary: Vec<String>,
}

#[derive(Debug, Serialize)]
struct JsonItem<'p> {
    product_id: ProductId,
    name: &'p str,
    quantity: u32,
}

impl<'p> JsonSummary<'p> {
    fn new(basket: &'p Basket<'_>, priced: &'p PricedBasket) -> Self {
        let items = basket
            .lines()
            .map(|line| JsonItem {
                product_id: line.product.id,
                name: &line.product.name,
                quantity: line.quantity,
            })
            .collect();

        JsonSummary {
            items,
            priced,
            summary: priced.summary_lines(),
        }
    }
}
