//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "price-basket")]
#[command(about = "Price a basket of goods, accounting for special offers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Product names; repeat a name to buy more than one
    #[arg(value_name = "PRODUCT", required = true, num_args = 1..)]
    pub products: Vec<String>,

    /// Products JSON document (overrides CHECKOUT_PRODUCTS_PATH)
    #[arg(long, value_name = "PATH")]
    pub products_file: Option<PathBuf>,

    /// Special offers JSON document (overrides CHECKOUT_OFFERS_PATH)
    #[arg(long, value_name = "PATH")]
    pub offers_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Subtotal, discount and total lines
    Text,
    /// The priced basket as JSON
    Json,
}
