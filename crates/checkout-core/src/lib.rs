//! # checkout-core: Pure Pricing Logic for Checkout
//!
//! This crate prices a basket of products against configured special offers.
//! It never opens files or reads the environment; callers hand it readers and
//! receive typed values back.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 price-basket (checkout-cli)                     │   │
//! │  │   config ──► open files ──► product names ──► print summary     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ checkout-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │ product  │  │  parse   │  │  offer   │  │  basket  │       │   │
//! │  │   │ catalog  │─►│  offers  │─►│ discount │─►│  pricing │       │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘       │   │
//! │  │        money (GBP formatting)  •  diagnostics (rejections)     │   │
//! │  │                                                                 │   │
//! │  │   NO FILES • NO NETWORK • NO GLOBAL STATE                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product`] - Product records and the id-indexed catalog
//! - [`parse`] - Offer records → typed offers, best effort
//! - [`offer`] - Offer variants and their discount calculations
//! - [`basket`] - Basket quantities and the pricing driver
//! - [`money`] - GBP formatting with Bankers Rounding
//! - [`diagnostics`] - Where rejected records are reported
//! - [`validation`] - Field-level checks shared by both parsers
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Exact Decimals**: Prices and fractions are `rust_decimal::Decimal`, never floats
//! 2. **Round Once**: Amounts stay exact until they are displayed
//! 3. **Best Effort Loading**: A malformed offer is reported and skipped, never fatal
//! 4. **Immutable After Load**: Catalog and offers are read-only and shareable
//!
//! ## Example Usage
//!
//! ```rust
//! use checkout_core::{parse_offers, price_basket, Basket, ProductTable};
//! use checkout_core::diagnostics::CatalogDiagnostic;
//! use serde_json::json;
//!
//! let mut rejected: Vec<CatalogDiagnostic> = Vec::new();
//! let products = ProductTable::from_records(
//!     &[
//!         json!({"product_id": 1, "name": "Apple", "price": "0.50"}),
//!         json!({"product_id": 2, "name": "Banana", "price": "1.00"}),
//!     ],
//!     &mut rejected,
//! );
//!
//! // Every 2 apples → 4 bananas at 75% of their price
//! let batch = parse_offers(
//!     &[json!({
//!         "special_offer_type": "fraction_of_price_per_quantity",
//!         "product_matrix": [[1, 2], [2, 4]],
//!         "shared_values": ["0.75"]
//!     })],
//!     &products,
//! );
//!
//! let basket = Basket::from_names(&products, ["Apple", "Apple", "Banana", "Banana"]).unwrap();
//! let priced = price_basket(&basket, &batch.offers);
//!
//! assert_eq!(
//!     priced.summary_lines(),
//!     vec!["Subtotal: £3.00", "Banana 25% off: -50p", "Total: £2.50"]
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod diagnostics;
pub mod error;
pub mod money;
pub mod offer;
pub mod parse;
pub mod product;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use checkout_core::Offer` instead of
// `use checkout_core::offer::Offer`

pub use basket::{price_basket, Basket, BasketLine, PricedBasket};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{CatalogError, CoreError, CoreResult, OfferError, ValidationError};
pub use money::{format_gbp, Gbp};
pub use offer::{Discount, FractionOfPrice, FractionOfPricePerQuantity, Offer, OfferKind};
pub use parse::{offers_from_json, parse_offer, parse_offers, OfferBatch, OfferParser};
pub use product::{Product, ProductId, ProductTable};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest accepted product ID.
///
/// The catalog is a vector indexed by ID, so this bounds its allocation.
pub const MAX_PRODUCT_ID: ProductId = 1_000_000;
