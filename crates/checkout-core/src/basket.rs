//! # Basket Pricing
//!
//! A basket of products and the driver that prices it against the offers.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Basket {Apples: 1, Milk: 1, Bread: 1}                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  original_total = Σ quantity × price                    £3.10          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for offer in offers (input order):                                    │
//! │       discount = offer.get_discount(&basket)   ← always the ORIGINAL   │
//! │       keep if discount.value > 0                  basket quantities    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricedBasket                                                          │
//! │    Subtotal: £3.10                                                     │
//! │    Apples 10% off: -10p                                                │
//! │    Total: £3.00                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Gbp;
use crate::offer::{Discount, Offer};
use crate::product::{Product, ProductId, ProductTable};

// =============================================================================
// Basket
// =============================================================================

/// One product in the basket and how many of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketLine<'a> {
    pub product: &'a Product,
    pub quantity: u32,
}

impl BasketLine<'_> {
    /// `quantity × price`, saturating at `Decimal::MAX`.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.product.price)
    }
}

/// Quantities requested per product.
///
/// ## Invariants
/// - Lines are unique by product ID (adding the same product again
///   increases its quantity)
/// - Every stored quantity is positive; absent products read as 0
/// - Lines iterate in product ID order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basket<'a> {
    lines: BTreeMap<ProductId, BasketLine<'a>>,
}

impl<'a> Basket<'a> {
    /// Creates an empty basket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`. Adding zero units is a no-op.
    pub fn add(&mut self, product: &'a Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        self.lines
            .entry(product.id)
            .and_modify(|line| line.quantity = line.quantity.saturating_add(quantity))
            .or_insert(BasketLine { product, quantity });
    }

    /// Builds a basket from product names, one unit per occurrence.
    ///
    /// ## Example
    /// ```text
    /// ["Milk", "Apples", "Milk"]  →  {Apples: 1, Milk: 2}
    /// ```
    ///
    /// ## Errors
    /// `CoreError::UnknownProduct` for the first name the catalog lacks.
    pub fn from_names<I, S>(products: &'a ProductTable, names: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut basket = Basket::new();
        for name in names {
            let name = name.as_ref();
            let product = products
                .by_name(name)
                .ok_or_else(|| CoreError::UnknownProduct(name.to_string()))?;
            basket.add(product, 1);
        }
        Ok(basket)
    }

    /// Quantity of `product` in the basket, 0 when absent.
    #[inline]
    pub fn quantity_of(&self, product: &Product) -> u32 {
        self.lines.get(&product.id).map_or(0, |line| line.quantity)
    }

    /// Lines in product ID order.
    pub fn lines(&self) -> impl Iterator<Item = &BasketLine<'a>> {
        self.lines.values()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total before any offer: `Σ quantity × price`.
    pub fn original_total(&self) -> Decimal {
        self.lines()
            .map(BasketLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

impl<'a> Extend<(&'a Product, u32)> for Basket<'a> {
    fn extend<T: IntoIterator<Item = (&'a Product, u32)>>(&mut self, iter: T) {
        for (product, quantity) in iter {
            self.add(product, quantity);
        }
    }
}

impl<'a> FromIterator<(&'a Product, u32)> for Basket<'a> {
    fn from_iter<T: IntoIterator<Item = (&'a Product, u32)>>(iter: T) -> Self {
        let mut basket = Basket::new();
        basket.extend(iter);
        basket
    }
}

// =============================================================================
// Priced Basket
// =============================================================================

/// A basket's original total and the discounts that applied to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedBasket {
    original_total: Decimal,
    discounts: Vec<Discount>,
    total: Decimal,
}

impl PricedBasket {
    pub fn original_total(&self) -> Decimal {
        self.original_total
    }

    /// Discounts with a positive value, in offer order.
    pub fn discounts(&self) -> &[Discount] {
        &self.discounts
    }

    /// Sum of all discount values.
    pub fn total_discount(&self) -> Decimal {
        self.original_total.saturating_sub(self.total)
    }

    /// Amount payable: original total minus every discount.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// The receipt narrative.
    ///
    /// Each discount is preceded by the running subtotal it applies to, and
    /// the final line is the total:
    /// ```text
    /// Subtotal: £3.10
    /// Apples 10% off: -10p
    /// Total: £3.00
    /// ```
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.discounts.len() * 2 + 1);
        let mut subtotal = self.original_total;

        for discount in &self.discounts {
            lines.push(format!("Subtotal: {}", Gbp(subtotal)));
            lines.push(discount.description.clone());
            subtotal = subtotal.saturating_sub(discount.value);
        }

        lines.push(format!("Total: {}", Gbp(subtotal)));
        lines
    }
}

impl fmt::Display for PricedBasket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.summary_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Prices `basket` against `offers`.
///
/// ## Behavior
/// - Every offer sees the original basket, never a discounted one
/// - Zero (and negative) discounts are dropped
/// - Surviving discounts keep the order of `offers`
pub fn price_basket<'o, 'a: 'o>(
    basket: &Basket<'_>,
    offers: impl IntoIterator<Item = &'o Offer<'a>>,
) -> PricedBasket {
    let original_total = basket.original_total();

    let discounts: Vec<Discount> = offers
        .into_iter()
        .map(|offer| offer.get_discount(basket))
        .filter(|discount| discount.value > Decimal::ZERO)
        .collect();

    let total = discounts
        .iter()
        .fold(original_total, |subtotal, discount| subtotal.saturating_sub(discount.value));

    debug!(
        original = %Gbp(original_total),
        discounts = discounts.len(),
        total = %Gbp(total),
        "Basket priced"
    );

    PricedBasket {
        original_total,
        discounts,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
