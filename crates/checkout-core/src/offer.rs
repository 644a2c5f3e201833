//! # Special Offers
//!
//! The closed set of offer variants and their discount calculations.
//!
//! ## Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Offer<'a>                                     │
//! │                                                                         │
//! │  FractionOfPrice                  "Soup 10% off"                        │
//! │  ─────────────────                every unit of one product costs       │
//! │  discounted_product               fraction_of_price × price             │
//! │  fraction_of_price                                                      │
//! │                                                                         │
//! │  FractionOfPricePerQuantity       "Buy 2 Apples, get 4 Bananas 25% off" │
//! │  ──────────────────────────       every complete trigger_quota of the   │
//! │  trigger_product, trigger_quota   trigger product unlocks discount_quota│
//! │  discounted_product,              units of the discounted product       │
//! │    discount_quota                                                       │
//! │  fraction_of_price (shared)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Surcharge, Not Discount
//! `fraction_of_price` is the share of the price the customer still PAYS.
//! `0.75` means 25% comes off. The discount value is therefore
//! `units × price × (1 − fraction_of_price)`.
//!
//! Every calculation reads the basket as given; no offer sees another offer's
//! effect, so evaluating offers in any order yields the same discounts.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::basket::Basket;
use crate::error::OfferError;
use crate::money::{format_gbp, percent_off};
use crate::product::Product;

// =============================================================================
// Discount
// =============================================================================

/// The outcome of applying one offer to a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discount {
    /// Amount taken off the subtotal. Exact, not yet rounded to pence.
    pub value: Decimal,

    /// Receipt line, e.g. `Apples 10% off: -10p`.
    pub description: String,
}

impl Discount {
    fn new(product: &Product, fraction_of_price: Decimal, value: Decimal) -> Self {
        let description = format!(
            "{} {}% off: {}",
            product.name,
            percent_off(fraction_of_price),
            format_gbp(-value)
        );
        Discount { value, description }
    }
}

/// `units × price × (1 − fraction)`, saturating at the `Decimal` bounds.
fn discount_value(units: u32, product: &Product, fraction_of_price: Decimal) -> Decimal {
    Decimal::from(units)
        .saturating_mul(product.price)
        .saturating_mul(Decimal::ONE.saturating_sub(fraction_of_price))
}

// =============================================================================
// Offer Kind
// =============================================================================

/// Discriminator for the offer variants, as spelled in `special_offer_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    FractionOfPrice,
    FractionOfPricePerQuantity,
}

impl OfferKind {
    /// Every registered offer type, keyed by its JSON discriminator.
    ///
    /// Entries follow declaration order, so a kind's discriminant is its index.
    pub const REGISTRY: [(&'static str, OfferKind); 2] = [
        ("fraction_of_price", OfferKind::FractionOfPrice),
        (
            "fraction_of_price_per_quantity",
            OfferKind::FractionOfPricePerQuantity,
        ),
    ];

    /// The JSON discriminator for this kind, read from [`Self::REGISTRY`].
    pub fn as_str(&self) -> &'static str {
        Self::REGISTRY[*self as usize].0
    }
}

impl FromStr for OfferKind {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::REGISTRY
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, kind)| kind)
            .ok_or_else(|| OfferError::UnknownOfferType(s.to_string()))
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Fraction Of Price
// =============================================================================

/// Sell a product at a fraction of its price.
///
/// A product costing £10.00 with `fraction_of_price = 0.75` takes £2.50 off
/// each unit in the basket.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionOfPrice<'a> {
    pub discounted_product: &'a Product,
    pub fraction_of_price: Decimal,
}

impl<'a> FractionOfPrice<'a> {
    pub fn new(discounted_product: &'a Product, fraction_of_price: Decimal) -> Self {
        FractionOfPrice {
            discounted_product,
            fraction_of_price,
        }
    }

    pub fn get_discount(&self, basket: &Basket<'_>) -> Discount {
        let quantity = basket.quantity_of(self.discounted_product);
        let value = discount_value(quantity, self.discounted_product, self.fraction_of_price);
        Discount::new(self.discounted_product, self.fraction_of_price, value)
    }
}

// =============================================================================
// Fraction Of Price Per Quantity
// =============================================================================

/// Buy `trigger_quota` of one product, get `discount_quota` of another at a
/// fraction of its price.
///
/// ## Worked Example
/// ```text
/// Apple £0.50, Banana £1.00
/// Every 2 apples → 4 bananas at 0.75 of their price (25% off)
///
///   basket            max discountable      discounted    value
///   ──────            ────────────────      ──────────    ─────
///   2 A + 4 B         (2 / 2) × 4 = 4       min(4, 4) = 4  £1.00
///   2 A + 3 B         (2 / 2) × 4 = 4       min(4, 3) = 3  75p
///   1 A + 3 B         (1 / 2) × 4 = 0       min(0, 3) = 0  0p
///   0 A + 10 B        no trigger  → 0       min(0,10) = 0  0p
/// ```
/// Only complete multiples of the trigger quota count; a partial multiple
/// unlocks nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionOfPricePerQuantity<'a> {
    pub trigger_product: &'a Product,
    pub trigger_quota: NonZeroU32,
    pub discounted_product: &'a Product,
    pub discount_quota: NonZeroU32,
    pub fraction_of_price: Decimal,
}

impl<'a> FractionOfPricePerQuantity<'a> {
    /// Number of discounted-product units this basket earns a discount on.
    ///
    /// `min(floor(T / trigger_quota) × discount_quota, D)`, and 0 whenever
    /// the trigger product is absent.
    pub fn discountable_units(&self, basket: &Basket<'_>) -> u32 {
        let trigger_quantity = basket.quantity_of(self.trigger_product);
        let discounted_quantity = basket.quantity_of(self.discounted_product);

        let max_discountable = if trigger_quantity > 0 {
            (trigger_quantity / self.trigger_quota.get()).saturating_mul(self.discount_quota.get())
        } else {
            0
        };

        max_discountable.min(discounted_quantity)
    }

    pub fn get_discount(&self, basket: &Basket<'_>) -> Discount {
        let units = self.discountable_units(basket);
        let value = discount_value(units, self.discounted_product, self.fraction_of_price);
        Discount::new(self.discounted_product, self.fraction_of_price, value)
    }
}

// =============================================================================
// Offer
// =============================================================================

/// A parsed special offer. Immutable; borrows its products from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Offer<'a> {
    FractionOfPrice(FractionOfPrice<'a>),
    FractionOfPricePerQuantity(FractionOfPricePerQuantity<'a>),
}

impl<'a> Offer<'a> {
    pub fn kind(&self) -> OfferKind {
        match self {
            Offer::FractionOfPrice(_) => OfferKind::FractionOfPrice,
            Offer::FractionOfPricePerQuantity(_) => OfferKind::FractionOfPricePerQuantity,
        }
    }

    /// The product whose price is reduced.
    pub fn discounted_product(&self) -> &'a Product {
        match self {
            Offer::FractionOfPrice(offer) => offer.discounted_product,
            Offer::FractionOfPricePerQuantity(offer) => offer.discounted_product,
        }
    }

    /// Computes this offer's discount against `basket`.
    ///
    /// Pure: the basket is only read, and the result may be zero.
    pub fn get_discount(&self, basket: &Basket<'_>) -> Discount {
        match self {
            Offer::FractionOfPrice(offer) => offer.get_discount(basket),
            Offer::FractionOfPricePerQuantity(offer) => offer.get_discount(basket),
        }
    }
}

impl<'a> From<FractionOfPrice<'a>> for Offer<'a> {
    fn from(offer: FractionOfPrice<'a>) -> Self {
        Offer::FractionOfPrice(offer)
    }
}

impl<'a> From<FractionOfPricePerQuantity<'a>> for Offer<'a> {
    fn from(offer: FractionOfPricePerQuantity<'a>) -> Self {
        Offer::FractionOfPricePerQuantity(offer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
