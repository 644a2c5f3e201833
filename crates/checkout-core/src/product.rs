//! # Products
//!
//! The product catalog: records loaded once at startup and never mutated.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ProductTable                                    │
//! │                                                                         │
//! │  products.json: {1: Soup, 2: Bread, 4: Milk}                            │
//! │                                                                         │
//! │  slots:   [ None │ Soup │ Bread │ None │ Milk ]                         │
//! │  index:      0      1      2       3      4                             │
//! │                                                                         │
//! │  get(id)    → slots[id]          O(1), None for gaps and overflow       │
//! │  iter()     → non-empty slots    always in id order                     │
//! │  by_name()  → name index → slot  for basket entry by name               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Offers and baskets borrow `&Product` from the table, so the table must
//! outlive them. IDs are capped at [`MAX_PRODUCT_ID`] to keep the slot vector
//! bounded.

use std::collections::HashMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{CatalogError, CoreResult, ValidationError};
use crate::validation::{read_json_records, validate_price, validate_product_id, validate_product_name};
use crate::MAX_PRODUCT_ID;

/// Numeric product identifier, unique within a catalog.
pub type ProductId = u32;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Display name, unique within the catalog. Baskets are entered by name.
    pub name: String,

    /// Unit price in pounds, exact.
    pub price: Decimal,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Product {
            id,
            name: name.into(),
            price,
        }
    }

    /// Parses one `{ "product_id", "name", "price" }` record.
    ///
    /// Fields are checked in that order and the first failure wins.
    pub fn from_record(record: &Value) -> Result<Self, CatalogError> {
        let obj = record.as_object().ok_or(CatalogError::NotAnObject)?;
        let field = |name: &'static str| {
            obj.get(name)
                .ok_or(CatalogError::MissingField { field: name })
        };

        let id = validate_product_id(field("product_id")?)
            .map_err(CatalogError::invalid("product_id"))?;
        let name = validate_product_name(field("name")?).map_err(CatalogError::invalid("name"))?;
        let price = validate_price(field("price")?).map_err(CatalogError::invalid("price"))?;

        Ok(Product { id, name, price })
    }
}

// =============================================================================
// Product Table
// =============================================================================

/// Immutable id-indexed catalog lookup.
#[derive(Debug, Clone, Default)]
pub struct ProductTable {
    slots: Vec<Option<Product>>,
    by_name: HashMap<String, ProductId>,
}

impl ProductTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product, enforcing unique IDs and names.
    pub fn insert(&mut self, product: Product) -> Result<(), CatalogError> {
        if product.id > MAX_PRODUCT_ID {
            return Err(CatalogError::invalid("product_id")(ValidationError::OutOfRange {
                value: i128::from(product.id),
                min: 0,
                max: u64::from(MAX_PRODUCT_ID),
            }));
        }
        if self.get(product.id).is_some() {
            return Err(CatalogError::DuplicateId(product.id));
        }
        if self.by_name.contains_key(&product.name) {
            return Err(CatalogError::DuplicateName(product.name));
        }

        let slot = product.id as usize;
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.by_name.insert(product.name.clone(), product.id);
        self.slots[slot] = Some(product);
        Ok(())
    }

    /// Builds a table from products known to be valid.
    ///
    /// Stops at the first duplicate; use [`ProductTable::from_records`] for
    /// best-effort loading.
    pub fn from_products(
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, CatalogError> {
        let mut table = ProductTable::new();
        for product in products {
            table.insert(product)?;
        }
        Ok(table)
    }

    /// Builds a table from raw JSON records, skipping invalid ones.
    ///
    /// ## Behavior
    /// - Every rejected record is reported to `sink` with its index
    /// - Duplicate IDs or names: the first record wins, later ones are reported
    /// - Never fails as a whole; an all-invalid input yields an empty table
    pub fn from_records(records: &[Value], mut sink: impl DiagnosticSink<CatalogError>) -> Self {
        let mut table = ProductTable::new();

        for (index, record) in records.iter().enumerate() {
            let result = Product::from_record(record).and_then(|product| table.insert(product));
            if let Err(error) = result {
                sink.report(Diagnostic { index, error });
            }
        }

        debug!(
            loaded = table.len(),
            rejected = records.len() - table.len(),
            "Product catalog loaded"
        );
        table
    }

    /// Reads a products JSON document and builds a table from it.
    ///
    /// ## Errors
    /// Only document-level problems are fatal: unreadable input, invalid JSON,
    /// or a top level that is not an array.
    pub fn from_json<R: Read>(
        reader: R,
        sink: impl DiagnosticSink<CatalogError>,
    ) -> CoreResult<Self> {
        let records = read_json_records(reader, "products")?;
        Ok(Self::from_records(&records, sink))
    }

    /// Looks up a product by ID.
    #[inline]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    /// Looks up a product by its exact name.
    pub fn by_name(&self, name: &str) -> Option<&Product> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Iterates over present products in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.slots.iter().flatten()
    }

    /// Number of present products.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
