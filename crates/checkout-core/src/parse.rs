//! # Offer Parser
//!
//! Turns tabular offer records into typed [`Offer`] values.
//!
//! ## Record Format
//! ```text
//! {
//!   "special_offer_type": "fraction_of_price_per_quantity",
//!   "product_matrix": [
//!     [1, 2],            ← product IDs, variant-defined order
//!     [2, 4]             ← one value column per attribute, aligned by row
//!   ],
//!   "shared_values": ["0.75"]   ← values for the offer as a whole
//! }
//! ```
//!
//! | `special_offer_type`             | product IDs          | value columns      | `shared_values` |
//! |----------------------------------|----------------------|--------------------|-----------------|
//! | `fraction_of_price`              | `[discounted]`       | `[[fraction]]`     | ignored         |
//! | `fraction_of_price_per_quantity` | `[trigger, discounted]` | `[[t_quota, d_quota]]` | `[fraction]` |
//!
//! Fractions are decimal strings; quotas are integers of at least one.
//!
//! ## Partial Success
//! A record that fails validation is reported to the [`DiagnosticSink`] and
//! skipped; the remaining records still parse, in order. Only a document that
//! is not a JSON array is fatal.

use std::io::Read;
use std::iter::{Enumerate, FusedIterator};
use std::slice;

use serde_json::{Map, Value};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink, FnSink, OfferDiagnostic, TracingSink};
use crate::error::{CoreResult, OfferError, ValidationError};
use crate::offer::{FractionOfPrice, FractionOfPricePerQuantity, Offer, OfferKind};
use crate::product::{Product, ProductTable};
use crate::validation::{
    expect_array, expect_array_of_len, expect_str, parse_decimal_str, read_json_records,
    validate_product_id, validate_quota,
};

/// Discriminator field naming the offer variant.
pub const SPECIAL_OFFER_TYPE: &str = "special_offer_type";

/// Field holding the product ID column followed by the value columns.
pub const PRODUCT_MATRIX: &str = "product_matrix";

/// Field holding values that apply to the whole offer.
pub const SHARED_VALUES: &str = "shared_values";

// =============================================================================
// Single Record
// =============================================================================

/// Parses one offer record, resolving its products against `products`.
///
/// Checks run in this order and the first failure wins: record shape,
/// `special_offer_type`, product IDs, value columns, shared values.
pub fn parse_offer<'a>(record: &Value, products: &'a ProductTable) -> Result<Offer<'a>, OfferError> {
    let record = record.as_object().ok_or(OfferError::NotAnObject)?;
    let kind = parse_offer_type(record)?;

    let columns = expect_array(required(record, PRODUCT_MATRIX)?)
        .map_err(OfferError::invalid(PRODUCT_MATRIX))?;
    let Some((id_column, value_columns)) = columns.split_first() else {
        return Err(OfferError::invalid(PRODUCT_MATRIX)(
            ValidationError::WrongLength {
                expected: 2,
                found: 0,
            },
        ));
    };

    match kind {
        OfferKind::FractionOfPrice => {
            let resolved = resolve_products(id_column, 1, products)?;
            let fractions = single_value_column(value_columns, 1)?;
            let fraction_of_price =
                parse_decimal_str(&fractions[0]).map_err(OfferError::invalid(PRODUCT_MATRIX))?;

            Ok(FractionOfPrice::new(resolved[0], fraction_of_price).into())
        }
        OfferKind::FractionOfPricePerQuantity => {
            let resolved = resolve_products(id_column, 2, products)?;
            let quotas = single_value_column(value_columns, 2)?;
            let trigger_quota =
                validate_quota(&quotas[0]).map_err(OfferError::invalid(PRODUCT_MATRIX))?;
            let discount_quota =
                validate_quota(&quotas[1]).map_err(OfferError::invalid(PRODUCT_MATRIX))?;

            let shared = expect_array_of_len(required(record, SHARED_VALUES)?, 1)
                .map_err(OfferError::invalid(SHARED_VALUES))?;
            let fraction_of_price =
                parse_decimal_str(&shared[0]).map_err(OfferError::invalid(SHARED_VALUES))?;

            Ok(FractionOfPricePerQuantity {
                trigger_product: resolved[0],
                trigger_quota,
                discounted_product: resolved[1],
                discount_quota,
                fraction_of_price,
            }
            .into())
        }
    }
}

fn required<'v>(record: &'v Map<String, Value>, field: &'static str) -> Result<&'v Value, OfferError> {
    record.get(field).ok_or(OfferError::MissingField { field })
}

fn parse_offer_type(record: &Map<String, Value>) -> Result<OfferKind, OfferError> {
    let name = expect_str(required(record, SPECIAL_OFFER_TYPE)?)
        .map_err(OfferError::invalid(SPECIAL_OFFER_TYPE))?;
    name.parse()
}

/// Resolves exactly `count` product IDs, in column order.
fn resolve_products<'a>(
    id_column: &Value,
    count: usize,
    products: &'a ProductTable,
) -> Result<Vec<&'a Product>, OfferError> {
    let ids = expect_array_of_len(id_column, count).map_err(OfferError::invalid(PRODUCT_MATRIX))?;

    ids.iter()
        .map(|id| {
            let product_id = validate_product_id(id).map_err(OfferError::invalid(PRODUCT_MATRIX))?;
            products
                .get(product_id)
                .ok_or(OfferError::ProductNotFound { product_id })
        })
        .collect()
}

/// Requires exactly one value column holding one entry per product.
fn single_value_column(value_columns: &[Value], rows: usize) -> Result<&[Value], OfferError> {
    let [column] = value_columns else {
        return Err(OfferError::invalid(PRODUCT_MATRIX)(
            ValidationError::WrongLength {
                // ID column plus one value column
                expected: 2,
                found: value_columns.len() + 1,
            },
        ));
    };

    expect_array_of_len(column, rows).map_err(OfferError::invalid(PRODUCT_MATRIX))
}

// =============================================================================
// Lazy Parser
// =============================================================================

/// Lazily parses offer records, reporting and skipping invalid ones.
///
/// One pass only: each rejected record is reported to the sink exactly once,
/// as the iterator walks past it.
///
/// ## Example
/// ```rust
/// use checkout_core::diagnostics::OfferDiagnostic;
/// use checkout_core::parse::OfferParser;
/// use checkout_core::product::{Product, ProductTable};
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let products = ProductTable::from_products([Product::new(1, "Soup", Decimal::new(65, 2))]).unwrap();
/// let records = vec![
///     json!({"special_offer_type": "fraction_of_price", "product_matrix": [[1], ["0.9"]]}),
///     json!({"special_offer_type": "fraction_of_price", "product_matrix": [[7], ["0.9"]]}),
/// ];
///
/// let mut rejected: Vec<OfferDiagnostic> = Vec::new();
/// let offers: Vec<_> = OfferParser::new(&records, &products, &mut rejected).collect();
///
/// assert_eq!(offers.len(), 1);
/// assert_eq!(rejected[0].index, 1);
/// ```
pub struct OfferParser<'r, 'a, S> {
    records: Enumerate<slice::Iter<'r, Value>>,
    products: &'a ProductTable,
    sink: S,
}

impl<'r, 'a, S: DiagnosticSink<OfferError>> OfferParser<'r, 'a, S> {
    pub fn new(records: &'r [Value], products: &'a ProductTable, sink: S) -> Self {
        OfferParser {
            records: records.iter().enumerate(),
            products,
            sink,
        }
    }
}

impl<'r, 'a, S: DiagnosticSink<OfferError>> Iterator for OfferParser<'r, 'a, S> {
    type Item = Offer<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, record) = self.records.next()?;
            match parse_offer(record, self.products) {
                Ok(offer) => return Some(offer),
                Err(error) => self.sink.report(Diagnostic { index, error }),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}

impl<'r, 'a, S: DiagnosticSink<OfferError>> FusedIterator for OfferParser<'r, 'a, S> {}

// =============================================================================
// Batch Parsing
// =============================================================================

/// Outcome of parsing a whole batch: the valid offers and the rejections.
#[derive(Debug, Clone, Default)]
pub struct OfferBatch<'a> {
    /// Valid offers, in input order.
    pub offers: Vec<Offer<'a>>,

    /// One entry per rejected record, in input order.
    pub rejected: Vec<OfferDiagnostic>,
}

/// Parses every record, logging each rejection and collecting it in
/// [`OfferBatch::rejected`].
pub fn parse_offers<'a>(records: &[Value], products: &'a ProductTable) -> OfferBatch<'a> {
    let mut rejected = Vec::new();
    let mut log = TracingSink::new("special offers");

    let offers: Vec<Offer<'a>> = OfferParser::new(
        records,
        products,
        FnSink(|diagnostic: OfferDiagnostic| {
            log.report(diagnostic.clone());
            rejected.push(diagnostic);
        }),
    )
    .collect();

    debug!(
        parsed = offers.len(),
        rejected = rejected.len(),
        "Special offers parsed"
    );
    OfferBatch { offers, rejected }
}

/// Reads a special offers JSON document and parses every record in it.
///
/// ## Errors
/// Only document-level problems are fatal (unreadable, invalid JSON, not an
/// array); bad records go to `sink`.
pub fn offers_from_json<'a, R: Read>(
    reader: R,
    products: &'a ProductTable,
    sink: impl DiagnosticSink<OfferError>,
) -> CoreResult<Vec<Offer<'a>>> {
    let records = read_json_records(reader, "special offers")?;
    Ok(OfferParser::new(&records, products, sink).collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn catalog() -> ProductTable {
        ProductTable::from_products([
            Product::new(1, "Apple", dec!(0.50)),
            Product::new(2, "Banana", dec!(1.00)),
            Product::new(5, "Soup", dec!(0.65)),
        ])
        .unwrap()
    }

    fn fraction_of_price(id: u64, fraction: &str) -> Value {
        json!({
            "special_offer_type": "fraction_of_price",
            "product_matrix": [[id], [fraction]]
        })
    }

    fn apples_for_bananas() -> Value {
        json!({
            "special_offer_type": "fraction_of_price_per_quantity",
            "product_matrix": [[1, 2], [2, 4]],
            "shared_values": ["0.75"]
        })
    }

    fn rejection(record: Value) -> OfferError {
        parse_offer(&record, &catalog()).unwrap_err()
    }

    #[test]
    fn test_parse_fraction_of_price() {
        let products = catalog();
        let offer = parse_offer(&fraction_of_price(5, "0.9"), &products).unwrap();

        match offer {
            Offer::FractionOfPrice(offer) => {
                assert_eq!(offer.discounted_product.name, "Soup");
                assert_eq!(offer.fraction_of_price, dec!(0.9));
            }
            other => panic!("unexpected offer: {other:?}"),
        }
    }

    #[test]
    fn test_parse_fraction_of_price_per_quantity() {
        let products = catalog();
        let offer = parse_offer(&apples_for_bananas(), &products).unwrap();

        match offer {
            Offer::FractionOfPricePerQuantity(offer) => {
                assert_eq!(offer.trigger_product.name, "Apple");
                assert_eq!(offer.trigger_quota.get(), 2);
                assert_eq!(offer.discounted_product.name, "Banana");
                assert_eq!(offer.discount_quota.get(), 4);
                assert_eq!(offer.fraction_of_price, dec!(0.75));
            }
            other => panic!("unexpected offer: {other:?}"),
        }
    }

    #[test]
    fn test_reject_offer_type() {
        assert_eq!(
            rejection(json!({"product_matrix": [[1], ["0.5"]]})),
            OfferError::MissingField {
                field: SPECIAL_OFFER_TYPE
            }
        );
        assert_eq!(
            rejection(json!({"special_offer_type": "bogof", "product_matrix": [[1], ["0.5"]]})),
            OfferError::UnknownOfferType("bogof".to_string())
        );
        assert!(matches!(
            rejection(json!({"special_offer_type": 1, "product_matrix": [[1], ["0.5"]]})),
            OfferError::InvalidField {
                field: SPECIAL_OFFER_TYPE,
                ..
            }
        ));
        assert_eq!(rejection(json!(["fraction_of_price"])), OfferError::NotAnObject);
    }

    #[test]
    fn test_reject_missing_product() {
        assert_eq!(
            rejection(fraction_of_price(3, "0.5")),
            OfferError::ProductNotFound { product_id: 3 }
        );
        assert_eq!(
            rejection(fraction_of_price(400, "0.5")),
            OfferError::ProductNotFound { product_id: 400 }
        );
    }

    #[test]
    fn test_reject_fraction_of_price_shapes() {
        let invalid_matrix = |record: Value| {
            matches!(
                rejection(record),
                OfferError::InvalidField {
                    field: PRODUCT_MATRIX,
                    ..
                }
            )
        };

        // Two products
        assert!(invalid_matrix(json!({
            "special_offer_type": "fraction_of_price",
            "product_matrix": [[1, 2], ["0.5", "0.5"]]
        })));
        // Fraction as a JSON number
        assert!(invalid_matrix(json!({
            "special_offer_type": "fraction_of_price",
            "product_matrix": [[1], [0.5]]
        })));
        // Extra value column
        assert!(invalid_matrix(json!({
            "special_offer_type": "fraction_of_price",
            "product_matrix": [[1], ["0.5"], ["0.5"]]
        })));
        // No value column
        assert!(invalid_matrix(json!({
            "special_offer_type": "fraction_of_price",
            "product_matrix": [[1]]
        })));
        // Empty matrix
        assert!(invalid_matrix(json!({
            "special_offer_type": "fraction_of_price",
            "product_matrix": []
        })));
        // Not a decimal
        assert!(invalid_matrix(fraction_of_price(1, "half")));
        // Negative product ID
        assert!(invalid_matrix(json!({
            "special_offer_type": "fraction_of_price",
            "product_matrix": [[-1], ["0.5"]]
        })));
        assert_eq!(
            rejection(json!({"special_offer_type": "fraction_of_price"})),
            OfferError::MissingField {
                field: PRODUCT_MATRIX
            }
        );
    }

    #[test]
    fn test_reject_per_quantity_shapes() {
        let with = |matrix: Value, shared: Value| {
            rejection(json!({
                "special_offer_type": "fraction_of_price_per_quantity",
                "product_matrix": matrix,
                "shared_values": shared
            }))
        };

        // One product only
        assert!(matches!(
            with(json!([[1], [2]]), json!(["0.75"])),
            OfferError::InvalidField {
                field: PRODUCT_MATRIX,
                reason: ValidationError::WrongLength {
                    expected: 2,
                    found: 1
                }
            }
        ));
        // Zero quota
        assert!(matches!(
            with(json!([[1, 2], [0, 4]]), json!(["0.75"])),
            OfferError::InvalidField {
                field: PRODUCT_MATRIX,
                reason: ValidationError::OutOfRange { value: 0, .. }
            }
        ));
        // Quota as a string
        assert!(matches!(
            with(json!([[1, 2], [2, "4"]]), json!(["0.75"])),
            OfferError::InvalidField {
                field: PRODUCT_MATRIX,
                ..
            }
        ));
        // Two shared values
        assert!(matches!(
            with(json!([[1, 2], [2, 4]]), json!(["0.75", "0.5"])),
            OfferError::InvalidField {
                field: SHARED_VALUES,
                ..
            }
        ));
        // Shared fraction as a number
        assert!(matches!(
            with(json!([[1, 2], [2, 4]]), json!([0.75])),
            OfferError::InvalidField {
                field: SHARED_VALUES,
                ..
            }
        ));
        // Shared values not an array
        assert!(matches!(
            with(json!([[1, 2], [2, 4]]), json!("0.75")),
            OfferError::InvalidField {
                field: SHARED_VALUES,
                ..
            }
        ));
        // Missing discounted product is found before bad quotas
        assert_eq!(
            with(json!([[1, 9], [0, 4]]), json!(["0.75"])),
            OfferError::ProductNotFound { product_id: 9 }
        );

        assert_eq!(
            rejection(json!({
                "special_offer_type": "fraction_of_price_per_quantity",
                "product_matrix": [[1, 2], [2, 4]]
            })),
            OfferError::MissingField {
                field: SHARED_VALUES
            }
        );
    }

    #[test]
    fn test_parser_skips_invalid_and_preserves_order() {
        let products = catalog();
        let records = vec![
            fraction_of_price(5, "0.9"),
            fraction_of_price(3, "0.9"),
            json!("not an offer"),
            apples_for_bananas(),
            json!({"special_offer_type": "bogof", "product_matrix": [[1], ["0.5"]]}),
            fraction_of_price(1, "0.5"),
        ];

        let mut rejected: Vec<OfferDiagnostic> = Vec::new();
        let offers: Vec<Offer<'_>> = OfferParser::new(&records, &products, &mut rejected).collect();

        let kinds: Vec<(OfferKind, &str)> = offers
            .iter()
            .map(|o| (o.kind(), o.discounted_product().name.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (OfferKind::FractionOfPrice, "Soup"),
                (OfferKind::FractionOfPricePerQuantity, "Banana"),
                (OfferKind::FractionOfPrice, "Apple"),
            ]
        );

        let indexes: Vec<usize> = rejected.iter().map(|d| d.index).collect();
        assert_eq!(indexes, vec![1, 2, 4]);
        assert_eq!(
            rejected[0].error,
            OfferError::ProductNotFound { product_id: 3 }
        );
    }

    #[test]
    fn test_parser_is_lazy() {
        let products = catalog();
        let records = vec![
            fraction_of_price(5, "0.9"),
            fraction_of_price(3, "0.9"),
            fraction_of_price(1, "0.5"),
        ];

        let mut rejected: Vec<OfferDiagnostic> = Vec::new();
        let mut parser = OfferParser::new(&records, &products, &mut rejected);
        assert!(parser.next().is_some());
        // The bad record at index 1 is only reported once the parser passes it
        assert!(parser.next().is_some());
        assert!(parser.next().is_none());
        assert!(parser.next().is_none());
        drop(parser);

        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_parse_offers_batch() {
        let products = catalog();
        let records = vec![
            fraction_of_price(3, "0.9"),
            apples_for_bananas(),
            json!({"special_offer_type": null}),
        ];

        let batch = parse_offers(&records, &products);
        assert_eq!(batch.offers.len(), 1);
        assert_eq!(batch.offers[0].kind(), OfferKind::FractionOfPricePerQuantity);
        assert_eq!(batch.rejected.len(), 2);
        assert_eq!(batch.rejected[1].index, 2);
    }

    #[test]
    fn test_offers_from_json() {
        let products = catalog();
        let document = r#"[
            {"special_offer_type": "fraction_of_price", "product_matrix": [[5], ["0.9"]]},
            {"special_offer_type": "fraction_of_price", "product_matrix": [[8], ["0.9"]]}
        ]"#;

        let mut rejected: Vec<OfferDiagnostic> = Vec::new();
        let offers = offers_from_json(document.as_bytes(), &products, &mut rejected).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(rejected.len(), 1);

        let err = offers_from_json(r#"{"special_offer_type": "x"}"#.as_bytes(), &products, &mut rejected)
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAnArray { .. }));
    }

    #[test]
    fn test_offers_from_empty_document() {
        let products = catalog();
        let mut rejected: Vec<OfferDiagnostic> = Vec::new();

        let offers = offers_from_json("[]".as_bytes(), &products, &mut rejected).unwrap();
        assert!(offers.is_empty());
        assert!(rejected.is_empty());
    }
}
