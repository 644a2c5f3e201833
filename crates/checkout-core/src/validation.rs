//! # Validation Module
//!
//! Field-level checks shared by the offer parser and the catalog loader.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: serde_json                                                   │
//! │  └── Document is well-formed JSON and an array (fatal otherwise)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Type checks (integer, string, array)                              │
//! │  ├── Shape checks (array lengths)                                      │
//! │  └── Range checks (IDs, quotas, non-negative prices)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Record parsers (parse.rs, product.rs)                        │
//! │  ├── Product references resolve against the catalog                    │
//! │  └── Uniqueness of product IDs and names                               │
//! │                                                                         │
//! │  A failure at layer 2 or 3 drops one record, never the batch           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Offer fractions are deliberately not range-checked: any decimal string is
//! accepted, and a fraction above one yields a negative discount that the
//! pricing driver filters out.

use std::io::Read;
use std::num::NonZeroU32;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::product::ProductId;
use crate::MAX_PRODUCT_ID;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// Document Reader
// =============================================================================

/// Reads a JSON document whose top level must be an array of records.
///
/// This is the only fatal layer: a document that cannot be read, is not
/// JSON, or is not an array aborts the load. Individual records are checked
/// later, one at a time.
pub fn read_json_records<R: Read>(mut reader: R, document: &'static str) -> CoreResult<Vec<Value>> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| CoreError::Io { document, source })?;

    match serde_json::from_str(&text).map_err(|source| CoreError::Json { document, source })? {
        Value::Array(records) => Ok(records),
        _ => Err(CoreError::NotAnArray { document }),
    }
}

// =============================================================================
// JSON Shape Validators
// =============================================================================

/// Returns the JSON type name used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Requires `value` to be an array.
pub fn expect_array(value: &Value) -> ValidationResult<&[Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ValidationError::WrongType {
            expected: "array",
            found: json_type_name(value),
        })
}

/// Requires `value` to be an array of exactly `len` entries.
///
/// ## Example
/// ```rust
/// use checkout_core::validation::expect_array_of_len;
/// use serde_json::json;
///
/// assert!(expect_array_of_len(&json!([1, 2]), 2).is_ok());
/// assert!(expect_array_of_len(&json!([1]), 2).is_err());
/// assert!(expect_array_of_len(&json!("12"), 2).is_err());
/// ```
pub fn expect_array_of_len(value: &Value, len: usize) -> ValidationResult<&[Value]> {
    let items = expect_array(value)?;
    if items.len() != len {
        return Err(ValidationError::WrongLength {
            expected: len,
            found: items.len(),
        });
    }

    Ok(items)
}

/// Requires `value` to be a string.
pub fn expect_str(value: &Value) -> ValidationResult<&str> {
    value.as_str().ok_or(ValidationError::WrongType {
        expected: "string",
        found: json_type_name(value),
    })
}

/// Requires `value` to be an integer within `[min, max]`.
fn expect_integer_in(value: &Value, min: u64, max: u64) -> ValidationResult<u64> {
    let out_of_range = |n: i128| ValidationError::OutOfRange {
        value: n,
        min,
        max,
    };

    if let Some(n) = value.as_u64() {
        if n < min || n > max {
            return Err(out_of_range(i128::from(n)));
        }
        return Ok(n);
    }

    match value.as_i64() {
        Some(n) => Err(out_of_range(i128::from(n))),
        None => Err(ValidationError::WrongType {
            expected: "integer",
            found: json_type_name(value),
        }),
    }
}

// =============================================================================
// Domain Validators
// =============================================================================

/// Validates a product ID: a non-negative integer no greater than
/// [`MAX_PRODUCT_ID`].
pub fn validate_product_id(value: &Value) -> ValidationResult<ProductId> {
    let id = expect_integer_in(value, 0, u64::from(MAX_PRODUCT_ID))?;
    // Range check above keeps this lossless
    Ok(id as ProductId)
}

/// Validates an offer quota: an integer of at least one.
///
/// A zero quota would make "every 0 apples" meaningless (and divide by zero),
/// so it is rejected here rather than guarded at calculation time.
pub fn validate_quota(value: &Value) -> ValidationResult<NonZeroU32> {
    let quota = expect_integer_in(value, 1, u64::from(u32::MAX))?;
    // Range check above keeps this lossless and non-zero
    Ok(NonZeroU32::MIN.saturating_add(quota as u32 - 1))
}

/// Parses a decimal string such as `"0.75"`.
///
/// JSON numbers are refused: `0.1` as a JSON number has already passed
/// through floating point by the time it reaches us.
pub fn parse_decimal_str(value: &Value) -> ValidationResult<Decimal> {
    let s = expect_str(value)?;
    Decimal::from_str(s.trim()).map_err(|_| ValidationError::InvalidDecimal(s.to_string()))
}

/// Validates a product price: a decimal string, zero or more.
///
/// ## Example
/// ```rust
/// use checkout_core::validation::validate_price;
/// use serde_json::json;
///
/// assert!(validate_price(&json!("0.65")).is_ok());
/// assert!(validate_price(&json!("0")).is_ok());   // Free item
/// assert!(validate_price(&json!("-1")).is_err());
/// assert!(validate_price(&json!(0.65)).is_err()); // Must be a string
/// ```
pub fn validate_price(value: &Value) -> ValidationResult<Decimal> {
    let price = parse_decimal_str(value)?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::Negative(price.to_string()));
    }

    Ok(price)
}

/// Validates a product name.
///
/// ## Rules
/// - Must be a string
/// - Must not be blank
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
///
/// The name is kept verbatim, so `" Soup"` and `"Soup"` are different
/// products.
pub fn validate_product_name(value: &Value) -> ValidationResult<String> {
    let name = expect_str(value)?;

    if name.trim().is_empty() {
        return Err(ValidationError::Required);
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_validate_product_id() {
        assert_eq!(validate_product_id(&json!(0)), Ok(0));
        assert_eq!(validate_product_id(&json!(17)), Ok(17));

        assert_eq!(
            validate_product_id(&json!(-1)),
            Err(ValidationError::OutOfRange {
                value: -1,
                min: 0,
                max: u64::from(MAX_PRODUCT_ID),
            })
        );
        assert!(validate_product_id(&json!(u64::from(MAX_PRODUCT_ID) + 1)).is_err());
        assert_eq!(
            validate_product_id(&json!("1")),
            Err(ValidationError::WrongType {
                expected: "integer",
                found: "string",
            })
        );
        assert!(validate_product_id(&json!(1.5)).is_err());
    }

    #[test]
    fn test_validate_quota() {
        assert_eq!(validate_quota(&json!(2)).map(NonZeroU32::get), Ok(2));
        assert!(validate_quota(&json!(0)).is_err());
        assert!(validate_quota(&json!(-3)).is_err());
        assert!(validate_quota(&json!("2")).is_err());
        assert_eq!(validate_quota(&json!(1)).map(NonZeroU32::get), Ok(1));
        assert_eq!(
            validate_quota(&json!(u32::MAX)).map(NonZeroU32::get),
            Ok(u32::MAX)
        );
        assert_eq!(
            validate_quota(&json!(0)),
            Err(ValidationError::OutOfRange {
                value: 0,
                min: 1,
                max: u64::from(u32::MAX),
            })
        );
        assert!(validate_quota(&json!(u64::from(u32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_parse_decimal_str() {
        assert_eq!(parse_decimal_str(&json!("0.75")), Ok(dec!(0.75)));
        assert_eq!(parse_decimal_str(&json!("1")), Ok(dec!(1)));
        assert_eq!(
            parse_decimal_str(&json!("three quarters")),
            Err(ValidationError::InvalidDecimal("three quarters".to_string()))
        );
        assert_eq!(
            parse_decimal_str(&json!(0.75)),
            Err(ValidationError::WrongType {
                expected: "string",
                found: "number",
            })
        );
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price(&json!("0.65")), Ok(dec!(0.65)));
        assert_eq!(validate_price(&json!("0.00")), Ok(dec!(0)));
        assert!(validate_price(&json!("-0.01")).is_err());
        assert!(validate_price(&json!(null)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name(&json!("Soup")), Ok("Soup".to_string()));
        assert_eq!(validate_product_name(&json!(" Soup ")), Ok(" Soup ".to_string()));
        assert_eq!(validate_product_name(&json!("   ")), Err(ValidationError::Required));
        assert!(validate_product_name(&json!("A".repeat(300))).is_err());
        assert!(validate_product_name(&json!(7)).is_err());
    }

    #[test]
    fn test_read_json_records() {
        let records = read_json_records(r#"[{"a": 1}, 2]"#.as_bytes(), "offers").unwrap();
        assert_eq!(records.len(), 2);

        assert!(matches!(
            read_json_records("{}".as_bytes(), "offers"),
            Err(CoreError::NotAnArray { document: "offers" })
        ));
        assert!(matches!(
            read_json_records("[1,".as_bytes(), "offers"),
            Err(CoreError::Json { .. })
        ));
    }

    #[test]
    fn test_expect_array_of_len() {
        assert_eq!(expect_array_of_len(&json!([1, 2]), 2).map(<[Value]>::len), Ok(2));
        assert_eq!(
            expect_array_of_len(&json!([1, 2, 3]), 2),
            Err(ValidationError::WrongLength {
                expected: 2,
                found: 3,
            })
        );
        assert_eq!(
            expect_array(&json!({"a": 1})),
            Err(ValidationError::WrongType {
                expected: "array",
                found: "object",
            })
        );
    }
}
