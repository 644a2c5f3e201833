//! # Error Types
//!
//! Domain-specific error types for checkout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Per-record (reported to a DiagnosticSink, record skipped)             │
//! │  ├── OfferError    - offer record failed schema or product lookup      │
//! │  ├── CatalogError  - product record failed schema or uniqueness        │
//! │  └── ValidationError - the field-level reason inside either one        │
//! │                                                                         │
//! │  Fatal (returned to the caller)                                        │
//! │  └── CoreError     - document unreadable, not an array, unknown name   │
//! │                                                                         │
//! │  Flow: OfferError → Diagnostic → tracing::error!  (batch continues)    │
//! │        CoreError  → caller → CLI exit code        (batch aborts)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, product ID)
//! 3. Errors are enum variants, never String
//! 4. A bad offer must never block checkout

use thiserror::Error;

use crate::product::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Fatal errors returned to callers.
///
/// Anything here stops the whole operation, unlike [`OfferError`] and
/// [`CatalogError`] which only drop a single record.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document could not be read.
    #[error("Failed to read {document}: {source}")]
    Io {
        document: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("{document} is not valid JSON: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The document is valid JSON but its top level is not an array.
    #[error("{document} must be a JSON array of records")]
    NotAnArray { document: &'static str },

    /// A basket entry names a product the catalog does not contain.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

// =============================================================================
// Offer Error
// =============================================================================

/// Why a single special offer record was rejected.
///
/// ## Taxonomy
/// - Schema errors: `NotAnObject`, `MissingField`, `InvalidField`,
///   `UnknownOfferType`
/// - Reference errors: `ProductNotFound`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfferError {
    /// The record is not a JSON object.
    #[error("offer record must be a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("'{field}' field is missing")]
    MissingField { field: &'static str },

    /// A field is present but has the wrong shape or type.
    #[error("'{field}' field is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        #[source]
        reason: ValidationError,
    },

    /// `special_offer_type` names no registered offer kind.
    #[error("'special_offer_type' field is invalid: unknown offer type {0:?}")]
    UnknownOfferType(String),

    /// A product ID in `product_matrix` is absent from the catalog.
    #[error("'product_matrix' field is invalid: product {product_id} not found")]
    ProductNotFound { product_id: ProductId },
}

impl OfferError {
    /// Builds a `map_err` adapter that pins a validation failure to `field`.
    pub fn invalid(field: &'static str) -> impl Fn(ValidationError) -> Self {
        move |reason| OfferError::InvalidField { field, reason }
    }
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Why a single product record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The record is not a JSON object.
    #[error("product record must be a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("'{field}' field is missing")]
    MissingField { field: &'static str },

    /// A field is present but has the wrong shape or type.
    #[error("'{field}' field is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        #[source]
        reason: ValidationError,
    },

    /// Another record already claimed this product ID.
    #[error("Product IDs are not unique: {0} already exists")]
    DuplicateId(ProductId),

    /// Another record already claimed this name.
    #[error("Product names are not unique: '{0}' already exists")]
    DuplicateName(String),
}

impl CatalogError {
    /// Builds a `map_err` adapter that pins a validation failure to `field`.
    pub fn invalid(field: &'static str) -> impl Fn(ValidationError) -> Self {
        move |reason| CatalogError::InvalidField { field, reason }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation failures.
///
/// These never stand alone: they are wrapped in an `InvalidField` variant of
/// [`OfferError`] or [`CatalogError`] that names the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// JSON value has the wrong type.
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// Array has the wrong number of entries.
    #[error("expected exactly {expected} entries, found {found}")]
    WrongLength { expected: usize, found: usize },

    /// Integer is outside the accepted range.
    #[error("{value} must be between {min} and {max}")]
    OutOfRange { value: i128, min: u64, max: u64 },

    /// String is not a decimal number.
    #[error("{0:?} is not a decimal number")]
    InvalidDecimal(String),

    /// Decimal value is below zero.
    #[error("{0} must not be negative")]
    Negative(String),

    /// String is empty after trimming.
    #[error("must not be empty")]
    Required,

    /// String exceeds the maximum length.
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
