//! # Diagnostics
//!
//! Side channel for records that were rejected during best-effort parsing.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  records[0] ──► parse ──► Ok(offer) ──────────────► yielded             │
//! │  records[1] ──► parse ──► Err(OfferError) ──┐                           │
//! │  records[2] ──► parse ──► Ok(offer) ──────────────► yielded             │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                              sink.report(Diagnostic { index: 1, .. })   │
//! │                                              │                          │
//! │                    ┌─────────────────────────┼──────────────────┐       │
//! │                    ▼                         ▼                  ▼       │
//! │              TracingSink            Vec<Diagnostic<E>>      FnSink      │
//! │              error!(...)            (tests, summaries)     (custom)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sink is passed in by the caller instead of being ambient global state,
//! so tests can capture and assert on exactly what was rejected.

use std::fmt;

use serde::Serialize;
use tracing::error;

use crate::error::{CatalogError, OfferError};

// =============================================================================
// Diagnostic
// =============================================================================

/// A rejected record: its position in the input array and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = "E: fmt::Display"))]
pub struct Diagnostic<E> {
    /// Zero-based index of the record in the input array.
    pub index: usize,

    /// Why the record was rejected.
    #[serde(serialize_with = "serialize_display")]
    pub error: E,
}

/// Diagnostic for a rejected special offer record.
pub type OfferDiagnostic = Diagnostic<OfferError>;

/// Diagnostic for a rejected product record.
pub type CatalogDiagnostic = Diagnostic<CatalogError>;

impl<E: fmt::Display> fmt::Display for Diagnostic<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.index, self.error)
    }
}

fn serialize_display<E: fmt::Display, S: serde::Serializer>(
    error: &E,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

// =============================================================================
// Sinks
// =============================================================================

/// Receives one call per rejected record.
pub trait DiagnosticSink<E> {
    fn report(&mut self, diagnostic: Diagnostic<E>);
}

/// Collects diagnostics in memory.
impl<E> DiagnosticSink<E> for Vec<Diagnostic<E>> {
    fn report(&mut self, diagnostic: Diagnostic<E>) {
        self.push(diagnostic);
    }
}

impl<E, S: DiagnosticSink<E> + ?Sized> DiagnosticSink<E> for &mut S {
    fn report(&mut self, diagnostic: Diagnostic<E>) {
        (**self).report(diagnostic);
    }
}

/// Logs every diagnostic at `ERROR` level through `tracing`.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    /// Which document the records came from ("products", "special offers").
    pub document: &'static str,
}

impl TracingSink {
    pub const fn new(document: &'static str) -> Self {
        TracingSink { document }
    }
}

impl<E: fmt::Display> DiagnosticSink<E> for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic<E>) {
        error!(
            document = self.document,
            index = diagnostic.index,
            error = %diagnostic.error,
            "Skipping invalid record"
        );
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<E, F: FnMut(Diagnostic<E>)> DiagnosticSink<E> for FnSink<F> {
    fn report(&mut self, diagnostic: Diagnostic<E>) {
        (self.0)(diagnostic);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
