//! # Error Types
//!
//! Domain-specific error types for pressquote-core.
//!
//! ## Error Tiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Tiers                                 │
//! │                                                                     │
//! │  QuoteError (fatal)                                                 │
//! │  ├── Caller contract violations: zero quantity, missing format,    │
//! │  │   unknown catalog references, unsupported fold combination      │
//! │  └── The whole calculation fails and surfaces to the caller        │
//! │                                                                     │
//! │  MethodError (non-fatal, carried as data)                           │
//! │  ├── One manufacturing method cannot be priced: missing tier,      │
//! │  │   unconfigured lamination, process restriction                  │
//! │  └── The orchestrator zeroes that method's breakdown, records the  │
//! │      reason, and still returns the other method                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, limits, counts)
//! 3. Errors are enum variants, never bare Strings

use thiserror::Error;

// =============================================================================
// Quote Error (fatal)
// =============================================================================

/// Fatal input errors: the calculation cannot proceed at all.
///
/// These represent caller contract violations, not business conditions.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Quantity must be strictly positive.
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    /// The job's closed format is missing or has non-positive dimensions.
    #[error("invalid format: {width_cm} x {height_cm} cm")]
    InvalidFormat { width_cm: f64, height_cm: f64 },

    /// Bound products need interior pages in multiples of 4.
    #[error("interior page count {pages} must be a positive multiple of 4 when binding applies")]
    InvalidPageCount { pages: u32 },

    /// A selection in the job references a catalog row that does not exist
    /// in the snapshot.
    #[error("{entity} not found in catalog: {id}")]
    UnknownCatalogRef { entity: &'static str, id: String },

    /// The fold type / fold count / grammage combination is outside the
    /// machine limit table.
    ///
    /// `max_grammage` is populated when the combination exists but the
    /// selected paper is too heavy for it.
    #[error("unsupported fold: {reason}")]
    UnsupportedFold {
        reason: String,
        max_grammage: Option<f64>,
    },

    /// A binding rule blob in the catalog failed to parse against the
    /// closed rule schema.
    #[error("invalid binding rules for '{binding}': {source}")]
    InvalidBindingRules {
        binding: String,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Method Error (non-fatal)
// =============================================================================

/// A single manufacturing method cannot produce a price.
///
/// Never surfaced as a failure of the whole calculation: the orchestrator
/// converts it into a zeroed breakdown plus a reason string.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct MethodError {
    /// Human-readable reason shown next to the unavailable method.
    pub reason: String,

    /// Optional suggestion (e.g. bindings that do support the method).
    pub suggestion: Option<String>,
}

impl MethodError {
    /// Creates a method error with a reason only.
    pub fn new(reason: impl Into<String>) -> Self {
        MethodError {
            reason: reason.into(),
            suggestion: None,
        }
    }

    /// Creates a method error with a reason and a suggestion.
    pub fn with_suggestion(reason: impl Into<String>, suggestion: impl Into<String>) -> Self {
        MethodError {
            reason: reason.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for fatal-path results.
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Convenience type alias for per-method results.
pub type MethodResult<T> = Result<T, MethodError>;

// =============================================================================
// Unit Tests
// =============================================================================
