//! # pressquote-core: Pure Pricing Logic for PressQuote
//!
//! This crate is the **heart** of PressQuote. It prices a print job under
//! both manufacturing methods (digital and offset) as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PressQuote Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         Callers                                 │   │
//! │  │        quote forms ──► JobSpec ──► PricingResult                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ pressquote-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   quote   │  │  digital  │  │  offset   │  │ delivery  │   │   │
//! │  │   │orchestrate│  │  clicks   │  │ plates    │  │ carriers  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │imposition │  │  cahier   │  │  weight   │  │   money   │   │   │
//! │  │   │   poses   │  │signatures │  │  grams    │  │    Eur    │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pressquote-db (Catalog Layer)                    │   │
//! │  │        SQLite catalogs, migrations, snapshot loading             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (JobSpec, CatalogSnapshot, PricingResult, ...)
//! - [`money`] - Eur amount type with explicit one-shot rounding
//! - [`error`] - Fatal vs per-method error tiers
//! - [`config`] - PricingConfig assembled from the key/value stores
//! - [`validation`] - Input contract and fold feasibility checks
//! - [`resolve`] - Catalog resolution and shared geometry
//! - [`imposition`] / [`cahier`] / [`weight`] / [`paper`] - shared math
//! - [`digital`] / [`offset`] - per-method production pricing
//! - [`availability`] - method availability diagnostics
//! - [`delivery`] / [`packaging`] / [`finishing`] - shared extras
//! - [`quote`] - the orchestrator, [`quote::calculate`]
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: `calculate(job, snapshot)` is deterministic -
//!    same input = byte-identical output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **One-shot Rounding**: intermediate math keeps full float precision;
//!    each cost line is rounded to the cent exactly once
//! 4. **Explicit Errors**: fatal errors are typed; per-method problems are
//!    data on the result, never panics
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use pressquote_core::quote::calculate;
//!
//! let result = calculate(&job, &snapshot)?;
//! if let Some(method) = result.best_method {
//!     println!("{:?} wins at {}", method, result.best_total);
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod cahier;
pub mod config;
pub mod delivery;
pub mod digital;
pub mod error;
pub mod finishing;
pub mod imposition;
pub mod money;
pub mod offset;
pub mod packaging;
pub mod paper;
pub mod quote;
pub mod resolve;
pub mod types;
pub mod validation;
pub mod weight;

#[cfg(test)]
mod testkit;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pressquote_core::Eur` instead of
// `use pressquote_core::money::Eur`

pub use config::{ConfigEntry, PricingConfig};
pub use error::{MethodError, MethodResult, QuoteError, QuoteResult};
pub use money::Eur;
pub use quote::calculate;
pub use types::*;
