//! # pressquote-db: Catalog Layer for PressQuote
//!
//! This crate provides catalog storage for the PressQuote pricing engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PressQuote Data Flow                               │
//! │                                                                         │
//! │  Caller (Quoter::calculate)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pressquote-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (catalog.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CatalogRepo   │    │ 001_catalog  │  │   │
//! │  │   │ WAL mode      │    │ load_snapshot │    │     _schema  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogSnapshot (immutable, owned)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pressquote-core::calculate ← pure pricing, no database access          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog repository (snapshot loading, tenant overrides)
//! - [`quoter`] - Facade binding snapshot loading to the pricing engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pressquote_db::{Database, DbConfig, Quoter};
//!
//! let db = Database::new(DbConfig::new("path/to/catalog.db")).await?;
//! let quoter = Quoter::new(db);
//!
//! let result = quoter.calculate(&job, Some("tenant-a")).await?;
//! println!("{:?} at {}", result.best_method, result.best_total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod quoter;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use quoter::Quoter;
pub use repository::catalog::CatalogRepository;
