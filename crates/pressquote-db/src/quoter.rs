//! # Quoter Facade
//!
//! The one-call entry point for callers that hold a [`Database`]: load a
//! tenant's catalog snapshot, run the pure pricing engine, return the
//! result.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   Quoter::calculate(job, tenant)                                        │
//! │        │                                                                │
//! │        ├─► CatalogRepository::load_snapshot(tenant)   (I/O, once)       │
//! │        │                                                                │
//! │        └─► pressquote_core::calculate(job, snapshot)  (pure)            │
//! │                                                                         │
//! │   The snapshot is taken once per quote: a catalog update mid-quote      │
//! │   can never produce a breakdown priced against two catalog states.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use pressquote_core::{calculate, CatalogSnapshot, JobSpec, PricingResult};

/// Facade binding the catalog database to the pricing engine.
#[derive(Debug, Clone)]
pub struct Quoter {
    db: Database,
}

impl Quoter {
    /// Creates a quoter over an open database handle.
    pub fn new(db: Database) -> Self {
        Quoter { db }
    }

    /// Loads the tenant's snapshot and prices the job.
    ///
    /// ## Errors
    /// Database failures and fatal pricing errors (`QuoteError`) both
    /// surface as [`crate::error::DbError`]; per-method unavailability is
    /// data on the result, never an error.
    pub async fn calculate(
        &self,
        job: &JobSpec,
        tenant: Option<&str>,
    ) -> DbResult<PricingResult> {
        let snapshot = self.db.catalog().load_snapshot(tenant).await?;
        let result = calculate(job, &snapshot)?;

        info!(
            tenant = ?tenant,
            quantity = job.quantity,
            best_method = ?result.best_method,
            best_total = %result.best_total,
            "Quote calculated"
        );

        Ok(result)
    }

    /// Loads a snapshot without pricing anything.
    ///
    /// For callers that want to price several jobs against one consistent
    /// catalog state.
    pub async fn snapshot(&self, tenant: Option<&str>) -> DbResult<CatalogSnapshot> {
        self.db.catalog().load_snapshot(tenant).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
