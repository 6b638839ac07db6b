//! # Validation Module
//!
//! Fatal input validation for the quote calculation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Two Error Tiers                                │
//! │                                                                     │
//! │  THIS MODULE: fatal input errors                                    │
//! │  ├── zero quantity, missing format, page-count parity              │
//! │  ├── fold/grammage combinations outside the machine limit table    │
//! │  └── the whole calculation fails, surfaced to the caller           │
//! │                                                                     │
//! │  availability module: per-method business conditions               │
//! │  └── never fatal, recorded as reasons on the result                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{QuoteError, QuoteResult};
use crate::types::{FoldKind, JobSpec};

// =============================================================================
// Job-Level Validation
// =============================================================================

/// Validates the caller contract on a job spec.
///
/// ## Rules
/// - quantity > 0
/// - closed format has positive width and height
/// - when a binding applies, interior pages is a positive multiple of 4
pub fn validate_job(job: &JobSpec) -> QuoteResult<()> {
    if job.quantity == 0 {
        return Err(QuoteError::InvalidQuantity(0));
    }

    let f = job.closed_format;
    if f.width_cm <= 0.0 || f.height_cm <= 0.0 {
        return Err(QuoteError::InvalidFormat {
            width_cm: f.width_cm,
            height_cm: f.height_cm,
        });
    }

    if job.is_bound() && (job.interior_pages == 0 || job.interior_pages % 4 != 0) {
        return Err(QuoteError::InvalidPageCount {
            pages: job.interior_pages,
        });
    }

    Ok(())
}

// =============================================================================
// Fold Limit Table
// =============================================================================

/// Maximum paper grammage (g/m²) the folders accept for a fold kind and
/// fold count. `None` means the combination does not exist on any machine.
///
/// This is a physical machine limit table, not tenant configuration.
fn fold_max_grammage(kind: FoldKind, fold_count: u32) -> Option<f64> {
    match (kind, fold_count) {
        (FoldKind::Simple, 1) => Some(300.0),
        (FoldKind::Cross, 2) => Some(250.0),
        (FoldKind::Cross, 3) => Some(170.0),
        (FoldKind::Accordion, 2..=6) => Some(170.0),
        (FoldKind::Roll, 2..=6) => Some(135.0),
        (FoldKind::Window, 3) => Some(170.0),
        _ => None,
    }
}

/// Checks a fold kind / fold count / grammage combination against the
/// machine limit table.
///
/// ## Example
/// ```rust
/// use pressquote_core::types::FoldKind;
/// use pressquote_core::validation::check_fold;
///
/// // 2-fold cross at 250g is the limit; 260g is rejected.
/// assert!(check_fold(FoldKind::Cross, 2, 250.0).is_ok());
/// assert!(check_fold(FoldKind::Cross, 2, 260.0).is_err());
///
/// // A 1-fold accordion does not exist.
/// assert!(check_fold(FoldKind::Accordion, 1, 90.0).is_err());
/// ```
pub fn check_fold(kind: FoldKind, fold_count: u32, grammage: f64) -> QuoteResult<()> {
    match fold_max_grammage(kind, fold_count) {
        None => Err(QuoteError::UnsupportedFold {
            reason: format!("{:?} fold with {} fold(s) is not supported", kind, fold_count),
            max_grammage: None,
        }),
        Some(max) if grammage > max => Err(QuoteError::UnsupportedFold {
            reason: format!(
                "{:?} fold with {} fold(s) supports at most {} g/m2, got {} g/m2",
                kind, fold_count, max, grammage
            ),
            max_grammage: Some(max),
        }),
        Some(_) => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FinishingOptions, FormatCm, PackagingOptions, ProductKind};

    fn flyer() -> JobSpec {
        JobSpec {
            product: ProductKind::Flyer,
            quantity: 1000,
            closed_format: FormatCm::new(21.0, 29.7),
            open_format: FormatCm::new(21.0, 29.7),
            interior_pages: 0,
            cover_pages: 0,
            flap_cm: 0.0,
            interior_paper_id: "p1".to_string(),
            cover_paper_id: None,
            interior_color_id: "c1".to_string(),
            cover_color_id: None,
            recto_verso: true,
            binding_id: None,
            fold: None,
            inserted_signatures: 0,
            lamination: None,
            finishing: FinishingOptions::default(),
            packaging: PackagingOptions::default(),
            delivery_points: Vec::new(),
            reference: None,
        }
    }

    #[test]
    fn test_valid_flyer() {
        assert!(validate_job(&flyer()).is_ok());
    }

    #[test]
    fn test_zero_quantity_is_fatal() {
        let mut job = flyer();
        job.quantity = 0;
        assert!(matches!(
            validate_job(&job),
            Err(QuoteError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_unresolved_format_is_fatal() {
        let mut job = flyer();
        job.closed_format = FormatCm::new(0.0, 29.7);
        assert!(matches!(
            validate_job(&job),
            Err(QuoteError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_bound_pages_must_be_multiple_of_four() {
        let mut job = flyer();
        job.product = ProductKind::Brochure;
        job.binding_id = Some("b1".to_string());
        job.interior_pages = 30;
        assert!(matches!(
            validate_job(&job),
            Err(QuoteError::InvalidPageCount { pages: 30 })
        ));

        job.interior_pages = 32;
        assert!(validate_job(&job).is_ok());
    }

    #[test]
    fn test_fold_limit_table() {
        // Known limits from the machine table.
        assert!(check_fold(FoldKind::Cross, 2, 250.0).is_ok());
        assert!(check_fold(FoldKind::Cross, 3, 170.0).is_ok());
        assert!(check_fold(FoldKind::Simple, 1, 300.0).is_ok());
        assert!(check_fold(FoldKind::Roll, 4, 135.0).is_ok());

        // Over the grammage limit carries the limit back.
        match check_fold(FoldKind::Cross, 2, 260.0) {
            Err(QuoteError::UnsupportedFold { max_grammage, .. }) => {
                assert_eq!(max_grammage, Some(250.0));
            }
            other => panic!("expected UnsupportedFold, got {:?}", other),
        }
    }

    #[test]
    fn test_one_fold_accordion_always_rejected() {
        for grammage in [60.0, 90.0, 135.0, 170.0] {
            match check_fold(FoldKind::Accordion, 1, grammage) {
                Err(QuoteError::UnsupportedFold { max_grammage, .. }) => {
                    assert_eq!(max_grammage, None);
                }
                other => panic!("expected UnsupportedFold, got {:?}", other),
            }
        }
    }
}
