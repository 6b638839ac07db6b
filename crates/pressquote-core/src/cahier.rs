//! # Cahier (Signature) Structuring
//!
//! Groups interior pages of bound products into print signatures and counts
//! the plates each press run needs.
//!
//! ## Plate Counting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  poses = 4  →  signature size = 2 × 4 = 8 pages                     │
//! │                                                                     │
//! │  36 interior pages:                                                 │
//! │    full signatures   = 36 / 8 = 4    (32 pages)                     │
//! │    remainder         = 4 pages                                      │
//! │    partial sides     = ceil(4 / 4) = 1                              │
//! │                                                                     │
//! │  plates (CMYK, 4 per side):                                         │
//! │    4 full × 4 × 2 sides = 32                                        │
//! │    partial: 1 side × 4  =  4                                        │
//! │    total                = 36   (NOT 40)                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A non-full last signature must not be billed as a full one; the partial
//! side count is a correctness requirement, not an approximation.

use serde::{Deserialize, Serialize};

/// Signature structure for a bound job at a given imposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CahierPlan {
    /// Pages per full signature (2 × poses).
    pub signature_pages: u32,
    pub full_signatures: u32,
    /// Pages left over after the full signatures.
    pub remainder_pages: u32,
    /// Total signatures including a partial last one.
    pub signature_count: u32,
    /// Printed sides of the partial signature: 0, 1 or 2.
    pub partial_sides: u32,
}

impl CahierPlan {
    /// Signatures are of mixed sizes when a partial last signature exists.
    /// Feeds the mixed-signature binding surcharge.
    pub fn is_mixed(&self) -> bool {
        self.remainder_pages > 0
    }
}

/// Structures `pages` interior pages into signatures of `2 × poses` pages.
///
/// `poses` is never zero (the imposition optimizer guarantees ≥ 1).
pub fn plan_cahiers(pages: u32, poses: u32) -> CahierPlan {
    let signature_pages = 2 * poses;
    let full_signatures = pages / signature_pages;
    let remainder_pages = pages % signature_pages;
    let partial_sides = remainder_pages.div_ceil(poses).min(2);

    CahierPlan {
        signature_pages,
        full_signatures,
        remainder_pages,
        signature_count: full_signatures + if remainder_pages > 0 { 1 } else { 0 },
        partial_sides,
    }
}

impl CahierPlan {
    /// Total plates for the interior run.
    ///
    /// Full signatures print both sides; the partial signature only prints
    /// the sides it actually uses.
    pub fn plates(&self, plates_per_side: u32) -> u32 {
        self.full_signatures * plates_per_side * 2 + self.partial_sides * plates_per_side
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit() {
        // 32 pages, 4 poses → 8-page signatures, exactly 4 of them.
        let plan = plan_cahiers(32, 4);
        assert_eq!(plan.signature_pages, 8);
        assert_eq!(plan.full_signatures, 4);
        assert_eq!(plan.remainder_pages, 0);
        assert_eq!(plan.signature_count, 4);
        assert_eq!(plan.partial_sides, 0);
        assert!(!plan.is_mixed());
    }

    #[test]
    fn test_partial_single_side() {
        // 36 pages, 4 poses → 4 full + 4 remainder pages = 1 partial side.
        let plan = plan_cahiers(36, 4);
        assert_eq!(plan.full_signatures, 4);
        assert_eq!(plan.remainder_pages, 4);
        assert_eq!(plan.signature_count, 5);
        assert_eq!(plan.partial_sides, 1);
        assert!(plan.is_mixed());
    }

    #[test]
    fn test_partial_both_sides() {
        // 44 pages, 4 poses → 5 full + 4 remainder... recompute:
        // signature = 8 pages, 44/8 = 5 full, remainder 4 → 1 side.
        // For 2 partial sides: 46 is not a multiple of 4; use 8 poses:
        // signature = 16 pages, 28 pages → 1 full, remainder 12,
        // partial sides = ceil(12/8) = 2.
        let plan = plan_cahiers(28, 8);
        assert_eq!(plan.full_signatures, 1);
        assert_eq!(plan.remainder_pages, 12);
        assert_eq!(plan.partial_sides, 2);
        assert_eq!(plan.signature_count, 2);
    }

    #[test]
    fn test_plates_not_overcounted_for_partial() {
        // 36 pages, 4 poses, CMYK: 4 full × 8 + 1 side × 4 = 36 plates,
        // not the 40 a naive ceil would give.
        let plan = plan_cahiers(36, 4);
        assert_eq!(plan.plates(4), 36);

        // Exact fit: 32 pages → 4 full × 8 = 32 plates.
        assert_eq!(plan_cahiers(32, 4).plates(4), 32);
    }

    #[test]
    fn test_mono_plates() {
        let plan = plan_cahiers(36, 4);
        assert_eq!(plan.plates(1), 9); // 4×2 + 1
    }
}
