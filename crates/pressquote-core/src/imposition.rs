//! # Imposition Optimizer
//!
//! Computes how many product copies (poses) fit on a machine sheet and
//! picks the best candidate machine format.
//!
//! ## How Poses Are Counted
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Machine sheet 65 × 92, product 21 × 29.7, bleed 0.5                │
//! │                                                                     │
//! │  Each pose cell is padded by the bleed on all four sides:          │
//! │     cell = (21 + 2×0.5) × (29.7 + 2×0.5) = 22 × 30.7               │
//! │                                                                     │
//! │  Upright grid:  floor(65/22)   × floor(92/30.7) = 2 × 2 = 4        │
//! │  Rotated grid:  floor(65/30.7) × floor(92/22)   = 2 × 4 = 8        │
//! │                                                                     │
//! │  poses = max(upright, rotated) = 8                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Candidates with the most poses win; ties break toward the smallest sheet
//! area since the sheet area drives paper cost.

use serde::{Deserialize, Serialize};

use crate::types::MachineFormat;

/// Fixed reference machine format used when the catalog carries no
/// candidates at all.
pub const FALLBACK_FORMAT: (f64, f64) = (65.0, 92.0);

/// Result of the imposition optimization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imposition {
    pub format_name: String,
    pub width_cm: f64,
    pub height_cm: f64,
    /// Product copies per machine sheet, never less than 1.
    pub poses: u32,
}

impl Imposition {
    /// Machine sheet area in m².
    pub fn sheet_area_m2(&self) -> f64 {
        self.width_cm * self.height_cm / 10_000.0
    }
}

/// Poses per sheet for one candidate: the larger of the upright and the
/// 90°-rotated grid, each cell padded by the bleed on all sides.
fn poses_on(sheet_w: f64, sheet_h: f64, product_w: f64, product_h: f64, bleed: f64) -> u32 {
    let cell_w = product_w + 2.0 * bleed;
    let cell_h = product_h + 2.0 * bleed;

    let upright = (sheet_w / cell_w).floor() * (sheet_h / cell_h).floor();
    let rotated = (sheet_w / cell_h).floor() * (sheet_h / cell_w).floor();

    upright.max(rotated) as u32
}

/// Picks the candidate machine format with the most poses.
///
/// Ties break toward the smallest sheet area (minimizes paper cost). The
/// result never reports fewer than 1 pose; an empty candidate list falls
/// back to the fixed 65×92 reference format.
pub fn pick_optimal_format(
    product_w: f64,
    product_h: f64,
    candidates: &[MachineFormat],
    bleed: f64,
) -> Imposition {
    let mut best: Option<Imposition> = None;

    for candidate in candidates {
        let poses = poses_on(
            candidate.width_cm,
            candidate.height_cm,
            product_w,
            product_h,
            bleed,
        )
        .max(1);

        let replace = match &best {
            None => true,
            Some(current) => {
                poses > current.poses
                    || (poses == current.poses
                        && candidate.width_cm * candidate.height_cm
                            < current.width_cm * current.height_cm)
            }
        };

        if replace {
            best = Some(Imposition {
                format_name: candidate.name.clone(),
                width_cm: candidate.width_cm,
                height_cm: candidate.height_cm,
                poses,
            });
        }
    }

    best.unwrap_or_else(|| {
        let (w, h) = FALLBACK_FORMAT;
        Imposition {
            format_name: "65x92".to_string(),
            width_cm: w,
            height_cm: h,
            poses: poses_on(w, h, product_w, product_h, bleed).max(1),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(name: &str, w: f64, h: f64) -> MachineFormat {
        MachineFormat {
            name: name.to_string(),
            width_cm: w,
            height_cm: h,
        }
    }

    #[test]
    fn test_a4_on_65x92_rotated_grid_wins() {
        // Upright: 2×2 = 4, rotated: 2×4 = 8.
        assert_eq!(poses_on(65.0, 92.0, 21.0, 29.7, 0.5), 8);
    }

    #[test]
    fn test_picks_candidate_with_most_poses() {
        let candidates = vec![fmt("52x74", 52.0, 74.0), fmt("65x92", 65.0, 92.0)];
        let imp = pick_optimal_format(21.0, 29.7, &candidates, 0.5);
        assert_eq!(imp.format_name, "65x92");
        assert_eq!(imp.poses, 8);
    }

    #[test]
    fn test_tie_breaks_on_smaller_area() {
        // Both formats fit exactly 4 poses of a 30×40 product.
        let candidates = vec![fmt("big", 70.0, 100.0), fmt("small", 65.0, 85.0)];
        let imp = pick_optimal_format(30.0, 40.0, &candidates, 0.5);
        assert_eq!(imp.format_name, "small");
    }

    #[test]
    fn test_never_below_one_pose() {
        // Product larger than the sheet still reports 1 pose.
        let candidates = vec![fmt("52x74", 52.0, 74.0)];
        let imp = pick_optimal_format(80.0, 120.0, &candidates, 0.5);
        assert_eq!(imp.poses, 1);
    }

    #[test]
    fn test_empty_candidates_fall_back_to_reference() {
        let imp = pick_optimal_format(21.0, 29.7, &[], 0.5);
        assert_eq!(imp.format_name, "65x92");
        assert_eq!(imp.width_cm, 65.0);
        assert_eq!(imp.height_cm, 92.0);
        assert_eq!(imp.poses, 8);
    }

    #[test]
    fn test_bleed_reduces_poses() {
        // Without bleed a 21×29.7 product packs 3×3 = 9 on 65×92
        // (upright floor(65/21)=3, floor(92/29.7)=3).
        assert_eq!(poses_on(65.0, 92.0, 21.0, 29.7, 0.0), 9);
        assert_eq!(poses_on(65.0, 92.0, 21.0, 29.7, 0.5), 8);
    }
}
