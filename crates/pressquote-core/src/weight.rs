//! # Weight Estimator
//!
//! Per-copy weight in grams, spine thickness, and the cover wrap sheet.
//!
//! Two weight sources exist, in priority order:
//! 1. A measured reference weight on the grammage row (kg per 1000 sheets at
//!    the fixed 65×92 reference area), scaled linearly by area ratio.
//! 2. The area-density fallback `area_cm² × grammage / 9769`, the legacy
//!    conversion constant carried over from the reference spreadsheet.

use crate::types::{JobSpec, PaperGrammage};

/// Reference sheet area (cm²) at which `ref_weight_kg_per_1000` is measured.
pub const REFERENCE_AREA_CM2: f64 = 65.0 * 92.0;

/// Legacy area-density conversion constant (grams per cm²·g/m² unit).
const AREA_DENSITY_DIVISOR: f64 = 9769.0;

/// Weight of a single sheet of the given area, in grams.
///
/// Uses the measured reference weight when the catalog has one (a kg per
/// 1000 sheets figure is numerically grams per sheet), otherwise the
/// area-density fallback.
pub fn sheet_weight_g(area_cm2: f64, paper: &PaperGrammage) -> f64 {
    match paper.ref_weight_kg_per_1000 {
        // kg per 1000 sheets is numerically grams per sheet.
        Some(ref_kg) => ref_kg * (area_cm2 / REFERENCE_AREA_CM2),
        None => area_cm2 * paper.grammage / AREA_DENSITY_DIVISOR,
    }
}

/// Spine thickness in cm, glued/perfect-bound products only.
///
/// Stitched and sewn bindings have zero spine; the caller gates on the
/// binding process.
pub fn spine_thickness_cm(pages: u32, grammage: f64) -> f64 {
    pages as f64 * grammage / 100_000.0
}

/// Per-copy weight in grams.
///
/// - Interior: one leaf (closed-format sheet, 2 pages) per 2 pages.
/// - Cover: one wrap sheet widened to `(2×width + spine) × height`.
/// - Flat products: one open-format sheet.
pub fn copy_weight_g(
    job: &JobSpec,
    interior: &PaperGrammage,
    cover: Option<&PaperGrammage>,
    spine_cm: f64,
) -> f64 {
    if job.product.is_flat() || job.interior_pages == 0 {
        return sheet_weight_g(job.open_format.area_cm2(), interior);
    }

    let leaf_area = job.closed_format.area_cm2();
    let leaves = job.interior_pages as f64 / 2.0;
    let mut grams = leaves * sheet_weight_g(leaf_area, interior);

    if let Some(cover_paper) = cover {
        let wrap_area =
            (2.0 * job.closed_format.width_cm + spine_cm) * job.closed_format.height_cm;
        grams += sheet_weight_g(wrap_area, cover_paper);
    }

    grams
}

// =============================================================================
// Unit Tests
// =============================================================================
