//! # Paper Cost Module
//!
//! Converts sheet counts, grammage and price/kg into paper cost.
//!
//! Digital paper is bought in small cut-size lots and billed at cost (the
//! method margin covers it later); offset paper is bought in bulk and
//! carries its own margin, applied here because the legacy spreadsheet
//! prices "paper with margin" as a single line.

use crate::money::Eur;
use crate::types::PaperGrammage;
use crate::weight::{sheet_weight_g, REFERENCE_AREA_CM2};

/// Digital paper cost: `sheets/1000 × reference_weight_kg × price/kg`.
///
/// No markup here. `sheet_area_cm2` is the digital press sheet; the
/// reference weight is scaled to it when the catalog only measured the
/// 65×92 reference sheet.
pub fn digital_paper_cost(sheets: f64, sheet_area_cm2: f64, paper: &PaperGrammage) -> Eur {
    // Grams per sheet equals kg per 1000 sheets at the same area.
    let kg_per_1000 = match paper.ref_weight_kg_per_1000 {
        Some(ref_kg) => ref_kg * (sheet_area_cm2 / REFERENCE_AREA_CM2),
        None => sheet_weight_g(sheet_area_cm2, paper),
    };
    paper.price_per_kg * (sheets / 1000.0 * kg_per_1000)
}

/// Offset paper cost:
/// `sheets × sheet_area_m² × grammage/1000 × price/kg × (1 + margin)`.
///
/// `sheets` already includes calibration and running waste.
pub fn offset_paper_cost(
    sheets: f64,
    sheet_area_m2: f64,
    paper: &PaperGrammage,
    paper_margin_pct: f64,
) -> Eur {
    let kg = sheets * sheet_area_m2 * paper.grammage / 1000.0;
    paper.price_per_kg * kg * (1.0 + paper_margin_pct)
}

// =============================================================================
// Unit Tests
// =============================================================================
