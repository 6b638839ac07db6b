//! # Digital Pricing Module
//!
//! Click-based pricing for the digital press.
//!
//! ## Click Counting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  A click is one printed side of a press sheet. The click-divisor    │
//! │  catalog says how many product copies one click carries, per        │
//! │  product format and per side count:                                 │
//! │                                                                     │
//! │  flat:   clicks = qty / divisor        (recto or recto-verso row)   │
//! │  bound:  interior = pages × qty / (rv_divisor × 2)                  │
//! │          cover    = 4 × qty / (rv_divisor × 2)                      │
//! │                                                                     │
//! │  Divisors match on exact or 90°-rotated dimensions; unknown         │
//! │  formats fall back to the A4 row.                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Binding and lamination prices come from quantity tiers on the catalog
//! rows; stapling alone keeps a hardcoded two-tier fallback so saddle
//! stitched jobs stay quotable even on a bare catalog.

use crate::config::PricingConfig;
use crate::error::{MethodError, MethodResult};
use crate::money::Eur;
use crate::paper::digital_paper_cost;
use crate::resolve::ResolvedJob;
use crate::types::{BindingProcess, ClickDivisor, FormatCm, JobSpec, Trace};

/// Digital press sheet (SRA3), in cm. All digital paper is bought cut to
/// this size regardless of the product format.
pub const DIGITAL_SHEET_CM: (f64, f64) = (32.0, 45.0);

/// Dimension tolerance when matching a format against the divisor catalog.
const DIM_EPSILON: f64 = 0.05;

/// Stapling fallback: quantities at or above this use the volume tier.
const STAPLING_VOLUME_QTY: u32 = 200;

/// Itemized digital production costs (before the shared extras and margin).
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitalCosts {
    pub interior_clicks: f64,
    pub cover_clicks: f64,
    pub click_cost: Eur,
    pub paper_cost: Eur,
    pub binding_cost: Eur,
    pub lamination_cost: Eur,
}

/// Finds the click divisor row for a product format: exact match first,
/// then the 90°-rotated match, then the A4 row.
fn find_divisor<'a>(
    divisors: &'a [ClickDivisor],
    format: &FormatCm,
) -> MethodResult<&'a ClickDivisor> {
    let matches_dims = |d: &ClickDivisor, w: f64, h: f64| {
        (d.width_cm - w).abs() < DIM_EPSILON && (d.height_cm - h).abs() < DIM_EPSILON
    };

    divisors
        .iter()
        .find(|d| matches_dims(d, format.width_cm, format.height_cm))
        .or_else(|| {
            divisors
                .iter()
                .find(|d| matches_dims(d, format.height_cm, format.width_cm))
        })
        .or_else(|| divisors.iter().find(|d| d.format_name == "A4"))
        .ok_or_else(|| {
            MethodError::new(format!(
                "no click divisor for format {} x {} cm and no A4 fallback row",
                format.width_cm, format.height_cm
            ))
        })
}

/// Binding cost on the digital path.
///
/// Stapling uses the hardcoded two-tier formula; every other process needs
/// a catalog tier covering both the page count and the quantity.
fn binding_cost(job: &JobSpec, resolved: &ResolvedJob<'_>) -> MethodResult<Eur> {
    let binding = match resolved.binding {
        Some(b) => b,
        None => return Ok(Eur::zero()),
    };

    let qty = job.quantity;

    if binding.process == BindingProcess::Stapling {
        let cost = if qty >= STAPLING_VOLUME_QTY {
            qty as f64 * 0.23 + 10.0
        } else {
            qty as f64 * 0.30 + 15.0
        };
        return Ok(Eur::new(cost));
    }

    let tier = binding
        .digital_tiers
        .iter()
        .find(|t| t.contains(job.interior_pages, qty))
        .ok_or_else(|| {
            MethodError::new(format!(
                "binding '{}' has no digital tier covering {} pages at quantity {}",
                binding.name, job.interior_pages, qty
            ))
        })?;

    Ok(tier.setup_cost + tier.unit_cost * qty as f64)
}

/// Lamination cost on the digital path: quantity tier, sheet count doubled
/// for two-sided lamination.
fn lamination_cost(job: &JobSpec, resolved: &ResolvedJob<'_>) -> MethodResult<Eur> {
    let (selection, finish) = match (&job.lamination, resolved.lamination) {
        (Some(s), Some(f)) => (s, f),
        _ => return Ok(Eur::zero()),
    };

    let tier = finish
        .digital_tiers
        .iter()
        .find(|t| t.contains(job.quantity))
        .ok_or_else(|| {
            MethodError::new(format!(
                "lamination '{}' has no digital tier covering quantity {}",
                finish.name, job.quantity
            ))
        })?;

    let sheets = job.quantity as f64 * if selection.two_sided { 2.0 } else { 1.0 };
    Ok(tier.setup + tier.per_sheet * sheets)
}

/// Computes the digital production costs for a resolved job.
pub fn compute(
    job: &JobSpec,
    resolved: &ResolvedJob<'_>,
    cfg: &PricingConfig,
    trace: &mut Trace,
) -> MethodResult<DigitalCosts> {
    let divisor = find_divisor(resolved.click_divisors, &job.closed_format)?;
    let qty = job.quantity as f64;

    let (interior_clicks, cover_clicks, interior_sheets, cover_sheets) = if job.is_bound() {
        // Bound products always print recto-verso; a sheet is two clicks.
        let rv = positive_divisor(divisor.recto_verso, divisor)?;
        let interior_clicks = job.interior_pages as f64 * qty / (rv * 2.0);
        let cover_clicks = if job.has_cover() { 4.0 * qty / (rv * 2.0) } else { 0.0 };
        (
            interior_clicks,
            cover_clicks,
            interior_clicks / 2.0,
            cover_clicks / 2.0,
        )
    } else {
        let div = if job.recto_verso {
            positive_divisor(divisor.recto_verso, divisor)?
        } else {
            positive_divisor(divisor.recto, divisor)?
        };
        let clicks = qty / div;
        let sheets = if job.recto_verso { clicks / 2.0 } else { clicks };
        (clicks, 0.0, sheets, 0.0)
    };

    trace.push(
        "interior_clicks",
        interior_clicks,
        format!("divisor row '{}'", divisor.format_name),
    );
    if cover_clicks > 0.0 {
        trace.push(
            "cover_clicks",
            cover_clicks,
            format!("4 x {} / (rv_divisor x 2)", job.quantity),
        );
    }

    let interior_rate = if resolved.interior_color.is_color() {
        cfg.click_color
    } else {
        cfg.click_mono
    };
    let cover_rate = match resolved.cover_color {
        Some(c) if c.is_color() => cfg.click_color,
        Some(_) => cfg.click_mono,
        None => interior_rate,
    };
    let click_cost = Eur::new(interior_clicks * interior_rate + cover_clicks * cover_rate);
    trace.push(
        "click_cost",
        click_cost.amount(),
        format!(
            "{interior_clicks} x {interior_rate} + {cover_clicks} x {cover_rate}"
        ),
    );

    let sheet_area_cm2 = DIGITAL_SHEET_CM.0 * DIGITAL_SHEET_CM.1;
    let mut paper_cost = digital_paper_cost(interior_sheets, sheet_area_cm2, resolved.interior_paper);
    if let Some(cover_paper) = resolved.cover_paper {
        paper_cost += digital_paper_cost(cover_sheets, sheet_area_cm2, cover_paper);
    }
    trace.push(
        "digital_paper_cost",
        paper_cost.amount(),
        format!("{interior_sheets} + {cover_sheets} SRA3 sheets"),
    );

    let binding_cost = binding_cost(job, resolved)?;
    if !binding_cost.is_zero() {
        trace.push("digital_binding_cost", binding_cost.amount(), "tier lookup");
    }

    let lamination_cost = lamination_cost(job, resolved)?;
    if !lamination_cost.is_zero() {
        trace.push(
            "digital_lamination_cost",
            lamination_cost.amount(),
            "qty tier lookup",
        );
    }

    Ok(DigitalCosts {
        interior_clicks,
        cover_clicks,
        click_cost,
        paper_cost,
        binding_cost,
        lamination_cost,
    })
}

fn positive_divisor(value: f64, row: &ClickDivisor) -> MethodResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(MethodError::new(format!(
            "click divisor row '{}' has a non-positive divisor",
            row.format_name
        )))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
