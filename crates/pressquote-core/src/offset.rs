//! # Offset Pricing Module
//!
//! Plate, calage, press-run, paper, binding, rainage and lamination costs
//! for the offset press.
//!
//! ## Sheet Accounting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  base sheets                                                        │
//! │    flat:   qty / poses                                              │
//! │    bound:  interior = qty × pages / (2 × poses)                     │
//! │            cover    = qty / cover_poses   (wrap is two leaves wide) │
//! │                                                                     │
//! │  waste (per run group, interior and cover accounted separately)     │
//! │    calibration: press_runs × calibration_waste_sheets               │
//! │    running:     running_waste_pct × base                            │
//! │    varnish:     + varnish_waste_sheets when the mode has varnish    │
//! │                                                                     │
//! │  total_sheets = Σ (base + calibration + running [+ varnish])        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Binding surcharges stack multiplicatively on the tier base; rainage
//! (cover creasing) is additive and only exists for cover-bearing products.

use crate::config::PricingConfig;
use crate::error::{MethodError, MethodResult};
use crate::money::Eur;
use crate::paper::offset_paper_cost;
use crate::resolve::ResolvedJob;
use crate::types::{BindingRule, BindingType, JobSpec, PaperGrammage, Trace};

/// Itemized offset production costs (before the shared extras and margin).
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetCosts {
    pub poses: u32,
    pub signatures: u32,
    pub plates: u32,
    pub total_sheets: f64,
    pub plate_cost: Eur,
    pub calage_cost: Eur,
    pub running_cost: Eur,
    pub paper_cost: Eur,
    pub binding_cost: Eur,
    pub rainage_cost: Eur,
    pub lamination_cost: Eur,
}

/// One run group: base sheets plus its share of the waste.
fn sheets_with_waste(base: f64, press_runs: f64, has_varnish: bool, cfg: &PricingConfig) -> f64 {
    let mut total = base + press_runs * cfg.calibration_waste_sheets + cfg.running_waste_pct * base;
    if has_varnish {
        total += cfg.varnish_waste_sheets;
    }
    total
}

/// Multiplicative surcharge factors triggered by the binding's rule set.
///
/// Returns `(label, fractional_rate)` pairs; the order in the rule set is
/// preserved but irrelevant to the result since factors commute.
pub fn binding_surcharge_factors(
    binding: &BindingType,
    interior: &PaperGrammage,
    inserted_signatures: u32,
    spine_mm: f64,
    mixed_signatures: bool,
) -> Vec<(&'static str, f64)> {
    let mut factors = Vec::new();

    for rule in &binding.rules {
        match rule {
            BindingRule::LightPaperSurcharge {
                max_grammage,
                surcharge,
            } => {
                if interior.grammage < *max_grammage {
                    factors.push(("light paper", *surcharge));
                }
            }
            BindingRule::CoatedPaperSurcharge {
                finish,
                min_grammage,
                surcharge,
            } => {
                if interior.finish == *finish && interior.grammage > *min_grammage {
                    factors.push(("coated heavy paper", *surcharge));
                }
            }
            BindingRule::HeavyPaperSurcharge {
                min_grammage,
                surcharge,
            } => {
                if interior.grammage > *min_grammage {
                    factors.push(("heavy paper", *surcharge));
                }
            }
            BindingRule::InsertSurcharge { single, multiple } => {
                if inserted_signatures == 1 {
                    factors.push(("one inserted signature", *single));
                } else if inserted_signatures >= 2 {
                    factors.push(("multiple inserted signatures", *multiple));
                }
            }
            BindingRule::SpineRangeSurcharge {
                min_mm,
                max_mm,
                surcharge,
            } => {
                if spine_mm > 0.0 && (spine_mm < *min_mm || spine_mm > *max_mm) {
                    factors.push(("spine outside standard range", *surcharge));
                }
            }
            BindingRule::MixedSignatureSurcharge { surcharge } => {
                if mixed_signatures {
                    factors.push(("mixed signature sizes", *surcharge));
                }
            }
        }
    }

    factors
}

/// Binding cost: volume tier base, then the rule surcharges stacked
/// multiplicatively.
fn binding_cost(
    job: &JobSpec,
    resolved: &ResolvedJob<'_>,
    signatures: u32,
    mixed: bool,
    trace: &mut Trace,
) -> MethodResult<Eur> {
    let binding = match resolved.binding {
        Some(b) => b,
        None => return Ok(Eur::zero()),
    };

    // Largest threshold not exceeding the signature count; a job below every
    // threshold takes the smallest tier.
    let tier = binding
        .offset_tiers
        .iter()
        .filter(|t| t.min_signatures <= signatures)
        .max_by_key(|t| t.min_signatures)
        .or_else(|| binding.offset_tiers.iter().min_by_key(|t| t.min_signatures))
        .ok_or_else(|| {
            MethodError::new(format!("binding '{}' has no offset tiers", binding.name))
        })?;

    let base = tier.calage + tier.roulage_per_1000 * (job.quantity as f64 / 1000.0);

    let factors = binding_surcharge_factors(
        binding,
        resolved.interior_paper,
        job.inserted_signatures,
        resolved.spine_cm * 10.0,
        mixed,
    );

    let mut cost = base;
    for (label, rate) in &factors {
        cost = cost * (1.0 + rate);
        trace.push(
            format!("binding_surcharge:{label}"),
            *rate,
            format!("x (1 + {rate})"),
        );
    }

    Ok(cost)
}

/// Offset lamination: per-m² rate on the laminated piece, with a setup
/// forfait and a minimum billing floor.
fn lamination_cost(job: &JobSpec, resolved: &ResolvedJob<'_>) -> MethodResult<Eur> {
    let (selection, finish) = match (&job.lamination, resolved.lamination) {
        (Some(s), Some(f)) => (s, f),
        _ => return Ok(Eur::zero()),
    };

    let (rate, calage) = match (finish.offset_rate_per_m2, finish.offset_calage) {
        (Some(rate), Some(calage)) => (rate, calage),
        _ => {
            return Err(MethodError::new(format!(
                "lamination '{}' has no offset rate/calage configuration",
                finish.name
            )))
        }
    };

    // The laminated piece: the cover wrap for bound products, the open
    // sheet otherwise.
    let area_m2 = if job.is_bound() {
        (2.0 * job.closed_format.width_cm + resolved.spine_cm) * job.closed_format.height_cm
            / 10_000.0
    } else {
        job.open_format.area_m2()
    };

    let sides = if selection.two_sided { 2.0 } else { 1.0 };
    let cost = calage + Eur::new(area_m2 * job.quantity as f64 * sides * rate);
    Ok(cost.max(finish.offset_minimum))
}

/// Computes the offset production costs for a resolved job.
pub fn compute(
    job: &JobSpec,
    resolved: &ResolvedJob<'_>,
    cfg: &PricingConfig,
    trace: &mut Trace,
) -> MethodResult<OffsetCosts> {
    let qty = job.quantity as f64;
    let poses = resolved.imposition.poses;
    let sheet_area_m2 = resolved.imposition.sheet_area_m2();

    let (signatures, mixed, plates, interior_base, interior_runs, cover_base, cover_runs) =
        match &resolved.cahier {
            Some(plan) => {
                // Interior: one signature sheet carries 2 × poses pages of
                // one copy, so each copy consumes pages / (2 × poses) sheets;
                // the partial signature counts fractionally.
                let interior_base = qty * job.interior_pages as f64
                    / (2.0 * poses as f64);
                let interior_plates = plan.plates(resolved.interior_color.plates_per_side);
                let interior_runs = plan.signature_count as f64;

                // Cover: the wrap is two leaves wide, so half the poses fit.
                let (cover_base, cover_runs, cover_plates) = if job.has_cover() {
                    let cover_poses = (poses / 2).max(1) as f64;
                    let cover_pps = resolved
                        .cover_color
                        .unwrap_or(resolved.interior_color)
                        .plates_per_side;
                    (qty / cover_poses, 1.0, cover_pps * 2)
                } else {
                    (0.0, 0.0, 0)
                };

                (
                    plan.signature_count,
                    plan.is_mixed(),
                    interior_plates + cover_plates,
                    interior_base,
                    interior_runs,
                    cover_base,
                    cover_runs,
                )
            }
            None => {
                let sides = if job.recto_verso { 2 } else { 1 };
                let plates = resolved.interior_color.plates_per_side * sides;
                (0, false, plates, qty / poses as f64, sides as f64, 0.0, 0.0)
            }
        };

    let interior_varnish = resolved.interior_color.has_varnish;
    let cover_varnish = resolved.cover_color.map(|c| c.has_varnish).unwrap_or(false);

    let interior_sheets = sheets_with_waste(interior_base, interior_runs, interior_varnish, cfg);
    let cover_sheets = if cover_base > 0.0 {
        sheets_with_waste(cover_base, cover_runs, cover_varnish, cfg)
    } else {
        0.0
    };
    let total_sheets = interior_sheets + cover_sheets;

    trace.push("poses", poses as f64, format!("on {}", resolved.imposition.format_name));
    trace.push("plates", plates as f64, "full sides x 2 + partial sides");
    trace.push(
        "total_sheets",
        total_sheets,
        format!("{interior_base} + {cover_base} base + waste"),
    );

    let plate_cost = Eur::new(plates as f64 * cfg.plate_cost);
    let calage_cost = Eur::new(plates as f64 * cfg.calage_per_plate);
    trace.push(
        "plate_cost",
        plate_cost.amount(),
        format!("{plates} x {}", cfg.plate_cost),
    );
    trace.push(
        "calage_cost",
        calage_cost.amount(),
        format!("{plates} x {}", cfg.calage_per_plate),
    );

    let roulage_rate = cfg.roulage_rate(total_sheets);
    let running_cost = Eur::new(roulage_rate * total_sheets / 1000.0);
    trace.push(
        "running_cost",
        running_cost.amount(),
        format!("{roulage_rate} per 1000 x {total_sheets}"),
    );

    let mut paper_cost = offset_paper_cost(
        interior_sheets,
        sheet_area_m2,
        resolved.interior_paper,
        cfg.paper_margin_pct,
    );
    if let Some(cover_paper) = resolved.cover_paper {
        paper_cost += offset_paper_cost(
            cover_sheets,
            sheet_area_m2,
            cover_paper,
            cfg.paper_margin_pct,
        );
    }
    trace.push(
        "offset_paper_cost",
        paper_cost.amount(),
        format!("{total_sheets} sheets incl. {} margin", cfg.paper_margin_pct),
    );

    let binding_cost = binding_cost(job, resolved, signatures, mixed, trace)?;
    if !binding_cost.is_zero() {
        trace.push("offset_binding_cost", binding_cost.amount(), "tier + surcharges");
    }

    // Rainage: the cover is creased before wrapping, one tier per
    // signature count (clamped at 7).
    let rainage_cost = if job.has_cover() {
        let (rainage_calage, rainage_roulage) = cfg.rainage_tier(signatures);
        let cost = Eur::new(rainage_calage + rainage_roulage * qty / 1000.0);
        trace.push(
            "rainage_cost",
            cost.amount(),
            format!("tier {} of 7", signatures.clamp(1, 7)),
        );
        cost
    } else {
        Eur::zero()
    };

    let lamination_cost = lamination_cost(job, resolved)?;
    if !lamination_cost.is_zero() {
        trace.push(
            "offset_lamination_cost",
            lamination_cost.amount(),
            "max(minimum, calage + area x qty x rate)",
        );
    }

    Ok(OffsetCosts {
        poses,
        signatures,
        plates,
        total_sheets,
        plate_cost,
        calage_cost,
        running_cost,
        paper_cost,
        binding_cost,
        rainage_cost,
        lamination_cost,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
