//! # Quote Orchestrator
//!
//! The single entry point of the engine: prices a job under both
//! manufacturing methods and assembles the unified result.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  validate ─► resolve ids ─► imposition/cahier/weights               │
//! │      │                                                              │
//! │      ├─► availability check (never errors)                          │
//! │      ├─► shared extras: fold, finishing, packaging, delivery        │
//! │      │                                                              │
//! │      ├─► digital breakdown ──┐   per-method errors downgrade to     │
//! │      ├─► offset breakdown ───┤   an unavailable method, never to    │
//! │      │                       │   a failed calculation               │
//! │      └─► margins, best_method, ecart, traces ◄┘                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculation is a pure function of `(JobSpec, CatalogSnapshot)`:
//! same inputs, byte-identical result.
//!
//! Rounding discipline: every cost component is rounded to the cent exactly
//! once, when it is placed into a breakdown; subtotals and margins are
//! computed over the rounded components so the printed lines always sum.

use crate::availability::{check_availability, MethodStatus};
use crate::config::PricingConfig;
use crate::delivery::{cheapest_delivery, plan_route};
use crate::digital;
use crate::error::{MethodError, MethodResult, QuoteResult};
use crate::finishing::{finishing_cost, fold_cost, FinishingCost};
use crate::money::Eur;
use crate::offset;
use crate::packaging::{packaging_cost, PackagingCost};
use crate::resolve::{resolve, ResolvedJob};
use crate::types::{
    CatalogSnapshot, DigitalBreakdown, JobSpec, Method, OffsetBreakdown, PricingResult,
    ProductKind, Trace,
};

/// Costs shared verbatim by both methods.
struct SharedCosts {
    fold: MethodResult<Eur>,
    finishing: FinishingCost,
    packaging: PackagingCost,
    /// Cheapest delivery (cost, carrier name); `Err` when points exist but
    /// no active carrier serves the route.
    delivery: MethodResult<(Eur, Option<String>)>,
}

fn shared_costs(
    job: &JobSpec,
    resolved: &ResolvedJob<'_>,
    snapshot: &CatalogSnapshot,
    cfg: &PricingConfig,
) -> SharedCosts {
    let fold = match (&job.fold, resolved.fold_type) {
        (Some(selection), Some(fold_type)) => fold_cost(selection, fold_type, job.quantity),
        _ => Ok(Eur::zero()),
    };

    let total_weight_kg = job.quantity as f64 * resolved.copy_weight_g / 1000.0;
    let packaging = packaging_cost(job, total_weight_kg, cfg);
    let finishing = finishing_cost(job, cfg);

    let needs_bindery = resolved
        .binding
        .map(|b| b.process.needs_bindery_transit())
        .unwrap_or(false);
    let legs = plan_route(job, needs_bindery, cfg);

    let delivery = if legs.is_empty() {
        Ok((Eur::zero(), None))
    } else {
        match cheapest_delivery(snapshot, &legs, resolved.copy_weight_g, job.quantity) {
            Some(quote) => Ok((quote.cost, Some(quote.carrier_name))),
            None => Err(MethodError::new(
                "no active carrier serves the delivery route",
            )),
        }
    };

    SharedCosts {
        fold,
        finishing,
        packaging,
        delivery,
    }
}

fn method_gate(status: &MethodStatus) -> MethodResult<()> {
    if status.available {
        Ok(())
    } else {
        Err(MethodError {
            reason: status
                .reason
                .clone()
                .unwrap_or_else(|| "method unavailable".to_string()),
            suggestion: status.suggestion.clone(),
        })
    }
}

/// Digital margin model, product-dependent:
/// - brochures take the flat brochure margin on the delivery-inclusive
///   subtotal;
/// - other products use the markup multiplier when configured above 1.0,
///   else the legacy additive digital margin.
fn digital_margin(product: ProductKind, subtotal: Eur, cfg: &PricingConfig) -> Eur {
    if product == ProductKind::Brochure {
        subtotal.percent(cfg.brochure_margin_pct)
    } else if cfg.digital_markup_multiplier > 1.0 {
        subtotal * cfg.digital_markup_multiplier - subtotal
    } else {
        subtotal.percent(cfg.digital_margin_pct)
    }
}

fn price_digital(
    job: &JobSpec,
    resolved: &ResolvedJob<'_>,
    shared: &SharedCosts,
    cfg: &PricingConfig,
    trace: &mut Trace,
) -> MethodResult<DigitalBreakdown> {
    let costs = digital::compute(job, resolved, cfg, trace)?;
    let fold = shared.fold.clone()?;
    let (delivery, carrier) = shared.delivery.clone()?;

    let mut b = DigitalBreakdown {
        interior_clicks: costs.interior_clicks,
        cover_clicks: costs.cover_clicks,
        click_cost: costs.click_cost.rounded(),
        paper_cost: costs.paper_cost.rounded(),
        binding_cost: costs.binding_cost.rounded(),
        lamination_cost: costs.lamination_cost.rounded(),
        fold_cost: fold.rounded(),
        finishing_cost: shared.finishing.total().rounded(),
        packaging_cost: shared.packaging.total().rounded(),
        delivery_cost: delivery.rounded(),
        ..DigitalBreakdown::default()
    };

    b.subtotal = b.click_cost
        + b.paper_cost
        + b.binding_cost
        + b.lamination_cost
        + b.fold_cost
        + b.finishing_cost
        + b.packaging_cost
        + b.delivery_cost;
    b.margin = digital_margin(job.product, b.subtotal, cfg).rounded();
    b.total = b.subtotal + b.margin;

    if let Some(name) = carrier {
        trace.push("delivery_cost", b.delivery_cost.amount(), format!("carrier {name}"));
    }
    trace.push("subtotal", b.subtotal.amount(), "sum of components");
    trace.push("margin", b.margin.amount(), "digital margin model");
    trace.push("total", b.total.amount(), "subtotal + margin");

    Ok(b)
}

fn price_offset(
    job: &JobSpec,
    resolved: &ResolvedJob<'_>,
    shared: &SharedCosts,
    cfg: &PricingConfig,
    trace: &mut Trace,
) -> MethodResult<OffsetBreakdown> {
    let costs = offset::compute(job, resolved, cfg, trace)?;
    let fold = shared.fold.clone()?;
    let (delivery, carrier) = shared.delivery.clone()?;

    let mut b = OffsetBreakdown {
        poses: costs.poses,
        signatures: costs.signatures,
        plates: costs.plates,
        total_sheets: costs.total_sheets,
        plate_cost: costs.plate_cost.rounded(),
        calage_cost: costs.calage_cost.rounded(),
        running_cost: costs.running_cost.rounded(),
        paper_cost: costs.paper_cost.rounded(),
        binding_cost: costs.binding_cost.rounded(),
        rainage_cost: costs.rainage_cost.rounded(),
        lamination_cost: costs.lamination_cost.rounded(),
        fold_cost: fold.rounded(),
        finishing_cost: shared.finishing.total().rounded(),
        packaging_cost: shared.packaging.total().rounded(),
        delivery_cost: delivery.rounded(),
        ..OffsetBreakdown::default()
    };

    b.subtotal = b.plate_cost
        + b.calage_cost
        + b.running_cost
        + b.paper_cost
        + b.binding_cost
        + b.rainage_cost
        + b.lamination_cost
        + b.fold_cost
        + b.finishing_cost
        + b.packaging_cost
        + b.delivery_cost;
    b.margin = b.subtotal.percent(cfg.offset_margin_pct).rounded();
    b.total = b.subtotal + b.margin;

    if let Some(name) = carrier {
        trace.push("delivery_cost", b.delivery_cost.amount(), format!("carrier {name}"));
    }
    trace.push("subtotal", b.subtotal.amount(), "sum of components");
    trace.push(
        "margin",
        b.margin.amount(),
        format!("subtotal x {}", cfg.offset_margin_pct),
    );
    trace.push("total", b.total.amount(), "subtotal + margin");

    Ok(b)
}

/// Prices a job under both methods and assembles the unified result.
///
/// Fatal errors (contract violations, unknown catalog references,
/// unsupported folds) fail the whole calculation; per-method problems zero
/// that method's breakdown and are carried as reason/suggestion strings.
pub fn calculate(job: &JobSpec, snapshot: &CatalogSnapshot) -> QuoteResult<PricingResult> {
    let resolved = resolve(job, snapshot)?;
    let cfg = &snapshot.config;

    let availability = check_availability(snapshot, resolved.binding, resolved.lamination);
    let shared = shared_costs(job, &resolved, snapshot, cfg);

    let mut digital_trace = Trace::new();
    let digital_result = method_gate(&availability.digital)
        .and_then(|_| price_digital(job, &resolved, &shared, cfg, &mut digital_trace));

    let mut offset_trace = Trace::new();
    let offset_result = method_gate(&availability.offset)
        .and_then(|_| price_offset(job, &resolved, &shared, cfg, &mut offset_trace));

    let (digital, digital_error, digital_suggestion) = match digital_result {
        Ok(b) => (b, None, None),
        Err(e) => (DigitalBreakdown::default(), Some(e.reason), e.suggestion),
    };
    let (offset, offset_error, offset_suggestion) = match offset_result {
        Ok(b) => (b, None, None),
        Err(e) => (OffsetBreakdown::default(), Some(e.reason), e.suggestion),
    };

    let digital_available = digital_error.is_none();
    let offset_available = offset_error.is_none();

    let best_method = match (digital_available, offset_available) {
        (true, true) => {
            if digital.total <= offset.total {
                Some(Method::Digital)
            } else {
                Some(Method::Offset)
            }
        }
        (true, false) => Some(Method::Digital),
        (false, true) => Some(Method::Offset),
        (false, false) => None,
    };

    let best_total = match best_method {
        Some(Method::Digital) => digital.total,
        Some(Method::Offset) => offset.total,
        None => Eur::zero(),
    };

    let ecart = if digital_available && offset_available {
        Eur::new((digital.total.amount() - offset.total.amount()).abs()).rounded()
    } else {
        Eur::zero()
    };

    Ok(PricingResult {
        digital_total: digital.total,
        offset_total: offset.total,
        digital,
        offset,
        best_method,
        best_total,
        ecart,
        digital_error,
        digital_suggestion,
        offset_error,
        offset_suggestion,
        digital_trace: digital_trace.into_vars(),
        offset_trace: offset_trace.into_vars(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;
    use crate::types::DeliveryPoint;

    #[test]
    fn test_flyer_prices_both_methods() {
        let snapshot = testkit::snapshot();
        let job = testkit::a4_flyer(1000);
        let result = calculate(&job, &snapshot).unwrap();

        assert!(result.digital_error.is_none());
        assert!(result.offset_error.is_none());
        assert!(result.digital.total.amount() > 0.0);
        assert!(result.offset.total.amount() > 0.0);
        assert!(result.best_method.is_some());
        let cheaper = result
            .digital_total
            .amount()
            .min(result.offset_total.amount());
        assert_eq!(result.best_total.amount(), cheaper);
    }

    #[test]
    fn test_ecart_is_gap_between_methods() {
        let snapshot = testkit::snapshot();
        let job = testkit::a4_flyer(1000);
        let result = calculate(&job, &snapshot).unwrap();

        let gap = (result.digital_total.amount() - result.offset_total.amount()).abs();
        assert!((result.ecart.amount() - (gap * 100.0).round() / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sewn_binding_offset_only_with_reason() {
        let snapshot = testkit::snapshot();
        let mut job = testkit::glued_brochure(500, 64);
        job.binding_id = Some("bind-sewn".to_string());
        let result = calculate(&job, &snapshot).unwrap();

        assert!(result.digital_error.is_some());
        assert!(result.digital.total.is_zero());
        assert!(result.offset_error.is_none());
        assert_eq!(result.best_method, Some(Method::Offset));
    }

    #[test]
    fn test_lamination_without_offset_config() {
        let snapshot = testkit::snapshot();
        let mut job = testkit::a4_flyer(1000);
        job.lamination = Some(crate::types::LaminationSelection {
            finish_id: "lam-soft".to_string(),
            two_sided: false,
        });
        let result = calculate(&job, &snapshot).unwrap();

        assert!(result.offset_error.is_some());
        assert!(result.offset.total.is_zero());
        assert!(result.digital_error.is_none());
        assert_eq!(result.best_method, Some(Method::Digital));
        assert!(result.ecart.is_zero());
    }

    #[test]
    fn test_sewn_binding_adds_bindery_round_trip() {
        let snapshot = testkit::snapshot();
        let mut glued = testkit::glued_brochure(500, 64);
        glued.delivery_points = vec![DeliveryPoint {
            copies: 500,
            department: "75".to_string(),
            tail_lift: false,
        }];
        let mut sewn = glued.clone();
        sewn.binding_id = Some("bind-sewn".to_string());

        let glued_result = calculate(&glued, &snapshot).unwrap();
        let sewn_result = calculate(&sewn, &snapshot).unwrap();

        // Same route plus two bindery legs: delivery strictly more expensive.
        assert!(
            sewn_result.offset.delivery_cost.amount()
                > glued_result.offset.delivery_cost.amount()
        );
    }

    #[test]
    fn test_determinism() {
        let snapshot = testkit::snapshot();
        let mut job = testkit::glued_brochure(750, 48);
        job.delivery_points = vec![DeliveryPoint {
            copies: 750,
            department: "69".to_string(),
            tail_lift: true,
        }];

        let a = calculate(&job, &snapshot).unwrap();
        let b = calculate(&job, &snapshot).unwrap();
        assert_eq!(
            serde_json::to_string(&a.digital).unwrap(),
            serde_json::to_string(&b.digital).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&a.offset).unwrap(),
            serde_json::to_string(&b.offset).unwrap()
        );
        assert_eq!(a.best_total, b.best_total);
    }

    #[test]
    fn test_breakdown_lines_sum_to_subtotal() {
        let snapshot = testkit::snapshot();
        let job = testkit::glued_brochure(500, 64);
        let result = calculate(&job, &snapshot).unwrap();

        let o = &result.offset;
        let sum = o.plate_cost
            + o.calage_cost
            + o.running_cost
            + o.paper_cost
            + o.binding_cost
            + o.rainage_cost
            + o.lamination_cost
            + o.fold_cost
            + o.finishing_cost
            + o.packaging_cost
            + o.delivery_cost;
        assert!((sum.amount() - o.subtotal.amount()).abs() < 1e-9);
        assert!((o.total.amount() - (o.subtotal + o.margin).amount()).abs() < 1e-9);
    }

    #[test]
    fn test_traces_are_populated() {
        let snapshot = testkit::snapshot();
        let job = testkit::a4_flyer(1000);
        let result = calculate(&job, &snapshot).unwrap();

        assert!(result.digital_trace.iter().any(|v| v.name == "interior_clicks"));
        assert!(result.offset_trace.iter().any(|v| v.name == "plate_cost"));
        assert!(result.offset_trace.iter().any(|v| v.name == "total"));
    }

    #[test]
    fn test_zero_quantity_is_fatal() {
        let snapshot = testkit::snapshot();
        let job = testkit::a4_flyer(0);
        assert!(calculate(&job, &snapshot).is_err());
    }
}
