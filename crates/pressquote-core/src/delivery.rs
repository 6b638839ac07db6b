//! # Delivery Cost Module
//!
//! Per-point shipping cost from weight, zone and carrier rate tables, plus
//! the cheapest-carrier scan.
//!
//! ## Routing Plan
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  A job's delivery is a small routing plan:                          │
//! │                                                                     │
//! │  print shop ──(optional bindery round trip)──► delivery points      │
//! │                                                                     │
//! │  Sewn bindings are subcontracted: the full job travels to the       │
//! │  bindery's department and back before the customer legs. The        │
//! │  bindery legs are planned like any other leg instead of being a     │
//! │  special case inside the carrier loop, so every carrier candidate   │
//! │  prices the same plan.                                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rate Lookup
//! Department-scoped rates take precedence over zone rates. Within a rate
//! table (sorted ascending by max weight) the first tier whose max weight
//! covers the computed weight wins; weights beyond the top tier pay the top
//! tier price multiplied by `ceil(weight/100)`.

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::money::Eur;
use crate::types::{Carrier, CatalogSnapshot, JobSpec};

/// Minimum billable weight per leg, in kg.
const MIN_LEG_WEIGHT_KG: f64 = 1.0;

/// One leg of the delivery routing plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RouteLeg {
    /// A customer delivery point.
    Point {
        copies: u32,
        department: String,
        tail_lift: bool,
    },
    /// One direction of the bindery round trip, carrying the whole job.
    BinderyTransit { department: String },
}

/// The planned route for a job: bindery legs first (the job must be bound
/// before it ships), then the customer points in their given order.
pub fn plan_route(job: &JobSpec, needs_bindery: bool, cfg: &PricingConfig) -> Vec<RouteLeg> {
    let mut legs = Vec::new();

    if needs_bindery {
        // Round trip: out to the bindery and back.
        for _ in 0..2 {
            legs.push(RouteLeg::BinderyTransit {
                department: cfg.bindery_department.clone(),
            });
        }
    }

    for point in &job.delivery_points {
        legs.push(RouteLeg::Point {
            copies: point.copies,
            department: point.department.clone(),
            tail_lift: point.tail_lift,
        });
    }

    legs
}

/// Billable weight for a delivery point.
pub fn point_weight_kg(copies: u32, per_copy_g: f64) -> f64 {
    (copies as f64 * per_copy_g / 1000.0).max(MIN_LEG_WEIGHT_KG)
}

/// Rate lookup against a sorted-by-weight tier list.
///
/// `tiers` are `(max_weight_kg, price)` pairs. Returns `None` when the list
/// is empty (carrier does not serve this zone/department).
fn lookup_tiers(tiers: &[(f64, Eur)], weight_kg: f64) -> Option<Eur> {
    if tiers.is_empty() {
        return None;
    }

    for (max_weight, price) in tiers {
        if *max_weight >= weight_kg {
            return Some(*price);
        }
    }

    // Beyond the top tier: extrapolate in 100 kg slices of the top price.
    let (_, top_price) = tiers[tiers.len() - 1];
    Some(top_price * (weight_kg / 100.0).ceil())
}

/// Price of one leg for one carrier, or `None` when the carrier has no rate
/// covering the leg's destination.
fn leg_cost(
    carrier: &Carrier,
    snapshot: &CatalogSnapshot,
    department: &str,
    weight_kg: f64,
    tail_lift: bool,
    cfg: &PricingConfig,
) -> Option<Eur> {
    // Department rates take precedence over zone rates.
    let mut dept_tiers: Vec<(f64, Eur)> = carrier
        .department_rates
        .iter()
        .filter(|r| r.department == department)
        .map(|r| (r.max_weight_kg, r.price))
        .collect();

    let base = if !dept_tiers.is_empty() {
        dept_tiers.sort_by(|a, b| a.0.total_cmp(&b.0));
        lookup_tiers(&dept_tiers, weight_kg)?
    } else {
        let zone = snapshot.zone_for(department);
        let mut zone_tiers: Vec<(f64, Eur)> = carrier
            .zone_rates
            .iter()
            .filter(|r| r.zone == zone)
            .map(|r| (r.max_weight_kg, r.price))
            .collect();
        zone_tiers.sort_by(|a, b| a.0.total_cmp(&b.0));
        lookup_tiers(&zone_tiers, weight_kg)?
    };

    let surcharge = if tail_lift {
        Eur::new(cfg.tail_lift_surcharge)
    } else {
        Eur::zero()
    };

    Some(base + surcharge)
}

/// Total route cost for one carrier, or `None` when any leg is unserved.
pub fn carrier_route_cost(
    carrier: &Carrier,
    snapshot: &CatalogSnapshot,
    legs: &[RouteLeg],
    per_copy_g: f64,
    total_copies: u32,
    cfg: &PricingConfig,
) -> Option<Eur> {
    let mut total = Eur::zero();

    for leg in legs {
        let cost = match leg {
            RouteLeg::Point {
                copies,
                department,
                tail_lift,
            } => leg_cost(
                carrier,
                snapshot,
                department,
                point_weight_kg(*copies, per_copy_g),
                *tail_lift,
                cfg,
            )?,
            RouteLeg::BinderyTransit { department } => leg_cost(
                carrier,
                snapshot,
                department,
                point_weight_kg(total_copies, per_copy_g),
                false,
                cfg,
            )?,
        };
        total += cost;
    }

    Some(total)
}

/// Cheapest delivery across all active carriers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryQuote {
    pub carrier_name: String,
    pub cost: Eur,
}

/// Scans every active carrier against the routing plan and keeps the
/// cheapest total. Returns `None` when no carrier serves the full route
/// (or the route is empty).
pub fn cheapest_delivery(
    snapshot: &CatalogSnapshot,
    legs: &[RouteLeg],
    per_copy_g: f64,
    total_copies: u32,
) -> Option<DeliveryQuote> {
    if legs.is_empty() {
        return None;
    }

    let cfg = &snapshot.config;
    let mut best: Option<DeliveryQuote> = None;

    for carrier in snapshot.carriers.iter().filter(|c| c.active) {
        if let Some(cost) =
            carrier_route_cost(carrier, snapshot, legs, per_copy_g, total_copies, cfg)
        {
            let better = best.as_ref().map(|b| cost < b.cost).unwrap_or(true);
            if better {
                best = Some(DeliveryQuote {
                    carrier_name: carrier.name.clone(),
                    cost,
                });
            }
        }
    }

    best
}

// =============================================================================
// Unit Tests
// =============================================================================
