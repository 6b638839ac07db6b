//! # Finishing Extras Module
//!
//! Optional add-on costs shared by both manufacturing methods: UV varnish,
//! loose inserts, re-folding, the flap supplement, and the fold cost itself
//! (rate table on the fold type).

use crate::config::PricingConfig;
use crate::error::{MethodError, MethodResult};
use crate::money::Eur;
use crate::types::{FoldSelection, FoldType, JobSpec};

/// Fold cost from the fold type's per-1000 rate table.
///
/// The secondary cross-fold is billed as a second lookup on the same table
/// at its own fold count, added to the primary pass.
pub fn fold_cost(
    selection: &FoldSelection,
    fold_type: &FoldType,
    quantity: u32,
) -> MethodResult<Eur> {
    let per_1000 = fold_type.rate_for(selection.fold_count).ok_or_else(|| {
        MethodError::new(format!(
            "fold type '{}' has no rate for {} fold(s)",
            fold_type.name, selection.fold_count
        ))
    })?;

    let mut cost = per_1000 * (quantity as f64 / 1000.0);

    if let Some(cross_count) = selection.cross_fold_count {
        let cross_rate = fold_type.rate_for(cross_count).ok_or_else(|| {
            MethodError::new(format!(
                "fold type '{}' has no rate for the secondary cross-fold ({} fold(s))",
                fold_type.name, cross_count
            ))
        })?;
        cost += cross_rate * (quantity as f64 / 1000.0);
    }

    Ok(cost)
}

/// Itemized finishing extras.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinishingCost {
    pub uv_varnish: Eur,
    pub loose_inserts: Eur,
    pub refold: Eur,
    pub flap_supplement: Eur,
}

impl FinishingCost {
    pub fn total(&self) -> Eur {
        self.uv_varnish + self.loose_inserts + self.refold + self.flap_supplement
    }
}

/// Computes the optional finishing extras for a job.
pub fn finishing_cost(job: &JobSpec, cfg: &PricingConfig) -> FinishingCost {
    let qty = job.quantity as f64;
    let per_1000 = qty / 1000.0;

    let uv_varnish = if job.finishing.uv_varnish {
        let area_m2 = job.open_format.area_m2();
        Eur::new(cfg.uv_varnish_calage + area_m2 * qty * cfg.uv_varnish_per_m2)
    } else {
        Eur::zero()
    };

    let loose_inserts = if job.finishing.loose_inserts > 0 {
        Eur::new(job.finishing.loose_inserts as f64 * cfg.insert_per_1000 * per_1000)
    } else {
        Eur::zero()
    };

    let refold = if job.finishing.refold {
        Eur::new(cfg.refold_per_1000 * per_1000)
    } else {
        Eur::zero()
    };

    let flap_supplement = if job.flap_cm > 0.0 {
        Eur::new(cfg.flap_calage + cfg.flap_per_1000 * per_1000)
    } else {
        Eur::zero()
    };

    FinishingCost {
        uv_varnish,
        loose_inserts,
        refold,
        flap_supplement,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        FinishingOptions, FoldCost, FoldKind, FormatCm, PackagingOptions, ProductKind,
    };

    fn roll_fold_type() -> FoldType {
        FoldType {
            id: "f1".to_string(),
            name: "Pli roulé".to_string(),
            kind: FoldKind::Roll,
            costs: vec![
                FoldCost {
                    fold_count: 2,
                    per_1000: Eur::new(12.0),
                },
                FoldCost {
                    fold_count: 3,
                    per_1000: Eur::new(16.0),
                },
            ],
        }
    }

    fn leaflet(finishing: FinishingOptions, flap_cm: f64) -> JobSpec {
        JobSpec {
            product: ProductKind::Leaflet,
            quantity: 2000,
            closed_format: FormatCm::new(10.0, 21.0),
            open_format: FormatCm::new(29.7, 21.0),
            interior_pages: 0,
            cover_pages: 0,
            flap_cm,
            interior_paper_id: "p".to_string(),
            cover_paper_id: None,
            interior_color_id: "c".to_string(),
            cover_color_id: None,
            recto_verso: true,
            binding_id: None,
            fold: None,
            inserted_signatures: 0,
            lamination: None,
            finishing,
            packaging: PackagingOptions::default(),
            delivery_points: Vec::new(),
            reference: None,
        }
    }

    #[test]
    fn test_fold_cost_primary_only() {
        let sel = FoldSelection {
            fold_type_id: "f1".to_string(),
            fold_count: 2,
            cross_fold_count: None,
        };
        let cost = fold_cost(&sel, &roll_fold_type(), 2000).unwrap();
        assert!((cost.amount() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_fold_cost_with_secondary_cross_fold() {
        let sel = FoldSelection {
            fold_type_id: "f1".to_string(),
            fold_count: 3,
            cross_fold_count: Some(2),
        };
        // 16 × 2 + 12 × 2 = 56
        let cost = fold_cost(&sel, &roll_fold_type(), 2000).unwrap();
        assert!((cost.amount() - 56.0).abs() < 1e-9);
    }

    #[test]
    fn test_fold_cost_missing_rate() {
        let sel = FoldSelection {
            fold_type_id: "f1".to_string(),
            fold_count: 5,
            cross_fold_count: None,
        };
        assert!(fold_cost(&sel, &roll_fold_type(), 2000).is_err());
    }

    #[test]
    fn test_finishing_extras() {
        let cfg = PricingConfig::default();
        let opts = FinishingOptions {
            uv_varnish: true,
            loose_inserts: 2,
            refold: true,
        };
        let job = leaflet(opts, 5.0);
        let cost = finishing_cost(&job, &cfg);

        let area = 29.7 * 21.0 / 10_000.0;
        let expected_uv = cfg.uv_varnish_calage + area * 2000.0 * cfg.uv_varnish_per_m2;
        assert!((cost.uv_varnish.amount() - expected_uv).abs() < 1e-9);
        assert!((cost.loose_inserts.amount() - 2.0 * cfg.insert_per_1000 * 2.0).abs() < 1e-9);
        assert!((cost.refold.amount() - cfg.refold_per_1000 * 2.0).abs() < 1e-9);
        assert!(
            (cost.flap_supplement.amount() - (cfg.flap_calage + cfg.flap_per_1000 * 2.0)).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_no_extras_costs_nothing() {
        let cfg = PricingConfig::default();
        let job = leaflet(FinishingOptions::default(), 0.0);
        assert!(finishing_cost(&job, &cfg).total().is_zero());
    }
}
