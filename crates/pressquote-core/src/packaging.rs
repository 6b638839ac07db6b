//! # Packaging Cost Module
//!
//! Cartons, shrink film, elastic packets and crystal boxes, driven by the
//! job's packaging flags, its quantity and the total shipped weight.
//!
//! Cartons are always billed (everything ships in cartons); the other three
//! are opt-in per the job's [`crate::types::PackagingOptions`].

use crate::config::PricingConfig;
use crate::money::Eur;
use crate::types::JobSpec;

/// Itemized packaging cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackagingCost {
    pub cartons: u32,
    pub carton_cost: Eur,
    pub film_cost: Eur,
    pub elastic_cost: Eur,
    pub crystal_box_cost: Eur,
}

impl PackagingCost {
    pub fn total(&self) -> Eur {
        self.carton_cost + self.film_cost + self.elastic_cost + self.crystal_box_cost
    }
}

/// Computes packaging cost from quantity and total weight.
pub fn packaging_cost(job: &JobSpec, total_weight_kg: f64, cfg: &PricingConfig) -> PackagingCost {
    let qty = job.quantity as f64;

    let cartons = (total_weight_kg / cfg.carton_capacity_kg).ceil().max(1.0);
    let carton_cost = Eur::new(cartons * cfg.carton_cost);

    let film_cost = if job.packaging.film {
        Eur::new((qty / cfg.film_bundle_size).ceil() * cfg.film_cost)
    } else {
        Eur::zero()
    };

    let elastic_cost = if job.packaging.elastics {
        Eur::new((qty / cfg.elastic_bundle_size).ceil() * cfg.elastic_cost)
    } else {
        Eur::zero()
    };

    let crystal_box_cost = if job.packaging.crystal_box {
        Eur::new((qty / cfg.crystal_box_capacity).ceil() * cfg.crystal_box_cost)
    } else {
        Eur::zero()
    };

    PackagingCost {
        cartons: cartons as u32,
        carton_cost,
        film_cost,
        elastic_cost,
        crystal_box_cost,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FinishingOptions, FormatCm, PackagingOptions, ProductKind};

    fn job(quantity: u32, packaging: PackagingOptions) -> JobSpec {
        JobSpec {
            product: ProductKind::Flyer,
            quantity,
            closed_format: FormatCm::new(21.0, 29.7),
            open_format: FormatCm::new(21.0, 29.7),
            interior_pages: 0,
            cover_pages: 0,
            flap_cm: 0.0,
            interior_paper_id: "p".to_string(),
            cover_paper_id: None,
            interior_color_id: "c".to_string(),
            cover_color_id: None,
            recto_verso: false,
            binding_id: None,
            fold: None,
            inserted_signatures: 0,
            lamination: None,
            finishing: FinishingOptions::default(),
            packaging,
            delivery_points: Vec::new(),
            reference: None,
        }
    }

    #[test]
    fn test_cartons_always_billed() {
        let cfg = PricingConfig::default();
        // 30 kg at 12 kg per carton → 3 cartons.
        let cost = packaging_cost(&job(1000, PackagingOptions::default()), 30.0, &cfg);
        assert_eq!(cost.cartons, 3);
        assert!((cost.carton_cost.amount() - 3.0 * cfg.carton_cost).abs() < 1e-9);
        assert!(cost.film_cost.is_zero());
    }

    #[test]
    fn test_minimum_one_carton() {
        let cfg = PricingConfig::default();
        let cost = packaging_cost(&job(50, PackagingOptions::default()), 0.4, &cfg);
        assert_eq!(cost.cartons, 1);
    }

    #[test]
    fn test_opt_in_packaging() {
        let cfg = PricingConfig::default();
        let opts = PackagingOptions {
            film: true,
            elastics: true,
            crystal_box: true,
        };
        let cost = packaging_cost(&job(1000, opts), 12.0, &cfg);
        // 1000/25 = 40 film bundles, 1000/50 = 20 elastic packets,
        // 1000/100 = 10 crystal boxes.
        assert!((cost.film_cost.amount() - 40.0 * cfg.film_cost).abs() < 1e-9);
        assert!((cost.elastic_cost.amount() - 20.0 * cfg.elastic_cost).abs() < 1e-9);
        assert!((cost.crystal_box_cost.amount() - 10.0 * cfg.crystal_box_cost).abs() < 1e-9);
        assert!(cost.total().amount() > cost.carton_cost.amount());
    }
}
