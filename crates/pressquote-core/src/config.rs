//! # Pricing Configuration
//!
//! The immutable [`PricingConfig`], assembled once per calculation from the
//! three flat key/value stores (offset constants, digital constants, margin
//! rates). The legacy system read these tables ad hoc mid-calculation; here
//! every constant is resolved up front, with a documented default per key so
//! the engine behaves identically whether or not a tenant has customized its
//! configuration.
//!
//! ## Key → field mapping
//! Keys are namespaced strings (`offset.plate_cost`, `margin.digital_pct`,
//! ...). Unknown keys are ignored at assembly; missing keys keep their
//! defaults. Two legacy keys (`offset.discount_on_plates`,
//! `offset.discount_on_calage`) are deliberately not wired: the legacy
//! orchestration never consumed them and wiring them would change totals
//! against the reference spreadsheet.

use serde::{Deserialize, Serialize};

/// One row of a key/value configuration store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: f64,
    /// Display unit ("EUR", "sheets", "%", ...). Informational only.
    pub unit: Option<String>,
    pub description: Option<String>,
}

/// Every numeric constant the pricing modules consume.
///
/// Rainage tiers are indexed by signature count 1..=7; jobs with more than
/// 7 signatures clamp to the last tier (clamping, never extrapolation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    // -------------------------------------------------------------------
    // Imposition
    // -------------------------------------------------------------------
    /// Bleed padding around each pose, in cm. Key: `imposition.bleed_cm`.
    pub bleed_cm: f64,

    // -------------------------------------------------------------------
    // Offset press
    // -------------------------------------------------------------------
    /// Cost of one plate. Key: `offset.plate_cost`.
    pub plate_cost: f64,
    /// Setup (calage) cost per plate. Key: `offset.calage_per_plate`.
    pub calage_per_plate: f64,
    /// Calibration waste sheets per press run. Key: `offset.calibration_waste`.
    pub calibration_waste_sheets: f64,
    /// Running waste as a fraction of base sheets. Key: `offset.running_waste_pct`.
    pub running_waste_pct: f64,
    /// Extra waste sheets when the color mode has a varnish unit.
    /// Key: `offset.varnish_waste`.
    pub varnish_waste_sheets: f64,
    /// Roulage rates per 1000 sheets by volume tier.
    /// Keys: `offset.roulage_le_1000` / `_le_3000` / `_le_5000` /
    /// `_le_10000` / `_gt_10000`.
    pub roulage_le_1000: f64,
    pub roulage_le_3000: f64,
    pub roulage_le_5000: f64,
    pub roulage_le_10000: f64,
    pub roulage_gt_10000: f64,
    /// Rainage (creasing) calage by signature-count tier 1..=7.
    /// Keys: `offset.rainage_calage_1` .. `offset.rainage_calage_7`.
    pub rainage_calage: [f64; 7],
    /// Rainage roulage per 1000 copies by signature-count tier 1..=7.
    /// Keys: `offset.rainage_roulage_1` .. `offset.rainage_roulage_7`.
    pub rainage_roulage: [f64; 7],

    // -------------------------------------------------------------------
    // Digital press
    // -------------------------------------------------------------------
    /// Price of one mono click. Key: `digital.click_mono`.
    pub click_mono: f64,
    /// Price of one color click. Key: `digital.click_color`.
    pub click_color: f64,
    /// Multiplier-inclusive digital pricing model. Values > 1.0 select the
    /// markup-multiplier model (total = subtotal × multiplier, no further
    /// margin); the default 1.0 keeps the legacy additive margin.
    /// Key: `digital.markup_multiplier`.
    pub digital_markup_multiplier: f64,

    // -------------------------------------------------------------------
    // Margins
    // -------------------------------------------------------------------
    /// Offset paper margin. Key: `margin.paper_pct`.
    pub paper_margin_pct: f64,
    /// Offset aggregate margin. Key: `margin.offset_pct`.
    pub offset_margin_pct: f64,
    /// Legacy additive digital margin. Key: `margin.digital_pct`.
    pub digital_margin_pct: f64,
    /// Brochure flat secondary margin on (subtotal + delivery).
    /// Key: `margin.brochure_pct`.
    pub brochure_margin_pct: f64,

    // -------------------------------------------------------------------
    // Packaging
    // -------------------------------------------------------------------
    /// Key: `packaging.carton_capacity_kg`.
    pub carton_capacity_kg: f64,
    /// Key: `packaging.carton_cost`.
    pub carton_cost: f64,
    /// Copies per shrink-film bundle. Key: `packaging.film_bundle`.
    pub film_bundle_size: f64,
    /// Key: `packaging.film_cost`.
    pub film_cost: f64,
    /// Copies per elastic packet. Key: `packaging.elastic_bundle`.
    pub elastic_bundle_size: f64,
    /// Key: `packaging.elastic_cost`.
    pub elastic_cost: f64,
    /// Cards per crystal box. Key: `packaging.crystal_box_capacity`.
    pub crystal_box_capacity: f64,
    /// Key: `packaging.crystal_box_cost`.
    pub crystal_box_cost: f64,

    // -------------------------------------------------------------------
    // Delivery
    // -------------------------------------------------------------------
    /// Flat tail-lift surcharge per point. Key: `delivery.tail_lift_surcharge`.
    pub tail_lift_surcharge: f64,
    /// Department code of the sewn-binding subcontractor; the routing plan
    /// adds a round trip to this department for sewn jobs.
    /// Key: `delivery.bindery_department` (numeric department code).
    pub bindery_department: String,

    // -------------------------------------------------------------------
    // Finishing extras
    // -------------------------------------------------------------------
    /// Key: `finishing.uv_varnish_per_m2`.
    pub uv_varnish_per_m2: f64,
    /// Key: `finishing.uv_varnish_calage`.
    pub uv_varnish_calage: f64,
    /// Loose insert handling per 1000 copies per insert.
    /// Key: `finishing.insert_per_1000`.
    pub insert_per_1000: f64,
    /// Key: `finishing.refold_per_1000`.
    pub refold_per_1000: f64,
    /// Flap supplement forfait. Key: `finishing.flap_calage`.
    pub flap_calage: f64,
    /// Flap supplement per 1000 copies. Key: `finishing.flap_per_1000`.
    pub flap_per_1000: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            bleed_cm: 0.5,

            plate_cost: 11.0,
            calage_per_plate: 6.0,
            calibration_waste_sheets: 30.0,
            running_waste_pct: 0.02,
            varnish_waste_sheets: 50.0,
            roulage_le_1000: 15.0,
            roulage_le_3000: 13.0,
            roulage_le_5000: 12.0,
            roulage_le_10000: 10.5,
            roulage_gt_10000: 9.5,
            rainage_calage: [18.0, 22.0, 26.0, 30.0, 34.0, 38.0, 42.0],
            rainage_roulage: [8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0],

            click_mono: 0.015,
            click_color: 0.06,
            digital_markup_multiplier: 1.0,

            paper_margin_pct: 0.12,
            offset_margin_pct: 0.25,
            digital_margin_pct: 0.30,
            brochure_margin_pct: 0.15,

            carton_capacity_kg: 12.0,
            carton_cost: 1.20,
            film_bundle_size: 25.0,
            film_cost: 0.18,
            elastic_bundle_size: 50.0,
            elastic_cost: 0.03,
            crystal_box_capacity: 100.0,
            crystal_box_cost: 0.55,

            tail_lift_surcharge: 25.0,
            bindery_department: "72".to_string(),

            uv_varnish_per_m2: 0.35,
            uv_varnish_calage: 40.0,
            insert_per_1000: 18.0,
            refold_per_1000: 22.0,
            flap_calage: 30.0,
            flap_per_1000: 8.0,
        }
    }
}

impl PricingConfig {
    /// Assembles a config from the merged key/value store rows.
    ///
    /// Tenant-customized rows simply appear in `entries` instead of (or in
    /// addition to) the global rows; later entries win on duplicate keys, so
    /// callers pass global rows first and tenant rows last.
    pub fn from_entries(entries: &[ConfigEntry]) -> Self {
        let mut cfg = PricingConfig::default();
        for entry in entries {
            cfg.apply(&entry.key, entry.value);
        }
        cfg
    }

    fn apply(&mut self, key: &str, value: f64) {
        match key {
            "imposition.bleed_cm" => self.bleed_cm = value,

            "offset.plate_cost" => self.plate_cost = value,
            "offset.calage_per_plate" => self.calage_per_plate = value,
            "offset.calibration_waste" => self.calibration_waste_sheets = value,
            "offset.running_waste_pct" => self.running_waste_pct = value,
            "offset.varnish_waste" => self.varnish_waste_sheets = value,
            "offset.roulage_le_1000" => self.roulage_le_1000 = value,
            "offset.roulage_le_3000" => self.roulage_le_3000 = value,
            "offset.roulage_le_5000" => self.roulage_le_5000 = value,
            "offset.roulage_le_10000" => self.roulage_le_10000 = value,
            "offset.roulage_gt_10000" => self.roulage_gt_10000 = value,

            "digital.click_mono" => self.click_mono = value,
            "digital.click_color" => self.click_color = value,
            "digital.markup_multiplier" => self.digital_markup_multiplier = value,

            "margin.paper_pct" => self.paper_margin_pct = value,
            "margin.offset_pct" => self.offset_margin_pct = value,
            "margin.digital_pct" => self.digital_margin_pct = value,
            "margin.brochure_pct" => self.brochure_margin_pct = value,

            "packaging.carton_capacity_kg" => self.carton_capacity_kg = value,
            "packaging.carton_cost" => self.carton_cost = value,
            "packaging.film_bundle" => self.film_bundle_size = value,
            "packaging.film_cost" => self.film_cost = value,
            "packaging.elastic_bundle" => self.elastic_bundle_size = value,
            "packaging.elastic_cost" => self.elastic_cost = value,
            "packaging.crystal_box_capacity" => self.crystal_box_capacity = value,
            "packaging.crystal_box_cost" => self.crystal_box_cost = value,

            "delivery.tail_lift_surcharge" => self.tail_lift_surcharge = value,
            "delivery.bindery_department" => {
                self.bindery_department = format!("{}", value as u32);
            }

            "finishing.uv_varnish_per_m2" => self.uv_varnish_per_m2 = value,
            "finishing.uv_varnish_calage" => self.uv_varnish_calage = value,
            "finishing.insert_per_1000" => self.insert_per_1000 = value,
            "finishing.refold_per_1000" => self.refold_per_1000 = value,
            "finishing.flap_calage" => self.flap_calage = value,
            "finishing.flap_per_1000" => self.flap_per_1000 = value,

            _ => {
                // Rainage tiers carry their index in the key.
                if let Some(idx) = key.strip_prefix("offset.rainage_calage_") {
                    if let Some(slot) = Self::tier_slot(idx) {
                        self.rainage_calage[slot] = value;
                    }
                } else if let Some(idx) = key.strip_prefix("offset.rainage_roulage_") {
                    if let Some(slot) = Self::tier_slot(idx) {
                        self.rainage_roulage[slot] = value;
                    }
                }
                // Unknown keys (including the dead discount keys) are ignored.
            }
        }
    }

    fn tier_slot(idx: &str) -> Option<usize> {
        idx.parse::<usize>()
            .ok()
            .filter(|i| (1..=7).contains(i))
            .map(|i| i - 1)
    }

    /// Roulage rate per 1000 sheets for a total sheet count.
    ///
    /// Tier bounds per the legacy volume table:
    /// ≤1000 / ≤3000 / ≤5000 / ≤10000 / above.
    pub fn roulage_rate(&self, total_sheets: f64) -> f64 {
        if total_sheets <= 1000.0 {
            self.roulage_le_1000
        } else if total_sheets <= 3000.0 {
            self.roulage_le_3000
        } else if total_sheets <= 5000.0 {
            self.roulage_le_5000
        } else if total_sheets <= 10000.0 {
            self.roulage_le_10000
        } else {
            self.roulage_gt_10000
        }
    }

    /// Rainage tier for a signature count: 1..=7, clamping above 7.
    pub fn rainage_tier(&self, signatures: u32) -> (f64, f64) {
        let slot = (signatures.clamp(1, 7) - 1) as usize;
        (self.rainage_calage[slot], self.rainage_roulage[slot])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
