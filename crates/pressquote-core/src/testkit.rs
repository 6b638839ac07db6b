//! Shared unit-test fixtures: a small but complete catalog snapshot and a
//! few representative jobs. Test-only.

use chrono::Utc;
use std::collections::HashMap;

use crate::config::PricingConfig;
use crate::money::Eur;
use crate::types::{
    BindingProcess, BindingRule, BindingType, Carrier, CatalogSnapshot, ClickDivisor, ColorMode,
    DepartmentRate, DigitalBindingTier, DigitalLaminationTier, FinishingOptions, FoldCost,
    FoldKind, FoldType, FormatCm, JobSpec, LaminationFinish, MachineFormat, OffsetBindingTier,
    PackagingOptions, PaperFinish, PaperGrammage, ProductKind, ZoneRate,
};

fn paper(id: &str, name: &str, grammage: f64, price_per_kg: f64) -> PaperGrammage {
    PaperGrammage {
        id: id.to_string(),
        paper_name: name.to_string(),
        finish: PaperFinish::from_name(name),
        grammage,
        price_per_kg: Eur::new(price_per_kg),
        ref_weight_kg_per_1000: None,
    }
}

fn color(id: &str, name: &str, plates_per_side: u32, has_varnish: bool) -> ColorMode {
    ColorMode {
        id: id.to_string(),
        name: name.to_string(),
        plates_per_side,
        has_varnish,
    }
}

/// A complete snapshot covering every pricing path the unit tests exercise.
pub fn snapshot() -> CatalogSnapshot {
    let bindings = vec![
        BindingType {
            id: "bind-staple".to_string(),
            name: "Piqûre 2 points".to_string(),
            process: BindingProcess::Stapling,
            digital_tiers: Vec::new(),
            offset_tiers: vec![OffsetBindingTier {
                min_signatures: 1,
                calage: Eur::new(40.0),
                roulage_per_1000: Eur::new(60.0),
            }],
            rules: Vec::new(),
        },
        BindingType {
            id: "bind-glued".to_string(),
            name: "Dos carré collé".to_string(),
            process: BindingProcess::Glued,
            digital_tiers: vec![DigitalBindingTier {
                min_pages: 8,
                max_pages: 200,
                min_qty: 1,
                max_qty: 2000,
                unit_cost: Eur::new(0.45),
                setup_cost: Eur::new(25.0),
            }],
            offset_tiers: vec![
                OffsetBindingTier {
                    min_signatures: 1,
                    calage: Eur::new(80.0),
                    roulage_per_1000: Eur::new(90.0),
                },
                OffsetBindingTier {
                    min_signatures: 4,
                    calage: Eur::new(110.0),
                    roulage_per_1000: Eur::new(80.0),
                },
            ],
            rules: vec![
                BindingRule::LightPaperSurcharge {
                    max_grammage: 70.0,
                    surcharge: 0.20,
                },
                BindingRule::InsertSurcharge {
                    single: 0.05,
                    multiple: 0.10,
                },
                BindingRule::MixedSignatureSurcharge { surcharge: 0.10 },
            ],
        },
        BindingType {
            id: "bind-sewn".to_string(),
            name: "Dos carré cousu collé".to_string(),
            process: BindingProcess::Sewn,
            digital_tiers: Vec::new(),
            offset_tiers: vec![OffsetBindingTier {
                min_signatures: 1,
                calage: Eur::new(120.0),
                roulage_per_1000: Eur::new(100.0),
            }],
            rules: Vec::new(),
        },
    ];

    let fold_types = vec![
        FoldType {
            id: "fold-roll".to_string(),
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
        },
        FoldType {
            id: "fold-cross".to_string(),
            name: "Pli croisé".to_string(),
            kind: FoldKind::Cross,
            costs: vec![
                FoldCost {
                    fold_count: 1,
                    per_1000: Eur::new(8.0),
                },
                FoldCost {
                    fold_count: 2,
                    per_1000: Eur::new(10.0),
                },
            ],
        },
    ];

    let laminations = vec![
        LaminationFinish {
            id: "lam-mat".to_string(),
            name: "Mat".to_string(),
            offset_rate_per_m2: Some(0.40),
            offset_calage: Some(Eur::new(30.0)),
            offset_minimum: Eur::new(35.0),
            digital_tiers: vec![DigitalLaminationTier {
                min_qty: 1,
                max_qty: 5000,
                per_sheet: Eur::new(0.18),
                setup: Eur::new(15.0),
            }],
        },
        LaminationFinish {
            id: "lam-soft".to_string(),
            name: "Soft touch".to_string(),
            offset_rate_per_m2: None,
            offset_calage: None,
            offset_minimum: Eur::zero(),
            digital_tiers: vec![DigitalLaminationTier {
                min_qty: 1,
                max_qty: 5000,
                per_sheet: Eur::new(0.25),
                setup: Eur::new(20.0),
            }],
        },
    ];

    let mut departments = HashMap::new();
    departments.insert("75".to_string(), 1);
    departments.insert("69".to_string(), 2);
    departments.insert("72".to_string(), 2);
    departments.insert("13".to_string(), 3);

    let carriers = vec![Carrier {
        id: "carrier-std".to_string(),
        name: "Transports Réunis".to_string(),
        active: true,
        zone_rates: vec![
            ZoneRate { zone: 1, max_weight_kg: 10.0, price: Eur::new(12.0) },
            ZoneRate { zone: 1, max_weight_kg: 30.0, price: Eur::new(18.0) },
            ZoneRate { zone: 1, max_weight_kg: 100.0, price: Eur::new(30.0) },
            ZoneRate { zone: 2, max_weight_kg: 10.0, price: Eur::new(15.0) },
            ZoneRate { zone: 2, max_weight_kg: 30.0, price: Eur::new(24.0) },
            ZoneRate { zone: 2, max_weight_kg: 100.0, price: Eur::new(40.0) },
            ZoneRate { zone: 3, max_weight_kg: 10.0, price: Eur::new(18.0) },
            ZoneRate { zone: 3, max_weight_kg: 30.0, price: Eur::new(28.0) },
            ZoneRate { zone: 3, max_weight_kg: 100.0, price: Eur::new(48.0) },
        ],
        department_rates: vec![DepartmentRate {
            department: "75".to_string(),
            max_weight_kg: 100.0,
            price: Eur::new(9.0),
        }],
    }];

    CatalogSnapshot {
        tenant: None,
        loaded_at: Utc::now(),
        papers: vec![
            paper("paper-90", "Offset blanc", 90.0, 1.35),
            paper("paper-135", "Couché satin", 135.0, 1.20),
            paper("paper-250", "Couché mat", 250.0, 1.40),
            paper("paper-heavy", "Couché mat", 300.0, 1.10),
        ],
        color_modes: vec![
            color("color-quadri", "Quadri", 4, false),
            color("color-mono", "Noir", 1, false),
            color("color-quadri-vernis", "Quadri + vernis machine", 5, true),
        ],
        bindings,
        fold_types,
        laminations,
        machine_formats: vec![
            MachineFormat {
                name: "52x74".to_string(),
                width_cm: 52.0,
                height_cm: 74.0,
            },
            MachineFormat {
                name: "65x92".to_string(),
                width_cm: 65.0,
                height_cm: 92.0,
            },
        ],
        click_divisors: vec![
            ClickDivisor {
                format_name: "A4".to_string(),
                width_cm: 21.0,
                height_cm: 29.7,
                recto: 2.0,
                recto_verso: 1.0,
            },
            ClickDivisor {
                format_name: "A5".to_string(),
                width_cm: 14.85,
                height_cm: 21.0,
                recto: 4.0,
                recto_verso: 2.0,
            },
        ],
        departments,
        carriers,
        config: PricingConfig::default(),
    }
}

/// A4 flyer, quadri recto-verso on coated 135g. No extras.
pub fn a4_flyer(quantity: u32) -> JobSpec {
    JobSpec {
        product: ProductKind::Flyer,
        quantity,
        closed_format: FormatCm::new(21.0, 29.7),
        open_format: FormatCm::new(21.0, 29.7),
        interior_pages: 0,
        cover_pages: 0,
        flap_cm: 0.0,
        interior_paper_id: "paper-135".to_string(),
        cover_paper_id: None,
        interior_color_id: "color-quadri".to_string(),
        cover_color_id: None,
        recto_verso: true,
        binding_id: None,
        fold: None,
        inserted_signatures: 0,
        lamination: None,
        finishing: FinishingOptions::default(),
        packaging: PackagingOptions::default(),
        delivery_points: Vec::new(),
        reference: None,
    }
}

/// A4 perfect-bound brochure: 90g quadri interior, 250g quadri cover.
pub fn glued_brochure(quantity: u32, interior_pages: u32) -> JobSpec {
    JobSpec {
        product: ProductKind::Brochure,
        quantity,
        closed_format: FormatCm::new(21.0, 29.7),
        open_format: FormatCm::new(21.0, 29.7),
        interior_pages,
        cover_pages: 4,
        flap_cm: 0.0,
        interior_paper_id: "paper-90".to_string(),
        cover_paper_id: Some("paper-250".to_string()),
        interior_color_id: "color-quadri".to_string(),
        cover_color_id: Some("color-quadri".to_string()),
        recto_verso: true,
        binding_id: Some("bind-glued".to_string()),
        fold: None,
        inserted_signatures: 0,
        lamination: None,
        finishing: FinishingOptions::default(),
        packaging: PackagingOptions::default(),
        delivery_points: Vec::new(),
        reference: None,
    }
}

/// Same brochure, saddle stitched and self-covered.
pub fn stapled_brochure(quantity: u32, interior_pages: u32) -> JobSpec {
    let mut job = glued_brochure(quantity, interior_pages);
    job.binding_id = Some("bind-staple".to_string());
    job.cover_pages = 0;
    job.cover_paper_id = None;
    job.cover_color_id = None;
    job
}
