//! # Domain Types
//!
//! Core domain types for the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  Input                    Catalog snapshot         Output           │
//! │  ─────────────            ────────────────────     ───────────────  │
//! │  JobSpec                  PaperGrammage            PricingResult    │
//! │  ├─ FormatCm              ColorMode                ├─ Digital       │
//! │  ├─ FoldSelection         BindingType + tiers      │  Breakdown     │
//! │  ├─ LaminationSelection   FoldType + costs         ├─ Offset        │
//! │  ├─ DeliveryPoint(s)      LaminationFinish         │  Breakdown     │
//! │  └─ Packaging/Finishing   MachineFormat            └─ TraceVar(s)   │
//! │                           ClickDivisor                              │
//! │                           Carrier + rates                           │
//! │                           PricingConfig                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Loosely-typed names resolved at the load boundary
//! Binding processes, paper surface finishes and fold kinds exist in the
//! database as display names. They are resolved to tagged enums exactly once
//! when the snapshot is assembled (`from_name` helpers below); the pricing
//! modules never match on strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PricingConfig;
use crate::error::{QuoteError, QuoteResult};
use crate::money::Eur;

// =============================================================================
// Product Kind
// =============================================================================

/// The kind of printed product being quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Multi-page bound product (interior + optional cover).
    Brochure,
    /// Folded flat sheet.
    Leaflet,
    /// Unfolded flat sheet.
    Flyer,
    /// Small-format flat card.
    BusinessCard,
}

impl ProductKind {
    /// Flat products are priced per sheet; bound products per signature.
    pub fn is_flat(&self) -> bool {
        !matches!(self, ProductKind::Brochure)
    }
}

// =============================================================================
// Formats
// =============================================================================

/// A rectangular format in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatCm {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl FormatCm {
    pub const fn new(width_cm: f64, height_cm: f64) -> Self {
        FormatCm {
            width_cm,
            height_cm,
        }
    }

    /// Area in cm².
    #[inline]
    pub fn area_cm2(&self) -> f64 {
        self.width_cm * self.height_cm
    }

    /// Area in m².
    #[inline]
    pub fn area_m2(&self) -> f64 {
        self.area_cm2() / 10_000.0
    }
}

// =============================================================================
// Job Spec (quote input)
// =============================================================================

/// Fold selection on the job: which fold type, how many folds, and an
/// optional secondary cross-fold pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldSelection {
    pub fold_type_id: String,
    pub fold_count: u32,
    /// Secondary cross-fold count, when the product is folded twice
    /// (e.g. roll fold then a perpendicular fold).
    pub cross_fold_count: Option<u32>,
}

/// Lamination selection on the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaminationSelection {
    pub finish_id: String,
    /// Laminate both sides of the sheet.
    pub two_sided: bool,
}

/// Optional finishing add-ons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinishingOptions {
    /// Selective UV varnish pass.
    pub uv_varnish: bool,
    /// Loose (non-bound) inserts slipped into each copy.
    pub loose_inserts: u32,
    /// Re-folding of an already printed job.
    pub refold: bool,
}

/// Packaging flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagingOptions {
    /// Shrink-film bundles.
    pub film: bool,
    /// Elastic-banded packets.
    pub elastics: bool,
    /// Crystal boxes (business cards).
    pub crystal_box: bool,
}

/// One delivery destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPoint {
    /// Copies delivered to this point.
    pub copies: u32,
    /// French department code ("75", "2A", ...).
    pub department: String,
    /// Destination requires a tail-lift truck.
    pub tail_lift: bool,
}

/// The immutable quote input. A calculation is a pure function of
/// `(JobSpec, CatalogSnapshot)`.
///
/// ## Invariants (enforced by [`crate::validation::validate_job`])
/// - `quantity > 0`
/// - `closed_format` has positive width and height
/// - when `binding_id` is set, `interior_pages` is a positive multiple of 4
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub product: ProductKind,
    pub quantity: u32,

    /// Finished (closed) format.
    pub closed_format: FormatCm,
    /// Open/flat format (equals closed format for unfolded products).
    pub open_format: FormatCm,

    /// Interior page count (0 for flat products).
    pub interior_pages: u32,
    /// Cover page count (0 = self-covered or flat, 4 = separate cover).
    pub cover_pages: u32,
    /// Flap width in cm (0 = no flap).
    pub flap_cm: f64,

    /// Interior paper grammage row id.
    pub interior_paper_id: String,
    /// Cover paper grammage row id, when a separate cover exists.
    pub cover_paper_id: Option<String>,

    /// Interior color mode row id.
    pub interior_color_id: String,
    /// Cover color mode row id.
    pub cover_color_id: Option<String>,

    /// Printed on both sides.
    pub recto_verso: bool,

    /// Binding type row id, for bound products.
    pub binding_id: Option<String>,

    /// Fold selection, for folded products.
    pub fold: Option<FoldSelection>,

    /// Bound-in inserted signatures (encarts).
    pub inserted_signatures: u32,

    /// Lamination selection.
    pub lamination: Option<LaminationSelection>,

    pub finishing: FinishingOptions,
    pub packaging: PackagingOptions,

    /// Ordered delivery points. Empty means ex-works (no delivery cost).
    pub delivery_points: Vec<DeliveryPoint>,

    /// Free-text caller metadata, echoed back untouched.
    pub reference: Option<String>,
}

impl JobSpec {
    /// Whether the job carries a separately printed cover.
    pub fn has_cover(&self) -> bool {
        self.cover_pages > 0
    }

    /// Whether a binding applies.
    pub fn is_bound(&self) -> bool {
        self.binding_id.is_some()
    }
}

// =============================================================================
// Catalog: paper
// =============================================================================

/// Paper surface finish, resolved from the display name at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperFinish {
    Uncoated,
    Satin,
    Matte,
}

impl PaperFinish {
    /// Resolves a paper display name to a finish. Load-boundary only.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("satin") {
            PaperFinish::Satin
        } else if lower.contains("mat") {
            PaperFinish::Matte
        } else {
            PaperFinish::Uncoated
        }
    }
}

/// One paper grammage row: a concrete paper at a concrete weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperGrammage {
    pub id: String,
    /// Paper display name ("Couche satin", "Offset blanc", ...).
    pub paper_name: String,
    pub finish: PaperFinish,
    /// Grammage in g/m².
    pub grammage: f64,
    /// Purchase price per kilogram.
    pub price_per_kg: Eur,
    /// Measured weight of 1000 sheets at the 65×92 reference area, in kg.
    /// When absent, weight falls back to the area-density formula.
    pub ref_weight_kg_per_1000: Option<f64>,
}

// =============================================================================
// Catalog: color modes
// =============================================================================

/// A color mode ("Quadri recto/verso", "Noir", "Quadri + vernis", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorMode {
    pub id: String,
    pub name: String,
    /// Offset plates per printed side (4 = CMYK, 1 = mono, 5 = CMYK+varnish).
    pub plates_per_side: u32,
    /// Mode includes a press varnish unit (adds varnish waste sheets).
    pub has_varnish: bool,
}

impl ColorMode {
    /// Digital click pricing: color clicks when 4+ plates, mono otherwise.
    pub fn is_color(&self) -> bool {
        self.plates_per_side >= 4
    }
}

// =============================================================================
// Catalog: binding
// =============================================================================

/// Binding manufacturing process, resolved from the display name once at
/// snapshot assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingProcess {
    /// Saddle stitching (piqûre). Has a hardcoded digital fallback.
    Stapling,
    /// Perfect binding, hot-melt glue (dos carré collé).
    Glued,
    /// Perfect binding, PUR glue.
    Pur,
    /// Thread sewn. Offset-only; requires transit through the bindery.
    Sewn,
    /// Spiral / wire-o.
    Spiral,
    /// Unrecognized process.
    Other,
}

impl BindingProcess {
    /// Resolves a binding display name. Load-boundary only.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("piq") || lower.contains("stapl") || lower.contains("agraf") {
            BindingProcess::Stapling
        } else if lower.contains("pur") {
            BindingProcess::Pur
        } else if lower.contains("cousu") || lower.contains("sewn") || lower.contains("sew") {
            BindingProcess::Sewn
        } else if lower.contains("spirale") || lower.contains("spiral") || lower.contains("wire") {
            BindingProcess::Spiral
        } else if lower.contains("coll") || lower.contains("glue") {
            BindingProcess::Glued
        } else {
            BindingProcess::Other
        }
    }

    /// Glued processes produce a measurable spine.
    pub fn has_spine(&self) -> bool {
        matches!(self, BindingProcess::Glued | BindingProcess::Pur)
    }

    /// Sewn bindings are subcontracted and routed through the bindery.
    pub fn needs_bindery_transit(&self) -> bool {
        matches!(self, BindingProcess::Sewn)
    }
}

/// Digital binding price tier: (page range × quantity range) → unit + setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalBindingTier {
    pub min_pages: u32,
    pub max_pages: u32,
    pub min_qty: u32,
    pub max_qty: u32,
    pub unit_cost: Eur,
    pub setup_cost: Eur,
}

impl DigitalBindingTier {
    /// Inclusive range check on both axes.
    pub fn contains(&self, pages: u32, qty: u32) -> bool {
        pages >= self.min_pages
            && pages <= self.max_pages
            && qty >= self.min_qty
            && qty <= self.max_qty
    }
}

/// Offset binding price tier, matched by signature count: the tier with the
/// largest `min_signatures` not exceeding the job's signature count applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetBindingTier {
    pub min_signatures: u32,
    pub calage: Eur,
    pub roulage_per_1000: Eur,
}

/// Closed, versioned schema for binding surcharge rules.
///
/// The legacy system stored these as free-form JSON per binding type; the
/// snapshot loader parses them against this tagged enum so every surcharge
/// the engine can apply is statically known.
///
/// All percentages are fractional rates (0.20 = +20%) and stack
/// multiplicatively against the base binding cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BindingRule {
    /// Interior paper lighter than `max_grammage` g/m².
    LightPaperSurcharge { max_grammage: f64, surcharge: f64 },
    /// Coated interior paper of the given finish heavier than `min_grammage`.
    CoatedPaperSurcharge {
        finish: PaperFinish,
        min_grammage: f64,
        surcharge: f64,
    },
    /// Interior paper heavier than `min_grammage` (PUR rule).
    HeavyPaperSurcharge { min_grammage: f64, surcharge: f64 },
    /// Inserted signatures: one insert vs two or more.
    InsertSurcharge { single: f64, multiple: f64 },
    /// Spine thickness outside `[min_mm, max_mm]`.
    SpineRangeSurcharge {
        min_mm: f64,
        max_mm: f64,
        surcharge: f64,
    },
    /// Signatures of mixed sizes (partial last signature).
    MixedSignatureSurcharge { surcharge: f64 },
}

/// A binding type with its price tiers and surcharge rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingType {
    pub id: String,
    pub name: String,
    pub process: BindingProcess,
    pub digital_tiers: Vec<DigitalBindingTier>,
    pub offset_tiers: Vec<OffsetBindingTier>,
    pub rules: Vec<BindingRule>,
}

// =============================================================================
// Catalog: folds
// =============================================================================

/// Fold scheme, resolved from the display name at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldKind {
    Simple,
    Cross,
    Accordion,
    Roll,
    Window,
}

impl FoldKind {
    /// Resolves a fold display name. Load-boundary only.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("crois") || lower.contains("cross") {
            FoldKind::Cross
        } else if lower.contains("accord") {
            FoldKind::Accordion
        } else if lower.contains("roul") || lower.contains("roll") {
            FoldKind::Roll
        } else if lower.contains("fen") || lower.contains("window") || lower.contains("gate") {
            FoldKind::Window
        } else {
            FoldKind::Simple
        }
    }
}

/// Per-1000 folding rate for a given fold count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldCost {
    pub fold_count: u32,
    pub per_1000: Eur,
}

/// A fold type with its rate table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldType {
    pub id: String,
    pub name: String,
    pub kind: FoldKind,
    pub costs: Vec<FoldCost>,
}

impl FoldType {
    /// Rate for an exact fold count, if the table has one.
    pub fn rate_for(&self, fold_count: u32) -> Option<Eur> {
        self.costs
            .iter()
            .find(|c| c.fold_count == fold_count)
            .map(|c| c.per_1000)
    }
}

// =============================================================================
// Catalog: lamination
// =============================================================================

/// Digital lamination price tier: quantity range → per-sheet + setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalLaminationTier {
    pub min_qty: u32,
    pub max_qty: u32,
    pub per_sheet: Eur,
    pub setup: Eur,
}

impl DigitalLaminationTier {
    pub fn contains(&self, qty: u32) -> bool {
        qty >= self.min_qty && qty <= self.max_qty
    }
}

/// A lamination finish ("Mat", "Brillant", "Soft touch", ...).
///
/// Offset configuration (rate + calage) may be absent, in which case the
/// offset method is unavailable for jobs selecting this finish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaminationFinish {
    pub id: String,
    pub name: String,
    /// Offset rate per m² of laminated surface.
    pub offset_rate_per_m2: Option<f64>,
    /// Offset setup forfait.
    pub offset_calage: Option<Eur>,
    /// Minimum billing for the offset lamination line.
    pub offset_minimum: Eur,
    pub digital_tiers: Vec<DigitalLaminationTier>,
}

// =============================================================================
// Catalog: machine formats & click divisors
// =============================================================================

/// A candidate offset machine sheet size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineFormat {
    pub name: String,
    pub width_cm: f64,
    pub height_cm: f64,
}

/// Per-format divisor converting quantity into digital click counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickDivisor {
    pub format_name: String,
    pub width_cm: f64,
    pub height_cm: f64,
    /// Divisor for single-sided jobs.
    pub recto: f64,
    /// Divisor for two-sided jobs.
    pub recto_verso: f64,
}

// =============================================================================
// Catalog: delivery
// =============================================================================

/// Zone-scoped carrier rate: first tier with `max_weight_kg >= weight` wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRate {
    pub zone: u32,
    pub max_weight_kg: f64,
    pub price: Eur,
}

/// Department-scoped carrier rate, taking precedence over zone rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRate {
    pub department: String,
    pub max_weight_kg: f64,
    pub price: Eur,
}

/// A delivery carrier with its rate tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrier {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub zone_rates: Vec<ZoneRate>,
    pub department_rates: Vec<DepartmentRate>,
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// A consistent read-only snapshot of every catalog the engine consumes,
/// taken once at the start of a calculation. The core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Tenant scope the snapshot was loaded for (None = global defaults).
    pub tenant: Option<String>,
    pub loaded_at: DateTime<Utc>,

    pub papers: Vec<PaperGrammage>,
    pub color_modes: Vec<ColorMode>,
    pub bindings: Vec<BindingType>,
    pub fold_types: Vec<FoldType>,
    pub laminations: Vec<LaminationFinish>,
    pub machine_formats: Vec<MachineFormat>,
    pub click_divisors: Vec<ClickDivisor>,
    /// Department code → delivery zone.
    pub departments: HashMap<String, u32>,
    pub carriers: Vec<Carrier>,

    /// Assembled once from the three key/value stores.
    pub config: PricingConfig,
}

impl CatalogSnapshot {
    pub fn paper(&self, id: &str) -> QuoteResult<&PaperGrammage> {
        self.papers
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| QuoteError::UnknownCatalogRef {
                entity: "paper grammage",
                id: id.to_string(),
            })
    }

    pub fn color_mode(&self, id: &str) -> QuoteResult<&ColorMode> {
        self.color_modes
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| QuoteError::UnknownCatalogRef {
                entity: "color mode",
                id: id.to_string(),
            })
    }

    pub fn binding(&self, id: &str) -> QuoteResult<&BindingType> {
        self.bindings
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| QuoteError::UnknownCatalogRef {
                entity: "binding type",
                id: id.to_string(),
            })
    }

    pub fn fold_type(&self, id: &str) -> QuoteResult<&FoldType> {
        self.fold_types
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| QuoteError::UnknownCatalogRef {
                entity: "fold type",
                id: id.to_string(),
            })
    }

    pub fn lamination(&self, id: &str) -> QuoteResult<&LaminationFinish> {
        self.laminations
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| QuoteError::UnknownCatalogRef {
                entity: "lamination finish",
                id: id.to_string(),
            })
    }

    /// Delivery zone for a department code. Unknown departments map to the
    /// most expensive configured zone so a quote is never silently cheap.
    pub fn zone_for(&self, department: &str) -> u32 {
        self.departments
            .get(department)
            .copied()
            .unwrap_or_else(|| self.departments.values().copied().max().unwrap_or(1))
    }
}

// =============================================================================
// Results
// =============================================================================

/// Manufacturing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Digital,
    Offset,
}

/// One diagnostic variable for the audit trace: the computed quantity and
/// the literal arithmetic used to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceVar {
    pub name: String,
    pub value: f64,
    pub formula: String,
}

/// Ordered trace collector passed through the pricing modules.
#[derive(Debug, Clone, Default)]
pub struct Trace(Vec<TraceVar>);

impl Trace {
    pub fn new() -> Self {
        Trace(Vec::new())
    }

    /// Records one named value with its arithmetic expression.
    pub fn push(&mut self, name: impl Into<String>, value: f64, formula: impl Into<String>) {
        self.0.push(TraceVar {
            name: name.into(),
            value,
            formula: formula.into(),
        });
    }

    pub fn into_vars(self) -> Vec<TraceVar> {
        self.0
    }
}

/// Itemized digital (click-based) cost breakdown. All-zero when the method
/// is unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigitalBreakdown {
    pub interior_clicks: f64,
    pub cover_clicks: f64,
    pub click_cost: Eur,
    pub paper_cost: Eur,
    pub binding_cost: Eur,
    pub lamination_cost: Eur,
    pub fold_cost: Eur,
    pub finishing_cost: Eur,
    pub packaging_cost: Eur,
    pub delivery_cost: Eur,
    pub subtotal: Eur,
    pub margin: Eur,
    pub total: Eur,
}

/// Itemized offset (plate/press-run-based) cost breakdown. All-zero when
/// the method is unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OffsetBreakdown {
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
    pub fold_cost: Eur,
    pub finishing_cost: Eur,
    pub packaging_cost: Eur,
    pub delivery_cost: Eur,
    pub subtotal: Eur,
    pub margin: Eur,
    pub total: Eur,
}

/// The unified calculation result: both breakdowns, the cheapest method,
/// per-method diagnostics and the audit traces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingResult {
    pub digital_total: Eur,
    pub offset_total: Eur,

    pub digital: DigitalBreakdown,
    pub offset: OffsetBreakdown,

    /// Cheapest available method; None when neither method could be priced.
    pub best_method: Option<Method>,
    pub best_total: Eur,
    /// Absolute price gap between the two methods (zero unless both priced).
    pub ecart: Eur,

    pub digital_error: Option<String>,
    pub digital_suggestion: Option<String>,
    pub offset_error: Option<String>,
    pub offset_suggestion: Option<String>,

    pub digital_trace: Vec<TraceVar>,
    pub offset_trace: Vec<TraceVar>,
}

// =============================================================================
// Unit Tests
// =============================================================================
