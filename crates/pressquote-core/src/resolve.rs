//! # Job Resolution
//!
//! Resolves the id-based selections on a [`JobSpec`] against the catalog
//! snapshot into concrete rows, and derives the geometry every pricing
//! module shares: the optimal imposition, the cahier plan, the spine and
//! the per-copy weight.
//!
//! Resolution happens exactly once per calculation; the pricing modules
//! receive borrowed rows and never touch the snapshot again.

use crate::cahier::{plan_cahiers, CahierPlan};
use crate::error::QuoteResult;
use crate::imposition::{pick_optimal_format, Imposition};
use crate::types::{
    BindingType, CatalogSnapshot, ClickDivisor, ColorMode, FoldType, JobSpec, LaminationFinish,
    PaperGrammage,
};
use crate::validation::{check_fold, validate_job};
use crate::weight::{copy_weight_g, spine_thickness_cm};

/// A job with every catalog reference resolved and shared geometry derived.
#[derive(Debug)]
pub struct ResolvedJob<'a> {
    pub interior_paper: &'a PaperGrammage,
    pub cover_paper: Option<&'a PaperGrammage>,
    pub interior_color: &'a ColorMode,
    pub cover_color: Option<&'a ColorMode>,
    pub binding: Option<&'a BindingType>,
    pub fold_type: Option<&'a FoldType>,
    pub lamination: Option<&'a LaminationFinish>,

    /// Click divisor catalog, for the digital click formulas.
    pub click_divisors: &'a [ClickDivisor],

    /// Best machine format for the open/flat product format.
    pub imposition: Imposition,
    /// Signature structure, bound products only.
    pub cahier: Option<CahierPlan>,
    /// Spine thickness in cm (zero unless the binding process glues a spine).
    pub spine_cm: f64,
    /// Per-copy weight in grams.
    pub copy_weight_g: f64,
}

/// Validates the job and resolves it against the snapshot.
///
/// Fails fatally on contract violations, unknown catalog references, and
/// fold combinations outside the machine limit table.
pub fn resolve<'a>(job: &JobSpec, snapshot: &'a CatalogSnapshot) -> QuoteResult<ResolvedJob<'a>> {
    validate_job(job)?;

    let interior_paper = snapshot.paper(&job.interior_paper_id)?;
    let cover_paper = match &job.cover_paper_id {
        Some(id) => Some(snapshot.paper(id)?),
        None => None,
    };

    let interior_color = snapshot.color_mode(&job.interior_color_id)?;
    let cover_color = match &job.cover_color_id {
        Some(id) => Some(snapshot.color_mode(id)?),
        None => None,
    };

    let binding = match &job.binding_id {
        Some(id) => Some(snapshot.binding(id)?),
        None => None,
    };

    let fold_type = match &job.fold {
        Some(selection) => {
            let fold_type = snapshot.fold_type(&selection.fold_type_id)?;
            check_fold(fold_type.kind, selection.fold_count, interior_paper.grammage)?;
            if let Some(cross) = selection.cross_fold_count {
                check_fold(fold_type.kind, cross, interior_paper.grammage)?;
            }
            Some(fold_type)
        }
        None => None,
    };

    let lamination = match &job.lamination {
        Some(selection) => Some(snapshot.lamination(&selection.finish_id)?),
        None => None,
    };

    // The open/flat format is what gets imposed on the machine sheet.
    let imposition = pick_optimal_format(
        job.open_format.width_cm,
        job.open_format.height_cm,
        &snapshot.machine_formats,
        snapshot.config.bleed_cm,
    );

    let cahier = if job.is_bound() && job.interior_pages > 0 {
        Some(plan_cahiers(job.interior_pages, imposition.poses))
    } else {
        None
    };

    let spine_cm = match binding {
        Some(b) if b.process.has_spine() => {
            spine_thickness_cm(job.interior_pages, interior_paper.grammage)
        }
        _ => 0.0,
    };

    let copy_weight_g = copy_weight_g(job, interior_paper, cover_paper, spine_cm);

    Ok(ResolvedJob {
        interior_paper,
        cover_paper,
        interior_color,
        cover_color,
        binding,
        fold_type,
        lamination,
        click_divisors: &snapshot.click_divisors,
        imposition,
        cahier,
        spine_cm,
        copy_weight_g,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
