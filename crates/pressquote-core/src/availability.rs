//! # Method Availability Validator
//!
//! Decides, before any pricing math runs, whether digital and/or offset
//! pricing is applicable to the job's resolved binding and lamination rows.
//!
//! This validator never errors: it returns structured flags plus
//! human-readable reasons and suggestions. The orchestrator uses them to
//! short-circuit a method into a zeroed breakdown instead of attempting
//! (and failing inside) the computation.

use serde::{Deserialize, Serialize};

use crate::types::{BindingProcess, BindingType, CatalogSnapshot, LaminationFinish};

/// Availability of one manufacturing method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodStatus {
    pub available: bool,
    pub reason: Option<String>,
    pub suggestion: Option<String>,
}

impl MethodStatus {
    fn ok() -> Self {
        MethodStatus {
            available: true,
            reason: None,
            suggestion: None,
        }
    }

    fn unavailable(reason: impl Into<String>, suggestion: Option<String>) -> Self {
        MethodStatus {
            available: false,
            reason: Some(reason.into()),
            suggestion,
        }
    }
}

/// Availability of both methods for a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodAvailability {
    pub digital: MethodStatus,
    pub offset: MethodStatus,
}

/// Names of bindings in the snapshot that do support digital pricing,
/// offered as a suggestion when the selected one does not.
fn digital_capable_bindings(snapshot: &CatalogSnapshot) -> Option<String> {
    let names: Vec<&str> = snapshot
        .bindings
        .iter()
        .filter(|b| !b.digital_tiers.is_empty() || b.process == BindingProcess::Stapling)
        .filter(|b| b.process != BindingProcess::Sewn)
        .map(|b| b.name.as_str())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(format!("bindings with digital pricing: {}", names.join(", ")))
    }
}

/// Inspects the resolved binding and lamination rows and reports which
/// methods can be priced.
pub fn check_availability(
    snapshot: &CatalogSnapshot,
    binding: Option<&BindingType>,
    lamination: Option<&LaminationFinish>,
) -> MethodAvailability {
    let mut digital = MethodStatus::ok();
    let mut offset = MethodStatus::ok();

    if let Some(binding) = binding {
        // Sewn processes are subcontracted and only exist on the offset path.
        if binding.process == BindingProcess::Sewn {
            digital = MethodStatus::unavailable(
                format!("binding '{}' is a sewn process, offset only", binding.name),
                digital_capable_bindings(snapshot),
            );
        } else if binding.digital_tiers.is_empty()
            && binding.process != BindingProcess::Stapling
        {
            // Stapling has a hardcoded digital fallback; everything else
            // needs catalog tiers.
            digital = MethodStatus::unavailable(
                format!("binding '{}' has no digital price tiers", binding.name),
                digital_capable_bindings(snapshot),
            );
        }

        if binding.offset_tiers.is_empty() {
            offset = MethodStatus::unavailable(
                format!("binding '{}' has no offset price tiers", binding.name),
                None,
            );
        }
    }

    if let Some(lamination) = lamination {
        if digital.available && lamination.digital_tiers.is_empty() {
            digital = MethodStatus::unavailable(
                format!(
                    "lamination finish '{}' has no digital price tiers",
                    lamination.name
                ),
                None,
            );
        }

        if offset.available
            && (lamination.offset_rate_per_m2.is_none() || lamination.offset_calage.is_none())
        {
            offset = MethodStatus::unavailable(
                format!(
                    "lamination finish '{}' has no offset rate/calage configuration",
                    lamination.name
                ),
                None,
            );
        }
    }

    MethodAvailability { digital, offset }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingConfig;
    use crate::money::Eur;
    use crate::types::{DigitalBindingTier, DigitalLaminationTier, OffsetBindingTier};
    use chrono::Utc;
    use std::collections::HashMap;

    fn binding(name: &str, digital: bool, offset: bool) -> BindingType {
        BindingType {
            id: name.to_string(),
            name: name.to_string(),
            process: BindingProcess::from_name(name),
            digital_tiers: if digital {
                vec![DigitalBindingTier {
                    min_pages: 8,
                    max_pages: 96,
                    min_qty: 1,
                    max_qty: 100_000,
                    unit_cost: Eur::new(0.4),
                    setup_cost: Eur::new(20.0),
                }]
            } else {
                Vec::new()
            },
            offset_tiers: if offset {
                vec![OffsetBindingTier {
                    min_signatures: 1,
                    calage: Eur::new(40.0),
                    roulage_per_1000: Eur::new(60.0),
                }]
            } else {
                Vec::new()
            },
            rules: Vec::new(),
        }
    }

    fn snapshot(bindings: Vec<BindingType>) -> CatalogSnapshot {
        CatalogSnapshot {
            tenant: None,
            loaded_at: Utc::now(),
            papers: Vec::new(),
            color_modes: Vec::new(),
            bindings,
            fold_types: Vec::new(),
            laminations: Vec::new(),
            machine_formats: Vec::new(),
            click_divisors: Vec::new(),
            departments: HashMap::new(),
            carriers: Vec::new(),
            config: PricingConfig::default(),
        }
    }

    #[test]
    fn test_both_available_without_binding_or_lamination() {
        let snap = snapshot(Vec::new());
        let avail = check_availability(&snap, None, None);
        assert!(avail.digital.available);
        assert!(avail.offset.available);
    }

    #[test]
    fn test_stapling_without_digital_tiers_keeps_digital() {
        let b = binding("Piqûre 2 points", false, true);
        let snap = snapshot(vec![b.clone()]);
        let avail = check_availability(&snap, Some(&b), None);
        assert!(avail.digital.available, "stapling has a hardcoded fallback");
    }

    #[test]
    fn test_glued_without_digital_tiers_disables_digital_with_suggestion() {
        let glued = binding("Dos carré collé", false, true);
        let capable = binding("Piqûre 2 points", false, true);
        let snap = snapshot(vec![glued.clone(), capable]);

        let avail = check_availability(&snap, Some(&glued), None);
        assert!(!avail.digital.available);
        assert!(avail.digital.reason.as_ref().unwrap().contains("digital"));
        assert!(avail
            .digital
            .suggestion
            .as_ref()
            .unwrap()
            .contains("Piqûre 2 points"));
        assert!(avail.offset.available);
    }

    #[test]
    fn test_sewn_binding_is_offset_only() {
        let sewn = binding("Dos carré cousu collé", true, true);
        let snap = snapshot(vec![sewn.clone()]);
        let avail = check_availability(&snap, Some(&sewn), None);
        assert!(!avail.digital.available);
        assert!(avail.offset.available);
    }

    #[test]
    fn test_binding_without_offset_tiers_disables_offset() {
        let b = binding("Dos carré collé", true, false);
        let snap = snapshot(vec![b.clone()]);
        let avail = check_availability(&snap, Some(&b), None);
        assert!(avail.digital.available);
        assert!(!avail.offset.available);
    }

    #[test]
    fn test_lamination_without_offset_config_disables_offset() {
        let lam = LaminationFinish {
            id: "l1".to_string(),
            name: "Soft touch".to_string(),
            offset_rate_per_m2: None,
            offset_calage: None,
            offset_minimum: Eur::zero(),
            digital_tiers: vec![DigitalLaminationTier {
                min_qty: 1,
                max_qty: 100_000,
                per_sheet: Eur::new(0.2),
                setup: Eur::new(15.0),
            }],
        };
        let snap = snapshot(Vec::new());
        let avail = check_availability(&snap, None, Some(&lam));
        assert!(avail.digital.available);
        assert!(!avail.offset.available);
        assert!(!avail.offset.reason.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_lamination_without_digital_tiers_disables_digital() {
        let lam = LaminationFinish {
            id: "l1".to_string(),
            name: "Brillant".to_string(),
            offset_rate_per_m2: Some(0.4),
            offset_calage: Some(Eur::new(30.0)),
            offset_minimum: Eur::new(35.0),
            digital_tiers: Vec::new(),
        };
        let snap = snapshot(Vec::new());
        let avail = check_availability(&snap, None, Some(&lam));
        assert!(!avail.digital.available);
        assert!(avail.offset.available);
    }
}
