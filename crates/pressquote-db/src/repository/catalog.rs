//! # Catalog Repository
//!
//! Loads one consistent [`CatalogSnapshot`] per quote.
//!
//! ## Load Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Assembly                                    │
//! │                                                                         │
//! │  SQLite rows (stringly typed, tenant-layered)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tenant merge ← global rows first, tenant rows override by id/key      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  name → enum resolution ← BindingProcess, PaperFinish, FoldKind        │
//! │  rule JSON validation   ← closed BindingRule schema, corrupt rows fail │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogSnapshot ← immutable, owned, handed to pressquote-core         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing modules never see a string they have to interpret: every
//! display name is resolved to an enum exactly once, here.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use pressquote_core::{
    BindingProcess, BindingRule, BindingType, Carrier, CatalogSnapshot, ClickDivisor, ColorMode,
    ConfigEntry, DepartmentRate, DigitalBindingTier, DigitalLaminationTier, Eur, FoldCost,
    FoldKind, FoldType, LaminationFinish, MachineFormat, OffsetBindingTier, PaperFinish,
    PaperGrammage, PricingConfig, ZoneRate,
};

/// Read-only repository assembling catalog snapshots.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

// =============================================================================
// Row Types
// =============================================================================
// Runtime-checked queries with FromRow derives; the workspace builds without
// a live database.

#[derive(Debug, sqlx::FromRow)]
struct PaperRow {
    id: String,
    paper_name: String,
    grammage: f64,
    price_per_kg: f64,
    ref_weight_kg_per_1000: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
struct ColorModeRow {
    id: String,
    name: String,
    plates_per_side: i64,
    has_varnish: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct BindingRow {
    id: String,
    name: String,
    rules: String,
}

#[derive(Debug, sqlx::FromRow)]
struct BindingDigitalTierRow {
    binding_id: String,
    min_pages: i64,
    max_pages: i64,
    min_qty: i64,
    max_qty: i64,
    unit_cost: f64,
    setup_cost: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct BindingOffsetTierRow {
    binding_id: String,
    min_signatures: i64,
    calage: f64,
    roulage_per_1000: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct FoldTypeRow {
    id: String,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct FoldCostRow {
    fold_type_id: String,
    fold_count: i64,
    per_1000: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct LaminationRow {
    id: String,
    name: String,
    offset_rate_per_m2: Option<f64>,
    offset_calage: Option<f64>,
    offset_minimum: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct LaminationTierRow {
    finish_id: String,
    min_qty: i64,
    max_qty: i64,
    per_sheet: f64,
    setup: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct MachineFormatRow {
    name: String,
    width_cm: f64,
    height_cm: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct ClickDivisorRow {
    format_name: String,
    width_cm: f64,
    height_cm: f64,
    recto: f64,
    recto_verso: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct DepartmentRow {
    code: String,
    zone: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CarrierRow {
    id: String,
    name: String,
    active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct ZoneRateRow {
    carrier_id: String,
    zone: i64,
    max_weight_kg: f64,
    price: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct DepartmentRateRow {
    carrier_id: String,
    department: String,
    max_weight_kg: f64,
    price: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct ConfigRow {
    key: String,
    value: f64,
    unit: Option<String>,
    description: Option<String>,
}

// =============================================================================
// Tenant Merge
// =============================================================================

/// Keeps the last row per key, preserving first-seen order.
///
/// Queries sort global rows before tenant rows, so a tenant row with the
/// same id replaces the global one in place.
fn merge_last_by<T>(rows: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(rows.len());

    for row in rows {
        match slots.get(key(&row)) {
            Some(&idx) => out[idx] = row,
            None => {
                slots.insert(key(&row).to_string(), out.len());
                out.push(row);
            }
        }
    }

    out
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Loads the full catalog snapshot for a tenant (None = global rows
    /// only). The per-entity reads run concurrently; the result is owned
    /// and immutable.
    pub async fn load_snapshot(&self, tenant: Option<&str>) -> DbResult<CatalogSnapshot> {
        debug!(tenant = ?tenant, "Loading catalog snapshot");

        let (
            papers,
            color_modes,
            bindings,
            fold_types,
            laminations,
            machine_formats,
            click_divisors,
            departments,
            carriers,
            config,
        ) = tokio::try_join!(
            self.load_papers(tenant),
            self.load_color_modes(tenant),
            self.load_bindings(tenant),
            self.load_fold_types(tenant),
            self.load_laminations(tenant),
            self.load_machine_formats(),
            self.load_click_divisors(),
            self.load_departments(),
            self.load_carriers(),
            self.load_config(tenant),
        )?;

        info!(
            tenant = ?tenant,
            papers = papers.len(),
            bindings = bindings.len(),
            carriers = carriers.len(),
            "Catalog snapshot loaded"
        );

        Ok(CatalogSnapshot {
            tenant: tenant.map(str::to_string),
            loaded_at: Utc::now(),
            papers,
            color_modes,
            bindings,
            fold_types,
            laminations,
            machine_formats,
            click_divisors,
            departments,
            carriers,
            config,
        })
    }

    async fn load_papers(&self, tenant: Option<&str>) -> DbResult<Vec<PaperGrammage>> {
        let rows: Vec<PaperRow> = sqlx::query_as(
            "SELECT id, paper_name, grammage, price_per_kg, ref_weight_kg_per_1000
             FROM paper_grammages
             WHERE tenant_id IS NULL OR tenant_id = ?1
             ORDER BY tenant_id IS NOT NULL",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;

        Ok(merge_last_by(rows, |r| &r.id)
            .into_iter()
            .map(|r| PaperGrammage {
                finish: PaperFinish::from_name(&r.paper_name),
                id: r.id,
                paper_name: r.paper_name,
                grammage: r.grammage,
                price_per_kg: Eur::new(r.price_per_kg),
                ref_weight_kg_per_1000: r.ref_weight_kg_per_1000,
            })
            .collect())
    }

    async fn load_color_modes(&self, tenant: Option<&str>) -> DbResult<Vec<ColorMode>> {
        let rows: Vec<ColorModeRow> = sqlx::query_as(
            "SELECT id, name, plates_per_side, has_varnish
             FROM color_modes
             WHERE tenant_id IS NULL OR tenant_id = ?1
             ORDER BY tenant_id IS NOT NULL",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;

        Ok(merge_last_by(rows, |r| &r.id)
            .into_iter()
            .map(|r| ColorMode {
                id: r.id,
                name: r.name,
                plates_per_side: r.plates_per_side as u32,
                has_varnish: r.has_varnish,
            })
            .collect())
    }

    async fn load_bindings(&self, tenant: Option<&str>) -> DbResult<Vec<BindingType>> {
        let rows: Vec<BindingRow> = sqlx::query_as(
            "SELECT id, name, rules
             FROM binding_types
             WHERE tenant_id IS NULL OR tenant_id = ?1
             ORDER BY tenant_id IS NOT NULL",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;

        let digital: Vec<BindingDigitalTierRow> = sqlx::query_as(
            "SELECT binding_id, min_pages, max_pages, min_qty, max_qty, unit_cost, setup_cost
             FROM binding_digital_tiers
             ORDER BY min_qty",
        )
        .fetch_all(&self.pool)
        .await?;

        let offset: Vec<BindingOffsetTierRow> = sqlx::query_as(
            "SELECT binding_id, min_signatures, calage, roulage_per_1000
             FROM binding_offset_tiers
             ORDER BY min_signatures",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut digital_by_binding: HashMap<String, Vec<DigitalBindingTier>> = HashMap::new();
        for t in digital {
            digital_by_binding
                .entry(t.binding_id.clone())
                .or_default()
                .push(DigitalBindingTier {
                    min_pages: t.min_pages as u32,
                    max_pages: t.max_pages as u32,
                    min_qty: t.min_qty as u32,
                    max_qty: t.max_qty as u32,
                    unit_cost: Eur::new(t.unit_cost),
                    setup_cost: Eur::new(t.setup_cost),
                });
        }

        let mut offset_by_binding: HashMap<String, Vec<OffsetBindingTier>> = HashMap::new();
        for t in offset {
            offset_by_binding
                .entry(t.binding_id.clone())
                .or_default()
                .push(OffsetBindingTier {
                    min_signatures: t.min_signatures as u32,
                    calage: Eur::new(t.calage),
                    roulage_per_1000: Eur::new(t.roulage_per_1000),
                });
        }

        merge_last_by(rows, |r| &r.id)
            .into_iter()
            .map(|r| {
                // The rule blob is free-form in the legacy schema; it must
                // parse against the closed schema or the row is unusable.
                let rules: Vec<BindingRule> = serde_json::from_str(&r.rules)
                    .map_err(|e| DbError::corrupt("binding_types", &r.id, e.to_string()))?;

                Ok(BindingType {
                    process: BindingProcess::from_name(&r.name),
                    digital_tiers: digital_by_binding.remove(&r.id).unwrap_or_default(),
                    offset_tiers: offset_by_binding.remove(&r.id).unwrap_or_default(),
                    id: r.id,
                    name: r.name,
                    rules,
                })
            })
            .collect()
    }

    async fn load_fold_types(&self, tenant: Option<&str>) -> DbResult<Vec<FoldType>> {
        let rows: Vec<FoldTypeRow> = sqlx::query_as(
            "SELECT id, name
             FROM fold_types
             WHERE tenant_id IS NULL OR tenant_id = ?1
             ORDER BY tenant_id IS NOT NULL",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;

        let costs: Vec<FoldCostRow> = sqlx::query_as(
            "SELECT fold_type_id, fold_count, per_1000 FROM fold_costs ORDER BY fold_count",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut costs_by_type: HashMap<String, Vec<FoldCost>> = HashMap::new();
        for c in costs {
            costs_by_type
                .entry(c.fold_type_id.clone())
                .or_default()
                .push(FoldCost {
                    fold_count: c.fold_count as u32,
                    per_1000: Eur::new(c.per_1000),
                });
        }

        Ok(merge_last_by(rows, |r| &r.id)
            .into_iter()
            .map(|r| FoldType {
                kind: FoldKind::from_name(&r.name),
                costs: costs_by_type.remove(&r.id).unwrap_or_default(),
                id: r.id,
                name: r.name,
            })
            .collect())
    }

    async fn load_laminations(&self, tenant: Option<&str>) -> DbResult<Vec<LaminationFinish>> {
        let rows: Vec<LaminationRow> = sqlx::query_as(
            "SELECT id, name, offset_rate_per_m2, offset_calage, offset_minimum
             FROM lamination_finishes
             WHERE tenant_id IS NULL OR tenant_id = ?1
             ORDER BY tenant_id IS NOT NULL",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;

        let tiers: Vec<LaminationTierRow> = sqlx::query_as(
            "SELECT finish_id, min_qty, max_qty, per_sheet, setup
             FROM lamination_digital_tiers
             ORDER BY min_qty",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tiers_by_finish: HashMap<String, Vec<DigitalLaminationTier>> = HashMap::new();
        for t in tiers {
            tiers_by_finish
                .entry(t.finish_id.clone())
                .or_default()
                .push(DigitalLaminationTier {
                    min_qty: t.min_qty as u32,
                    max_qty: t.max_qty as u32,
                    per_sheet: Eur::new(t.per_sheet),
                    setup: Eur::new(t.setup),
                });
        }

        Ok(merge_last_by(rows, |r| &r.id)
            .into_iter()
            .map(|r| LaminationFinish {
                digital_tiers: tiers_by_finish.remove(&r.id).unwrap_or_default(),
                id: r.id,
                name: r.name,
                offset_rate_per_m2: r.offset_rate_per_m2,
                offset_calage: r.offset_calage.map(Eur::new),
                offset_minimum: Eur::new(r.offset_minimum),
            })
            .collect())
    }

    async fn load_machine_formats(&self) -> DbResult<Vec<MachineFormat>> {
        let rows: Vec<MachineFormatRow> =
            sqlx::query_as("SELECT name, width_cm, height_cm FROM machine_formats ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| MachineFormat {
                name: r.name,
                width_cm: r.width_cm,
                height_cm: r.height_cm,
            })
            .collect())
    }

    async fn load_click_divisors(&self) -> DbResult<Vec<ClickDivisor>> {
        let rows: Vec<ClickDivisorRow> = sqlx::query_as(
            "SELECT format_name, width_cm, height_cm, recto, recto_verso
             FROM click_divisors
             ORDER BY format_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ClickDivisor {
                format_name: r.format_name,
                width_cm: r.width_cm,
                height_cm: r.height_cm,
                recto: r.recto,
                recto_verso: r.recto_verso,
            })
            .collect())
    }

    async fn load_departments(&self) -> DbResult<HashMap<String, u32>> {
        let rows: Vec<DepartmentRow> = sqlx::query_as("SELECT code, zone FROM departments")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| (r.code, r.zone as u32)).collect())
    }

    async fn load_carriers(&self) -> DbResult<Vec<Carrier>> {
        let rows: Vec<CarrierRow> =
            sqlx::query_as("SELECT id, name, active FROM carriers ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        let zone_rates: Vec<ZoneRateRow> = sqlx::query_as(
            "SELECT carrier_id, zone, max_weight_kg, price
             FROM carrier_zone_rates
             ORDER BY zone, max_weight_kg",
        )
        .fetch_all(&self.pool)
        .await?;

        let dept_rates: Vec<DepartmentRateRow> = sqlx::query_as(
            "SELECT carrier_id, department, max_weight_kg, price
             FROM carrier_department_rates
             ORDER BY department, max_weight_kg",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut zones_by_carrier: HashMap<String, Vec<ZoneRate>> = HashMap::new();
        for r in zone_rates {
            zones_by_carrier
                .entry(r.carrier_id.clone())
                .or_default()
                .push(ZoneRate {
                    zone: r.zone as u32,
                    max_weight_kg: r.max_weight_kg,
                    price: Eur::new(r.price),
                });
        }

        let mut depts_by_carrier: HashMap<String, Vec<DepartmentRate>> = HashMap::new();
        for r in dept_rates {
            depts_by_carrier
                .entry(r.carrier_id.clone())
                .or_default()
                .push(DepartmentRate {
                    department: r.department,
                    max_weight_kg: r.max_weight_kg,
                    price: Eur::new(r.price),
                });
        }

        Ok(rows
            .into_iter()
            .map(|r| Carrier {
                zone_rates: zones_by_carrier.remove(&r.id).unwrap_or_default(),
                department_rates: depts_by_carrier.remove(&r.id).unwrap_or_default(),
                id: r.id,
                name: r.name,
                active: r.active,
            })
            .collect())
    }

    /// Assembles the pricing configuration from the three key/value stores.
    ///
    /// Global rows come first, tenant rows last; `PricingConfig` applies
    /// later entries over earlier ones, so tenant values win.
    async fn load_config(&self, tenant: Option<&str>) -> DbResult<PricingConfig> {
        let mut entries: Vec<ConfigEntry> = Vec::new();

        for table in ["offset_constants", "digital_constants", "margin_constants"] {
            let sql = format!(
                "SELECT key, value, unit, description
                 FROM {table}
                 WHERE tenant_id IS NULL OR tenant_id = ?1
                 ORDER BY tenant_id IS NOT NULL"
            );
            let rows: Vec<ConfigRow> = sqlx::query_as(&sql)
                .bind(tenant)
                .fetch_all(&self.pool)
                .await?;

            entries.extend(rows.into_iter().map(|r| ConfigEntry {
                key: r.key,
                value: r.value,
                unit: r.unit,
                description: r.description,
            }));
        }

        Ok(PricingConfig::from_entries(&entries))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn exec(db: &Database, sql: &str) {
        sqlx::query(sql).execute(db.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_catalog_uses_config_defaults() {
        let db = test_db().await;
        let snapshot = db.catalog().load_snapshot(None).await.unwrap();

        assert!(snapshot.papers.is_empty());
        assert_eq!(snapshot.config, PricingConfig::default());
    }

    #[tokio::test]
    async fn test_name_to_enum_resolution() {
        let db = test_db().await;
        exec(
            &db,
            "INSERT INTO binding_types (id, name, rules)
             VALUES ('b1', 'Dos carré cousu collé', '[]')",
        )
        .await;
        exec(
            &db,
            "INSERT INTO paper_grammages (id, paper_name, grammage, price_per_kg)
             VALUES ('p1', 'Couché satin', 135.0, 1.2)",
        )
        .await;

        let snapshot = db.catalog().load_snapshot(None).await.unwrap();
        assert_eq!(snapshot.bindings[0].process, BindingProcess::Sewn);
        assert_eq!(snapshot.papers[0].finish, PaperFinish::Satin);
    }

    #[tokio::test]
    async fn test_binding_rules_parse_against_closed_schema() {
        let db = test_db().await;
        exec(
            &db,
            r#"INSERT INTO binding_types (id, name, rules) VALUES
               ('b1', 'Dos carré collé',
                '[{"type":"light_paper_surcharge","max_grammage":70.0,"surcharge":0.2}]')"#,
        )
        .await;

        let snapshot = db.catalog().load_snapshot(None).await.unwrap();
        assert_eq!(
            snapshot.bindings[0].rules,
            vec![BindingRule::LightPaperSurcharge {
                max_grammage: 70.0,
                surcharge: 0.2
            }]
        );
    }

    #[tokio::test]
    async fn test_corrupt_binding_rules_fail_the_load() {
        let db = test_db().await;
        exec(
            &db,
            r#"INSERT INTO binding_types (id, name, rules)
               VALUES ('b1', 'Dos carré collé', '[{"type":"no_such_rule"}]')"#,
        )
        .await;

        let err = db.catalog().load_snapshot(None).await.unwrap_err();
        assert!(matches!(err, DbError::CorruptCatalog { entity: "binding_types", .. }));
    }

    #[tokio::test]
    async fn test_tenant_rows_override_global_rows() {
        let db = test_db().await;
        exec(
            &db,
            "INSERT INTO paper_grammages (id, tenant_id, paper_name, grammage, price_per_kg)
             VALUES ('p1', NULL, 'Offset blanc', 90.0, 1.35)",
        )
        .await;
        exec(
            &db,
            "INSERT INTO paper_grammages (id, tenant_id, paper_name, grammage, price_per_kg)
             VALUES ('p1', 'acme', 'Offset blanc', 90.0, 1.10)",
        )
        .await;

        let global = db.catalog().load_snapshot(None).await.unwrap();
        assert_eq!(global.papers.len(), 1);
        assert_eq!(global.papers[0].price_per_kg, Eur::new(1.35));

        let tenant = db.catalog().load_snapshot(Some("acme")).await.unwrap();
        assert_eq!(tenant.papers.len(), 1);
        assert_eq!(tenant.papers[0].price_per_kg, Eur::new(1.10));
        assert_eq!(tenant.tenant.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_config_tenant_override_wins() {
        let db = test_db().await;
        exec(
            &db,
            "INSERT INTO offset_constants (key, tenant_id, value)
             VALUES ('offset.plate_cost', NULL, 11.0)",
        )
        .await;
        exec(
            &db,
            "INSERT INTO offset_constants (key, tenant_id, value)
             VALUES ('offset.plate_cost', 'acme', 9.5)",
        )
        .await;

        let global = db.catalog().load_snapshot(None).await.unwrap();
        assert_eq!(global.config.plate_cost, 11.0);

        let tenant = db.catalog().load_snapshot(Some("acme")).await.unwrap();
        assert_eq!(tenant.config.plate_cost, 9.5);
    }

    #[tokio::test]
    async fn test_tiers_attach_to_their_binding() {
        let db = test_db().await;
        exec(
            &db,
            "INSERT INTO binding_types (id, name, rules)
             VALUES ('b1', 'Piqûre 2 points', '[]'), ('b2', 'Dos carré collé', '[]')",
        )
        .await;
        exec(
            &db,
            "INSERT INTO binding_offset_tiers (id, binding_id, min_signatures, calage, roulage_per_1000)
             VALUES ('t1', 'b1', 1, 40.0, 60.0), ('t2', 'b2', 1, 80.0, 90.0)",
        )
        .await;

        let snapshot = db.catalog().load_snapshot(None).await.unwrap();
        let staple = snapshot.binding("b1").unwrap();
        let glued = snapshot.binding("b2").unwrap();
        assert_eq!(staple.offset_tiers.len(), 1);
        assert_eq!(staple.offset_tiers[0].calage, Eur::new(40.0));
        assert_eq!(glued.offset_tiers[0].calage, Eur::new(80.0));
    }
}
