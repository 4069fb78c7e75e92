//! Persistence port for per-project assumptions.
//!
//! Storage holds raw JSON so documents written by older schema versions can
//! be read back and migrated on load.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};
use tracing::info;
use uuid::Uuid;

use crate::assumptions::{Assumptions, DEFAULT_NET_TO_GROSS_PCT};
use crate::error::ProFormaError;
use crate::migration::migrate_legacy;
use crate::validation::validate_assumptions;
use crate::ProFormaResult;

const SQFT_PER_M2: Decimal = dec!(10.7639);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A stored document exactly as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProForma {
    pub project_id: String,
    pub updated_at: DateTime<Utc>,
    pub assumptions: Value,
}

/// A stored document with its assumptions parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProFormaRow {
    pub project_id: String,
    pub updated_at: DateTime<Utc>,
    pub assumptions: Assumptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    #[default]
    Sqft,
    M2,
}

/// Program figures lifted from a project profile when a pro forma is first created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSeed {
    pub units: Option<u32>,
    pub gross_floor_area: Option<Decimal>,
    #[serde(default)]
    pub area_unit: AreaUnit,
}

impl ProfileSeed {
    pub fn area_sqft(&self) -> Option<Decimal> {
        self.gross_floor_area.map(|area| match self.area_unit {
            AreaUnit::Sqft => area,
            AreaUnit::M2 => area * SQFT_PER_M2,
        })
    }

    fn is_empty(&self) -> bool {
        self.units.is_none() && self.gross_floor_area.is_none()
    }
}

pub trait ProFormaRepository: Send + Sync {
    fn get(&self, project_id: &str) -> ProFormaResult<Option<StoredProForma>>;
    fn upsert(&self, project_id: &str, assumptions: Value) -> ProFormaResult<StoredProForma>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryProFormaRepository {
    rows: RwLock<HashMap<String, StoredProForma>>,
}

impl InMemoryProFormaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> ProFormaResult<usize> {
        Ok(self.read_rows()?.len())
    }

    pub fn is_empty(&self) -> ProFormaResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read_rows(&self) -> ProFormaResult<RwLockReadGuard<'_, HashMap<String, StoredProForma>>> {
        self.rows
            .read()
            .map_err(|_| ProFormaError::Storage("pro forma store lock poisoned".into()))
    }
}

impl ProFormaRepository for InMemoryProFormaRepository {
    fn get(&self, project_id: &str) -> ProFormaResult<Option<StoredProForma>> {
        Ok(self.read_rows()?.get(project_id).cloned())
    }

    fn upsert(&self, project_id: &str, assumptions: Value) -> ProFormaResult<StoredProForma> {
        let row = StoredProForma {
            project_id: project_id.to_string(),
            updated_at: Utc::now(),
            assumptions,
        };
        let mut rows = self
            .rows
            .write()
            .map_err(|_| ProFormaError::Storage("pro forma store lock poisoned".into()))?;
        rows.insert(project_id.to_string(), row.clone());
        Ok(row)
    }
}

// ---------------------------------------------------------------------------
// Service functions
// ---------------------------------------------------------------------------

/// Stored assumptions for a project, migrated to the current schema.
pub fn load_pro_forma(
    repo: &dyn ProFormaRepository,
    project_id: &str,
) -> ProFormaResult<Option<Assumptions>> {
    repo.get(project_id)?
        .map(|row| migrate_legacy(row.assumptions))
        .transpose()
}

/// Normalise, validate and persist a project's assumptions.
pub fn save_pro_forma(
    repo: &dyn ProFormaRepository,
    project_id: &str,
    assumptions: &Assumptions,
) -> ProFormaResult<ProFormaRow> {
    check_project_id(project_id)?;

    let mut normalized = assumptions.clone();
    if let Some(total) = normalized.timeline.phases.total() {
        normalized.timeline.total_months = Some(total);
    }
    validate_assumptions(&normalized)?;

    let stored = repo.upsert(project_id, serde_json::to_value(&normalized)?)?;
    info!(project_id, updated_at = %stored.updated_at, "pro forma saved");

    Ok(ProFormaRow {
        project_id: stored.project_id,
        updated_at: stored.updated_at,
        assumptions: normalized,
    })
}

/// The project's assumptions, creating and persisting defaults on first use.
pub fn ensure_pro_forma(
    repo: &dyn ProFormaRepository,
    project_id: &str,
    seed: Option<&ProfileSeed>,
) -> ProFormaResult<Assumptions> {
    if let Some(existing) = load_pro_forma(repo, project_id)? {
        return Ok(existing);
    }

    let mut assumptions = Assumptions::default();
    if let Some(seed) = seed.filter(|s| !s.is_empty()) {
        assumptions.program.units = seed.units;
        assumptions.program.saleable_area_sqft = seed.area_sqft();
        assumptions.program.net_to_gross_pct = Some(DEFAULT_NET_TO_GROSS_PCT);
    }

    info!(project_id, seeded = seed.is_some(), "creating default pro forma");
    Ok(save_pro_forma(repo, project_id, &assumptions)?.assumptions)
}

fn check_project_id(project_id: &str) -> ProFormaResult<()> {
    Uuid::parse_str(project_id)
        .map(|_| ())
        .map_err(|e| ProFormaError::InvalidInput {
            field: "project_id".into(),
            reason: format!("Invalid project ID: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const PROJECT: &str = "6f1c2a4e-8b3d-4c5e-9f70-1a2b3c4d5e6f";

    #[test]
    fn test_load_missing_is_none() {
        let repo = InMemoryProFormaRepository::new();
        assert_eq!(load_pro_forma(&repo, PROJECT).unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let repo = InMemoryProFormaRepository::new();
        let mut a = Assumptions::default();
        a.program.units = Some(20);
        a.timeline.phases.construction_months = Some(20);
        a.timeline.total_months = Some(1);

        let saved = save_pro_forma(&repo, PROJECT, &a).unwrap();
        // total recomputed from phases
        assert_eq!(saved.assumptions.timeline.total_months, Some(32));

        let loaded = load_pro_forma(&repo, PROJECT).unwrap().unwrap();
        assert_eq!(loaded, saved.assumptions);
    }

    #[test]
    fn test_save_rejects_bad_project_id() {
        let repo = InMemoryProFormaRepository::new();
        let err = save_pro_forma(&repo, "project-1", &Assumptions::default()).unwrap_err();
        assert!(matches!(err, ProFormaError::InvalidInput { ref field, .. } if field == "project_id"));
        assert!(repo.is_empty().unwrap());
    }

    #[test]
    fn test_save_rejects_invalid_assumptions() {
        let repo = InMemoryProFormaRepository::new();
        let mut a = Assumptions::default();
        a.costs.soft_cost_pct_of_hard = Some(dec!(250));
        assert!(save_pro_forma(&repo, PROJECT, &a).is_err());
        assert!(repo.is_empty().unwrap());
    }

    #[test]
    fn test_load_migrates_legacy_row() {
        let repo = InMemoryProFormaRepository::new();
        repo.upsert(
            PROJECT,
            json!({
                "program": { "units": 10 },
                "acquisition": {},
                "revenue": { "sale_price_per_sqft": "400" },
                "costs": {},
                "financing": {},
                "timeline": { "total_months": 20 }
            }),
        )
        .unwrap();

        let a = load_pro_forma(&repo, PROJECT).unwrap().unwrap();
        assert_eq!(a.revenue_sale.sale_price_per_sqft, Some(dec!(400)));
        assert_eq!(a.timeline.phases.total(), Some(20));
    }

    #[test]
    fn test_ensure_creates_defaults_once() {
        let repo = InMemoryProFormaRepository::new();
        let created = ensure_pro_forma(&repo, PROJECT, None).unwrap();
        assert_eq!(created, Assumptions::default());
        assert_eq!(repo.len().unwrap(), 1);

        let first = repo.get(PROJECT).unwrap().unwrap();
        let again = ensure_pro_forma(&repo, PROJECT, None).unwrap();
        assert_eq!(again, created);
        assert_eq!(repo.get(PROJECT).unwrap().unwrap().updated_at, first.updated_at);
    }

    #[test]
    fn test_ensure_seeds_from_profile_in_square_metres() {
        let repo = InMemoryProFormaRepository::new();
        let seed = ProfileSeed {
            units: Some(24),
            gross_floor_area: Some(dec!(2000)),
            area_unit: AreaUnit::M2,
        };
        let a = ensure_pro_forma(&repo, PROJECT, Some(&seed)).unwrap();
        assert_eq!(a.program.units, Some(24));
        assert_eq!(a.program.saleable_area_sqft, Some(dec!(21527.8)));

        let stored = load_pro_forma(&repo, PROJECT).unwrap().unwrap();
        assert_eq!(stored.program.units, Some(24));
    }

    #[test]
    fn test_poisoned_store_reports_storage_error() {
        let repo = std::sync::Arc::new(InMemoryProFormaRepository::new());
        let poisoner = std::sync::Arc::clone(&repo);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.rows.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(repo.len(), Err(ProFormaError::Storage(_))));
        assert!(matches!(repo.is_empty(), Err(ProFormaError::Storage(_))));
        assert!(matches!(repo.get(PROJECT), Err(ProFormaError::Storage(_))));
    }

    #[test]
    fn test_empty_seed_leaves_defaults() {
        let repo = InMemoryProFormaRepository::new();
        let a = ensure_pro_forma(&repo, PROJECT, Some(&ProfileSeed::default())).unwrap();
        assert_eq!(a, Assumptions::default());
    }
}
