//! Tariff catalog

use super::TariffRecord;
use crate::{CoreError, CoreResult};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Read-only, ordered set of tariff records with an id index
#[derive(Debug, Clone)]
pub struct TariffCatalog {
    records: Vec<TariffRecord>,
    index: HashMap<String, usize>,
}

impl TariffCatalog {
    /// Build a catalog, rejecting duplicate ids and invalid charges
    pub fn new(records: Vec<TariffRecord>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if record.tariff_id.trim().is_empty() {
                return Err(CoreError::Config(format!(
                    "Tariff at position {} has an empty id",
                    position
                )));
            }

            for (label, charge) in [
                ("daily_charge", record.daily_charge),
                ("monthly_charge", record.monthly_charge),
            ] {
                if !charge.is_finite() || charge < 0.0 {
                    return Err(CoreError::Config(format!(
                        "Tariff {} has invalid {}: {}",
                        record.tariff_id, label, charge
                    )));
                }
            }

            if !seen.insert(record.tariff_id.as_str()) {
                return Err(CoreError::Config(format!(
                    "Duplicate tariff id: {}",
                    record.tariff_id
                )));
            }
        }

        Ok(Self {
            index: index_of(&records),
            records,
        })
    }

    /// Parse a catalog from a JSON array of records
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let records: Vec<TariffRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!("Loaded {} tariffs from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn get(&self, tariff_id: &str) -> Option<&TariffRecord> {
        self.index.get(tariff_id).map(|&position| &self.records[position])
    }

    pub(crate) fn position(&self, tariff_id: &str) -> Option<usize> {
        self.index.get(tariff_id).copied()
    }

    pub fn records(&self) -> &[TariffRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for TariffCatalog {
    fn default() -> Self {
        let records = vec![
            TariffRecord {
                tariff_id: "TARIFF_BASIC".to_string(),
                name: "Basic Saver".to_string(),
                daily_charge: 0.52,
                monthly_charge: 15.99,
            },
            TariffRecord {
                tariff_id: "TARIFF_FLEX".to_string(),
                name: "Flexible Plus".to_string(),
                daily_charge: 0.68,
                monthly_charge: 21.49,
            },
        ];

        Self {
            index: index_of(&records),
            records,
        }
    }
}

fn index_of(records: &[TariffRecord]) -> HashMap<String, usize> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| (record.tariff_id.clone(), position))
        .collect()
}
