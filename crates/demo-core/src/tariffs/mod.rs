//! Tariff catalog lookup
//!
//! Requests name zero or more tariff ids. Known ids resolve to their records in
//! catalog order; unknown ids are reported back as missing. Nothing in a
//! request is ever rejected.

pub mod catalog;

pub use catalog::TariffCatalog;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single tariff as served by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffRecord {
    pub tariff_id: String,
    pub name: String,
    pub daily_charge: f64,
    pub monthly_charge: f64,
}

/// Normalized set of requested tariff ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TariffQuery {
    /// `None` when the caller did not ask for specific ids
    ids: Option<Vec<String>>,
}

impl TariffQuery {
    /// Query for the full catalog
    pub fn all() -> Self {
        Self { ids: None }
    }

    /// Build a query from raw parameter values.
    ///
    /// Each value may itself be a comma-separated list. Tokens are trimmed and
    /// blanks dropped. No values, or a single empty one, means the caller did
    /// not ask for specific ids and the query matches the whole catalog.
    /// Anything else is specified, even if nothing survives normalization.
    pub fn parse<S: AsRef<str>>(raw_values: &[S]) -> Self {
        match raw_values {
            [] => return Self::all(),
            [only] if only.as_ref().is_empty() => return Self::all(),
            _ => {}
        }

        let ids = raw_values
            .iter()
            .flat_map(|value| value.as_ref().split(','))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        Self { ids: Some(ids) }
    }

    pub fn is_unspecified(&self) -> bool {
        self.ids.is_none()
    }

    /// Normalized ids in request order, duplicates included
    pub fn ids(&self) -> &[String] {
        self.ids.as_deref().unwrap_or_default()
    }

    /// Resolve this query against a catalog
    pub fn resolve(&self, catalog: &TariffCatalog) -> TariffQueryResult {
        let Some(ids) = &self.ids else {
            return TariffQueryResult {
                tariffs: catalog.records().to_vec(),
                missing_ids: Vec::new(),
            };
        };

        let mut matched = vec![false; catalog.len()];
        let mut seen_missing = HashSet::new();
        let mut missing_ids = Vec::new();

        for id in ids {
            match catalog.position(id) {
                Some(position) => matched[position] = true,
                None => {
                    if seen_missing.insert(id.as_str()) {
                        missing_ids.push(id.clone());
                    }
                }
            }
        }

        let tariffs = catalog
            .records()
            .iter()
            .zip(matched)
            .filter_map(|(record, hit)| hit.then(|| record.clone()))
            .collect();

        TariffQueryResult {
            tariffs,
            missing_ids,
        }
    }
}

/// Lookup result, serialized as the endpoint's response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffQueryResult {
    pub tariffs: Vec<TariffRecord>,
    pub missing_ids: Vec<String>,
}

/// Filter the catalog by the requested ids
pub fn filter<S: AsRef<str>>(catalog: &TariffCatalog, requested_ids: &[S]) -> TariffQueryResult {
    TariffQuery::parse(requested_ids).resolve(catalog)
}
