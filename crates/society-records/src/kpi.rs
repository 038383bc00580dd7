//! KPI Records
//!
//! A KPI record is the flat set of named indicators produced by one simulation
//! step: every rule contributes its own keys, plus the observables of the
//! status the step started from.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Raised when two contributions to a record carry the same indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicate KPI key {0:?}")]
pub struct DuplicateKpiKey(pub &'static str);

/// Named numeric indicators for a single step.
///
/// Counts (deaths, births) are stored as `f64` like every other indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KpiRecord {
    values: BTreeMap<&'static str, f64>,
}

impl KpiRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &'static str, value: f64) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Inserts an indicator, returning the previous value if the key was present.
    pub fn insert(&mut self, key: &'static str, value: f64) -> Option<f64> {
        self.values.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Indicator names in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Moves every indicator of `other` into this record.
    ///
    /// Fails on the first key already present; indicators merged before the
    /// conflicting one are kept.
    pub fn merge(&mut self, other: KpiRecord) -> Result<(), DuplicateKpiKey> {
        for (key, value) in other.values {
            if self.values.insert(key, value).is_some() {
                return Err(DuplicateKpiKey(key));
            }
        }
        Ok(())
    }
}

impl FromIterator<(&'static str, f64)> for KpiRecord {
    fn from_iter<T: IntoIterator<Item = (&'static str, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut kpi = KpiRecord::new();
        assert!(kpi.is_empty());
        assert_eq!(kpi.insert("population", 140.0), None);
        assert_eq!(kpi.insert("population", 139.0), Some(140.0));
        assert_eq!(kpi.get("population"), Some(139.0));
        assert_eq!(kpi.get("technology"), None);
        assert_eq!(kpi.len(), 1);
    }

    #[test]
    fn test_merge_disjoint() {
        let mut kpi = KpiRecord::new().with("population", 10.0);
        kpi.merge(KpiRecord::new().with("deathsO", -2.0).with("lambdaO", 1.5))
            .unwrap();
        assert_eq!(kpi.keys().collect::<Vec<_>>(), vec!["deathsO", "lambdaO", "population"]);
    }

    #[test]
    fn test_merge_reports_duplicate() {
        let mut kpi = KpiRecord::new().with("ke", 0.5);
        let err = kpi.merge(KpiRecord::new().with("ke", 0.7)).unwrap_err();
        assert_eq!(err, DuplicateKpiKey("ke"));
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let kpi: KpiRecord = [("births", 3.0), ("kf", 2.0)].into_iter().collect();
        let json = serde_json::to_string(&kpi).unwrap();
        assert_eq!(json, r#"{"births":3.0,"kf":2.0}"#);
    }
}
