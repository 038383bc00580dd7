//! Status Snapshot
//!
//! Flat, encoding-independent record of a society status, used to load the
//! initial state of a run and to persist the final one.
//!
//! # Example
//!
//! ```
//! use society_records::StatusSnapshot;
//!
//! let snapshot = StatusSnapshot {
//!     population: 100,
//!     technology: 0.5,
//!     ..StatusSnapshot::default()
//! };
//! let json = snapshot.to_json_pretty().unwrap();
//! assert_eq!(StatusSnapshot::from_json(&json).unwrap(), snapshot);
//! ```

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::RecordError;

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: &str = "0.2";

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

/// Persisted society status.
///
/// Preference fields are raw log-preferences; only their differences within
/// each group are meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default = "default_version")]
    pub version: String,
    pub population: i64,
    pub farmer_prefs: f64,
    pub researcher_prefs: f64,
    pub educator_prefs: f64,
    pub doctor_prefs: f64,
    pub inactive_prefs: f64,
    pub food_prefs: f64,
    pub research_prefs: f64,
    pub education_prefs: f64,
    pub health_prefs: f64,
    pub settlement_prefs: f64,
    pub technology: f64,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            version: default_version(),
            population: 0,
            farmer_prefs: 0.0,
            researcher_prefs: 0.0,
            educator_prefs: 0.0,
            doctor_prefs: 0.0,
            inactive_prefs: 0.0,
            food_prefs: 0.0,
            research_prefs: 0.0,
            education_prefs: 0.0,
            health_prefs: 0.0,
            settlement_prefs: 0.0,
            technology: 0.0,
        }
    }
}

impl StatusSnapshot {
    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, rejecting snapshots of another format version.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Writes the snapshot as pretty JSON, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    fn check_version(&self) -> Result<(), RecordError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(RecordError::UnsupportedVersion {
                found: self.version.clone(),
                expected: SNAPSHOT_VERSION,
            })
        }
    }
}
