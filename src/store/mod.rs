pub mod sample;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerStatus {
    Active,
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
    #[serde(rename = "Non-functional")]
    NonFunctional,
}

impl TowerStatus {
    pub const ALL: [TowerStatus; 3] = [
        TowerStatus::Active,
        TowerStatus::UnderMaintenance,
        TowerStatus::NonFunctional,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::UnderMaintenance => "Under Maintenance",
            Self::NonFunctional => "Non-functional",
        }
    }

    /// Exact, case-sensitive label lookup.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == value)
    }
}

impl fmt::Display for TowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerType {
    #[serde(rename = "SST")]
    Sst,
    Monopole,
    #[serde(rename = "TPL")]
    Tpl,
    #[serde(rename = "GBT")]
    Gbt,
    #[serde(rename = "RTT")]
    Rtt,
}

impl TowerType {
    pub const ALL: [TowerType; 5] = [
        TowerType::Sst,
        TowerType::Monopole,
        TowerType::Tpl,
        TowerType::Gbt,
        TowerType::Rtt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sst => "SST",
            Self::Monopole => "Monopole",
            Self::Tpl => "TPL",
            Self::Gbt => "GBT",
            Self::Rtt => "RTT",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == value)
    }
}

impl fmt::Display for TowerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Last maintenance date as written in the dataset. The raw text is always kept for
/// display; `date` is `None` when the text is not an ISO `YYYY-MM-DD` date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaintenanceDate {
    raw: String,
    date: Option<NaiveDate>,
}

impl MaintenanceDate {
    pub fn parse(raw: &str) -> Self {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
        Self {
            raw: raw.to_string(),
            date,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl fmt::Display for MaintenanceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for MaintenanceDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for MaintenanceDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerRecord {
    pub id: String,
    pub city: String,
    #[serde(rename = "type")]
    pub tower_type: TowerType,
    pub antennas: u32,
    pub status: TowerStatus,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "lastMaint")]
    pub last_maint: MaintenanceDate,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate tower id: {id}")]
    DuplicateId { id: String },

    #[error("failed to read dataset: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON dataset: {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML dataset: {path}: {source}")]
    ParseYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported dataset extension for {path} (expected .json, .yml or .yaml)")]
    UnsupportedFormat { path: String },
}

fn first_duplicate_id(records: &[TowerRecord]) -> Option<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    records
        .iter()
        .find(|r| !seen.insert(r.id.as_str()))
        .map(|r| r.id.clone())
}

/// The immutable tower inventory. Records are only reachable through shared borrows, so
/// every filtered view is a derived view over the same loaded data.
#[derive(Clone, Debug)]
pub struct TowerStore {
    records: Vec<TowerRecord>,
}

impl TowerStore {
    pub fn from_records(records: Vec<TowerRecord>) -> Result<Self, StoreError> {
        if let Some(id) = first_duplicate_id(&records) {
            return Err(StoreError::DuplicateId { id });
        }
        Ok(Self { records })
    }

    pub fn sample() -> Self {
        Self {
            records: sample::towers(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let shown = path.display().to_string();
        let lower = shown.to_lowercase();
        let is_json = lower.ends_with(".json");
        if !is_json && !lower.ends_with(".yml") && !lower.ends_with(".yaml") {
            return Err(StoreError::UnsupportedFormat { path: shown });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: shown.clone(),
            source: e,
        })?;
        let records: Vec<TowerRecord> = if is_json {
            serde_json::from_str(&contents).map_err(|e| StoreError::ParseJson {
                path: shown.clone(),
                source: e,
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| StoreError::ParseYaml {
                path: shown.clone(),
                source: e,
            })?
        };
        tracing::info!(path = %shown, towers = records.len(), "loaded tower dataset");
        Self::from_records(records)
    }

    pub fn records(&self) -> &[TowerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TowerRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}
