//! Raw material models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A raw material used to sew clothes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    pub name: String,
    pub color_code: String,
    /// Unique material code, also used to key storage lots
    pub code: String,
    /// Measurement unit (e.g. "m", "pcs", "spool")
    pub measurement: String,
    /// Image reference, opaque to this crate
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kinds of raw material the workshop stocks
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Fabric,
    Button,
    Thread,
    Zipper,
}

impl MaterialType {
    pub const ALL: [MaterialType; 4] = [
        MaterialType::Fabric,
        MaterialType::Button,
        MaterialType::Thread,
        MaterialType::Zipper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Fabric => "fabric",
            MaterialType::Button => "button",
            MaterialType::Thread => "thread",
            MaterialType::Zipper => "zipper",
        }
    }

    /// Wire names of every material type, in declaration order
    pub fn valid_types() -> Vec<&'static str> {
        Self::ALL.iter().map(MaterialType::as_str).collect()
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material type: {0}")]
pub struct UnknownMaterialType(pub String);

impl FromStr for MaterialType {
    type Err = UnknownMaterialType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fabric" => Ok(MaterialType::Fabric),
            "button" => Ok(MaterialType::Button),
            "thread" => Ok(MaterialType::Thread),
            "zipper" => Ok(MaterialType::Zipper),
            other => Err(UnknownMaterialType(other.to_string())),
        }
    }
}

/// Material counts, total and per type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialStatistics {
    pub total: i64,
    pub by_type: BTreeMap<MaterialType, i64>,
}

impl MaterialStatistics {
    /// Build statistics from per-type counts; types with no rows report zero
    pub fn from_counts(counts: impl IntoIterator<Item = (MaterialType, i64)>) -> Self {
        let mut by_type: BTreeMap<MaterialType, i64> =
            MaterialType::ALL.iter().map(|t| (*t, 0)).collect();
        for (kind, count) in counts {
            *by_type.entry(kind).or_insert(0) += count;
        }
        let total = by_type.values().sum();
        Self { total, by_type }
    }
}

/// Filters accepted when listing materials
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialFilter {
    #[serde(rename = "type")]
    pub kind: Option<MaterialType>,
    pub search: Option<String>,
}

impl MaterialFilter {
    /// Drop blank search terms so `?search=` behaves like no filter
    pub fn normalized(self) -> Self {
        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            kind: self.kind,
            search,
        }
    }
}
