/// Station RAG status + surge price configuration document.
///
/// Expected JSON shape:
///
/// ```json
/// {
///   "rag_status": { "green": ["V001"], "amber": ["V002"], "red": ["V003"] },
///   "surge": {
///     "ssd":  { "green": 5, "amber": 8, "red": 12.5 },
///     "core": { "green": 3, "amber": 6, "red": 9 }
///   }
/// }
/// ```
///
/// Tier lists and tier prices may be left out. A missing list is empty and a
/// missing price means that tier gets no surge.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::SurgeError;
use crate::model::{BusinessType, RiskTier};

const CONFIG_SOURCE: &str = "surge config";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RagStatus {
    #[serde(default)]
    pub green: Vec<String>,
    #[serde(default)]
    pub amber: Vec<String>,
    #[serde(default)]
    pub red: Vec<String>,
}

impl RagStatus {
    pub fn stations(&self, tier: RiskTier) -> &[String] {
        match tier {
            RiskTier::Green => &self.green,
            RiskTier::Amber => &self.amber,
            RiskTier::Red => &self.red,
        }
    }
}

/// Surge price per tier for one business type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TierPrices {
    pub green: Option<Decimal>,
    pub amber: Option<Decimal>,
    pub red: Option<Decimal>,
}

impl TierPrices {
    pub fn price(&self, tier: RiskTier) -> Option<Decimal> {
        match tier {
            RiskTier::Green => self.green,
            RiskTier::Amber => self.amber,
            RiskTier::Red => self.red,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    pub rag_status: RagStatus,
    /// Keyed by business type tag ("ssd", "core").
    pub surge: HashMap<String, TierPrices>,
}

impl RagConfig {
    pub fn surge_table(&self, business_type: BusinessType) -> Option<&TierPrices> {
        self.surge.get(business_type.tag())
    }
}

/// Parses the configuration document.
///
/// # Errors
/// `SurgeError::Parse` if the bytes are not UTF-8 or not a JSON document of
/// the expected shape.
pub fn parse_config(data: &[u8]) -> Result<RagConfig, SurgeError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| SurgeError::parse(CONFIG_SOURCE, format!("not valid UTF-8: {}", e)))?;

    serde_json::from_str(text).map_err(|e| {
        SurgeError::parse(CONFIG_SOURCE, format!("JSON deserialization failed: {}", e))
    })
}
