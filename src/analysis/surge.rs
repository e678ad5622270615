/// Surge price resolution: station → RAG tier → price.
///
/// Tiers are indexed once per run. A station listed under more than one tier
/// resolves to the first in green, amber, red order. Stations with no tier,
/// or whose tier has no price for the business type, get no surge entry.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::ingest::rag::{RagConfig, RagStatus};
use crate::model::{BusinessType, FillRecord, RiskTier};

/// Station id → surge price.
pub type SurgeMap = BTreeMap<String, Decimal>;

/// Station → tier lookup built from the config's membership lists.
#[derive(Debug, Default)]
pub struct TierIndex {
    tiers: HashMap<String, RiskTier>,
}

impl TierIndex {
    pub fn from_status(status: &RagStatus) -> Self {
        let mut tiers = HashMap::new();
        for tier in RiskTier::PRECEDENCE {
            for station in status.stations(tier) {
                tiers.entry(station.clone()).or_insert(tier);
            }
        }
        Self { tiers }
    }

    pub fn tier(&self, station: &str) -> Option<RiskTier> {
        self.tiers.get(station).copied()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Computes the surge price for each filtered station.
pub fn compute_surge(
    rows: &[&FillRecord],
    config: &RagConfig,
    business_type: BusinessType,
) -> SurgeMap {
    let index = TierIndex::from_status(&config.rag_status);
    let Some(prices) = config.surge_table(business_type) else {
        if !rows.is_empty() {
            warn!(business_type = %business_type, "No surge table for business type; no prices assigned");
        }
        return SurgeMap::new();
    };

    let mut surge = SurgeMap::new();
    for row in rows {
        let Some(tier) = index.tier(&row.station) else {
            debug!(station = %row.station, "Station has no RAG status; no surge");
            continue;
        };
        match prices.price(tier) {
            Some(price) => {
                surge.insert(row.station.clone(), price);
            }
            None => {
                warn!(station = %row.station, tier = %tier, "No surge price configured for tier");
            }
        }
    }

    surge
}
