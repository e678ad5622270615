/// Shared data types for the surge notifier: business types, risk tiers and
/// fill snapshot rows.

use chrono::{NaiveDateTime, TimeDelta};
use std::fmt;
use std::str::FromStr;

use crate::error::SurgeError;

// ---------------------------------------------------------------------------
// Business types
// ---------------------------------------------------------------------------

/// Delivery business a run reports on. Each maps to exactly one station-id
/// prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessType {
    /// Same-day delivery stations, ids prefixed with "V".
    Ssd,
    /// Core delivery stations, ids prefixed with "D".
    Core,
}

impl BusinessType {
    pub const ALL: [BusinessType; 2] = [BusinessType::Ssd, BusinessType::Core];

    /// Tag used in settings and as the key of the config's `surge` table.
    pub fn tag(&self) -> &'static str {
        match self {
            BusinessType::Ssd => "ssd",
            BusinessType::Core => "core",
        }
    }

    pub fn station_prefix(&self) -> &'static str {
        match self {
            BusinessType::Ssd => "V",
            BusinessType::Core => "D",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BusinessType {
    type Err = SurgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusinessType::ALL
            .into_iter()
            .find(|bt| bt.tag() == s.trim())
            .ok_or_else(|| {
                SurgeError::Config(format!(
                    "Unknown business type '{}' (expected one of: ssd, core)",
                    s
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Risk tiers
// ---------------------------------------------------------------------------

/// Red/Amber/Green station risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskTier {
    Green,
    Amber,
    Red,
}

impl RiskTier {
    /// Lookup precedence when a station is listed under more than one tier.
    pub const PRECEDENCE: [RiskTier; 3] = [RiskTier::Green, RiskTier::Amber, RiskTier::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Green => "green",
            RiskTier::Amber => "amber",
            RiskTier::Red => "red",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fill snapshot rows
// ---------------------------------------------------------------------------

/// One row of the fill snapshot: a single scheduled block at one station.
#[derive(Debug, Clone, PartialEq)]
pub struct FillRecord {
    pub station: String,
    /// Wall-clock block start, in the zone the snapshot was written in.
    pub block_start: NaiveDateTime,
    pub duration_minutes: f64,
    /// Booked fraction of capacity. NaN when the snapshot had no value.
    pub fill: f64,
    /// Bucketed lead time to the block (e.g. 60 for T-60).
    pub rounded_block_eta: Option<i64>,
}

impl FillRecord {
    /// Block end time: start plus duration, to the millisecond. `None` when
    /// the duration is not finite or the end falls outside chrono's range.
    pub fn block_end(&self) -> Option<NaiveDateTime> {
        let millis = (self.duration_minutes * 60_000.0).round();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }
        let delta = TimeDelta::try_milliseconds(millis as i64)?;
        self.block_start.checked_add_signed(delta)
    }
}
