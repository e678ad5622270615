/// Unfilled-station selection.
///
/// A snapshot row is reported when all three hold:
///   - its station id carries the business type's prefix
///   - its rounded lead time equals the threshold exactly
///   - its fill is strictly below 1.0
///
/// A full block (fill == 1.0) is never reported. NaN fills never compare
/// below 1.0, so rows with no fill value drop out as well.

use crate::model::{BusinessType, FillRecord};

/// Selects the unfilled rows for one business type at one lead-time bucket,
/// in snapshot order. An empty result is a normal outcome, not an error.
pub fn filter_unfilled<'a>(
    records: &'a [FillRecord],
    business_type: BusinessType,
    threshold: i64,
) -> Vec<&'a FillRecord> {
    let prefix = business_type.station_prefix();
    records
        .iter()
        .filter(|r| r.station.starts_with(prefix))
        .filter(|r| r.rounded_block_eta == Some(threshold))
        .filter(|r| r.fill < 1.0)
        .collect()
}
