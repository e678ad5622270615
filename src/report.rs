/// Markdown table rendering for the chat message.
///
/// Output shape (every line newline-terminated):
///
/// ```text
/// /md
/// | Station | EndTime | SuggestedPrice |
/// | --- | --- | --- |
/// | V001 | 10:30 | £5 |
/// ```
///
/// The leading `/md` line tells the chat client to render markdown.

use rust_decimal::Decimal;

use crate::analysis::surge::SurgeMap;
use crate::model::FillRecord;

pub const MARKDOWN_MARKER: &str = "/md";
pub const COLUMNS: [&str; 3] = ["Station", "EndTime", "SuggestedPrice"];
pub const CURRENCY: &str = "£";

/// Renders one table row per filtered station. Stations with no surge entry
/// show a zero price.
pub fn render_table(rows: &[&FillRecord], surge: &SurgeMap) -> String {
    let mut table = format!("{}\n", MARKDOWN_MARKER);
    table.push_str(&table_line(COLUMNS));
    table.push_str(&table_line(["---"; 3]));

    for row in rows {
        let end_time = row
            .block_end()
            .map(|end| end.format("%H:%M").to_string())
            .unwrap_or_default();
        let price = surge.get(&row.station).copied().unwrap_or(Decimal::ZERO);
        let price = format!("{}{}", CURRENCY, price.normalize());
        table.push_str(&table_line([row.station.as_str(), end_time.as_str(), price.as_str()]));
    }

    table
}

fn table_line<const N: usize>(cells: [&str; N]) -> String {
    format!("| {} |\n", cells.join(" | "))
}
