/// Joining the fill snapshot with the RAG config.
///
/// Submodules:
/// - `filter` — selects unfilled stations for a business type and lead time.
/// - `surge`  — resolves each selected station's surge price via its tier.

pub mod filter;
pub mod surge;
