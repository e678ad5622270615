/// Input documents for a surge run.
///
/// Submodules:
/// - `rag`  — station RAG status + surge price config (JSON)
/// - `fill` — live fill snapshot (Parquet)

pub mod fill;
pub mod rag;

#[cfg(test)]
pub(crate) mod fixtures;
