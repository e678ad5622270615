/// surge_notifier: unfilled delivery-block surge pricing notifications.
///
/// # Module structure
///
/// ```text
/// surge_notifier
/// ├── config      — run settings (surge.toml + SURGE_* env + CLI overrides)
/// ├── error       — SurgeError taxonomy (config, storage, parse, notification)
/// ├── model       — shared types (BusinessType, RiskTier, FillRecord)
/// ├── storage     — object fetch: S3 (aws-sdk-s3) or local files
/// ├── ingest
/// │   ├── rag     — RAG status + surge price JSON config
/// │   ├── fill    — Parquet fill snapshot decoder
/// │   └── fixtures (test only) — sample configs and in-memory snapshots
/// ├── analysis
/// │   ├── filter  — unfilled stations at the lead-time threshold
/// │   └── surge   — station → tier → price
/// ├── report      — markdown table for the chat message
/// ├── notify      — webhook (and dry-run console) notifier
/// ├── pipeline    — one sequential run: fetch → filter → price → render → notify
/// └── logging     — tracing subscriber setup
/// ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod storage;
