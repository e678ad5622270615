/// One surge notification run.
///
/// Strictly sequential: config → fill → filter → surge → format → notify.
/// Storage and parse failures abort the run before anything is posted. A
/// notification failure is logged and reported in the outcome, but the run
/// itself still completes.

use tracing::{error, info};

use crate::analysis::filter::filter_unfilled;
use crate::analysis::surge::{SurgeMap, compute_surge};
use crate::config::Settings;
use crate::error::{NotificationError, SurgeError};
use crate::ingest::fill::parse_fill_snapshot;
use crate::ingest::rag::{RagConfig, parse_config};
use crate::model::FillRecord;
use crate::notify::Notifier;
use crate::report::render_table;
use crate::storage::{ObjectLocation, ObjectStore};

pub const NOTHING_TO_SEND: &str = "No surge notifications at the moment.";
pub const SENT: &str = "Chime message sent.";
pub const DRY_RUN: &str = "Dry run: message printed, not posted.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No unfilled stations; no message was posted.
    NothingToSend,
    /// Header and table were delivered.
    Sent,
    /// Dry run; header and table were printed instead of posted.
    DryRun,
    /// At least one post failed; details already logged.
    NotificationFailed(NotificationError),
}

/// What a run computed, for callers and tests.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stations: Vec<String>,
    pub surge: SurgeMap,
    pub table: String,
    pub outcome: RunOutcome,
}

pub fn fetch_config(store: &dyn ObjectStore, location: &ObjectLocation) -> Result<RagConfig, SurgeError> {
    let data = store.fetch(location)?;
    parse_config(&data)
}

pub fn fetch_fill(store: &dyn ObjectStore, location: &ObjectLocation) -> Result<Vec<FillRecord>, SurgeError> {
    let data = store.fetch(location)?;
    parse_fill_snapshot(data)
}

/// Executes one run with explicit settings.
pub fn run(
    settings: &Settings,
    store: &dyn ObjectStore,
    notifier: &dyn Notifier,
) -> Result<RunReport, SurgeError> {
    let config = fetch_config(store, &settings.config_location)?;
    info!(location = %settings.config_location, "Loaded surge config");

    let records = fetch_fill(store, &settings.fill_location)?;
    info!(location = %settings.fill_location, rows = records.len(), "Loaded fill snapshot");

    let unfilled = filter_unfilled(&records, settings.business_type, settings.threshold);
    info!(
        business_type = %settings.business_type,
        threshold = settings.threshold,
        stations = unfilled.len(),
        "Filtered unfilled stations"
    );

    let surge = compute_surge(&unfilled, &config, settings.business_type);
    let table = render_table(&unfilled, &surge);
    let stations: Vec<String> = unfilled.iter().map(|r| r.station.clone()).collect();

    let outcome = if unfilled.is_empty() {
        info!("{}", NOTHING_TO_SEND);
        RunOutcome::NothingToSend
    } else {
        match notifier.send(&settings.header, &table) {
            Ok(()) if settings.dry_run => {
                info!("{}", DRY_RUN);
                RunOutcome::DryRun
            }
            Ok(()) => {
                info!("{}", SENT);
                RunOutcome::Sent
            }
            Err(e) => {
                error!("{}", e);
                RunOutcome::NotificationFailed(e)
            }
        }
    };

    Ok(RunReport {
        stations,
        surge,
        table,
        outcome,
    })
}
