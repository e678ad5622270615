//! Surge Notifier - single-shot run
//!
//! Reads the station RAG/surge config and the live fill snapshot, finds
//! stations still unfilled at the lead-time threshold, prices them by risk
//! tier and posts the table to the chat webhook.
//!
//! Usage:
//!   cargo run --release                              # settings from surge.toml / env
//!   cargo run --release -- --config prod.toml
//!   cargo run --release -- --threshold 120 --business-type core
//!   cargo run --release -- --dry-run                 # print instead of posting
//!
//! Environment:
//!   SURGE_CONFIG_URI, SURGE_FILL_URI, SURGE_THRESHOLD, SURGE_BUSINESS_TYPE,
//!   SURGE_WEBHOOK_URL, SURGE_HEADER, SURGE_S3_ENDPOINT - override surge.toml
//!   RUST_LOG - log filter (default: info)

use std::env;
use std::path::PathBuf;
use std::process;

use surge_notifier::config::{self, CliOverrides, Settings};
use surge_notifier::error::SurgeError;
use surge_notifier::logging;
use surge_notifier::notify::{ConsoleNotifier, Notifier, WebhookNotifier};
use surge_notifier::pipeline;
use surge_notifier::storage::{RoutingStore, S3Store};
use tracing::error;

const USAGE: &str =
    "[--config PATH] [--threshold N] [--business-type ssd|core] [--dry-run] [--verbose]";

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut overrides = CliOverrides::default();
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(flag_value(&args, i)));
                i += 2;
            }
            "--threshold" => {
                let raw = flag_value(&args, i);
                match raw.parse() {
                    Ok(n) => overrides.threshold = Some(n),
                    Err(_) => {
                        eprintln!("Error: --threshold expects an integer, got '{}'", raw);
                        process::exit(1);
                    }
                }
                i += 2;
            }
            "--business-type" => {
                overrides.business_type = Some(flag_value(&args, i).to_string());
                i += 2;
            }
            "--dry-run" => {
                overrides.dry_run = true;
                i += 1;
            }
            "--verbose" | "-v" => {
                verbose = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} {}", args[0], USAGE);
                process::exit(1);
            }
        }
    }

    logging::init(verbose);

    println!("Surge Notifier");
    println!("==============\n");

    let settings = match config::load_settings(config_path.as_deref(), &overrides) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    println!("   Business type: {}", settings.business_type);
    println!("   Lead-time threshold: {}", settings.threshold);
    println!("   Config: {}", settings.config_location);
    println!("   Fill:   {}\n", settings.fill_location);

    if let Err(e) = execute(&settings) {
        error!("{}", e);
        process::exit(1);
    }
}

/// Builds the store and notifier the settings call for, then runs once.
fn execute(settings: &Settings) -> Result<(), SurgeError> {
    let s3 = if settings.needs_s3() {
        Some(S3Store::connect(settings.s3_endpoint.as_deref())?)
    } else {
        None
    };
    let store = RoutingStore::new(s3);

    let notifier: Box<dyn Notifier> = match (&settings.webhook_url, settings.dry_run) {
        (_, true) => Box::new(ConsoleNotifier),
        (Some(url), false) => Box::new(WebhookNotifier::new(url.as_str())?),
        (None, false) => {
            return Err(SurgeError::Config("Missing setting 'webhook_url'".to_string()));
        }
    };

    pipeline::run(settings, &store, notifier.as_ref())?;
    Ok(())
}

/// Returns the value following flag `args[i]`, exiting if it is missing.
fn flag_value(args: &[String], i: usize) -> &str {
    match args.get(i + 1) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("Error: {} requires a value", args[i]);
            process::exit(1);
        }
    }
}
