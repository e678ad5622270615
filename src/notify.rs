/// Chat webhook notifications.
///
/// A surge notification is two messages posted to the same incoming webhook:
/// first a one-line header, then the markdown table. Each body is
/// `{"Content": "<text>"}`.
///
/// Both posts are checked. A failed header post does not stop the table post,
/// and any failure is reported as one `NotificationError` that names which
/// post(s) failed.

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{NotificationError, SurgeError};

/// Destination for a rendered surge report.
pub trait Notifier {
    fn send(&self, header: &str, table: &str) -> Result<(), NotificationError>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(rename = "Content")]
    content: &'a str,
}

/// Posts to a Chime-style incoming webhook. Any auth token lives in the URL.
pub struct WebhookNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, SurgeError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| SurgeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Sends one message. Anything but HTTP 200 counts as a failure.
    fn post(&self, content: &str) -> Result<(), String> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content })
            .send()
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Webhook responded");

        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(format!("status code {}", status.as_u16()))
        }
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, header: &str, table: &str) -> Result<(), NotificationError> {
        let header_result = self.post(header);
        if let Err(reason) = &header_result {
            warn!(reason = %reason, "Header post failed; still sending table");
        }

        let table_result = self.post(table);

        match (header_result.err(), table_result.err()) {
            (None, None) => Ok(()),
            (header, table) => Err(NotificationError { header, table }),
        }
    }
}

/// Prints the report to stdout instead of posting it (`--dry-run`).
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send(&self, header: &str, table: &str) -> Result<(), NotificationError> {
        print!("{}", header);
        print!("{}", table);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
