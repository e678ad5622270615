/// Object storage access for the two input documents.
///
/// Documents are addressed by URI:
///   - `s3://bucket/key/with/slashes` — fetched with the AWS SDK
///   - `file:///abs/path` or a bare path — read from local disk (dev runs, tests)
///
/// The AWS SDK is async; `S3Store` owns a current-thread tokio runtime and
/// blocks on each request so the rest of the service stays synchronous.

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::SurgeError;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectLocation {
    S3 { bucket: String, key: String },
    Local(PathBuf),
}

impl ObjectLocation {
    /// Parses a document URI.
    ///
    /// # Errors
    /// `SurgeError::Config` for an empty URI or an `s3://` URI missing its
    /// bucket or key.
    pub fn parse(uri: &str) -> Result<Self, SurgeError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(SurgeError::Config("Empty object URI".to_string()));
        }

        if let Some(rest) = uri.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() || key.is_empty() {
                return Err(SurgeError::Config(format!(
                    "Invalid S3 URI '{}' (expected s3://bucket/key)",
                    uri
                )));
            }
            return Ok(ObjectLocation::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        let path = uri.strip_prefix("file://").unwrap_or(uri);
        Ok(ObjectLocation::Local(PathBuf::from(path)))
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectLocation::S3 { bucket, key } => write!(f, "s3://{}/{}", bucket, key),
            ObjectLocation::Local(path) => write!(f, "file://{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Fetches the raw bytes of one document. No retries: the first failure is
/// returned to the caller.
pub trait ObjectStore {
    fn fetch(&self, location: &ObjectLocation) -> Result<Bytes, SurgeError>;
}

/// Reads documents from the local filesystem.
#[derive(Debug, Default)]
pub struct LocalStore;

impl ObjectStore for LocalStore {
    fn fetch(&self, location: &ObjectLocation) -> Result<Bytes, SurgeError> {
        match location {
            ObjectLocation::Local(path) => {
                debug!(location = %location, "Reading local object");
                fs::read(path)
                    .map(Bytes::from)
                    .map_err(|e| SurgeError::storage(location, e.to_string()))
            }
            ObjectLocation::S3 { .. } => Err(SurgeError::storage(
                location,
                "local store cannot read s3:// locations",
            )),
        }
    }
}

/// Reads documents from S3 (or an S3-compatible endpoint such as MinIO).
pub struct S3Store {
    runtime: tokio::runtime::Runtime,
    client: S3Client,
}

impl S3Store {
    /// Builds a client from the default AWS credential/region chain.
    /// `endpoint_url` overrides the service endpoint when set.
    pub fn connect(endpoint_url: Option<&str>) -> Result<Self, SurgeError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SurgeError::Config(format!("Failed to start S3 runtime: {}", e)))?;

        let sdk_config = runtime.block_on(async {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(url) = endpoint_url {
                loader = loader.endpoint_url(url);
            }
            loader.load().await
        });

        // Path-style addressing keeps custom endpoints (MinIO, LocalStack) working.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(endpoint_url.is_some())
            .build();

        Ok(Self {
            runtime,
            client: S3Client::from_conf(s3_config),
        })
    }
}

impl ObjectStore for S3Store {
    fn fetch(&self, location: &ObjectLocation) -> Result<Bytes, SurgeError> {
        let ObjectLocation::S3 { bucket, key } = location else {
            return Err(SurgeError::storage(
                location,
                "S3 store cannot read local locations",
            ));
        };

        debug!(location = %location, "Fetching S3 object");

        self.runtime.block_on(async {
            let response = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| SurgeError::storage(location, DisplayErrorContext(&e).to_string()))?;

            let data = response
                .body
                .collect()
                .await
                .map_err(|e| SurgeError::storage(location, e.to_string()))?;

            Ok::<Bytes, SurgeError>(data.into_bytes())
        })
    }
}

/// Dispatches each location to the backend matching its scheme. The S3
/// client is only built when an `s3://` location is configured.
pub struct RoutingStore {
    local: LocalStore,
    s3: Option<S3Store>,
}

impl RoutingStore {
    pub fn new(s3: Option<S3Store>) -> Self {
        Self { local: LocalStore, s3 }
    }
}

impl ObjectStore for RoutingStore {
    fn fetch(&self, location: &ObjectLocation) -> Result<Bytes, SurgeError> {
        match location {
            ObjectLocation::Local(_) => self.local.fetch(location),
            ObjectLocation::S3 { .. } => match &self.s3 {
                Some(s3) => s3.fetch(location),
                None => Err(SurgeError::storage(location, "no S3 client configured")),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
