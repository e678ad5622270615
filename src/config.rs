/// Run settings loader - parses surge.toml, then applies environment and
/// command-line overrides.
///
/// Keeps bucket URIs, the lead-time threshold and the webhook out of the
/// code. Everything the pipeline needs arrives through `Settings`; the
/// pipeline itself never reads process state.
///
/// Precedence (highest first): CLI flags, `SURGE_*` environment variables
/// (a `.env` file is honoured), `surge.toml`.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::SurgeError;
use crate::model::BusinessType;
use crate::storage::ObjectLocation;

pub const DEFAULT_SETTINGS_PATH: &str = "surge.toml";

pub const DEFAULT_HEADER: &str = "Summary of the currently unfilled SSD-D blocks:\n";

/// Raw settings as written in surge.toml. Every key is optional here so that
/// the environment can supply what the file leaves out.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub config_uri: Option<String>,
    pub fill_uri: Option<String>,
    pub threshold: Option<i64>,
    pub business_type: Option<String>,
    pub webhook_url: Option<String>,
    pub header: Option<String>,
    pub s3_endpoint: Option<String>,
}

/// Overrides taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub threshold: Option<i64>,
    pub business_type: Option<String>,
    pub dry_run: bool,
}

/// Fully resolved, validated settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_location: ObjectLocation,
    pub fill_location: ObjectLocation,
    /// Lead-time bucket to report on; compared exactly against `rounded_block_eta`.
    pub threshold: i64,
    pub business_type: BusinessType,
    /// Required unless `dry_run` is set.
    pub webhook_url: Option<String>,
    pub header: String,
    pub s3_endpoint: Option<String>,
    pub dry_run: bool,
}

impl Settings {
    /// Merges file values, environment lookups and CLI overrides, then
    /// validates the result.
    ///
    /// `lookup_env` is injected so tests don't have to mutate the process
    /// environment.
    pub fn resolve<F>(
        file: SettingsFile,
        lookup_env: F,
        cli: &CliOverrides,
    ) -> Result<Self, SurgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_uri = lookup_env("SURGE_CONFIG_URI")
            .or(file.config_uri)
            .ok_or_else(|| missing("config_uri", "SURGE_CONFIG_URI"))?;

        let fill_uri = lookup_env("SURGE_FILL_URI")
            .or(file.fill_uri)
            .ok_or_else(|| missing("fill_uri", "SURGE_FILL_URI"))?;

        let env_threshold = lookup_env("SURGE_THRESHOLD")
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|e| {
                    SurgeError::Config(format!("Invalid SURGE_THRESHOLD '{}': {}", raw, e))
                })
            })
            .transpose()?;
        let threshold = cli
            .threshold
            .or(env_threshold)
            .or(file.threshold)
            .ok_or_else(|| missing("threshold", "SURGE_THRESHOLD"))?;

        let business_type: BusinessType = cli
            .business_type
            .clone()
            .or_else(|| lookup_env("SURGE_BUSINESS_TYPE"))
            .or(file.business_type)
            .ok_or_else(|| missing("business_type", "SURGE_BUSINESS_TYPE"))?
            .parse()?;

        let webhook_url = lookup_env("SURGE_WEBHOOK_URL")
            .or(file.webhook_url)
            .filter(|url| !url.trim().is_empty());
        if webhook_url.is_none() && !cli.dry_run {
            return Err(missing("webhook_url", "SURGE_WEBHOOK_URL"));
        }

        let s3_endpoint = lookup_env("SURGE_S3_ENDPOINT").or(file.s3_endpoint);

        Ok(Settings {
            config_location: ObjectLocation::parse(&config_uri)?,
            fill_location: ObjectLocation::parse(&fill_uri)?,
            threshold,
            business_type,
            webhook_url,
            header: lookup_env("SURGE_HEADER")
                .or(file.header)
                .unwrap_or_else(|| DEFAULT_HEADER.to_string()),
            s3_endpoint,
            dry_run: cli.dry_run,
        })
    }

    /// True when either document lives in S3 and an S3 client is needed.
    pub fn needs_s3(&self) -> bool {
        matches!(self.config_location, ObjectLocation::S3 { .. })
            || matches!(self.fill_location, ObjectLocation::S3 { .. })
    }
}

fn missing(key: &str, env_key: &str) -> SurgeError {
    SurgeError::Config(format!(
        "Missing setting '{}' (set it in {} or via {})",
        key, DEFAULT_SETTINGS_PATH, env_key
    ))
}

/// Parses a settings file.
pub fn read_settings_file(path: &Path) -> Result<SettingsFile, SurgeError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| SurgeError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    toml::from_str(&contents)
        .map_err(|e| SurgeError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Loads settings for a run.
///
/// An explicit `path` must exist. Without one, `surge.toml` in the working
/// directory is used if present, otherwise everything comes from the
/// environment.
pub fn load_settings(path: Option<&Path>, cli: &CliOverrides) -> Result<Settings, SurgeError> {
    dotenv::dotenv().ok();

    let file = match path {
        Some(p) => read_settings_file(p)?,
        None => {
            let default = Path::new(DEFAULT_SETTINGS_PATH);
            if default.exists() {
                read_settings_file(default)?
            } else {
                SettingsFile::default()
            }
        }
    };

    Settings::resolve(file, |key| env::var(key).ok(), cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE_TOML: &str = r#"
config_uri = "s3://surge-config/rag/config.json"
fill_uri = "s3://surge-fill/live/fill.parquet"
threshold = 60
business_type = "ssd"
webhook_url = "https://hooks.chime.aws/incomingwebhooks/abc?token=xyz"
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn sample_file() -> SettingsFile {
        toml::from_str(SAMPLE_TOML).expect("sample settings should parse")
    }

    #[test]
    fn test_resolve_from_file_only() {
        let settings = Settings::resolve(sample_file(), no_env, &CliOverrides::default()).unwrap();

        assert_eq!(settings.threshold, 60);
        assert_eq!(settings.business_type, BusinessType::Ssd);
        assert_eq!(
            settings.config_location,
            ObjectLocation::S3 {
                bucket: "surge-config".to_string(),
                key: "rag/config.json".to_string(),
            }
        );
        assert_eq!(settings.header, DEFAULT_HEADER);
        assert!(settings.needs_s3());
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SURGE_THRESHOLD", "120"),
            ("SURGE_BUSINESS_TYPE", "core"),
            ("SURGE_FILL_URI", "file:///tmp/fill.parquet"),
        ]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let from_env = Settings::resolve(sample_file(), lookup, &CliOverrides::default()).unwrap();
        assert_eq!(from_env.threshold, 120);
        assert_eq!(from_env.business_type, BusinessType::Core);
        assert_eq!(
            from_env.fill_location,
            ObjectLocation::Local("/tmp/fill.parquet".into())
        );

        let cli = CliOverrides {
            threshold: Some(30),
            business_type: Some("ssd".to_string()),
            dry_run: false,
        };
        let from_cli = Settings::resolve(sample_file(), lookup, &cli).unwrap();
        assert_eq!(from_cli.threshold, 30);
        assert_eq!(from_cli.business_type, BusinessType::Ssd);
    }

    #[test]
    fn test_missing_webhook_allowed_only_for_dry_run() {
        let mut file = sample_file();
        file.webhook_url = None;

        let result = Settings::resolve(file.clone(), no_env, &CliOverrides::default());
        assert!(matches!(result, Err(SurgeError::Config(_))));

        let dry = CliOverrides {
            dry_run: true,
            ..CliOverrides::default()
        };
        let settings = Settings::resolve(file, no_env, &dry).unwrap();
        assert!(settings.webhook_url.is_none());
        assert!(settings.dry_run);
    }

    #[test]
    fn test_invalid_env_threshold_is_config_error() {
        let lookup = |key: &str| (key == "SURGE_THRESHOLD").then(|| "sixty".to_string());
        let result = Settings::resolve(sample_file(), lookup, &CliOverrides::default());
        assert!(matches!(result, Err(SurgeError::Config(_))));
    }

    #[test]
    fn test_unknown_business_type_is_rejected() {
        let mut file = sample_file();
        file.business_type = Some("freight".to_string());
        let result = Settings::resolve(file, no_env, &CliOverrides::default());
        assert!(matches!(result, Err(SurgeError::Config(_))));
    }

    #[test]
    fn test_unknown_toml_key_is_rejected() {
        let result: Result<SettingsFile, _> = toml::from_str("thresold = 60\n");
        assert!(result.is_err(), "typo'd keys should not be silently ignored");
    }

    #[test]
    fn test_custom_header_is_kept() {
        let mut file = sample_file();
        file.header = Some("Unfilled core blocks:\n".to_string());
        let settings = Settings::resolve(file, no_env, &CliOverrides::default()).unwrap();
        assert_eq!(settings.header, "Unfilled core blocks:\n");
    }

    #[test]
    fn test_header_env_overrides_file() {
        let mut file = sample_file();
        file.header = Some("Unfilled core blocks:\n".to_string());
        let lookup = |key: &str| (key == "SURGE_HEADER").then(|| "Surge now:\n".to_string());
        let settings = Settings::resolve(file, lookup, &CliOverrides::default()).unwrap();
        assert_eq!(settings.header, "Surge now:\n");
    }
}
