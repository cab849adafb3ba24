use crate::normalize::NormalizeOptions;
use crate::stats::{DEFAULT_TOP_ARTISTS, DEFAULT_TOP_RELEASES};
use crate::types::{DEFAULT_COUNTRY, DEFAULT_LABEL_NAME, FALLBACK_GENRE};
use crate::validate::DEFAULT_TOLERANCE;
use crate::{CatalogError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`CatalogConfig::label_name`].
pub const ENV_LABEL_NAME: &str = "LABEL_CATALOG_NAME";
/// Environment variable overriding [`CatalogConfig::channel_url`].
pub const ENV_CHANNEL_URL: &str = "LABEL_CATALOG_CHANNEL_URL";
/// Environment variable overriding [`CatalogConfig::output_dir`].
pub const ENV_OUTPUT_DIR: &str = "LABEL_CATALOG_OUTPUT_DIR";

const DEFAULT_CHANNEL_URL: &str = "https://www.youtube.com/@worldstudiorecords";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for a catalog run.
///
/// Read from a JSON file in which every field is optional, then adjusted by
/// the `LABEL_CATALOG_*` environment variables. The default location is
/// `~/.config/label-catalog/config.json` (platform config directory).
///
/// ```rust
/// use label_catalog::config::CatalogConfig;
///
/// let config: CatalogConfig = serde_json::from_str(r#"{
///     "labelName": "Night Shift",
///     "bpmOverrides": { "dQw4w9WgXcQ": 113 }
/// }"#).unwrap();
///
/// assert_eq!(config.label_name, "Night Shift");
/// assert_eq!(config.top_releases, 8);
/// assert_eq!(config.bpm_overrides["dQw4w9WgXcQ"], 113);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogConfig {
    pub label_name: String,
    /// Channel root URL; the collector appends `/videos`
    pub channel_url: String,
    /// Directory the JSON documents are published into
    pub output_dir: PathBuf,
    pub fallback_genre: String,
    pub country: String,
    pub top_releases: usize,
    pub top_artists: usize,
    /// Accepted drift between stored and recomputed total streams
    pub consistency_tolerance: u64,
    /// Pause between per-video requests
    pub request_delay_ms: u64,
    pub user_agent: String,
    pub estimate_missing_durations: bool,
    /// Known tempos keyed by video id
    pub bpm_overrides: BTreeMap<String, u32>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            label_name: DEFAULT_LABEL_NAME.to_string(),
            channel_url: DEFAULT_CHANNEL_URL.to_string(),
            output_dir: PathBuf::from("."),
            fallback_genre: FALLBACK_GENRE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            top_releases: DEFAULT_TOP_RELEASES,
            top_artists: DEFAULT_TOP_ARTISTS,
            consistency_tolerance: DEFAULT_TOLERANCE,
            request_delay_ms: 500,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            estimate_missing_durations: false,
            bpm_overrides: BTreeMap::new(),
        }
    }
}

impl CatalogConfig {
    /// Platform location of the config file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            CatalogError::Config("Cannot determine config directory".to_string())
        })?;
        Ok(config_dir.join("label-catalog").join("config.json"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// tried, and a missing file there simply means defaults. Environment
    /// overrides are applied last in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Ok(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read a config file without applying environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = serde_json::from_str(&json).map_err(|e| {
            CatalogError::Config(format!("Failed to parse {}: {e}", path.display()))
        })?;
        log::debug!("Config loaded from: {}", path.display());
        Ok(config)
    }

    /// Apply `LABEL_CATALOG_*` variables that are set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(name) = lookup(ENV_LABEL_NAME) {
            self.label_name = name;
        }
        if let Some(url) = lookup(ENV_CHANNEL_URL) {
            self.channel_url = url;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
    }

    /// Normalizer settings for a run on `run_date`.
    pub fn normalize_options(&self, run_date: NaiveDate) -> NormalizeOptions {
        NormalizeOptions {
            label_name: self.label_name.clone(),
            run_date,
            fallback_genre: self.fallback_genre.clone(),
            country: self.country.clone(),
            bpm_overrides: self.bpm_overrides.clone(),
            estimate_missing_durations: self.estimate_missing_durations,
        }
    }

    /// The channel's video listing page.
    pub fn videos_url(&self) -> String {
        let base = self.channel_url.trim_end_matches('/');
        if base.ends_with("/videos") {
            base.to_string()
        } else {
            format!("{base}/videos")
        }
    }
}
