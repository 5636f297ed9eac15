//! Config types for dynatail.

use crate::api::DEFAULT_MAX_RECORDS;
use crate::record::Column;
use crate::timerange::TimeRange;
use serde::Deserialize;
use std::path::PathBuf;

/// Keys accepted in a config file, used for typo suggestions.
pub const KNOWN_FIELDS: &[&str] = &["base_url", "time_range", "max_records", "columns", "data_dir"];

/// Raw config file structure, mirroring the YAML. Unknown fields are
/// rejected with an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Dynatrace environment URL; `DYNATRACE_BASE_URL` takes precedence.
    pub base_url: Option<String>,
    /// Initial time range token (`30m`, `2h`, `yesterday`, ...).
    pub time_range: Option<String>,
    /// Maximum records requested per query.
    pub max_records: Option<usize>,
    /// Initially visible columns, by display title.
    pub columns: Option<Vec<String>>,
    /// Directory for saved queries and history (may contain tilde).
    pub data_dir: Option<PathBuf>,
}

/// Validated, effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub time_range: TimeRange,
    pub max_records: usize,
    pub columns: Vec<Column>,
    pub data_dir: Option<PathBuf>,
    /// File this config was read from; `None` means built-in defaults.
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            time_range: TimeRange::default(),
            max_records: DEFAULT_MAX_RECORDS,
            columns: Column::DEFAULT_VISIBLE.to_vec(),
            data_dir: super::discovery::global_config_dir(),
            source: None,
        }
    }
}

/// Endpoint and token for live mode.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}
