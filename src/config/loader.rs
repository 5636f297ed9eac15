//! Config loading for dynatail.
//!
//! Loads and validates YAML config files with path expansion, and resolves
//! live-mode credentials from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::discovery::DiscoveryResult;
use crate::config::error::{suggest, ConfigError, BASE_URL_VAR, TOKEN_VAR};
use crate::config::types::{Config, Credentials, RawConfig, KNOWN_FIELDS};
use crate::record::Column;
use crate::timerange::TimeRange;
use tracing::debug;

/// Expand tilde in path to home directory.
///
/// - `~/foo` -> `/home/user/foo`
/// - `/absolute/path` -> unchanged
/// - `relative/path` -> unchanged
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    path.to_path_buf()
}

/// Read and parse a YAML config file without semantic validation.
fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    // A file holding only comments is a valid, empty config.
    let has_content = content.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Ok(RawConfig::default());
    }

    serde_saphyr::from_str(&content)
        .map_err(|e| ConfigError::from_saphyr_error(path.to_path_buf(), e, KNOWN_FIELDS))
}

/// Load and validate a single config file.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = read_raw(path)?;
    validate(path, raw)
}

/// Load the effective config: the closest discovered file, or defaults
/// when none exists.
pub fn load(discovery: &DiscoveryResult) -> Result<Config, ConfigError> {
    match discovery.effective() {
        Some(path) => {
            debug!(path = %path.display(), "Loading config");
            load_file(path)
        }
        None => Ok(Config::default()),
    }
}

/// Non-fatal findings for `config validate`: values that load but are
/// silently replaced by defaults.
pub fn lint(path: &Path) -> Result<Vec<String>, ConfigError> {
    let raw = read_raw(path)?;
    let mut warnings = Vec::new();
    if let Some(token) = &raw.time_range {
        if !TimeRange::is_known_token(token) {
            let known: Vec<&str> = TimeRange::ALL.iter().map(|r| r.token()).collect();
            warnings.push(format!(
                "unknown time_range '{}', falling back to '{}'. Known ranges: {}",
                token,
                TimeRange::default().token(),
                known.join(", ")
            ));
        }
    }
    Ok(warnings)
}

fn validate(path: &Path, raw: RawConfig) -> Result<Config, ConfigError> {
    let invalid = |message: String| ConfigError::Validation {
        path: path.to_path_buf(),
        message,
    };

    let mut config = Config {
        source: Some(path.to_path_buf()),
        ..Config::default()
    };

    if let Some(titles) = raw.columns {
        if titles.is_empty() {
            return Err(invalid(
                "columns must list at least one column".to_string(),
            ));
        }
        config.columns = titles
            .iter()
            .map(|title| parse_column(title).map_err(&invalid))
            .collect::<Result<_, _>>()?;
    }

    if let Some(max) = raw.max_records {
        if max == 0 {
            return Err(invalid("max_records must be greater than zero".to_string()));
        }
        config.max_records = max;
    }

    if let Some(token) = raw.time_range {
        config.time_range = TimeRange::from_token(&token);
    }

    config.base_url = raw.base_url.and_then(|url| normalize_base_url(&url));

    if let Some(dir) = raw.data_dir {
        config.data_dir = Some(expand_path(&dir));
    }

    Ok(config)
}

fn parse_column(title: &str) -> Result<Column, String> {
    Column::from_title(title).ok_or_else(|| {
        let mut message = format!("unknown column '{}'", title);
        if let Some(s) = suggest(title, Column::ALL.iter().map(|c| c.title())) {
            message.push_str(&format!(". Did you mean '{}'?", s));
        }
        message
    })
}

fn normalize_base_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    (!url.is_empty()).then(|| url.to_string())
}

/// Resolve live-mode credentials.
///
/// `DYNATRACE_BASE_URL` overrides the config `base_url`; the token only
/// comes from `DYNATRACE_TOKEN`. Blank values count as missing.
pub fn resolve_credentials<F>(config: &Config, lookup: F) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = lookup(BASE_URL_VAR)
        .and_then(|url| normalize_base_url(&url))
        .or_else(|| config.base_url.clone());
    let token = lookup(TOKEN_VAR).filter(|t| !t.trim().is_empty());

    match (base_url, token) {
        (Some(base_url), Some(token)) => Ok(Credentials { base_url, token }),
        (base_url, token) => {
            let mut missing = Vec::new();
            if base_url.is_none() {
                missing.push(BASE_URL_VAR);
            }
            if token.is_none() {
                missing.push(TOKEN_VAR);
            }
            Err(ConfigError::MissingCredentials { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, content: &str) -> PathBuf {
        let path = temp.path().join("dynatail.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path(Path::new("~/dynatail"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("dynatail"));
        } else {
            assert_eq!(expanded.to_string_lossy(), "~/dynatail");
        }
    }

    #[test]
    fn test_expand_path_absolute_and_relative() {
        assert_eq!(expand_path(Path::new("/var/data")), PathBuf::from("/var/data"));
        assert_eq!(expand_path(Path::new("data")), PathBuf::from("data"));
    }

    #[test]
    fn test_load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
base_url: https://abc.apps.dynatrace.com/
time_range: 2h
max_records: 250
columns: [Timestamp, level, Trace ID]
data_dir: /tmp/dynatail-data
"#,
        );

        let config = load_file(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://abc.apps.dynatrace.com"));
        assert_eq!(config.time_range, TimeRange::Last2Hours);
        assert_eq!(config.max_records, 250);
        assert_eq!(
            config.columns,
            vec![Column::Timestamp, Column::Level, Column::TraceId]
        );
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/dynatail-data")));
        assert_eq!(config.source, Some(path));
    }

    #[test]
    fn test_comment_only_file_is_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "# nothing here\n\n");
        let config = load_file(&path).unwrap();
        assert_eq!(config.columns, Column::DEFAULT_VISIBLE.to_vec());
        assert_eq!(config.max_records, crate::api::DEFAULT_MAX_RECORDS);
    }

    #[test]
    fn test_unknown_field_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "max_record: 5\n");
        let err = load_file(&path).unwrap_err();
        let display = err.to_string();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(display.contains(&path.to_string_lossy().to_string()));
        assert!(display.contains("max_record"));
    }

    #[test]
    fn test_empty_columns_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "columns: []\n");
        assert!(matches!(
            load_file(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_column_suggests() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "columns: [Mesage]\n");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Did you mean 'Message'?"));
    }

    #[test]
    fn test_zero_max_records_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "max_records: 0\n");
        assert!(matches!(
            load_file(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_unknown_time_range_is_permissive_but_linted() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "time_range: fortnight\n");
        assert_eq!(load_file(&path).unwrap().time_range, TimeRange::Last30Minutes);
        let warnings = lint(&path).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("fortnight"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let nonexistent = temp.path().join("nonexistent.yaml");
        match load_file(&nonexistent).unwrap_err() {
            ConfigError::Io { path, .. } => assert_eq!(path, nonexistent),
            e => panic!("Expected Io error, got: {:?}", e),
        }
    }

    #[test]
    fn test_load_without_config_uses_defaults() {
        let config = load(&DiscoveryResult::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_credentials_from_env() {
        let creds = resolve_credentials(
            &Config::default(),
            env(&[
                (BASE_URL_VAR, "https://env.apps.dynatrace.com/"),
                (TOKEN_VAR, "dt0s16.abc"),
            ]),
        )
        .unwrap();
        assert_eq!(creds.base_url, "https://env.apps.dynatrace.com");
        assert_eq!(creds.token, "dt0s16.abc");
        assert!(!format!("{:?}", creds).contains("dt0s16"));
    }

    #[test]
    fn test_env_base_url_overrides_config() {
        let config = Config {
            base_url: Some("https://config.example".into()),
            ..Config::default()
        };
        let creds =
            resolve_credentials(&config, env(&[(TOKEN_VAR, "t")])).unwrap();
        assert_eq!(creds.base_url, "https://config.example");

        let creds = resolve_credentials(
            &config,
            env(&[(BASE_URL_VAR, "https://env.example"), (TOKEN_VAR, "t")]),
        )
        .unwrap();
        assert_eq!(creds.base_url, "https://env.example");
    }

    #[test]
    fn test_missing_credentials_reported() {
        match resolve_credentials(&Config::default(), env(&[(TOKEN_VAR, "  ")])) {
            Err(ConfigError::MissingCredentials { missing }) => {
                assert_eq!(missing, vec![BASE_URL_VAR, TOKEN_VAR]);
            }
            other => panic!("Expected MissingCredentials, got: {:?}", other),
        }
    }
}
