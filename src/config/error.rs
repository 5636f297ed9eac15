//! Config error types for dynatail.
//!
//! Provides rich error messages with file locations, typo suggestions and
//! a remediation block for missing credentials.

use std::fmt;
use std::path::PathBuf;
use strsim::jaro_winkler;

const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Environment variable holding the Dynatrace environment URL.
pub const BASE_URL_VAR: &str = "DYNATRACE_BASE_URL";

/// Environment variable holding the platform token.
pub const TOKEN_VAR: &str = "DYNATRACE_TOKEN";

/// Error loading, parsing or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading the config file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error.
    Parse {
        path: PathBuf,
        message: String,
        suggestion: Option<String>,
    },

    /// Validation error (semantic errors after parsing).
    Validation { path: PathBuf, message: String },

    /// Live mode without endpoint or token.
    MissingCredentials { missing: Vec<&'static str> },
}

/// Closest candidate above the similarity threshold.
pub fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|c| (c, jaro_winkler(input, c)))
        .filter(|(_, score)| *score >= SIMILARITY_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c.to_string())
}

/// Pull `x` out of serde's "unknown field `x`, expected ..." message.
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.split("unknown field `").nth(1)?;
    rest.split('`').next()
}

impl ConfigError {
    /// Wrap a serde-saphyr error, adding a "did you mean" hint for unknown keys.
    pub fn from_saphyr_error(
        path: PathBuf,
        error: impl fmt::Display,
        known_fields: &[&str],
    ) -> Self {
        let message = error.to_string();
        let suggestion = unknown_field(&message)
            .and_then(|field| suggest(field, known_fields.iter().copied()));
        ConfigError::Parse {
            path,
            message,
            suggestion,
        }
    }

    /// Format error in Cargo-style format.
    pub fn format_cargo_style(&self) -> String {
        match self {
            ConfigError::Io { path, source } => {
                format!(
                    "error: cannot read config file\n  --> {}\n  |\n  = {}\n",
                    path.display(),
                    source
                )
            }
            ConfigError::Parse {
                path,
                message,
                suggestion,
            } => {
                let mut output = format!("error: {}\n  --> {}\n  |\n", message, path.display());
                if let Some(suggestion) = suggestion {
                    output.push_str(&format!("  = help: did you mean `{}`?\n", suggestion));
                }
                output
            }
            ConfigError::Validation { path, message } => {
                format!("error: {}\n  --> {}\n  |\n", message, path.display())
            }
            ConfigError::MissingCredentials { missing } => remediation(missing),
        }
    }
}

fn remediation(missing: &[&str]) -> String {
    let mut out = String::from("error: Required environment variables are not set:\n");
    for var in missing {
        let what = match *var {
            BASE_URL_VAR => {
                "Your Dynatrace environment URL (e.g., https://abc12345.apps.dynatrace.com)"
            }
            TOKEN_VAR => "Your Dynatrace platform token",
            _ => "",
        };
        out.push_str(&format!("  • {}: {}\n", var, what));
    }
    out.push_str(
        "\nTo set up your environment:\n\
         1. Find your Dynatrace environment URL in your Dynatrace web UI\n\
         2. Create a platform token at: https://myaccount.dynatrace.com/platformTokens\n\
         \x20  Required scopes: storage:logs:read, storage:buckets:read\n\
         3. Set the environment variables:\n\
         \x20  export DYNATRACE_BASE_URL='https://your-env.apps.dynatrace.com'\n\
         \x20  export DYNATRACE_TOKEN='dt0s16.YOUR_TOKEN_HERE'\n\
         \nOr run with --development to browse sample data offline.\n",
    );
    out
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_cargo_style())
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_gets_suggestion() {
        let err = ConfigError::from_saphyr_error(
            PathBuf::from("dynatail.yaml"),
            "unknown field `max_record`, expected one of `base_url`, `max_records`",
            &["base_url", "max_records"],
        );
        let text = err.to_string();
        assert!(text.contains("--> dynatail.yaml"));
        assert!(text.contains("help: did you mean `max_records`?"));
    }

    #[test]
    fn test_no_suggestion_for_unrelated_field() {
        let err = ConfigError::from_saphyr_error(
            PathBuf::from("dynatail.yaml"),
            "unknown field `zzz`",
            &["base_url", "max_records"],
        );
        assert!(!err.to_string().contains("help:"));
    }

    #[test]
    fn test_missing_credentials_lists_each_variable() {
        let err = ConfigError::MissingCredentials {
            missing: vec![BASE_URL_VAR, TOKEN_VAR],
        };
        let text = err.to_string();
        assert!(text.contains("• DYNATRACE_BASE_URL: Your Dynatrace environment URL"));
        assert!(text.contains("• DYNATRACE_TOKEN:"));
        assert!(text.contains("--development"));
    }

    #[test]
    fn test_suggest_picks_closest() {
        assert_eq!(
            suggest("Mesage", ["Message", "Service", "Host"]),
            Some("Message".to_string())
        );
        assert_eq!(suggest("xyz", ["Message"]), None);
    }
}
