//! `dynatail config validate` and `dynatail config show`.
//!
//! Both follow Unix conventions: results on stdout, problems on stderr and
//! a non-zero exit code through `Err`.

use crate::config::error::{BASE_URL_VAR, TOKEN_VAR};
use crate::config::{self, Config, ConfigError};
use crate::record::Column;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// `--config` wins; otherwise the closest discovered file.
fn effective_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => config::discover().effective().map(Path::to_path_buf),
    }
}

/// Validate the effective config file.
///
/// Quiet on success. Lint findings (values silently replaced by defaults)
/// are printed as warnings and fail the command.
pub fn validate(explicit: Option<&Path>) -> Result<(), i32> {
    let Some(path) = effective_config_path(explicit) else {
        eprintln!("error: No config found to validate");
        return Err(1);
    };
    validate_file(&path).map_err(|messages| {
        for message in messages {
            eprint!("{}", message);
        }
        1
    })
}

fn validate_file(path: &Path) -> Result<(), Vec<String>> {
    config::load_file(path).map_err(|e| vec![e.format_cargo_style()])?;
    let warnings = config::loader::lint(path).map_err(|e| vec![e.format_cargo_style()])?;
    if warnings.is_empty() {
        return Ok(());
    }
    Err(warnings
        .into_iter()
        .map(|w| format!("warning: {}\n  --> {}\n", w, path.display()))
        .collect())
}

/// Show the effective configuration, defaults included.
///
/// Respects NO_COLOR through the colored crate.
pub fn show(explicit: Option<&Path>) -> Result<(), i32> {
    let cfg = match effective_config_path(explicit) {
        Some(path) => match config::load_file(&path) {
            Ok(cfg) => {
                println!("Using: {}", path.display().to_string().dimmed());
                cfg
            }
            Err(e) => {
                eprint!("{}", e);
                return Err(1);
            }
        },
        None => {
            println!("{}", "No config found. Using defaults.".dimmed());
            Config::default()
        }
    };
    println!();
    show_config(&cfg, |var| std::env::var(var).ok());
    Ok(())
}

fn show_config<F>(cfg: &Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = match (&cfg.base_url, lookup(BASE_URL_VAR)) {
        (_, Some(env)) if !env.trim().is_empty() => {
            format!("{} {}", env.green(), format!("(from {})", BASE_URL_VAR).dimmed())
        }
        (Some(url), _) => url.green().to_string(),
        (None, _) => "(not set)".dimmed().to_string(),
    };
    println!("{}: {}", "base_url".cyan(), base_url);

    let token = match lookup(TOKEN_VAR) {
        Some(t) if !t.trim().is_empty() => "(set)".green().to_string(),
        _ => format!("(missing {})", TOKEN_VAR).red().to_string(),
    };
    println!("{}: {}", "token".cyan(), token);

    println!(
        "{}: {} {}",
        "time_range".cyan(),
        cfg.time_range.token().green(),
        format!("({})", cfg.time_range.label()).dimmed()
    );
    println!("{}: {}", "max_records".cyan(), cfg.max_records.to_string().green());
    println!("{}: {}", "columns".cyan(), column_list(&cfg.columns).green());
    let data_dir = cfg
        .data_dir
        .as_ref()
        .map(|d| d.display().to_string().yellow().to_string())
        .unwrap_or_else(|| "(none, nothing is persisted)".dimmed().to_string());
    println!("{}: {}", "data_dir".cyan(), data_dir);
}

fn column_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.title())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Config errors at startup share the subcommand's rendering.
pub fn report(error: &ConfigError) {
    eprint!("{}", error.format_cargo_style());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_clean_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dynatail.yaml");
        fs::write(&path, "time_range: 2h\nmax_records: 50\n").unwrap();
        assert!(validate_file(&path).is_ok());
        assert_eq!(validate(Some(&path)), Ok(()));
    }

    #[test]
    fn test_validate_reports_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dynatail.yaml");
        fs::write(&path, "time_rnage: 2h\n").unwrap();
        let messages = validate_file(&path).unwrap_err();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("time_rnage"));
    }

    #[test]
    fn test_validate_warns_on_unknown_time_range() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dynatail.yaml");
        fs::write(&path, "time_range: fortnight\n").unwrap();
        let messages = validate_file(&path).unwrap_err();
        assert!(messages[0].starts_with("warning: unknown time_range 'fortnight'"));
    }

    #[test]
    fn test_validate_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        assert_eq!(validate(Some(&temp.path().join("missing.yaml"))), Err(1));
    }

    #[test]
    fn test_column_list() {
        assert_eq!(
            column_list(&[Column::Timestamp, Column::TraceId]),
            "Timestamp, Trace ID"
        );
    }
}
