//! Config discovery for dynatail.
//!
//! Walks parent directories to find `dynatail.yaml` and checks for a global
//! config at `~/.config/dynatail/config.yaml`.

use std::path::{Path, PathBuf};

/// Project config filename to search for in parent directories.
pub const PROJECT_CONFIG_NAME: &str = "dynatail.yaml";

/// Global config filename within the dynatail config directory.
pub const GLOBAL_CONFIG_NAME: &str = "config.yaml";

/// Result of config discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Full path to the nearest `dynatail.yaml`.
    pub project_config: Option<PathBuf>,
    /// Full path to `~/.config/dynatail/config.yaml` if it exists.
    pub global_config: Option<PathBuf>,
    /// Directories checked during the walk, nearest first.
    pub searched: Vec<PathBuf>,
}

impl DiscoveryResult {
    /// Closest config wins completely: project over global.
    pub fn effective(&self) -> Option<&Path> {
        self.project_config
            .as_deref()
            .or(self.global_config.as_deref())
    }
}

/// `~/.config/dynatail`, also the default data directory.
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("dynatail"))
}

/// Discover config files starting from the current working directory.
pub fn discover() -> DiscoveryResult {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.canonicalize().unwrap_or(dir),
        Err(_) => {
            return DiscoveryResult {
                global_config: find_global(global_config_dir().as_deref()),
                ..Default::default()
            }
        }
    };
    discover_from(&cwd, global_config_dir().as_deref())
}

/// Discovery with explicit start directory and global config directory.
pub fn discover_from(start: &Path, global_dir: Option<&Path>) -> DiscoveryResult {
    let mut result = DiscoveryResult {
        global_config: find_global(global_dir),
        ..Default::default()
    };

    for ancestor in start.ancestors() {
        result.searched.push(ancestor.to_path_buf());

        let config_path = ancestor.join(PROJECT_CONFIG_NAME);
        if is_file(&config_path) {
            result.project_config = Some(config_path);
            break;
        }
    }

    result
}

fn find_global(global_dir: Option<&Path>) -> Option<PathBuf> {
    let path = global_dir?.join(GLOBAL_CONFIG_NAME);
    is_file(&path).then_some(path)
}

fn is_file(path: &Path) -> bool {
    path.try_exists().unwrap_or(false) && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_config_in_start_dir() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(PROJECT_CONFIG_NAME);
        fs::write(&config_path, "max_records: 10").unwrap();

        let result = discover_from(temp.path(), None);
        assert_eq!(result.project_config, Some(config_path.clone()));
        assert_eq!(result.effective(), Some(config_path.as_path()));
        assert_eq!(result.searched.len(), 1);
    }

    #[test]
    fn test_finds_config_in_parent_dir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("a").join("b");
        fs::create_dir_all(&subdir).unwrap();
        let config_path = temp.path().join(PROJECT_CONFIG_NAME);
        fs::write(&config_path, "max_records: 10").unwrap();

        let result = discover_from(&subdir, None);
        assert_eq!(result.project_config, Some(config_path));
        assert_eq!(result.searched.len(), 3);
    }

    #[test]
    fn test_project_wins_over_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let project_config = project.path().join(PROJECT_CONFIG_NAME);
        let global_config = global.path().join(GLOBAL_CONFIG_NAME);
        fs::write(&project_config, "").unwrap();
        fs::write(&global_config, "").unwrap();

        let result = discover_from(project.path(), Some(global.path()));
        assert_eq!(result.global_config, Some(global_config));
        assert_eq!(result.effective(), Some(project_config.as_path()));
    }

    #[test]
    fn test_falls_back_to_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let global_config = global.path().join(GLOBAL_CONFIG_NAME);
        fs::write(&global_config, "").unwrap();

        let result = discover_from(project.path(), Some(global.path()));
        assert!(result.project_config.is_none());
        assert_eq!(result.effective(), Some(global_config.as_path()));
    }

    #[test]
    fn test_directory_named_like_config_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(PROJECT_CONFIG_NAME)).unwrap();
        let result = discover_from(temp.path(), Some(temp.path()));
        assert!(result.project_config.is_none());
        assert!(result.global_config.is_none());
    }
}
