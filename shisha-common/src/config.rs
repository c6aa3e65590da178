//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. SHISHA_ROOT environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
///
/// A missing config file falls through to the default; a config file that
/// exists but cannot be read or parsed is an error.
pub fn resolve_root_folder(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("SHISHA_ROOT") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file_path() {
        let content = std::fs::read_to_string(&config_path)?;
        if let Some(root_folder) = root_folder_from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", config_path.display(), e)))?
        {
            return Ok(root_folder);
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_root_folder())
}

/// Database file location inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("shisha.db")
}

/// Extract the `root_folder` key from config file contents
fn root_folder_from_toml(content: &str) -> Result<Option<PathBuf>> {
    let config: toml::Value = toml::from_str(content)
        .map_err(|e| Error::Config(format!("malformed config file: {}", e)))?;

    Ok(config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from))
}

/// Platform config file: ~/.config/shisha/config.toml (or OS equivalent)
fn config_file_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("shisha").join("config.toml");
    path.exists().then_some(path)
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("shisha"))
        .unwrap_or_else(|| PathBuf::from("./shisha_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/shisha-test")).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/shisha-test"));
    }

    #[test]
    fn database_path_is_under_root() {
        let root = PathBuf::from("/tmp/shisha-test");
        assert_eq!(
            database_path(&root),
            PathBuf::from("/tmp/shisha-test/shisha.db")
        );
    }

    #[test]
    fn config_file_root_folder_is_read() {
        let root = root_folder_from_toml("root_folder = \"/srv/shisha\"").unwrap();
        assert_eq!(root, Some(PathBuf::from("/srv/shisha")));
    }

    #[test]
    fn config_file_without_key_falls_through() {
        let root = root_folder_from_toml("port = 3000").unwrap();
        assert_eq!(root, None);
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let err = root_folder_from_toml("root_folder = [unterminated").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
