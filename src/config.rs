//! Application configuration.

use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL; overrides `PORTFOLIO_ENVIRONMENT` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Initial value of the comment count selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_comments: Option<u32>,
    /// `Cookie` header value of a signed-in browser session, e.g. `SACSID=...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

impl Config {
    pub fn new(base_url: Option<String>, max_comments: Option<u32>) -> Self {
        Config {
            base_url,
            max_comments,
            session_cookie: None,
        }
    }

    pub fn with_session_cookie(mut self, session_cookie: Option<String>) -> Self {
        self.session_cookie = session_cookie;
        self
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file if there is one; a missing file is an empty configuration.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_file(path)
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file, if present.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if !path.ends_with("config.json") {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path must end with config.json",
            ));
        }
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)
    }

    /// The configured base URL wins over the environment passed in.
    pub fn resolve_environment(&self, fallback: Environment) -> Environment {
        match &self.base_url {
            Some(base_url) => Environment::Custom {
                base_url: base_url.clone(),
            },
            None => fallback,
        }
    }

    /// A non-blank `from_env` value wins over the saved cookie.
    pub fn resolve_session_cookie(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|cookie| !cookie.trim().is_empty())
            .or_else(|| self.session_cookie.clone())
    }
}

/// `~/.portfolio/config.json`
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine the home directory",
        )
    })?;
    Ok(home.join(".portfolio").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::new(Some("https://folio.example.com".to_string()), Some(10));
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let result = Config::new(None, Some(5)).save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Saving a configuration should overwrite an existing file.
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        Config::new(None, Some(5)).save(&path).unwrap();
        let config2 = Config::new(None, Some(20));
        config2.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config2, loaded_config);
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_clear_removes_only_config_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        Config::default().save(&path).unwrap();

        assert!(Config::clear(&dir.path().join("other.json")).is_err());
        Config::clear(&path).unwrap();
        assert!(!path.exists());
        // Clearing twice is fine.
        Config::clear(&path).unwrap();
    }

    #[test]
    fn test_base_url_overrides_environment() {
        let config = Config::new(Some("https://folio.example.com".to_string()), None);
        assert_eq!(
            config.resolve_environment(Environment::Local).base_url(),
            "https://folio.example.com"
        );
        assert_eq!(
            Config::default().resolve_environment(Environment::Local),
            Environment::Local
        );
    }

    #[test]
    fn test_session_cookie_is_saved_and_env_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::new(None, None).with_session_cookie(Some("SACSID=saved".to_string()));
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.session_cookie.as_deref(), Some("SACSID=saved"));
        assert_eq!(
            loaded.resolve_session_cookie(Some("SACSID=env".to_string())),
            Some("SACSID=env".to_string())
        );
        assert_eq!(
            loaded.resolve_session_cookie(Some("  ".to_string())),
            Some("SACSID=saved".to_string())
        );
        assert_eq!(Config::default().resolve_session_cookie(None), None);
    }
}
