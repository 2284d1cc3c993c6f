use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_URL_ENV: &str = "RIGVEDA_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub bookmarks: BookmarkConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Duration of a light syllable in milliseconds
    pub base_ms: u64,
    pub guru_multiplier: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for BookmarkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("rigveda_bookmarks.json"),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_ms: 300,
            guru_multiplier: 2.0,
        }
    }
}

impl PlaybackConfig {
    pub fn base(&self) -> Duration {
        Duration::from_millis(self.base_ms)
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = self.playback.guru_multiplier;
        if !m.is_finite() || m <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "playback.guru_multiplier",
                reason: format!("must be a positive finite number, got {}", m),
            });
        }
        Ok(())
    }

    /// Load from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&source)?;
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
    }

    /// Use `dir` for data files that were left at their defaults.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        if self.bookmarks == BookmarkConfig::default() {
            self.bookmarks.path = dir.join(&self.bookmarks.path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
                [api]
                base_url = "https://vedaweb.example"

                [playback]
                guru_multiplier = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://vedaweb.example");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.playback.base_ms, 300);
        assert_eq!(config.playback.guru_multiplier, 1.5);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[api]\ntimeout_secs = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_guru_multiplier_must_be_positive() {
        for bad in ["-1.0", "0.0", "nan", "inf"] {
            let source = format!("[playback]\nguru_multiplier = {}", bad);
            assert!(
                matches!(
                    Config::from_toml(&source),
                    Err(ConfigError::Invalid { field: "playback.guru_multiplier", .. })
                ),
                "{} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/rigveda.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_with_data_dir() {
        let config = Config::default().with_data_dir(Path::new("/data"));
        assert_eq!(config.bookmarks.path, PathBuf::from("/data/rigveda_bookmarks.json"));

        let mut custom = Config::default();
        custom.bookmarks.path = PathBuf::from("/elsewhere/marks.json");
        let custom = custom.with_data_dir(Path::new("/data"));
        assert_eq!(custom.bookmarks.path, PathBuf::from("/elsewhere/marks.json"));
    }
}
