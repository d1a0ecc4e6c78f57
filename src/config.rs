use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub(crate) const DEFAULT_CONFIG: &str = std::include_str!("../config.default.toml");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevel {
    level: log::LevelFilter,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self {
            level: log::LevelFilter::Info,
        }
    }
}

impl From<log::LevelFilter> for LogLevel {
    fn from(level: log::LevelFilter) -> Self {
        Self { level }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.level
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.level.to_string().to_lowercase())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let level = match s.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown log level \"{}\"",
                    other
                )))
            }
        };
        Ok(Self { level })
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub effects: EffectsConfig,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: LogLevel,
}

/// Feature toggles for the level effects. Read-only once loaded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct EffectsConfig {
    /// Show a progress indicator on experience gains.
    #[serde(rename = "bossbar")]
    pub indicator: bool,
    #[serde(rename = "levelUpSound")]
    pub level_up_sound: bool,
    /// Celebrate every N levels, 0 disables. A negative N counts as |N|.
    #[serde(rename = "fireworkInterval")]
    pub celebration_interval: i32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            indicator: true,
            level_up_sound: true,
            celebration_interval: 10,
        }
    }
}

impl Config {
    /// Loads the config at `path`, writing the default file first if there
    /// is none. Never fails: anything unreadable is replaced by its default
    /// and reported in the returned warnings.
    pub fn load(path: impl AsRef<Path>) -> (Self, Vec<ConfigError>) {
        let path = path.as_ref();
        let mut warnings = Vec::new();

        // Generate default config if it doesn't exist
        if !path.exists() {
            if let Err(source) = std::fs::write(path, DEFAULT_CONFIG) {
                warnings.push(ConfigError::Write {
                    path: path.to_path_buf(),
                    source,
                });
            }
            return (Self::default(), warnings);
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(source) => {
                warnings.push(ConfigError::Read {
                    path: PathBuf::from(path),
                    source,
                });
                return (Self::default(), warnings);
            }
        };

        let config = Self::parse(&contents, &mut warnings);
        (config, warnings)
    }

    /// Parses config text. Missing keys take their defaults; a malformed key
    /// only resets that key.
    pub fn parse(contents: &str, warnings: &mut Vec<ConfigError>) -> Self {
        let value: toml::Value = match toml::from_str(contents) {
            Ok(value) => value,
            Err(e) => {
                warnings.push(ConfigError::Parse(e));
                return Self::default();
            }
        };

        // Fast path, everything well-formed
        if let Ok(config) = value.clone().try_into::<Config>() {
            return config;
        }

        let defaults = Self::default();
        let general = section(&value, "general", warnings);
        let effects = section(&value, "effects", warnings);

        Self {
            general: GeneralConfig {
                log_level: read_key(
                    general,
                    "general",
                    "log_level",
                    defaults.general.log_level,
                    warnings,
                ),
            },
            effects: EffectsConfig {
                indicator: read_key(
                    effects,
                    "effects",
                    "bossbar",
                    defaults.effects.indicator,
                    warnings,
                ),
                level_up_sound: read_key(
                    effects,
                    "effects",
                    "levelUpSound",
                    defaults.effects.level_up_sound,
                    warnings,
                ),
                celebration_interval: read_key(
                    effects,
                    "effects",
                    "fireworkInterval",
                    defaults.effects.celebration_interval,
                    warnings,
                ),
            },
        }
    }
}

fn section<'a>(
    value: &'a toml::Value,
    name: &str,
    warnings: &mut Vec<ConfigError>,
) -> Option<&'a toml::value::Table> {
    match value.get(name) {
        Some(toml::Value::Table(table)) => Some(table),
        Some(_) => {
            warnings.push(ConfigError::InvalidValue {
                key: name.to_string(),
                reason: "expected a table".to_string(),
            });
            None
        }
        None => None,
    }
}

fn read_key<T: DeserializeOwned>(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    default: T,
    warnings: &mut Vec<ConfigError>,
) -> T {
    let value = table.and_then(|table| table.get(key));

    match value {
        None => default,
        Some(value) => match value.clone().try_into::<T>() {
            Ok(value) => value,
            Err(e) => {
                warnings.push(ConfigError::InvalidValue {
                    key: format!("{}.{}", section, key),
                    reason: e.to_string(),
                });
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> (Config, Vec<ConfigError>) {
        let mut warnings = Vec::new();
        let config = Config::parse(contents, &mut warnings);
        (config, warnings)
    }

    #[test]
    fn default_file_matches_defaults() {
        let (config, warnings) = parse(DEFAULT_CONFIG);
        assert!(warnings.is_empty());
        assert_eq!(config, Config::default());
        assert_eq!(config.effects.celebration_interval, 10);
    }

    #[test]
    fn reads_all_keys() {
        let (config, warnings) = parse(
            r#"
            [general]
            log_level = "debug"

            [effects]
            bossbar = false
            levelUpSound = false
            fireworkInterval = 5
            "#,
        );
        assert!(warnings.is_empty());
        assert_eq!(
            log::LevelFilter::from(config.general.log_level),
            log::LevelFilter::Debug
        );
        assert!(!config.effects.indicator);
        assert!(!config.effects.level_up_sound);
        assert_eq!(config.effects.celebration_interval, 5);
    }

    #[test]
    fn missing_keys_use_defaults_silently() {
        let (config, warnings) = parse("[effects]\nbossbar = false\n");
        assert!(warnings.is_empty());
        assert!(!config.effects.indicator);
        assert!(config.effects.level_up_sound);
        assert_eq!(config.effects.celebration_interval, 10);
    }

    #[test]
    fn malformed_key_only_resets_that_key() {
        let (config, warnings) = parse(
            r#"
            [effects]
            bossbar = "yes"
            levelUpSound = false
            fireworkInterval = "ten"
            "#,
        );
        assert_eq!(warnings.len(), 2);
        assert!(config.effects.indicator);
        assert!(!config.effects.level_up_sound);
        assert_eq!(config.effects.celebration_interval, 10);
    }

    #[test]
    fn negative_interval_is_kept() {
        let (config, warnings) = parse("[effects]\nfireworkInterval = -3\n");
        assert!(warnings.is_empty());
        assert_eq!(config.effects.celebration_interval, -3);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let (config, warnings) = parse("[general]\nlog_level = \"loud\"\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            log::LevelFilter::from(config.general.log_level),
            log::LevelFilter::Info
        );
    }

    #[test]
    fn unparsable_file_uses_all_defaults() {
        let (config, warnings) = parse("this is = = not toml");
        assert!(matches!(warnings.as_slice(), [ConfigError::Parse(_)]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_creates_default_file_on_first_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("level_effects.toml");

        let (config, warnings) = Config::load(&path);
        assert!(warnings.is_empty());
        assert_eq!(config, Config::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        // Second load reads the file it just wrote
        let (again, warnings) = Config::load(&path);
        assert!(warnings.is_empty());
        assert_eq!(again, config);
    }

    #[test]
    fn load_reports_unwritable_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("level_effects.toml");

        let (config, warnings) = Config::load(&path);
        assert!(matches!(warnings.as_slice(), [ConfigError::Write { .. }]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_reports_unreadable_file() {
        // The path exists but is a directory
        let dir = tempfile::TempDir::new().unwrap();

        let (config, warnings) = Config::load(dir.path());
        assert!(matches!(warnings.as_slice(), [ConfigError::Read { .. }]));
        assert_eq!(config, Config::default());
    }
}
