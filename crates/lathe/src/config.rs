//! Process-wide configuration read by the policy gate.
//!
//! Values come from layered sources: built-in defaults (every key unset),
//! then a `lathe.toml` file, then `key=value` overrides. Keys are dotted
//! names looked up as nested TOML tables, so both of these set the same key:
//!
//! ```toml
//! lathe.allArgsFinal.flagUsage = "WARNING"
//!
//! [lathe.allArgsFinal]
//! flagUsage = "warning"
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "lathe.toml";

/// Severity configured for the use of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum FlagUsage {
    Allow,
    Warning,
    Error,
}

impl FromStr for FlagUsage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(FlagUsage::Allow),
            "warning" => Ok(FlagUsage::Warning),
            "error" => Ok(FlagUsage::Error),
            _ => Err(format!("expected ALLOW, WARNING or ERROR, found '{}'", s)),
        }
    }
}

impl TryFrom<String> for FlagUsage {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, String> {
        value.parse()
    }
}

impl fmt::Display for FlagUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlagUsage::Allow => "ALLOW",
            FlagUsage::Warning => "WARNING",
            FlagUsage::Error => "ERROR",
        })
    }
}

/// A typed configuration key.
pub struct ConfigKey<T> {
    name: &'static str,
    description: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> ConfigKey<T> {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description, _value: PhantomData }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl<T> fmt::Debug for ConfigKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConfigKey").field(&self.name).finish()
    }
}

pub const ALL_ARGS_FINAL_FLAG_USAGE: ConfigKey<FlagUsage> = ConfigKey::new(
    "lathe.allArgsFinal.flagUsage",
    "Emit a warning or error if @AllArgsFinal is used.",
);

pub const EXPERIMENTAL_FLAG_USAGE: ConfigKey<FlagUsage> = ConfigKey::new(
    "lathe.experimental.flagUsage",
    "Emit a warning or error if an experimental feature is used.",
);

/// Every flag-usage key, for listing and validation.
pub const FLAG_USAGE_KEYS: [&ConfigKey<FlagUsage>; 2] =
    [&ALL_ARGS_FINAL_FLAG_USAGE, &EXPERIMENTAL_FLAG_USAGE];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Cannot set {key}: '{segment}' is not a table")]
    NotATable { key: String, segment: String },

    #[error("Malformed override '{0}', expected key=value")]
    MalformedOverride(String),
}

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    values: toml::Table,
    source: Option<PathBuf>,
}

impl Configuration {
    /// Load configuration from all sources with proper precedence.
    ///
    /// An explicit file must exist. Otherwise `lathe.toml` in `search_dir` is
    /// used when present.
    pub fn load(explicit: Option<&Path>, search_dir: Option<&Path>) -> Result<Self> {
        let path = match (explicit, search_dir) {
            (Some(path), _) => Some(path.to_path_buf()),
            (None, Some(dir)) => Some(dir.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
            (None, None) => None,
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.source = Some(path);
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let values: toml::Table = toml::from_str(contents)?;
        Ok(Self { values, source: None })
    }

    /// File the values were read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Set a dotted key to a string value, creating intermediate tables.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let mut segments: Vec<&str> = key.split('.').collect();
        let last = segments.pop().unwrap_or(key);

        let mut table = &mut self.values;
        for segment in segments {
            let entry = table
                .entry(segment.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            table = match entry {
                toml::Value::Table(t) => t,
                _ => {
                    return Err(ConfigError::NotATable {
                        key: key.to_string(),
                        segment: segment.to_string(),
                    })
                }
            };
        }

        table.insert(last.to_string(), toml::Value::String(value.to_string()));
        Ok(())
    }

    /// Apply a `key=value` override.
    pub fn apply_override(&mut self, assignment: &str) -> std::result::Result<(), ConfigError> {
        let (key, value) = assignment
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| ConfigError::MalformedOverride(assignment.to_string()))?;
        self.set(key, value)
    }

    /// Typed lookup. `Ok(None)` means the key is unset.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &ConfigKey<T>,
    ) -> std::result::Result<Option<T>, ConfigError> {
        let Some(value) = self.lookup(key.name()) else {
            return Ok(None);
        };

        value.clone().try_into().map(Some).map_err(|e: toml::de::Error| {
            ConfigError::InvalidValue { key: key.name().to_string(), message: e.message().to_string() }
        })
    }

    /// Errors for every known key whose configured value does not parse.
    pub fn validate(&self) -> Vec<ConfigError> {
        FLAG_USAGE_KEYS.iter().filter_map(|key| self.get(key).err()).collect()
    }

    fn lookup(&self, dotted: &str) -> Option<&toml::Value> {
        let mut segments = dotted.split('.');
        let first = segments.next()?;
        let nested = self.values.get(first).and_then(|root| {
            segments.try_fold(root, |value, segment| value.as_table().and_then(|t| t.get(segment)))
        });

        nested.or_else(|| self.values.get(dotted))
    }
}
