//! Configuration of validation limits and notification placement.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for validation and notification behaviour.
///
/// The defaults are the limits the application ships with; a configuration
/// file only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The largest number of units a single request may ask for.
    max_units: u32,

    /// The youngest patient age accepted on a request form.
    min_patient_age: u32,

    /// The oldest patient age accepted on a request form.
    max_patient_age: u32,

    /// The minimum password length, in characters.
    min_password_length: usize,

    /// The minimum trimmed name length, in characters.
    min_name_length: usize,

    /// How far above an anchor point an anchored notification is placed.
    pub anchor_offset: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_units: default_max_units(),
            min_patient_age: default_min_patient_age(),
            max_patient_age: default_max_patient_age(),
            min_password_length: default_min_password_length(),
            min_name_length: default_min_name_length(),
            anchor_offset: default_anchor_offset(),
        }
    }
}

/// Errors that can occur while loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The file is not a valid configuration.
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(LoadError::Read)?;
        let config = toml::from_str(&content).map_err(LoadError::Parse)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        let content = toml::to_string_pretty(self).map_err(LoadError::Serialize)?;
        std::fs::write(path, content).map_err(LoadError::Write)
    }

    /// Returns the largest number of units a request may ask for.
    #[must_use]
    pub const fn max_units(&self) -> u32 {
        self.max_units
    }

    /// Returns the inclusive range of accepted patient ages.
    #[must_use]
    pub const fn patient_age_range(&self) -> std::ops::RangeInclusive<u32> {
        self.min_patient_age..=self.max_patient_age
    }

    /// Returns the minimum password length.
    #[must_use]
    pub const fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    /// Returns the minimum trimmed name length.
    #[must_use]
    pub const fn min_name_length(&self) -> usize {
        self.min_name_length
    }

    /// Sets the largest number of units a request may ask for.
    pub const fn set_max_units(&mut self, value: u32) {
        self.max_units = value;
    }
}

const fn default_max_units() -> u32 {
    100
}

const fn default_min_patient_age() -> u32 {
    1
}

const fn default_max_patient_age() -> u32 {
    120
}

const fn default_min_password_length() -> usize {
    6
}

const fn default_min_name_length() -> usize {
    2
}

const fn default_anchor_offset() -> i32 {
    60
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_max_units")]
        max_units: u32,

        #[serde(default = "default_min_patient_age")]
        min_patient_age: u32,

        #[serde(default = "default_max_patient_age")]
        max_patient_age: u32,

        #[serde(default = "default_min_password_length")]
        min_password_length: usize,

        #[serde(default = "default_min_name_length")]
        min_name_length: usize,

        /// Vertical offset, in pixels, between an anchor point and the
        /// notification surface.
        #[serde(default = "default_anchor_offset")]
        anchor_offset: i32,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                max_units,
                min_patient_age,
                max_patient_age,
                min_password_length,
                min_name_length,
                anchor_offset,
            } => Self {
                max_units,
                min_patient_age,
                max_patient_age,
                min_password_length,
                min_name_length,
                anchor_offset,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            max_units: config.max_units,
            min_patient_age: config.min_patient_age,
            max_patient_age: config.max_patient_age,
            min_password_length: config.min_password_length,
            min_name_length: config.min_name_length,
            anchor_offset: config.anchor_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmax_units = 50\nmin_patient_age = 18\n\
              max_patient_age = 65\nanchor_offset = 30\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.max_units(), 50);
        assert_eq!(config.patient_age_range(), 18..=65);
        assert_eq!(config.min_password_length(), 6);
        assert_eq!(config.anchor_offset, 30);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, LoadError::Read(_)));
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmax_units = \"lots\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bloodlink.toml");
        let mut config = Config::default();
        config.set_max_units(20);

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
