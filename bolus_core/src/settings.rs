//! Ratio settings persistence with file locking.
//!
//! The two user ratios (ICR and ISF) are stored as the decimal text the user
//! entered, in a small JSON file under the data directory. Reads take a shared
//! lock; writes go through a locked temp file that is renamed into place.

use crate::form::parse_field;
use crate::{Error, Field, Result, ValidationError};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the settings store inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Persisted insulin-to-carb ratio and sensitivity factor
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RatioSettings {
    #[serde(default)]
    icr: Option<String>,
    #[serde(default)]
    isf: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl RatioSettings {
    #[cfg(test)]
    pub(crate) fn from_raw(icr: Option<String>, isf: Option<String>) -> Self {
        Self {
            icr,
            isf,
            updated_at: None,
        }
    }

    /// Stored ICR text, if configured
    pub fn icr(&self) -> Option<&str> {
        non_blank(&self.icr)
    }

    /// Stored ISF text, if configured
    pub fn isf(&self) -> Option<&str> {
        non_blank(&self.isf)
    }

    /// When the ratios were last changed
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Both ratios are present
    pub fn is_configured(&self) -> bool {
        self.icr().is_some() && self.isf().is_some()
    }

    /// Both ratios parsed as numbers
    ///
    /// Missing ratios are `UnconfiguredRatios`; stored text that does not
    /// parse (a hand-edited file) is `Malformed`.
    pub fn ratios(&self) -> std::result::Result<(f64, f64), ValidationError> {
        match (self.icr(), self.isf()) {
            (Some(icr), Some(isf)) => {
                let icr = parse_field(Field::Icr, icr)?;
                let isf = parse_field(Field::Isf, isf)?;
                Ok((icr, isf))
            }
            _ => Err(ValidationError::UnconfiguredRatios),
        }
    }

    /// Replace both ratios after validating them.
    ///
    /// Both values are required and must be numbers greater than zero. On
    /// error the current values are left untouched.
    pub fn update(&mut self, icr: &str, isf: &str) -> std::result::Result<(), ValidationError> {
        let icr = icr.trim();
        let isf = isf.trim();

        if icr.is_empty() || isf.is_empty() {
            return Err(ValidationError::IncompleteRatios);
        }

        for (field, text) in [(Field::Icr, icr), (Field::Isf, isf)] {
            if parse_field(field, text)? <= 0.0 {
                return Err(ValidationError::NonPositiveRatio(field));
            }
        }

        self.icr = Some(icr.to_string());
        self.isf = Some(isf.to_string());
        self.updated_at = Some(Utc::now());
        tracing::debug!("Updated ratios: ICR {} ISF {}", icr, isf);
        Ok(())
    }

    /// One-line summary of whichever ratios are configured
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<String> = [
            self.icr().map(|v| format!("ICR: 1:{}", v)),
            self.isf().map(|v| format!("ISF: 1:{}", v)),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("  "))
        }
    }

    /// Settings file location inside a data directory
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    /// Load settings from a file with shared locking
    ///
    /// Returns unconfigured settings if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns unconfigured settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings file at {:?}, ratios unconfigured", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open settings file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock settings file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read settings file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<RatioSettings>(&contents) {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save settings atomically: locked temp file, fsync, rename over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Config(format!("settings path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconfigured() {
        let settings = RatioSettings::default();
        assert!(!settings.is_configured());
        assert_eq!(settings.ratios(), Err(ValidationError::UnconfiguredRatios));
        assert_eq!(settings.summary(), None);
    }

    #[test]
    fn test_update_accepts_positive_ratios() {
        let mut settings = RatioSettings::default();
        settings.update("12.5", "45").unwrap();

        assert_eq!(settings.icr(), Some("12.5"));
        assert_eq!(settings.isf(), Some("45"));
        assert_eq!(settings.ratios(), Ok((12.5, 45.0)));
        assert!(settings.updated_at().is_some());
        assert_eq!(settings.summary().as_deref(), Some("ICR: 1:12.5  ISF: 1:45"));
    }

    #[test]
    fn test_update_requires_both() {
        let mut settings = RatioSettings::default();
        assert_eq!(
            settings.update("10", ""),
            Err(ValidationError::IncompleteRatios)
        );
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_update_rejects_zero_and_keeps_previous() {
        let mut settings = RatioSettings::default();
        settings.update("10", "40").unwrap();

        assert_eq!(
            settings.update("0", "40"),
            Err(ValidationError::NonPositiveRatio(Field::Icr))
        );
        assert_eq!(
            settings.update("10", "0.0"),
            Err(ValidationError::NonPositiveRatio(Field::Isf))
        );
        assert_eq!(settings.ratios(), Ok((10.0, 40.0)));
    }

    #[test]
    fn test_update_rejects_non_numeric() {
        let mut settings = RatioSettings::default();
        assert_eq!(
            settings.update("1:10", "40"),
            Err(ValidationError::Malformed(Field::Icr, "1:10".into()))
        );
    }

    #[test]
    fn test_partial_summary() {
        let settings = RatioSettings::from_raw(None, Some("30".into()));
        assert!(!settings.is_configured());
        assert_eq!(settings.summary().as_deref(), Some("ISF: 1:30"));
        assert_eq!(settings.ratios(), Err(ValidationError::UnconfiguredRatios));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = RatioSettings::path_in(temp_dir.path());

        let mut settings = RatioSettings::default();
        settings.update("8", "35").unwrap();
        settings.save(&path).unwrap();

        let loaded = RatioSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.json");

        let settings = RatioSettings::load(&path).unwrap();
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_corrupted_settings_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let settings = RatioSettings::load(&path).unwrap();
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = RatioSettings::path_in(temp_dir.path());

        RatioSettings::default().save(&path).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != SETTINGS_FILE)
            .collect();
        assert!(extras.is_empty(), "Unexpected files: {:?}", extras);
    }

    #[test]
    fn test_save_creates_data_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = RatioSettings::path_in(&temp_dir.path().join("nested").join("bolus"));

        RatioSettings::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
