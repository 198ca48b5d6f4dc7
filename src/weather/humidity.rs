use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityReading {
    /// Relative humidity, 0 to 100
    pub percent: u8,
    pub observed_at: NaiveDateTime,
}

/// Last humidity seen by the weather lookup, shared with procurement intake.
#[derive(Debug, Clone)]
pub struct HumidityCache {
    path: PathBuf,
}

impl HumidityCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("humidity.toml"))
    }

    /// The stored reading; `Ok(None)` when nothing has been cached yet.
    pub fn read(&self) -> Result<Option<HumidityReading>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let reading = toml::from_str::<HumidityReading>(&content).map_err(|e| {
            LedgerError::StateParse {
                what: "cached humidity",
                path: self.path.clone(),
                source: e,
            }
        })?;
        Ok(Some(reading))
    }

    /// The cached reading, if one is stored and readable.
    pub fn get(&self) -> Option<HumidityReading> {
        match self.read() {
            Ok(Some(reading)) if reading.percent <= 100 => Some(reading),
            Ok(Some(reading)) => {
                warn!(percent = reading.percent, "ignoring out of range humidity reading");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read cached humidity");
                None
            }
        }
    }

    pub fn set(&self, reading: HumidityReading) -> Result<()> {
        if reading.percent > 100 {
            return Err(LedgerError::Validation(format!(
                "Humidity must be between 0 and 100 (got {})",
                reading.percent
            )));
        }
        let content = toml::to_string(&reading).map_err(|e| LedgerError::Serialize {
            what: "humidity reading".to_string(),
            reason: e.to_string(),
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}
