mod settings;

pub use settings::{BusinessSettings, Config, PayrollSettings, ViewSettings, WeatherSettings};

use crate::error::{LedgerError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.evergreen/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "evergreen") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        LedgerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".evergreen"))
}

pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("config.toml")
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_file(config_dir);
    if !path.exists() {
        return Err(LedgerError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| LedgerError::ConfigParse { path, source: e })
}

/// Save config.toml. Comments from the template are not preserved.
pub fn save_config(config_dir: &Path, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(|e| LedgerError::Serialize {
        what: "config.toml".to_string(),
        reason: e.to_string(),
    })?;
    fs::write(config_file(config_dir), content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[business]
name = "EvergreenLedger"
currency_symbol = "Rs. "

# Price paid per kilogram of net leaf, by grade
[rates]
A = 500.0
B = 350.0
C = 200.0

[view]
page_size = 5   # 5, 10 or 25

# Location used by 'evergreen weather'
[weather]
latitude = 6.9271
longitude = 79.8612

[payroll]
transfer_delay_ms = 700   # simulated bank transfer time
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grade;
    use crate::view::PageSize;
    use tempfile::TempDir;

    #[test]
    fn template_parses_with_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.business.name, "EvergreenLedger");
        assert_eq!(config.rates.rate(Grade::A), 500.0);
        assert_eq!(config.view.page_size, PageSize::Five);
        assert_eq!(config.payroll.transfer_delay_ms, 700);
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = toml::from_str("[business]\nname = \"Estate\"\n").unwrap();
        assert_eq!(config.business.currency_symbol, "Rs. ");
        assert_eq!(config.rates.rate(Grade::C), 200.0);
        assert_eq!(config.weather.latitude, 6.9271);
    }

    #[test]
    fn rejects_unsupported_page_size() {
        let raw = "[business]\nname = \"Estate\"\n[view]\npage_size = 7\n";
        assert!(toml::from_str::<Config>(raw).is_err());
    }

    #[test]
    fn save_then_load_keeps_rates() {
        let dir = TempDir::new().unwrap();
        fs::write(config_file(dir.path()), CONFIG_TEMPLATE).unwrap();

        let mut config = load_config(dir.path()).unwrap();
        config.rates.set(Grade::B, 375.0).unwrap();
        save_config(dir.path(), &config).unwrap();

        let reloaded = load_config(dir.path()).unwrap();
        assert_eq!(reloaded.rates.rate(Grade::B), 375.0);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_config(dir.path()),
            Err(LedgerError::ConfigFileNotFound(_))
        ));
    }
}
