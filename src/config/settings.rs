use serde::{Deserialize, Serialize};

use crate::model::GradeRates;
use crate::view::PageSize;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub business: BusinessSettings,
    #[serde(default)]
    pub rates: GradeRates,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default)]
    pub payroll: PayrollSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BusinessSettings {
    pub name: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "Rs. ".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ViewSettings {
    /// Rows per page when a list command is not given `--page-size`
    #[serde(default)]
    pub page_size: PageSize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WeatherSettings {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            latitude: 6.9271,
            longitude: 79.8612,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PayrollSettings {
    /// Simulated bank transfer latency
    pub transfer_delay_ms: u64,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            transfer_delay_ms: 700,
        }
    }
}
