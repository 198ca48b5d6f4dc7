use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, Result};

/// Quality tier of a leaf batch. Determines the rate paid per kilogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::A, Grade::B, Grade::C];
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        };
        f.write_str(label)
    }
}

impl FromStr for Grade {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            _ => Err(LedgerError::InvalidGrade(s.to_string())),
        }
    }
}

/// Currency per kilogram for each grade, as configured under `[rates]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GradeRates {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
}

impl Default for GradeRates {
    fn default() -> Self {
        Self {
            a: 500.0,
            b: 350.0,
            c: 200.0,
        }
    }
}

impl GradeRates {
    pub fn rate(&self, grade: Grade) -> f64 {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
        }
    }

    /// Replace the rate for one grade. Rates must stay positive.
    pub fn set(&mut self, grade: Grade, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(LedgerError::InvalidRate {
                grade: grade.to_string(),
                rate,
            });
        }
        match grade {
            Grade::A => self.a = rate,
            Grade::B => self.b = rate,
            Grade::C => self.c = rate,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grades_case_insensitively() {
        assert_eq!("a".parse::<Grade>().unwrap(), Grade::A);
        assert_eq!(" B ".parse::<Grade>().unwrap(), Grade::B);
        assert!(matches!(
            "D".parse::<Grade>(),
            Err(LedgerError::InvalidGrade(g)) if g == "D"
        ));
    }

    #[test]
    fn default_rates_match_price_list() {
        let rates = GradeRates::default();
        assert_eq!(rates.rate(Grade::A), 500.0);
        assert_eq!(rates.rate(Grade::B), 350.0);
        assert_eq!(rates.rate(Grade::C), 200.0);
    }

    #[test]
    fn set_rejects_non_positive_rates() {
        let mut rates = GradeRates::default();
        assert!(rates.set(Grade::B, 0.0).is_err());
        assert!(rates.set(Grade::B, -10.0).is_err());
        rates.set(Grade::B, 375.0).unwrap();
        assert_eq!(rates.rate(Grade::B), 375.0);
    }
}
