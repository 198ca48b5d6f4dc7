use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{require, require_weight, round2, Grade, GradeRates};
use crate::error::{LedgerError, Result};
use crate::store::Record;
use crate::view::{Dated, Searchable};

/// Net weight after moisture compensation: `gross × (1 − moisture/100)`, two decimals.
pub fn net_weight(gross: f64, moisture: f64) -> f64 {
    round2(gross * (1.0 - moisture / 100.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectionStatus {
    #[default]
    Pending,
    Processed,
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionStatus::Pending => write!(f, "Pending"),
            CollectionStatus::Processed => write!(f, "Processed"),
        }
    }
}

/// A single leaf collection as recorded at intake
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProcurementRecord {
    pub id: u32,
    pub supplier: String,
    pub gross_weight: f64,
    pub grade: Grade,
    #[serde(default)]
    pub moisture: f64,
    pub net_weight: f64,
    pub value: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: CollectionStatus,
}

impl Record for ProcurementRecord {
    const KIND: &'static str = "Collection";

    fn id(&self) -> u32 {
        self.id
    }
}

impl Searchable for ProcurementRecord {
    fn search_field(&self) -> Option<&str> {
        Some(&self.supplier)
    }
}

impl Dated for ProcurementRecord {
    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

/// Intake form. Net weight and value are derived, never entered.
#[derive(Debug, Clone)]
pub struct CollectionForm {
    pub supplier: String,
    pub gross_weight: f64,
    pub grade: Grade,
    pub moisture: f64,
    pub date: NaiveDate,
}

impl CollectionForm {
    pub fn validate(&self) -> Result<()> {
        require("Supplier", &self.supplier)?;
        require_weight(self.gross_weight)?;
        if !(0.0..=100.0).contains(&self.moisture) {
            return Err(LedgerError::Validation(
                "Moisture must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }

    pub fn net_weight(&self) -> f64 {
        net_weight(self.gross_weight, self.moisture)
    }

    /// Value is paid on the net weight at the grade's current rate.
    pub fn value(&self, rates: &GradeRates) -> f64 {
        round2(self.net_weight() * rates.rate(self.grade))
    }

    pub fn into_record(self, id: u32, rates: &GradeRates) -> ProcurementRecord {
        let net_weight = self.net_weight();
        let value = self.value(rates);
        ProcurementRecord {
            id,
            supplier: self.supplier.trim().to_string(),
            gross_weight: self.gross_weight,
            grade: self.grade,
            moisture: self.moisture,
            net_weight,
            value,
            date: self.date,
            status: CollectionStatus::Pending,
        }
    }
}

/// Built-in collection history used until something has been saved.
pub fn sample_procurement() -> Vec<ProcurementRecord> {
    let rates = GradeRates::default();
    let rows = [
        ("Sanath Nishantha", 500.0, Grade::A, 12.0, (2025, 1, 15), CollectionStatus::Processed),
        ("Hashan Hewage", 490.0, Grade::B, 10.0, (2025, 1, 14), CollectionStatus::Processed),
        ("Arul Suresh", 780.0, Grade::A, 14.0, (2025, 1, 13), CollectionStatus::Pending),
        ("Sumana Nishanthi", 1100.0, Grade::A, 11.0, (2025, 1, 12), CollectionStatus::Processed),
        ("Kusumlatha", 562.0, Grade::B, 9.0, (2025, 1, 11), CollectionStatus::Pending),
    ];

    rows.into_iter()
        .zip(1..)
        .filter_map(|((supplier, gross, grade, moisture, (y, m, d), status), id)| {
            let form = CollectionForm {
                supplier: supplier.to_string(),
                gross_weight: gross,
                grade,
                moisture,
                date: NaiveDate::from_ymd_opt(y, m, d)?,
            };
            let mut record = form.into_record(id, &rates);
            record.status = status;
            Some(record)
        })
        .collect()
}
