use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{require, require_weight, round2, Grade, GradeRates};
use crate::display::format_money;
use crate::error::{LedgerError, Result};
use crate::store::Record;
use crate::view::{Dated, Searchable};

/// `amount = weight × rate`
pub fn payment_amount(weight: f64, rate: f64) -> f64 {
    round2(weight * rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(LedgerError::Validation(format!(
                "Invalid status '{s}'. Use 'paid' or 'pending'."
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: u32,
    pub supplier: String,
    pub weight: f64,
    pub grade: Grade,
    pub rate: f64,
    pub amount: f64,
    #[serde(default)]
    pub status: PaymentStatus,
    pub date: NaiveDate,
    #[serde(default)]
    pub phone: String,
}

impl PaymentRecord {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// Pending becomes Paid. Returns false when the record was already paid.
    pub fn mark_paid(&mut self) -> bool {
        if self.is_paid() {
            return false;
        }
        self.status = PaymentStatus::Paid;
        true
    }

    pub fn sms_notice(&self, currency_symbol: &str) -> String {
        format!(
            "Payment of {} has been processed.",
            format_money(self.amount, currency_symbol)
        )
    }
}

impl Record for PaymentRecord {
    const KIND: &'static str = "Payment";

    fn id(&self) -> u32 {
        self.id
    }
}

impl Searchable for PaymentRecord {
    fn search_field(&self) -> Option<&str> {
        Some(&self.supplier)
    }
}

impl Dated for PaymentRecord {
    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

#[derive(Debug, Clone)]
pub struct PaymentForm {
    pub supplier: String,
    pub weight: f64,
    pub grade: Grade,
    pub phone: String,
    pub date: NaiveDate,
}

impl PaymentForm {
    pub fn validate(&self) -> Result<()> {
        require("Supplier", &self.supplier)?;
        require_weight(self.weight)?;
        Ok(())
    }

    /// Rate is fixed at creation; later rate changes do not touch existing records.
    pub fn into_record(self, id: u32, rates: &GradeRates) -> PaymentRecord {
        let rate = rates.rate(self.grade);
        PaymentRecord {
            id,
            supplier: self.supplier.trim().to_string(),
            weight: self.weight,
            grade: self.grade,
            rate,
            amount: payment_amount(self.weight, rate),
            status: PaymentStatus::Pending,
            date: self.date,
            phone: self.phone.trim().to_string(),
        }
    }
}

/// Built-in payroll used until something has been saved.
pub fn sample_payments() -> Vec<PaymentRecord> {
    let rates = GradeRates::default();
    let rows = [
        ("Sanath Nishantha", 200.0, Grade::A, PaymentStatus::Paid, 15, "0714442389"),
        ("Hashan Hewage", 271.0, Grade::B, PaymentStatus::Pending, 14, "0718890365"),
        ("Arul Suresh", 320.0, Grade::A, PaymentStatus::Pending, 13, "0766742389"),
        ("Sumana Nishanthi", 470.0, Grade::A, PaymentStatus::Paid, 12, "0723349512"),
        ("Kusumlatha", 293.0, Grade::B, PaymentStatus::Pending, 11, "0756088993"),
    ];

    rows.into_iter()
        .zip(1..)
        .filter_map(|((supplier, weight, grade, status, day, phone), id)| {
            let form = PaymentForm {
                supplier: supplier.to_string(),
                weight,
                grade,
                phone: phone.to_string(),
                date: NaiveDate::from_ymd_opt(2025, 1, day)?,
            };
            let mut record = form.into_record(id, &rates);
            record.status = status;
            Some(record)
        })
        .collect()
}
