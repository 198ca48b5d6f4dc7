//! Summary figures for the list views.
//!
//! Every summary is a fresh reduction over the records it is given; nothing
//! is cached between calls.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    CollectionStatus, Grade, PaymentRecord, PaymentStatus, ProcurementRecord, Supplier,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentSummary {
    pub count: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    /// Distinct suppliers with at least one pending payment
    pub suppliers_awaiting: usize,
}

impl PaymentSummary {
    pub fn of<'a>(records: impl IntoIterator<Item = &'a PaymentRecord>) -> Self {
        let mut summary = Self::default();
        let mut awaiting = BTreeSet::new();

        for record in records {
            summary.count += 1;
            summary.total_amount += record.amount;
            match record.status {
                PaymentStatus::Paid => {
                    summary.paid_count += 1;
                    summary.paid_amount += record.amount;
                }
                PaymentStatus::Pending => {
                    summary.pending_count += 1;
                    summary.pending_amount += record.amount;
                    awaiting.insert(record.supplier.as_str());
                }
            }
        }

        summary.suppliers_awaiting = awaiting.len();
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcurementSummary {
    pub count: usize,
    pub pending_count: usize,
    pub total_gross: f64,
    pub total_net: f64,
    pub total_value: f64,
    pub per_grade: BTreeMap<Grade, usize>,
}

impl ProcurementSummary {
    pub fn of<'a>(records: impl IntoIterator<Item = &'a ProcurementRecord>) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.count += 1;
            summary.total_gross += record.gross_weight;
            summary.total_net += record.net_weight;
            summary.total_value += record.value;
            if record.status == CollectionStatus::Pending {
                summary.pending_count += 1;
            }
            *summary.per_grade.entry(record.grade).or_default() += 1;
        }
        summary
    }

    pub fn grade_count(&self, grade: Grade) -> usize {
        self.per_grade.get(&grade).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierSummary {
    pub count: usize,
    pub total_collected_kg: f64,
    pub total_paid: f64,
}

impl SupplierSummary {
    pub fn of<'a>(suppliers: impl IntoIterator<Item = &'a Supplier>) -> Self {
        suppliers
            .into_iter()
            .fold(Self::default(), |mut acc, supplier| {
                acc.count += 1;
                acc.total_collected_kg += supplier.total_collected_kg;
                acc.total_paid += supplier.total_paid;
                acc
            })
    }
}

/// Net weight collected in one calendar month, and how much of it is processed
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub net_weight: f64,
    pub processed_weight: f64,
}

impl MonthlyTotal {
    /// e.g. `Jan 2025`
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month))
    }
}

/// Collection trend, oldest month first.
pub fn monthly_collection<'a>(
    records: impl IntoIterator<Item = &'a ProcurementRecord>,
) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for record in records {
        let (collected, processed) = months
            .entry((record.date.year(), record.date.month()))
            .or_default();
        *collected += record.net_weight;
        if record.status == CollectionStatus::Processed {
            *processed += record.net_weight;
        }
    }
    months
        .into_iter()
        .map(|((year, month), (net_weight, processed_weight))| MonthlyTotal {
            year,
            month,
            net_weight,
            processed_weight,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_payments, sample_procurement, sample_suppliers};

    #[test]
    fn payment_summary_splits_paid_and_pending() {
        let mut payments = sample_payments();
        let summary = PaymentSummary::of(&payments);

        assert_eq!(summary.count, 5);
        assert_eq!(summary.paid_count, 2);
        assert_eq!(summary.pending_count, 3);
        assert_eq!(summary.suppliers_awaiting, 3);
        assert_eq!(summary.paid_amount, 100_000.0 + 235_000.0);
        assert_eq!(
            summary.total_amount,
            summary.paid_amount + summary.pending_amount
        );

        // Recomputed after a status change
        payments[1].mark_paid();
        let after = PaymentSummary::of(&payments);
        assert_eq!(after.paid_count, 3);
        assert_eq!(after.pending_amount, summary.pending_amount - payments[1].amount);
    }

    #[test]
    fn procurement_summary_counts_grades() {
        let records = sample_procurement();
        let summary = ProcurementSummary::of(&records);

        assert_eq!(summary.count, 5);
        assert_eq!(summary.grade_count(Grade::A), 3);
        assert_eq!(summary.grade_count(Grade::B), 2);
        assert_eq!(summary.grade_count(Grade::C), 0);
        assert_eq!(summary.pending_count, 2);
        assert!(summary.total_net < summary.total_gross);
    }

    #[test]
    fn supplier_summary_matches_collection() {
        let suppliers = sample_suppliers();
        let summary = SupplierSummary::of(&suppliers);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.total_collected_kg, 3432.0);
        assert_eq!(summary.total_paid, 692_980.0);

        let rest = SupplierSummary::of(suppliers.iter().skip(1));
        assert_eq!(rest.total_collected_kg, 2932.0);
    }

    #[test]
    fn empty_collections_sum_to_zero() {
        assert_eq!(PaymentSummary::of(&[]), PaymentSummary::default());
        assert_eq!(ProcurementSummary::of(&[]).count, 0);
        assert!(monthly_collection(&[]).is_empty());
    }

    #[test]
    fn monthly_collection_groups_by_month() {
        let mut records = sample_procurement();
        records[0].date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let trend = monthly_collection(&records);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].label(), "Jan 2025");
        assert_eq!(trend[1].label(), "Feb 2025");
        assert_eq!(trend[1].net_weight, records[0].net_weight);
    }

    #[test]
    fn monthly_collection_tracks_processed_weight() {
        let records = sample_procurement();
        let trend = monthly_collection(&records);
        assert_eq!(trend.len(), 1);

        let processed: f64 = records
            .iter()
            .filter(|r| r.status == CollectionStatus::Processed)
            .map(|r| r.net_weight)
            .sum();
        assert_eq!(trend[0].processed_weight, processed);
        assert!(trend[0].processed_weight < trend[0].net_weight);

        let mut all_pending = records.clone();
        for record in &mut all_pending {
            record.status = CollectionStatus::Pending;
        }
        assert_eq!(monthly_collection(&all_pending)[0].processed_weight, 0.0);
    }
}
