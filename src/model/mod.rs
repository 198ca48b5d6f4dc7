mod grade;
mod payment;
mod procurement;
mod supplier;

pub use grade::{Grade, GradeRates};
pub use payment::{payment_amount, sample_payments, PaymentForm, PaymentRecord, PaymentStatus};
pub use procurement::{
    net_weight, sample_procurement, CollectionForm, CollectionStatus, ProcurementRecord,
};
pub use supplier::{sample_suppliers, NewSupplier, Supplier, SupplierPatch};

use crate::error::{LedgerError, Result};

/// Reject blank required form fields.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Largest weight a single batch or payment may carry
pub const MAX_WEIGHT_KG: f64 = 100_000.0;

pub(crate) fn require_weight(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LedgerError::Validation(
            "Weight must be greater than 0".to_string(),
        ));
    }
    if value > MAX_WEIGHT_KG {
        return Err(LedgerError::Validation(format!(
            "Weight must be at most {MAX_WEIGHT_KG} kg (got {value})"
        )));
    }
    Ok(())
}

/// Round to two decimal places, the precision weights and amounts are shown with.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
