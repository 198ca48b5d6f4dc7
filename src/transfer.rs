//! Simulated bank transfer delay.
//!
//! The state change a transfer produces is applied only when the delay runs
//! to completion. Cancelling first (Ctrl-C from the command line) drops it.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::model::PaymentRecord;
use crate::store::{RecordStore, Repository};

/// Run `complete` once `delay` has elapsed, unless `cancel` fires first.
pub async fn after_delay<T>(
    delay: Duration,
    cancel: &CancellationToken,
    complete: impl FnOnce() -> T,
) -> Option<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("transfer cancelled");
            None
        }
        _ = tokio::time::sleep(delay) => Some(complete()),
    }
}

/// Block on [`after_delay`] with Ctrl-C wired to `cancel`.
///
/// Returns `Ok(None)` when the transfer was interrupted or `cancel` had
/// already fired.
pub fn run_transfer<T>(
    delay: Duration,
    cancel: &CancellationToken,
    complete: impl FnOnce() -> T,
) -> Result<Option<T>> {
    if cancel.is_cancelled() {
        return Ok(None);
    }
    if delay.is_zero() {
        return Ok(Some(complete()));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        debug!(delay_ms = delay.as_millis() as u64, "waiting for transfer");
        after_delay(delay, cancel, complete).await
    });

    Ok(outcome)
}

/// What a mark-paid request ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Transferred { supplier: String, amount: f64 },
    AlreadyPaid,
}

/// Transfer payment `id` and mark it paid once `delay` has run out.
///
/// Paid records are left alone. A cancel before the delay ends returns
/// [`LedgerError::TransferCancelled`] and nothing is written.
pub fn settle_payment<R: Repository<PaymentRecord>>(
    store: &mut RecordStore<PaymentRecord, R>,
    id: u32,
    delay: Duration,
    cancel: &CancellationToken,
) -> Result<Settlement> {
    let record = store.find(id)?;
    if record.is_paid() {
        return Ok(Settlement::AlreadyPaid);
    }
    let supplier = record.supplier.clone();
    let amount = record.amount;

    match run_transfer(delay, cancel, || store.update(id, PaymentRecord::mark_paid))? {
        Some(updated) => {
            updated?;
            info!(id, supplier = %supplier, "payment marked paid");
            Ok(Settlement::Transferred { supplier, amount })
        }
        None => Err(LedgerError::TransferCancelled(supplier)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_payments;
    use crate::store::{JsonFileRepository, MemoryRepository};
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn completes_after_delay() {
        let cancel = CancellationToken::new();
        let out = after_delay(Duration::from_millis(5), &cancel, || 42).await;
        assert_eq!(out, Some(42));
    }

    #[tokio::test]
    async fn cancellation_drops_the_update() {
        let cancel = CancellationToken::new();
        let mut applied = false;

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            trigger.cancel();
        });

        let out = after_delay(Duration::from_secs(30), &cancel, || applied = true).await;
        assert_eq!(out, None);
        assert!(!applied);
    }

    #[tokio::test]
    async fn already_cancelled_never_runs() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let out = after_delay(Duration::ZERO, &cancel, || "done").await;
        assert_eq!(out, None);
    }

    #[test]
    fn zero_delay_runs_immediately() {
        let out = run_transfer(Duration::ZERO, &CancellationToken::new(), || 7).unwrap();
        assert_eq!(out, Some(7));
    }

    #[test]
    fn short_delay_runs_on_its_own_runtime() {
        let mut paid = false;
        let out = run_transfer(Duration::from_millis(5), &CancellationToken::new(), || {
            paid = true;
        })
        .unwrap();
        assert_eq!(out, Some(()));
        assert!(paid);
    }

    fn payments_in(dir: &TempDir) -> RecordStore<PaymentRecord, JsonFileRepository> {
        RecordStore::open(
            JsonFileRepository::in_dir(dir.path(), "payments"),
            sample_payments,
        )
    }

    #[test]
    fn settles_pending_payment_once() {
        let dir = TempDir::new().unwrap();
        let mut store = payments_in(&dir);
        let cancel = CancellationToken::new();

        let first = settle_payment(&mut store, 2, Duration::ZERO, &cancel).unwrap();
        assert_eq!(
            first,
            Settlement::Transferred {
                supplier: "Hashan Hewage".to_string(),
                amount: 94_850.0,
            }
        );

        let again = settle_payment(&mut store, 2, Duration::ZERO, &cancel).unwrap();
        assert_eq!(again, Settlement::AlreadyPaid);
        assert!(payments_in(&dir).find(2).unwrap().is_paid());
    }

    #[test]
    fn cancelled_transfer_leaves_payments_file_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = payments_in(&dir);
        settle_payment(&mut store, 3, Duration::ZERO, &CancellationToken::new()).unwrap();
        let path = dir.path().join("payments.json");
        let before = fs::read_to_string(&path).unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = settle_payment(&mut store, 2, Duration::ZERO, &cancel).unwrap_err();

        assert!(matches!(err, LedgerError::TransferCancelled(ref s) if s == "Hashan Hewage"));
        assert!(!store.find(2).unwrap().is_paid());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn cancel_during_delay_writes_nothing() {
        let repo = MemoryRepository::new("payments");
        let mut store = RecordStore::open(repo.clone(), sample_payments);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            trigger.cancel();
        });

        let result = settle_payment(&mut store, 5, Duration::from_secs(30), &cancel);
        canceller.join().unwrap();

        assert!(matches!(result, Err(LedgerError::TransferCancelled(_))));
        assert!(!store.find(5).unwrap().is_paid());
        assert!(repo.raw().is_none());
    }

    #[test]
    fn unknown_payment_is_not_found() {
        let mut store = RecordStore::open(MemoryRepository::new("payments"), sample_payments);
        let err = settle_payment(&mut store, 99, Duration::ZERO, &CancellationToken::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Payment #99 not found");
    }
}
