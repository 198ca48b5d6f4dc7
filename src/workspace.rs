use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{load_config, save_config, Config, CONFIG_TEMPLATE};
use crate::error::{LedgerError, Result};
use crate::model::{
    sample_payments, sample_procurement, sample_suppliers, PaymentRecord, ProcurementRecord,
    Supplier,
};
use crate::store::{JsonFileRepository, RecordStore};
use crate::weather::HumidityCache;

pub const SUPPLIERS_KEY: &str = "suppliers";
pub const PROCUREMENT_KEY: &str = "procurement";
pub const PAYMENTS_KEY: &str = "payments";

pub type SupplierStore = RecordStore<Supplier, JsonFileRepository>;
pub type ProcurementStore = RecordStore<ProcurementRecord, JsonFileRepository>;
pub type PaymentStore = RecordStore<PaymentRecord, JsonFileRepository>;

/// An initialized ledger directory: its config plus the stores and caches
/// that live next to it.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Create the directory and write the config template.
    pub fn init(dir: &Path) -> Result<()> {
        if dir.exists() {
            return Err(LedgerError::AlreadyInitialized(dir.to_path_buf()));
        }
        fs::create_dir_all(dir)?;
        fs::write(dir.join("config.toml"), CONFIG_TEMPLATE)?;
        info!(dir = %dir.display(), "initialized ledger");
        Ok(())
    }

    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Err(LedgerError::ConfigNotFound(dir.to_path_buf()));
        }
        let config = load_config(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            config,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_config(&self) -> Result<()> {
        save_config(&self.dir, &self.config)
    }

    pub fn currency(&self) -> &str {
        &self.config.business.currency_symbol
    }

    pub fn suppliers(&self) -> SupplierStore {
        RecordStore::open(
            JsonFileRepository::in_dir(&self.dir, SUPPLIERS_KEY),
            sample_suppliers,
        )
    }

    pub fn procurement(&self) -> ProcurementStore {
        RecordStore::open(
            JsonFileRepository::in_dir(&self.dir, PROCUREMENT_KEY),
            sample_procurement,
        )
    }

    pub fn payments(&self) -> PaymentStore {
        RecordStore::open(
            JsonFileRepository::in_dir(&self.dir, PAYMENTS_KEY),
            sample_payments,
        )
    }

    pub fn humidity(&self) -> HumidityCache {
        HumidityCache::in_dir(&self.dir)
    }
}
