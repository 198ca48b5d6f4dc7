pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod store;
pub mod transfer;
pub mod view;
pub mod weather;
pub mod workspace;

pub use config::Config;
pub use error::{LedgerError, Result};
pub use model::{Grade, GradeRates, PaymentRecord, ProcurementRecord, Supplier};
pub use store::{JsonFileRepository, MemoryRepository, Record, RecordStore, Repository};
pub use view::{ListView, PageNav, PageSize, PageWindow, Period, ViewState};
pub use workspace::Workspace;
