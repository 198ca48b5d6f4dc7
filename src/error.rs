use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Config directory not found at {0}. Run 'evergreen init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {what} from {path}: {source}")]
    StateParse {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize {what}: {reason}")]
    Serialize { what: String, reason: String },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("{kind} #{id} not found")]
    RecordNotFound { kind: &'static str, id: u32 },

    #[error("No {kind} ids left to assign")]
    IdsExhausted { kind: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("Invalid grade '{0}'. Use A, B or C.")]
    InvalidGrade(String),

    #[error("Invalid page size {0}. Use 5, 10 or 25.")]
    InvalidPageSize(usize),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Rate for grade {grade} must be greater than zero (got {rate})")]
    InvalidRate { grade: String, rate: f64 },

    #[error("Unable to load weather: {0}")]
    Weather(String),

    #[error("Transfer to {0} was cancelled before it completed")]
    TransferCancelled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
