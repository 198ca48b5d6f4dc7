use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{LedgerError, Result};

/// Durable storage for one record collection.
///
/// `load` returns `Ok(None)` when nothing has been stored yet, and an error
/// when stored content exists but cannot be read back.
pub trait Repository<T> {
    fn load(&self) -> Result<Option<Vec<T>>>;
    fn save(&self, records: &[T]) -> Result<()>;

    /// Highest id ever handed out for this collection, if one was recorded
    fn load_last_id(&self) -> Result<Option<u32>>;
    fn save_last_id(&self, id: u32) -> Result<()>;

    /// Where the collection lives, for log messages
    fn location(&self) -> String;
}

fn decode<T: DeserializeOwned>(raw: &str, origin: PathBuf) -> Result<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| LedgerError::DataParse {
        path: origin,
        source: e,
    })
}

fn encode<T: Serialize>(records: &[T], what: &str) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| LedgerError::Serialize {
        what: what.to_string(),
        reason: e.to_string(),
    })
}

/// Last issued id per collection key, kept in `counters.toml`.
fn read_counters(path: &Path) -> Result<BTreeMap<String, u32>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| LedgerError::StateParse {
        what: "id counters",
        path: path.to_path_buf(),
        source: e,
    })
}

/// A collection stored as a JSON array in a single file.
///
/// The id counter lives in `counters.toml` beside the file, keyed by the
/// file stem, so it survives deletes of the highest record.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
    key: String,
    counters: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let counters = path.with_file_name("counters.toml");
        Self {
            path,
            key,
            counters,
        }
    }

    /// `<dir>/<key>.json`
    pub fn in_dir(dir: &Path, key: &str) -> Self {
        Self::new(dir.join(format!("{key}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> for JsonFileRepository {
    fn load(&self) -> Result<Option<Vec<T>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        decode(&content, self.path.clone()).map(Some)
    }

    fn save(&self, records: &[T]) -> Result<()> {
        let content = encode(records, &self.path.display().to_string())?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn load_last_id(&self) -> Result<Option<u32>> {
        Ok(read_counters(&self.counters)?.get(&self.key).copied())
    }

    fn save_last_id(&self, id: u32) -> Result<()> {
        // A damaged counters file is rebuilt; record ids still bound the next id
        let mut counters = read_counters(&self.counters).unwrap_or_default();
        counters.insert(self.key.clone(), id);
        let content = toml::to_string(&counters).map_err(|e| LedgerError::Serialize {
            what: "id counters".to_string(),
            reason: e.to_string(),
        })?;
        if let Some(parent) = self.counters.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.counters, content)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory key slot holding the serialized collection.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    key: String,
    slot: Rc<RefCell<Option<String>>>,
    last_id: Rc<Cell<Option<u32>>>,
}

impl MemoryRepository {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slot: Rc::default(),
            last_id: Rc::default(),
        }
    }

    /// Pre-seed the slot with raw content, valid or not.
    pub fn with_raw(key: impl Into<String>, raw: impl Into<String>) -> Self {
        let repo = Self::new(key);
        *repo.slot.borrow_mut() = Some(raw.into());
        repo
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn last_id(&self) -> Option<u32> {
        self.last_id.get()
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> for MemoryRepository {
    fn load(&self) -> Result<Option<Vec<T>>> {
        match self.slot.borrow().as_deref() {
            Some(raw) => decode(raw, PathBuf::from(&self.key)).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, records: &[T]) -> Result<()> {
        let content = encode(records, &self.key)?;
        *self.slot.borrow_mut() = Some(content);
        Ok(())
    }

    fn load_last_id(&self) -> Result<Option<u32>> {
        Ok(self.last_id.get())
    }

    fn save_last_id(&self, id: u32) -> Result<()> {
        self.last_id.set(Some(id));
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory:{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_suppliers, Supplier};
    use tempfile::TempDir;

    #[test]
    fn file_repository_round_trips_collection() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path(), "suppliers");

        let loaded: Option<Vec<Supplier>> = repo.load().unwrap();
        assert!(loaded.is_none());

        let suppliers = sample_suppliers();
        repo.save(&suppliers).unwrap();
        assert!(dir.path().join("suppliers.json").exists());

        let loaded: Vec<Supplier> = repo.load().unwrap().unwrap();
        assert_eq!(loaded, suppliers);
    }

    #[test]
    fn file_repository_reports_malformed_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("suppliers.json"), "{not json").unwrap();
        let repo = JsonFileRepository::in_dir(dir.path(), "suppliers");

        let loaded: Result<Option<Vec<Supplier>>> = repo.load();
        assert!(matches!(loaded, Err(LedgerError::DataParse { .. })));
    }

    #[test]
    fn file_repositories_share_one_counters_file() {
        let dir = TempDir::new().unwrap();
        let suppliers = JsonFileRepository::in_dir(dir.path(), "suppliers");
        let payments = JsonFileRepository::in_dir(dir.path(), "payments");

        assert_eq!(Repository::<Supplier>::load_last_id(&suppliers).unwrap(), None);

        Repository::<Supplier>::save_last_id(&suppliers, 7).unwrap();
        Repository::<Supplier>::save_last_id(&payments, 12).unwrap();

        let content = fs::read_to_string(dir.path().join("counters.toml")).unwrap();
        assert!(content.contains("suppliers = 7"));
        assert!(content.contains("payments = 12"));
        assert_eq!(Repository::<Supplier>::load_last_id(&suppliers).unwrap(), Some(7));
    }

    #[test]
    fn damaged_counters_file_is_reported_then_rebuilt() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("counters.toml"), "suppliers = \"six\"").unwrap();
        let repo = JsonFileRepository::in_dir(dir.path(), "suppliers");

        let err = Repository::<Supplier>::load_last_id(&repo).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read id counters"));

        Repository::<Supplier>::save_last_id(&repo, 8).unwrap();
        assert_eq!(Repository::<Supplier>::load_last_id(&repo).unwrap(), Some(8));
    }

    #[test]
    fn memory_repository_clones_share_slot() {
        let repo = MemoryRepository::new("suppliers");
        let handle = repo.clone();
        Repository::<Supplier>::save(&repo, &sample_suppliers()[..1]).unwrap();

        let raw = handle.raw().unwrap();
        assert!(raw.contains("Sanath Nishantha"));
    }
}
