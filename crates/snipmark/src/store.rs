use anyhow::{anyhow, Result};
use dirs::home_dir;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::record::Record;

const RECORDS_FILE: &str = "records.json";
const CLIENT_ID_FILE: &str = "client_id";

/// Resolve the data root: `SNIPMARK_DATA_ROOT` override (tests depend on
/// this), else `~/.snipmark`.
pub fn get_data_root() -> Result<PathBuf> {
  if let Ok(root) = std::env::var("SNIPMARK_DATA_ROOT") {
    return Ok(PathBuf::from(root));
  }

  let home = home_dir().ok_or_else(|| anyhow!("Unable to determine home directory"))?;
  Ok(home.join(".snipmark"))
}

/// The single flat record collection, persisted as one JSON array.
///
/// Every operation transfers the whole collection; there is no locking and
/// no merge. Concurrent writers race and the last `append`/`replace_all`
/// wins. That matches the single-user usage this store is sized for
/// (hundreds of records, not millions).
pub struct RecordStore {
  root: PathBuf,
}

impl RecordStore {
  /// Open the store at the configured data root.
  pub fn open() -> Result<Self> {
    Ok(Self { root: get_data_root()? })
  }

  /// Open a store rooted at an explicit directory.
  pub fn at(root: impl AsRef<Path>) -> Self {
    Self { root: root.as_ref().to_path_buf() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn records_path(&self) -> PathBuf {
    self.root.join(RECORDS_FILE)
  }

  /// Read the full collection. A missing file is an empty collection, not
  /// an error; the store is created implicitly on first write.
  pub fn load_all(&self) -> Result<Vec<Record>> {
    let path = self.records_path();
    if !path.exists() {
      return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    let records: Vec<Record> = serde_json::from_str(&content)?;
    Ok(records)
  }

  /// Append one record: fetch, push, persist the entire collection back.
  pub fn append(&self, record: &Record) -> Result<()> {
    let mut records = self.load_all()?;
    records.push(record.clone());
    self.persist(&records)?;
    herald::event_success(&format!("Record {} appended ({} total)", record.id, records.len()));
    Ok(())
  }

  /// Replace the whole collection (the bulk-delete path).
  pub fn replace_all(&self, records: &[Record]) -> Result<()> {
    self.persist(records)?;
    herald::event_info(&format!("Collection rewritten ({} records)", records.len()));
    Ok(())
  }

  fn persist(&self, records: &[Record]) -> Result<()> {
    fs::create_dir_all(&self.root)?;
    let json = serde_json::to_string_pretty(records)?;
    if let Err(e) = fs::write(self.records_path(), json) {
      herald::error(&format!("Failed to persist records: {e}"));
      return Err(e.into());
    }
    Ok(())
  }

  /// Persistent client identifier, generated lazily on first access.
  pub fn client_id(&self) -> Result<String> {
    let path = self.root.join(CLIENT_ID_FILE);
    if path.exists() {
      return Ok(fs::read_to_string(&path)?.trim().to_string());
    }

    let id = Uuid::new_v4().to_string();
    fs::create_dir_all(&self.root)?;
    fs::write(&path, &id)?;
    Ok(id)
  }
}
