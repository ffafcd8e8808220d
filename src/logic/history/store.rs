//! History Store - bounded, persisted log of past scans
//!
//! The log is kept newest-first and capped at [`HISTORY_CAPACITY`]; once
//! full, every append evicts the oldest record. Each append/clear rewrites
//! the whole log as a single unit.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::types::{HistoryError, HistoryLoadError, HistoryRecord};
use crate::constants::HISTORY_CAPACITY;
use crate::logic::classifier::ClassificationService;
use crate::logic::config::ScanConfig;
use crate::logic::scan::{ScanOrchestrator, SubmitOptions, SubmitOutcome};

pub struct HistoryStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl HistoryStore {
    /// Open a store backed by `path`. Nothing is read or written yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::open(config.history_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // PUBLIC API
    // ========================================================================

    /// Persisted log, newest first. Missing or unreadable data yields an empty log.
    pub fn load(&self) -> Vec<HistoryRecord> {
        match self.read_persisted() {
            Ok(mut records) => {
                records.truncate(HISTORY_CAPACITY);
                records
            }
            Err(HistoryLoadError::Io(e)) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!(
                    "Discarding unreadable scan history at {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Prepend `record`, keep the newest entries and persist before returning
    pub fn append(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock();

        let mut records = self.load();
        records.insert(0, record);
        if records.len() > HISTORY_CAPACITY {
            let evicted = records.len() - HISTORY_CAPACITY;
            records.truncate(HISTORY_CAPACITY);
            log::debug!("Evicted {} oldest history record(s)", evicted);
        }

        self.save(&records)
    }

    /// Empty the log and persist the empty state
    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock();
        self.save(&[])?;
        log::info!("Cleared scan history");
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<HistoryRecord, HistoryError> {
        let records = self.load();
        let len = records.len();
        records
            .into_iter()
            .nth(index)
            .ok_or(HistoryError::IndexOutOfRange { index, len })
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-run the scan stored at `index` without recording it again
    pub async fn replay<S: ClassificationService>(
        &self,
        index: usize,
        orchestrator: &ScanOrchestrator<S>,
    ) -> Result<SubmitOutcome, HistoryError> {
        let record = self.get(index)?;
        log::info!("Replaying history entry {}: {}", index, record.url);
        Ok(orchestrator
            .submit(&record.url, SubmitOptions { is_replay: true })
            .await)
    }

    // ========================================================================
    // DISK PERSISTENCE
    // ========================================================================

    fn read_persisted(&self) -> Result<Vec<HistoryRecord>, HistoryLoadError> {
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn save(&self, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        self.write_atomic(records)
            .map_err(|e| HistoryError::Persist(e.to_string()))
    }

    fn write_atomic(&self, records: &[HistoryRecord]) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec(records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
