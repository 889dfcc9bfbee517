// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Persistence of the last good schedule

use crate::config::CacheSettings;
use crate::error::Result;
use crate::schedule::DailySchedule;
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key-value boundary for the cached schedule. A record is always replaced
/// as a whole.
pub trait ScheduleStore: Send + Sync {
    fn load(&self) -> Result<Option<DailySchedule>>;
    fn save(&self, schedule: &DailySchedule) -> Result<()>;
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for Box<T> {
    fn load(&self) -> Result<Option<DailySchedule>> {
        (**self).load()
    }

    fn save(&self, schedule: &DailySchedule) -> Result<()> {
        (**self).save(schedule)
    }
}

/// JSON file `<dir>/<key>.json`
#[derive(Debug)]
pub struct FileScheduleStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileScheduleStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(&settings.dir, &settings.key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for FileScheduleStore {
    fn load(&self) -> Result<Option<DailySchedule>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, schedule: &DailySchedule) -> Result<()> {
        let _guard = self.write_lock.lock();
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        // Atomic write: readers see either the old or the new record
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, schedule)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    record: RwLock<Option<DailySchedule>>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: DailySchedule) -> Self {
        Self {
            record: RwLock::new(Some(schedule)),
        }
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn load(&self) -> Result<Option<DailySchedule>> {
        Ok(self.record.read().clone())
    }

    fn save(&self, schedule: &DailySchedule) -> Result<()> {
        *self.record.write() = Some(schedule.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutageError;
    use crate::slot::Slot;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    const OVERLAPPING_RECORD: &str = r#"{
        "date": "17.10",
        "updatedAt": "2025-10-17T06:30:00Z",
        "subqueues": {"1.1": ["10:00 - 12:00", "11:00 - 13:00"]}
    }"#;

    fn schedule(slot: &str) -> DailySchedule {
        DailySchedule {
            date: Some("17.10".parse().unwrap()),
            updated_at: Utc::now(),
            subqueues: BTreeMap::from([("1.1".to_owned(), vec![slot.parse::<Slot>().unwrap()])]),
        }
    }

    #[test]
    fn test_file_store_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileScheduleStore::new(dir.path(), "latest");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileScheduleStore::new(dir.path().join("nested"), "latest");
        assert!(store.path().ends_with("nested/latest.json"));

        let first = schedule("10:00 - 12:00");
        store.save(&first).unwrap();
        assert_eq!(store.load().unwrap(), Some(first));

        let second = schedule("14:00 - 16:00");
        store.save(&second).unwrap();
        assert_eq!(store.load().unwrap(), Some(second));

        // no temp files left next to the record
        let entries = std::fs::read_dir(dir.path().join("nested")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_file_store_corrupt_record() {
        let dir = TempDir::new().unwrap();
        let store = FileScheduleStore::new(dir.path(), "latest");
        std::fs::write(store.path(), "{ half written").unwrap();
        assert!(matches!(store.load(), Err(OutageError::Json(_))));
    }

    #[test]
    fn test_file_store_rejects_overlapping_slots() {
        let dir = TempDir::new().unwrap();
        let store = FileScheduleStore::new(dir.path(), "latest");
        std::fs::write(store.path(), OVERLAPPING_RECORD).unwrap();
        assert!(matches!(store.load(), Err(OutageError::Json(_))));
    }

    #[test]
    fn test_readers_never_see_partial_writes() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileScheduleStore::new(dir.path(), "latest"));
        store.save(&schedule("00:00 - 01:00")).unwrap();

        let writers: Vec<_> = ["10:00 - 12:00", "14:00 - 16:00"]
            .into_iter()
            .map(|slot| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let record = schedule(slot);
                    for _ in 0..200 {
                        store.save(&record).unwrap();
                    }
                })
            })
            .collect();

        let reader = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..1000 {
                    let loaded = store.load().expect("record must always parse");
                    assert!(loaded.is_some());
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let last = store.load().unwrap().unwrap();
        let slot = last.subqueues["1.1"][0].to_string();
        assert!(slot == "10:00 - 12:00" || slot == "14:00 - 16:00", "{slot}");
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryScheduleStore::new();
        assert!(store.load().unwrap().is_none());
        let record = schedule("00:00 - 24:00");
        store.save(&record).unwrap();
        assert_eq!(store.load().unwrap(), Some(record));
    }
}
