//! Persistence services for creature snapshots.

use crate::error::{IoError, Result};
use crate::serialization::{read_json_file, write_json_file};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use vivarium_core::PersistenceService;
use vivarium_data::{CreatureId, StatSnapshot};

pub const SAVE_FORMAT_VERSION: u32 = 1;

/// On-disk envelope around a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub snapshot: StatSnapshot,
}

impl SaveRecord {
    #[must_use]
    pub fn new(snapshot: StatSnapshot) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            saved_at: Utc::now(),
            snapshot,
        }
    }
}

/// Keeps snapshots in a shared map. Clones share the same storage, so a test
/// can hand one clone to the habitat and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    records: Arc<Mutex<HashMap<CreatureId, StatSnapshot>>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &CreatureId) -> Option<StatSnapshot> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.get(id).cloned()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<CreatureId> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<_> = records.keys().cloned().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceService for MemoryPersistence {
    fn save(&mut self, id: &CreatureId, snapshot: &StatSnapshot) -> anyhow::Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert(id.clone(), snapshot.clone());
        Ok(())
    }

    fn load(&mut self, id: &CreatureId) -> anyhow::Result<Option<StatSnapshot>> {
        Ok(self.get(id))
    }

    fn remove(&mut self, id: &CreatureId) -> anyhow::Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.remove(id);
        Ok(())
    }
}

/// One JSON file per creature, named after its id, inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    /// Creates `dir` if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating save directory {:?}", dir))
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, id: &CreatureId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn read_record(&self, id: &CreatureId) -> Result<Option<SaveRecord>> {
        match read_json_file::<SaveRecord, _>(self.path_for(id)) {
            Ok(record) => {
                if record.version > SAVE_FORMAT_VERSION {
                    return Err(IoError::validation(format!(
                        "save for {id} has version {} (newest supported is {SAVE_FORMAT_VERSION})",
                        record.version
                    )));
                }
                if record.snapshot.id != *id {
                    return Err(IoError::validation(format!(
                        "save file for {id} contains {}",
                        record.snapshot.id
                    )));
                }
                Ok(Some(record))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Every stored creature id, sorted. Files whose names are not creature
    /// ids are skipped.
    pub fn list(&self) -> Result<Vec<CreatureId>> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| IoError::FileSystem(e).with_context(format!("listing {:?}", self.dir)))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(id) = stem.parse::<CreatureId>() {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl PersistenceService for JsonFilePersistence {
    fn save(&mut self, id: &CreatureId, snapshot: &StatSnapshot) -> anyhow::Result<()> {
        write_json_file(&SaveRecord::new(snapshot.clone()), self.path_for(id))?;
        tracing::debug!(creature = %id, "Saved creature");
        Ok(())
    }

    fn load(&mut self, id: &CreatureId) -> anyhow::Result<Option<StatSnapshot>> {
        Ok(self.read_record(id)?.map(|r| r.snapshot))
    }

    fn remove(&mut self, id: &CreatureId) -> anyhow::Result<()> {
        match std::fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IoError::FileSystem(e)
                .with_context(format!("removing save for {id}"))
                .into()),
        }
    }
}
