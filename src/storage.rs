use std::collections::HashMap;
use std::path::PathBuf;
use crate::error::MediakeepError;

/// Logical blob names. Each one maps to a single JSON file in the workdir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Media,
    Trash,
    Collections,
    Analytics,
}

impl StoreKey {
    pub fn filename(&self) -> &'static str {
        match self {
            StoreKey::Media => "mediakeep_items.json",
            StoreKey::Trash => "mediakeep_trash.json",
            StoreKey::Collections => "mediakeep_collections.json",
            StoreKey::Analytics => "mediakeep_analytics.json",
        }
    }
}

/// Synchronous whole-blob key-value persistence. A write replaces the
/// entire blob; there are no partial updates.
pub trait BlobStorage {
    fn read(&self, key: StoreKey) -> Result<Option<String>, MediakeepError>;
    fn write(&mut self, key: StoreKey, payload: &str) -> Result<(), MediakeepError>;
}

pub struct FileStorage {
    workdir: PathBuf,
}

impl FileStorage {
    pub fn new(workdir: PathBuf) -> anyhow::Result<Self> {
        Ok(Self { workdir })
    }
}

impl BlobStorage for FileStorage {
    fn read(&self, key: StoreKey) -> Result<Option<String>, MediakeepError> {
        let path = self.workdir.join(key.filename());
        if !path.exists() {
            return Ok(None);
        }
        let payload = std::fs::read_to_string(&path)
            .map_err(MediakeepError::BlobIoError)?;
        Ok(Some(payload))
    }

    fn write(&mut self, key: StoreKey, payload: &str) -> Result<(), MediakeepError> {
        let path = self.workdir.join(key.filename());
        std::fs::write(&path, payload)
            .map_err(MediakeepError::BlobIoError)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    blobs: HashMap<StoreKey, String>,
}

impl BlobStorage for InMemoryStorage {
    fn read(&self, key: StoreKey) -> Result<Option<String>, MediakeepError> {
        Ok(self.blobs.get(&key).cloned())
    }

    fn write(&mut self, key: StoreKey, payload: &str) -> Result<(), MediakeepError> {
        self.blobs.insert(key, payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        assert!(storage.read(StoreKey::Media).unwrap().is_none());
        storage.write(StoreKey::Media, "[]").unwrap();
        assert_eq!(storage.read(StoreKey::Media).unwrap().as_deref(), Some("[]"));
        assert!(storage.read(StoreKey::Trash).unwrap().is_none());
    }

    #[test]
    fn in_memory_storage_roundtrip() {
        let mut storage = InMemoryStorage::default();
        storage.write(StoreKey::Analytics, "{}").unwrap();
        assert_eq!(storage.read(StoreKey::Analytics).unwrap().as_deref(), Some("{}"));
    }
}
