//! In-memory option repository for testing.
//!
//! Stores serialized option sets in a shared map instead of on disk.

use std::{
    collections::HashMap,
    io,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, learning::OptionSet, ports::OptionRepository};

/// In-memory repository for testing.
///
/// All clones share the same underlying storage.
///
/// # Examples
///
/// ```no_run
/// use oporto::adapters::InMemoryRepository;
/// use oporto::ports::OptionRepository;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// assert!(repo.load(Path::new("missing")).is_err());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored option sets.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&path.to_string_lossy().to_string())
    }
}

impl OptionRepository for InMemoryRepository {
    fn save(&self, options: &OptionSet, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec_named(options).map_err(|e| Error::SerializationContext {
            operation: "serialize option set for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<OptionSet> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load option set from in-memory storage at {path:?}"),
            source: io::Error::new(io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize option set from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::msgpack_repository::tests::sample_option_set, options::DeterministicOption,
    };

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let options = sample_option_set();
        let path = Path::new("options");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&options, path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        let loaded = repo.load(path).unwrap();
        assert_eq!(loaded.options[0].name(), "east");
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1.save(&sample_option_set(), Path::new("shared")).unwrap();
        assert!(repo2.load(Path::new("shared")).is_ok());
        assert_eq!(repo2.count(), 1);

        repo2.clear();
        assert_eq!(repo1.count(), 0);
        assert!(repo1.load(Path::new("missing")).is_err());
    }
}
