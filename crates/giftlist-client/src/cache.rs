use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use giftlist_types::{Gift, NewGift};

use crate::error::ClientError;
use crate::store::{KeyValueStore, StoreError};

/// Key the serialized gift array lives under.
pub const CACHE_KEY: &str = "gift_suggestions";

/// Whole-array mirror of the gift list on top of a key/value store.
///
/// Every operation reads or rewrites the full array; there are no partial
/// updates.
#[derive(Debug)]
pub struct LocalCache<S> {
    store: S,
}

impl<S: KeyValueStore> LocalCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored gifts in stored order. Missing, unreadable or corrupt data
    /// reads as an empty list.
    pub fn read_all(&self) -> Vec<Gift> {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Local cache unreadable: {}", e);
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Local cache is corrupt, treating as empty: {}", e);
            Vec::new()
        })
    }

    pub fn write_all(&mut self, gifts: &[Gift]) -> Result<(), StoreError> {
        let json = serde_json::to_string(gifts)?;
        self.store.set(CACHE_KEY, json)
    }

    /// Create a gift that exists only locally. Its id is the current time in
    /// milliseconds, bumped past any id already cached. When an imported id
    /// already sits at `i64::MAX`, the lowest free positive id is used.
    pub fn add_one(&mut self, gift: NewGift) -> Result<Gift, StoreError> {
        let mut gifts = self.read_all();
        let now = Utc::now();

        let max_id = gifts.iter().map(|g| g.id).max().unwrap_or(0);
        let id = match max_id.checked_add(1) {
            Some(next) => now.timestamp_millis().max(next),
            None => {
                let taken: HashSet<i64> = gifts.iter().map(|g| g.id).collect();
                (1..=i64::MAX).find(|id| !taken.contains(id)).unwrap_or_default()
            }
        };

        let created = Gift {
            id,
            nome: gift.nome,
            presente: gift.presente,
            link: gift.link,
            created_at: now,
        };
        gifts.insert(0, created.clone());
        self.write_all(&gifts)?;
        Ok(created)
    }

    /// Prepend a gift that already has an id, replacing any cached copy.
    pub fn insert(&mut self, gift: Gift) -> Result<(), StoreError> {
        let mut gifts = self.read_all();
        gifts.retain(|g| g.id != gift.id);
        gifts.insert(0, gift);
        self.write_all(&gifts)
    }

    /// Returns `false` when no cached gift had that id.
    pub fn remove_by_id(&mut self, id: i64) -> Result<bool, StoreError> {
        let mut gifts = self.read_all();
        let before = gifts.len();
        gifts.retain(|g| g.id != id);
        if gifts.len() == before {
            return Ok(false);
        }
        self.write_all(&gifts)?;
        Ok(true)
    }

    /// Write the cached array to `path` as pretty JSON.
    pub fn export_to(&self, path: &Path) -> Result<usize, ClientError> {
        let gifts = self.read_all();
        let json = serde_json::to_string_pretty(&gifts).map_err(StoreError::from)?;
        std::fs::write(path, json).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Exported {} gifts to {}", gifts.len(), path.display());
        Ok(gifts.len())
    }

    /// Replace the cache with the gifts in `path`. Entries with a blank name
    /// or gift are dropped, duplicate ids keep their first occurrence, and the
    /// result is stored newest first.
    pub fn import_from(&mut self, path: &Path) -> Result<usize, ClientError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: Vec<Gift> =
            serde_json::from_str(&raw).map_err(|source| ClientError::InvalidFile {
                path: path.to_path_buf(),
                source,
            })?;

        let total = parsed.len();
        let mut seen = HashSet::new();
        let mut gifts: Vec<Gift> = parsed
            .into_iter()
            .filter(|g| !g.nome.trim().is_empty() && !g.presente.trim().is_empty())
            .filter(|g| seen.insert(g.id))
            .collect();
        gifts.sort_by(Gift::newest_first);

        if gifts.len() < total {
            warn!("Skipped {} invalid or duplicate gifts", total - gifts.len());
        }

        self.write_all(&gifts)?;
        info!("Imported {} gifts from {}", gifts.len(), path.display());
        Ok(gifts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn gift(id: i64, presente: &str, secs: i64) -> Gift {
        Gift {
            id,
            nome: "Ana".into(),
            presente: presente.into(),
            link: String::new(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    fn cache() -> LocalCache<MemoryStore> {
        LocalCache::new(MemoryStore::new())
    }

    #[test]
    fn corrupt_entry_reads_empty() {
        let mut store = MemoryStore::new();
        store.set(CACHE_KEY, "[{\"id\":".into()).unwrap();
        assert!(LocalCache::new(store).read_all().is_empty());
    }

    #[test]
    fn add_one_prepends_with_fresh_id() {
        let mut cache = cache();
        cache.write_all(&[gift(1, "Old", 0)]).unwrap();

        let before = Utc::now();
        let created = cache.add_one(NewGift::new("Ana", "Livro", "")).unwrap();

        assert!(created.id > 1);
        assert!(created.created_at >= before - Duration::seconds(1));
        let all = cache.read_all();
        assert_eq!(all[0], created);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn add_one_ids_never_collide() {
        let mut cache = cache();
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        cache.write_all(&[gift(far_future, "Future", 0)]).unwrap();

        let a = cache.add_one(NewGift::new("Ana", "A", "")).unwrap();
        let b = cache.add_one(NewGift::new("Bia", "B", "")).unwrap();
        assert_eq!(a.id, far_future + 1);
        assert_eq!(b.id, far_future + 2);
    }

    #[test]
    fn add_one_with_id_at_i64_max() {
        let mut cache = cache();
        cache.write_all(&[gift(i64::MAX, "Imported", 0), gift(1, "Low", 0)]).unwrap();

        let created = cache.add_one(NewGift::new("Ana", "Livro", "")).unwrap();
        assert_eq!(created.id, 2);

        let ids: Vec<i64> = cache.read_all().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2, i64::MAX, 1]);
    }

    #[test]
    fn insert_replaces_existing_copy() {
        let mut cache = cache();
        cache.write_all(&[gift(5, "Stale", 0), gift(6, "Other", 0)]).unwrap();
        cache.insert(gift(5, "Fresh", 10)).unwrap();

        let items: Vec<String> = cache.read_all().into_iter().map(|g| g.presente).collect();
        assert_eq!(items, vec!["Fresh", "Other"]);
    }

    #[test]
    fn remove_by_id_only_drops_match() {
        let mut cache = cache();
        cache.write_all(&[gift(1, "A", 0), gift(2, "B", 0)]).unwrap();

        assert!(cache.remove_by_id(1).unwrap());
        assert!(!cache.remove_by_id(1).unwrap());
        let ids: Vec<i64> = cache.read_all().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn export_then_import_reproduces_records() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gifts.json");

        let mut source = cache();
        source
            .write_all(&[gift(1, "A", 10), gift(3, "C", 30), gift(2, "B", 20)])
            .unwrap();
        assert_eq!(source.export_to(&file).unwrap(), 3);

        let mut target = cache();
        assert_eq!(target.import_from(&file).unwrap(), 3);

        let mut expected = source.read_all();
        expected.sort_by(Gift::newest_first);
        assert_eq!(target.read_all(), expected);
    }

    #[test]
    fn import_drops_invalid_and_duplicate_records() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gifts.json");
        let mut blank = gift(2, "  ", 20);
        blank.nome = "Bia".into();
        let json = serde_json::to_string(&[gift(1, "A", 10), blank, gift(1, "Dup", 30)]).unwrap();
        std::fs::write(&file, json).unwrap();

        let mut target = cache();
        assert_eq!(target.import_from(&file).unwrap(), 1);
        assert_eq!(target.read_all()[0].presente, "A");
    }

    #[test]
    fn import_rejects_unparsable_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gifts.json");
        std::fs::write(&file, "not json").unwrap();

        let mut target = cache();
        target.write_all(&[gift(1, "Keep", 0)]).unwrap();
        assert!(matches!(
            target.import_from(&file),
            Err(ClientError::InvalidFile { .. })
        ));
        assert_eq!(target.read_all().len(), 1);
    }
}
