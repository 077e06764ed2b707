//! In-memory collection for tests and `memory://` stores.
//!
//! Records are kept in insertion order behind a mutex; clones share the data,
//! so several sessions can read and write the same collection.

use std::sync::{Arc, Mutex, MutexGuard};

use shelterdash_core::prelude::{AnimalRecord, Changes, Query};

use crate::error::{Error, Result};
use crate::store::Collection;

#[derive(Clone, Default)]
pub struct MemoryCollection {
    data: Arc<Mutex<Vec<AnimalRecord>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated collection (used by tests).
    pub fn with_records(records: impl IntoIterator<Item = AnimalRecord>) -> Self {
        Self {
            data: Arc::new(Mutex::new(records.into_iter().collect())),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<AnimalRecord>>> {
        self.data
            .lock()
            .map_err(|_| Error::QueryFailure("memory collection lock poisoned".into()))
    }
}

impl Collection for MemoryCollection {
    fn describe(&self) -> String {
        "memory://".to_string()
    }

    fn ping(&self) -> Result<()> {
        self.lock().map(|_| ())
    }

    fn insert_one(&self, record: AnimalRecord) -> Result<()> {
        self.lock()?.push(record);
        Ok(())
    }

    fn find(&self, query: &Query) -> Result<Vec<AnimalRecord>> {
        let data = self.lock()?;
        Ok(data.iter().filter(|r| query.matches(r)).cloned().collect())
    }

    fn update_many(&self, query: &Query, changes: &Changes) -> Result<u64> {
        let mut data = self.lock()?;
        // Validate every change before writing any, so a bad value leaves the
        // collection untouched.
        let mut staged = Vec::new();
        for (idx, record) in data.iter().enumerate() {
            if query.matches(record) {
                let (next, changed) = record.with_changes(changes)?;
                if changed {
                    staged.push((idx, next));
                }
            }
        }
        let modified = staged.len() as u64;
        for (idx, next) in staged {
            data[idx] = next;
        }
        Ok(modified)
    }

    fn delete_many(&self, query: &Query) -> Result<u64> {
        let mut data = self.lock()?;
        let before = data.len();
        data.retain(|r| !query.matches(r));
        Ok((before - data.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelterdash_core::query::Predicate;
    use shelterdash_core::types::Scalar;

    fn named(name: &str) -> AnimalRecord {
        AnimalRecord {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    fn by_name(name: &str) -> Query {
        Query::new().with("name", Predicate::Eq(name.into()))
    }

    #[test]
    fn find_preserves_insertion_order() {
        let c = MemoryCollection::new();
        for n in ["b", "a", "c"] {
            c.insert_one(named(n)).unwrap();
        }
        let names: Vec<_> = c
            .find(&Query::new())
            .unwrap()
            .into_iter()
            .filter_map(|r| r.name)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn update_counts_only_changed_records() {
        let c = MemoryCollection::with_records([named("a"), named("a"), named("b")]);
        let mut changes = Changes::new();
        changes.insert("name".into(), Scalar::from("z"));
        assert_eq!(c.update_many(&by_name("a"), &changes).unwrap(), 2);
        assert_eq!(c.update_many(&by_name("z"), &changes).unwrap(), 0);
        assert_eq!(c.find(&by_name("z")).unwrap().len(), 2);
    }

    #[test]
    fn bad_update_leaves_collection_untouched() {
        let c = MemoryCollection::with_records([named("a")]);
        let mut changes = Changes::new();
        changes.insert("name".into(), Scalar::from("ok"));
        changes.insert("location_lat".into(), Scalar::from("north"));
        assert!(c.update_many(&Query::new(), &changes).is_err());
        assert_eq!(c.find(&by_name("a")).unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_matches() {
        let c = MemoryCollection::with_records([named("a"), named("b")]);
        assert_eq!(c.delete_many(&by_name("a")).unwrap(), 1);
        assert_eq!(c.len().unwrap(), 1);
        assert_eq!(c.delete_many(&Query::new()).unwrap(), 1);
        assert!(c.is_empty().unwrap());
    }

    #[test]
    fn clones_share_data() {
        let c = MemoryCollection::new();
        let other = c.clone();
        c.insert_one(named("a")).unwrap();
        assert_eq!(other.len().unwrap(), 1);
    }

    #[test]
    fn poisoned_lock_is_a_query_failure() {
        let c = MemoryCollection::with_records([named("a")]);
        let shared = c.clone();
        let _ = std::thread::spawn(move || {
            let _held = shared.data.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(matches!(c.len(), Err(Error::QueryFailure(_))));
        assert!(matches!(c.is_empty(), Err(Error::QueryFailure(_))));
        assert!(matches!(c.find(&Query::new()), Err(Error::QueryFailure(_))));
    }
}
