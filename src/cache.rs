//! Per-client identity cache for domain objects.
//!
//! Each entity kind gets its own [`EntityCache`]. An id is either unknown
//! (no entry), bound to exactly one live object, or marked as known to be
//! absent on the server. Entries are never evicted or replaced for the
//! lifetime of the client, so two lookups of the same id always yield the
//! same `Arc`.

use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Numeric id shared by every Crabber entity.
pub type EntityId = i64;

/// What the cache knows about an id.
#[derive(Debug)]
pub enum Lookup<T> {
    /// The id has never been resolved.
    Unknown,
    /// The server reported the id as not found.
    Absent,
    /// The canonical object for the id.
    Present(Arc<T>),
}

impl<T> Lookup<T> {
    /// Returns `true` unless the id has never been resolved.
    pub fn is_known(&self) -> bool {
        !matches!(self, Lookup::Unknown)
    }

    /// The cached object, if any.
    pub fn into_option(self) -> Option<Arc<T>> {
        match self {
            Lookup::Present(object) => Some(object),
            Lookup::Unknown | Lookup::Absent => None,
        }
    }
}

#[derive(Debug)]
enum Slot<T> {
    Absent,
    Present(Arc<T>),
}

/// Id-keyed store of canonical objects of one kind.
#[derive(Debug)]
pub struct EntityCache<T> {
    slots: Mutex<HashMap<EntityId, Slot<T>>>,
}

impl<T> EntityCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    // Critical sections never leave the map half-updated.
    fn slots(&self) -> MutexGuard<'_, HashMap<EntityId, Slot<T>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Looks up an id without touching the network.
    pub fn lookup(&self, id: EntityId) -> Lookup<T> {
        match self.slots().get(&id) {
            None => Lookup::Unknown,
            Some(Slot::Absent) => Lookup::Absent,
            Some(Slot::Present(object)) => Lookup::Present(Arc::clone(object)),
        }
    }

    /// Returns the object bound to `id`, constructing and binding it with
    /// `build` if the id is unknown.
    ///
    /// Check, construction and insertion happen under one lock, so two
    /// callers racing on the same id always end up with the same object. An
    /// id marked absent stays absent: `build` is not called and the result
    /// is `None`.
    pub fn get_or_insert_with<F>(&self, id: EntityId, build: F) -> Result<Option<Arc<T>>>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut slots = self.slots();
        match slots.get(&id) {
            Some(Slot::Present(object)) => return Ok(Some(Arc::clone(object))),
            Some(Slot::Absent) => return Ok(None),
            None => {}
        }
        let object = Arc::new(build()?);
        slots.insert(id, Slot::Present(Arc::clone(&object)));
        Ok(Some(object))
    }

    /// Records that the server does not know `id`. Ids already bound to an
    /// object keep their object.
    pub fn mark_absent(&self, id: EntityId) {
        self.slots().entry(id).or_insert(Slot::Absent);
    }

    /// Returns the first cached object matching `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<Arc<T>>
    where
        P: FnMut(&T) -> bool,
    {
        self.slots().values().find_map(|slot| match slot {
            Slot::Present(object) if predicate(object) => Some(Arc::clone(object)),
            _ => None,
        })
    }

    /// Number of ids the cache knows about, absent ones included.
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// Returns `true` if no id has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the `id` of a raw record, rejecting empty records.
pub(crate) fn record_id(record: &Value, kind: &'static str) -> Result<EntityId> {
    let fields = match record.as_object() {
        Some(fields) if !fields.is_empty() => fields,
        _ => return Err(Error::EmptyRecord { kind }),
    };
    fields
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::DeserializationFailed {
            raw_response: record.to_string(),
            serde_error: format!("{kind} record has no integer `id`"),
            status: http::StatusCode::OK,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Named(&'static str);

    #[test]
    fn test_first_insert_wins() {
        let cache = EntityCache::new();
        let first = cache.get_or_insert_with(1, || Ok(Named("first"))).unwrap().unwrap();
        let second = cache.get_or_insert_with(1, || Ok(Named("second"))).unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.0, "first");
    }

    #[test]
    fn test_absent_is_distinct_from_unknown() {
        let cache: EntityCache<Named> = EntityCache::new();
        assert!(matches!(cache.lookup(-2), Lookup::Unknown));

        cache.mark_absent(-2);
        assert!(matches!(cache.lookup(-2), Lookup::Absent));
        assert!(cache.lookup(-2).is_known());
        assert!(cache.lookup(-2).into_option().is_none());
    }

    #[test]
    fn test_absent_id_is_never_rebound() {
        let cache: EntityCache<Named> = EntityCache::new();
        cache.mark_absent(5);

        let built = AtomicUsize::new(0);
        let result = cache
            .get_or_insert_with(5, || {
                built.fetch_add(1, Ordering::SeqCst);
                Ok(Named("late"))
            })
            .unwrap();

        assert!(result.is_none());
        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert!(matches!(cache.lookup(5), Lookup::Absent));
    }

    #[test]
    fn test_mark_absent_keeps_existing_object() {
        let cache = EntityCache::new();
        let object = cache.get_or_insert_with(3, || Ok(Named("kept"))).unwrap().unwrap();
        cache.mark_absent(3);

        match cache.lookup(3) {
            Lookup::Present(found) => assert!(Arc::ptr_eq(&found, &object)),
            other => panic!("Expected Present, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_build_leaves_id_unknown() {
        let cache: EntityCache<Named> = EntityCache::new();
        let result = cache.get_or_insert_with(4, || Err(Error::EmptyRecord { kind: "crab" }));

        assert!(matches!(result, Err(Error::EmptyRecord { .. })));
        assert!(matches!(cache.lookup(4), Lookup::Unknown));
    }

    #[test]
    fn test_find_by_predicate() {
        let cache = EntityCache::new();
        cache.get_or_insert_with(1, || Ok(Named("jake"))).unwrap();
        cache.get_or_insert_with(2, || Ok(Named("pytest"))).unwrap();

        assert_eq!(cache.find(|n| n.0 == "pytest").unwrap().0, "pytest");
        assert!(cache.find(|n| n.0 == "nobody").is_none());
    }

    #[test]
    fn test_concurrent_inserts_build_once() {
        let cache = Arc::new(EntityCache::new());
        let builds = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let builds = Arc::clone(&builds);
                std::thread::spawn(move || {
                    cache
                        .get_or_insert_with(42, || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            Ok(Named("crab"))
                        })
                        .unwrap()
                        .unwrap()
                })
            })
            .collect();

        let objects: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(objects.iter().all(|o| Arc::ptr_eq(o, &objects[0])));
    }

    #[test]
    fn test_record_id_rejects_empty_records() {
        assert!(matches!(
            record_id(&json!({}), "molt"),
            Err(Error::EmptyRecord { kind: "molt" })
        ));
        assert!(matches!(
            record_id(&Value::Null, "crab"),
            Err(Error::EmptyRecord { kind: "crab" })
        ));
        assert!(matches!(
            record_id(&json!({"username": "x"}), "crab"),
            Err(Error::DeserializationFailed { .. })
        ));
        assert_eq!(record_id(&json!({"id": 12}), "crab").unwrap(), 12);
    }
}
