//! Shared progress store
//!
//! Workers publish finished unit snapshots here and the render loop polls
//! them back out. The store keeps its whole contents as one serialized
//! region behind a mutex: a 4-byte big-endian length prefix followed by
//! the JSON-encoded map of unit id to snapshot. The region starts at a
//! configured capacity and doubles on overflow up to a hard ceiling;
//! past the ceiling a write fails with `CapacityExceeded` and the
//! last-good contents stay intact.

use std::collections::HashMap;
use std::sync::Mutex;

use convoy_core::domain::unit::UnitSnapshot;
use convoy_core::error::PipelineError;
use tracing::debug;
use uuid::Uuid;

const LENGTH_PREFIX: usize = 4;

/// Capacity-bounded snapshot store shared between workers and the renderer
pub struct ProgressStore {
    region: Mutex<Vec<u8>>,
    limit: usize,
}

impl ProgressStore {
    /// Creates a store with the given initial capacity and hard ceiling,
    /// seeded with an empty map
    pub fn new(initial_capacity: usize, limit: usize) -> Result<Self, PipelineError> {
        let store = Self {
            region: Mutex::new(vec![0; initial_capacity.max(LENGTH_PREFIX)]),
            limit,
        };

        {
            let mut region = store.lock()?;
            Self::write(&mut region, store.limit, &HashMap::new())?;
        }

        Ok(store)
    }

    /// Returns the latest published snapshot for `id`, if any
    pub fn get(&self, id: Uuid) -> Result<Option<UnitSnapshot>, PipelineError> {
        let region = self.lock()?;
        let contents = Self::read(&region)?;
        Ok(contents.get(&id).cloned())
    }

    /// Inserts or overwrites the snapshot for `id`
    ///
    /// Grows the region as needed; fails with `CapacityExceeded` when the
    /// encoded contents would not fit even at the ceiling. The lock is
    /// released on every path.
    pub fn set(&self, id: Uuid, snapshot: UnitSnapshot) -> Result<(), PipelineError> {
        let mut region = self.lock()?;
        let mut contents = Self::read(&region)?;
        contents.insert(id, snapshot);
        Self::write(&mut region, self.limit, &contents)
    }

    /// Current region capacity in bytes
    pub fn capacity(&self) -> Result<usize, PipelineError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<u8>>, PipelineError> {
        self.region.lock().map_err(|_| PipelineError::LockPoisoned)
    }

    fn read(region: &[u8]) -> Result<HashMap<Uuid, UnitSnapshot>, PipelineError> {
        let mut length_bytes = [0u8; LENGTH_PREFIX];
        length_bytes.copy_from_slice(&region[..LENGTH_PREFIX]);
        let length = u32::from_be_bytes(length_bytes) as usize;

        Ok(serde_json::from_slice(
            &region[LENGTH_PREFIX..LENGTH_PREFIX + length],
        )?)
    }

    fn write(
        region: &mut Vec<u8>,
        limit: usize,
        contents: &HashMap<Uuid, UnitSnapshot>,
    ) -> Result<(), PipelineError> {
        let encoded = serde_json::to_vec(contents)?;
        let needed = encoded.len() + LENGTH_PREFIX;

        let mut capacity = region.len();
        while needed > capacity {
            capacity = capacity.saturating_mul(2).max(1);
        }

        if capacity > limit {
            return Err(PipelineError::CapacityExceeded { limit });
        }

        if capacity != region.len() {
            debug!(capacity, "growing progress store region");
            // growth recreates the region; contents are rewritten in full
            *region = vec![0; capacity];
        }

        region[..LENGTH_PREFIX].copy_from_slice(&(encoded.len() as u32).to_be_bytes());
        region[LENGTH_PREFIX..needed].copy_from_slice(&encoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_core::domain::unit::UnitStatus;

    fn snapshot(output: Option<String>) -> UnitSnapshot {
        UnitSnapshot {
            id: Uuid::new_v4(),
            label: Some("unit".to_string()),
            status: UnitStatus::Success,
            output,
            error_messages: vec![],
            warning_messages: vec![],
        }
    }

    #[test]
    fn test_get_on_empty_store() {
        let store = ProgressStore::new(1024, 1 << 20).unwrap();
        assert!(store.get(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let store = ProgressStore::new(1024, 1 << 20).unwrap();
        let snapshot = snapshot(Some("done".to_string()));
        let id = snapshot.id;

        store.set(id, snapshot).unwrap();

        let fetched = store.get(id).unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.output.as_deref(), Some("done"));
    }

    #[test]
    fn test_get_is_idempotent_between_writes() {
        let store = ProgressStore::new(1024, 1 << 20).unwrap();
        let snapshot = snapshot(Some("stable".to_string()));
        let id = snapshot.id;
        store.set(id, snapshot).unwrap();

        let first = store.get(id).unwrap().unwrap();
        let second = store.get(id).unwrap().unwrap();
        assert_eq!(first.output, second.output);
        assert_eq!(first.status, second.status);
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let store = ProgressStore::new(1024, 1 << 20).unwrap();
        let mut snapshot = snapshot(Some("first".to_string()));
        let id = snapshot.id;
        store.set(id, snapshot.clone()).unwrap();

        snapshot.output = Some("second".to_string());
        store.set(id, snapshot).unwrap();

        assert_eq!(
            store.get(id).unwrap().unwrap().output.as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_region_grows_for_large_payload() {
        let store = ProgressStore::new(64, 1 << 20).unwrap();
        let payload = "x".repeat(4096);
        let snapshot = snapshot(Some(payload.clone()));
        let id = snapshot.id;

        store.set(id, snapshot).unwrap();

        assert!(store.capacity().unwrap() > 64);
        assert_eq!(store.get(id).unwrap().unwrap().output, Some(payload));
    }

    #[test]
    fn test_ceiling_rejects_oversized_payload_and_keeps_last_good() {
        let store = ProgressStore::new(64, 2048).unwrap();
        let small = snapshot(Some("small".to_string()));
        let small_id = small.id;
        store.set(small_id, small).unwrap();

        let oversized = snapshot(Some("y".repeat(8192)));
        let error = store.set(oversized.id, oversized).unwrap_err();
        assert!(error.is_capacity_exceeded());

        // previous contents survive the failed write
        assert_eq!(
            store.get(small_id).unwrap().unwrap().output.as_deref(),
            Some("small")
        );
    }

    #[test]
    fn test_many_keys() {
        let store = ProgressStore::new(256, 1 << 20).unwrap();
        let snapshots: Vec<UnitSnapshot> =
            (0..20).map(|n| snapshot(Some(format!("out-{n}")))).collect();

        for snapshot in &snapshots {
            store.set(snapshot.id, snapshot.clone()).unwrap();
        }

        for snapshot in &snapshots {
            assert_eq!(
                store.get(snapshot.id).unwrap().unwrap().output,
                snapshot.output
            );
        }
    }
}
