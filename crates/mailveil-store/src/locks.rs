//! Per-document writer locks.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use mailveil_core::DocumentId;

/// One mutex per document id, created on first use and dropped once no
/// writer holds or waits on it.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<DocumentId, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `id`.
    pub fn with_lock<R>(&self, id: &DocumentId, f: impl FnOnce() -> R) -> R {
        // clone the Arc out so the dashmap shard is not held while `f` runs
        let lock = self.locks.entry(id.clone()).or_default().clone();
        let out = {
            let _guard = lock.lock();
            f()
        };
        drop(lock);
        // clones are taken under the shard lock, so a count of 1 means nobody else has it
        self.locks.remove_if(id, |_, l| Arc::strong_count(l) == 1);
        out
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_same_id_is_serialized() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));
        let id = DocumentId::new("doc").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (locks, inside, max_inside, id) =
                    (locks.clone(), inside.clone(), max_inside.clone(), id.clone());
                std::thread::spawn(move || {
                    locks.with_lock(&id, || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[test]
    fn test_entries_released_after_use() {
        let locks = KeyedLocks::new();
        for i in 0..100 {
            let id = DocumentId::new(format!("doc_{}", i)).unwrap();
            let inner = locks.with_lock(&id, || locks.len());
            assert_eq!(inner, 1);
        }
        assert!(locks.is_empty());
    }
}
