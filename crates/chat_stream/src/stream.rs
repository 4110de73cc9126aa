use std::sync::{Arc, Mutex, MutexGuard};

use crate::data_part::{DataPart, DataParts};

/// Append-only provider of out-of-band data parts.
///
/// Clones share the same underlying sequence, so a transport worker can push while the
/// session reads snapshots. Every `push` publishes a fresh snapshot; readers never see a
/// snapshot change in place.
#[derive(Debug, Clone)]
pub struct DataStream {
    current: Arc<Mutex<DataParts>>,
}

impl DataStream {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(empty_parts())),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DataParts {
        Arc::clone(&lock_unpoisoned(&self.current))
    }

    /// Appends one part and publishes a new snapshot.
    pub fn push(&self, part: DataPart) {
        let mut current = lock_unpoisoned(&self.current);
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(part);
        *current = DataParts::from(next);
    }

    /// Drops every buffered part and publishes an empty snapshot.
    pub fn reset(&self) {
        *lock_unpoisoned(&self.current) = empty_parts();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.current).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DataStream {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_parts() -> DataParts {
    DataParts::from(Vec::new())
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
