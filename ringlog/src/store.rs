//! Fixed-capacity ring of committed records
//!
//! Records are kept oldest first starting at `tail`. When all slots are
//! taken, the next commit replaces the oldest record and hands it back to
//! the caller.
//!
//! ```text
//!   tail               head
//!    │                  │
//!    ▼                  ▼
//! ┌──────┬──────┬──────┬──────┬──────┐
//! │ r1   │ r2   │ r3   │      │      │
//! └──────┴──────┴──────┴──────┴──────┘
//!  global offsets: r1 = [0, len1), r2 = [len1, len1+len2), ...
//! ```
//!
//! The store does no locking of its own; see `crate::guard`.

use std::fmt;

use tracing::trace;

use crate::config::LogConfig;
use crate::error::Result;
use crate::record::Record;

pub struct RecordStore {
    slots: Box<[Option<Record>]>,
    /// Next slot to write
    head: usize,
    /// Oldest valid record
    tail: usize,
    full: bool,
    /// Sum of lengths of all committed records
    total_size: usize,
}

impl RecordStore {
    /// Create an empty store
    ///
    /// # Errors
    ///
    /// `LogError::InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        LogConfig::with_capacity(capacity).validate()?;
        Ok(Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            full: false,
            total_size: 0,
        })
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of committed records
    #[must_use]
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity()
        } else {
            (self.head + self.capacity() - self.tail) % self.capacity()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Logical size of the stream: all committed bytes
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Translate a global byte offset into a record and an offset inside it
    ///
    /// Returns `None` if `global_offset` is at or past the end of the
    /// stream.
    #[must_use]
    pub fn find_by_offset(&self, global_offset: usize) -> Option<(&Record, usize)> {
        let mut running_total = 0;
        for record in self.iter() {
            running_total += record.len();
            if running_total > global_offset {
                return Some((record, global_offset - (running_total - record.len())));
            }
        }
        None
    }

    /// Commit a record at `head`
    ///
    /// If the store was full, the oldest record is evicted and returned.
    /// Dropping the returned value releases it.
    pub fn add_record(&mut self, record: Record) -> Option<Record> {
        let was_full = self.full;
        let record_len = record.len();

        let evicted = self.slots[self.head].replace(record);
        debug_assert_eq!(evicted.is_some(), was_full);

        self.total_size += record_len;
        if let Some(old) = &evicted {
            self.total_size -= old.len();
            trace!(slot = self.head, len = old.len(), "evicting oldest record");
        }

        self.head = (self.head + 1) % self.capacity();
        if was_full {
            self.tail = self.head;
        }
        if self.head == self.tail {
            self.full = true;
        }

        evicted
    }

    /// Drop all records and return to the empty state
    pub fn reset(&mut self) {
        for slot in &mut *self.slots {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.full = false;
        self.total_size = 0;
    }

    /// Committed records, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        let capacity = self.capacity();
        (0..self.len()).filter_map(move |i| self.slots[(self.tail + i) % capacity].as_ref())
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecordStore(capacity={}, head={}, tail={}, full={}, records={}, size={})",
            self.capacity(),
            self.head,
            self.tail,
            self.full,
            self.len(),
            self.total_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;

    fn rec(s: &str) -> Record {
        Record::from(s.as_bytes())
    }

    fn contents(store: &RecordStore) -> Vec<String> {
        store
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RecordStore::new(10).unwrap();
        assert!(store.is_empty());
        assert!(!store.is_full());
        assert_eq!(store.len(), 0);
        assert_eq!(store.total_size(), 0);
        assert!(store.find_by_offset(0).is_none());
    }

    #[test]
    fn test_fills_up_to_capacity() {
        let mut store = RecordStore::new(3).unwrap();
        assert!(store.add_record(rec("a\n")).is_none());
        assert!(store.add_record(rec("bb\n")).is_none());
        assert_eq!(store.len(), 2);
        assert!(!store.is_full());

        assert!(store.add_record(rec("ccc\n")).is_none());
        assert_eq!(store.len(), 3);
        assert!(store.is_full());
        assert_eq!(store.total_size(), 9);
    }

    #[test]
    fn test_eviction_keeps_most_recent_in_order() {
        let capacity = 3;
        let mut store = RecordStore::new(capacity).unwrap();
        let mut evicted = Vec::new();

        for k in 0..8 {
            if let Some(old) = store.add_record(rec(&format!("r{k}\n"))) {
                evicted.push(old);
            }
            // Invariants after every insertion
            assert!(store.head < capacity && store.tail < capacity);
            if store.is_full() {
                assert_eq!(store.head, store.tail);
            }
        }

        assert_eq!(contents(&store), vec!["r5\n", "r6\n", "r7\n"]);
        let evicted: Vec<String> = evicted
            .into_iter()
            .map(|r| String::from_utf8_lossy(&r).into_owned())
            .collect();
        assert_eq!(evicted, vec!["r0\n", "r1\n", "r2\n", "r3\n", "r4\n"]);
        assert_eq!(store.total_size(), 9);
    }

    #[test]
    fn test_tail_follows_head_across_wraparound() {
        // The k-th insertion past capacity must move tail even when head
        // wrapped to a smaller index than tail.
        let mut store = RecordStore::new(2).unwrap();
        store.add_record(rec("a\n"));
        store.add_record(rec("b\n"));
        assert_eq!((store.head, store.tail), (0, 0));

        store.add_record(rec("c\n"));
        assert_eq!((store.head, store.tail), (1, 1));

        store.add_record(rec("d\n"));
        assert_eq!((store.head, store.tail), (0, 0));
        assert_eq!(contents(&store), vec!["c\n", "d\n"]);
    }

    #[test]
    fn test_find_by_offset_every_byte() {
        let mut store = RecordStore::new(4).unwrap();
        let parts = ["one\n", "\n", "three\n"];
        for p in parts {
            store.add_record(rec(p));
        }
        let stream = parts.concat();

        for (o, expected) in stream.bytes().enumerate() {
            let (record, local) = store.find_by_offset(o).unwrap();
            assert!(local < record.len());
            assert_eq!(record[local], expected);
        }
        assert!(store.find_by_offset(stream.len()).is_none());
        assert!(store.find_by_offset(stream.len() + 100).is_none());
    }

    #[test]
    fn test_find_by_offset_after_eviction() {
        let mut store = RecordStore::new(2).unwrap();
        store.add_record(rec("a\n"));
        store.add_record(rec("b\n"));
        store.add_record(rec("c\n"));

        let (record, local) = store.find_by_offset(0).unwrap();
        assert_eq!(record.as_bytes(), b"b\n");
        assert_eq!(local, 0);

        let (record, local) = store.find_by_offset(3).unwrap();
        assert_eq!(record.as_bytes(), b"c\n");
        assert_eq!(local, 1);

        assert!(store.find_by_offset(4).is_none());
    }

    #[test]
    fn test_reset() {
        let mut store = RecordStore::new(2).unwrap();
        store.add_record(rec("a\n"));
        store.add_record(rec("b\n"));
        store.add_record(rec("c\n"));

        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.total_size(), 0);
        assert_eq!((store.head, store.tail, store.full), (0, 0, false));

        assert!(store.add_record(rec("d\n")).is_none());
        assert_eq!(contents(&store), vec!["d\n"]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = RecordStore::new(0).unwrap_err();
        assert!(matches!(err, LogError::InvalidConfig(_)));
    }

    #[test]
    fn test_capacity_one() {
        let mut store = RecordStore::new(1).unwrap();
        assert!(store.add_record(rec("a\n")).is_none());
        assert!(store.is_full());
        let old = store.add_record(rec("b\n")).unwrap();
        assert_eq!(old.as_bytes(), b"a\n");
        assert_eq!(contents(&store), vec!["b\n"]);
    }
}
