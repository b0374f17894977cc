//! LRU cache of query results
//!
//! Entries live in a slab of nodes linked into a recency list (head is the
//! most recently used, tail the least). A `HashMap` maps each normalized
//! query to its slot, so lookup, promotion and eviction are all O(1). The
//! whole structure sits behind one `parking_lot::Mutex`; a hit promotes the
//! entry and therefore takes the lock exclusively too.

use crate::error::CacheError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use quickeval_types::CalculationResult;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

/// Capacity used by [`ResultCache::default`]
pub const DEFAULT_CAPACITY: usize = 100;

/// Cache key for a query: trimmed and lower-cased
pub fn normalize_key(query: &str) -> String {
    query.trim().to_lowercase()
}

#[derive(Debug)]
struct Node {
    key: String,
    results: Vec<CalculationResult>,
    timestamp: DateTime<Utc>,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Default)]
struct LruList {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LruList {
    fn node(&self, slot: usize) -> Option<&Node> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn unlink(&mut self, slot: usize) {
        let Some((prev, next)) = self.node(slot).map(|n| (n.prev, n.next)) else {
            return;
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn promote(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn remove(&mut self, slot: usize) -> Option<Node> {
        self.unlink(slot);
        let node = self.slots.get_mut(slot).and_then(Option::take)?;
        self.index.remove(&node.key);
        self.free.push(slot);
        Some(node)
    }

    fn insert_front(&mut self, node: Node) {
        let key = node.key.clone();
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.push_front(slot);
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Keys from most to least recently used
    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(node) = cursor.and_then(|slot| self.node(slot)) {
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }
}

/// Snapshot of cache occupancy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub count: usize,
    pub capacity: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

impl CacheStats {
    pub fn usage_percentage(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 * 100.0 / self.capacity as f64
        }
    }
}

/// Bounded, thread-safe LRU cache mapping queries to their results
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    inner: Mutex<LruList>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            inner: Mutex::new(LruList::default()),
        }
    }
}

impl ResultCache {
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            inner: Mutex::new(LruList::default()),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `query`, promoting it to most recently used on a hit. The
    /// returned list is a copy.
    pub fn try_get(&self, query: &str) -> Option<Vec<CalculationResult>> {
        let key = normalize_key(query);
        if key.is_empty() {
            return None;
        }

        let mut list = self.inner.lock();
        let Some(&slot) = list.index.get(&key) else {
            trace!(%key, "cache miss");
            return None;
        };
        list.promote(slot);
        trace!(%key, "cache hit");
        list.node(slot).map(|node| node.results.clone())
    }

    /// Store `results` for `query`, replacing any previous entry. Empty
    /// queries and empty result lists are ignored.
    pub fn set(&self, query: &str, results: &[CalculationResult]) {
        let key = normalize_key(query);
        if key.is_empty() || results.is_empty() {
            return;
        }

        let mut list = self.inner.lock();
        if let Some(&slot) = list.index.get(&key) {
            list.remove(slot);
        } else if list.len() >= self.capacity {
            if let Some(evicted) = list.tail.and_then(|tail| list.remove(tail)) {
                trace!(key = %evicted.key, "cache eviction");
            }
        }

        list.insert_front(Node {
            key,
            results: results.to_vec(),
            timestamp: Utc::now(),
            prev: None,
            next: None,
        });
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let list = self.inner.lock();
        CacheStats {
            count: list.len(),
            capacity: self.capacity,
            oldest_entry: list.tail.and_then(|slot| list.node(slot)).map(|n| n.timestamp),
            newest_entry: list.head.and_then(|slot| list.node(slot)).map(|n| n.timestamp),
        }
    }

    /// Cached keys from most to least recently used
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().keys()
    }
}
