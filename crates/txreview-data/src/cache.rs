//! Per-key response cache shared by the feed clients

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Cached responses keyed by request
#[derive(Debug)]
pub struct ResponseCache<T> {
    enabled: bool,
    entries: Mutex<HashMap<String, T>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, T>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        self.entries().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: T) {
        if self.enabled {
            self.entries().insert(key.into(), value);
        }
    }

    /// Forget every cached response
    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
