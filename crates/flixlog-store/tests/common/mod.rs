#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use flixlog_store::{Journal, KeyValueStore, MemoryStore, Result, StoreError};
use serde_json::Value;

pub fn memory_journal() -> Journal {
    Journal::new(Arc::new(MemoryStore::new()))
}

/// Memory-backed store whose reads and writes can be made to fail.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected read failure".into()));
        }
        self.inner.get(keys).await
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        self.inner.set(entries).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        self.inner.remove(keys).await
    }
}

/// Timestamps of a show's annotations, in stored order.
pub fn timestamps(show: &flixlog_store::ShowRecord) -> Vec<u64> {
    show.annotations.iter().map(|a| a.timestamp).collect()
}
