//! Common test utilities
#![allow(dead_code)]

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use mia_core::error::{AppError, Result};
use mia_core::repository::marshal::{ATTR_KEY, ATTR_SORT};
use mia_core::repository::{Item, ProfileStore, ScanPage};
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// In-memory table keyed by `(key, sort)`.
///
/// Scans walk rows in key order and behave like the real service: a full page
/// always carries a continuation key, even when nothing is left.
#[derive(Default)]
pub struct InMemoryProfileStore {
    rows: Mutex<BTreeMap<(String, String), Item>>,
    put_failure: Mutex<Option<String>>,
    puts: AtomicUsize,
    scans: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with `cause`
    pub fn fail_puts_with(&self, cause: &str) {
        *self.put_failure.lock().unwrap() = Some(cause.to_string());
    }

    pub fn raw_row(&self, key: &str, sort: &str) -> Option<Item> {
        self.rows
            .lock()
            .unwrap()
            .get(&(key.to_string(), sort.to_string()))
            .cloned()
    }

    pub fn insert_raw(&self, item: Item) {
        let key = row_key(&item).expect("row without key attributes");
        self.rows.lock().unwrap().insert(key, item);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

fn string_attr(item: &Item, name: &str) -> Option<String> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Some(value.clone()),
        _ => None,
    }
}

fn row_key(item: &Item) -> Option<(String, String)> {
    Some((string_attr(item, ATTR_KEY)?, string_attr(item, ATTR_SORT)?))
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, key: &str, sort: &str) -> Result<Option<Item>> {
        Ok(self.raw_row(key, sort))
    }

    async fn put(&self, item: Item) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(cause) = self.put_failure.lock().unwrap().clone() {
            return Err(AppError::Store(cause));
        }
        let key = row_key(&item)
            .ok_or_else(|| AppError::Store("missing key attributes".to_string()))?;
        self.rows.lock().unwrap().insert(key, item);
        Ok(())
    }

    async fn scan_page(
        &self,
        exclusive_start_key: Option<Item>,
        page_size: i32,
    ) -> Result<ScanPage> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let start = exclusive_start_key.as_ref().and_then(row_key);
        let rows = self.rows.lock().unwrap();

        let items: Vec<Item> = rows
            .iter()
            .filter(|(key, _)| start.as_ref().map_or(true, |s| *key > s))
            .take(page_size as usize)
            .map(|(_, item)| item.clone())
            .collect();

        let last_evaluated_key = if items.len() == page_size as usize {
            items.last().and_then(row_key).map(|(key, sort)| {
                HashMap::from([
                    (ATTR_KEY.to_string(), AttributeValue::S(key)),
                    (ATTR_SORT.to_string(), AttributeValue::S(sort)),
                ])
            })
        } else {
            None
        };

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}

/// Log lines written while a capture guard is alive
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

pub struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route JSON logs for the current thread into a buffer.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let buffer = logs.0.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || CapturedWriter(buffer.clone()))
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
