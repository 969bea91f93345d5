//! Storage boundary: bulk load and bulk store of the whole event list.
//!
//! The persisted form is one serialized JSON array kept under a single
//! key. There are no per-event records and no partial writes.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use super::error::StorageError;
use super::event::CalendarEvent;

pub trait EventGateway: Send + Sync {
    /// Read the full collection. A key that was never written is an empty list.
    fn load_all(&self) -> impl Future<Output = Result<Vec<CalendarEvent>, StorageError>> + Send;

    /// Replace the full collection.
    fn store_all(
        &self,
        events: &[CalendarEvent],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Move unreadable stored data out of the key so the next store starts
    /// fresh without destroying it.
    fn set_aside(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

fn decode(raw: &str) -> Result<Vec<CalendarEvent>, StorageError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let events: Option<Vec<CalendarEvent>> = serde_json::from_str(raw)?;
    Ok(events.unwrap_or_default())
}

fn encode(events: &[CalendarEvent]) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Events kept in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(dir: impl Into<PathBuf>, key: &str) -> Self {
        let path = dir.into().join(format!("{}.json", key));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Where unreadable data is kept: `<key>.json.corrupt`.
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }
}

impl EventGateway for JsonFileGateway {
    async fn load_all(&self) -> Result<Vec<CalendarEvent>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => decode(&raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store_all(&self, events: &[CalendarEvent]) -> Result<(), StorageError> {
        let json = encode(events)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename so readers never see half a file.
        let tmp = self.sibling(".tmp");
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), count = events.len(), "stored events");
        Ok(())
    }

    async fn set_aside(&self) -> Result<(), StorageError> {
        let target = self.corrupt_path();
        match tokio::fs::rename(&self.path, &target).await {
            Ok(()) => {
                tracing::warn!(path = %target.display(), "moved unreadable events aside");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process key-value slot holding the serialized list.
///
/// Loads yield to the scheduler before returning so that overlapping
/// mutations interleave the way they would against real storage.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryGateway {
    raw: tokio::sync::Mutex<Option<String>>,
    corrupt: tokio::sync::Mutex<Option<String>>,
    fail: std::sync::atomic::AtomicBool,
    stores: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: tokio::sync::Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn store_count(&self) -> usize {
        self.stores.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub async fn raw(&self) -> Option<String> {
        self.raw.lock().await.clone()
    }

    /// Payload last moved aside by `set_aside`.
    pub async fn corrupt(&self) -> Option<String> {
        self.corrupt.lock().await.clone()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory gateway set to fail".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
impl EventGateway for MemoryGateway {
    async fn load_all(&self) -> Result<Vec<CalendarEvent>, StorageError> {
        self.check()?;
        let raw = self.raw.lock().await.clone();
        tokio::task::yield_now().await;
        match raw {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    async fn store_all(&self, events: &[CalendarEvent]) -> Result<(), StorageError> {
        self.check()?;
        let json = encode(events)?;
        tokio::task::yield_now().await;
        *self.raw.lock().await = Some(json);
        self.stores
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    async fn set_aside(&self) -> Result<(), StorageError> {
        self.check()?;
        let raw = self.raw.lock().await.take();
        if raw.is_some() {
            *self.corrupt.lock().await = raw;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::EventId;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn event(id: u64, title: &str) -> CalendarEvent {
        CalendarEvent {
            id: EventId(id),
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: Some("09:00".to_string()),
            description: Some("checkup".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path(), "events");
        assert!(gateway.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_then_load() {
        let dir = tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path().join("nested"), "events");
        let events = vec![event(1, "Doctor"), event(2, "Gym")];

        gateway.store_all(&events).await.unwrap();

        assert!(gateway.path().exists());
        assert_eq!(gateway.load_all().await.unwrap(), events);
    }

    #[tokio::test]
    async fn store_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path(), "events");
        gateway.store_all(&[event(1, "Doctor")]).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["events.json".to_string()]);
    }

    #[tokio::test]
    async fn store_load_store_is_stable() {
        let dir = tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path(), "events");
        gateway
            .store_all(&[event(1, "Doctor"), event(2, "Gym")])
            .await
            .unwrap();
        let first = std::fs::read_to_string(gateway.path()).unwrap();

        let loaded = gateway.load_all().await.unwrap();
        gateway.store_all(&loaded).await.unwrap();

        assert_eq!(std::fs::read_to_string(gateway.path()).unwrap(), first);
        assert_eq!(gateway.load_all().await.unwrap(), loaded);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_as_corrupt() {
        let dir = tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path(), "events");
        std::fs::write(gateway.path(), "{not json").unwrap();

        let err = gateway.load_all().await.unwrap_err();
        assert!(err.is_corrupt());
    }

    #[tokio::test]
    async fn set_aside_keeps_unreadable_file() {
        let dir = tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path(), "events");
        std::fs::write(gateway.path(), "{not json").unwrap();

        gateway.set_aside().await.unwrap();

        assert!(!gateway.path().exists());
        assert_eq!(std::fs::read_to_string(gateway.corrupt_path()).unwrap(), "{not json");
        assert!(gateway.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_aside_without_file_is_a_no_op() {
        let dir = tempdir().unwrap();
        let gateway = JsonFileGateway::new(dir.path(), "events");
        gateway.set_aside().await.unwrap();
        assert!(!gateway.corrupt_path().exists());
    }

    #[tokio::test]
    async fn null_and_blank_payloads_are_empty() {
        assert!(MemoryGateway::with_raw("null").load_all().await.unwrap().is_empty());
        assert!(MemoryGateway::with_raw("  ").load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_gateway_can_fail() {
        let gateway = MemoryGateway::new();
        gateway.set_failing(true);
        assert!(gateway.load_all().await.is_err());
        assert!(gateway.store_all(&[]).await.is_err());
        assert_eq!(gateway.store_count(), 0);
    }
}
