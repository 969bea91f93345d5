//! The authoritative event collection.
//!
//! Every operation reads through the gateway and every mutation writes the
//! full list back. Mutations hold one async mutex across the whole
//! load-modify-store cycle, so overlapping saves from different screens
//! apply one after the other instead of overwriting each other.

use tokio::sync::{Mutex, RwLock};

use super::error::{CalendarError, CalendarResult};
use super::event::{optional_text, CalendarEvent, EventId, EventPatch, NewEvent};
use super::gateway::EventGateway;
use super::identity::{normalize_date, validate_title, IdGenerator};

pub struct Repository<G> {
    gateway: G,
    snapshot: RwLock<Vec<CalendarEvent>>,
    writer: Mutex<IdGenerator>,
}

impl<G: EventGateway> Repository<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            snapshot: RwLock::new(Vec::new()),
            writer: Mutex::new(IdGenerator::new()),
        }
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Last list seen by a successful load or store. May be stale.
    pub async fn snapshot(&self) -> Vec<CalendarEvent> {
        self.snapshot.read().await.clone()
    }

    /// Fetch the full collection. Read failures are logged and yield an
    /// empty list; the previous snapshot is kept.
    pub async fn load_all(&self) -> Vec<CalendarEvent> {
        match self.gateway.load_all().await {
            Ok(events) => {
                *self.snapshot.write().await = events.clone();
                events
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading events");
                Vec::new()
            }
        }
    }

    /// Look up one event. Unlike `load_all`, a failed read is reported as
    /// `Storage` instead of looking like a missing event.
    pub async fn find(&self, id: EventId) -> CalendarResult<CalendarEvent> {
        let events = match self.gateway.load_all().await {
            Ok(events) => {
                *self.snapshot.write().await = events.clone();
                events
            }
            Err(e) if e.is_corrupt() => {
                tracing::warn!(error = %e, "stored events unreadable");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading events");
                return Err(e.into());
            }
        };
        events
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(CalendarError::NotFound(id))
    }

    pub async fn create(&self, new: NewEvent) -> CalendarResult<CalendarEvent> {
        let title = validate_title(&new.title)?;
        let date = normalize_date(&new.date)?;

        let mut ids = self.writer.lock().await;
        let mut events = self.load_for_write().await?;

        let event = CalendarEvent {
            id: ids.next(&events),
            title,
            date,
            time: optional_text(new.time.as_deref()),
            description: optional_text(new.description.as_deref()),
            notes: optional_text(new.notes.as_deref()),
        };
        events.push(event.clone());
        self.commit(events).await?;

        tracing::info!(id = %event.id, date = %event.date, "created event");
        Ok(event)
    }

    /// Merge `patch` over the stored event. Fields left `None` keep their value.
    pub async fn update(&self, id: EventId, patch: EventPatch) -> CalendarResult<CalendarEvent> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        let date = patch.date.as_deref().map(normalize_date).transpose()?;

        let _writer = self.writer.lock().await;
        let mut events = self.load_for_write().await?;

        let slot = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(CalendarError::NotFound(id))?;

        if let Some(title) = title {
            slot.title = title;
        }
        if let Some(date) = date {
            slot.date = date;
        }
        if let Some(time) = patch.time.as_deref() {
            slot.time = optional_text(Some(time));
        }
        if let Some(description) = patch.description.as_deref() {
            slot.description = optional_text(Some(description));
        }
        if let Some(notes) = patch.notes.as_deref() {
            slot.notes = optional_text(Some(notes));
        }
        let updated = slot.clone();

        self.commit(events).await?;

        tracing::info!(id = %id, "updated event");
        Ok(updated)
    }

    /// Remove the event. Unknown ids are a no-op and nothing is written.
    pub async fn delete(&self, id: EventId) -> CalendarResult<()> {
        let _writer = self.writer.lock().await;
        let mut events = self.load_for_write().await?;

        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            tracing::debug!(id = %id, "delete of unknown event ignored");
            return Ok(());
        }

        self.commit(events).await?;
        tracing::info!(id = %id, "deleted event");
        Ok(())
    }

    async fn load_for_write(&self) -> CalendarResult<Vec<CalendarEvent>> {
        match self.gateway.load_all().await {
            Ok(events) => Ok(events),
            Err(e) if e.is_corrupt() => {
                tracing::warn!(error = %e, "stored events unreadable, starting from empty list");
                if let Err(e) = self.gateway.set_aside().await {
                    tracing::error!(error = %e, "Error moving unreadable events aside");
                    return Err(e.into());
                }
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading events");
                Err(e.into())
            }
        }
    }

    async fn commit(&self, events: Vec<CalendarEvent>) -> CalendarResult<()> {
        if let Err(e) = self.gateway.store_all(&events).await {
            tracing::error!(error = %e, "Error saving events");
            return Err(e.into());
        }
        *self.snapshot.write().await = events;
        Ok(())
    }
}
