pub mod error;
pub mod event;
pub mod filters;
pub mod gateway;
pub mod grid;
pub mod identity;
pub mod repository;

pub use error::CalendarError;
pub use event::{CalendarEvent, EventId};
pub use gateway::{EventGateway, JsonFileGateway};
pub use repository::Repository;
