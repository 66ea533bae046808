//! Client side of the Gothic Calendar planner.
//!
//! The state container keeps events and calendar navigation in memory; the
//! sync module loads them once from the events functions and pushes every
//! change back through a debounced save.

pub mod backup;
pub mod config;
pub mod state;
pub mod sync;

pub use backup::{backup_json, write_backup, BACKUP_FILE_NAME};
pub use config::ClientConfig;
pub use state::{Action, DayCell, EventDraft, HourSlot, PlannerState};
pub use sync::{load_events, EventsApi, HttpEventsApi, SaveScheduler};
