//! Background media sync: controller, progress log, observer events and
//! the backend seam.

mod backend;
mod events;
mod folder;
mod log;
pub mod messages;
mod syncer;

pub use backend::{
    media_sync_endpoint, MediaSyncBackend, MediaSyncError, MediaSyncProgress, NetworkErrorKind,
    SyncErrorKind,
};
pub use events::{EventBus, EventStream, MediaSyncEvent};
pub use folder::FolderMediaBackend;
pub use log::{LogPayload, SyncLog, SyncLogEntry};
pub use syncer::{MediaSyncer, StartOutcome};
