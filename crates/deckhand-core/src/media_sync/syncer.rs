//! Single-flight media sync controller.
//!
//! The controller is owned by one foreground context. All state changes,
//! log appends and observer notifications happen in its `&mut self`
//! methods. A run executes on a blocking worker thread that reports back
//! over a channel; the owner drives delivery with [`MediaSyncer::pump`],
//! [`MediaSyncer::process_next`] or [`MediaSyncer::wait_for_completion`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TryRecvError};

use super::backend::{
    media_sync_endpoint, MediaSyncBackend, MediaSyncError, MediaSyncProgress, NetworkErrorKind,
    SyncErrorKind,
};
use super::events::{EventBus, EventStream, MediaSyncEvent};
use super::log::{SyncLog, SyncLogEntry};
use super::messages;
use crate::config::SyncProfile;
use crate::error::{Error, Result};
use crate::util::unix_timestamp_now;

/// What a call to [`MediaSyncer::start`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadySyncing,
    /// No sync key is stored; nothing was logged
    NoCredentials,
    /// Media sync is turned off in the profile
    Disabled,
}

enum WorkerMessage {
    Progress { at: i64, progress: MediaSyncProgress },
    Finished(std::result::Result<(), MediaSyncError>),
}

pub struct MediaSyncer<P> {
    profile: P,
    backend: Arc<dyn MediaSyncBackend>,
    syncing: bool,
    want_stop: Arc<AtomicBool>,
    log: SyncLog,
    events: EventBus,
    worker: Option<mpsc::UnboundedReceiver<WorkerMessage>>,
}

impl<P: SyncProfile> MediaSyncer<P> {
    pub fn new(profile: P, backend: Arc<dyn MediaSyncBackend>) -> Self {
        Self {
            profile,
            backend,
            syncing: false,
            want_stop: Arc::new(AtomicBool::new(false)),
            log: SyncLog::default(),
            events: EventBus::default(),
            worker: None,
        }
    }

    /// Register an observer
    pub fn subscribe(&mut self) -> EventStream {
        self.events.subscribe()
    }

    pub const fn profile(&self) -> &P {
        &self.profile
    }

    pub const fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn entries(&self) -> &[SyncLogEntry] {
        self.log.entries()
    }

    /// Start a media sync in the background, unless one is running or the
    /// profile does not allow it.
    ///
    /// Inside a Tokio runtime the run goes to its blocking pool; otherwise it
    /// gets a dedicated thread. Fails only if that thread cannot be spawned.
    pub fn start(&mut self) -> Result<StartOutcome> {
        if self.syncing {
            return Ok(StartOutcome::AlreadySyncing);
        }

        let Some(sync_key) = self.profile.sync_key() else {
            tracing::debug!("Media sync skipped: no sync key stored");
            return Ok(StartOutcome::NoCredentials);
        };

        if !self.profile.media_syncing_enabled() {
            self.log_status(messages::DISABLED);
            return Ok(StartOutcome::Disabled);
        }

        let endpoint = media_sync_endpoint(self.profile.sync_shard());
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Arc::clone(&self.backend);
        let want_stop = Arc::clone(&self.want_stop);
        want_stop.store(false, Ordering::SeqCst);

        let worker_endpoint = endpoint.clone();
        let job = move || {
            let mut on_progress = |progress: MediaSyncProgress| {
                tx.send(WorkerMessage::Progress {
                    at: unix_timestamp_now(),
                    progress,
                })
                .ok();
                !want_stop.load(Ordering::SeqCst)
            };
            let result = backend.run_media_sync(&sync_key, &worker_endpoint, &mut on_progress);
            tx.send(WorkerMessage::Finished(result)).ok();
        };

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn_blocking(job);
        } else {
            std::thread::Builder::new()
                .name("media-sync".to_string())
                .spawn(job)?;
        }

        self.worker = Some(rx);
        self.log_status(messages::STARTING);
        self.syncing = true;
        self.events.emit(&MediaSyncEvent::StartedOrStopped(true));
        tracing::info!(%endpoint, "Media sync starting");

        Ok(StartOutcome::Started)
    }

    /// Ask a running sync to stop at its next progress checkpoint
    pub fn abort(&mut self) -> Result<()> {
        // Deliver what the worker already reported so the log stays in order
        self.pump()?;
        if !self.syncing {
            return Ok(());
        }
        self.log_status(messages::ABORTING);
        self.want_stop.store(true, Ordering::SeqCst);
        tracing::info!("Media sync abort requested");
        Ok(())
    }

    /// Seconds since the last log entry, or 0 while a sync is running
    pub fn seconds_since_last_sync(&self) -> i64 {
        if self.syncing {
            return 0;
        }
        let last = self.log.last().map_or(0, |entry| entry.timestamp);
        unix_timestamp_now() - last
    }

    /// Handle every worker message that has already arrived, without waiting.
    ///
    /// Returns the number of messages handled.
    pub fn pump(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Some(worker) = self.worker.as_mut() {
            let message = match worker.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => worker_vanished(),
            };
            handled += 1;
            self.handle_message(message)?;
        }
        Ok(handled)
    }

    /// Wait for the next worker message and handle it.
    ///
    /// Returns `false` when no sync is running. Cancel safe.
    pub async fn process_next(&mut self) -> Result<bool> {
        let Some(worker) = self.worker.as_mut() else {
            return Ok(false);
        };
        let message = worker.recv().await.unwrap_or_else(worker_vanished);
        self.handle_message(message)?;
        Ok(true)
    }

    /// Handle worker messages until the running sync has finished
    pub async fn wait_for_completion(&mut self) -> Result<()> {
        while self.process_next().await? {}
        Ok(())
    }

    fn handle_message(&mut self, message: WorkerMessage) -> Result<()> {
        match message {
            WorkerMessage::Progress { at, progress } => {
                tracing::debug!(?progress, "Media sync progress");
                self.append(SyncLogEntry::progress(at, progress));
                Ok(())
            }
            WorkerMessage::Finished(result) => self.on_finished(result),
        }
    }

    fn on_finished(&mut self, result: std::result::Result<(), MediaSyncError>) -> Result<()> {
        self.worker = None;
        self.syncing = false;
        self.events.emit(&MediaSyncEvent::StartedOrStopped(false));

        match result {
            Ok(()) => {
                tracing::info!("Media sync complete");
                self.log_status(messages::COMPLETE);
                Ok(())
            }
            Err(error) => self.handle_sync_error(&error),
        }
    }

    fn handle_sync_error(&mut self, error: &MediaSyncError) -> Result<()> {
        if matches!(error, MediaSyncError::Interrupted) {
            tracing::info!("Media sync aborted");
            self.log_status(messages::ABORTED);
            return Ok(());
        }

        tracing::warn!(%error, "Media sync failed");
        self.log_status(messages::FAILED);

        let detail = error.to_string();
        let alert = match error {
            MediaSyncError::Sync { kind, .. } => match kind {
                SyncErrorKind::AuthFailed => {
                    if let Err(clear_error) = self.profile.set_sync_key(None) {
                        tracing::warn!(%clear_error, "Failed to clear stored sync key");
                    }
                    messages::AUTH_FAILED.to_string()
                }
                SyncErrorKind::ServerError => messages::SERVER_ERROR.to_string(),
                SyncErrorKind::MediaCheckRequired => messages::MEDIA_CHECK_REQUIRED.to_string(),
                SyncErrorKind::ResyncRequired => messages::RESYNC_REQUIRED.to_string(),
                SyncErrorKind::Other => messages::unexpected_error(&detail),
            },
            MediaSyncError::Network { kind, .. } => match kind {
                NetworkErrorKind::Offline | NetworkErrorKind::Timeout => {
                    messages::connection_error(&detail)
                }
                NetworkErrorKind::Other => messages::unexpected_error(&detail),
            },
            MediaSyncError::Database(_) => messages::media_database_error(&detail),
            MediaSyncError::Other(_) | MediaSyncError::Interrupted => {
                return Err(Error::UnhandledMediaSync(detail));
            }
        };

        self.events.emit(&MediaSyncEvent::Alert(alert));
        Ok(())
    }

    fn log_status(&mut self, message: &str) {
        self.append(SyncLogEntry::status(unix_timestamp_now(), message));
    }

    fn append(&mut self, entry: SyncLogEntry) {
        self.log.push(entry.clone());
        self.events.emit(&MediaSyncEvent::LogAppended(entry));
    }
}

impl<P> Drop for MediaSyncer<P> {
    fn drop(&mut self) {
        // An orphaned worker stops at its next checkpoint
        self.want_stop.store(true, Ordering::SeqCst);
    }
}

fn worker_vanished() -> WorkerMessage {
    WorkerMessage::Finished(Err(MediaSyncError::Other(
        "media sync worker exited without reporting a result".to_string(),
    )))
}
