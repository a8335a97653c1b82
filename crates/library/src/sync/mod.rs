//! One full pass over a local library.
//!
//! Every immediate subdirectory of the source root is treated as a series:
//! opened, [resolved](crate::resolve) to a catalog identifier and
//! [registered](crate::register) beneath the target root. Failures are
//! isolated per directory. Only an unreadable source root ends the run early.
//!
//! [`Syncer::run`] is the usual entry point; [`Syncer::stream`] exposes the
//! same pass as a stream of [`SyncEvent`]s for callers that want to report
//! progress themselves.

mod stream;

pub use self::stream::{Outcome, SyncEvent};
use crate::error::Result;
use crate::handler::ErrorHandler;
use futures::StreamExt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::pin::pin;
use std::sync::Arc;
use tracing::Dispatch;
use tracing::instrument::WithSubscriber;
use tvsync_catalog::ClientHandle;

/// Counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub discovered: u64,
    pub registered: u64,
    pub failed: u64,
}

pub struct Syncer {
    client: ClientHandle,
    errors: Arc<dyn ErrorHandler>,
    dispatch: Option<Dispatch>,
    concurrency: NonZeroUsize,
}

impl Syncer {
    pub fn new(client: ClientHandle, errors: Arc<dyn ErrorHandler>) -> Self {
        Self {
            client,
            errors,
            dispatch: None,
            concurrency: NonZeroUsize::MIN,
        }
    }

    /// Log through `dispatch` for the duration of [`run`](Self::run) instead
    /// of the ambient default. [`Dispatch::none`] silences the run.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Process up to `concurrency` series at once (default: one at a time).
    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sync every series directory in `source_root` to the catalog.
    ///
    /// Returns once every directory has been attempted, however many of them
    /// failed: each failure is logged and handed to the [`ErrorHandler`],
    /// and counted in the [`Summary`].
    ///
    /// # Errors
    /// Only [`Root`](crate::error::ErrorKind::Root), when `source_root` can't
    /// be resolved or listed. The error handler isn't involved then.
    pub async fn run(&self, source_root: impl AsRef<Path>, target_root: impl AsRef<Path>) -> Result<Summary> {
        let run = self.drain(source_root.as_ref(), target_root.as_ref());
        match &self.dispatch {
            Some(dispatch) => run.with_subscriber(dispatch.clone()).await,
            None => run.await,
        }
    }

    async fn drain(&self, source_root: &Path, target_root: &Path) -> Result<Summary> {
        let mut summary = Summary::default();
        let mut events = pin!(self.stream(source_root, target_root));
        while let Some(event) = events.next().await {
            match event? {
                SyncEvent::Started => {
                    tracing::info!(
                        catalog = self.client.name(),
                        source = %source_root.display(),
                        target = %target_root.display(),
                        "Sync started"
                    );
                },
                SyncEvent::DiscoveryComplete(count) => {
                    summary.discovered = count;
                    tracing::info!(entries = count, "Discovery complete");
                },
                SyncEvent::Processed(Outcome::Registered(registration)) => {
                    summary.registered += 1;
                    tracing::info!(
                        entry = %registration.entry.name,
                        id = %registration.identity.id,
                        source = %registration.identity.source,
                        title = %registration.series.title,
                        "Registered series"
                    );
                },
                SyncEvent::Processed(Outcome::Failed { path, error }) => {
                    summary.failed += 1;
                    tracing::error!(path = %path.display(), error = ?error, "Failed to add series");
                    self.errors.handle(error);
                },
                SyncEvent::Complete => {
                    tracing::info!(registered = summary.registered, failed = summary.failed, "Sync complete");
                },
            }
        }
        Ok(summary)
    }
}
