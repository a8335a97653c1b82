use crate::entry::LibraryEntry;
use crate::error::{Error, ErrorKind, Result};
use crate::register::{Registration, register};
use crate::resolve::resolve;
use crate::sync::Syncer;
use async_stream::stream;
use exn::ResultExt;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};

/// Progress events emitted by [`Syncer::stream`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete): exactly once, with the
///    number of series directories found.
/// 3. [`Processed`](Self::Processed): once per directory, in name order.
/// 4. [`Complete`](Self::Complete): exactly once.
///
/// A fatal error (the source root can't be read) is yielded as an `Err` after
/// `Started` and ends the stream. `Complete` is never emitted then.
#[derive(Debug)]
pub enum SyncEvent {
    Started,
    DiscoveryComplete(u64),
    Processed(Outcome),
    Complete,
}

/// The terminal state of one series directory.
#[derive(Debug)]
pub enum Outcome {
    Registered(Box<Registration>),
    Failed { path: PathBuf, error: Error },
}

impl Syncer {
    /// Stream the sync of every series directory in `source_root`, registering
    /// each beneath `target_root`.
    ///
    /// Per-entry failures are surfaced as [`Outcome::Failed`] and never end
    /// the stream. Unlike [`run`](Self::run), this neither logs outcomes nor
    /// hands failures to the error handler.
    pub fn stream<'a>(
        &'a self,
        source_root: &'a Path,
        target_root: &'a Path,
    ) -> impl Stream<Item = Result<SyncEvent>> + Send + 'a {
        stream!({
            yield Ok(SyncEvent::Started);

            let children = match discover(source_root).await {
                Ok(children) => children,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            yield Ok(SyncEvent::DiscoveryComplete(u64::try_from(children.len()).unwrap_or(u64::MAX)));

            // `buffered` keeps outcomes in entry order however many are in flight.
            let outcomes = futures::stream::iter(children)
                .map(|path| self.process(path, target_root))
                .buffered(self.concurrency.get());
            for await outcome in outcomes {
                yield Ok(SyncEvent::Processed(outcome));
            }

            yield Ok(SyncEvent::Complete);
        })
    }

    async fn process(&self, path: PathBuf, target_root: &Path) -> Outcome {
        match self.process_inner(&path, target_root).await {
            Ok(registration) => Outcome::Registered(Box::new(registration)),
            Err(error) => Outcome::Failed { path, error },
        }
    }

    async fn process_inner(&self, path: &Path, target_root: &Path) -> Result<Registration> {
        tracing::info!(path = %path.display(), "Adding series");
        let entry = LibraryEntry::open(path).await?;
        let identity = resolve(self.client.as_ref(), &entry).await?;
        register(self.client.as_ref(), identity, &entry, target_root).await
    }
}

/// List the immediate subdirectories of `source_root`, sorted by name.
///
/// Symlinks are followed; dangling ones are silently dropped along with plain
/// files. A child whose type can't be determined (including a link whose
/// target can't be stat'ed) is kept so that opening it reports the problem
/// against that entry.
async fn discover(source_root: &Path) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(source_root).or_raise(|| ErrorKind::Root(source_root.to_path_buf()))?;
    let mut listing = tokio::fs::read_dir(&root).await.or_raise(|| ErrorKind::Root(root.clone()))?;
    let mut children = Vec::new();
    while let Some(child) = listing.next_entry().await.or_raise(|| ErrorKind::Root(root.clone()))? {
        let path = child.path();
        let is_dir = match child.file_type().await {
            Ok(file_type) if file_type.is_symlink() => match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata.is_dir(),
                // Dangling link.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
                Err(_) => true,
            },
            Ok(file_type) => file_type.is_dir(),
            Err(_) => true,
        };
        if is_dir {
            children.push(path);
        }
    }
    children.sort();
    tracing::debug!(root = %root.display(), entries = children.len(), "Listed library root");
    Ok(children)
}
