//! Identifier resolution for a single series directory.
//!
//! A local `tvshow.nfo` is authoritative: if the file exists, its identifier
//! is used and the catalog is never searched, even when the file turns out
//! to be unreadable or incomplete. Only when there is no metadata file does
//! resolution fall back to searching the catalog by directory name, and then
//! only an unambiguous (single) match is accepted.

mod nfo;

use crate::entry::LibraryEntry;
use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use tvsync_catalog::{CatalogClient, CatalogId};

/// Name of the per-series metadata file.
pub const NFO_FILE_NAME: &str = "tvshow.nfo";

/// Where a [`ResolvedIdentity`] came from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    #[display("local-metadata")]
    LocalMetadata,
    #[display("remote-search")]
    RemoteSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub id: CatalogId,
    pub source: Source,
}

/// Determine the catalog identifier of a series directory.
///
/// # Errors
/// - [`Parse`](ErrorKind::Parse) if `tvshow.nfo` exists but can't be read
///   or doesn't contain an integer `tvshow > id`.
/// - [`NotFound`](ErrorKind::NotFound) / [`Ambiguous`](ErrorKind::Ambiguous)
///   if the catalog search returns zero or several candidates.
/// - [`Search`](ErrorKind::Search) if the search request itself failed.
pub async fn resolve(client: &dyn CatalogClient, entry: &LibraryEntry) -> Result<ResolvedIdentity> {
    let nfo = entry.nfo_path();
    let has_nfo = tokio::fs::try_exists(&nfo).await.or_raise(|| ErrorKind::Parse(nfo.clone()))?;
    let identity = if has_nfo {
        tracing::debug!(entry = %entry.name, path = %nfo.display(), "Found metadata file");
        let contents = tokio::fs::read_to_string(&nfo).await.or_raise(|| ErrorKind::Parse(nfo.clone()))?;
        let id = nfo::parse_id(&contents).or_raise(|| ErrorKind::Parse(nfo.clone()))?;
        ResolvedIdentity { id, source: Source::LocalMetadata }
    } else {
        let id = search(client, &entry.name).await?;
        ResolvedIdentity { id, source: Source::RemoteSearch }
    };
    tracing::debug!(entry = %entry.name, id = %identity.id, source = %identity.source, "Resolved catalog id");
    Ok(identity)
}

async fn search(client: &dyn CatalogClient, query: &str) -> Result<CatalogId> {
    let candidates = client.search(query).await.or_raise(|| ErrorKind::Search(query.to_string()))?;
    // No guessing: anything but a single candidate is reported back.
    match candidates.as_slice() {
        [only] => Ok(only.id),
        [] => exn::bail!(ErrorKind::NotFound(query.to_string())),
        _ => exn::bail!(ErrorKind::Ambiguous {
            query: query.to_string(),
            candidates: candidates.len(),
        }),
    }
}
