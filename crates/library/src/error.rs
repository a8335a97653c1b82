//! Library Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. The underlying cause (an I/O error, an XML error, a
//! catalog error) is kept as a child frame of the kind raised here.

use derive_more::{Display, Error};
use std::path::PathBuf;
use tvsync_catalog::CatalogId;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies why a sync run, or a single series within it, failed.
///
/// ### Fatal
/// - [`ErrorKind::Root`] aborts the whole run.
///
/// ### Per-entry
/// Everything else is reported for the entry it happened to and the run
/// carries on with the next one.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The source root could not be resolved or listed.
    #[display("cannot read library root: {}", _0.display())]
    Root(#[error(not(source))] PathBuf),
    /// A series directory could not be opened.
    #[display("cannot open series directory: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// A `tvshow.nfo` exists but doesn't yield a usable identifier.
    #[display("invalid metadata file: {}", _0.display())]
    Parse(#[error(not(source))] PathBuf),
    /// Searching the catalog for the series name found nothing.
    #[display("no results found for {_0:?}")]
    NotFound(#[error(not(source))] String),
    /// Searching the catalog for the series name found too much.
    #[display("{candidates} results found for {query:?}")]
    Ambiguous {
        query: String,
        candidates: usize,
    },
    /// The catalog search itself failed.
    #[display("catalog search failed for {_0:?}")]
    Search(#[error(not(source))] String),
    /// The catalog has no record for a resolved identifier, or the lookup failed.
    #[display("cannot fetch catalog record {_0}")]
    Fetch(#[error(not(source))] CatalogId),
    /// The catalog rejected (or never received) the create request.
    #[display("registration rejected: {_0}")]
    Registration(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Search(_) | Self::Fetch(_))
    }

    /// Returns `true` if the error aborts the entire run rather than a
    /// single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Root(_))
    }
}
