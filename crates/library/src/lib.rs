//! Sync a local TV library with a remote series catalog.
//!
//! Each subdirectory of the library root is one series. Its catalog
//! identifier comes from a `tvshow.nfo` inside it or, failing that, from an
//! unambiguous catalog search on the directory name. The catalog's record is
//! then registered at the matching path beneath the target root.

mod entry;
pub mod error;
mod handler;
mod register;
mod resolve;
mod sync;

pub use crate::entry::LibraryEntry;
pub use crate::handler::{ErrorCollector, ErrorHandler, NoopErrorHandler};
pub use crate::register::{DEFAULT_QUALITY_PROFILE, Registration, register};
pub use crate::resolve::{NFO_FILE_NAME, ResolvedIdentity, Source, resolve};
pub use crate::sync::{Outcome, Summary, SyncEvent, Syncer};
