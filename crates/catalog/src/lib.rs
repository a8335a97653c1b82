//! Catalog client abstraction.
//!
//! The sync pipeline never talks HTTP itself; it only sees the
//! [`CatalogClient`] capability. Concrete clients live behind features:
//! `http` for the Sonarr adapter, `mock` for the in-memory catalog used in
//! tests.

pub mod client;
pub mod error;
mod models;

pub use crate::client::CatalogClient;
pub use crate::models::{Candidate, CatalogId, Rejection, Series};
use std::sync::Arc;

pub type ClientHandle = Arc<dyn CatalogClient + Send + Sync>;
