//! Catalog client trait and implementations.

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "http")]
mod sonarr;

#[cfg(feature = "mock")]
pub use self::mock::{Call, MockCatalog};
#[cfg(feature = "http")]
pub use self::sonarr::SonarrClient;
use crate::error::Result;
use crate::models::{Candidate, CatalogId, Rejection, Series};
use async_trait::async_trait;

/// The three capabilities the sync pipeline needs from a remote catalog.
///
/// # Examples
///
/// ```
/// use tvsync_catalog::{CatalogClient, error::Result};
///
/// async fn print_matches(client: &dyn CatalogClient, query: &str) -> Result<()> {
///     for candidate in client.search(query).await? {
///         println!("{} ({})", candidate.title, candidate.id);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Name of the configured catalog, used for logging only.
    fn name(&self) -> &str;

    /// Search the catalog by free-text title.
    ///
    /// An empty result is a successful search, not an error.
    async fn search(&self, query: &str) -> Result<Vec<Candidate>>;

    /// Fetch the full record for an identifier.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the catalog
    /// has no such record.
    async fn get_by_id(&self, id: CatalogId) -> Result<Series>;

    /// Submit a record as a create request.
    ///
    /// Validation failures are not errors: they come back as a (possibly
    /// empty) list of [`Rejection`]s. `Err` is reserved for requests that
    /// could not be completed at all.
    async fn create(&self, series: &Series) -> Result<Vec<Rejection>>;
}
