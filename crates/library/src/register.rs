use crate::entry::LibraryEntry;
use crate::error::{ErrorKind, Result};
use crate::resolve::ResolvedIdentity;
use exn::ResultExt;
use std::path::Path;
use tvsync_catalog::{CatalogClient, Series};

/// Quality profile every registered series is assigned.
pub const DEFAULT_QUALITY_PROFILE: u32 = 1;

/// A series successfully submitted to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub entry: LibraryEntry,
    pub identity: ResolvedIdentity,
    /// The record exactly as it was submitted.
    pub series: Series,
}

/// Register a resolved series with the catalog beneath `target_root`.
///
/// Fetches the catalog's record for the identifier, points its path at
/// `target_root/<entry name>`, applies [`DEFAULT_QUALITY_PROFILE`] and submits
/// it. Nothing is rolled back if the create fails.
///
/// # Errors
/// - [`Fetch`](ErrorKind::Fetch) if the record can't be fetched.
/// - [`Registration`](ErrorKind::Registration) if the create request fails or
///   the catalog rejects it. Only the first rejection is reported.
pub async fn register(
    client: &dyn CatalogClient,
    identity: ResolvedIdentity,
    entry: &LibraryEntry,
    target_root: &Path,
) -> Result<Registration> {
    let mut series = client.get_by_id(identity.id).await.or_raise(|| ErrorKind::Fetch(identity.id))?;
    tracing::debug!(entry = %entry.name, id = %identity.id, title = %series.title, "Found series");

    let path = entry.target_path(target_root);
    series.path = Some(path.to_string_lossy().into_owned());
    series.quality_profile_id = DEFAULT_QUALITY_PROFILE;
    tracing::debug!(
        entry = %entry.name,
        path = %path.display(),
        quality_profile = DEFAULT_QUALITY_PROFILE,
        "Submitting series"
    );

    let rejections = client.create(&series).await.or_raise(|| ErrorKind::Registration("create request failed".to_string()))?;
    if let Some(first) = rejections.into_iter().next() {
        exn::bail!(ErrorKind::Registration(first.to_string()));
    }
    Ok(Registration { entry: entry.clone(), identity, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Source;
    use std::path::PathBuf;
    use tvsync_catalog::client::MockCatalog;
    use tvsync_catalog::{CatalogId, Rejection};

    fn entry(name: &str) -> LibraryEntry {
        LibraryEntry { name: name.to_string(), path: PathBuf::from("/media").join(name) }
    }

    fn identity(id: u64) -> ResolvedIdentity {
        ResolvedIdentity { id: CatalogId::new(id), source: Source::RemoteSearch }
    }

    #[tokio::test]
    async fn test_rewrites_path_and_profile() {
        let mut record = Series::new(CatalogId::new(100), "Show A");
        record.path = Some("/somewhere/else".to_string());
        record.quality_profile_id = 4;
        record.extra.insert("titleSlug".to_string(), "show-a".into());
        let catalog = MockCatalog::default().with_series(record);

        let registration = register(&catalog, identity(100), &entry("ShowA"), Path::new("/tv")).await.unwrap();
        assert_eq!(registration.series.path.as_deref(), Some("/tv/ShowA"));
        assert_eq!(registration.series.quality_profile_id, DEFAULT_QUALITY_PROFILE);

        let created = catalog.created().await;
        assert_eq!(created, vec![registration.series.clone()]);
        assert_eq!(created[0].extra["titleSlug"], "show-a");
        assert_eq!(catalog.fetched().await, vec![CatalogId::new(100)]);
    }

    #[tokio::test]
    async fn test_missing_record_is_fetch_error() {
        let catalog = MockCatalog::default();
        let err = register(&catalog, identity(404), &entry("Nope"), Path::new("/tv")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Fetch(id) if *id == CatalogId::new(404)));
        assert!(catalog.created().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_fetch_error() {
        let catalog = MockCatalog::default()
            .with_series(Series::new(CatalogId::new(12), "Unreachable"))
            .with_failing_fetch(CatalogId::new(12));
        let err = register(&catalog, identity(12), &entry("Unreachable"), Path::new("/tv")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Fetch(id) if *id == CatalogId::new(12)));
        assert!(catalog.created().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_create_is_registration_error() {
        let catalog = MockCatalog::default()
            .with_series(Series::new(CatalogId::new(13), "Dropped"))
            .with_failing_create(CatalogId::new(13));
        let err = register(&catalog, identity(13), &entry("Dropped"), Path::new("/tv")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Registration(message) if message == "create request failed"));
        assert_eq!(catalog.created().await.len(), 1);
    }

    #[tokio::test]
    async fn test_first_rejection_reported() {
        let catalog = MockCatalog::default().with_series(Series::new(CatalogId::new(7), "Dupe")).with_rejections(
            CatalogId::new(7),
            [
                Rejection::new("TvdbId", "This series has already been added"),
                Rejection::new("Path", "Path is already configured for an existing series"),
            ],
        );

        let err = register(&catalog, identity(7), &entry("Dupe"), Path::new("/tv")).await.unwrap_err();
        let ErrorKind::Registration(message) = &*err else {
            panic!("expected registration error, got {err:?}");
        };
        assert_eq!(message, "TvdbId: This series has already been added");
        // The create request was still issued.
        assert_eq!(catalog.created().await.len(), 1);
    }
}
