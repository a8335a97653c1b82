//! In-memory catalog for testing.

use crate::CatalogClient;
use crate::error::{ErrorKind, Result};
use crate::models::{Candidate, CatalogId, Rejection, Series};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// A single request received by a [`MockCatalog`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    GetById(CatalogId),
    Create(Series),
}

/// In-memory catalog for testing.
///
/// Search results, records and create rejections are scripted up front with
/// the `with_*` builders; every request is recorded so tests can assert on
/// what the pipeline actually asked for.
///
/// # Examples
///
/// ```
/// use tvsync_catalog::client::{Call, MockCatalog};
/// use tvsync_catalog::{CatalogClient, CatalogId, Series};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = MockCatalog::default()
///     .with_series(Series::new(CatalogId::new(200), "ShowB"))
///     .with_search("ShowB", [CatalogId::new(200)]);
///
/// let found = catalog.search("ShowB").await.unwrap();
/// assert_eq!(found[0].id, CatalogId::new(200));
/// assert_eq!(catalog.calls().await, vec![Call::Search("ShowB".to_string())]);
/// # Ok(())
/// # }
/// ```
pub struct MockCatalog {
    name: String,
    searches: HashMap<String, Vec<Candidate>>,
    failing_searches: HashSet<String>,
    failing_fetches: HashSet<CatalogId>,
    failing_creates: HashSet<CatalogId>,
    records: HashMap<CatalogId, Series>,
    rejections: HashMap<CatalogId, Vec<Rejection>>,
    calls: RwLock<Vec<Call>>,
}

impl MockCatalog {
    /// Change the name of the mock catalog.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register a record that [`get_by_id`](CatalogClient::get_by_id) will return.
    pub fn with_series(mut self, series: Series) -> Self {
        self.records.insert(series.id, series);
        self
    }

    /// Script the result of searching for `query`. Each identifier becomes a
    /// candidate titled after the matching record if one was registered,
    /// otherwise after the query itself.
    pub fn with_search(mut self, query: impl Into<String>, ids: impl IntoIterator<Item = CatalogId>) -> Self {
        let query = query.into();
        let candidates = ids
            .into_iter()
            .map(|id| Candidate {
                id,
                title: self.records.get(&id).map_or_else(|| query.clone(), |s| s.title.clone()),
                year: None,
            })
            .collect();
        self.searches.insert(query, candidates);
        self
    }

    /// Make searching for `query` fail as if the catalog were unreachable.
    pub fn with_failing_search(mut self, query: impl Into<String>) -> Self {
        self.failing_searches.insert(query.into());
        self
    }

    /// Make fetching the record for `id` fail as if the catalog were unreachable.
    pub fn with_failing_fetch(mut self, id: CatalogId) -> Self {
        self.failing_fetches.insert(id);
        self
    }

    /// Make creating a record with `id` fail before the catalog answers.
    pub fn with_failing_create(mut self, id: CatalogId) -> Self {
        self.failing_creates.insert(id);
        self
    }

    /// Script the rejections returned when a record with `id` is created.
    pub fn with_rejections(mut self, id: CatalogId, rejections: impl IntoIterator<Item = Rejection>) -> Self {
        self.rejections.insert(id, rejections.into_iter().collect());
        self
    }

    /// Every request received so far, in order.
    pub async fn calls(&self) -> Vec<Call> {
        self.calls.read().await.clone()
    }

    /// Records submitted through [`create`](CatalogClient::create), in order.
    pub async fn created(&self) -> Vec<Series> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                Call::Create(series) => Some(series.clone()),
                _ => None,
            })
            .collect()
    }

    /// Identifiers requested through [`get_by_id`](CatalogClient::get_by_id), in order.
    pub async fn fetched(&self) -> Vec<CatalogId> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|call| match call {
                Call::GetById(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}
impl Default for MockCatalog {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            searches: HashMap::new(),
            failing_searches: HashSet::new(),
            failing_fetches: HashSet::new(),
            failing_creates: HashSet::new(),
            records: HashMap::new(),
            rejections: HashMap::new(),
            calls: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        self.calls.write().await.push(Call::Search(query.to_string()));
        if self.failing_searches.contains(query) {
            exn::bail!(ErrorKind::Network(format!("search for {query:?} failed")));
        }
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }

    async fn get_by_id(&self, id: CatalogId) -> Result<Series> {
        self.calls.write().await.push(Call::GetById(id));
        if self.failing_fetches.contains(&id) {
            exn::bail!(ErrorKind::Network(format!("fetch of {id} failed")));
        }
        self.records.get(&id).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(id)))
    }

    async fn create(&self, series: &Series) -> Result<Vec<Rejection>> {
        self.calls.write().await.push(Call::Create(series.clone()));
        if self.failing_creates.contains(&series.id) {
            exn::bail!(ErrorKind::Network(format!("create of {} failed", series.id)));
        }
        Ok(self.rejections.get(&series.id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_search_is_empty() {
        let catalog = MockCatalog::default();
        assert!(catalog.search("Nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_titles_from_records() {
        let catalog = MockCatalog::default()
            .with_series(Series::new(CatalogId::new(1), "Doctor Who (2005)"))
            .with_search("Doctor Who", [CatalogId::new(1), CatalogId::new(2)]);
        let found = catalog.search("Doctor Who").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].title, "Doctor Who (2005)");
        assert_eq!(found[1].title, "Doctor Who");
    }

    #[tokio::test]
    async fn test_failing_search() {
        let catalog = MockCatalog::default().with_failing_search("Flaky");
        let err = catalog.search("Flaky").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
    }

    #[test]
    fn test_name() {
        assert_eq!(MockCatalog::default().name(), "mock");
        assert_eq!(MockCatalog::default().with_name("staging").name(), "staging");
    }

    #[tokio::test]
    async fn test_failing_fetch_and_create() {
        let series = Series::new(CatalogId::new(3), "Down");
        let catalog = MockCatalog::default()
            .with_series(series.clone())
            .with_failing_fetch(CatalogId::new(3))
            .with_failing_create(CatalogId::new(3));
        assert!(matches!(&*catalog.get_by_id(CatalogId::new(3)).await.unwrap_err(), ErrorKind::Network(_)));
        assert!(matches!(&*catalog.create(&series).await.unwrap_err(), ErrorKind::Network(_)));
        assert_eq!(catalog.calls().await, vec![Call::GetById(CatalogId::new(3)), Call::Create(series)]);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let catalog = MockCatalog::default();
        let err = catalog.get_by_id(CatalogId::new(9)).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(id) if *id == CatalogId::new(9)));
        assert_eq!(catalog.fetched().await, vec![CatalogId::new(9)]);
    }

    #[tokio::test]
    async fn test_create_records_and_rejects() {
        let catalog = MockCatalog::default()
            .with_rejections(CatalogId::new(5), [Rejection::new("Path", "already in use")]);
        let ok = Series::new(CatalogId::new(4), "Accepted");
        let bad = Series::new(CatalogId::new(5), "Rejected");
        assert!(catalog.create(&ok).await.unwrap().is_empty());
        assert_eq!(catalog.create(&bad).await.unwrap().len(), 1);
        assert_eq!(catalog.created().await, vec![ok, bad]);
    }
}
