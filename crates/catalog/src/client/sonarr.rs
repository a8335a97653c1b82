//! Sonarr v3 API client.

use crate::CatalogClient;
use crate::error::{ErrorKind, Result};
use crate::models::{Candidate, CatalogId, Rejection, Series};
use async_trait::async_trait;
use exn::{OptionExt, ResultExt};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Catalog client for a Sonarr instance.
///
/// The configured URL is the API root, for example
/// `http://localhost:8989/api/v3`; resource paths are joined onto it.
///
/// # Examples
///
/// ```no_run
/// use tvsync_catalog::client::SonarrClient;
/// use tvsync_catalog::CatalogClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SonarrClient::new("sonarr", "http://localhost:8989/api/v3", "0123456789abcdef")?;
/// let candidates = client.search("The Expanse").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SonarrClient {
    name: String,
    base: Url,
    api_key: String,
    http: Client,
}

impl SonarrClient {
    pub fn new(name: impl Into<String>, api_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base = base_url(api_url)?;
        let http = Client::builder()
            .user_agent(concat!("tvsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Network("could not build HTTP client".to_string()))?;
        Ok(Self { name: name.into(), base, api_key: api_key.into(), http })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).or_raise(|| ErrorKind::InvalidUrl(format!("{}{path}", self.base)))
    }

    fn lookup_url(&self, term: &str) -> Result<Url> {
        let mut url = self.endpoint("series/lookup")?;
        url.query_pairs_mut().append_pair("term", term);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(catalog = %self.name, %url, "GET");
        let response = self.http.get(url.clone()).header(API_KEY_HEADER, &self.api_key).send().await;
        let response = response.or_raise(|| ErrorKind::Network(url.to_string()))?;
        let response = check_status(response)?;
        response.json().await.or_raise(|| ErrorKind::InvalidResponse)
    }
}

#[async_trait]
impl CatalogClient for SonarrClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        self.get_json(self.lookup_url(query)?).await
    }

    async fn get_by_id(&self, id: CatalogId) -> Result<Series> {
        let results: Vec<Series> = self.get_json(self.lookup_url(&format!("tvdb:{id}"))?).await?;
        results.into_iter().find(|series| series.id == id).ok_or_raise(|| ErrorKind::NotFound(id))
    }

    async fn create(&self, series: &Series) -> Result<Vec<Rejection>> {
        let url = self.endpoint("series")?;
        tracing::debug!(catalog = %self.name, %url, id = %series.id, "POST");
        let response = self.http.post(url.clone()).header(API_KEY_HEADER, &self.api_key).json(series).send().await;
        let response = response.or_raise(|| ErrorKind::Network(url.to_string()))?;
        // Validation failures come back as a 400 with a list of offending
        // properties; anything else non-2xx is an actual failure.
        if response.status() == StatusCode::BAD_REQUEST {
            return response.json().await.or_raise(|| ErrorKind::InvalidResponse);
        }
        check_status(response)?;
        Ok(Vec::new())
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        exn::bail!(ErrorKind::Api { status: status.as_u16() });
    }
    Ok(response)
}

/// Parse the configured API URL, making sure relative joins append to its
/// path rather than replacing the last segment.
fn base_url(api_url: &str) -> Result<Url> {
    let mut url = Url::parse(api_url.trim()).or_raise(|| ErrorKind::InvalidUrl(api_url.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        exn::bail!(ErrorKind::InvalidUrl(api_url.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
