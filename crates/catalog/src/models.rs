//! These types mirror the catalog's JSON resources. Only the fields the sync
//! pipeline reads or writes are typed; everything else on a [`Series`] is
//! carried through untouched so a create request re-submits exactly what the
//! lookup returned.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// The catalog's numeric primary key for a series (a TVDB id for Sonarr).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(u64);
impl CatalogId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}
impl FromStr for CatalogId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// One result of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(rename = "tvdbId")]
    pub id: CatalogId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// The full catalog record for a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub title: String,
    #[serde(rename = "tvdbId")]
    pub id: CatalogId,
    /// Storage path of the series inside the catalog's library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Classification (quality) tier applied to the series.
    #[serde(default)]
    pub quality_profile_id: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
impl Series {
    pub fn new(id: CatalogId, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id,
            path: None,
            quality_profile_id: 0,
            extra: Map::new(),
        }
    }
}

/// A validation failure reported by the catalog when rejecting a create.
#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[display("{property}: {message}")]
pub struct Rejection {
    #[serde(rename = "propertyName", default)]
    pub property: String,
    #[serde(rename = "errorMessage")]
    pub message: String,
}
impl Rejection {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self { property: property.into(), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_keeps_unknown_fields() {
        let body = json!({
            "title": "The Expanse",
            "tvdbId": 280619,
            "titleSlug": "the-expanse",
            "seasons": [{ "seasonNumber": 1, "monitored": true }],
            "year": 2015
        });
        let mut series: Series = serde_json::from_value(body).unwrap();
        assert_eq!(series.id, CatalogId::new(280619));
        assert_eq!(series.path, None);
        assert_eq!(series.quality_profile_id, 0);

        series.path = Some("/tv/The Expanse".to_string());
        series.quality_profile_id = 1;
        let out = serde_json::to_value(&series).unwrap();
        assert_eq!(out["path"], "/tv/The Expanse");
        assert_eq!(out["qualityProfileId"], 1);
        assert_eq!(out["titleSlug"], "the-expanse");
        assert_eq!(out["seasons"][0]["seasonNumber"], 1);
    }

    #[test]
    fn test_candidate_from_lookup() {
        let candidate: Candidate =
            serde_json::from_value(json!({ "title": "Firefly", "tvdbId": 78874, "year": 2002, "network": "FOX" }))
                .unwrap();
        assert_eq!(candidate.id, CatalogId::new(78874));
        assert_eq!(candidate.year, Some(2002));
    }

    #[test]
    fn test_rejection_display() {
        let rejection: Rejection = serde_json::from_value(json!({
            "propertyName": "TvdbId",
            "errorMessage": "This series has already been added",
            "attemptedValue": 78874
        }))
        .unwrap();
        assert_eq!(rejection.to_string(), "TvdbId: This series has already been added");
    }

    #[test]
    fn test_catalog_id_from_str() {
        assert_eq!("100".parse::<CatalogId>().unwrap(), CatalogId::new(100));
        assert!("-1".parse::<CatalogId>().is_err());
        assert!("abc".parse::<CatalogId>().is_err());
    }
}
