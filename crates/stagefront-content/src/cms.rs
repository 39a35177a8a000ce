use serde::Deserialize;
use serde_json::Value as JsonValue;
use stagefront_core::{Artist, SamplePack, Track};
use tracing::debug;

use crate::decode::decode_many;
use crate::errors::{Result, StoreError};
use crate::traits::ContentStore;

/// Projection aliases map the store's document shape onto the model's wire
/// names (`_id` -> `id`, `slug.current` -> `slug`, asset objects -> opaque
/// references).
const TRACK_PROJECTION: &str = r#"{
  "id": _id, title, "slug": slug.current, "artistName": artist,
  "coverArt": coverArt.asset._ref, category, trackType, genre, releaseDate,
  streamingLinks, downloadLink, description, featured, publishedAt
}"#;

const PACK_PROJECTION: &str = r#"{
  "id": _id, name, "slug": slug.current, "coverImage": coverImage.asset._ref,
  description, genre, bpm, key, sampleCount, packSize, tags, price,
  gumroadUrl, "previewAudio": previewAudio.asset._ref, featured, isActive,
  publishedAt
}"#;

const ARTIST_PROJECTION: &str = r#"{
  "id": _id, name, stageName, "profileImage": profileImage.asset._ref,
  "heroImage": heroImage.asset._ref, shortBio, location, socialLinks,
  contactEmail, bookingEmail, genres, isActive
}"#;

#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Overrides the CDN host; used by tests against a local stub.
    pub base_url: Option<String>,
}

impl CmsConfig {
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(project_id) = std::env::var("CMS_PROJECT_ID") else {
            return Ok(None);
        };
        if project_id.is_empty() {
            return Err(StoreError::Config("CMS_PROJECT_ID is empty".into()));
        }
        Ok(Some(CmsConfig {
            project_id,
            dataset: std::env::var("CMS_DATASET").unwrap_or_else(|_| "production".into()),
            api_version: std::env::var("CMS_API_VERSION").unwrap_or_else(|_| "2024-01-01".into()),
            base_url: std::env::var("CMS_BASE_URL").ok(),
        }))
    }

    fn query_url(&self) -> String {
        let host = match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}.apicdn.sanity.io", self.project_id),
        };
        format!(
            "{host}/v{version}/data/query/{dataset}",
            version = self.api_version,
            dataset = self.dataset
        )
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    result: Option<T>,
}

/// HTTP client for the headless CMS query API. Collection fetches decode
/// leniently (bad records dropped with a warning); single-record fetches
/// fail hard since there is nothing to salvage.
#[derive(Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    config: CmsConfig,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Self {
        CmsClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn run_query<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = self.config.query_url();
        debug!(%url, query, "content store query");
        let mut req = self.http.get(&url).query(&[("query", query)]);
        for (name, value) in params {
            req = req.query(&[(*name, value.as_str())]);
        }
        let envelope: Envelope<T> = req
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.result)
    }

    async fn fetch_collection<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        query: &str,
    ) -> Result<Vec<T>> {
        let raw: Vec<JsonValue> = self.run_query(query, &[]).await?.unwrap_or_default();
        Ok(decode_many(kind, raw))
    }
}

#[async_trait::async_trait]
impl ContentStore for CmsClient {
    async fn fetch_tracks(&self) -> Result<Vec<Track>> {
        let query =
            format!(r#"*[_type == "musicTrack"] | order(publishedAt desc) {TRACK_PROJECTION}"#);
        self.fetch_collection("track", &query).await
    }

    async fn fetch_track_by_slug(&self, slug: &str) -> Result<Track> {
        let query = format!(
            r#"*[_type == "musicTrack" && slug.current == $slug][0] {TRACK_PROJECTION}"#
        );
        let params = [("$slug", serde_json::to_string(slug)?)];
        let raw: Option<JsonValue> = self.run_query(&query, &params).await?;
        match raw {
            Some(value) if !value.is_null() => Ok(serde_json::from_value(value)?),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn fetch_packs(&self) -> Result<Vec<SamplePack>> {
        let query = format!(
            r#"*[_type == "samplePack" && isActive == true] | order(publishedAt desc) {PACK_PROJECTION}"#
        );
        self.fetch_collection("samplePack", &query).await
    }

    async fn fetch_artist(&self) -> Result<Option<Artist>> {
        let query = format!(r#"*[_type == "artist" && isActive == true][0] {ARTIST_PROJECTION}"#);
        let raw: Option<JsonValue> = self.run_query(&query, &[]).await?;
        match raw {
            Some(value) if !value.is_null() => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_defaults_to_cdn_host() {
        let config = CmsConfig {
            project_id: "1ut778we".into(),
            dataset: "production".into(),
            api_version: "2024-01-01".into(),
            base_url: None,
        };
        assert_eq!(
            config.query_url(),
            "https://1ut778we.apicdn.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn query_url_honors_base_override() {
        let config = CmsConfig {
            project_id: "test".into(),
            dataset: "dev".into(),
            api_version: "2024-01-01".into(),
            base_url: Some("http://127.0.0.1:8099/".into()),
        };
        assert_eq!(
            config.query_url(),
            "http://127.0.0.1:8099/v2024-01-01/data/query/dev"
        );
    }
}
