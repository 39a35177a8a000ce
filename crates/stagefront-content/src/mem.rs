use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use stagefront_core::{Artist, SamplePack, Track};
use tracing::info;

use crate::decode::decode_many;
use crate::errors::{Result, StoreError};
use crate::traits::ContentStore;

/// Fixture-backed store for development and tests. Serves the same
/// contract as the CMS client: active-only packs, newest first.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    tracks: Vec<Track>,
    packs: Vec<SamplePack>,
    artist: Option<Artist>,
}

/// On-disk fixture shape; collections decode leniently like CMS payloads.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Fixture {
    tracks: Vec<JsonValue>,
    sample_packs: Vec<JsonValue>,
    artist: Option<Artist>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self> {
        let body = std::fs::read_to_string(path.as_ref())?;
        let fixture: Fixture = serde_json::from_str(&body)?;
        let store = Self::new();
        {
            let mut inner = store.inner.write();
            inner.tracks = decode_many("track", fixture.tracks);
            inner.packs = decode_many("samplePack", fixture.sample_packs);
            inner.artist = fixture.artist;
        }
        info!(
            path = %path.as_ref().display(),
            tracks = store.inner.read().tracks.len(),
            packs = store.inner.read().packs.len(),
            "loaded catalog fixture"
        );
        Ok(store)
    }

    pub fn seed_tracks(&self, tracks: Vec<Track>) {
        self.inner.write().tracks = tracks;
    }

    pub fn seed_packs(&self, packs: Vec<SamplePack>) {
        self.inner.write().packs = packs;
    }

    pub fn seed_artist(&self, artist: Option<Artist>) {
        self.inner.write().artist = artist;
    }
}

#[async_trait::async_trait]
impl ContentStore for InMemoryStore {
    async fn fetch_tracks(&self) -> Result<Vec<Track>> {
        let mut tracks = self.inner.read().tracks.clone();
        tracks.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(tracks)
    }

    async fn fetch_track_by_slug(&self, slug: &str) -> Result<Track> {
        self.inner
            .read()
            .tracks
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn fetch_packs(&self) -> Result<Vec<SamplePack>> {
        let mut packs: Vec<SamplePack> = self
            .inner
            .read()
            .packs
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        packs.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(packs)
    }

    async fn fetch_artist(&self) -> Result<Option<Artist>> {
        Ok(self.inner.read().artist.iter().find(|a| a.is_active).cloned())
    }
}
