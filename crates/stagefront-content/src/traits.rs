use stagefront_core::{Artist, SamplePack, Track};

use crate::errors::Result;

/// Read-side boundary to the headless content store. Every fetch returns a
/// fully materialized collection, newest first, small enough to hold in
/// memory; the query pipeline runs over the result on the caller's side.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// All tracks, ordered by publish time descending.
    async fn fetch_tracks(&self) -> Result<Vec<Track>>;

    /// Single track detail for the downloads page.
    async fn fetch_track_by_slug(&self, slug: &str) -> Result<Track>;

    /// Packs currently active for sale, ordered by publish time descending.
    async fn fetch_packs(&self) -> Result<Vec<SamplePack>>;

    /// The active artist profile, if one is published.
    async fn fetch_artist(&self) -> Result<Option<Artist>>;
}
