use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type RecordId = String; // assigned by the content store, never recomputed here
pub type Slug = String;

/// Opaque content-store asset reference (e.g. `image-abc123-800x600-jpg`).
/// Resolved to a fetchable URL by the asset layer; passed through untouched
/// by the query pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Closed category taxonomy for tracks. Upstream data entry can still ship
/// values outside the taxonomy; those survive decoding as `Other` so flat
/// queries keep them, while grouped output drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrackCategory {
    Remixes,
    MashupsEdits,
    FullMixes,
    Other(String),
}

impl TrackCategory {
    pub const KNOWN: [&'static str; 3] = ["remixes", "mashups-edits", "full-mixes"];

    pub fn slug(&self) -> &str {
        match self {
            TrackCategory::Remixes => "remixes",
            TrackCategory::MashupsEdits => "mashups-edits",
            TrackCategory::FullMixes => "full-mixes",
            TrackCategory::Other(s) => s,
        }
    }
}

impl From<String> for TrackCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "remixes" => TrackCategory::Remixes,
            "mashups-edits" => TrackCategory::MashupsEdits,
            "full-mixes" => TrackCategory::FullMixes,
            _ => TrackCategory::Other(s),
        }
    }
}

impl From<TrackCategory> for String {
    fn from(c: TrackCategory) -> Self {
        c.slug().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Original,
    Remix,
    Collaboration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingLink {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: RecordId,
    pub title: String,
    pub slug: Slug,
    pub artist_name: String,
    #[serde(default)]
    pub cover_art: Option<AssetRef>,
    pub category: TrackCategory,
    #[serde(default)]
    pub track_type: Option<TrackType>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub streaming_links: Vec<StreamingLink>,
    #[serde(default)]
    pub download_link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub published_at: DateTime<Utc>,
}

impl Track {
    /// Preferred streaming link: the primary one, falling back to the first.
    pub fn primary_streaming_link(&self) -> Option<&StreamingLink> {
        self.streaming_links
            .iter()
            .find(|l| l.is_primary)
            .or_else(|| self.streaming_links.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePack {
    pub id: RecordId,
    pub name: String,
    pub slug: Slug,
    #[serde(default)]
    pub cover_image: Option<AssetRef>,
    pub description: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub bpm: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub sample_count: Option<u32>,
    #[serde(default)]
    pub pack_size: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub gumroad_url: Option<String>,
    #[serde(default)]
    pub preview_audio: Option<AssetRef>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub stage_name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<AssetRef>,
    #[serde(default)]
    pub hero_image: Option<AssetRef>,
    #[serde(default)]
    pub short_bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub booking_email: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_known_slugs() {
        for slug in TrackCategory::KNOWN {
            let cat = TrackCategory::from(slug.to_string());
            assert!(!matches!(cat, TrackCategory::Other(_)));
            assert_eq!(cat.slug(), slug);
        }
    }

    #[test]
    fn category_preserves_unlisted_values() {
        let cat = TrackCategory::from("unlisted".to_string());
        assert_eq!(cat, TrackCategory::Other("unlisted".to_string()));
        assert_eq!(cat.slug(), "unlisted");
    }

    #[test]
    fn track_decodes_with_optional_fields_missing() {
        let raw = serde_json::json!({
            "id": "t1",
            "title": "Midnight Drive",
            "slug": "midnight-drive",
            "artistName": "Latitude 59",
            "category": "remixes",
            "publishedAt": "2024-03-01T00:00:00Z"
        });
        let track: Track = serde_json::from_value(raw).unwrap();
        assert_eq!(track.category, TrackCategory::Remixes);
        assert!(track.genre.is_none());
        assert!(track.streaming_links.is_empty());
        assert!(!track.featured);
    }

    #[test]
    fn primary_streaming_link_prefers_flagged() {
        let raw = serde_json::json!({
            "id": "t1",
            "title": "Midnight Drive",
            "slug": "midnight-drive",
            "artistName": "Latitude 59",
            "category": "remixes",
            "publishedAt": "2024-03-01T00:00:00Z",
            "streamingLinks": [
                {"platform": "soundcloud", "url": "https://sc/x"},
                {"platform": "spotify", "url": "https://sp/x", "isPrimary": true}
            ]
        });
        let track: Track = serde_json::from_value(raw).unwrap();
        assert_eq!(track.primary_streaming_link().unwrap().platform, "spotify");
    }
}
