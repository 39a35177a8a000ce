use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::{SamplePack, Track, TrackCategory};

/// Typed view of a single catalog field, borrowed from the record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue<'_> {
    /// Exact-equality check against a filter value as it arrives off the
    /// wire. Text compares verbatim; numbers compare after parsing.
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            FieldValue::Text(v) => v.as_ref() == expected,
            FieldValue::Number(n) => expected.parse::<f64>().map(|e| e == *n).unwrap_or(false),
            FieldValue::Timestamp(ts) => expected
                .parse::<DateTime<Utc>>()
                .map(|e| e == *ts)
                .unwrap_or(false),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Total order across values of the same field. Variant mismatches (a field
/// that is text on one record and numeric on another) fall back to a fixed
/// variant rank so the comparator stays a total order.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => collate(x, y),
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(y),
        _ => variant_rank(a).cmp(&variant_rank(b)),
    }
}

fn variant_rank(v: &FieldValue<'_>) -> u8 {
    match v {
        FieldValue::Text(_) => 0,
        FieldValue::Number(_) => 1,
        FieldValue::Timestamp(_) => 2,
    }
}

/// Human-friendly string collation: case-insensitive first, raw byte order
/// as the tiebreak so the order stays deterministic for "Apple" vs "apple".
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Capability surface the query pipeline needs from a catalog record kind:
/// identity, searchable text, named field access, and (for groupable
/// fields) the closed bucket taxonomy.
pub trait CatalogRecord: Clone {
    /// Human-readable kind name used in logs and errors.
    const KIND: &'static str;

    /// Store-assigned identity; unique within a collection. Empty means the
    /// record is malformed and gets skipped (with a warning), never erroring
    /// the whole query.
    fn id(&self) -> &str;

    /// Designated free-text search fields. List-valued fields (tags)
    /// contribute one entry per element.
    fn search_text(&self) -> Vec<&str>;

    /// Typed value of a named field, or `None` when the record does not
    /// carry it. Unknown names are rejected up front via [`Self::fields`].
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Field names recognized for sorting, equality filters, and range
    /// filters on this kind.
    fn fields() -> &'static [&'static str];

    /// Closed bucket taxonomy for a groupable field, in display order.
    /// `None` means the field cannot be grouped on.
    fn buckets(name: &str) -> Option<&'static [&'static str]>;
}

impl CatalogRecord for Track {
    const KIND: &'static str = "track";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.artist_name]
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "title" => Some(FieldValue::Text(Cow::Borrowed(&self.title))),
            "artistName" => Some(FieldValue::Text(Cow::Borrowed(&self.artist_name))),
            "genre" => self
                .genre
                .as_deref()
                .map(|g| FieldValue::Text(Cow::Borrowed(g))),
            "category" => Some(FieldValue::Text(Cow::Borrowed(self.category.slug()))),
            "publishedAt" => Some(FieldValue::Timestamp(self.published_at)),
            "releaseDate" => self
                .release_date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|start| FieldValue::Timestamp(DateTime::from_naive_utc_and_offset(start, Utc))),
            _ => None,
        }
    }

    fn fields() -> &'static [&'static str] {
        &[
            "title",
            "artistName",
            "genre",
            "category",
            "publishedAt",
            "releaseDate",
        ]
    }

    fn buckets(name: &str) -> Option<&'static [&'static str]> {
        match name {
            "category" => Some(&TrackCategory::KNOWN),
            _ => None,
        }
    }
}

impl CatalogRecord for SamplePack {
    const KIND: &'static str = "samplePack";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        let mut out = vec![self.name.as_str(), self.description.as_str()];
        out.extend(self.tags.iter().map(String::as_str));
        out
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(Cow::Borrowed(&self.name))),
            "description" => Some(FieldValue::Text(Cow::Borrowed(&self.description))),
            "genre" => self
                .genre
                .as_deref()
                .map(|g| FieldValue::Text(Cow::Borrowed(g))),
            "price" => Some(FieldValue::Number(self.price)),
            "sampleCount" => self.sample_count.map(|c| FieldValue::Number(c as f64)),
            "publishedAt" => Some(FieldValue::Timestamp(self.published_at)),
            _ => None,
        }
    }

    fn fields() -> &'static [&'static str] {
        &[
            "name",
            "description",
            "genre",
            "price",
            "sampleCount",
            "publishedAt",
        ]
    }

    fn buckets(_name: &str) -> Option<&'static [&'static str]> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collate_is_case_insensitive_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Banana", "apple"), Ordering::Greater);
        // Equal ignoring case still produces a deterministic order.
        assert_eq!(collate("Apple", "apple"), collate("Apple", "apple"));
        assert_ne!(collate("Apple", "apple"), Ordering::Equal);
    }

    #[test]
    fn numeric_match_parses_expected() {
        let v = FieldValue::Number(15.0);
        assert!(v.matches("15"));
        assert!(v.matches("15.0"));
        assert!(!v.matches("16"));
        assert!(!v.matches("cheap"));
    }
}
