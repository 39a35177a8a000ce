use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    /// Newest-first is the storefront default everywhere the direction is
    /// not explicit in the request.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Ascending),
            "desc" => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// Inclusive numeric range over a single field. Either bound may be open;
/// `min > max` is a legal spec that matches nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeFilter {
    pub field: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// One pipeline invocation's configuration. Built per interaction and
/// discarded after use; the default spec is the identity query (every
/// record passes, input order kept).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QuerySpec {
    /// Empty means no search. Whitespace-only is a literal term, not
    /// normalized away; substring match is case-insensitive, no trimming.
    pub search_term: String,
    /// Field -> expected value, all must hold. Entries with an empty value
    /// are inert (the UI's "All Genres" option).
    pub equality_filters: BTreeMap<String, String>,
    pub range: Option<RangeFilter>,
    /// `None` keeps the filtered records in input order.
    pub sort_key: Option<String>,
    pub sort_order: SortOrder,
    /// When set, partitions output into that field's closed bucket set.
    pub group_key: Option<String>,
}

impl QuerySpec {
    pub fn sorted_by(key: impl Into<String>, order: SortOrder) -> Self {
        QuerySpec {
            sort_key: Some(key.into()),
            sort_order: order,
            ..QuerySpec::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.equality_filters.insert(field.into(), value.into());
        self
    }

    pub fn range(mut self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        self.range = Some(RangeFilter {
            field: field.into(),
            min,
            max,
        });
        self
    }

    pub fn grouped_by(mut self, field: impl Into<String>) -> Self {
        self.group_key = Some(field.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_identity() {
        let spec = QuerySpec::default();
        assert!(spec.search_term.is_empty());
        assert!(spec.equality_filters.is_empty());
        assert!(spec.range.is_none());
        assert!(spec.sort_key.is_none());
        assert!(spec.group_key.is_none());
    }

    #[test]
    fn sort_order_wire_names() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse("descending"), None);
        let json = serde_json::to_string(&SortOrder::Descending).unwrap();
        assert_eq!(json, "\"desc\"");
    }
}
