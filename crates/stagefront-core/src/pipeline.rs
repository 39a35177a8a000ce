use serde::Serialize;
use tracing::warn;

use crate::catalog::{compare_values, CatalogRecord, FieldValue};
use crate::errors::{QueryError, Result};
use crate::query::{QuerySpec, SortOrder};

/// Named partition of grouped output. Buckets appear in the taxonomy's
/// declared order and are present even when empty, matching how the
/// downloads view renders all three category sections.
#[derive(Debug, Clone, Serialize)]
pub struct Bucket<T> {
    pub name: String,
    pub items: Vec<T>,
}

/// Pipeline output: a flat ordered list, or the fixed buckets when the spec
/// asked for grouping.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryOutput<T> {
    Flat(Vec<T>),
    Grouped(Vec<Bucket<T>>),
}

impl<T> QueryOutput<T> {
    /// Number of records in the output across all buckets.
    pub fn len(&self) -> usize {
        match self {
            QueryOutput::Flat(items) => items.len(),
            QueryOutput::Grouped(buckets) => buckets.iter().map(|b| b.items.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_flat(&self) -> Option<&[T]> {
        match self {
            QueryOutput::Flat(items) => Some(items),
            QueryOutput::Grouped(_) => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&[Bucket<T>]> {
        match self {
            QueryOutput::Flat(_) => None,
            QueryOutput::Grouped(buckets) => Some(buckets),
        }
    }
}

/// Run the full filter -> sort -> group pipeline over an in-memory
/// collection. Pure and synchronous; the input is never mutated and ids are
/// carried through untouched.
pub fn apply<T: CatalogRecord>(items: &[T], spec: &QuerySpec) -> Result<QueryOutput<T>> {
    validate::<T>(spec)?;

    // Stage 1: filter (conjunction; the empty spec passes everything).
    let needle = spec.search_term.to_lowercase();
    let mut picked: Vec<&T> = Vec::with_capacity(items.len());
    for item in items {
        if item.id().is_empty() {
            warn!(kind = T::KIND, "skipping record with missing id");
            continue;
        }
        if passes(item, spec, &needle) {
            picked.push(item);
        }
    }

    // Stage 2: stable sort. Equal keys keep their relative input order,
    // which grouping below depends on.
    if let Some(key) = spec.sort_key.as_deref() {
        picked.sort_by(|a, b| {
            let ord = match (a.field(key), b.field(key)) {
                (Some(x), Some(y)) => compare_values(&x, &y),
                // Absent sorts below any present value.
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            match spec.sort_order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }

    // Stage 3: optional grouping into the closed bucket set. The filter is
    // not re-run; values outside the taxonomy drop out silently.
    match spec.group_key.as_deref() {
        None => Ok(QueryOutput::Flat(picked.into_iter().cloned().collect())),
        Some(key) => {
            let names = T::buckets(key).ok_or_else(|| QueryError::UnknownGroupField {
                kind: T::KIND,
                field: key.to_string(),
            })?;
            let mut buckets: Vec<Bucket<T>> = names
                .iter()
                .map(|n| Bucket {
                    name: (*n).to_string(),
                    items: Vec::new(),
                })
                .collect();
            for item in picked {
                let Some(FieldValue::Text(value)) = item.field(key) else {
                    continue;
                };
                if let Some(bucket) = buckets.iter_mut().find(|b| b.name == value.as_ref()) {
                    bucket.items.push(item.clone());
                }
            }
            Ok(QueryOutput::Grouped(buckets))
        }
    }
}

fn validate<T: CatalogRecord>(spec: &QuerySpec) -> Result<()> {
    if let Some(key) = spec.sort_key.as_deref() {
        if !T::fields().contains(&key) {
            return Err(QueryError::UnknownSortField {
                kind: T::KIND,
                field: key.to_string(),
            });
        }
    }
    for field in spec.equality_filters.keys() {
        if !T::fields().contains(&field.as_str()) {
            return Err(QueryError::UnknownFilterField {
                kind: T::KIND,
                field: field.clone(),
            });
        }
    }
    if let Some(range) = &spec.range {
        if !T::fields().contains(&range.field.as_str()) {
            return Err(QueryError::UnknownRangeField {
                kind: T::KIND,
                field: range.field.clone(),
            });
        }
    }
    if let Some(key) = spec.group_key.as_deref() {
        if T::buckets(key).is_none() {
            return Err(QueryError::UnknownGroupField {
                kind: T::KIND,
                field: key.to_string(),
            });
        }
    }
    Ok(())
}

fn passes<T: CatalogRecord>(item: &T, spec: &QuerySpec, needle: &str) -> bool {
    if !needle.is_empty()
        && !item
            .search_text()
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
    {
        return false;
    }
    for (field, expected) in &spec.equality_filters {
        if expected.is_empty() {
            continue; // inert filter ("All Genres")
        }
        match item.field(field) {
            Some(value) if value.matches(expected) => {}
            _ => return false,
        }
    }
    if let Some(range) = &spec.range {
        let Some(n) = item.field(&range.field).and_then(|v| v.as_number()) else {
            return false;
        };
        if range.min.is_some_and(|min| n < min) {
            return false;
        }
        if range.max.is_some_and(|max| n > max) {
            return false;
        }
    }
    true
}
