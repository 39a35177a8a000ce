use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::warn;

/// Decode a batch of raw store documents, dropping the ones that fail.
/// One bad record must not blank out the whole catalog view, so decode
/// failures and missing ids downgrade to warnings.
pub fn decode_many<T: DeserializeOwned>(kind: &str, raw: Vec<JsonValue>) -> Vec<T> {
    let mut out = Vec::with_capacity(raw.len());
    for value in raw {
        let id = value
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        if id.is_empty() {
            warn!(kind, "dropping record with missing id");
            continue;
        }
        match serde_json::from_value::<T>(value) {
            Ok(record) => out.push(record),
            Err(err) => warn!(kind, id = %id, error = %err, "dropping undecodable record"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagefront_core::SamplePack;

    #[test]
    fn bad_records_are_dropped_good_ones_kept() {
        let raw = vec![
            serde_json::json!({
                "id": "p1",
                "name": "Trap Kit",
                "slug": "trap-kit",
                "description": "808s",
                "price": 15.0,
                "publishedAt": "2024-01-01T00:00:00Z"
            }),
            // Missing id.
            serde_json::json!({
                "name": "Ghost",
                "slug": "ghost",
                "description": "no id",
                "price": 5.0,
                "publishedAt": "2024-01-01T00:00:00Z"
            }),
            // Price is the wrong type.
            serde_json::json!({
                "id": "p3",
                "name": "Broken",
                "slug": "broken",
                "description": "bad price",
                "price": "fifteen",
                "publishedAt": "2024-01-01T00:00:00Z"
            }),
        ];
        let packs: Vec<SamplePack> = decode_many("samplePack", raw);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].id, "p1");
    }
}
