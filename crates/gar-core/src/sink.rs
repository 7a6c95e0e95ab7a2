// crates/gar-core/src/sink.rs
#![cfg(feature = "upload")]

//! Elasticsearch sink: index creation plus `_bulk` upload of assembled
//! addresses.
//!
//! The address `id` is the document key and is stripped from the document
//! body to avoid duplication. Uploads go out as NDJSON `_bulk` requests in
//! fixed-size chunks over the blocking HTTP client.

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::address::StructuredAddress;
use crate::error::{GarError, Result};

/// Default index name.
pub const DEFAULT_INDEX: &str = "fias";

/// Documents per `_bulk` request.
const BULK_CHUNK: usize = 500;

/// Index settings + mappings. All address fields are free text analyzed
/// for Russian; the document key lives in `_id` only.
static INDEX_BODY: Lazy<Value> = Lazy::new(|| {
    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "default": { "type": "russian" }
                }
            }
        },
        "mappings": {
            "properties": {
                "region":      { "type": "text" },
                "town":        { "type": "text" },
                "street":      { "type": "text" },
                "house":       { "type": "text" },
                "extra_house": { "type": "text" },
                "leftover":    { "type": "text" },
                "municipal":   { "type": "text" }
            }
        }
    })
});

/// A connection to one Elasticsearch index.
pub struct IndexSink {
    client: Client,
    base_url: String,
    index: String,
}

impl IndexSink {
    pub fn new(base_url: &str, index: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(IndexSink {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    /// Create the index with its settings and mappings. An HTTP 400 means
    /// the index already exists and is tolerated.
    pub fn ensure_index(&self) -> Result<()> {
        let url = format!("{}/{}", self.base_url, self.index);
        let response = self.client.put(&url).json(&*INDEX_BODY).send()?;
        if response.status() == StatusCode::BAD_REQUEST {
            debug!(index = %self.index, "index already exists");
            return Ok(());
        }
        response.error_for_status()?;
        Ok(())
    }

    /// Upload all addresses, returning the number of documents shipped.
    pub fn bulk_upload(&self, addresses: &[StructuredAddress]) -> Result<usize> {
        let url = format!("{}/_bulk", self.base_url);
        for chunk in addresses.chunks(BULK_CHUNK) {
            let body = bulk_body(&self.index, chunk)?;
            let response = self
                .client
                .post(&url)
                .header(CONTENT_TYPE, "application/x-ndjson")
                .body(body)
                .send()?
                .error_for_status()?;

            let report: Value = response.json()?;
            if report.get("errors").and_then(Value::as_bool).unwrap_or(false) {
                let failures = count_failures(&report);
                warn!(failures, "bulk request partially rejected");
                return Err(GarError::BulkRejected { failures });
            }
        }
        Ok(addresses.len())
    }
}

/// Render one `_bulk` NDJSON payload: an action line and a source line per
/// document, newline-terminated.
pub fn bulk_body(index: &str, addresses: &[StructuredAddress]) -> Result<String> {
    let mut out = String::new();
    for addr in addresses {
        let action = json!({ "index": { "_index": index, "_id": addr.id.to_string() } });
        out.push_str(&action.to_string());
        out.push('\n');
        out.push_str(&doc_body(addr)?.to_string());
        out.push('\n');
    }
    Ok(out)
}

/// The document body: every field except the `id` key.
fn doc_body(addr: &StructuredAddress) -> Result<Value> {
    let mut value = serde_json::to_value(addr)?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

fn count_failures(report: &Value) -> usize {
    report
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| {
                    item.get("index")
                        .and_then(|i| i.get("error"))
                        .is_some()
                })
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(id: u64) -> StructuredAddress {
        StructuredAddress {
            id,
            region: "область Северная".to_string(),
            town: "город Среднегорск".to_string(),
            street: "улица Вязовая".to_string(),
            house: "здание 12".to_string(),
            extra_house: String::new(),
            leftover: String::new(),
            municipal: String::new(),
        }
    }

    #[test]
    fn document_body_excludes_the_id() {
        let body = doc_body(&addr(42)).expect("body");
        assert!(body.get("id").is_none());
        assert_eq!(
            body.get("street").and_then(Value::as_str),
            Some("улица Вязовая")
        );
    }

    #[test]
    fn bulk_body_is_ndjson_with_action_lines() {
        let body = bulk_body("fias", &[addr(1), addr(2)]).expect("body");
        assert!(body.ends_with('\n'));
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);
        let action: Value = serde_json::from_str(lines[0]).expect("action json");
        assert_eq!(
            action["index"]["_index"].as_str(),
            Some("fias")
        );
        assert_eq!(action["index"]["_id"].as_str(), Some("1"));
        let source: Value = serde_json::from_str(lines[1]).expect("source json");
        assert!(source.get("id").is_none());
    }

    #[test]
    fn failure_counting_reads_item_errors() {
        let report = json!({
            "errors": true,
            "items": [
                { "index": { "status": 201 } },
                { "index": { "status": 400, "error": { "type": "mapper_parsing_exception" } } }
            ]
        });
        assert_eq!(count_failures(&report), 1);
    }
}
