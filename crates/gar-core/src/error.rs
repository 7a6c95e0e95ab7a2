// crates/gar-core/src/error.rs

//! Error types for the registry pipeline.
//!
//! Two tiers: [`GarError::SourceData`] is fatal and aborts a region's run
//! (mis-joined reference data would corrupt every derived address), while
//! unresolved ancestor references never surface here at all — they degrade
//! to empty output fields in the assembler.

use thiserror::Error;

/// Main error type for the `gar-core` library.
#[derive(Debug, Error)]
pub enum GarError {
    /// A required reference table could not be uniquely located for the region.
    #[error("region {region}: expected exactly one {category} table, found {found}")]
    SourceData {
        region: String,
        category: &'static str,
        found: usize,
    },

    /// A registry record is missing a required XML attribute.
    #[error("missing attribute {attribute} on <{element}>")]
    MissingAttribute {
        attribute: &'static str,
        element: String,
    },

    /// A registry record carries an attribute value that does not parse.
    #[error("invalid value '{value}' for attribute {attribute}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },

    /// Dataset file not found or unreadable.
    #[error("{0}")]
    NotFound(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Date attribute failed to parse (expected YYYY-MM-DD).
    #[error("date parsing failed: {0}")]
    Date(#[from] chrono::ParseError),

    /// Binary catalog cache (de)serialization failed.
    #[error("cache (de)serialization failed: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request to the search index failed.
    #[cfg(feature = "upload")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The search index rejected part of a bulk request.
    #[cfg(feature = "upload")]
    #[error("bulk indexing rejected {failures} document(s)")]
    BulkRejected { failures: usize },
}

/// Result type alias for `gar-core` operations.
pub type Result<T> = std::result::Result<T, GarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_data_names_region_and_category() {
        let err = GarError::SourceData {
            region: "77".to_string(),
            category: "AS_ADDR_OBJ",
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("77"));
        assert!(msg.contains("AS_ADDR_OBJ"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn missing_attribute_display() {
        let err = GarError::MissingAttribute {
            attribute: "OBJECTID",
            element: "OBJECT".to_string(),
        };
        assert_eq!(err.to_string(), "missing attribute OBJECTID on <OBJECT>");
    }
}
