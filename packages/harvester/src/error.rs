//! Error types for the harvester.
//!
//! `HarvesterError` covers both the fatal document-level failures
//! (structural problems, id collisions) and the node-level failures that the
//! walker recovers from and records as warnings.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid date format.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD (e.g., 2024-01-15)")]
    InvalidDate(String),

    /// Invalid document suffix.
    #[error("Invalid document suffix: '{0}'. Expected a single lowercase letter (e.g., a)")]
    InvalidSuffix(String),

    /// Unknown chamber name.
    #[error("Unknown chamber: '{0}'. Expected commons, lords, westminster-hall or standing-committee")]
    InvalidChamber(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download a transcript document.
    #[error("Failed to download {chamber} transcript for {date}{suffix}: {source}")]
    DocumentDownload {
        chamber: String,
        date: String,
        suffix: String,
        #[source]
        source: reqwest::Error,
    },

    /// All retry attempts failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The document has no usable root element.
    #[error("Structural error: {0}")]
    Structural(String),

    /// Missing required XML attribute.
    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute { attribute: String, element: String },

    /// XML attribute present but unusable.
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        attribute: String,
        element: String,
        value: String,
    },

    /// A single node could not be processed.
    #[error("Failed to process <{tag}>: {message}")]
    NodeProcessing { tag: String, message: String },

    /// A retroactively assigned held-item id is already taken.
    #[error("Held item id '{id}' collides with an existing business item")]
    IdCollision { id: String },

    /// Business taxonomy could not be loaded.
    #[error("Invalid business taxonomy: {0}")]
    Taxonomy(#[from] serde_yaml_ng::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvesterError {
    /// Build a `MissingAttribute` error.
    #[must_use]
    pub fn missing_attribute(attribute: &str, element: &str) -> Self {
        Self::MissingAttribute {
            attribute: attribute.to_string(),
            element: element.to_string(),
        }
    }

    /// Build an `InvalidAttribute` error.
    #[must_use]
    pub fn invalid_attribute(attribute: &str, element: &str, value: &str) -> Self {
        Self::InvalidAttribute {
            attribute: attribute.to_string(),
            element: element.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether this error must abort the whole document.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Structural(_) | Self::XmlParse(_) | Self::IdCollision { .. }
        )
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
