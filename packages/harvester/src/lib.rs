//! Hansard Harvester - Parse parliamentary transcripts into business items.
//!
//! This crate reads TheyWorkForYou-style Hansard transcript XML for the
//! House of Commons, House of Lords, Westminster Hall and public bill
//! committees, and segments each day's proceedings into classified
//! business items carrying their speeches, divisions and references.
//!
//! # Example
//!
//! ```
//! use hansard_harvester::{parse_document, Chamber};
//!
//! let xml = r#"<publicwhip>
//!   <major-heading id="uk.org.publicwhip/debate/2024-01-15a.1.0">Speaker's Statement</major-heading>
//!   <speech id="uk.org.publicwhip/debate/2024-01-15a.1.1" speakername="Mr Speaker">
//!     <p>I have a short statement to make.</p>
//!   </speech>
//! </publicwhip>"#;
//!
//! let parsed = parse_document(xml, Chamber::Commons).unwrap();
//! assert_eq!(parsed.items.len(), 1);
//! assert_eq!(parsed.items[0].business_type.category, "PROCEDURAL");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`types`]: Core data types (BusinessItem, Speech, Division, etc.)
//! - [`error`]: Error types and Result alias
//! - [`xml`], [`text`]: XML and text utilities
//! - [`references`], [`speech`], [`division`], [`roles`]: per-element extraction
//! - [`taxonomy`], [`category`]: business classification
//! - [`registry`]: Extensible element handler system
//! - [`walker`]: Document traversal and item assembly
//! - [`chamber`]: Chamber-specific strategies
//! - [`parser`]: Parsing entry points
//! - [`http`], [`fetch`], [`store`]: Document retrieval and persistence
//! - [`harvester`]: Fetch, parse and store service
//! - [`cli`]: Command-line interface

pub mod category;
pub mod chamber;
pub mod cli;
pub mod config;
pub mod division;
pub mod error;
pub mod fetch;
pub mod harvester;
pub mod http;
pub mod parser;
pub mod references;
pub mod registry;
pub mod roles;
pub mod speech;
pub mod store;
pub mod taxonomy;
pub mod text;
pub mod types;
pub mod walker;
pub mod xml;

pub use harvester::{harvest, HarvestReport, HarvestRequest};
pub use parser::{parse_document, parse_document_with, ParseOptions};

pub use config::{validate_date, validate_suffix};
pub use error::{HarvesterError, Result};
pub use types::{BusinessItem, Category, Chamber, Division, ParsedDocument, Speech};
