//! Harvest service: fetch, parse and store one day's transcript.

use crate::config::{validate_date, validate_suffix};
use crate::error::Result;
use crate::fetch::DocumentFetcher;
use crate::parser::{parse_document_with, ParseOptions};
use crate::store::ItemStore;
use crate::types::Chamber;

/// What to harvest.
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    /// Sitting date, `YYYY-MM-DD`.
    pub date: String,
    pub chamber: Chamber,
    /// Specific revision; the latest one is used when `None`.
    pub suffix: Option<String>,
    pub options: ParseOptions,
}

impl HarvestRequest {
    #[must_use]
    pub fn new(date: impl Into<String>, chamber: Chamber) -> Self {
        Self {
            date: date.into(),
            chamber,
            suffix: None,
            options: ParseOptions::default(),
        }
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of a harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestReport {
    /// No transcript exists for the request.
    NotFound,

    /// The transcript was parsed and its items stored.
    Stored {
        suffix: String,
        items: usize,
        warnings: Vec<String>,
    },
}

/// Fetch, parse and store the transcript described by `request`.
///
/// # Errors
/// Returns validation errors for a bad date or suffix, and propagates
/// fetch, parse and store failures.
pub fn harvest<F, S>(fetcher: &F, store: &mut S, request: HarvestRequest) -> Result<HarvestReport>
where
    F: DocumentFetcher + ?Sized,
    S: ItemStore + ?Sized,
{
    validate_date(&request.date)?;
    if let Some(suffix) = &request.suffix {
        validate_suffix(suffix)?;
    }

    let fetched = match &request.suffix {
        Some(suffix) => fetcher
            .fetch(&request.date, suffix, request.chamber)?
            .map(|xml| (suffix.clone(), xml)),
        None => fetcher.fetch_latest(&request.date, request.chamber)?,
    };
    let Some((suffix, xml)) = fetched else {
        tracing::info!(date = %request.date, chamber = %request.chamber.as_str(), "No transcript found");
        return Ok(HarvestReport::NotFound);
    };

    let parsed = parse_document_with(&xml, request.chamber, request.options)?;
    for warning in &parsed.warnings {
        tracing::warn!(date = %request.date, suffix = %suffix, "{warning}");
    }

    store.store(request.chamber, &parsed.items)?;

    Ok(HarvestReport::Stored {
        suffix,
        items: parsed.items.len(),
        warnings: parsed.warnings,
    })
}
