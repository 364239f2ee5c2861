//! Transcript document fetching.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::{document_url, nth_suffix, validate_date, validate_suffix, MAX_SUFFIXES, TRANSCRIPT_BASE_URL};
use crate::error::{HarvesterError, Result};
use crate::http::{create_client, fetch_text, DEFAULT_RETRY_DELAY};
use crate::types::Chamber;

/// Source of raw transcript XML.
pub trait DocumentFetcher {
    /// Fetch one revision of a day's transcript. `Ok(None)` when it does
    /// not exist.
    ///
    /// # Errors
    /// Transport failures other than "not found".
    fn fetch(&self, date: &str, suffix: &str, chamber: Chamber) -> Result<Option<String>>;

    /// Fetch the latest revision of a day's transcript.
    ///
    /// Revisions are probed in order (`a`, `b`, ...) until the first miss;
    /// the last hit is returned together with its suffix.
    ///
    /// # Errors
    /// Propagates errors from [`fetch`](Self::fetch).
    fn fetch_latest(&self, date: &str, chamber: Chamber) -> Result<Option<(String, String)>> {
        let mut latest = None;
        for suffix in (0..MAX_SUFFIXES).filter_map(nth_suffix) {
            match self.fetch(date, &suffix, chamber)? {
                Some(xml) => latest = Some((suffix, xml)),
                None => break,
            }
        }
        Ok(latest)
    }
}

/// Fetcher over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Fetcher for the public transcript archive.
    ///
    /// # Errors
    /// Returns `Http` if the client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_base_url(TRANSCRIPT_BASE_URL)
    }

    /// Fetcher for an archive mirror at `base_url`.
    ///
    /// # Errors
    /// Returns `Http` if the client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            base_url: base_url.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Override the retry backoff base.
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, date: &str, suffix: &str, chamber: Chamber) -> Result<Option<String>> {
        validate_date(date)?;
        validate_suffix(suffix)?;

        let url = document_url(&self.base_url, chamber, date, suffix);
        tracing::info!(url = %url, "Fetching transcript");

        fetch_text(&self.client, &url, self.retry_delay).map_err(|err| match err {
            HarvesterError::Http(source) => HarvesterError::DocumentDownload {
                chamber: chamber.as_str().to_string(),
                date: date.to_string(),
                suffix: suffix.to_string(),
                source,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Fetcher over a fixed set of suffixes.
    struct Fixed(HashMap<String, String>);

    impl DocumentFetcher for Fixed {
        fn fetch(&self, _date: &str, suffix: &str, _chamber: Chamber) -> Result<Option<String>> {
            Ok(self.0.get(suffix).cloned())
        }
    }

    fn fixed(suffixes: &[&str]) -> Fixed {
        Fixed(
            suffixes
                .iter()
                .map(|s| ((*s).to_string(), format!("<publicwhip>{s}</publicwhip>")))
                .collect(),
        )
    }

    #[test]
    fn test_fetch_latest_returns_last_hit() {
        let (suffix, xml) = fixed(&["a", "b", "c"])
            .fetch_latest("2024-01-15", Chamber::Commons)
            .unwrap()
            .unwrap();
        assert_eq!(suffix, "c");
        assert!(xml.contains('c'));
    }

    #[test]
    fn test_fetch_latest_stops_at_first_miss() {
        let (suffix, _) = fixed(&["a", "c"])
            .fetch_latest("2024-01-15", Chamber::Lords)
            .unwrap()
            .unwrap();
        assert_eq!(suffix, "a");
    }

    #[test]
    fn test_fetch_latest_none_when_missing() {
        assert!(fixed(&[])
            .fetch_latest("2024-01-15", Chamber::Commons)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_http_fetch_validates_input() {
        let fetcher = HttpFetcher::new().unwrap();
        assert!(matches!(
            fetcher.fetch("15-01-2024", "a", Chamber::Commons),
            Err(HarvesterError::InvalidDate(_))
        ));
        assert!(matches!(
            fetcher.fetch("2024-01-15", "aa", Chamber::Commons),
            Err(HarvesterError::InvalidSuffix(_))
        ));
    }
}
