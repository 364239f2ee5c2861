//! Business item persistence.
//!
//! Stores are keyed on item id: storing an item whose id is already
//! present replaces it, so re-harvesting a day is idempotent.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{BusinessItem, Chamber};

/// Destination for parsed business items.
pub trait ItemStore {
    /// Store items, replacing any with the same id.
    ///
    /// # Errors
    /// Backend failures.
    fn store(&mut self, chamber: Chamber, items: &[BusinessItem]) -> Result<()>;
}

/// Filesystem-safe file stem for an item id.
///
/// # Examples
/// ```
/// use hansard_harvester::store::sanitize_id;
///
/// assert_eq!(
///     sanitize_id("uk.org.publicwhip/debate/2024-01-15a.5"),
///     "uk.org.publicwhip_debate_2024-01-15a.5"
/// );
/// ```
#[must_use]
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// One pretty-printed JSON file per item under `{root}/{chamber}/`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an item with `id` is written to.
    #[must_use]
    pub fn item_path(&self, chamber: Chamber, id: &str) -> PathBuf {
        self.root
            .join(chamber.dir_name())
            .join(format!("{}.json", sanitize_id(id)))
    }

    /// Write one item: temp file, sync, then rename over the target.
    fn write_item(&self, dir: &Path, chamber: Chamber, item: &BusinessItem) -> Result<PathBuf> {
        let output_file = self.item_path(chamber, &item.id);
        let temp_file = dir.join(format!(".{}.json.tmp", sanitize_id(&item.id)));

        let content = serde_json::to_string_pretty(item)?;
        {
            let mut file = File::create(&temp_file)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        // On Windows, rename fails if the destination already exists
        #[cfg(target_os = "windows")]
        if output_file.exists() {
            fs::remove_file(&output_file)?;
        }

        fs::rename(&temp_file, &output_file)?;
        Ok(output_file)
    }
}

impl ItemStore for JsonStore {
    fn store(&mut self, chamber: Chamber, items: &[BusinessItem]) -> Result<()> {
        let dir = self.root.join(chamber.dir_name());
        fs::create_dir_all(&dir)?;

        for item in items {
            let path = self.write_item(&dir, chamber, item)?;
            tracing::debug!(id = %item.id, path = %path.display(), "Stored item");
        }
        tracing::info!(chamber = %chamber.as_str(), count = items.len(), "Stored items");
        Ok(())
    }
}

/// In-memory store, ordered by chamber then id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<(Chamber, String), BusinessItem>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, chamber: Chamber, id: &str) -> Option<&BusinessItem> {
        self.items.get(&(chamber, id.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored items in key order.
    pub fn items(&self) -> impl Iterator<Item = &BusinessItem> {
        self.items.values()
    }
}

impl ItemStore for MemoryStore {
    fn store(&mut self, chamber: Chamber, items: &[BusinessItem]) -> Result<()> {
        for item in items {
            self.items.insert((chamber, item.id.clone()), item.clone());
        }
        Ok(())
    }
}
