//! Business type taxonomy and classifier.
//!
//! The taxonomy is a precedence-ordered tree of category, type and subtype
//! nodes loaded from YAML. The built-in tree is embedded from
//! `taxonomy.yaml`; callers may load a replacement of the same shape.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::types::{BusinessType, Chamber};

/// Built-in taxonomy document.
const BUILTIN_TAXONOMY: &str = include_str!("taxonomy.yaml");

/// Marker test shared by every level of the tree.
#[derive(Debug, Clone, Default, Deserialize)]
struct Markers {
    #[serde(default)]
    markers: Vec<String>,

    #[serde(default)]
    match_all: bool,
}

impl Markers {
    /// `None` when there are no markers, so the node defers to its parent.
    fn test(&self, lowered: &str) -> Option<bool> {
        if self.markers.is_empty() {
            return None;
        }
        let mut hits = self
            .markers
            .iter()
            .map(|m| lowered.contains(m.to_lowercase().as_str()));
        Some(if self.match_all {
            hits.all(|hit| hit)
        } else {
            hits.any(|hit| hit)
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SubtypeNode {
    name: String,
    #[serde(flatten)]
    markers: Markers,
}

#[derive(Debug, Clone, Deserialize)]
struct TypeNode {
    name: String,
    #[serde(flatten)]
    markers: Markers,
    #[serde(default)]
    subtypes: Vec<SubtypeNode>,
}

#[derive(Debug, Clone, Deserialize)]
struct CategoryNode {
    category: String,
    #[serde(flatten)]
    markers: Markers,
    #[serde(default)]
    types: Vec<TypeNode>,
}

/// The taxonomy document: a generic list plus one list per chamber.
#[derive(Debug, Clone, Default, Deserialize)]
struct TaxonomyFile {
    #[serde(default)]
    generic: Vec<CategoryNode>,
    #[serde(default)]
    commons: Vec<CategoryNode>,
    #[serde(default)]
    lords: Vec<CategoryNode>,
    #[serde(default)]
    westminster_hall: Vec<CategoryNode>,
    #[serde(default)]
    standing_committee: Vec<CategoryNode>,
}

impl TaxonomyFile {
    fn into_chamber(self, chamber: Chamber) -> Taxonomy {
        let mut entries = match chamber {
            Chamber::Commons => self.commons,
            Chamber::Lords => self.lords,
            Chamber::WestminsterHall => self.westminster_hall,
            Chamber::StandingCommittee => self.standing_committee,
        };
        entries.extend(self.generic);
        Taxonomy { entries }
    }
}

trait Marked {
    fn markers(&self) -> &Markers;
}

impl Marked for TypeNode {
    fn markers(&self) -> &Markers {
        &self.markers
    }
}

impl Marked for SubtypeNode {
    fn markers(&self) -> &Markers {
        &self.markers
    }
}

/// First node with an explicit marker match, else the first catch-all.
fn select<'a, T: Marked>(nodes: &'a [T], lowered: &str) -> Option<&'a T> {
    nodes
        .iter()
        .find(|n| n.markers().test(lowered) == Some(true))
        .or_else(|| nodes.iter().find(|n| n.markers().test(lowered).is_none()))
}

/// Classifier for one chamber.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    entries: Vec<CategoryNode>,
}

impl Taxonomy {
    /// The built-in taxonomy for a chamber.
    ///
    /// # Errors
    /// Returns `Taxonomy` if the embedded document does not parse.
    pub fn for_chamber(chamber: Chamber) -> Result<Self> {
        Self::from_yaml(BUILTIN_TAXONOMY, chamber)
    }

    /// Load a taxonomy from YAML text.
    ///
    /// # Errors
    /// Returns `Taxonomy` if the YAML does not have the expected shape.
    pub fn from_yaml(yaml: &str, chamber: Chamber) -> Result<Self> {
        let file: TaxonomyFile = serde_yaml_ng::from_str(yaml)?;
        Ok(file.into_chamber(chamber))
    }

    /// Load a taxonomy from a YAML file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, `Taxonomy` if it does not parse.
    pub fn from_file(path: &Path, chamber: Chamber) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml, chamber)
    }

    /// Number of top-level categories, chamber and generic combined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify heading text. First match wins; no match gives `OTHER`.
    ///
    /// # Examples
    /// ```
    /// use hansard_harvester::taxonomy::Taxonomy;
    /// use hansard_harvester::types::Chamber;
    ///
    /// let taxonomy = Taxonomy::for_chamber(Chamber::Commons).unwrap();
    /// let business = taxonomy.classify("Oral Answers to Questions Treasury Topical Questions");
    /// assert_eq!(business.category, "QUESTIONS");
    /// assert_eq!(business.kind.as_deref(), Some("Topical Questions"));
    ///
    /// assert!(taxonomy.classify("Something unheard of").is_other());
    /// ```
    #[must_use]
    pub fn classify(&self, text: &str) -> BusinessType {
        let lowered = text.to_lowercase();

        let Some(category) = self.entries.iter().find(|c| {
            c.markers.test(&lowered) == Some(true)
                || c.types.iter().any(|t| t.markers.test(&lowered) == Some(true))
        }) else {
            return BusinessType::other();
        };

        let kind = select(&category.types, &lowered);
        let subtype = kind.and_then(|t| select(&t.subtypes, &lowered));

        BusinessType {
            category: category.category.clone(),
            kind: kind.map(|t| t.name.clone()),
            subtype: subtype.map(|s| s.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commons() -> Taxonomy {
        Taxonomy::for_chamber(Chamber::Commons).unwrap()
    }

    #[test]
    fn test_builtin_loads_for_every_chamber() {
        for chamber in Chamber::ALL {
            assert!(!Taxonomy::for_chamber(chamber).unwrap().is_empty());
        }
    }

    #[test]
    fn test_chamber_entries_precede_generic() {
        // "Speaker's Statement" would hit generic STATEMENTS without the Commons list.
        let business = commons().classify("Speaker's Statement");
        assert_eq!(business.category, "PROCEDURAL");
        assert_eq!(business.kind.as_deref(), Some("Speaker's Statement"));
    }

    #[test]
    fn test_catch_all_type_and_subtype() {
        let business = commons().classify("Oral Answers to Questions Education");
        assert_eq!(business.category, "QUESTIONS");
        assert_eq!(business.kind.as_deref(), Some("Departmental Questions"));
        assert_eq!(business.subtype.as_deref(), Some("Oral Answers"));
    }

    #[test]
    fn test_match_all() {
        let business = commons().classify("Draft Electricity Regulations 2024");
        assert_eq!(business.category, "DELEGATED_LEGISLATION");
        assert_eq!(business.kind.as_deref(), Some("Draft Regulations"));

        let business = commons().classify("Electricity Regulations 2024");
        assert_eq!(business.kind.as_deref(), Some("Statutory Instrument"));
    }

    #[test]
    fn test_unmatched_is_other() {
        let business = commons().classify("Tributes");
        assert_eq!(business, BusinessType::other());
    }

    #[test]
    fn test_case_insensitive() {
        let business = commons().classify("FINANCE BILL SECOND READING");
        assert_eq!(business.category, "LEGISLATION");
        assert_eq!(business.kind.as_deref(), Some("Second Reading"));
    }

    #[test]
    fn test_custom_yaml() {
        let yaml = r#"
generic:
  - category: CUSTOM
    markers: ["widget"]
    types:
      - name: Widget Debate
"#;
        let taxonomy = Taxonomy::from_yaml(yaml, Chamber::Lords).unwrap();
        assert_eq!(taxonomy.len(), 1);
        let business = taxonomy.classify("The Widget Debate");
        assert_eq!(business.category, "CUSTOM");
        assert_eq!(business.kind.as_deref(), Some("Widget Debate"));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(Taxonomy::from_yaml("generic: 12", Chamber::Commons).is_err());
    }

    #[test]
    fn test_standing_committee_new_clause() {
        let taxonomy = Taxonomy::for_chamber(Chamber::StandingCommittee).unwrap();
        let business = taxonomy.classify("New Clause 4");
        assert_eq!(business.category, "COMMITTEE");
        assert_eq!(business.kind.as_deref(), Some("Clause Consideration"));
        assert_eq!(business.subtype.as_deref(), Some("New Clause"));
    }
}
