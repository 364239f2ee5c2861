//! House of Commons.
//!
//! Oral questions arrive as an "Oral Answers to Questions" heading, a
//! department heading, then a "The <role> was asked" line. The role named
//! there is credited to the first answering speech of each item under
//! that department.

use roxmltree::Node;

use super::ChamberStrategy;
use crate::category::{categorize, COMMONS_RULES};
use crate::roles::{is_ministerial, was_asked_role};
use crate::taxonomy::Taxonomy;
use crate::text::normalize_text;
use crate::types::{BusinessItem, BusinessType, Chamber, LeadMinister, Speech};
use crate::xml::{collect_text, following_elements, get_tag_name};

#[derive(Debug, Clone)]
pub struct Commons {
    taxonomy: Taxonomy,
    pending_role: Option<String>,
}

impl Commons {
    #[must_use]
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            pending_role: None,
        }
    }

    /// Role from a "was asked" speech directly after `heading`.
    fn was_asked_lookahead(heading: Node<'_, '_>) -> Option<String> {
        following_elements(heading)
            .next()
            .filter(|next| get_tag_name(*next) == "speech")
            .and_then(|speech| was_asked_role(&normalize_text(&collect_text(speech))))
    }

    fn is_answer(speech: &Speech) -> bool {
        speech
            .speech_type
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("answer"))
            || speech.role.as_deref().is_some_and(is_ministerial)
    }
}

impl ChamberStrategy for Commons {
    fn chamber(&self) -> Chamber {
        Chamber::Commons
    }

    fn classify(&self, heading_text: &str) -> BusinessType {
        self.taxonomy.classify(heading_text)
    }

    fn continues_group(&self, heading: Node<'_, '_>) -> bool {
        Self::was_asked_lookahead(heading).is_some()
    }

    fn on_open(&mut self, item: &mut BusinessItem, heading: Option<Node<'_, '_>>) {
        // The role holds for every question under the same department.
        match heading.and_then(Self::was_asked_lookahead) {
            Some(role) => self.pending_role = Some(role),
            None if item.department.is_none() => self.pending_role = None,
            None => {}
        }
    }

    fn on_speech(&mut self, item: &mut BusinessItem, speech: &mut Speech) {
        if let Some(role) = was_asked_role(&speech.content) {
            self.pending_role = Some(role);
            return;
        }
        if item.lead_minister.is_some() || !Self::is_answer(speech) {
            return;
        }
        let Some(role) = speech.role.clone().or_else(|| self.pending_role.clone()) else {
            return;
        };
        if speech.role.is_none() {
            speech.role = Some(role.clone());
        }
        item.lead_minister = Some(LeadMinister {
            id: speech.speaker_id.clone(),
            name: speech.speaker_name.clone(),
            role,
        });
    }

    fn on_finalize(&mut self, item: &mut BusinessItem) {
        item.category = Some(categorize(item, COMMONS_RULES));
    }
}
