//! House of Lords.
//!
//! In a question item the first contribution asks the question, a reply
//! from a minister is an answer, and any other contribution is a
//! supplementary. Procedural contributions take no part in the exchange.

use super::ChamberStrategy;
use crate::category::{categorize, LORDS_RULES};
use crate::roles::is_ministerial;
use crate::taxonomy::Taxonomy;
use crate::types::{BusinessItem, BusinessType, Chamber, Exchange, LeadMinister, Speech};

const QUESTIONS_CATEGORY: &str = "QUESTIONS";

#[derive(Debug, Clone)]
pub struct Lords {
    taxonomy: Taxonomy,
}

impl Lords {
    #[must_use]
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    fn is_question_item(item: &BusinessItem) -> bool {
        item.business_type.category == QUESTIONS_CATEGORY || item.heading_contains("question")
    }
}

impl ChamberStrategy for Lords {
    fn chamber(&self) -> Chamber {
        Chamber::Lords
    }

    fn classify(&self, heading_text: &str) -> BusinessType {
        self.taxonomy.classify(heading_text)
    }

    fn on_speech(&mut self, item: &mut BusinessItem, speech: &mut Speech) {
        if speech.procedural || !Self::is_question_item(item) {
            return;
        }

        let asked = item.speeches.iter().any(|s| s.exchange.is_some());
        if !asked {
            speech.exchange = Some(Exchange::Question);
            return;
        }

        match speech.role.clone().filter(|role| is_ministerial(role)) {
            Some(role) => {
                speech.exchange = Some(Exchange::Answer);
                if item.lead_minister.is_none() {
                    item.lead_minister = Some(LeadMinister {
                        id: speech.speaker_id.clone(),
                        name: speech.speaker_name.clone(),
                        role,
                    });
                }
            }
            None => speech.exchange = Some(Exchange::Supplementary),
        }
    }

    fn on_finalize(&mut self, item: &mut BusinessItem) {
        item.category = Some(categorize(item, LORDS_RULES));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn lords() -> Lords {
        Lords::new(Taxonomy::for_chamber(Chamber::Lords).unwrap())
    }

    fn contribute(strategy: &mut Lords, item: &mut BusinessItem, mut speech: Speech) {
        strategy.on_speech(item, &mut speech);
        item.add_speech(speech);
    }

    #[test]
    fn test_question_answer_supplementary() {
        let mut strategy = lords();
        let title = "Housing Supply";
        let mut item = BusinessItem::new("x.1", title, "Question", strategy.classify("Question"));

        let mut procedural = Speech::new("s.0", "Question put.");
        procedural.procedural = true;
        contribute(&mut strategy, &mut item, procedural);

        contribute(
            &mut strategy,
            &mut item,
            Speech::new("s.1", "To ask His Majesty's Government...").with_speaker(None, "Baroness A"),
        );

        let mut reply = Speech::new("s.2", "My Lords, we are building.").with_speaker(Some("9"), "Lord B");
        reply.role = Some("The Parliamentary Under-Secretary of State".to_string());
        contribute(&mut strategy, &mut item, reply);

        contribute(
            &mut strategy,
            &mut item,
            Speech::new("s.3", "My Lords, will the Minister...").with_speaker(None, "Lord C"),
        );

        let exchanges: Vec<_> = item.speeches.iter().map(|s| s.exchange).collect();
        assert_eq!(
            exchanges,
            vec![
                None,
                Some(Exchange::Question),
                Some(Exchange::Answer),
                Some(Exchange::Supplementary)
            ]
        );
        assert_eq!(item.lead_minister.unwrap().name, "Lord B");
    }

    #[test]
    fn test_first_reply_without_role_is_supplementary() {
        let mut strategy = lords();
        let mut item = BusinessItem::new("x.1", "Energy Prices", "Question", BusinessType::other());
        contribute(&mut strategy, &mut item, Speech::new("s.1", "To ask").with_speaker(None, "A"));
        contribute(&mut strategy, &mut item, Speech::new("s.2", "Reply").with_speaker(None, "B"));

        assert_eq!(item.speeches[1].exchange, Some(Exchange::Supplementary));
        assert!(item.lead_minister.is_none());
    }

    #[test]
    fn test_non_question_item_untouched() {
        let mut strategy = lords();
        let mut item = BusinessItem::new("x.1", "Arts Funding", "Motion to Take Note", BusinessType::other());
        contribute(&mut strategy, &mut item, Speech::new("s.1", "My Lords").with_speaker(None, "A"));
        assert_eq!(item.speeches[0].exchange, None);

        contribute(&mut strategy, &mut item, Speech::new("s.2", "My Lords").with_speaker(None, "B"));
        strategy.on_finalize(&mut item);
        assert_eq!(item.category, Some(Category::Motions));
    }
}
