//! Finalize-time categorization of business items.
//!
//! Rules are ordered; the first one that applies decides the category.
//! Generic rules run before the chamber's own rules, and `Main` is the
//! default when nothing applies.

use crate::types::{BusinessItem, Category};

/// One `(predicate, outcome)` pair.
#[derive(Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub applies: fn(&BusinessItem) -> bool,
}

impl std::fmt::Debug for CategoryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryRule")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

fn is_petition(item: &BusinessItem) -> bool {
    item.title.starts_with("Petition - ") || item.title.trim().eq_ignore_ascii_case("petitions")
}

fn is_bill_presented(item: &BusinessItem) -> bool {
    item.heading_contains("bill presented") || item.heading_contains("presentation of bill")
}

fn is_bill(item: &BusinessItem) -> bool {
    item.heading_contains("bill") || item.business_type.category == "LEGISLATION"
}

fn is_delegated_legislation(item: &BusinessItem) -> bool {
    item.business_type.category == "DELEGATED_LEGISLATION"
        || ["delegated legislation", "regulations", "statutory instrument"]
            .iter()
            .any(|k| item.heading_contains(k))
}

fn is_procedural(item: &BusinessItem) -> bool {
    item.speeches.len() == 1 && item.speaker_names.len() <= 1
}

fn is_oral_answers(item: &BusinessItem) -> bool {
    item.department.is_some()
        || item.heading_contains("oral answers")
        || item
            .supermajor_heading
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains("oral answers"))
}

fn is_point_of_order(item: &BusinessItem) -> bool {
    item.heading_contains("point of order") || item.heading_contains("points of order")
}

fn is_royal_assent(item: &BusinessItem) -> bool {
    item.heading_contains("royal assent")
}

fn subtitle_contains(item: &BusinessItem, keyword: &str) -> bool {
    item.subtitle.to_lowercase().contains(keyword)
}

fn is_motion(item: &BusinessItem) -> bool {
    subtitle_contains(item, "motion")
}

fn is_question(item: &BusinessItem) -> bool {
    subtitle_contains(item, "question")
}

fn is_statement(item: &BusinessItem) -> bool {
    subtitle_contains(item, "statement")
}

fn is_report(item: &BusinessItem) -> bool {
    subtitle_contains(item, "report")
}

/// Rules shared by both Houses, in precedence order.
pub const GENERIC_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Petitions,
        applies: is_petition,
    },
    CategoryRule {
        category: Category::BillPresented,
        applies: is_bill_presented,
    },
    CategoryRule {
        category: Category::BillsAndLegislation,
        applies: is_bill,
    },
    CategoryRule {
        category: Category::DelegatedLegislation,
        applies: is_delegated_legislation,
    },
    CategoryRule {
        category: Category::Procedural,
        applies: is_procedural,
    },
];

pub const COMMONS_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::OralAnswers,
        applies: is_oral_answers,
    },
    CategoryRule {
        category: Category::PointsOfOrder,
        applies: is_point_of_order,
    },
    CategoryRule {
        category: Category::RoyalAssent,
        applies: is_royal_assent,
    },
];

pub const LORDS_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Motions,
        applies: is_motion,
    },
    CategoryRule {
        category: Category::Questions,
        applies: is_question,
    },
    CategoryRule {
        category: Category::Statements,
        applies: is_statement,
    },
    CategoryRule {
        category: Category::Reports,
        applies: is_report,
    },
];

/// Category of an item: generic rules, then `chamber_rules`, then `Main`.
#[must_use]
pub fn categorize(item: &BusinessItem, chamber_rules: &[CategoryRule]) -> Category {
    GENERIC_RULES
        .iter()
        .chain(chamber_rules)
        .find(|rule| (rule.applies)(item))
        .map_or(Category::Main, |rule| rule.category)
}
