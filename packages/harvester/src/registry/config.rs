//! Registry configuration for transcript XML.

use super::core::ElementRegistry;
use super::handlers::{
    BillHandler, CommitteeHandler, DivisionHandler, HeadingHandler, SpeechHandler, WitnessHandler,
};
use super::types::HeadingKind;

/// Create a registry configured for scraped transcript XML.
#[must_use]
pub fn create_transcript_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();

    // Headings
    registry.register("major-heading", HeadingHandler::new(HeadingKind::Major));
    registry.register("minor-heading", HeadingHandler::new(HeadingKind::Minor));
    registry.register("oral-heading", HeadingHandler::new(HeadingKind::Oral));

    // Proceedings
    registry.register("speech", SpeechHandler);
    registry.register("division", DivisionHandler);

    // Committee-only records
    registry.register("committee", CommitteeHandler);
    registry.register("witness", WitnessHandler);
    registry.register("bill", BillHandler);

    // Skip tags:
    //   - gidredirect: id remapping between transcript revisions
    //   - divisioncount: read by the division handler, carries no text
    registry.skip(["gidredirect", "divisioncount"]);

    registry
}
