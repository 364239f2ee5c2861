//! Chamber strategies.
//!
//! The walker and item builder are shared by every chamber; what differs
//! is expressed through [`ChamberStrategy`]. Each strategy holds its own
//! per-document state, so a fresh instance is needed for every document.

mod commons;
mod lords;
mod standing_committee;
mod westminster_hall;

use roxmltree::Node;

use crate::types::{BusinessItem, BusinessType, Chamber, Division, Speech};

pub use commons::Commons;
pub use lords::Lords;
pub use standing_committee::{clause_label, StandingCommittee};
pub use westminster_hall::{time_limit_minutes, WestminsterHall};

/// Chamber-specific behaviour plugged into the item builder.
pub trait ChamberStrategy {
    /// The chamber this strategy handles.
    fn chamber(&self) -> Chamber;

    /// Classify accumulated heading text.
    fn classify(&self, heading_text: &str) -> BusinessType;

    /// Whether a major heading continues the current heading group rather
    /// than ending it.
    fn continues_group(&self, _heading: Node<'_, '_>) -> bool {
        false
    }

    /// Called when an item opens. `heading` is the opening heading element,
    /// absent for items opened without one.
    fn on_open(&mut self, _item: &mut BusinessItem, _heading: Option<Node<'_, '_>>) {}

    /// Called for each speech before it is appended to `item`.
    fn on_speech(&mut self, _item: &mut BusinessItem, _speech: &mut Speech) {}

    /// Called for each division recorded while `item` is open.
    fn on_division(&mut self, _item: &mut BusinessItem, _division: &Division) {}

    /// Called once when `item` closes, after buffered records are attached.
    fn on_finalize(&mut self, _item: &mut BusinessItem) {}
}
