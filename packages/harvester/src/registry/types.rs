//! Types exchanged between node handlers and the item builder.

use crate::types::{Chamber, CommitteeRecord, Division, Speech};

/// Heading levels found in transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    /// `<major-heading>`: a new type of business.
    Major,
    /// `<minor-heading>`: an item within the current type.
    Minor,
    /// `<oral-heading>`: start of departmental question time.
    Oral,
}

/// A heading as read from the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub kind: HeadingKind,
    pub id: String,
    pub text: String,
    pub time: String,
}

/// What a handler found in one node.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    Heading(Heading),
    Speech(Speech),
    Division(Division),
    Committee(CommitteeRecord),
    Witness(String),
    Bill(String),
}

/// Document-level facts handlers may consult.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext {
    pub chamber: Chamber,
}

impl HandlerContext {
    #[must_use]
    pub fn new(chamber: Chamber) -> Self {
        Self { chamber }
    }
}
