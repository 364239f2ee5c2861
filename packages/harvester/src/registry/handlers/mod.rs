//! Node handlers for transcript XML.

mod committee;
mod division;
mod heading;
mod speech;

pub use committee::*;
pub use division::*;
pub use heading::*;
pub use speech::*;
