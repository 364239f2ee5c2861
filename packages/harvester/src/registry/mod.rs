//! Element registry system for transcript traversal.
//!
//! Handlers are registered per tag name and turn one element into a
//! [`NodeEvent`] for the item builder. The registry itself knows nothing
//! about business items or chambers.

mod config;
mod core;
mod handler;
pub mod handlers;
mod types;

pub use config::create_transcript_registry;
pub use core::{Dispatch, ElementRegistry};
pub use handler::NodeHandler;
pub use types::{HandlerContext, Heading, HeadingKind, NodeEvent};
