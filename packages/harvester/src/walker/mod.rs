//! Document traversal and business item assembly.

mod builder;
mod engine;

pub use builder::ItemBuilder;
pub use engine::{DocumentWalker, WalkOptions, ROOT_TAG};
