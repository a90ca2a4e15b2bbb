//! The domain model builder.
//!
//! Walks the source object graph in a fixed order, consults the selection
//! filter before expensive subtrees are materialized, and resolves every
//! node/element reference through the entity interner.

pub mod bulk;

mod builder;

pub use builder::ModelBuilder;
