//! # Quarry
//!
//! Extraction of finite-element simulation result databases into portable
//! hierarchical container files.
//!
//! The crate walks a source result database (mesh, sets, constraints,
//! interactions, per-step/per-frame field and history results), collapses
//! repeatedly referenced mesh entities into single canonical records, and
//! streams the resulting domain graph into an abstract hierarchical store,
//! emitting link references instead of duplicate payloads.
//!
//! ## Modules
//!
//! - [`util`] - Errors, output-path escaping, array shapes
//! - [`model`] - The in-memory domain graph
//! - [`intern`] - Content-keyed canonical handles for nodes and elements
//! - [`filter`] - Selection predicates (step, frame, instance, history)
//! - [`source`] - The source-database interface and raw records
//! - [`extract`] - The domain model builder
//! - [`store`] - The output-store interface and in-memory backend
//! - [`serialize`] - The deduplicating, streaming tree serializer
//!
//! ## Example
//!
//! ```ignore
//! use quarry::prelude::*;
//!
//! let mut store = MemoryStore::new();
//! let report = Extractor::new(ExtractOptions::default()).run(&source, &mut store)?;
//! println!("{} nodes, {} links", report.nodes_written, report.links_created);
//! ```

pub mod util;
pub mod model;
pub mod intern;
pub mod filter;
pub mod source;
pub mod extract;
pub mod store;
pub mod serialize;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::filter::Selection;
    pub use crate::intern::EntityInterner;
    pub use crate::extract::ModelBuilder;
    pub use crate::source::{memory::MemoryModel, SourceModel};
    pub use crate::store::{Array, MemoryStore, OutputFormat, Scalar, Store};
    pub use crate::serialize::{ExtractOptions, Extractor, Serializer, SparsePolicy};
}
