//! Deduplicating, streaming serialization of the domain graph.
//!
//! The serializer walks the domain graph depth-first and emits it into an
//! abstract [`Store`](crate::store::Store). Mesh entities are written once
//! per identity key; every further reference becomes a hard link. Large
//! numeric buffers are written and then released immediately, and the
//! extraction driver writes one step and one frame at a time, so peak
//! memory is bounded by a single frame's field data.

mod extractor;
mod writer;

pub use extractor::{ExtractReport, Extractor};
pub use writer::{Serializer, WriteStats, ROOT_GROUP};

use crate::filter::Selection;

/// How scalar attributes with zero/empty values are treated.
///
/// The reference behavior skips them, which keeps the container free of
/// placeholder noise but makes a skipped zero indistinguishable from a
/// legitimately zero value on read-back. The policy is explicit and
/// configurable for that reason.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SparsePolicy {
    /// Skip scalars whose value is the type's zero/empty value.
    #[default]
    SkipEmpty,
    /// Write every scalar.
    WriteAll,
}

/// Options of one extraction run.
#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    /// The selection filters.
    pub selection: Selection,
    /// The sparse scalar policy.
    pub sparse: SparsePolicy,
}
