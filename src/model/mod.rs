//! The in-memory domain graph.
//!
//! The model mirrors the structure of the source result database after
//! filtering and interning: one [`Model`] per extraction run, owning
//! everything it materializes. Canonical [`Node`]/[`Element`] payloads are
//! owned by the interner and shared by handle.

mod assembly;
mod constraint;
mod field;
mod history;
mod mesh;
mod metadata;
mod step;

pub use assembly::*;
pub use constraint::*;
pub use field::*;
pub use history::*;
pub use mesh::*;
pub use metadata::*;
pub use step::*;

/// The complete domain graph of one extraction run.
///
/// In the streaming extraction path `steps` stays empty; steps are built,
/// written and dropped one at a time.
#[derive(Clone, Debug, Default)]
pub struct Model {
    /// Database name.
    pub name: String,
    /// Analysis title.
    pub analysis_title: String,
    /// Database description.
    pub description: String,
    /// Source database path.
    pub path: String,
    /// Whether the source was opened read-only.
    pub is_read_only: bool,
    /// Job metadata.
    pub job: JobData,
    /// Cyclic-symmetry sector definition, when present.
    pub sector: Option<SectorDefinition>,
    /// Flat list of section categories, referenced from elements.
    pub section_categories: Vec<SectionCategory>,
    /// User-authored XY data series.
    pub user_series: Vec<UserSeries>,
    /// Contact interactions.
    pub interactions: Vec<Interaction>,
    /// Kinematic constraints.
    pub constraints: Vec<Constraint>,
    /// Template part meshes.
    pub parts: Vec<Part>,
    /// The root assembly.
    pub assembly: Assembly,
    /// Analysis steps.
    pub steps: Vec<Step>,
}
