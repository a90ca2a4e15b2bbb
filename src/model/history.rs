//! History regions: time series anchored to a fixed point in the model.

use super::mesh::{ElementHandle, FaceTag, NodeHandle, SectionPoint, Set};

/// The anchor of a history region.
#[derive(Clone, Debug, Default)]
pub struct HistoryPoint {
    /// Anchoring node, when the point is node-based.
    pub node: Option<NodeHandle>,
    /// Anchoring element, when the point is element-based.
    pub element: Option<ElementHandle>,
    /// Integration point number.
    pub ip_number: i32,
    /// Section point, when present.
    pub section_point: Option<SectionPoint>,
    /// Element face of the point.
    pub face: Option<FaceTag>,
    /// Position rendering (`Nodal`, `Whole Element`, ...).
    pub position: String,
    /// Region set of the point, when present.
    pub region: Option<Set>,
    /// Owning instance name.
    pub instance_name: String,
    /// Owning assembly name.
    pub assembly_name: String,
}

/// One named time series within a history region.
#[derive(Clone, Debug, Default)]
pub struct HistoryOutput {
    /// Output name (repository key).
    pub name: String,
    /// Output description.
    pub description: String,
    /// Value kind rendering (`Scalar`).
    pub kind: String,
    /// Series rows, usually `[time, value]` pairs.
    pub data: Vec<Vec<f32>>,
    /// Conjugate series rows (frequency-domain results).
    pub conjugate: Vec<Vec<f32>>,
}

/// A named history region within one step.
#[derive(Clone, Debug, Default)]
pub struct HistoryRegion {
    /// Region name (repository key).
    pub name: String,
    /// Region description.
    pub description: String,
    /// Position rendering.
    pub position: String,
    /// Load case name.
    pub load_case: String,
    /// The region's anchor.
    pub point: HistoryPoint,
    /// Time series of the region.
    pub outputs: Vec<HistoryOutput>,
}
