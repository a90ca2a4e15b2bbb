//! Parts, instances and the root assembly.

use super::mesh::{ElementHandle, NodeHandle, Set};

/// A datum coordinate system.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatumCsys {
    /// System name.
    pub name: String,
    /// System kind (rectangular/cylindrical/spherical).
    pub kind: String,
    /// X axis direction.
    pub x_axis: [f32; 3],
    /// Y axis direction.
    pub y_axis: [f32; 3],
    /// Z axis direction.
    pub z_axis: [f32; 3],
    /// Origin.
    pub origin: [f32; 3],
}

/// One segment of an analytic surface profile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalyticSurfaceSegment {
    /// Segment kind (line/circle/parabola).
    pub kind: String,
    /// Segment geometry rows.
    pub data: Vec<Vec<f32>>,
}

/// An analytic (non-meshed) contact surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalyticSurface {
    /// Surface name.
    pub name: String,
    /// Surface kind (segments/cylinder/revolution).
    pub kind: String,
    /// Fillet radius applied between segments.
    pub fillet_radius: f64,
    /// Profile segments.
    pub segments: Vec<AnalyticSurfaceSegment>,
    /// Local coordinate data rows.
    pub local_coord_data: Vec<Vec<f32>>,
}

/// A rigid body attached to an instance.
#[derive(Clone, Debug, Default)]
pub struct RigidBody {
    /// Position rendering (`INPUT` / `CENTER_OF_MASS`).
    pub position: String,
    /// Isothermal flag rendering.
    pub isothermal: String,
    /// Reference node set.
    pub reference_node: Option<Set>,
    /// Rigid element set.
    pub elements: Option<Set>,
    /// Tied node set.
    pub tie_nodes: Option<Set>,
    /// Pinned node set.
    pub pin_nodes: Option<Set>,
    /// Analytic surface bound to the body, when present.
    pub analytic_surface: Option<AnalyticSurface>,
}

/// A section assignment on an instance.
#[derive(Clone, Debug, Default)]
pub struct SectionAssignment {
    /// Region the section applies to.
    pub region: Option<Set>,
    /// Assigned section name.
    pub section_name: String,
}

/// A beam orientation on an instance region.
#[derive(Clone, Debug, Default)]
pub struct BeamOrientation {
    /// Orientation method.
    pub method: String,
    /// Region the orientation applies to.
    pub region: Option<Set>,
    /// The orientation vector.
    pub vector: Vec<f32>,
}

/// A rebar orientation on an instance region.
#[derive(Clone, Debug, Default)]
pub struct RebarOrientation {
    /// Axis rendering.
    pub axis: String,
    /// Orientation angle.
    pub angle: f32,
    /// Region the orientation applies to.
    pub region: Option<Set>,
    /// Local coordinate system.
    pub csys: DatumCsys,
}

/// A connector orientation on an assembly region.
#[derive(Clone, Debug, Default)]
pub struct ConnectorOrientation {
    /// Region the orientation applies to.
    pub region: Option<Set>,
    /// First axis symbol.
    pub axis_1: String,
    /// Second axis symbol.
    pub axis_2: String,
    /// First local coordinate system.
    pub csys_1: DatumCsys,
    /// Second local coordinate system.
    pub csys_2: DatumCsys,
    /// Whether the second orientation reuses the first.
    pub orient_2_same_as_1: String,
    /// First angle.
    pub angle_1: f32,
    /// Second angle.
    pub angle_2: f32,
}

/// A template part mesh (not yet positioned).
#[derive(Clone, Debug, Default)]
pub struct Part {
    /// Part name.
    pub name: String,
    /// Embedded space rendering.
    pub embedded_space: String,
    /// Interned part nodes.
    pub nodes: Vec<NodeHandle>,
    /// Interned part elements.
    pub elements: Vec<ElementHandle>,
    /// Node sets.
    pub node_sets: Vec<Set>,
    /// Element sets.
    pub element_sets: Vec<Set>,
    /// Surface sets.
    pub surfaces: Vec<Set>,
}

/// A positioned part instance.
#[derive(Clone, Debug, Default)]
pub struct Instance {
    /// Instance name.
    pub name: String,
    /// Embedded space rendering.
    pub embedded_space: String,
    /// Interned instance nodes.
    pub nodes: Vec<NodeHandle>,
    /// Interned instance elements.
    pub elements: Vec<ElementHandle>,
    /// Node sets.
    pub node_sets: Vec<Set>,
    /// Element sets.
    pub element_sets: Vec<Set>,
    /// Surface sets.
    pub surfaces: Vec<Set>,
    /// Rigid bodies attached to the instance.
    pub rigid_bodies: Vec<RigidBody>,
    /// Section assignments.
    pub section_assignments: Vec<SectionAssignment>,
    /// Beam orientations.
    pub beam_orientations: Vec<BeamOrientation>,
    /// Rebar orientations.
    pub rebar_orientations: Vec<RebarOrientation>,
    /// Instance-level analytic surface, when present.
    pub analytic_surface: Option<AnalyticSurface>,
}

/// The root assembly.
#[derive(Clone, Debug, Default)]
pub struct Assembly {
    /// Assembly name.
    pub name: String,
    /// Embedded space rendering.
    pub embedded_space: String,
    /// Interned assembly-level nodes.
    pub nodes: Vec<NodeHandle>,
    /// Interned assembly-level elements.
    pub elements: Vec<ElementHandle>,
    /// Assembly-level node sets.
    pub node_sets: Vec<Set>,
    /// Assembly-level element sets.
    pub element_sets: Vec<Set>,
    /// Assembly-level surface sets.
    pub surfaces: Vec<Set>,
    /// Part instances (pruned by the instance filter).
    pub instances: Vec<Instance>,
    /// Datum coordinate systems.
    pub datum_csyses: Vec<DatumCsys>,
    /// Connector orientations.
    pub connector_orientations: Vec<ConnectorOrientation>,
}
