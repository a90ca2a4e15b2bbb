//! The source result database interface.
//!
//! Opening, upgrading and closing the database handle belongs to the
//! embedding application; this crate only consumes the read-only object
//! graph through [`SourceModel`]. Every accessor returns `Result`: any
//! failure surfaced here is fatal to the run, because a partially read
//! source graph cannot be safely partially extracted.
//!
//! Raw records mirror the source taxonomy. Where a record carries no mesh
//! references the domain model's own structs are reused directly; records
//! that reference nodes, elements or sets have raw counterparts here, which
//! the builder resolves through the interner.

pub mod memory;

use crate::model::{
    AnalyticSurface, ContactExplicitParams, ContactStandardParams, CouplingParams, DatumCsys,
    DisplayBodyParams, Domain, FaceTag, Invariant, JobData, MpcParams, ResultPosition,
    SectionCategory, SectionPoint, SectorDefinition, SetKind, ShellSolidCouplingParams,
    TensorKind, TieParams, UserSeries,
};
use crate::util::Result;

/// Top-level metadata of the database.
#[derive(Clone, Debug, Default)]
pub struct ModelSummary {
    /// Database name.
    pub name: String,
    /// Analysis title.
    pub analysis_title: String,
    /// Database description.
    pub description: String,
    /// Database path.
    pub path: String,
    /// Whether the handle is read-only.
    pub is_read_only: bool,
}

/// A raw node record.
#[derive(Clone, Debug, Default)]
pub struct NodeRecord {
    /// Node label.
    pub label: i32,
    /// Node coordinates.
    pub coordinates: [f32; 3],
}

/// A raw element record.
#[derive(Clone, Debug, Default)]
pub struct ElementRecord {
    /// Element label.
    pub label: i32,
    /// Element type tag.
    pub kind: String,
    /// Ordered node labels.
    pub connectivity: Vec<i32>,
    /// Owning instance names.
    pub instance_names: Vec<String>,
    /// Section category of the element.
    pub section_category: SectionCategory,
}

/// A raw set record.
///
/// An empty name is the source's sentinel for "no set here".
#[derive(Clone, Debug)]
pub struct SetRecord {
    /// Set name; empty means absent.
    pub name: String,
    /// Set kind.
    pub kind: SetKind,
    /// Instances the set spans.
    pub instance_names: Vec<String>,
    /// Member nodes (node sets, surface sets over nodes).
    pub nodes: Vec<NodeRecord>,
    /// Member elements (element and surface sets).
    pub elements: Vec<ElementRecord>,
    /// Face tags parallel to `elements` (surface sets).
    pub faces: Vec<FaceTag>,
}

impl SetRecord {
    /// The source's "absent set" sentinel.
    pub fn absent() -> Self {
        Self {
            name: String::new(),
            kind: SetKind::Node,
            instance_names: Vec::new(),
            nodes: Vec::new(),
            elements: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// True when this record is the absent sentinel.
    pub fn is_absent(&self) -> bool {
        self.name.is_empty()
    }
}

impl Default for SetRecord {
    fn default() -> Self {
        Self::absent()
    }
}

/// A raw contact interaction record.
#[derive(Clone, Debug)]
pub enum InteractionRecord {
    /// Standard (implicit) contact.
    Standard {
        /// Scalar parameters.
        params: ContactStandardParams,
        /// Main surface set.
        main: SetRecord,
        /// Secondary surface set.
        secondary: SetRecord,
        /// Adjustment region set.
        adjust: SetRecord,
    },
    /// Explicit contact.
    Explicit {
        /// Scalar parameters.
        params: ContactExplicitParams,
        /// Main surface set.
        main: SetRecord,
        /// Secondary surface set.
        secondary: SetRecord,
    },
    /// An interaction kind outside the supported taxonomy.
    Unsupported {
        /// Repository key of the interaction.
        name: String,
        /// Source type rendering.
        kind: String,
    },
}

/// A raw constraint record.
#[derive(Clone, Debug)]
pub enum ConstraintRecord {
    /// Surface-to-surface tie.
    Tie {
        /// Scalar parameters.
        params: TieParams,
        /// Main surface set.
        main: SetRecord,
        /// Secondary surface set.
        secondary: SetRecord,
    },
    /// Display body.
    DisplayBody {
        /// Scalar parameters.
        params: DisplayBodyParams,
    },
    /// Kinematic or distributing coupling.
    Coupling {
        /// Scalar parameters.
        params: CouplingParams,
        /// Coupled surface set.
        surface: SetRecord,
        /// Reference point set.
        ref_point: SetRecord,
        /// Coupled node set.
        nodes: SetRecord,
    },
    /// Multi-point constraint.
    Mpc {
        /// Scalar parameters.
        params: MpcParams,
        /// Constrained surface set.
        surface: SetRecord,
        /// Reference point set.
        ref_point: SetRecord,
    },
    /// Shell-to-solid coupling.
    ShellSolidCoupling {
        /// Scalar parameters.
        params: ShellSolidCouplingParams,
        /// Shell edge set.
        shell_edge: SetRecord,
        /// Solid face set.
        solid_face: SetRecord,
    },
    /// A constraint kind outside the supported taxonomy.
    Unsupported {
        /// Repository key of the constraint.
        name: String,
        /// Source type rendering.
        kind: String,
    },
}

/// A raw rigid body record.
#[derive(Clone, Debug, Default)]
pub struct RigidBodyRecord {
    /// Position rendering.
    pub position: String,
    /// Isothermal flag rendering.
    pub isothermal: String,
    /// Reference node set.
    pub reference_node: SetRecord,
    /// Rigid element set.
    pub elements: SetRecord,
    /// Tied node set.
    pub tie_nodes: SetRecord,
    /// Pinned node set.
    pub pin_nodes: SetRecord,
    /// Analytic surface of the body; absence is an expected, silent case.
    pub analytic_surface: Option<AnalyticSurface>,
}

/// A raw section assignment record.
#[derive(Clone, Debug, Default)]
pub struct SectionAssignmentRecord {
    /// Region the section applies to.
    pub region: SetRecord,
    /// Assigned section name.
    pub section_name: String,
}

/// A raw beam orientation record.
#[derive(Clone, Debug, Default)]
pub struct BeamOrientationRecord {
    /// Orientation method.
    pub method: String,
    /// Region the orientation applies to.
    pub region: SetRecord,
    /// Orientation vector.
    pub vector: Vec<f32>,
}

/// A raw rebar orientation record.
#[derive(Clone, Debug, Default)]
pub struct RebarOrientationRecord {
    /// Axis rendering.
    pub axis: String,
    /// Orientation angle.
    pub angle: f32,
    /// Region the orientation applies to.
    pub region: SetRecord,
    /// Local coordinate system.
    pub csys: DatumCsys,
}

/// A raw connector orientation record.
#[derive(Clone, Debug, Default)]
pub struct ConnectorOrientationRecord {
    /// Region the orientation applies to.
    pub region: SetRecord,
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

/// A raw template part record.
#[derive(Clone, Debug, Default)]
pub struct PartRecord {
    /// Part name.
    pub name: String,
    /// Embedded space rendering.
    pub embedded_space: String,
    /// Part nodes.
    pub nodes: Vec<NodeRecord>,
    /// Part elements.
    pub elements: Vec<ElementRecord>,
    /// Node sets.
    pub node_sets: Vec<SetRecord>,
    /// Element sets.
    pub element_sets: Vec<SetRecord>,
    /// Surface sets.
    pub surfaces: Vec<SetRecord>,
}

/// A raw part instance record.
#[derive(Clone, Debug, Default)]
pub struct InstanceRecord {
    /// Instance name.
    pub name: String,
    /// Embedded space rendering.
    pub embedded_space: String,
    /// Instance nodes.
    pub nodes: Vec<NodeRecord>,
    /// Instance elements.
    pub elements: Vec<ElementRecord>,
    /// Node sets.
    pub node_sets: Vec<SetRecord>,
    /// Element sets.
    pub element_sets: Vec<SetRecord>,
    /// Surface sets.
    pub surfaces: Vec<SetRecord>,
    /// Rigid bodies.
    pub rigid_bodies: Vec<RigidBodyRecord>,
    /// Section assignments.
    pub section_assignments: Vec<SectionAssignmentRecord>,
    /// Beam orientations.
    pub beam_orientations: Vec<BeamOrientationRecord>,
    /// Rebar orientations.
    pub rebar_orientations: Vec<RebarOrientationRecord>,
    /// Instance-level analytic surface, when present.
    pub analytic_surface: Option<AnalyticSurface>,
}

/// The raw root assembly record.
#[derive(Clone, Debug, Default)]
pub struct AssemblyRecord {
    /// Assembly name.
    pub name: String,
    /// Embedded space rendering.
    pub embedded_space: String,
    /// Assembly-level nodes.
    pub nodes: Vec<NodeRecord>,
    /// Assembly-level elements.
    pub elements: Vec<ElementRecord>,
    /// Assembly-level node sets.
    pub node_sets: Vec<SetRecord>,
    /// Assembly-level element sets.
    pub element_sets: Vec<SetRecord>,
    /// Assembly-level surface sets.
    pub surfaces: Vec<SetRecord>,
    /// Part instances.
    pub instances: Vec<InstanceRecord>,
    /// Datum coordinate systems.
    pub datum_csyses: Vec<DatumCsys>,
    /// Connector orientations.
    pub connector_orientations: Vec<ConnectorOrientationRecord>,
}

/// A raw frame header.
///
/// Field outputs are fetched separately through
/// [`SourceModel::field_outputs`] so frame filtering can run first.
#[derive(Clone, Debug, Default)]
pub struct FrameRecord {
    /// Increment number.
    pub increment_number: i32,
    /// Frame description.
    pub description: String,
    /// Frame domain.
    pub domain: Domain,
    /// Time/frequency/mode value.
    pub frame_value: f32,
    /// Frequency.
    pub frequency: f32,
    /// Mode number.
    pub mode: i32,
    /// Cyclic mode number.
    pub cyclic_mode_number: i32,
    /// Load case name.
    pub load_case: String,
}

/// The raw anchor of a history region.
#[derive(Clone, Debug, Default)]
pub struct HistoryPointRecord {
    /// Anchoring node; `None` when the point has no node anchor (the
    /// source renders that as a negative node label).
    pub node: Option<NodeRecord>,
    /// Anchoring element, when present.
    pub element: Option<ElementRecord>,
    /// Integration point number.
    pub ip_number: i32,
    /// Section point, when present.
    pub section_point: Option<SectionPoint>,
    /// Element face of the point.
    pub face: Option<FaceTag>,
    /// Position rendering.
    pub position: String,
    /// Region set of the point.
    pub region: SetRecord,
    /// Owning instance name.
    pub instance_name: String,
    /// Owning assembly name.
    pub assembly_name: String,
}

/// A raw history region header.
///
/// Outputs are fetched separately through
/// [`SourceModel::history_outputs`] so region filtering can run first.
#[derive(Clone, Debug, Default)]
pub struct HistoryRegionRecord {
    /// Region name.
    pub name: String,
    /// Region description.
    pub description: String,
    /// Position rendering.
    pub position: String,
    /// Load case name.
    pub load_case: String,
    /// The region's anchor.
    pub point: HistoryPointRecord,
}

/// A raw history output series.
#[derive(Clone, Debug, Default)]
pub struct HistoryOutputRecord {
    /// Output name.
    pub name: String,
    /// Output description.
    pub description: String,
    /// Value kind rendering.
    pub kind: String,
    /// Series rows.
    pub data: Vec<Vec<f32>>,
    /// Conjugate series rows.
    pub conjugate: Vec<Vec<f32>>,
}

/// A raw step record with frame and history-region headers.
#[derive(Clone, Debug, Default)]
pub struct StepRecord {
    /// Step name.
    pub name: String,
    /// Step description.
    pub description: String,
    /// Step domain.
    pub domain: Domain,
    /// Previous step name.
    pub previous_step_name: String,
    /// Analysis procedure.
    pub procedure: String,
    /// Geometric nonlinearity flag.
    pub nlgeom: bool,
    /// Step number.
    pub number: i32,
    /// Step time period.
    pub time_period: f64,
    /// Total accumulated time.
    pub total_time: f64,
    /// Model mass.
    pub mass: f64,
    /// Acoustic mass.
    pub acoustic_mass: f64,
    /// Center of mass.
    pub mass_center: Vec<f64>,
    /// Acoustic center of mass.
    pub acoustic_mass_center: Vec<f64>,
    /// Inertia about the center of mass.
    pub inertia_about_center: Vec<f64>,
    /// Inertia about the origin.
    pub inertia_about_origin: Vec<f64>,
    /// Load case names.
    pub load_cases: Vec<String>,
    /// Frame headers.
    pub frames: Vec<FrameRecord>,
    /// History region headers.
    pub history_regions: Vec<HistoryRegionRecord>,
}

/// A raw per-value record of a field output.
#[derive(Clone, Debug, Default)]
pub struct FieldValueRecord {
    /// Element label, when element-anchored.
    pub element_label: Option<i32>,
    /// Node label, when node-anchored.
    pub node_label: Option<i32>,
    /// Integration point, when present.
    pub integration_point: Option<i32>,
    /// Tensor character.
    pub kind: Option<TensorKind>,
    /// Section point, when present.
    pub section_point: Option<SectionPoint>,
    /// Invariant values reported by the source.
    pub invariants: Vec<(Invariant, f32)>,
}

/// The flat numeric payload of a bulk block.
#[derive(Clone, Debug)]
pub enum BulkBuffer {
    /// Single-precision buffer.
    Single(Vec<f32>),
    /// Double-precision buffer.
    Double(Vec<f64>),
}

impl BulkBuffer {
    /// Number of values in the buffer.
    pub fn len(&self) -> usize {
        match self {
            BulkBuffer::Single(values) => values.len(),
            BulkBuffer::Double(values) => values.len(),
        }
    }

    /// True when the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BulkBuffer {
    fn default() -> Self {
        BulkBuffer::Single(Vec::new())
    }
}

/// A raw bulk data block: flat buffers plus partition metadata.
#[derive(Clone, Debug, Default)]
pub struct BulkRecord {
    /// Where the values live.
    pub position: ResultPosition,
    /// Owning instance name.
    pub instance: String,
    /// Base element type of the partition.
    pub base_element_type: String,
    /// Number of value rows (`length x width` values in `data`).
    pub length: usize,
    /// Components per value row.
    pub width: usize,
    /// Number of elements (zero for node-based blocks).
    pub number_of_elements: usize,
    /// Values per element as reported by the source.
    pub values_per_element: usize,
    /// Components per local-coordinate row.
    pub orientation_width: usize,
    /// Component labels of the partition.
    pub component_labels: Vec<String>,
    /// Flat element labels, one per value row.
    pub element_labels: Vec<i32>,
    /// Flat node labels, one per value row.
    pub node_labels: Vec<i32>,
    /// Flat integration points, one per value row.
    pub integration_points: Vec<i32>,
    /// Flat face tags, one per value row.
    pub faces: Vec<FaceTag>,
    /// Flat von Mises values, one per value row.
    pub mises: Vec<f32>,
    /// Primary values, `length x width`, row-major.
    pub data: BulkBuffer,
    /// Conjugate values, same layout as `data`.
    pub conjugate: Option<BulkBuffer>,
    /// Local coordinate systems, `length x orientation_width`, row-major.
    pub local_coords: Option<BulkBuffer>,
}

/// A raw field output with values and bulk blocks.
#[derive(Clone, Debug, Default)]
pub struct FieldOutputRecord {
    /// Output name (repository key).
    pub name: String,
    /// Output description.
    pub description: String,
    /// First tensor dimension.
    pub dim: i32,
    /// Second tensor dimension.
    pub dim2: i32,
    /// Component labels.
    pub component_labels: Vec<String>,
    /// Invariants valid for the output.
    pub valid_invariants: Vec<Invariant>,
    /// Output locations: position plus section points.
    pub locations: Vec<(ResultPosition, Vec<SectionPoint>)>,
    /// Whether the output carries conjugate data.
    pub is_complex: bool,
    /// Per-value records.
    pub values: Vec<FieldValueRecord>,
    /// Bulk blocks.
    pub bulk: Vec<BulkRecord>,
}

/// Read-only access to a source result database.
///
/// Implementations adapt a concrete database handle. All accessors are
/// read-only and iteration order is stable within one handle.
pub trait SourceModel {
    /// Top-level metadata.
    fn summary(&self) -> Result<ModelSummary>;

    /// Job metadata.
    fn job(&self) -> Result<JobData>;

    /// Cyclic-symmetry sector definition, when defined.
    fn sector_definition(&self) -> Result<Option<SectorDefinition>>;

    /// Section categories.
    fn section_categories(&self) -> Result<Vec<SectionCategory>>;

    /// User-authored XY data series.
    fn user_series(&self) -> Result<Vec<UserSeries>>;

    /// Contact interactions.
    fn interactions(&self) -> Result<Vec<InteractionRecord>>;

    /// Kinematic constraints.
    fn constraints(&self) -> Result<Vec<ConstraintRecord>>;

    /// Template parts.
    fn parts(&self) -> Result<Vec<PartRecord>>;

    /// The root assembly.
    fn assembly(&self) -> Result<AssemblyRecord>;

    /// Steps with frame and history-region headers.
    fn steps(&self) -> Result<Vec<StepRecord>>;

    /// Field outputs of one frame. Only called for frames that pass the
    /// selection filter, so unselected frames cost nothing.
    fn field_outputs(&self, step: &str, increment: i32) -> Result<Vec<FieldOutputRecord>>;

    /// History outputs of one region. Only called for regions that pass
    /// the selection filter.
    fn history_outputs(&self, step: &str, region: &str) -> Result<Vec<HistoryOutputRecord>>;
}
