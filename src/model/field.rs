//! Field outputs: per-frame result snapshots and their bulk data blocks.

use std::collections::BTreeMap;
use std::mem;

use super::mesh::{FaceTag, SectionPoint};

/// Where a result value lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultPosition {
    /// At mesh nodes.
    #[default]
    Nodal,
    /// At element integration points.
    IntegrationPoint,
    /// Extrapolated to element nodes.
    ElementNodal,
    /// On element faces.
    ElementFace,
    /// At element centroids.
    Centroid,
}

impl ResultPosition {
    /// Canonical rendering used in the output container.
    pub fn label(self) -> &'static str {
        match self {
            ResultPosition::Nodal => "Nodal",
            ResultPosition::IntegrationPoint => "Integration Point",
            ResultPosition::ElementNodal => "Element Nodal",
            ResultPosition::ElementFace => "Element Face",
            ResultPosition::Centroid => "Centroid",
        }
    }
}

/// Tensor character of a field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorKind {
    /// Single component.
    Scalar,
    /// Vector components.
    Vector,
    /// Full 3D tensor.
    Tensor3dFull,
    /// Planar 3D tensor.
    Tensor3dPlanar,
    /// Surface 3D tensor.
    Tensor3dSurface,
    /// Planar 2D tensor.
    Tensor2dPlanar,
    /// Surface 2D tensor.
    Tensor2dSurface,
}

impl TensorKind {
    /// Canonical rendering used in the output container.
    pub fn label(self) -> &'static str {
        match self {
            TensorKind::Scalar => "Scalar",
            TensorKind::Vector => "Vector",
            TensorKind::Tensor3dFull => "Tensor 3D Full",
            TensorKind::Tensor3dPlanar => "Tensor 3D Planar",
            TensorKind::Tensor3dSurface => "Tensor 3D Surface",
            TensorKind::Tensor2dPlanar => "Tensor 2D Planar",
            TensorKind::Tensor2dSurface => "Tensor 2D Surface",
        }
    }
}

/// Derived invariants a field output may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Invariant {
    /// Vector magnitude.
    Magnitude,
    /// Von Mises equivalent stress.
    Mises,
    /// Tresca equivalent stress.
    Tresca,
    /// Equivalent pressure.
    Press,
    /// Third stress invariant.
    Inv3,
    /// Maximum principal value.
    MaxPrincipal,
    /// Middle principal value.
    MidPrincipal,
    /// Minimum principal value.
    MinPrincipal,
    /// Maximum in-plane principal value.
    MaxInPlanePrincipal,
    /// Minimum in-plane principal value.
    MinInPlanePrincipal,
    /// Out-of-plane principal value.
    OutOfPlanePrincipal,
}

impl Invariant {
    /// Canonical rendering used in the output container.
    pub fn label(self) -> &'static str {
        match self {
            Invariant::Magnitude => "Magnitude",
            Invariant::Mises => "Mises",
            Invariant::Tresca => "Tresca",
            Invariant::Press => "Press",
            Invariant::Inv3 => "Inv3",
            Invariant::MaxPrincipal => "Max Principal",
            Invariant::MidPrincipal => "Mid Principal",
            Invariant::MinPrincipal => "Min Principal",
            Invariant::MaxInPlanePrincipal => "Max Inplane Principal",
            Invariant::MinInPlanePrincipal => "Min Inplane Principal",
            Invariant::OutOfPlanePrincipal => "Out of Plane Principal",
        }
    }

    /// Attribute key used when writing the invariant of a single value.
    pub fn key(self) -> &'static str {
        match self {
            Invariant::Magnitude => "magnitude",
            Invariant::Mises => "mises",
            Invariant::Tresca => "tresca",
            Invariant::Press => "press",
            Invariant::Inv3 => "inv3",
            Invariant::MaxPrincipal => "maxPrincipal",
            Invariant::MidPrincipal => "midPrincipal",
            Invariant::MinPrincipal => "minPrincipal",
            Invariant::MaxInPlanePrincipal => "maxInPlanePrincipal",
            Invariant::MinInPlanePrincipal => "minInPlanePrincipal",
            Invariant::OutOfPlanePrincipal => "outOfPlanePrincipal",
        }
    }
}

/// Numeric precision of a bulk block. A block is wholly one or the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    /// 32-bit values.
    Single,
    /// 64-bit values.
    Double,
}

impl Precision {
    /// Canonical rendering used in the output container.
    pub fn label(self) -> &'static str {
        match self {
            Precision::Single => "Single Precision",
            Precision::Double => "Double Precision",
        }
    }
}

/// Regrouped bulk values: one inner vector per group (element or node row).
///
/// For element-based blocks each group holds `points_per_element x width`
/// values; for node-based blocks each group is one row of `width` values.
#[derive(Clone, Debug, PartialEq)]
pub enum BulkValues {
    /// Single-precision groups.
    Single(Vec<Vec<f32>>),
    /// Double-precision groups.
    Double(Vec<Vec<f64>>),
}

impl BulkValues {
    /// Number of groups.
    pub fn group_count(&self) -> usize {
        match self {
            BulkValues::Single(rows) => rows.len(),
            BulkValues::Double(rows) => rows.len(),
        }
    }

    /// Total number of values across all groups.
    pub fn value_count(&self) -> usize {
        match self {
            BulkValues::Single(rows) => rows.iter().map(Vec::len).sum(),
            BulkValues::Double(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    /// Precision of the payload.
    pub fn precision(&self) -> Precision {
        match self {
            BulkValues::Single(_) => Precision::Single,
            BulkValues::Double(_) => Precision::Double,
        }
    }

    /// True when no values remain (never populated, or released).
    pub fn is_empty(&self) -> bool {
        self.value_count() == 0
    }

    /// Flatten the groups back into row-major order.
    pub fn flatten_single(&self) -> Vec<f32> {
        match self {
            BulkValues::Single(rows) => rows.iter().flatten().copied().collect(),
            BulkValues::Double(_) => Vec::new(),
        }
    }

    /// Flatten the groups back into row-major order.
    pub fn flatten_double(&self) -> Vec<f64> {
        match self {
            BulkValues::Single(_) => Vec::new(),
            BulkValues::Double(rows) => rows.iter().flatten().copied().collect(),
        }
    }

    /// Swap the payload for an empty container, freeing its memory.
    pub fn release(&mut self) {
        match self {
            BulkValues::Single(rows) => drop(mem::take(rows)),
            BulkValues::Double(rows) => drop(mem::take(rows)),
        }
    }
}

/// One homogeneous slab of raw result values.
///
/// Blocks are partitioned by (element type, section point) in the source;
/// only inside such a partition is the flat buffer homogeneous.
#[derive(Clone, Debug)]
pub struct FieldBulkData {
    /// Where the values live.
    pub position: ResultPosition,
    /// Owning instance name.
    pub instance: String,
    /// Base element type of the partition (element-based blocks).
    pub base_element_type: String,
    /// Number of value rows in the flat source buffer.
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
    /// Per-element label groups, `points_per_element` entries each.
    pub element_labels: Vec<Vec<i32>>,
    /// Per-element integration point groups.
    pub integration_points: Vec<Vec<i32>>,
    /// Per-element face tag groups (element-face results).
    pub faces: Vec<Vec<FaceTag>>,
    /// Per-element von Mises groups (present when the Mises invariant is
    /// valid for the parent output).
    pub mises: Vec<Vec<f32>>,
    /// Node labels parallel to the rows of node-based blocks.
    pub node_labels: Vec<i32>,
    /// Primary values.
    pub data: BulkValues,
    /// Conjugate (imaginary) values; populated only under a complex parent.
    pub conjugate: Option<BulkValues>,
    /// Local coordinate systems, `orientation_width` components per point.
    pub local_coords: Option<BulkValues>,
}

impl FieldBulkData {
    /// True when the block is element-based.
    pub fn is_element_based(&self) -> bool {
        self.number_of_elements > 0 && !self.element_labels.is_empty()
    }

    /// Integration points per element (element-based blocks).
    pub fn points_per_element(&self) -> usize {
        if self.number_of_elements == 0 {
            0
        } else {
            self.length / self.number_of_elements
        }
    }

    /// Precision of the block's payload.
    pub fn precision(&self) -> Precision {
        self.data.precision()
    }

    /// Release every large numeric buffer, keeping the block's metadata.
    pub fn release(&mut self) {
        self.data.release();
        if let Some(conjugate) = &mut self.conjugate {
            conjugate.release();
        }
        if let Some(coords) = &mut self.local_coords {
            coords.release();
        }
        drop(mem::take(&mut self.element_labels));
        drop(mem::take(&mut self.integration_points));
        drop(mem::take(&mut self.faces));
        drop(mem::take(&mut self.mises));
        drop(mem::take(&mut self.node_labels));
    }

    /// True once [`release`](Self::release) has run (or the block never
    /// carried values).
    pub fn is_released(&self) -> bool {
        self.data.is_empty() && self.element_labels.is_empty() && self.node_labels.is_empty()
    }
}

/// A single sparse field value with its derived invariants.
#[derive(Clone, Debug, Default)]
pub struct FieldValue {
    /// Element label, when element-anchored.
    pub element_label: Option<i32>,
    /// Node label, when node-anchored.
    pub node_label: Option<i32>,
    /// Integration point, when present.
    pub integration_point: Option<i32>,
    /// Tensor character of the value.
    pub kind: Option<TensorKind>,
    /// Section point, when present.
    pub section_point: Option<SectionPoint>,
    /// Invariants that are meaningful for this value.
    pub invariants: BTreeMap<Invariant, f32>,
}

impl FieldValue {
    /// True when anything beyond the bare labels is populated.
    pub fn is_meaningful(&self) -> bool {
        self.integration_point.is_some()
            || self.section_point.is_some()
            || !self.invariants.is_empty()
    }
}

/// A field location: output position plus its section points.
#[derive(Clone, Debug)]
pub struct FieldLocation {
    /// Output position.
    pub position: ResultPosition,
    /// Section points at the location.
    pub section_points: Vec<SectionPoint>,
}

/// A named field output within one frame.
#[derive(Clone, Debug, Default)]
pub struct FieldOutput {
    /// Output name (repository key, e.g. `S`, `U`).
    pub name: String,
    /// Output description.
    pub description: String,
    /// First tensor dimension.
    pub dim: i32,
    /// Second tensor dimension.
    pub dim2: i32,
    /// Component labels.
    pub component_labels: Vec<String>,
    /// Invariants valid for this output.
    pub valid_invariants: Vec<Invariant>,
    /// Output locations.
    pub locations: Vec<FieldLocation>,
    /// Sparse per-node values, keyed by node label.
    pub node_values: BTreeMap<i32, FieldValue>,
    /// Sparse per-element values, keyed by element label.
    pub element_values: BTreeMap<i32, FieldValue>,
    /// Bulk blocks, one per (element type, section point) partition.
    pub bulk: Vec<FieldBulkData>,
    /// Whether the output carries conjugate (frequency-domain) data.
    pub is_complex: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_values_flatten() {
        let values = BulkValues::Single(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(values.group_count(), 2);
        assert_eq!(values.value_count(), 4);
        assert_eq!(values.flatten_single(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(values.flatten_double().is_empty());
    }

    #[test]
    fn test_bulk_values_release() {
        let mut values = BulkValues::Double(vec![vec![1.0; 8]; 4]);
        assert!(!values.is_empty());
        values.release();
        assert!(values.is_empty());
        assert_eq!(values.precision(), Precision::Double);
    }

    #[test]
    fn test_field_value_meaningful() {
        let mut value = FieldValue::default();
        assert!(!value.is_meaningful());
        value.invariants.insert(Invariant::Mises, 12.5);
        assert!(value.is_meaningful());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ResultPosition::IntegrationPoint.label(), "Integration Point");
        assert_eq!(TensorKind::Tensor3dFull.label(), "Tensor 3D Full");
        assert_eq!(Invariant::MaxInPlanePrincipal.label(), "Max Inplane Principal");
        assert_eq!(Precision::Double.label(), "Double Precision");
    }
}
