//! Mesh entities: nodes, elements, section categories, sets.

use std::sync::Arc;

/// A mesh node: integer label plus coordinates.
///
/// Labels are unique within an instance, not across instances; identity
/// across the whole run is decided by the interner's content key.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Node label.
    pub label: i32,
    /// Node coordinates. Planar models carry a zero third component.
    pub coordinates: [f32; 3],
}

/// Canonical, shared reference to an interned node.
pub type NodeHandle = Arc<Node>;

/// One output location through a section (shells, beams).
#[derive(Clone, Debug, PartialEq)]
pub struct SectionPoint {
    /// Section point number.
    pub number: i32,
    /// Section point description.
    pub description: String,
}

/// A section category, referenced from elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionCategory {
    /// Category name.
    pub name: String,
    /// Category description.
    pub description: String,
    /// Section points of this category.
    pub section_points: Vec<SectionPoint>,
}

/// A mesh element.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Element label.
    pub label: i32,
    /// Element type tag (e.g. `C3D8R`).
    pub kind: String,
    /// Ordered node labels.
    pub connectivity: Vec<i32>,
    /// Instances the element belongs to; the same label can be reused
    /// across instances, so the names are part of the identity key.
    pub instance_names: Vec<String>,
    /// The element's section category.
    pub section_category: SectionCategory,
}

/// Canonical, shared reference to an interned element.
pub type ElementHandle = Arc<Element>;

/// Kind of a named set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetKind {
    /// A set of nodes.
    Node,
    /// A set of elements.
    Element,
    /// A set of element faces.
    Surface,
}

impl SetKind {
    /// Canonical rendering used in the output container.
    pub fn label(self) -> &'static str {
        match self {
            SetKind::Node => "Node Set",
            SetKind::Element => "Element Set",
            SetKind::Surface => "Surface Set",
        }
    }
}

/// An element-face code.
///
/// Covers beam ends, solid faces, shell edges and shell sides; anything
/// outside the known range reads back as `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceTag {
    /// Face code outside the known taxonomy.
    Unknown,
    /// Beam/truss end (1-3).
    End(u8),
    /// Solid element face (1-6).
    Face(u8),
    /// Shell/solid edge (1-20).
    Edge(u8),
    /// Positive shell side.
    SidePositive,
    /// Negative shell side.
    SideNegative,
    /// Double-sided shell.
    DoubleSided,
}

impl FaceTag {
    /// Canonical rendering used in the output container.
    pub fn label(self) -> String {
        match self {
            FaceTag::Unknown => "FACE_UNKNOWN".to_string(),
            FaceTag::End(n) => format!("END{n}"),
            FaceTag::Face(n) => format!("FACE{n}"),
            FaceTag::Edge(n) => format!("EDGE{n}"),
            FaceTag::SidePositive => "SPOS".to_string(),
            FaceTag::SideNegative => "SNEG".to_string(),
            FaceTag::DoubleSided => "DOUBLE_SIDED".to_string(),
        }
    }
}

/// A named set of nodes, elements or faces.
///
/// An empty-named set in the source is a sentinel for "absent"; the builder
/// materializes those as `None` and they never reach the serializer.
#[derive(Clone, Debug)]
pub struct Set {
    /// Set name (never empty once materialized).
    pub name: String,
    /// Set kind.
    pub kind: SetKind,
    /// Instances the set spans.
    pub instance_names: Vec<String>,
    /// Canonical node handles (node sets).
    pub nodes: Vec<NodeHandle>,
    /// Canonical element handles (element and surface sets).
    pub elements: Vec<ElementHandle>,
    /// Face tags parallel to `elements` (surface sets only).
    pub faces: Vec<FaceTag>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_tag_labels() {
        assert_eq!(FaceTag::Unknown.label(), "FACE_UNKNOWN");
        assert_eq!(FaceTag::End(2).label(), "END2");
        assert_eq!(FaceTag::Face(4).label(), "FACE4");
        assert_eq!(FaceTag::Edge(13).label(), "EDGE13");
        assert_eq!(FaceTag::SidePositive.label(), "SPOS");
        assert_eq!(FaceTag::DoubleSided.label(), "DOUBLE_SIDED");
    }

    #[test]
    fn test_set_kind_labels() {
        assert_eq!(SetKind::Node.label(), "Node Set");
        assert_eq!(SetKind::Element.label(), "Element Set");
        assert_eq!(SetKind::Surface.label(), "Surface Set");
    }
}
