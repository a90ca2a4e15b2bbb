//! Content-keyed interning of mesh entities.
//!
//! Nodes and elements are referenced from many places: instance meshes,
//! node/element/surface sets, constraint regions, history points. The
//! interner collapses all of those references onto one canonical record per
//! content key, so downstream serialization can store each entity once and
//! link every other reference to it.
//!
//! The interner is an explicit object scoped to one extraction run; it is
//! passed by reference and discarded with the run.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::{Element, ElementHandle, Node, NodeHandle};

/// Number of significant decimal digits a coordinate contributes to a
/// node's identity key.
///
/// Coordinates read from the source twice are not guaranteed bit-identical;
/// rendering them at a fixed precision makes the key stable. Near-miss
/// coordinates that round differently are intentionally treated as distinct
/// nodes.
pub const COORD_KEY_DIGITS: usize = 7;

fn coord_token(value: f32) -> String {
    // 7 significant digits: one leading digit plus six fractional in
    // scientific notation.
    format!("{:.*e}", COORD_KEY_DIGITS - 1, value)
}

/// Identity key of a node: label plus rounded coordinates.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct NodeKey(String);

impl NodeKey {
    /// Build the key from a label and raw coordinates.
    pub fn new(label: i32, coordinates: &[f32; 3]) -> Self {
        Self(format!(
            "{}_{}_{}_{}",
            label,
            coord_token(coordinates[0]),
            coord_token(coordinates[1]),
            coord_token(coordinates[2]),
        ))
    }

    /// Build the key of an existing node record.
    pub fn of(node: &Node) -> Self {
        Self::new(node.label, &node.coordinates)
    }
}

/// Identity key of an element: label plus the ordered instance names.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ElementKey(String);

impl ElementKey {
    /// Build the key from a label and the owning instance names.
    pub fn new(label: i32, instance_names: &[String]) -> Self {
        let mut key = label.to_string();
        for name in instance_names {
            key.push_str(name);
        }
        Self(key)
    }

    /// Build the key of an existing element record.
    pub fn of(element: &Element) -> Self {
        Self::new(element.label, &element.instance_names)
    }
}

/// Content-keyed store of canonical node and element records.
///
/// A key collision is definitionally identity: the first payload stored
/// under a key wins and every later intern call returns the same handle.
#[derive(Default)]
pub struct EntityInterner {
    nodes: RwLock<HashMap<NodeKey, NodeHandle>>,
    elements: RwLock<HashMap<ElementKey, ElementHandle>>,
}

impl EntityInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a node, returning its canonical handle.
    pub fn intern_node(&self, label: i32, coordinates: [f32; 3]) -> NodeHandle {
        let key = NodeKey::new(label, &coordinates);
        if let Some(handle) = self.nodes.read().get(&key) {
            return Arc::clone(handle);
        }
        let handle = Arc::new(Node { label, coordinates });
        self.nodes
            .write()
            .entry(key)
            .or_insert(handle)
            .clone()
    }

    /// Intern an element, returning its canonical handle.
    ///
    /// `payload` runs only on the first call for a key, so callers can put
    /// section-category lookups and connectivity copies behind it.
    pub fn intern_element<F>(
        &self,
        label: i32,
        instance_names: &[String],
        payload: F,
    ) -> ElementHandle
    where
        F: FnOnce() -> Element,
    {
        let key = ElementKey::new(label, instance_names);
        if let Some(handle) = self.elements.read().get(&key) {
            return Arc::clone(handle);
        }
        let handle = Arc::new(payload());
        self.elements
            .write()
            .entry(key)
            .or_insert(handle)
            .clone()
    }

    /// Number of distinct nodes interned so far.
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Number of distinct elements interned so far.
    pub fn element_count(&self) -> usize {
        self.elements.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionCategory;

    fn element(label: i32, instances: &[&str]) -> Element {
        Element {
            label,
            kind: "C3D8R".to_string(),
            connectivity: vec![1, 2, 3, 4],
            instance_names: instances.iter().map(|s| s.to_string()).collect(),
            section_category: SectionCategory::default(),
        }
    }

    #[test]
    fn test_intern_node_idempotent() {
        let interner = EntityInterner::new();
        let a = interner.intern_node(7, [1.0, 2.0, 3.0]);
        let b = interner.intern_node(7, [1.0, 2.0, 3.0]);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(interner.node_count(), 1);
    }

    #[test]
    fn test_intern_node_rounding() {
        let interner = EntityInterner::new();
        // Differences past the seventh significant digit collapse.
        let a = interner.intern_node(7, [1.000_000_01, 2.0, 3.0]);
        let b = interner.intern_node(7, [1.000_000_04, 2.0, 3.0]);
        assert!(Arc::ptr_eq(&a, &b));
        // Differences within the precision stay distinct.
        let c = interner.intern_node(7, [1.000_01, 2.0, 3.0]);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(interner.node_count(), 2);
    }

    #[test]
    fn test_intern_node_distinct_labels() {
        let interner = EntityInterner::new();
        let a = interner.intern_node(7, [1.0, 2.0, 3.0]);
        let b = interner.intern_node(8, [1.0, 2.0, 3.0]);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(interner.node_count(), 2);
    }

    #[test]
    fn test_intern_element_payload_once() {
        let interner = EntityInterner::new();
        let instances = vec!["INST-1".to_string()];
        let mut calls = 0;
        let a = interner.intern_element(12, &instances, || {
            calls += 1;
            element(12, &["INST-1"])
        });
        let b = interner.intern_element(12, &instances, || {
            calls += 1;
            element(12, &["INST-1"])
        });
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_intern_element_instance_names_split_identity() {
        let interner = EntityInterner::new();
        let first = vec!["INST-1".to_string()];
        let second = vec!["INST-2".to_string()];
        let a = interner.intern_element(12, &first, || element(12, &["INST-1"]));
        let b = interner.intern_element(12, &second, || element(12, &["INST-2"]));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(interner.element_count(), 2);
    }

    #[test]
    fn test_node_key_matches_record() {
        let node = Node { label: 3, coordinates: [0.5, -1.5, 2.25] };
        assert_eq!(NodeKey::of(&node), NodeKey::new(3, &[0.5, -1.5, 2.25]));
    }
}
