//! Bulk-data regrouping.
//!
//! The source hands over one flat buffer of `length x width` values per
//! block. Element-based blocks are logically ragged: `length` rows cover
//! `number_of_elements` elements at `length / number_of_elements`
//! integration points each. The regrouping is purely positional, walking
//! the flat buffers once at a fixed stride; nothing is searched.

use crate::model::{BulkValues, FieldBulkData, Invariant};
use crate::source::{BulkBuffer, BulkRecord};
use crate::util::{Error, Result};

/// Regroup one raw block into the ragged domain representation.
///
/// `conjugate` buffers are only carried over when the parent field output
/// is complex; `mises` only when the Mises invariant is valid for it.
pub fn regroup(
    record: BulkRecord,
    valid_invariants: &[Invariant],
    complex: bool,
) -> Result<FieldBulkData> {
    let element_based = record.number_of_elements > 0 && !record.element_labels.is_empty();
    if element_based {
        regroup_element_block(record, valid_invariants, complex)
    } else {
        regroup_nodal_block(record, complex)
    }
}

fn chunk_values(buffer: BulkBuffer, group_len: usize) -> BulkValues {
    match buffer {
        BulkBuffer::Single(values) => BulkValues::Single(chunk(values, group_len)),
        BulkBuffer::Double(values) => BulkValues::Double(chunk(values, group_len)),
    }
}

fn chunk<T: Copy>(values: Vec<T>, group_len: usize) -> Vec<Vec<T>> {
    if group_len == 0 {
        return Vec::new();
    }
    values
        .chunks(group_len)
        .map(|chunk| chunk.to_vec())
        .collect()
}

fn regroup_element_block(
    record: BulkRecord,
    valid_invariants: &[Invariant],
    complex: bool,
) -> Result<FieldBulkData> {
    let elements = record.number_of_elements;
    if record.length % elements != 0 {
        return Err(Error::invalid_block(format!(
            "length {} is not a multiple of {} elements",
            record.length, elements
        )));
    }
    let points = record.length / elements;
    let expected = record.length * record.width;
    if record.data.len() != expected {
        return Err(Error::invalid_block(format!(
            "data holds {} values, expected {} ({} rows x {} components)",
            record.data.len(),
            expected,
            record.length,
            record.width
        )));
    }
    if record.element_labels.len() != record.length {
        return Err(Error::invalid_block(format!(
            "element labels hold {} entries, expected {}",
            record.element_labels.len(),
            record.length
        )));
    }

    // One group per element: points x width values, walked at a fixed
    // stride from the flat buffer.
    let data = chunk_values(record.data, points * record.width);
    let conjugate = if complex {
        record
            .conjugate
            .map(|buffer| chunk_values(buffer, points * record.width))
    } else {
        None
    };
    let local_coords = record
        .local_coords
        .filter(|buffer| !buffer.is_empty())
        .map(|buffer| chunk_values(buffer, points * record.orientation_width));

    let element_labels = chunk(record.element_labels, points);
    let integration_points = chunk(record.integration_points, points);
    let faces = chunk(record.faces, points);
    let mises = if valid_invariants.contains(&Invariant::Mises) {
        chunk(record.mises, points)
    } else {
        Vec::new()
    };

    Ok(FieldBulkData {
        position: record.position,
        instance: record.instance,
        base_element_type: record.base_element_type,
        length: record.length,
        width: record.width,
        number_of_elements: elements,
        values_per_element: record.values_per_element,
        orientation_width: record.orientation_width,
        component_labels: record.component_labels,
        element_labels,
        integration_points,
        faces,
        mises,
        node_labels: Vec::new(),
        data,
        conjugate,
        local_coords,
    })
}

fn regroup_nodal_block(record: BulkRecord, complex: bool) -> Result<FieldBulkData> {
    let expected = record.length * record.width;
    if record.data.len() != expected {
        return Err(Error::invalid_block(format!(
            "data holds {} values, expected {} ({} rows x {} components)",
            record.data.len(),
            expected,
            record.length,
            record.width
        )));
    }
    if record.node_labels.len() != record.length {
        return Err(Error::invalid_block(format!(
            "node labels hold {} entries, expected {}",
            record.node_labels.len(),
            record.length
        )));
    }

    let data = chunk_values(record.data, record.width);
    let conjugate = if complex {
        record
            .conjugate
            .map(|buffer| chunk_values(buffer, record.width))
    } else {
        None
    };

    Ok(FieldBulkData {
        position: record.position,
        instance: record.instance,
        base_element_type: record.base_element_type,
        length: record.length,
        width: record.width,
        number_of_elements: 0,
        values_per_element: record.values_per_element,
        orientation_width: 0,
        component_labels: record.component_labels,
        element_labels: Vec::new(),
        integration_points: Vec::new(),
        faces: Vec::new(),
        mises: Vec::new(),
        node_labels: record.node_labels,
        data,
        conjugate,
        local_coords: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResultPosition;

    /// N elements, P integration points, W components.
    fn element_record(n: usize, p: usize, w: usize) -> BulkRecord {
        let length = n * p;
        BulkRecord {
            position: ResultPosition::IntegrationPoint,
            length,
            width: w,
            number_of_elements: n,
            values_per_element: p * w,
            element_labels: (0..length).map(|i| (i / p) as i32 + 1).collect(),
            integration_points: (0..length).map(|i| (i % p) as i32 + 1).collect(),
            data: BulkBuffer::Single((0..length * w).map(|i| i as f32).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_element_reshape_round_trip() {
        let n = 4;
        let p = 3;
        let w = 6;
        let flat: Vec<f32> = (0..n * p * w).map(|i| i as f32).collect();
        let block = regroup(element_record(n, p, w), &[], false).expect("regroup");

        assert_eq!(block.points_per_element(), p);
        assert_eq!(block.data.group_count(), n);
        assert_eq!(block.element_labels.len(), n);
        assert_eq!(block.element_labels[2], vec![3, 3, 3]);
        assert_eq!(block.integration_points[0], vec![1, 2, 3]);
        // Flattening the ragged structure reproduces the flat buffer
        // bit for bit.
        assert_eq!(block.data.flatten_single(), flat);
    }

    #[test]
    fn test_element_reshape_double_precision() {
        let n = 2;
        let p = 2;
        let w = 4;
        let flat: Vec<f64> = (0..n * p * w).map(|i| i as f64 * 0.5).collect();
        let mut record = element_record(n, p, w);
        record.data = BulkBuffer::Double(flat.clone());
        let block = regroup(record, &[], false).expect("regroup");
        assert_eq!(block.data.flatten_double(), flat);
    }

    #[test]
    fn test_mises_requires_valid_invariant() {
        let n = 2;
        let p = 2;
        let mut record = element_record(n, p, 1);
        record.mises = vec![1.0, 2.0, 3.0, 4.0];

        let without = regroup(record.clone(), &[], false).expect("regroup");
        assert!(without.mises.is_empty());

        let with = regroup(record, &[Invariant::Mises], false).expect("regroup");
        assert_eq!(with.mises, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_conjugate_requires_complex() {
        let n = 2;
        let p = 1;
        let w = 2;
        let mut record = element_record(n, p, w);
        record.conjugate = Some(BulkBuffer::Single(vec![9.0; n * p * w]));

        let real = regroup(record.clone(), &[], false).expect("regroup");
        assert!(real.conjugate.is_none());

        let complex = regroup(record, &[], true).expect("regroup");
        let conjugate = complex.conjugate.expect("conjugate");
        assert_eq!(conjugate.group_count(), n);
        assert_eq!(conjugate.value_count(), n * p * w);
    }

    #[test]
    fn test_local_coords_stride() {
        let n = 2;
        let p = 2;
        let mut record = element_record(n, p, 1);
        record.orientation_width = 3;
        record.local_coords = Some(BulkBuffer::Single((0..n * p * 3).map(|i| i as f32).collect()));
        let block = regroup(record, &[], false).expect("regroup");
        let coords = block.local_coords.expect("local coords");
        assert_eq!(coords.group_count(), n);
        // Each element group carries p x orientation_width values.
        assert_eq!(coords.value_count(), n * p * 3);
    }

    #[test]
    fn test_nodal_reshape() {
        let length = 5;
        let w = 3;
        let flat: Vec<f32> = (0..length * w).map(|i| i as f32).collect();
        let record = BulkRecord {
            position: ResultPosition::Nodal,
            length,
            width: w,
            node_labels: (1..=length as i32).collect(),
            data: BulkBuffer::Single(flat.clone()),
            ..Default::default()
        };
        let block = regroup(record, &[], false).expect("regroup");
        assert!(!block.is_element_based());
        assert_eq!(block.node_labels, vec![1, 2, 3, 4, 5]);
        assert_eq!(block.data.group_count(), length);
        assert_eq!(block.data.flatten_single(), flat);
    }

    #[test]
    fn test_inconsistent_block_is_rejected() {
        let mut record = element_record(3, 2, 2);
        record.length = 7; // not a multiple of 3 elements
        assert!(matches!(
            regroup(record, &[], false),
            Err(Error::InvalidBlock(_))
        ));

        let record = BulkRecord {
            position: ResultPosition::Nodal,
            length: 4,
            width: 2,
            node_labels: vec![1, 2, 3, 4],
            data: BulkBuffer::Single(vec![0.0; 6]), // expected 8
            ..Default::default()
        };
        assert!(matches!(
            regroup(record, &[], false),
            Err(Error::InvalidBlock(_))
        ));
    }
}
