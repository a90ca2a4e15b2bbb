//! Row-major array shapes.
//!
//! Shapes describe the dimensions of dataset writes. Result data is at most
//! rank 3 (elements x integration points x components).

use smallvec::SmallVec;

/// Shape of a row-major array (rank <= 3 in practice).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shape {
    dims: SmallVec<[usize; 3]>,
}

impl Shape {
    /// Create a 1D shape.
    pub fn d1(len: usize) -> Self {
        Self { dims: smallvec::smallvec![len] }
    }

    /// Create a 2D shape (rows x columns).
    pub fn d2(rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// Create a 3D shape.
    pub fn d3(groups: usize, rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![groups, rows, cols] }
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// All dimension sizes.
    pub fn sizes(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements (product of all dimensions).
    pub fn len(&self) -> usize {
        if self.dims.is_empty() {
            0
        } else {
            self.dims.iter().product()
        }
    }

    /// True when the shape holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}
