//! Extents, buffer identity and the destination-container contract.

use crate::Result;
use lazy_linalg_traits::Element;
use std::fmt;

/// Extents of a dense object. Matrices have `n_slices == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub n_rows: usize,
    pub n_cols: usize,
    pub n_slices: usize,
}

impl Shape {
    #[inline]
    pub const fn mat(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            n_slices: 1,
        }
    }

    #[inline]
    pub const fn cube(n_rows: usize, n_cols: usize, n_slices: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            n_slices,
        }
    }

    #[inline]
    pub const fn n_elem(&self) -> usize {
        self.n_rows * self.n_cols * self.n_slices
    }

    /// A single row or a single column.
    #[inline]
    pub const fn is_vector(&self) -> bool {
        self.n_slices == 1 && (self.n_rows == 1 || self.n_cols == 1)
    }

    #[inline]
    pub const fn is_square(&self) -> bool {
        self.n_slices == 1 && self.n_rows == self.n_cols
    }

    /// Split a column-major linear index into `(row, col, slice)`.
    #[inline]
    pub fn unravel(&self, i: usize) -> (usize, usize, usize) {
        let r = i % self.n_rows;
        let rest = i / self.n_rows;
        (r, rest % self.n_cols, rest / self.n_cols)
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::mat(0, 0)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.n_slices == 1 {
            write!(f, "{}x{}", self.n_rows, self.n_cols)
        } else {
            write!(f, "{}x{}x{}", self.n_rows, self.n_cols, self.n_slices)
        }
    }
}

/// Address range `[start, end)` of a buffer, used for overlap checks.
///
/// Empty buffers never overlap anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferId {
    start: usize,
    end: usize,
}

impl BufferId {
    #[inline]
    pub fn of_slice<T>(s: &[T]) -> Self {
        Self::from_raw(s.as_ptr(), s.len())
    }

    /// Range covering `len` elements starting at `ptr`.
    #[inline]
    pub fn from_raw<T>(ptr: *const T, len: usize) -> Self {
        let start = ptr as usize;
        Self {
            start,
            end: start + len * std::mem::size_of::<T>(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn overlaps(&self, other: BufferId) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end
            && other.start < self.end
    }
}

/// `x == old`, except that a NaN `old` matches every NaN.
#[inline]
pub(crate) fn replace_matches<T: Element>(x: T, old: T) -> bool {
    if old.is_nan() {
        x.is_nan()
    } else {
        x == old
    }
}

/// A destination container: contiguous column-major storage that an
/// expression can be evaluated into.
pub trait Storage<T: Element> {
    fn shape(&self) -> Shape;

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    /// Change the extents. Element values are unspecified afterwards.
    /// Containers that cannot take `shape` return an error and stay unchanged.
    fn set_size(&mut self, shape: Shape) -> Result<()>;

    #[inline]
    fn n_rows(&self) -> usize {
        self.shape().n_rows
    }

    #[inline]
    fn n_cols(&self) -> usize {
        self.shape().n_cols
    }

    #[inline]
    fn n_slices(&self) -> usize {
        self.shape().n_slices
    }

    #[inline]
    fn n_elem(&self) -> usize {
        self.shape().n_elem()
    }

    /// Column `c` of slice 0.
    ///
    /// # Panics
    /// Panics if `c >= n_cols`.
    fn col(&self, c: usize) -> &[T] {
        let n_rows = self.n_rows();
        assert!(c < self.n_cols(), "column {c} out of range");
        &self.as_slice()[c * n_rows..(c + 1) * n_rows]
    }

    #[inline]
    fn buffer_id(&self) -> BufferId {
        BufferId::of_slice(self.as_slice())
    }

    fn zeros(&mut self, shape: Shape) -> Result<()> {
        self.set_size(shape)?;
        self.fill(T::zero());
        Ok(())
    }

    fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Substitute every element equal to `old` with `new`.
    fn replace(&mut self, old: T, new: T) {
        for x in self.as_mut_slice() {
            if replace_matches(*x, old) {
                *x = new;
            }
        }
    }

    /// Adopt a fully evaluated buffer. Owning containers take the allocation;
    /// wraps copy into their memory.
    fn take_buffer(&mut self, shape: Shape, data: Vec<T>) -> Result<()> {
        self.set_size(shape)?;
        self.as_mut_slice().copy_from_slice(&data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_unravel() {
        let s = Shape::cube(3, 4, 2);
        assert_eq!(s.n_elem(), 24);
        assert_eq!(s.unravel(0), (0, 0, 0));
        assert_eq!(s.unravel(5), (2, 1, 0));
        assert_eq!(s.unravel(13), (1, 0, 1));
        assert_eq!(s.to_string(), "3x4x2");
        assert_eq!(Shape::mat(2, 5).to_string(), "2x5");
    }

    #[test]
    fn test_shape_predicates() {
        assert!(Shape::mat(1, 7).is_vector());
        assert!(Shape::mat(7, 1).is_vector());
        assert!(!Shape::mat(2, 2).is_vector());
        assert!(!Shape::cube(1, 1, 3).is_vector());
        assert!(Shape::mat(3, 3).is_square());
    }

    #[test]
    fn test_buffer_overlap() {
        let data = [0.0f64; 10];
        let a = BufferId::of_slice(&data[0..5]);
        let b = BufferId::of_slice(&data[4..8]);
        let c = BufferId::of_slice(&data[5..10]);
        assert!(a.overlaps(b));
        assert!(!a.overlaps(c));
        assert!(!a.overlaps(BufferId::of_slice(&data[2..2])));
    }

    #[test]
    fn test_replace_matches_nan() {
        assert!(replace_matches(f64::NAN, f64::NAN));
        assert!(!replace_matches(1.0, f64::NAN));
        assert!(replace_matches(2.0f32, 2.0));
        assert!(replace_matches(0.0f64, -0.0));
    }
}
