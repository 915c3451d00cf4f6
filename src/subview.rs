//! Rectangular windows into one matrix.

use crate::mat::{Mat, MatMut, MatRef};
use crate::proxy::{AccessMode, Accessor, Proxy};
use crate::storage::{replace_matches, BufferId, Shape, Storage};
use crate::{LinalgError, Result};
use lazy_linalg_traits::Element;

/// A rectangle `[row, row + n_rows) x [col, col + n_cols)` of a parent matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub n_rows: usize,
    pub n_cols: usize,
}

impl Rect {
    pub const fn new(row: usize, col: usize, n_rows: usize, n_cols: usize) -> Self {
        Self {
            row,
            col,
            n_rows,
            n_cols,
        }
    }

    #[inline]
    pub const fn shape(&self) -> Shape {
        Shape::mat(self.n_rows, self.n_cols)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.n_cols == 0
    }

    /// Error unless the rectangle lies inside a `parent`-shaped matrix.
    pub fn check_within(&self, parent: Shape, op: &'static str) -> Result<()> {
        let fits = self
            .row
            .checked_add(self.n_rows)
            .is_some_and(|end| end <= parent.n_rows)
            && self
                .col
                .checked_add(self.n_cols)
                .is_some_and(|end| end <= parent.n_cols);
        if fits {
            Ok(())
        } else {
            Err(LinalgError::OutOfBounds {
                op,
                detail: format!(
                    "rows {}..{} cols {}..{} of a {parent} matrix",
                    self.row,
                    self.row.saturating_add(self.n_rows),
                    self.col,
                    self.col.saturating_add(self.n_cols),
                ),
            })
        }
    }

    /// Whether the two rectangles share at least one element.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.row < other.row + other.n_rows
            && other.row < self.row + self.n_rows
            && self.col < other.col + other.n_cols
            && other.col < self.col + self.n_cols
    }

    /// Linear index range in a column-major parent with `parent_rows` rows,
    /// from the first to one past the last element of the rectangle.
    fn footprint(&self, parent_rows: usize) -> std::ops::Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        let start = self.row + self.col * parent_rows;
        let last = (self.row + self.n_rows - 1) + (self.col + self.n_cols - 1) * parent_rows;
        start..last + 1
    }

    /// Whether the window is one unbroken run of parent memory.
    fn is_contiguous_in(&self, parent_rows: usize) -> bool {
        self.n_cols <= 1 || self.n_rows == parent_rows
    }
}

/// A read-only rectangular window into a matrix.
#[derive(Debug, Clone, Copy)]
pub struct Subview<'a, T> {
    parent: MatRef<'a, T>,
    rect: Rect,
}

impl<'a, T: Element> Subview<'a, T> {
    pub fn new(parent: MatRef<'a, T>, rect: Rect) -> Result<Self> {
        rect.check_within(parent.shape(), "submatrix")?;
        Ok(Self { parent, rect })
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rect.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.rect.n_cols
    }

    #[inline]
    pub fn parent_shape(&self) -> Shape {
        self.parent.shape()
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        let pr = self.parent.n_rows();
        self.parent.as_slice()[(self.rect.row + row) + (self.rect.col + col) * pr]
    }

    /// Column `c` of the window as parent memory.
    pub fn col(&self, c: usize) -> &'a [T] {
        assert!(c < self.rect.n_cols, "column {c} out of range");
        let pr = self.parent.n_rows();
        let start = self.rect.row + (self.rect.col + c) * pr;
        &self.parent.as_slice()[start..start + self.rect.n_rows]
    }

    /// The window as one slice when it covers complete columns, a single
    /// column, or a single row of a single-row parent.
    pub fn as_contiguous(&self) -> Option<&'a [T]> {
        if !self.rect.is_contiguous_in(self.parent.n_rows()) {
            return None;
        }
        Some(&self.parent.as_slice()[self.rect.footprint(self.parent.n_rows())])
    }

    /// Address range spanned by the window inside its parent.
    pub fn buffer_id(&self) -> BufferId {
        BufferId::of_slice(&self.parent.as_slice()[self.rect.footprint(self.parent.n_rows())])
    }
}

impl<T: Element> Proxy for Subview<'_, T> {
    type Elem = T;

    const MODE: AccessMode = AccessMode::Linear;

    #[inline]
    fn shape(&self) -> Shape {
        self.rect.shape()
    }

    #[inline]
    fn at(&self, row: usize, col: usize, _slice: usize) -> T {
        Subview::at(self, row, col)
    }

    #[inline]
    fn get(&self, i: usize) -> T {
        let n = self.rect.n_rows;
        Subview::at(self, i % n, i / n)
    }

    #[inline]
    fn as_slice(&self) -> Option<&[T]> {
        self.as_contiguous()
    }

    #[inline]
    fn as_subview(&self) -> Option<Subview<'_, T>> {
        Some(*self)
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        self.buffer_id().overlaps(dest)
    }
}

/// A writable rectangular window into a matrix.
#[derive(Debug)]
pub struct SubviewMut<'a, T> {
    parent: MatMut<'a, T>,
    rect: Rect,
}

impl<'a, T: Element> SubviewMut<'a, T> {
    pub fn new(parent: MatMut<'a, T>, rect: Rect) -> Result<Self> {
        rect.check_within(Storage::shape(&parent), "submatrix")?;
        Ok(Self { parent, rect })
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.rect.shape()
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        (self.rect.row + row) + (self.rect.col + col) * self.parent.n_rows()
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.parent.as_slice()[self.offset(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let i = self.offset(row, col);
        self.parent.as_mut_slice()[i] = value;
    }

    pub fn col_mut(&mut self, c: usize) -> &mut [T] {
        assert!(c < self.rect.n_cols, "column {c} out of range");
        let start = self.offset(0, c);
        let n = self.rect.n_rows;
        &mut self.parent.as_mut_slice()[start..start + n]
    }

    pub fn fill(&mut self, value: T) {
        for c in 0..self.rect.n_cols {
            self.col_mut(c).fill(value);
        }
    }

    pub fn replace(&mut self, old: T, new: T) {
        for c in 0..self.rect.n_cols {
            for x in self.col_mut(c) {
                if replace_matches(*x, old) {
                    *x = new;
                }
            }
        }
    }

    /// Read-only view of the same window.
    pub fn as_view(&self) -> Subview<'_, T> {
        Subview {
            parent: self.parent.as_view(),
            rect: self.rect,
        }
    }

    pub fn buffer_id(&self) -> BufferId {
        let span = self.rect.footprint(self.parent.n_rows());
        BufferId::of_slice(&self.parent.as_slice()[span])
    }

    /// Evaluate `expr` into the window. The expression must have the
    /// window's extents; a window cannot be resized.
    pub fn assign<E: Proxy<Elem = T>>(&mut self, expr: E) -> Result<()> {
        expr.validate()?;
        let shape = expr.shape();
        if shape != self.rect.shape() {
            return Err(LinalgError::SizeMismatch {
                op: "copy into submatrix",
                left: self.rect.shape(),
                right: shape,
            });
        }
        if expr.is_alias(self.buffer_id()) {
            log::debug!("submatrix assignment aliases its source; using a temporary");
            let tmp = crate::proxy::materialize(&expr)?;
            let n = self.rect.n_rows;
            for c in 0..self.rect.n_cols {
                self.col_mut(c).copy_from_slice(&tmp[c * n..(c + 1) * n]);
            }
            return Ok(());
        }
        let acc = Accessor::new(&expr)?;
        for c in 0..self.rect.n_cols {
            for (r, dst) in self.col_mut(c).iter_mut().enumerate() {
                *dst = acc.at(r, c, 0);
            }
        }
        Ok(())
    }
}

impl<T: Element> Mat<T> {
    /// Copy the `src` window of this matrix onto its `dst` window.
    ///
    /// Overlapping windows are copied through a temporary; otherwise each
    /// column is moved in place.
    pub fn copy_submat(&mut self, src: Rect, dst: Rect) -> Result<()> {
        let parent = self.shape();
        src.check_within(parent, "copy into submatrix")?;
        dst.check_within(parent, "copy into submatrix")?;
        if src.shape() != dst.shape() {
            return Err(LinalgError::SizeMismatch {
                op: "copy into submatrix",
                left: dst.shape(),
                right: src.shape(),
            });
        }
        let pr = parent.n_rows;
        let n = src.n_rows;
        let data = self.as_mut_slice();
        if src.intersects(&dst) {
            log::debug!("copy_submat: source and destination overlap; using a temporary");
            let mut tmp = Vec::with_capacity(n * src.n_cols);
            for c in 0..src.n_cols {
                let s = src.row + (src.col + c) * pr;
                tmp.extend_from_slice(&data[s..s + n]);
            }
            for c in 0..dst.n_cols {
                let d = dst.row + (dst.col + c) * pr;
                data[d..d + n].copy_from_slice(&tmp[c * n..(c + 1) * n]);
            }
        } else {
            for c in 0..src.n_cols {
                let s = src.row + (src.col + c) * pr;
                let d = dst.row + (dst.col + c) * pr;
                data.copy_within(s..s + n, d);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprExt;

    fn sample() -> Mat<f64> {
        Mat::from_fn(4, 5, |r, c| (r + 10 * c) as f64)
    }

    #[test]
    fn test_rect_bounds() {
        let m = sample();
        assert!(m.submat(Rect::new(1, 1, 3, 4)).is_ok());
        let err = m.submat(Rect::new(2, 0, 3, 1)).unwrap_err();
        assert!(matches!(err, LinalgError::OutOfBounds { .. }));
        assert!(m.submat(Rect::new(usize::MAX, 0, 2, 1)).is_err());
    }

    #[test]
    fn test_linear_and_positional_reads_agree() {
        let m = sample();
        let sv = m.submat(Rect::new(1, 2, 2, 3)).unwrap();
        assert_eq!(Proxy::get(&sv, 0), 21.0);
        assert_eq!(Proxy::get(&sv, 3), 32.0);
        assert_eq!(sv.at(1, 2), 42.0);
        assert_eq!(sv.col(1), &[31.0, 32.0]);
        assert!(sv.as_contiguous().is_none());
    }

    #[test]
    fn test_contiguous_windows() {
        let m = sample();
        let cols = m.submat(Rect::new(0, 1, 4, 2)).unwrap();
        assert_eq!(cols.as_contiguous().unwrap(), &m.as_slice()[4..12]);
        let part = m.col_view(3).unwrap();
        assert_eq!(part.as_contiguous().unwrap().len(), 4);

        let row = Mat::from_fn(1, 6, |_, c| c as f64);
        let rv = row.submat(Rect::new(0, 2, 1, 3)).unwrap();
        assert_eq!(rv.as_contiguous().unwrap(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_subview_assign_shape_checked() {
        let mut m = sample();
        let src = Mat::from_elem(2, 2, 1.0);
        let mut w = m.submat_mut(Rect::new(0, 0, 3, 2)).unwrap();
        let err = w.assign(&src).unwrap_err();
        assert!(err.is_conformance());
        assert_eq!(m[(0, 0)], 0.0);

        let mut w = m.submat_mut(Rect::new(2, 3, 2, 2)).unwrap();
        w.assign(src.scaled(3.0)).unwrap();
        assert_eq!(m[(3, 4)], 3.0);
        assert_eq!(m[(1, 4)], 41.0);
    }

    #[test]
    fn test_subview_fill_and_replace() {
        let mut m = sample();
        {
            let mut w = m.submat_mut(Rect::new(1, 1, 2, 2)).unwrap();
            w.fill(f64::NAN);
            w.replace(f64::NAN, -1.0);
            w.set(0, 0, 5.0);
        }
        assert_eq!(m[(1, 1)], 5.0);
        assert_eq!(m[(2, 2)], -1.0);
        assert_eq!(m[(0, 1)], 10.0);
    }

    #[test]
    fn test_copy_submat_overlapping() {
        let mut m = sample();
        let expected = m.clone();
        m.copy_submat(Rect::new(0, 0, 3, 3), Rect::new(1, 1, 3, 3))
            .unwrap();
        for c in 0..3 {
            for r in 0..3 {
                assert_eq!(m[(r + 1, c + 1)], expected[(r, c)]);
            }
        }
        assert_eq!(m[(0, 0)], expected[(0, 0)]);
    }

    #[test]
    fn test_copy_submat_disjoint() {
        let mut m = sample();
        m.copy_submat(Rect::new(0, 0, 2, 2), Rect::new(2, 3, 2, 2))
            .unwrap();
        assert_eq!(m[(2, 3)], 0.0);
        assert_eq!(m[(3, 4)], 11.0);
        let err = m
            .copy_submat(Rect::new(0, 0, 2, 2), Rect::new(0, 0, 2, 3))
            .unwrap_err();
        assert!(err.is_conformance());
    }

    #[test]
    fn test_aliased_window_assignment() {
        let mut m = sample();
        let expected = m.clone();
        let p = m.as_mut_ptr();
        // A read-only wrap of the same memory as the destination window.
        let src = unsafe { MatRef::from_raw_parts(p as *const f64, 4, 5) };
        let src = src.submat(Rect::new(0, 0, 2, 2)).unwrap();
        let dst = unsafe { MatMut::from_raw_parts(p, 4, 5) };
        let mut dst = dst.into_submat(Rect::new(1, 1, 2, 2)).unwrap();
        dst.assign(src).unwrap();
        assert_eq!(m[(1, 1)], expected[(0, 0)]);
        assert_eq!(m[(2, 2)], expected[(1, 1)]);
    }
}
