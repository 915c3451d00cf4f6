//! Owning three-dimensional container: `n_slices` column-major matrices
//! stored back to back.

use crate::alias;
use crate::mat::MatRef;
use crate::proxy::{AccessMode, Proxy};
use crate::storage::{BufferId, Shape, Storage};
use crate::{LinalgError, Result};
use lazy_linalg_traits::Element;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cube<T> {
    data: Vec<T>,
    n_rows: usize,
    n_cols: usize,
    n_slices: usize,
}

impl<T: Element> Cube<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            n_rows: 0,
            n_cols: 0,
            n_slices: 0,
        }
    }

    pub fn zeros(n_rows: usize, n_cols: usize, n_slices: usize) -> Self {
        Self {
            data: vec![T::zero(); n_rows * n_cols * n_slices],
            n_rows,
            n_cols,
            n_slices,
        }
    }

    /// Build from `f(row, col, slice)`, evaluated in storage order.
    pub fn from_fn(
        n_rows: usize,
        n_cols: usize,
        n_slices: usize,
        mut f: impl FnMut(usize, usize, usize) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(n_rows * n_cols * n_slices);
        for s in 0..n_slices {
            for c in 0..n_cols {
                for r in 0..n_rows {
                    data.push(f(r, c, s));
                }
            }
        }
        Self {
            data,
            n_rows,
            n_cols,
            n_slices,
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::cube(self.n_rows, self.n_cols, self.n_slices)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize, slice: usize) -> usize {
        row + col * self.n_rows + slice * self.n_rows * self.n_cols
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize, slice: usize) -> T {
        self.data[self.offset(row, col, slice)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, slice: usize, value: T) {
        let i = self.offset(row, col, slice);
        self.data[i] = value;
    }

    /// Slice `s` as a matrix view.
    pub fn slice(&self, s: usize) -> Result<MatRef<'_, T>> {
        if s >= self.n_slices {
            return Err(LinalgError::OutOfBounds {
                op: "Cube::slice",
                detail: format!("slice {s} of a {} cube", self.shape()),
            });
        }
        let len = self.n_rows * self.n_cols;
        MatRef::from_slice(&self.data[s * len..(s + 1) * len], self.n_rows, self.n_cols)
    }

    pub fn assign<E: Proxy<Elem = T>>(&mut self, expr: E) -> Result<()> {
        alias::assign(self, &expr)
    }
}

impl<T: Element> Storage<T> for Cube<T> {
    #[inline]
    fn shape(&self) -> Shape {
        Cube::shape(self)
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn set_size(&mut self, shape: Shape) -> Result<()> {
        self.data.resize(shape.n_elem(), T::zero());
        self.n_rows = shape.n_rows;
        self.n_cols = shape.n_cols;
        self.n_slices = shape.n_slices;
        Ok(())
    }

    fn take_buffer(&mut self, shape: Shape, data: Vec<T>) -> Result<()> {
        self.data = data;
        self.n_rows = shape.n_rows;
        self.n_cols = shape.n_cols;
        self.n_slices = shape.n_slices;
        Ok(())
    }
}

impl<T: Element> Proxy for Cube<T> {
    type Elem = T;

    const MODE: AccessMode = AccessMode::Direct;
    const FAST_UNWRAP: bool = true;

    #[inline]
    fn shape(&self) -> Shape {
        Cube::shape(self)
    }

    #[inline]
    fn at(&self, row: usize, col: usize, slice: usize) -> T {
        Cube::at(self, row, col, slice)
    }

    #[inline]
    fn get(&self, i: usize) -> T {
        self.data[i]
    }

    #[inline]
    fn as_slice(&self) -> Option<&[T]> {
        Some(&self.data)
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        BufferId::of_slice(&self.data).overlaps(dest)
    }
}
