//! Dense column-major matrices: the owning [`Mat`] and the no-copy wraps
//! [`MatRef`] / [`MatMut`].

use crate::alias;
use crate::proxy::{AccessMode, Proxy};
use crate::storage::{BufferId, Shape, Storage};
use crate::subview::{Rect, Subview, SubviewMut};
use crate::{LinalgError, Result};
use lazy_linalg_traits::Element;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// An owning dense matrix in column-major order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mat<T> {
    data: Vec<T>,
    n_rows: usize,
    n_cols: usize,
}

impl<T: Element> Mat<T> {
    /// An empty `0x0` matrix.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            n_rows: 0,
            n_cols: 0,
        }
    }

    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self::from_elem(n_rows, n_cols, T::zero())
    }

    pub fn from_elem(n_rows: usize, n_cols: usize, value: T) -> Self {
        Self {
            data: vec![value; n_rows * n_cols],
            n_rows,
            n_cols,
        }
    }

    /// Build from `f(row, col)`, evaluated in column-major order.
    pub fn from_fn(n_rows: usize, n_cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for c in 0..n_cols {
            for r in 0..n_rows {
                data.push(f(r, c));
            }
        }
        Self {
            data,
            n_rows,
            n_cols,
        }
    }

    /// Take ownership of a column-major buffer.
    pub fn from_col_major(n_rows: usize, n_cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(LinalgError::ElemCountMismatch {
                op: "Mat::from_col_major",
                left: n_rows * n_cols,
                right: data.len(),
            });
        }
        Ok(Self {
            data,
            n_rows,
            n_cols,
        })
    }

    pub fn eye(n: usize) -> Self {
        Self::from_fn(n, n, |r, c| if r == c { T::one() } else { T::zero() })
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn n_elem(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::mat(self.n_rows, self.n_cols)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        (row < self.n_rows && col < self.n_cols).then(|| self.data[row + col * self.n_rows])
    }

    pub fn view(&self) -> MatRef<'_, T> {
        MatRef::from(self)
    }

    pub fn view_mut(&mut self) -> MatMut<'_, T> {
        MatMut::from(self)
    }

    pub fn submat(&self, rect: Rect) -> Result<Subview<'_, T>> {
        self.view().submat(rect)
    }

    pub fn submat_mut(&mut self, rect: Rect) -> Result<SubviewMut<'_, T>> {
        self.view_mut().into_submat(rect)
    }

    pub fn col_view(&self, col: usize) -> Result<Subview<'_, T>> {
        self.submat(Rect::new(0, col, self.n_rows, 1))
    }

    pub fn row_view(&self, row: usize) -> Result<Subview<'_, T>> {
        self.submat(Rect::new(row, 0, 1, self.n_cols))
    }

    /// Evaluate `expr` into this matrix, resizing it to the expression's
    /// shape. A temporary is used when the expression reads this matrix's
    /// memory.
    pub fn assign<E: Proxy<Elem = T>>(&mut self, expr: E) -> Result<()> {
        alias::assign(self, &expr)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<(usize, usize)> for Mat<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.n_rows && col < self.n_cols, "index out of bounds");
        &self.data[row + col * self.n_rows]
    }
}

impl<T> IndexMut<(usize, usize)> for Mat<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.n_rows && col < self.n_cols, "index out of bounds");
        &mut self.data[row + col * self.n_rows]
    }
}

impl<T: Element> Storage<T> for Mat<T> {
    #[inline]
    fn shape(&self) -> Shape {
        Shape::mat(self.n_rows, self.n_cols)
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
        if shape.n_slices != 1 {
            return Err(LinalgError::Conformance {
                op: "Mat::set_size",
                detail: format!("cannot hold a {shape} object"),
            });
        }
        self.data.resize(shape.n_elem(), T::zero());
        self.n_rows = shape.n_rows;
        self.n_cols = shape.n_cols;
        Ok(())
    }

    fn take_buffer(&mut self, shape: Shape, data: Vec<T>) -> Result<()> {
        debug_assert_eq!(shape.n_elem(), data.len());
        if shape.n_slices != 1 {
            return self.set_size(shape);
        }
        self.data = data;
        self.n_rows = shape.n_rows;
        self.n_cols = shape.n_cols;
        Ok(())
    }
}

impl<T: Element> Proxy for Mat<T> {
    type Elem = T;

    const MODE: AccessMode = AccessMode::Direct;
    const FAST_UNWRAP: bool = true;

    #[inline]
    fn shape(&self) -> Shape {
        Shape::mat(self.n_rows, self.n_cols)
    }

    #[inline]
    fn at(&self, row: usize, col: usize, _slice: usize) -> T {
        self.data[row + col * self.n_rows]
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

/// A read-only matrix over memory owned elsewhere.
///
/// Built from a slice (`MatRef::from_slice`) or, for memory that may also be
/// written through another handle, from a raw pointer. Reads go through the
/// pointer each time, so a destination wrapping the same memory is detected
/// by [`assign`](crate::assign) and evaluated through a temporary.
pub struct MatRef<'a, T> {
    ptr: *const T,
    n_rows: usize,
    n_cols: usize,
    _marker: PhantomData<&'a T>,
}

unsafe impl<T: Sync> Send for MatRef<'_, T> {}
unsafe impl<T: Sync> Sync for MatRef<'_, T> {}

impl<T> Clone for MatRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatRef<'_, T> {}

impl<T> std::fmt::Debug for MatRef<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatRef")
            .field("n_rows", &self.n_rows)
            .field("n_cols", &self.n_cols)
            .finish()
    }
}

impl<'a, T: Element> MatRef<'a, T> {
    pub fn from_slice(data: &'a [T], n_rows: usize, n_cols: usize) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(LinalgError::ElemCountMismatch {
                op: "MatRef::from_slice",
                left: n_rows * n_cols,
                right: data.len(),
            });
        }
        Ok(Self {
            ptr: data.as_ptr(),
            n_rows,
            n_cols,
            _marker: PhantomData,
        })
    }

    /// Wrap `n_rows * n_cols` elements at `ptr` without copying.
    ///
    /// # Safety
    /// The memory must be valid for reads for `'a`, and must not be written
    /// while any slice obtained from this view is alive. Writing it through a
    /// [`MatMut`] that is the destination of an assignment reading this view
    /// is allowed; aliasing is detected and routed through a temporary.
    pub unsafe fn from_raw_parts(ptr: *const T, n_rows: usize, n_cols: usize) -> Self {
        Self {
            ptr,
            n_rows,
            n_cols,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::mat(self.n_rows, self.n_cols)
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        // SAFETY: guaranteed by the constructors.
        unsafe { std::slice::from_raw_parts(self.ptr, self.n_rows * self.n_cols) }
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.as_slice()[row + col * self.n_rows]
    }

    #[inline]
    pub fn buffer_id(&self) -> BufferId {
        BufferId::from_raw(self.ptr, self.n_rows * self.n_cols)
    }

    pub fn submat(self, rect: Rect) -> Result<Subview<'a, T>> {
        Subview::new(self, rect)
    }
}

impl<'a, T: Element> From<&'a Mat<T>> for MatRef<'a, T> {
    fn from(m: &'a Mat<T>) -> Self {
        Self {
            ptr: m.data.as_ptr(),
            n_rows: m.n_rows,
            n_cols: m.n_cols,
            _marker: PhantomData,
        }
    }
}

impl<T: Element> Proxy for MatRef<'_, T> {
    type Elem = T;

    const MODE: AccessMode = AccessMode::Direct;
    const FAST_UNWRAP: bool = true;

    #[inline]
    fn shape(&self) -> Shape {
        Shape::mat(self.n_rows, self.n_cols)
    }

    #[inline]
    fn at(&self, row: usize, col: usize, _slice: usize) -> T {
        MatRef::at(self, row, col)
    }

    #[inline]
    fn get(&self, i: usize) -> T {
        MatRef::as_slice(self)[i]
    }

    #[inline]
    fn as_slice(&self) -> Option<&[T]> {
        Some(MatRef::as_slice(self))
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        self.buffer_id().overlaps(dest)
    }
}

/// A writable matrix over memory owned elsewhere. Its extents are fixed.
pub struct MatMut<'a, T> {
    ptr: *mut T,
    n_rows: usize,
    n_cols: usize,
    _marker: PhantomData<&'a mut T>,
}

unsafe impl<T: Send> Send for MatMut<'_, T> {}
unsafe impl<T: Sync> Sync for MatMut<'_, T> {}

impl<T> std::fmt::Debug for MatMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatMut")
            .field("n_rows", &self.n_rows)
            .field("n_cols", &self.n_cols)
            .finish()
    }
}

impl<'a, T: Element> MatMut<'a, T> {
    pub fn from_slice(data: &'a mut [T], n_rows: usize, n_cols: usize) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(LinalgError::ElemCountMismatch {
                op: "MatMut::from_slice",
                left: n_rows * n_cols,
                right: data.len(),
            });
        }
        Ok(Self {
            ptr: data.as_mut_ptr(),
            n_rows,
            n_cols,
            _marker: PhantomData,
        })
    }

    /// Wrap `n_rows * n_cols` elements at `ptr` for writing without copying.
    ///
    /// # Safety
    /// The memory must be valid for reads and writes for `'a`. Other handles
    /// to it may exist only as [`MatRef`]s (or views of them) that are read
    /// exclusively through assignments to this wrap.
    pub unsafe fn from_raw_parts(ptr: *mut T, n_rows: usize, n_cols: usize) -> Self {
        Self {
            ptr,
            n_rows,
            n_cols,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Read-only view of the same memory for the duration of the borrow.
    pub fn as_view(&self) -> MatRef<'_, T> {
        MatRef {
            ptr: self.ptr,
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            _marker: PhantomData,
        }
    }

    pub fn into_submat(self, rect: Rect) -> Result<SubviewMut<'a, T>> {
        SubviewMut::new(self, rect)
    }

    pub fn submat_mut(&mut self, rect: Rect) -> Result<SubviewMut<'_, T>> {
        let reborrow = MatMut {
            ptr: self.ptr,
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            _marker: PhantomData,
        };
        SubviewMut::new(reborrow, rect)
    }

    pub fn assign<E: Proxy<Elem = T>>(&mut self, expr: E) -> Result<()> {
        alias::assign(self, &expr)
    }

    pub(crate) fn into_slice(self) -> &'a mut [T] {
        // SAFETY: guaranteed by the constructors.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.n_rows * self.n_cols) }
    }
}

impl<'a, T: Element> From<&'a mut Mat<T>> for MatMut<'a, T> {
    fn from(m: &'a mut Mat<T>) -> Self {
        Self {
            ptr: m.data.as_mut_ptr(),
            n_rows: m.n_rows,
            n_cols: m.n_cols,
            _marker: PhantomData,
        }
    }
}

impl<T: Element> Storage<T> for MatMut<'_, T> {
    #[inline]
    fn shape(&self) -> Shape {
        Shape::mat(self.n_rows, self.n_cols)
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        // SAFETY: guaranteed by the constructors.
        unsafe { std::slice::from_raw_parts(self.ptr, self.n_rows * self.n_cols) }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: guaranteed by the constructors.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.n_rows * self.n_cols) }
    }

    fn set_size(&mut self, shape: Shape) -> Result<()> {
        alias::check_fixed(Storage::shape(self), shape, "MatMut::set_size")
    }
}
