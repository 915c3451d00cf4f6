//! Owning column and row vectors.

use crate::alias;
use crate::proxy::{AccessMode, Proxy};
use crate::storage::{BufferId, Shape, Storage};
use crate::{LinalgError, Result};
use lazy_linalg_traits::Element;

macro_rules! vector_type {
    ($name:ident, $doc:literal, $shape:expr, $is_row:expr, $is_col:expr, $accept:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name<T> {
            data: Vec<T>,
        }

        impl<T: Element> $name<T> {
            pub fn new() -> Self {
                Self { data: Vec::new() }
            }

            pub fn zeros(len: usize) -> Self {
                Self {
                    data: vec![T::zero(); len],
                }
            }

            pub fn from_vec(data: Vec<T>) -> Self {
                Self { data }
            }

            pub fn from_fn(len: usize, f: impl FnMut(usize) -> T) -> Self {
                Self {
                    data: (0..len).map(f).collect(),
                }
            }

            #[inline]
            pub fn len(&self) -> usize {
                self.data.len()
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.data.is_empty()
            }

            #[inline]
            pub fn at(&self, i: usize) -> T {
                self.data[i]
            }

            #[inline]
            pub fn as_slice(&self) -> &[T] {
                &self.data
            }

            #[inline]
            pub fn shape(&self) -> Shape {
                let shape: fn(usize) -> Shape = $shape;
                shape(self.data.len())
            }

            pub fn assign<E: Proxy<Elem = T>>(&mut self, expr: E) -> Result<()> {
                alias::assign(self, &expr)
            }

            pub fn into_vec(self) -> Vec<T> {
                self.data
            }
        }

        impl<T> std::ops::Index<usize> for $name<T> {
            type Output = T;

            #[inline]
            fn index(&self, i: usize) -> &T {
                &self.data[i]
            }
        }

        impl<T> std::ops::IndexMut<usize> for $name<T> {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut T {
                &mut self.data[i]
            }
        }

        impl<T: Element> Storage<T> for $name<T> {
            #[inline]
            fn shape(&self) -> Shape {
                $name::shape(self)
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
                let accept: fn(Shape) -> bool = $accept;
                if !accept(shape) {
                    return Err(LinalgError::Conformance {
                        op: concat!(stringify!($name), "::set_size"),
                        detail: format!("cannot hold a {shape} object"),
                    });
                }
                self.data.resize(shape.n_elem(), T::zero());
                Ok(())
            }

            fn take_buffer(&mut self, shape: Shape, data: Vec<T>) -> Result<()> {
                self.set_size(shape)?;
                self.data = data;
                Ok(())
            }
        }

        impl<T: Element> Proxy for $name<T> {
            type Elem = T;

            const MODE: AccessMode = AccessMode::Direct;
            const IS_ROW: bool = $is_row;
            const IS_COL: bool = $is_col;
            const FAST_UNWRAP: bool = true;

            #[inline]
            fn shape(&self) -> Shape {
                $name::shape(self)
            }

            #[inline]
            fn at(&self, row: usize, col: usize, _slice: usize) -> T {
                self.data[row + col]
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

        impl<T: Element> FromIterator<T> for $name<T> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                Self {
                    data: iter.into_iter().collect(),
                }
            }
        }
    };
}

// An empty vector keeps its orientation, so `0x0` is accepted as well.
vector_type!(
    Col,
    "An owning column vector (`n x 1`).",
    |n| Shape::mat(n, 1),
    false,
    true,
    |s| s.n_slices == 1 && (s.n_cols == 1 || s.n_elem() == 0)
);

vector_type!(
    Row,
    "An owning row vector (`1 x n`).",
    |n| Shape::mat(1, n),
    true,
    false,
    |s| s.n_slices == 1 && (s.n_rows == 1 || s.n_elem() == 0)
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{trans, Mat};

    #[test]
    fn test_orientation() {
        let c = Col::from_vec(vec![1.0f64, 2.0, 3.0]);
        let r: Row<f64> = (0..4).map(|i| i as f64).collect();
        assert_eq!(c.shape(), Shape::mat(3, 1));
        assert_eq!(r.shape(), Shape::mat(1, 4));
        assert!(<Col<f64> as Proxy>::IS_COL);
        assert!(<Row<f64> as Proxy>::IS_ROW);
    }

    #[test]
    fn test_assign_requires_vector_shape() {
        let m = Mat::from_fn(2, 2, |r, c| (r + c) as f64);
        let mut c = Col::<f64>::zeros(4);
        let err = c.assign(&m).unwrap_err();
        assert!(err.is_conformance());
        assert_eq!(c.len(), 4);

        let m = Mat::from_fn(3, 1, |r, _| r as f64);
        c.assign(&m).unwrap();
        assert_eq!(c.as_slice(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_row_from_transposed_col() {
        let c = Col::from_vec(vec![1.0f64, -2.0, 5.0]);
        let mut r = Row::new();
        r.assign(trans(&c)).unwrap();
        assert_eq!(r.as_slice(), &[1.0, -2.0, 5.0]);
        assert_eq!(r[2], 5.0);
    }
}
