use approx::assert_relative_eq;
use lazy_linalg::{
    abs, cdot, dot, dot3, dot_mixed, imag, inv_diag, matmul, norm_dot, replace, trans, Col, Cube,
    ExprExt, LinalgError, Mat, MatMut, MatRef, Rect, Row,
};
use num_complex::{Complex32, Complex64};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

fn random_mat(rng: &mut StdRng, rows: usize, cols: usize) -> Mat<f64> {
    Mat::from_fn(rows, cols, |_, _| rng.sample(StandardNormal))
}

fn random_cvec(rng: &mut StdRng, len: usize) -> Col<Complex64> {
    Col::from_fn(len, |_| {
        Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal))
    })
}

fn naive_dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn test_self_abs_through_raw_wraps() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut a = random_mat(&mut rng, 9, 7);
    let mut expected = Mat::new();
    expected.assign(abs(&a)).unwrap();

    let ptr = a.as_mut_ptr();
    // SAFETY: both wraps cover exactly the 9x7 buffer of `a`, which outlives them.
    unsafe {
        let src = MatRef::from_raw_parts(ptr as *const f64, 9, 7);
        let mut dst = MatMut::from_raw_parts(ptr, 9, 7);
        dst.assign(abs(src)).unwrap();
    }
    assert_eq!(a, expected);
}

#[test]
fn test_in_place_transpose_through_raw_wraps() {
    let mut a = Mat::from_fn(5, 5, |r, c| (r * 5 + c) as f64);
    let orig = a.clone();
    let ptr = a.as_mut_ptr();
    // SAFETY: both wraps cover exactly the 5x5 buffer of `a`, which outlives them.
    unsafe {
        let src = MatRef::from_raw_parts(ptr as *const f64, 5, 5);
        let mut dst = MatMut::from_raw_parts(ptr, 5, 5);
        dst.assign(trans(src)).unwrap();
    }
    for r in 0..5 {
        for c in 0..5 {
            assert_eq!(a[(r, c)], orig[(c, r)]);
        }
    }
}

#[test]
fn test_raw_wrap_cannot_resize() {
    let mut buf = vec![1.0f64; 6];
    let mut dst = MatMut::from_slice(&mut buf, 2, 3).unwrap();
    let other = Mat::<f64>::zeros(3, 3);
    let err = dst.assign(abs(&other)).unwrap_err();
    assert!(matches!(err, LinalgError::FixedSize { .. }));
    assert_eq!(buf, vec![1.0; 6]);
}

#[test]
fn test_dot_lengths_around_manual_threshold() {
    for n in [31usize, 32, 33, 64, 65] {
        let a: Vec<f64> = (0..n).map(|i| (i % 7) as f64 - 3.0).collect();
        let b: Vec<f64> = (0..n).map(|i| (i % 5) as f64 + 0.5).collect();
        let (ca, cb) = (Col::from_vec(a.clone()), Col::from_vec(b.clone()));
        assert_eq!(dot(&ca, &cb).unwrap(), naive_dot(&a, &b), "n = {n}");
    }
}

#[test]
fn test_dot_over_mixed_operand_kinds() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = random_mat(&mut rng, 12, 10);
    let b = random_mat(&mut rng, 10, 12);

    // Transposed matrix against a matrix of the same element count.
    let mut bt = Mat::new();
    bt.assign(trans(&b)).unwrap();
    let expected = naive_dot(a.as_slice(), bt.as_slice());
    assert_relative_eq!(dot(&a, b.t()).unwrap(), expected, epsilon = 1e-10);

    // Subview against an owned copy of the same block.
    let rect = Rect::new(2, 3, 6, 4);
    let sv = a.submat(rect).unwrap();
    let mut block = Mat::new();
    block.assign(sv).unwrap();
    assert_relative_eq!(
        dot(sv, &block).unwrap(),
        naive_dot(block.as_slice(), block.as_slice()),
        epsilon = 1e-10
    );

    // Scaled row against a column: partial unwrap path.
    let r = Row::from_fn(40, |i| i as f64 * 0.25);
    let c = Col::from_fn(40, |i| 1.0 - i as f64 * 0.1);
    let plain = dot(&r, &c).unwrap();
    assert_relative_eq!(dot(r.scaled(3.0), &c).unwrap(), 3.0 * plain, epsilon = 1e-10);

    // Product operand is materialized once.
    let p = matmul(&a, &b);
    let mut pm = Mat::new();
    pm.assign(&p).unwrap();
    assert_relative_eq!(
        dot(&p, &pm).unwrap(),
        naive_dot(pm.as_slice(), pm.as_slice()),
        epsilon = 1e-8
    );
}

#[test]
fn test_matmul_matches_naive_loops() {
    let mut rng = StdRng::seed_from_u64(42);
    let a = random_mat(&mut rng, 7, 11);
    let b = random_mat(&mut rng, 11, 5);
    let mut c = Mat::new();
    c.assign(matmul(&a, &b)).unwrap();
    for i in 0..7 {
        for j in 0..5 {
            let expected: f64 = (0..11).map(|p| a[(i, p)] * b[(p, j)]).sum();
            assert_relative_eq!(c[(i, j)], expected, epsilon = 1e-10);
        }
    }

    let err = c.assign(matmul(&a, &a)).unwrap_err();
    assert!(matches!(err, LinalgError::InnerDimMismatch { .. }));
    assert_eq!(c.shape().n_cols, 5);
}

#[test]
fn test_cdot_conjugates_first_operand() {
    let mut rng = StdRng::seed_from_u64(42);
    for n in [5usize, 32, 33, 100] {
        let a = random_cvec(&mut rng, n);
        let b = random_cvec(&mut rng, n);
        let expected = a
            .as_slice()
            .iter()
            .zip(b.as_slice())
            .fold(Complex64::new(0.0, 0.0), |acc, (x, y)| acc + x.conj() * y);
        let got = cdot(&a, &b).unwrap();
        assert_relative_eq!(got.re, expected.re, epsilon = 1e-10);
        assert_relative_eq!(got.im, expected.im, epsilon = 1e-10);
    }
}

#[test]
fn test_norm_dot_and_dot3() {
    let a = Col::from_vec(vec![3.0f64, 4.0]);
    let b = Col::from_vec(vec![6.0f64, 8.0]);
    assert_relative_eq!(norm_dot(&a, &b).unwrap(), 1.0, epsilon = 1e-12);
    assert_eq!(norm_dot(&a, &Col::zeros(2)).unwrap(), 0.0);

    let c = Col::from_vec(vec![2.0f64, -1.0]);
    assert_eq!(dot3(&a, &b, &c).unwrap(), 3.0 * 6.0 * 2.0 - 4.0 * 8.0);
    assert!(dot3(&a, &b, &Col::<f64>::zeros(3)).unwrap_err().is_conformance());
}

#[test]
fn test_dot_mixed_promotes() {
    let a = Col::from_vec(vec![1i32, 2, 3]);
    let b = Col::from_vec(vec![0.5f64, 0.25, 2.0]);
    assert_eq!(dot_mixed(&a, &b).unwrap(), 7.0);

    let z = Col::from_vec(vec![Complex32::new(0.0, 1.0), Complex32::new(1.0, 0.0)]);
    let f = Col::from_vec(vec![2.0f32, 3.0]);
    assert_eq!(dot_mixed(&f, &z).unwrap(), Complex32::new(3.0, 2.0));
}

#[test]
fn test_cube_element_wise() {
    let q = Cube::from_fn(3, 2, 4, |r, c, s| Complex64::new(r as f64 - 1.0, (c + s) as f64));
    let mut im = Cube::new();
    im.assign(imag(&q)).unwrap();
    assert_eq!(im.shape(), q.shape());
    assert_eq!(im.at(2, 1, 3), 4.0);

    let mut mag = Cube::new();
    mag.assign(abs(&q)).unwrap();
    assert_relative_eq!(mag.at(0, 0, 0), 1.0);

    let ints = Cube::from_fn(2, 2, 2, |r, c, s| (r + c + s) as i64);
    let mut out = Cube::new();
    out.assign(replace(&ints, 2, -1)).unwrap();
    assert_eq!(out.as_slice().iter().filter(|&&x| x == -1).count(), 3);
    assert_eq!(out.slice(1).unwrap().at(0, 0), 1);
}

#[test]
fn test_copy_submat_overlapping() {
    let mut a = Mat::from_fn(6, 6, |r, c| (r * 6 + c) as f64);
    let orig = a.clone();
    a.copy_submat(Rect::new(0, 0, 4, 4), Rect::new(1, 1, 4, 4))
        .unwrap();
    for r in 0..4 {
        for c in 0..4 {
            assert_eq!(a[(r + 1, c + 1)], orig[(r, c)]);
        }
    }
    assert_eq!(a[(0, 0)], orig[(0, 0)]);
}

#[test]
fn test_inv_diag_of_vector_expression() {
    let v = Col::from_vec(vec![-2.0f64, 4.0, 0.5]);
    let d = inv_diag(abs(&v)).unwrap();
    assert_eq!(d.shape().n_rows, 3);
    assert_eq!(d[(0, 0)], 0.5);
    assert_eq!(d[(1, 1)], 0.25);
    assert_eq!(d[(2, 2)], 2.0);
}

#[test]
fn test_integer_dot_wraps_on_overflow() {
    let a = Col::from_vec(vec![i32::MAX, 2]);
    let b = Col::from_vec(vec![2i32, 2]);
    assert_eq!(dot(&a, &b).unwrap(), i32::MAX.wrapping_mul(2).wrapping_add(4));

    let big = Col::from_vec(vec![u64::MAX; 40]);
    let ones = Col::from_vec(vec![1u64; 40]);
    assert_eq!(dot(&big, &ones).unwrap(), u64::MAX.wrapping_mul(40));
}
