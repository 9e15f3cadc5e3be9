use approx::assert_abs_diff_eq;

use dense_lp::data::linear_algebra::decomposition::{PermutationFormat, PermutationRepresentation};
use dense_lp::data::linear_algebra::inverse::inverse_with_column;
use dense_lp::data::linear_algebra::matrix::Matrix;
use dense_lp::Error;

const TOLERANCE: f64 = 1e-9;

fn assert_close(left: &Matrix, right: &Matrix) {
    assert_eq!(left.dim(), right.dim());
    assert_abs_diff_eq!(left.values(), right.values(), epsilon = TOLERANCE);
}

#[test]
fn decomposition_reconstructs() {
    let a: Matrix = "2 1 1; 4 -6 0; -2 7 2".parse().unwrap();
    let (lower, upper, permutation) = a.get_lupp(PermutationFormat::Matrix);
    let PermutationRepresentation::Matrix(permutation) = permutation else {
        panic!("a matrix was requested");
    };

    let left = (&permutation * &a).evaluate().unwrap();
    let right = (&lower * &upper).evaluate().unwrap();
    assert_close(&left, &right);
    assert_abs_diff_eq!(a.determinant().unwrap(), -16f64, epsilon = TOLERANCE);
}

#[test]
fn inverse_and_solve_agree() {
    let a: Matrix = "4 3 2; 1 3 1; 2 1 3".parse().unwrap();
    let b: Matrix = "1; 2; 3".parse().unwrap();

    let x = a.solve(&b).unwrap();
    let via_inverse = (a.inverse().unwrap() * &b).evaluate().unwrap();
    assert_close(&x, &via_inverse);

    let check = (&a * &x).evaluate().unwrap();
    assert_close(&check, &b);

    let identity = (&a * a.inverse().unwrap()).evaluate().unwrap();
    assert!(identity.is_identity(TOLERANCE));
}

#[test]
fn column_update_matches_inverse() {
    let mut a: Matrix = "4 3 2; 1 3 1; 2 1 3".parse().unwrap();
    let old_inverse = a.inverse().unwrap().clone();
    let column: Matrix = "1 0 5".parse().unwrap();

    let updated = inverse_with_column(&old_inverse, &column, 1).unwrap();
    a.set_column(1, "1 0 5").unwrap();
    assert!(!a.inverse_valid());
    assert_close(&updated, a.inverse().unwrap());

    // Replacing a column by a multiple of another one makes the matrix singular
    assert_eq!(inverse_with_column(&old_inverse, &"4; 1; 2".parse().unwrap(), 1), Err(Error::SingularMatrix));
}

#[test]
fn singular() {
    let a: Matrix = "1 2; 2 4".parse().unwrap();
    assert_eq!(a.determinant(), Ok(0f64));
    assert_eq!(a.inverse(), Err(Error::SingularMatrix));
    assert_eq!(a.rank(), 1);
    assert!(!a.rows_linearly_independent());
    assert!(matches!(a.solve(&"1 1".parse().unwrap()), Err(Error::SingularMatrix)));
}

#[test]
fn cache_follows_mutation() {
    let mut a: Matrix = "1 2; 3 4".parse().unwrap();
    assert_abs_diff_eq!(a.determinant().unwrap(), -2f64, epsilon = TOLERANCE);
    assert!(a.determinant_valid());

    a.swap_rows(0, 1).unwrap();
    assert!(!a.determinant_valid());
    assert_abs_diff_eq!(a.determinant().unwrap(), 2f64, epsilon = TOLERANCE);

    a.transpose();
    a[(0, 0)] = 0f64;
    assert!(!a.lu_valid());
    // [[0, 1], [4, 2]]
    assert_abs_diff_eq!(a.determinant().unwrap(), -4f64, epsilon = TOLERANCE);
}
