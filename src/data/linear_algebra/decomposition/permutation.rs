//! # Permutations
//!
//! Row permutations produced by the pivoting during the decomposition.
use std::fmt;
use std::mem;

use itertools::Itertools;

use crate::data::linear_algebra::matrix::Matrix;

/// Basic permutation behavior.
///
/// Contains a few trivial implementations to avoid duplication.
pub trait Permutation {
    /// Apply the permutation to an index in the forward direction.
    ///
    /// What this direction actually is (w.r.t. the backward direction) depends on the implementor.
    ///
    /// # Arguments
    ///
    /// * `i`: Value in range `0..self.len()`.
    fn forward(&self, i: usize) -> usize;

    /// Apply the permutation to an index in the backward direction.
    ///
    /// # Arguments
    ///
    /// * `i`: Value in range `0..self.len()`.
    fn backward(&self, i: usize) -> usize;

    /// Size of the permutation.
    fn len(&self) -> usize;

    /// Whether the permutation acts on no indices at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect `values[self.forward(i)]` for each `i`.
    ///
    /// When the permutation maps a row position to the row it came from, this applies the
    /// permutation matrix to a column vector.
    fn gather(&self, values: &[f64]) -> Vec<f64> {
        debug_assert_eq!(values.len(), self.len());

        (0..self.len()).map(|i| values[self.forward(i)]).collect()
    }

    /// The permutation matrix `P` with `P[i][self.forward(i)] == 1`.
    fn matrix(&self) -> Matrix {
        let n = self.len();
        let mut values = vec![0_f64; n * n];
        for i in 0..n {
            values[i * n + self.forward(i)] = 1_f64;
        }

        Matrix::from_parts(n, n, values)
    }
}

/// Full permutation.
///
/// Both the entire forward and backward permutation is stored explicitly.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct FullPermutation {
    /// Index of the value is mapped to the value at the index.
    forward: Vec<usize>,
    /// Index of the value is mapped to the value at the index.
    backward: Vec<usize>,
}

impl FullPermutation {
    /// Create a new instance.
    ///
    /// Computes the inverse by sorting.
    pub fn new(forward: Vec<usize>) -> Self {
        let backward = forward.iter()
            .enumerate()
            .map(|(i, &j)| (j, i))
            .sorted_unstable_by_key(|&(j, _)| j)
            .map(|(_, i)| i)
            .collect();

        Self { forward, backward }
    }

    /// Create a new instance that maps an index onto itself.
    pub fn identity(n: usize) -> Self {
        Self {
            forward: (0..n).collect(),
            backward: (0..n).collect(),
        }
    }

    /// Invert the permutation, making the forward the backward direction and vice-versa.
    ///
    /// Done cheaply by swapping the backing arrays.
    pub fn invert(&mut self) {
        mem::swap(&mut self.forward, &mut self.backward);
    }

    /// Exchange the images of `i` and `j` in the forward direction.
    pub fn swap(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.len() && j < self.len());

        self.forward.swap(i, j);
        self.backward[self.forward[i]] = i;
        self.backward[self.forward[j]] = j;
    }

    /// The forward images, `forward[i] == self.forward(i)`.
    pub fn as_slice(&self) -> &[usize] {
        &self.forward
    }

    /// Whether an even number of transpositions composes this permutation.
    pub fn is_even(&self) -> bool {
        let mut visited = vec![false; self.len()];
        let mut nr_transpositions = 0;
        for start in 0..self.len() {
            let mut length = 0;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = self.forward[i];
                length += 1;
            }
            if length > 0 {
                nr_transpositions += length - 1;
            }
        }

        nr_transpositions % 2 == 0
    }
}

impl Permutation for FullPermutation {
    fn forward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        self.forward[i]
    }

    fn backward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        self.backward[i]
    }

    fn len(&self) -> usize {
        self.forward.len()
        // == self.backward.len()
    }
}

impl fmt::Display for FullPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.forward.iter().join(", "))
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::decomposition::permutation::{FullPermutation, Permutation};
    use crate::data::linear_algebra::matrix::Matrix;

    #[test]
    fn identity() {
        let permutation = FullPermutation::identity(4);
        assert_eq!(permutation.forward(1), 1);
        assert!(permutation.is_even());
        assert!(permutation.matrix().is_identity(0_f64));
    }

    #[test]
    fn forward_backward() {
        let permutation = FullPermutation::new(vec![3, 1, 2, 0]);
        assert_eq!(permutation.forward(1), 1);
        assert_eq!(permutation.forward(0), 3);
        assert_eq!(permutation.forward(3), 0);
        assert_eq!(permutation.backward(1), 1);
        assert_eq!(permutation.backward(0), 3);
        assert_eq!(permutation.backward(3), 0);

        let permutation = FullPermutation::new(vec![2, 0, 1]);
        assert_eq!(permutation.backward(2), 0);
        assert_eq!(permutation.backward(0), 1);
    }

    #[test]
    fn swap_and_invert() {
        let mut permutation = FullPermutation::identity(4);
        permutation.swap(0, 2);
        permutation.swap(2, 3);
        assert_eq!(permutation.as_slice(), &[2, 1, 3, 0]);
        assert_eq!((0..4).map(|i| permutation.backward(permutation.forward(i))).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(permutation.is_even());

        permutation.invert();
        assert_eq!(permutation.as_slice(), &[3, 1, 0, 2]);
        permutation.swap(0, 1);
        assert!(!permutation.is_even());
    }

    #[test]
    fn gather_and_matrix() {
        let permutation = FullPermutation::new(vec![2, 0, 1]);
        let values = [10_f64, 20_f64, 30_f64];
        assert_eq!(permutation.gather(&values), vec![30_f64, 10_f64, 20_f64]);

        let column = Matrix::column_vector(values.to_vec());
        let permuted = (&permutation.matrix() * &column).evaluate().unwrap();
        assert_eq!(permuted.values(), &[30_f64, 10_f64, 20_f64]);
        assert_eq!(permutation.to_string(), "(2, 0, 1)");
    }
}
