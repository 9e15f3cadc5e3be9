//! # Matrix arithmetic
//!
//! Products are not computed when the `*` operator is applied. Instead, an `Expression` collects
//! the factors, which are either borrowed matrices or temporaries owned by the expression. Once
//! the expression is evaluated, the order of the multiplications is chosen to minimize the number
//! of scalar multiplications, and only the final result is handed out as a new `Matrix`.
use std::borrow::Cow;
use std::ops::{Add, Mul, Sub};

use itertools::izip;

use crate::data::linear_algebra::matrix::Matrix;
use crate::error::Error;

/// A factor in an expression.
///
/// Both variants can be inspected in the same way, but only the `Owned` variant is dropped
/// together with the expression.
#[derive(Debug)]
pub enum Operand<'a> {
    /// A matrix owned by the caller.
    Borrowed(&'a Matrix),
    /// A temporary, for example the result of an earlier computation.
    Owned(Matrix),
}

impl Operand<'_> {
    /// Number of rows and number of columns.
    pub fn dim(&self) -> (usize, usize) {
        self.matrix().dim()
    }

    /// Read a value.
    ///
    /// # Errors
    ///
    /// If `(row, column)` is out of range.
    pub fn get(&self, row: usize, column: usize) -> Result<f64, Error> {
        self.matrix().get(row, column)
    }

    fn matrix(&self) -> &Matrix {
        match self {
            Operand::Borrowed(matrix) => matrix,
            Operand::Owned(matrix) => matrix,
        }
    }
}

impl<'a> From<&'a Matrix> for Operand<'a> {
    fn from(matrix: &'a Matrix) -> Self {
        Operand::Borrowed(matrix)
    }
}

impl From<Matrix> for Operand<'_> {
    fn from(matrix: Matrix) -> Self {
        Operand::Owned(matrix)
    }
}

/// A chain of matrix products that has not been computed yet.
///
/// Contains at least one factor.
#[derive(Debug)]
pub struct Expression<'a> {
    factors: Vec<Operand<'a>>,
}

impl<'a> Expression<'a> {
    /// Start a product chain.
    pub fn new(first: impl Into<Operand<'a>>) -> Self {
        Self { factors: vec![first.into()] }
    }

    /// Multiply the chain from the right with another factor.
    #[must_use]
    pub fn times(mut self, factor: impl Into<Operand<'a>>) -> Self {
        self.factors.push(factor.into());
        self
    }

    /// Number of factors in the chain.
    pub fn nr_factors(&self) -> usize {
        self.factors.len()
    }

    /// Dimensions of the result of evaluating this expression.
    ///
    /// # Errors
    ///
    /// If two consecutive factors can't be multiplied.
    pub fn dim(&self) -> Result<(usize, usize), Error> {
        let dimensions = self.chain_dimensions()?;
        Ok((dimensions[0], dimensions[dimensions.len() - 1]))
    }

    /// Compute the product.
    ///
    /// # Errors
    ///
    /// If two consecutive factors can't be multiplied.
    pub fn evaluate(self) -> Result<Matrix, Error> {
        let dimensions = self.chain_dimensions()?;

        let mut factors = self.factors;
        if factors.len() == 1 {
            return Ok(match factors.swap_remove(0) {
                Operand::Borrowed(matrix) => matrix.clone(),
                Operand::Owned(matrix) => matrix,
            });
        }

        let split = chain_order(&dimensions);
        Ok(multiply_range(&factors, &split, 0, factors.len() - 1).into_owned())
    }

    /// Rows of the first factor followed by the columns of each factor.
    fn chain_dimensions(&self) -> Result<Vec<usize>, Error> {
        debug_assert!(!self.factors.is_empty());

        let mut dimensions = Vec::with_capacity(self.factors.len() + 1);
        dimensions.push(self.factors[0].dim().0);
        for window in self.factors.windows(2) {
            let (left, right) = (window[0].dim(), window[1].dim());
            if left.1 != right.0 {
                return Err(Error::Dimension { operation: "multiplication", left, right });
            }
        }
        dimensions.extend(self.factors.iter().map(|factor| factor.dim().1));

        Ok(dimensions)
    }
}

impl TryFrom<Expression<'_>> for Matrix {
    type Error = Error;

    fn try_from(expression: Expression<'_>) -> Result<Self, Self::Error> {
        expression.evaluate()
    }
}

/// For each sub chain `i..=j`, the index after which the chain is split into two products.
///
/// Classic dynamic program over the chain dimensions `d`, where factor `i` is `d[i] x d[i + 1]`.
fn chain_order(dimensions: &[usize]) -> Vec<Vec<usize>> {
    let k = dimensions.len() - 1;
    let mut cost = vec![vec![0_usize; k]; k];
    let mut split = vec![vec![0_usize; k]; k];

    for length in 2..=k {
        for i in 0..=(k - length) {
            let j = i + length - 1;
            cost[i][j] = usize::MAX;
            for s in i..j {
                let candidate = cost[i][s]
                    .saturating_add(cost[s + 1][j])
                    .saturating_add(dimensions[i].saturating_mul(dimensions[s + 1]).saturating_mul(dimensions[j + 1]));
                if candidate < cost[i][j] {
                    cost[i][j] = candidate;
                    split[i][j] = s;
                }
            }
        }
    }

    split
}

fn multiply_range<'b>(
    factors: &'b [Operand<'_>],
    split: &[Vec<usize>],
    i: usize,
    j: usize,
) -> Cow<'b, Matrix> {
    if i == j {
        Cow::Borrowed(factors[i].matrix())
    } else {
        let s = split[i][j];
        let left = multiply_range(factors, split, i, s);
        let right = multiply_range(factors, split, s + 1, j);
        Cow::Owned(product(&left, &right))
    }
}

/// Multiply two matrices with compatible dimensions.
pub(crate) fn product(left: &Matrix, right: &Matrix) -> Matrix {
    debug_assert_eq!(left.nr_columns(), right.nr_rows());

    let (m, n) = (left.nr_rows(), right.nr_columns());
    let mut values = vec![0_f64; m * n];
    for (i, row) in values.chunks_mut(n.max(1)).take(m).enumerate() {
        for (k, &factor) in left.row_slice(i).iter().enumerate() {
            if factor != 0_f64 {
                for (target, &value) in row.iter_mut().zip(right.row_slice(k)) {
                    *target += factor * value;
                }
            }
        }
    }

    Matrix::from_parts(m, n, values)
}

fn elementwise(
    left: &Matrix,
    right: &Matrix,
    operation: &'static str,
    combine: impl Fn(f64, f64) -> f64,
) -> Result<Matrix, Error> {
    if left.dim() != right.dim() {
        return Err(Error::Dimension { operation, left: left.dim(), right: right.dim() });
    }

    let values = izip!(left.values(), right.values())
        .map(|(&l, &r)| combine(l, r))
        .collect();
    Ok(Matrix::from_parts(left.nr_rows(), left.nr_columns(), values))
}

impl<'a> Mul<&'a Matrix> for &'a Matrix {
    type Output = Expression<'a>;

    fn mul(self, rhs: &'a Matrix) -> Self::Output {
        Expression::new(self).times(rhs)
    }
}

impl<'a> Mul<Matrix> for &'a Matrix {
    type Output = Expression<'a>;

    fn mul(self, rhs: Matrix) -> Self::Output {
        Expression::new(self).times(rhs)
    }
}

impl<'a> Mul<&'a Matrix> for Matrix {
    type Output = Expression<'a>;

    fn mul(self, rhs: &'a Matrix) -> Self::Output {
        Expression::new(self).times(rhs)
    }
}

impl Mul<Matrix> for Matrix {
    type Output = Expression<'static>;

    fn mul(self, rhs: Matrix) -> Self::Output {
        Expression::new(self).times(rhs)
    }
}

impl<'a> Mul<&'a Matrix> for Expression<'a> {
    type Output = Expression<'a>;

    fn mul(self, rhs: &'a Matrix) -> Self::Output {
        self.times(rhs)
    }
}

impl<'a> Mul<Matrix> for Expression<'a> {
    type Output = Expression<'a>;

    fn mul(self, rhs: Matrix) -> Self::Output {
        self.times(rhs)
    }
}

/// Two pending chains are folded into one, so the evaluation order can span both.
impl<'a> Mul<Expression<'a>> for Expression<'a> {
    type Output = Expression<'a>;

    fn mul(mut self, rhs: Expression<'a>) -> Self::Output {
        self.factors.extend(rhs.factors);
        self
    }
}

impl<'a> Mul<Expression<'a>> for &'a Matrix {
    type Output = Expression<'a>;

    fn mul(self, rhs: Expression<'a>) -> Self::Output {
        Expression::new(self) * rhs
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Self::Output {
        let values = self.values().iter().map(|&value| value * rhs).collect();
        Matrix::from_parts(self.nr_rows(), self.nr_columns(), values)
    }
}

impl Add<&Matrix> for &Matrix {
    type Output = Result<Matrix, Error>;

    fn add(self, rhs: &Matrix) -> Self::Output {
        elementwise(self, rhs, "addition", |l, r| l + r)
    }
}

impl Sub<&Matrix> for &Matrix {
    type Output = Result<Matrix, Error>;

    fn sub(self, rhs: &Matrix) -> Self::Output {
        elementwise(self, rhs, "subtraction", |l, r| l - r)
    }
}

impl Add<&Matrix> for Expression<'_> {
    type Output = Result<Matrix, Error>;

    fn add(self, rhs: &Matrix) -> Self::Output {
        &self.evaluate()? + rhs
    }
}

impl Sub<&Matrix> for Expression<'_> {
    type Output = Result<Matrix, Error>;

    fn sub(self, rhs: &Matrix) -> Self::Output {
        &self.evaluate()? - rhs
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::matrix::{Expression, Matrix, Operand};
    use crate::data::linear_algebra::matrix::expression::{chain_order, product};
    use crate::error::Error;

    fn a() -> Matrix {
        "1 2; 3 4; 5 6".parse().unwrap()
    }

    fn b() -> Matrix {
        "1 0 -1; 2 1 0".parse().unwrap()
    }

    #[test]
    fn multiply() {
        let (a, b) = (a(), b());
        let result = (&a * &b).evaluate().unwrap();
        assert_eq!(result, "5 2 -1; 11 4 -3; 17 6 -5".parse::<Matrix>().unwrap());

        // Operands are untouched
        assert_eq!(a, self::a());
        assert_eq!(b, self::b());
    }

    #[test]
    fn chain_matches_pairwise_products() {
        let (a, b) = (a(), b());
        let c: Matrix = "2; -1; 1".parse().unwrap();

        let expression = &a * &b * &c;
        assert_eq!(expression.nr_factors(), 3);
        assert_eq!(expression.dim(), Ok((3, 1)));

        let expected = product(&product(&a, &b), &c);
        assert_eq!(expression.evaluate().unwrap(), expected);

        let folded = (&a * &b) * (&c * Matrix::identity(1));
        assert_eq!(Matrix::try_from(folded).unwrap(), expected);
    }

    #[test]
    fn chain_order_minimizes_work() {
        // 10x100, 100x5, 5x50: (AB)C costs 7500, A(BC) costs 75000
        let split = chain_order(&[10, 100, 5, 50]);
        assert_eq!(split[0][2], 1);

        // 50x5, 5x100, 100x10: A(BC) costs 7500, (AB)C costs 75000
        let split = chain_order(&[50, 5, 100, 10]);
        assert_eq!(split[0][2], 0);
    }

    #[test]
    fn chain_order_large_dimensions() {
        // nxn, nx1, 1xn: A(BC) needs n^3 multiplications, which doesn't fit in a usize
        let n = 1 << 22;
        let split = chain_order(&[n, n, 1, n]);
        assert_eq!(split[0][2], 1);
        assert_eq!(split[0][1], 0);
    }

    #[test]
    fn dimension_mismatch() {
        let a = a();
        let result = (&a * &a).evaluate();
        assert_eq!(result, Err(Error::Dimension { operation: "multiplication", left: (3, 2), right: (3, 2) }));
        assert!((&a + &b()).is_err());
    }

    #[test]
    fn add_subtract_scale() {
        let a = a();
        let doubled = (&a + &a).unwrap();
        assert_eq!(doubled, &a * 2_f64);
        assert_eq!((&doubled - &a).unwrap(), a);

        let b = b();
        let sum = (&a * &b + &Matrix::identity(3)).unwrap();
        assert_eq!(sum, "6 2 -1; 11 5 -3; 17 6 -4".parse::<Matrix>().unwrap());
    }

    #[test]
    fn operands() {
        let a = a();
        let borrowed = Operand::from(&a);
        let owned = Operand::from(b());
        assert_eq!(borrowed.dim(), (3, 2));
        assert_eq!(owned.get(0, 2), Ok(-1_f64));

        let single = Expression::new(b()).evaluate().unwrap();
        assert_eq!(single, b());
    }
}
