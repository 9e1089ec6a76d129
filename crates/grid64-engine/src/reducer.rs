//! Aggregate reductions over grid cells.

/// Sum of `cells` with IEEE-754 addition, folding left from `0.0`.
///
/// Any NaN in the input propagates to the result. Order is row-major, so
/// the result is reproducible bit-for-bit for the same cells.
pub fn sum(cells: &[f64]) -> f64 {
    cells.iter().fold(0.0, |acc, &v| acc + v)
}
