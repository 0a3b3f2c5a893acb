//! Pareto dominance under minimization.
//!
//! Both functions expect vectors of the same dimension.

use std::cmp::Ordering;

/// Returns true if `a` dominates `b`: no objective of `a` is larger than the
/// corresponding objective of `b`, and at least one is strictly smaller.
///
/// The relation is irreflexive, so a vector never dominates itself or an
/// equal vector. Any comparison involving NaN fails both tests.
///
/// ```
/// use femo::selection::dominates;
///
/// assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
/// assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
/// assert!(!dominates(&[1.0, 4.0], &[2.0, 3.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y) {
            Some(Ordering::Less) => strictly_better = true,
            Some(Ordering::Equal) => {}
            _ => return false,
        }
    }
    strictly_better
}

/// Returns true if all objective values of `a` and `b` are identical.
pub fn is_equal(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).all(|(x, y)| x == y)
}
