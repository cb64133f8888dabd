//! Index arithmetic over a cyclic vertex array
//!
//! Rings are handled as their distinct vertices (closing repeat dropped), so
//! index `0` and index `n - 1` are neighbours. All helpers take the array
//! length `n` and expect `n > 0` and `i < n`.

/// Index of the vertex before `i`
pub fn prev(i: usize, n: usize) -> usize {
    (i + n - 1) % n
}

/// Index of the vertex after `i`
pub fn next(i: usize, n: usize) -> usize {
    (i + 1) % n
}

/// Whether two distinct indices are neighbours on the cycle
pub fn are_adjacent(a: usize, b: usize, n: usize) -> bool {
    a != b && (next(a, n) == b || next(b, n) == a)
}
