//! Lucas sequence evaluation
//!
//! Each term is computed from the two base values, never from results held
//! by other workers, so any index can be evaluated in any order.

/// First term of the sequence
pub const L0: u64 = 2;

/// Second term of the sequence
pub const L1: u64 = 1;

/// Number of terms whose values fit in a `u64` (indices `0..=92`)
pub const MAX_TERMS: usize = 93;

/// Compute the Lucas number at `index`.
///
/// Runs in O(index) time and O(1) space. Callers must keep `index` below
/// [`MAX_TERMS`]; configuration validation guarantees this for a run.
pub fn evaluate(index: usize) -> u64 {
    match index {
        0 => L0,
        1 => L1,
        _ => {
            let (mut prev, mut current) = (L0, L1);
            for _ in 2..=index {
                let next = prev + current;
                prev = current;
                current = next;
            }
            current
        }
    }
}

/// Compute the first `terms` values sequentially.
///
/// Reference series used to check concurrent runs.
pub fn reference_series(terms: usize) -> Vec<u64> {
    let mut series = Vec::with_capacity(terms);
    for index in 0..terms {
        let value = match index {
            0 => L0,
            1 => L1,
            _ => series[index - 1] + series[index - 2],
        };
        series.push(value);
    }
    series
}
