//! Quorum rule
//!
//! With `n` validators, a proposal finalizes iff
//! `total >= ceil(2n/3)` and `yes > total / 2`, both at once.

/// `ceil(2n / 3)`.
pub fn quorum_size(n: usize) -> usize {
    (2 * n).div_ceil(3)
}

/// Whether a tally of `yes` approvals out of `total` votes finalizes.
pub fn is_finalizable(n: usize, yes: usize, total: usize) -> bool {
    total >= quorum_size(n) && yes > total / 2
}

/// Whether some sequence of the `n - total` outstanding votes could still
/// make the tally finalizable.
///
/// Extra approvals are the best case for both conditions, so it is enough
/// to try `k` more yes votes for every `k` up to the outstanding count.
pub fn can_still_finalize(n: usize, yes: usize, total: usize) -> bool {
    let outstanding = n.saturating_sub(total);
    (0..=outstanding).any(|k| is_finalizable(n, yes + k, total + k))
}
