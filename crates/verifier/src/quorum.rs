//! BFT supermajority rule.

/// True if `confirmed > total * 2 / 3`, compared exactly as `3 * confirmed > 2 * total`.
pub fn has_quorum(confirmed: usize, total: usize) -> bool {
    (confirmed as u128) * 3 > (total as u128) * 2
}

/// Smallest number of distinct confirmations that satisfies [`has_quorum`].
pub fn quorum_size(total: usize) -> usize {
    ((total as u128) * 2 / 3 + 1) as usize
}
