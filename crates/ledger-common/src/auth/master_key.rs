//! Master-key verification
//!
//! The master key is a single static secret authorizing administrative
//! operations. Comparison must not leak how many leading bytes matched, so
//! equality is computed in constant time over the full input.

/// Compare a presented master key against the configured secret in constant
/// time. Length is folded into the accumulator rather than short-circuiting.
pub fn verify_master_key(presented: &str, expected: &str) -> bool {
    let presented = presented.as_bytes();
    let expected = expected.as_bytes();

    let mut diff = presented.len() ^ expected.len();
    for i in 0..expected.len() {
        // Index presented cyclically so the loop length only depends on the
        // secret, not on the caller-supplied value.
        let p = if presented.is_empty() {
            0
        } else {
            presented[i % presented.len()]
        };
        diff |= usize::from(p ^ expected[i]);
    }

    diff == 0
}
