//! Exact integer division rounded half to even

/// Round `value / divisor` to the nearest integer, ties to even
///
/// Matches `round()` with banker's rounding on the real quotient without going
/// through floating point, so results are exact for every `u32` input.
/// `divisor` must be non-zero; callers validate it first.
pub const fn div_round_half_even(value: u32, divisor: u32) -> u32 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    // Compare 2r against d in u64 so the doubling can't overflow
    let twice = remainder as u64 * 2;
    let divisor_wide = divisor as u64;

    if twice > divisor_wide || (twice == divisor_wide && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Round `value` to the nearest multiple of `base`, ties to even
pub const fn round_to_multiple(value: u32, base: u32) -> u32 {
    div_round_half_even(value, base).saturating_mul(base)
}
