//! ULP (unit in the last place) distance between float32 bit patterns
//!
//! Bit patterns are mapped onto a single ascending integer line that follows
//! IEEE-754 total order: negative floats below `-0`, `-0` directly below `+0`,
//! positive floats above. The distance is the gap between two keys, so `+0`
//! and `-0` are one step apart rather than equal.

/// Largest distance reported; wider gaps saturate here
pub const MAX_DISTANCE: u32 = i32::MAX as u32;

const SIGN_BIT: u32 = 0x8000_0000;

/// Total-order key for a float32 bit pattern
///
/// Non-negative patterns map to their magnitude, negative patterns to
/// `-(magnitude) - 1`. The result orders exactly like [`f32::total_cmp`].
#[inline]
#[must_use]
pub const fn ordered_key(bits: u32) -> i64 {
    let magnitude = (bits & !SIGN_BIT) as i64;
    if bits & SIGN_BIT == 0 {
        magnitude
    } else {
        -magnitude - 1
    }
}

/// Number of representable float32 steps between two bit patterns
///
/// Symmetric, zero only for identical patterns, and saturated at
/// [`MAX_DISTANCE`].
#[inline]
#[must_use]
pub const fn distance(a_bits: u32, b_bits: u32) -> u32 {
    let gap = (ordered_key(a_bits) - ordered_key(b_bits)).unsigned_abs();
    if gap > MAX_DISTANCE as u64 {
        MAX_DISTANCE
    } else {
        gap as u32
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn test_distance_identity(x in any::<u32>()) {
            prop_assert_eq!(distance(x, x), 0);
        }

        #[test]
        fn test_distance_symmetric(a in any::<u32>(), b in any::<u32>()) {
            prop_assert_eq!(distance(a, b), distance(b, a));
        }

        #[test]
        fn test_distance_zero_only_when_equal(a in any::<u32>(), b in any::<u32>()) {
            prop_assume!(a != b);
            prop_assert!(distance(a, b) > 0);
        }

        #[test]
        fn test_key_matches_total_cmp(a in any::<u32>(), b in any::<u32>()) {
            let by_key = ordered_key(a).cmp(&ordered_key(b));
            let by_float = f32::from_bits(a).total_cmp(&f32::from_bits(b));
            prop_assert_eq!(by_key, by_float);
        }

        #[test]
        fn test_distance_monotonic(x in any::<u32>(), y in any::<u32>(), z in any::<u32>()) {
            let mut sorted = [x, y, z];
            sorted.sort_by_key(|&bits| ordered_key(bits));
            let [lo, mid, hi] = sorted;
            prop_assert!(distance(lo, mid) <= distance(lo, hi));
            prop_assert!(distance(mid, hi) <= distance(lo, hi));
        }
    }
}
