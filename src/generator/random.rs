//! Small random draws shared by the pipeline stages.

use rand::Rng;

/// -1 or +1 with equal probability.
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    if rng.gen_bool(0.5) {
        1
    } else {
        -1
    }
}

/// -1, 0 or +1 with equal probability.
pub fn random_step<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.gen_range(-1..=1)
}

/// A -1/+1 draw biased by `skew` in `0..=12`.
///
/// A uniform draw in `0..12` yields +1 when it reaches `skew`, so skew 0 is
/// always +1, skew 12 always -1 and skew 6 unbiased.
pub fn skewed_sign<R: Rng + ?Sized>(rng: &mut R, skew: i32) -> i32 {
    if rng.gen_range(0..12) >= skew {
        1
    } else {
        -1
    }
}

/// True with probability `1 / n`. Never true for `n <= 1`.
pub fn one_in<R: Rng + ?Sized>(rng: &mut R, n: u32) -> bool {
    n > 1 && rng.gen_range(0..n) == 1
}
