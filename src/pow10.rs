//! Powers of ten indexed by the exponent byte of a word.
//!
//! Index `i` in `0..=127` holds `10^i`; index `i` in `128..=255` stands for the
//! negative exponent `i - 256`. The float table stores the reciprocal there,
//! the integer table the plain power of the magnitude (`10^(256 - i)`), which is
//! what a coefficient gets divided by.
//!
//! Integer powers above `10^18` do not fit an `i64` and saturate at `i64::MAX`.

/// Largest power of ten representable in an `i64`.
pub const MAX_I64_POWER: u32 = 18;

pub(crate) static POW10_F64: [f64; 256] = build_f64_table();
pub(crate) static POW10_I64: [i64; 256] = build_i64_table();

const fn build_f64_table() -> [f64; 256] {
    let mut table = [0.0f64; 256];
    let mut power = 1.0f64;
    let mut k = 0;
    while k <= 128 {
        if k < 128 {
            table[k] = power;
        }
        if k > 0 {
            table[256 - k] = 1.0 / power;
        }
        power *= 10.0;
        k += 1;
    }
    table
}

const fn build_i64_table() -> [i64; 256] {
    let mut table = [i64::MAX; 256];
    let mut power = 1i64;
    let mut k = 0;
    while k <= MAX_I64_POWER as usize {
        table[k] = power;
        if k > 0 {
            table[256 - k] = power;
        }
        if k < MAX_I64_POWER as usize {
            power *= 10;
        }
        k += 1;
    }
    table
}

/// `10^exponent` as a float.
#[inline(always)]
pub fn pow10_f64(exponent: i8) -> f64 {
    POW10_F64[exponent as u8 as usize]
}

/// `10^|exponent|` as an integer, saturating at `i64::MAX`.
#[inline(always)]
pub fn pow10_i64(exponent: i8) -> i64 {
    POW10_I64[exponent as u8 as usize]
}

/// `10^magnitude`, saturating at `i64::MAX` past `10^18`.
#[inline(always)]
pub(crate) fn int_pow10(magnitude: u32) -> i64 {
    if magnitude > MAX_I64_POWER {
        i64::MAX
    } else {
        POW10_I64[magnitude as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_half() {
        assert_eq!(pow10_i64(0), 1);
        assert_eq!(pow10_i64(3), 1_000);
        assert_eq!(pow10_i64(18), 1_000_000_000_000_000_000);
        assert_eq!(pow10_f64(0), 1.0);
        assert_eq!(pow10_f64(2), 100.0);
        assert_eq!(pow10_f64(22), 1e22);
    }

    #[test]
    fn test_negative_half() {
        assert_eq!(pow10_i64(-1), 10);
        assert_eq!(pow10_i64(-8), 100_000_000);
        assert_eq!(pow10_f64(-1), 0.1);
        assert_eq!(pow10_f64(-3), 1.0 / 1_000.0);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(pow10_i64(19), i64::MAX);
        assert_eq!(pow10_i64(127), i64::MAX);
        assert_eq!(pow10_i64(-19), i64::MAX);
        assert_eq!(pow10_i64(-128), i64::MAX);
        assert_eq!(int_pow10(18), 1_000_000_000_000_000_000);
        assert_eq!(int_pow10(19), i64::MAX);
        assert_eq!(int_pow10(500), i64::MAX);
    }

    #[test]
    fn test_extremes_are_finite() {
        assert!(pow10_f64(127).is_finite());
        assert!(pow10_f64(-128) > 0.0);
        assert!((pow10_f64(127) / 1e127 - 1.0).abs() < 1e-12);
    }
}
