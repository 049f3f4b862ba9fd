use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::Dec64;
use crate::pow10::int_pow10;

// ============================================================================
// Comparison
// ============================================================================

impl Dec64 {
    /// Value equality. A sentinel on either side matches anything.
    ///
    /// Otherwise two words are equal when their encodings match or their
    /// normalized encodings match, so `10 × 10^0` equals `1 × 10^1`.
    pub const fn equal(self, other: Self) -> bool {
        if self.is_sentinel() || other.is_sentinel() {
            return true;
        }
        self.to_raw() == other.to_raw() || self.normalize().to_raw() == other.normalize().to_raw()
    }
}

// ============================================================================
// Addition
// ============================================================================

/// Sums two coefficients sharing `exponent`, dropping trailing digits while
/// the sum does not fit the coefficient.
fn sum_aligned(a: i64, b: i64, mut exponent: i32) -> Dec64 {
    let mut sum = a as i128 + b as i128;
    let bound = Dec64::MAX_COEFFICIENT as i128;
    while sum > bound || sum < -bound {
        sum /= 10;
        exponent += 1;
    }
    // |sum| <= MAX_COEFFICIENT here
    Dec64::from_parts(sum as i64, exponent)
}

fn add(a: Dec64, b: Dec64) -> Dec64 {
    if a.exponent() == b.exponent() {
        return sum_aligned(a.coefficient(), b.coefficient(), a.exponent() as i32);
    }

    let (na, nb) = (a.normalize(), b.normalize());
    if na.exponent() == nb.exponent() {
        return sum_aligned(na.coefficient(), nb.coefficient(), na.exponent() as i32);
    }

    // `high` has the larger exponent; its coefficient has room to grow
    let (high_word, high, low) = if na.exponent() > nb.exponent() {
        (a, na, nb)
    } else {
        (b, nb, na)
    };

    let mut high_coefficient = high.coefficient();
    let mut high_exponent = high.exponent() as i32;
    let low_exponent = low.exponent() as i32;
    while high_exponent > low_exponent {
        match high_coefficient.checked_mul(10) {
            Some(scaled) => {
                high_coefficient = scaled;
                high_exponent -= 1;
            }
            None => break,
        }
    }

    let gap = (high_exponent - low_exponent) as u32;
    if gap >= 128 {
        // `low` is far below the precision of `high`
        return high_word;
    }
    let low_coefficient = low.coefficient() / int_pow10(gap);
    sum_aligned(high_coefficient, low_coefficient, high_exponent)
}

// ============================================================================
// Multiplication and Division
// ============================================================================

impl Dec64 {
    /// Multiplies the coefficient by an integer, keeping the exponent.
    ///
    /// Meant for exact unit scaling (hours to seconds, lots to units). The
    /// caller keeps the product inside the 56-bit coefficient; overflowing
    /// bits are lost.
    #[inline(always)]
    pub const fn mul_i64(self, rhs: i64) -> Self {
        Self::new(self.coefficient().wrapping_mul(rhs), self.exponent())
    }

    /// Checked integer scaling. Returns `None` if the coefficient would not
    /// fit 56 bits.
    pub const fn checked_mul_i64(self, rhs: i64) -> Option<Self> {
        match self.coefficient().checked_mul(rhs) {
            Some(coefficient) if Self::fits_coefficient(coefficient) => {
                Some(Self::new(coefficient, self.exponent()))
            }
            _ => None,
        }
    }

    /// Checked multiplication. Operands are normalized first so that trailing
    /// zeros do not eat coefficient room.
    ///
    /// Returns `None` if the coefficient product does not fit 56 bits or the
    /// exponent sum leaves `-127..=127`.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let (a, b) = (self.normalize(), rhs.normalize());
        let coefficient = a
            .coefficient()
            .checked_mul(b.coefficient())
            .filter(|c| Self::fits_coefficient(*c))?;
        if coefficient == 0 {
            return Some(Self::ZERO);
        }
        let exponent = a.exponent() as i32 + b.exponent() as i32;
        if exponent < Self::MIN_EXPONENT as i32 || exponent > Self::MAX_EXPONENT as i32 {
            return None;
        }
        Some(Self::new(coefficient, exponent as i8))
    }
}

/// Coefficient product and exponent sum, both wrapping.
fn mul(a: Dec64, b: Dec64) -> Dec64 {
    Dec64::new(
        a.coefficient().wrapping_mul(b.coefficient()),
        a.exponent().wrapping_add(b.exponent()),
    )
}

/// Float quotient brought back through its shortest decimal text.
fn div(a: Dec64, b: Dec64) -> Dec64 {
    let quotient = a.to_f64() / b.to_f64();
    match Dec64::from_f64(quotient) {
        Ok(d) => d,
        Err(err) => {
            tracing::debug!(%err, dividend = %a, divisor = %b, "dec64 quotient not representable");
            Dec64::NOT_AVAILABLE
        }
    }
}

// ============================================================================
// Rounding
// ============================================================================

impl Dec64 {
    /// Rounds to a multiple of `10^exponent`, half away from zero.
    ///
    /// `round(2)` rounds to hundreds, `round(0)` to units, `round(-3)` to
    /// thousandths. A value already coarser than `10^exponent` is only
    /// normalized.
    pub fn round(self, exponent: i32) -> Self {
        let normalized = self.normalize();
        let mut coefficient = normalized.coefficient();
        if coefficient == 0 {
            return Self::ZERO;
        }
        let mut current = normalized.exponent() as i32;
        while current < exponent {
            let dropped = coefficient % 10;
            coefficient /= 10;
            current += 1;
            if current == exponent && dropped.abs() >= 5 {
                coefficient += dropped.signum();
            }
            if coefficient == 0 {
                return Self::ZERO;
            }
        }
        Self::from_parts(coefficient, current)
    }
}

// ============================================================================
// Operator Traits
// ============================================================================

impl Neg for Dec64 {
    type Output = Self;

    /// Negates the coefficient. The most negative coefficient has no positive
    /// counterpart and maps to itself.
    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self::new(self.coefficient().wrapping_neg(), self.exponent())
    }
}

impl Add for Dec64 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        add(self, rhs)
    }
}

impl Sub for Dec64 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        add(self, -rhs)
    }
}

impl Mul for Dec64 {
    type Output = Self;

    /// Multiplies coefficients and adds exponents with no overflow handling.
    /// Use [`Dec64::checked_mul`] when the operands may be large.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        mul(self, rhs)
    }
}

impl Div for Dec64 {
    type Output = Self;

    /// Approximate: computed in `f64`. Yields [`Dec64::NOT_AVAILABLE`] when
    /// the quotient is not finite or out of range, e.g. on division by zero.
    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        div(self, rhs)
    }
}

impl AddAssign for Dec64 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Dec64 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Dec64 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Dec64 {
    #[inline(always)]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

// ============================================================================
// Iterator Trait Implementations
// ============================================================================

impl Sum for Dec64 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Dec64> for Dec64 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl Product for Dec64 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a Dec64> for Dec64 {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * *x)
    }
}




#[cfg(test)]
mod property_tests {
    use std::string::ToString;

    use super::*;
    use proptest::prelude::*;

    fn word() -> impl Strategy<Value = Dec64> {
        (Dec64::MIN_COEFFICIENT + 1..=Dec64::MAX_COEFFICIENT, -127i8..=127i8)
            .prop_map(|(c, e)| Dec64::new(c, e))
    }

    fn price() -> impl Strategy<Value = Dec64> {
        (-100_000_000i64..100_000_000i64, -8i8..=0i8).prop_map(|(c, e)| Dec64::new(c, e))
    }

    /// `c × 10^(e - base)` as an exact integer.
    fn scaled(c: i64, e: i32, base: i32) -> i128 {
        c as i128 * 10i128.pow((e - base) as u32)
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(d in word()) {
            let once = d.normalize();
            prop_assert_eq!(once.normalize(), once);
            prop_assert!(once.equal(d));
        }

        #[test]
        fn prop_text_round_trip(d in word()) {
            // long coefficients may come back with trailing zeros moved
            // into the exponent, so the encoding only matches once normalized
            let normalized = d.normalize();
            let parsed = Dec64::parse(&normalized.to_string()).unwrap();
            prop_assert!(parsed.equal(normalized), "{} -> {:#?}", normalized, parsed);
            prop_assert_eq!(parsed.normalize(), normalized);
        }

        #[test]
        fn prop_neg_involution(d in word()) {
            prop_assert!((-(-d)).equal(d));
        }

        #[test]
        fn prop_add_commutative(a in word(), b in word()) {
            prop_assert!((a + b).equal(b + a));
        }

        #[test]
        fn prop_sub_is_add_of_neg(a in word(), b in word()) {
            prop_assert!((a - (-b)).equal(a + b));
        }

        #[test]
        fn prop_add_exact_for_prices(a in price(), b in price()) {
            let base = (a.exponent() as i32).min(b.exponent() as i32);
            let sum = a + b;
            prop_assert_eq!(
                scaled(sum.coefficient(), sum.exponent() as i32, base),
                scaled(a.coefficient(), a.exponent() as i32, base)
                    + scaled(b.coefficient(), b.exponent() as i32, base)
            );
        }

        #[test]
        fn prop_sentinel_wildcard(d in word()) {
            prop_assert!(Dec64::EMPTY.equal(d));
            prop_assert!(d.equal(Dec64::EMPTY));
            prop_assert!(Dec64::NOT_AVAILABLE.equal(d));
            prop_assert!(d.equal(Dec64::NOT_AVAILABLE));
        }

        #[test]
        fn prop_round_is_within_half_unit(d in price(), exponent in -6i32..=3) {
            let rounded = d.round(exponent);
            let base = (d.exponent() as i32)
                .min(exponent)
                .min(rounded.exponent() as i32);
            let diff = scaled(rounded.coefficient(), rounded.exponent() as i32, base)
                - scaled(d.coefficient(), d.exponent() as i32, base);
            prop_assert!(diff.abs() * 2 <= scaled(1, exponent, base));
        }
    }
}
