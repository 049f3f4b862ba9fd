use crate::Dec64;
use crate::pow10::{MAX_I64_POWER, int_pow10};

/// Aligns the exponents of a batch of values, in place, on the smallest
/// normalized exponent found.
///
/// Zero coefficients (zero and both sentinels) are skipped. An entry is left
/// as is when its exponent is more than 18 digits away from the target or
/// when scaling its coefficient would leave the 56-bit range. Rewritten
/// entries keep their value.
pub fn homogenize(values: &mut [Dec64]) {
    let Some(min_exponent) = values
        .iter()
        .map(|d| d.normalize())
        .filter(|d| d.coefficient() != 0)
        .map(|d| d.exponent())
        .min()
    else {
        return;
    };

    for value in values.iter_mut() {
        let normalized = value.normalize();
        let coefficient = normalized.coefficient();
        if coefficient == 0 {
            continue;
        }
        let gap = normalized.exponent() as i32 - min_exponent as i32;
        if gap <= 0 || gap > MAX_I64_POWER as i32 {
            continue;
        }
        match coefficient.checked_mul(int_pow10(gap as u32)) {
            Some(scaled) if Dec64::fits_coefficient(scaled) => {
                *value = Dec64::new(scaled, min_exponent);
            }
            _ => {}
        }
    }
}
