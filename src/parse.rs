//! Decimal literal → word.
//!
//! Digits accumulate into a non-negative magnitude. A zero following a
//! significant digit is not multiplied in right away: it is counted, and only
//! folded into the magnitude when another significant digit arrives. Zeros that
//! are never folded end up in the exponent, so `"6151000"` is stored as
//! `6151 × 10^3`, and a long literal keeps as many leading digits as fit before
//! rounding the rest away.

use alloc::string::String;

use crate::pow10::int_pow10;
use crate::{Dec64, Dec64Error, Result};

/// Byte-level state of the mantissa scan.
struct Mantissa {
    magnitude: i64,
    exponent: i64,
    deferred_zeros: u32,
    seen_dot: bool,
    overflowed: bool,
    digits: usize,
}

impl Mantissa {
    const fn new() -> Self {
        Self {
            magnitude: 0,
            exponent: 0,
            deferred_zeros: 0,
            seen_dot: false,
            overflowed: false,
            digits: 0,
        }
    }

    /// True when `magnitude × 10^zeros` still fits the coefficient.
    fn can_scale(&self, zeros: u32) -> bool {
        self.magnitude == 0
            || self
                .magnitude
                .checked_mul(int_pow10(zeros))
                .is_some_and(|scaled| scaled <= Dec64::MAX_COEFFICIENT)
    }

    fn push_digit(&mut self, digit: i64) {
        self.digits += 1;

        if self.overflowed {
            // Integer digits that no longer fit still count as a power of ten;
            // fractional ones are dropped.
            if !self.seen_dot {
                self.exponent += 1;
            }
            return;
        }

        if digit == 0 {
            if self.magnitude == 0 && !self.seen_dot {
                // leading zero
                return;
            }
            if self.can_scale(self.deferred_zeros + 1) {
                self.deferred_zeros += 1;
                if self.seen_dot {
                    self.exponent -= 1;
                }
                return;
            }
        }

        // can_scale held for every deferred zero, so this cannot overflow
        if self.magnitude != 0 {
            self.magnitude *= int_pow10(self.deferred_zeros);
        }
        self.deferred_zeros = 0;

        let next = self.magnitude * 10 + digit;
        if next > Dec64::MAX_COEFFICIENT {
            self.overflowed = true;
            if digit >= 5 && self.magnitude < Dec64::MAX_COEFFICIENT {
                self.magnitude += 1;
            }
            if !self.seen_dot {
                self.exponent += 1;
            }
        } else {
            self.magnitude = next;
            if self.seen_dot {
                self.exponent -= 1;
            }
        }
    }
}

/// Parses `[ ]*[+-]?digits[.digits][(E|e)[+-]?digits][ ]*`.
pub(crate) fn parse_literal(input: &[u8]) -> Result<Dec64> {
    let literal = trim_spaces(input);
    if literal.is_empty() {
        return Ok(Dec64::EMPTY);
    }

    let (negative, body) = match literal[0] {
        b'-' => (true, &literal[1..]),
        b'+' => (false, &literal[1..]),
        _ => (false, literal),
    };

    let mut mantissa = Mantissa::new();
    let mut suffix = None;
    for (i, &byte) in body.iter().enumerate() {
        match byte {
            b'0'..=b'9' => mantissa.push_digit((byte - b'0') as i64),
            b'.' => {
                if mantissa.seen_dot {
                    return Err(Dec64Error::MultipleDots);
                }
                mantissa.seen_dot = true;
            }
            b'E' | b'e' => {
                suffix = Some(&body[i + 1..]);
                break;
            }
            _ => return Err(invalid_literal(input)),
        }
    }

    if mantissa.digits == 0 {
        return Err(invalid_literal(input));
    }

    let mut exponent = mantissa
        .exponent
        .saturating_add(mantissa.deferred_zeros as i64);
    if let Some(suffix) = suffix {
        exponent = exponent.saturating_add(parse_exponent(suffix)?);
    }

    // -128 is reserved for special values
    if exponent < Dec64::MIN_EXPONENT as i64 {
        return Err(Dec64Error::TooSmall(lossy(input)));
    }
    if exponent > Dec64::MAX_EXPONENT as i64 {
        return Err(Dec64Error::TooBig(lossy(input)));
    }

    if mantissa.magnitude == 0 {
        // never alias the sentinels: "0E1" is plain zero
        return Ok(Dec64::ZERO);
    }

    let coefficient = if negative {
        -mantissa.magnitude
    } else {
        mantissa.magnitude
    };
    Ok(Dec64::new(coefficient, exponent as i8))
}

/// Parses the digits after `E`/`e`.
fn parse_exponent(suffix: &[u8]) -> Result<i64> {
    let (sign, digits) = match suffix.first() {
        Some(b'-') => (-1, &suffix[1..]),
        Some(b'+') => (1, &suffix[1..]),
        _ => (1, suffix),
    };

    let mut value = 0i64;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(Dec64Error::InvalidExponent(byte as char));
        }
        value = value.saturating_mul(10).saturating_add((byte - b'0') as i64);
    }
    Ok(sign * value)
}

fn trim_spaces(input: &[u8]) -> &[u8] {
    let start = input.iter().position(|&b| b != b' ').unwrap_or(input.len());
    let end = input.iter().rposition(|&b| b != b' ').map_or(start, |i| i + 1);
    &input[start..end]
}

fn lossy(input: &[u8]) -> String {
    String::from_utf8_lossy(input).into_owned()
}

fn invalid_literal(input: &[u8]) -> Dec64Error {
    Dec64Error::InvalidLiteral(lossy(input))
}
