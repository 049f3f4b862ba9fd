use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use alloc::string::ToString;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
#[cfg(feature = "serde")]
use serde_json::value::RawValue;

use crate::Dec64Error;
use crate::pow10::{POW10_F64, POW10_I64};

/// Decimal floating point packed in one 64-bit word.
///
/// Bits 8..64 hold a signed coefficient, bits 0..8 a signed decimal exponent.
/// The same value can have several encodings (`10 × 10^0` and `1 × 10^1`);
/// `==` compares encodings, [`Dec64::equal`] compares values.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Dec64 {
    bits: i64,
}

// ============================================================================
// Constants
// ============================================================================

impl Dec64 {
    /// Largest coefficient the parser and the addition overflow policy keep.
    pub const MAX_COEFFICIENT: i64 = 0x7f_ffff_ffff_ffff;

    /// Smallest coefficient the 56-bit field can hold.
    pub const MIN_COEFFICIENT: i64 = -0x80_0000_0000_0000;

    /// Largest exponent of an ordinary value.
    pub const MAX_EXPONENT: i8 = 127;

    /// Smallest exponent of an ordinary value. `-128` is reserved.
    pub const MIN_EXPONENT: i8 = -127;

    /// Tolerance when checking a word against an `f64` approximation.
    pub const EPSILON_F64: f64 = 3e-14;

    /// No value present. Coefficient 0, exponent 1.
    pub const EMPTY: Self = Self { bits: 0x01 };

    /// Value not published by the source. Coefficient 0, exponent -1.
    pub const NOT_AVAILABLE: Self = Self { bits: 0xff };

    /// Zero
    pub const ZERO: Self = Self { bits: 0 };

    /// One (1)
    pub const ONE: Self = Self::new(1, 0);
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for Dec64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Dec64 {
    /// Packs a coefficient and an exponent.
    ///
    /// The coefficient must fit 56 bits; higher bits are shifted out.
    #[inline(always)]
    pub const fn new(coefficient: i64, exponent: i8) -> Self {
        Self {
            bits: (coefficient << 8) | (exponent as u8 as i64),
        }
    }

    /// Packs a coefficient and an exponent, rejecting a coefficient outside
    /// the 56-bit field and the reserved exponent `-128`.
    pub const fn checked_new(coefficient: i64, exponent: i8) -> Option<Self> {
        if coefficient < Self::MIN_COEFFICIENT
            || coefficient > Self::MAX_COEFFICIENT
            || exponent < Self::MIN_EXPONENT
        {
            return None;
        }
        Some(Self::new(coefficient, exponent))
    }

    /// Creates a word from its raw 64-bit pattern.
    #[inline(always)]
    pub const fn from_raw(bits: i64) -> Self {
        Self { bits }
    }

    /// Returns the raw 64-bit pattern.
    #[inline(always)]
    pub const fn to_raw(self) -> i64 {
        self.bits
    }

    /// Packs an arithmetic result. An exponent outside the byte range has no
    /// encoding and yields [`Dec64::NOT_AVAILABLE`].
    pub(crate) fn from_parts(coefficient: i64, exponent: i32) -> Self {
        match i8::try_from(exponent) {
            Ok(exponent) => Self::new(coefficient, exponent),
            Err(_) => {
                tracing::debug!(coefficient, exponent, "dec64 exponent out of range");
                Self::NOT_AVAILABLE
            }
        }
    }

    #[inline(always)]
    pub(crate) const fn fits_coefficient(coefficient: i64) -> bool {
        coefficient >= Self::MIN_COEFFICIENT && coefficient <= Self::MAX_COEFFICIENT
    }
}

// ============================================================================
// Encoding
// ============================================================================

impl Dec64 {
    /// The signed coefficient (bits 8..64).
    #[inline(always)]
    pub const fn coefficient(self) -> i64 {
        self.bits >> 8
    }

    /// The signed decimal exponent (bits 0..8).
    #[inline(always)]
    pub const fn exponent(self) -> i8 {
        self.bits as i8
    }

    /// Canonical encoding: the coefficient is not a multiple of ten, zero is
    /// `(0, 0)`. Both sentinels normalize to zero.
    pub const fn normalize(self) -> Self {
        let mut coefficient = self.coefficient();
        if coefficient == 0 {
            return Self::ZERO;
        }
        let mut exponent = self.exponent();
        while coefficient % 10 == 0 && exponent < Self::MAX_EXPONENT {
            coefficient /= 10;
            exponent += 1;
        }
        Self::new(coefficient, exponent)
    }
}

// ============================================================================
// Sign and Kind Checks
// ============================================================================

impl Dec64 {
    /// -1, 0 or 1 following the sign of the coefficient.
    #[inline(always)]
    pub const fn signum(self) -> i32 {
        self.coefficient().signum() as i32
    }

    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.coefficient() > 0
    }

    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.coefficient() < 0
    }

    /// True for any encoding of zero, sentinels included.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.coefficient() == 0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.bits == Self::EMPTY.bits
    }

    #[inline(always)]
    pub const fn is_not_available(self) -> bool {
        self.bits == Self::NOT_AVAILABLE.bits
    }

    /// True for [`Dec64::EMPTY`] and [`Dec64::NOT_AVAILABLE`].
    #[inline(always)]
    pub const fn is_sentinel(self) -> bool {
        self.is_empty() || self.is_not_available()
    }

    /// True when the value has no digits right of the decimal point.
    pub const fn is_int(self) -> bool {
        self.normalize().exponent() >= 0
    }
}

// ============================================================================
// Integer Conversions
// ============================================================================

impl Dec64 {
    /// Creates a word with exponent 0.
    ///
    /// No range check: `value` must fit the 56-bit coefficient.
    #[inline(always)]
    pub const fn from_i64(value: i64) -> Self {
        Self { bits: value << 8 }
    }

    /// Creates a word with exponent 0, or `None` if `value` does not fit the
    /// 56-bit coefficient.
    #[inline(always)]
    pub const fn checked_from_i64(value: i64) -> Option<Self> {
        if Self::fits_coefficient(value) {
            Some(Self::from_i64(value))
        } else {
            None
        }
    }

    #[inline(always)]
    pub const fn from_i32(value: i32) -> Self {
        Self::from_i64(value as i64)
    }

    #[inline(always)]
    pub const fn from_u32(value: u32) -> Self {
        Self::from_i64(value as i64)
    }

    /// Integer part, truncated toward zero. Saturates when the value does not
    /// fit an `i64`.
    pub fn to_i64(self) -> i64 {
        let coefficient = self.coefficient();
        let exponent = self.exponent();
        let power = POW10_I64[exponent as u8 as usize];
        if exponent >= 0 {
            coefficient.saturating_mul(power)
        } else {
            coefficient / power
        }
    }
}

// ============================================================================
// Float Conversions
// ============================================================================

impl Dec64 {
    /// Closest `f64` to the value.
    pub fn to_f64(self) -> f64 {
        let coefficient = self.coefficient() as f64;
        let exponent = self.exponent();
        if exponent >= 0 {
            coefficient * POW10_F64[exponent as usize]
        } else if exponent > i8::MIN {
            // dividing by the exact power keeps the result correctly rounded
            coefficient / POW10_F64[exponent.unsigned_abs() as usize]
        } else {
            coefficient * POW10_F64[exponent as u8 as usize]
        }
    }

    /// Parses the shortest decimal text that round-trips `value`.
    ///
    /// # Errors
    /// Returns `Dec64Error::NotFinite` for NaN and infinities, and the parser's
    /// range errors for magnitudes beyond `10^±127`.
    pub fn from_f64(value: f64) -> crate::Result<Self> {
        if !value.is_finite() {
            return Err(Dec64Error::NotFinite);
        }
        // LowerExp prints the shortest round-trip digits, e.g. "6.35e-6"
        NumberText::parse(format_args!("{value:e}"))
    }
}

/// Stack buffer for the text of a primitive number (`f64` in scientific
/// notation, or an integer).
struct NumberText {
    buffer: [u8; 32],
    len: usize,
}

impl NumberText {
    /// Formats `args` and runs the result through the parser.
    fn parse(args: fmt::Arguments<'_>) -> crate::Result<Dec64> {
        let mut text = Self {
            buffer: [0; 32],
            len: 0,
        };
        // only overflows past 32 bytes, which no primitive number reaches
        fmt::write(&mut text, args).map_err(|_| Dec64Error::NotFinite)?;
        Dec64::parse_bytes(&text.buffer[..text.len])
    }
}

impl fmt::Write for NumberText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > self.buffer.len() {
            return Err(fmt::Error);
        }
        self.buffer[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl Dec64 {
    /// Parses a decimal literal.
    ///
    /// Accepts surrounding spaces, a leading sign, a fractional part and an
    /// `E`/`e` exponent suffix: `"-12.5"`, `".007"`, `"1.2E-7"`.
    /// An empty string is [`Dec64::EMPTY`].
    ///
    /// # Errors
    /// Returns a syntax error for anything outside that grammar and
    /// `TooSmall`/`TooBig` when the exponent leaves `-127..=127`.
    #[inline]
    pub fn parse(s: &str) -> crate::Result<Self> {
        crate::parse::parse_literal(s.as_bytes())
    }

    /// Same as [`Dec64::parse`] on raw ASCII bytes.
    #[inline]
    pub fn parse_bytes(bytes: &[u8]) -> crate::Result<Self> {
        crate::parse::parse_literal(bytes)
    }
}

impl FromStr for Dec64 {
    type Err = Dec64Error;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Bytes Operations
// ============================================================================

impl Dec64 {
    /// The size of a word in bytes.
    pub const BYTES: usize = core::mem::size_of::<i64>();

    /// Creates a word from its little-endian byte representation.
    #[inline(always)]
    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self {
            bits: i64::from_le_bytes(bytes),
        }
    }

    /// Little-endian byte representation, as used by the list wire format.
    #[inline(always)]
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.bits.to_le_bytes()
    }
}

// ============================================================================
// Trait Conversions
// ============================================================================

impl From<i32> for Dec64 {
    #[inline(always)]
    fn from(value: i32) -> Self {
        Self::from_i32(value)
    }
}

impl From<u32> for Dec64 {
    #[inline(always)]
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl TryFrom<i64> for Dec64 {
    type Error = Dec64Error;

    #[inline(always)]
    fn try_from(value: i64) -> crate::Result<Self> {
        Self::checked_from_i64(value).ok_or(Dec64Error::CoefficientOverflow(value))
    }
}

impl TryFrom<f64> for Dec64 {
    type Error = Dec64Error;

    #[inline(always)]
    fn try_from(value: f64) -> crate::Result<Self> {
        Self::from_f64(value)
    }
}

// ============================================================================
// Formatting
// ============================================================================

// sign + 17 digits + 127 zeros, or "-0." + 126 zeros + 1 digit
const TEXT_CAPACITY: usize = 160;

impl fmt::Display for Dec64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = self.normalize();
        let coefficient = normalized.coefficient();
        if coefficient == 0 {
            return f.pad("0");
        }

        // Digits of the coefficient, most significant first
        let mut digits = [0u8; 20];
        let mut start = digits.len();
        let mut n = coefficient.unsigned_abs();
        while n > 0 {
            start -= 1;
            digits[start] = b'0' + (n % 10) as u8;
            n /= 10;
        }
        let digits = &digits[start..];

        let mut buffer = [0u8; TEXT_CAPACITY];
        let mut pos = 0;
        if coefficient < 0 {
            buffer[pos] = b'-';
            pos += 1;
        }

        let exponent = normalized.exponent() as i32;
        if exponent >= 0 {
            // Scale up: digits followed by zeros
            buffer[pos..pos + digits.len()].copy_from_slice(digits);
            pos += digits.len();
            let zeros = exponent as usize;
            buffer[pos..pos + zeros].fill(b'0');
            pos += zeros;
        } else {
            let fraction = exponent.unsigned_abs() as usize;
            if digits.len() > fraction {
                let integer = digits.len() - fraction;
                buffer[pos..pos + integer].copy_from_slice(&digits[..integer]);
                pos += integer;
                buffer[pos] = b'.';
                pos += 1;
                buffer[pos..pos + fraction].copy_from_slice(&digits[integer..]);
                pos += fraction;
            } else {
                // Scale down: "0." then padding zeros
                buffer[pos] = b'0';
                buffer[pos + 1] = b'.';
                pos += 2;
                let zeros = fraction - digits.len();
                buffer[pos..pos + zeros].fill(b'0');
                pos += zeros;
                buffer[pos..pos + digits.len()].copy_from_slice(digits);
                pos += digits.len();
            }
        }

        // Only ASCII digits, '-' and '.' were written
        let text = core::str::from_utf8(&buffer[..pos]).map_err(|_| fmt::Error)?;
        f.pad(text)
    }
}

impl fmt::Debug for Dec64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows raw fields
            f.debug_struct("Dec64")
                .field("coefficient", &self.coefficient())
                .field("exponent", &self.exponent())
                .finish()
        } else if self.is_empty() {
            f.write_str("Dec64(EMPTY)")
        } else if self.is_not_available() {
            f.write_str("Dec64(NOT_AVAILABLE)")
        } else {
            write!(f, "Dec64({})", self)
        }
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for Dec64 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            // JSON - a bare number holding the formatter text; sentinels have
            // no text form
            if self.is_sentinel() {
                return serializer.serialize_none();
            }
            let number = RawValue::from_string(self.to_string())
                .map_err(<S::Error as ser::Error>::custom)?;
            number.serialize(serializer)
        } else {
            // Bincode, MessagePack, etc. - the raw word, sentinels included
            self.bits.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Dec64 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(Dec64Visitor)
        } else {
            let bits = i64::deserialize(deserializer)?;
            Ok(Self { bits })
        }
    }
}

#[cfg(feature = "serde")]
struct Dec64Visitor;

#[cfg(feature = "serde")]
impl<'de> de::Visitor<'de> for Dec64Visitor {
    type Value = Dec64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal literal, a number or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<Dec64, E> {
        Dec64::parse(v).map_err(E::custom)
    }

    // Integers take the parser path so that `6151000` reads back as
    // `6151 × 10^3`, like its text, and wide values round instead of failing.
    fn visit_i64<E: de::Error>(self, v: i64) -> core::result::Result<Dec64, E> {
        NumberText::parse(format_args!("{v}")).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> core::result::Result<Dec64, E> {
        NumberText::parse(format_args!("{v}")).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> core::result::Result<Dec64, E> {
        Dec64::from_f64(v).map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> core::result::Result<Dec64, E> {
        Ok(Dec64::EMPTY)
    }

    fn visit_none<E: de::Error>(self) -> core::result::Result<Dec64, E> {
        Ok(Dec64::EMPTY)
    }

    fn visit_some<D>(self, deserializer: D) -> core::result::Result<Dec64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}







#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use std::vec::Vec;

    use super::*;

    #[test]
    fn test_serialize() {
        let d = Dec64::parse("123.45").unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "123.45");
        assert_eq!(serde_json::to_string(&Dec64::parse(".007").unwrap()).unwrap(), "0.007");
        assert_eq!(serde_json::to_string(&Dec64::new(1, 0)).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Dec64::new(-12, 5)).unwrap(), "-1200000");
    }

    #[test]
    fn test_serialize_never_scientific() {
        let json = serde_json::to_string(&Dec64::parse("1E-8").unwrap()).unwrap();
        assert_eq!(json, "0.00000001");
    }

    #[test]
    fn test_serialize_sentinels_as_null() {
        assert_eq!(serde_json::to_string(&Dec64::EMPTY).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Dec64::NOT_AVAILABLE).unwrap(), "null");
    }

    #[test]
    fn test_deserialize() {
        let d: Dec64 = serde_json::from_str(r#""123.45""#).unwrap();
        assert_eq!(d, Dec64::parse("123.45").unwrap());
    }

    #[test]
    fn test_deserialize_bare_numbers() {
        let d: Dec64 = serde_json::from_str("42").unwrap();
        assert_eq!(d, Dec64::from_i64(42));

        let d: Dec64 = serde_json::from_str("-7").unwrap();
        assert_eq!(d, Dec64::from_i64(-7));

        // same encoding as the parser gives for the text
        let d: Dec64 = serde_json::from_str("6151000").unwrap();
        assert_eq!(d, Dec64::new(6151, 3));

        // wider than the coefficient: rounded like a long literal
        let d: Dec64 = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(d, Dec64::new(18_446_744_073_709_552, 3));

        let d: Dec64 = serde_json::from_str("0.0244").unwrap();
        assert_eq!(d, Dec64::parse("0.0244").unwrap());
    }

    #[test]
    fn test_deserialize_null() {
        let d: Dec64 = serde_json::from_str("null").unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Dec64>(r#""3.2.5""#).is_err());
        assert!(serde_json::from_str::<Dec64>("true").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let values: Vec<Dec64> = ["0.06447466", "-85.236", "6151000", "0"]
            .iter()
            .map(|s| Dec64::parse(s).unwrap())
            .collect();
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, "[0.06447466,-85.236,6151000,0]");
        let back: Vec<Dec64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_bincode_keeps_raw_word() {
        for d in [Dec64::new(10, 0), Dec64::EMPTY, Dec64::NOT_AVAILABLE] {
            let bytes = bincode::serialize(&d).unwrap();
            assert_eq!(bytes, d.to_le_bytes());
            let back: Dec64 = bincode::deserialize(&bytes).unwrap();
            assert_eq!(back, d);
        }
    }
}
