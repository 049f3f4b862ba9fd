//! DEC64 decimal floating point for exchanged market data
//!
//! Venues publish prices and volumes as decimal literals. Storing them as
//! `f64` introduces representation error the moment they are parsed; DEC64
//! keeps them exact in a single 64-bit word:
//!
//! - **coefficient**: bits 8..64, a signed 56-bit integer
//! - **exponent**: bits 0..8, a signed byte
//! - value = `coefficient × 10^exponent`
//!
//! Two reserved words mark missing data: [`Dec64::EMPTY`] (no value present)
//! and [`Dec64::NOT_AVAILABLE`] (value not published).
//!
//! ## Features
//!
//! - **Exact parsing**: literals up to ~17 significant digits are stored without loss,
//!   longer ones are rounded to nearest
//! - **Canonical formatting**: plain decimal text that parses back to the same value
//! - **Graceful arithmetic**: add, subtract, multiply, divide and round never fail;
//!   precision is dropped instead
//! - **Batch alignment**: [`homogenize`] puts a list of values on a common exponent
//! - **Wire format**: lists of words as 8-byte little-endian chunks ([`read_list`], [`write_list`])
//! - **no_std compatible** (with `alloc`), optional **serde** support
//!
//! ## Example
//!
//! ```rust
//! use dec64::Dec64;
//!
//! let price = Dec64::parse("7003.69").unwrap();
//! let volume = Dec64::parse("0.0244").unwrap();
//! let fee = Dec64::parse("1.5E-3").unwrap();
//!
//! assert_eq!((price * volume).to_string(), "170.890036");
//! assert_eq!((volume + fee).to_string(), "0.0259");
//! assert!(Dec64::EMPTY.equal(price));
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

mod arith;
mod dec64;
mod homogenize;
#[cfg(feature = "std")]
mod list;
mod parse;
pub mod pow10;

pub use dec64::Dec64;
pub use homogenize::homogenize;
#[cfg(feature = "std")]
pub use list::{decode_list, encode_list, read_list, write_list};

use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Dec64Error {
    #[error("only one decimal point allowed")]
    MultipleDots,

    #[error("unable to parse dec64 from {0:?}")]
    InvalidLiteral(String),

    #[error("unable to handle {0:?} in exponent")]
    InvalidExponent(char),

    #[error("{0:?} is too small for dec64")]
    TooSmall(String),

    #[error("{0:?} is too big for dec64")]
    TooBig(String),

    #[error("non-finite float cannot be a dec64")]
    NotFinite,

    #[error("{0} does not fit a dec64 coefficient")]
    CoefficientOverflow(i64),
}

/// Broad class of a [`Dec64Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input is not a decimal literal.
    Syntax,
    /// The input is a number, but outside what a word can hold.
    Range,
}

impl Dec64Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MultipleDots | Self::InvalidLiteral(_) | Self::InvalidExponent(_) => {
                ErrorKind::Syntax
            }
            Self::TooSmall(_) | Self::TooBig(_) | Self::NotFinite | Self::CoefficientOverflow(_) => {
                ErrorKind::Range
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, Dec64Error>;
