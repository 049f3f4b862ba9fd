//! Binary lists of words.
//!
//! A list of `n` values is exactly `8 × n` bytes: every word in little-endian
//! order, back to back. There is no length prefix and no terminator, so a
//! list ends where its stream ends.

use std::io::{self, Read, Write};
use std::vec;
use std::vec::Vec;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::Dec64;

/// Fills `chunk` from `reader`, returning how many bytes were read before
/// end-of-stream. Interrupted reads are retried.
fn fill_chunk<R: Read + ?Sized>(
    reader: &mut R,
    chunk: &mut [u8; Dec64::BYTES],
) -> io::Result<usize> {
    let mut filled = 0;
    while filled < chunk.len() {
        match reader.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Reads words until the end of `reader`.
///
/// The stream must end on an 8-byte boundary; a truncated last word is an
/// [`io::ErrorKind::UnexpectedEof`] error.
pub fn read_list<R: Read + ?Sized>(reader: &mut R) -> io::Result<Vec<Dec64>> {
    let mut values = Vec::with_capacity(16);
    let mut chunk = [0u8; Dec64::BYTES];
    loop {
        match fill_chunk(reader, &mut chunk)? {
            0 => break,
            Dec64::BYTES => values.push(Dec64::from_raw(LittleEndian::read_i64(&chunk))),
            partial => {
                tracing::debug!(read = values.len(), partial, "dec64 list ends inside a word");
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "dec64 list ends inside a word",
                ));
            }
        }
    }
    tracing::trace!(count = values.len(), "read dec64 list");
    Ok(values)
}

/// Writes every word of `values` to `writer`.
pub fn write_list<W: Write + ?Sized>(writer: &mut W, values: &[Dec64]) -> io::Result<()> {
    for value in values {
        writer.write_i64::<LittleEndian>(value.to_raw())?;
    }
    tracing::trace!(count = values.len(), "wrote dec64 list");
    Ok(())
}

/// Encodes `values` into a fresh buffer.
pub fn encode_list(values: &[Dec64]) -> Vec<u8> {
    let mut buf = vec![0u8; values.len() * Dec64::BYTES];
    for (chunk, value) in buf.chunks_exact_mut(Dec64::BYTES).zip(values) {
        LittleEndian::write_i64(chunk, value.to_raw());
    }
    buf
}

/// Decodes a buffer produced by [`encode_list`] or [`write_list`].
pub fn decode_list(mut bytes: &[u8]) -> io::Result<Vec<Dec64>> {
    read_list(&mut bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn d(s: &str) -> Dec64 {
        Dec64::parse(s).unwrap()
    }

    /// Hands out one byte per call and fails every other call as interrupted.
    struct Trickle<'a> {
        bytes: &'a [u8],
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            if self.bytes.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[0];
            self.bytes = &self.bytes[1..];
            Ok(1)
        }
    }

    #[test]
    fn test_write_then_read() {
        let values = vec![
            d("0.06447466"),
            d("-7003.69"),
            Dec64::EMPTY,
            d("1E-5"),
            Dec64::NOT_AVAILABLE,
        ];

        let mut buf = Vec::new();
        write_list(&mut buf, &values).unwrap();
        assert_eq!(buf.len(), values.len() * 8);

        let decoded = read_list(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_layout_is_little_endian() {
        let buf = encode_list(&[Dec64::new(1, 0), Dec64::NOT_AVAILABLE]);
        assert_eq!(
            buf,
            [0x00, 0x01, 0, 0, 0, 0, 0, 0, 0xff, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_encode_matches_write() {
        let values = [d("42.5"), d("-0.001"), Dec64::ZERO];
        let mut written = Vec::new();
        write_list(&mut written, &values).unwrap();
        assert_eq!(encode_list(&values), written);
    }

    #[test]
    fn test_empty_list() {
        assert!(encode_list(&[]).is_empty());
        assert_eq!(decode_list(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn test_truncated_word() {
        let mut buf = encode_list(&[d("1.5"), d("2.5")]);
        buf.pop();
        let err = decode_list(&buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let err = decode_list(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let values = [d("123.456"), d("-1")];
        let buf = encode_list(&values);
        let mut reader = Trickle {
            bytes: &buf,
            interrupt: false,
        };
        assert_eq!(read_list(&mut reader).unwrap(), values);
    }

    #[test]
    fn test_read_through_trait_object() {
        let buf = encode_list(&[d("3.14")]);
        let mut cursor = Cursor::new(buf);
        let reader: &mut dyn Read = &mut cursor;
        assert_eq!(read_list(reader).unwrap(), [d("3.14")]);
    }

    mod property_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn prop_list_round_trip(raw in prop::collection::vec(any::<i64>(), 0..64)) {
                let values: Vec<Dec64> = raw.into_iter().map(Dec64::from_raw).collect();
                let decoded = decode_list(&encode_list(&values)).unwrap();
                prop_assert_eq!(decoded, values);
            }
        }
    }
}
