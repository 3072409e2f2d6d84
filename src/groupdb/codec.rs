//! Binary layout of the group database
//!
//! ```text
//! i32     version
//! i32     group count
//! repeat group count times:
//!     string  name
//!     i32     member count
//!     repeat member count times:
//!         string  member hash
//! ```
//!
//! Integers are little-endian. A string is its UTF-8 byte length as a 7-bit
//! variable-length integer (low groups first, high bit set on every byte but
//! the last) followed by the bytes.

use super::error::GroupDbError;
use std::io::{Read, Write};

/// Longest valid length prefix: five 7-bit groups cover 32 bits
const MAX_PREFIX_BYTES: usize = 5;

pub(crate) fn read_i32(reader: &mut impl Read) -> Result<i32, GroupDbError> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(GroupDbError::from_read)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a count, rejecting negative values
pub(crate) fn read_count(reader: &mut impl Read, what: &'static str) -> Result<usize, GroupDbError> {
    let count = read_i32(reader)?;
    usize::try_from(count).map_err(|_| GroupDbError::InvalidCount { what, count })
}

fn read_u8(reader: &mut impl Read) -> Result<u8, GroupDbError> {
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .map_err(GroupDbError::from_read)?;
    Ok(buf[0])
}

fn read_length(reader: &mut impl Read) -> Result<usize, GroupDbError> {
    let mut value: u64 = 0;
    for idx in 0..MAX_PREFIX_BYTES {
        let byte = read_u8(reader)?;
        value |= u64::from(byte & 0x7f) << (7 * idx);
        if byte & 0x80 == 0 {
            return u32::try_from(value)
                .map(|v| v as usize)
                .map_err(|_| GroupDbError::InvalidLength);
        }
    }
    Err(GroupDbError::InvalidLength)
}

pub(crate) fn read_string(reader: &mut impl Read) -> Result<String, GroupDbError> {
    let len = read_length(reader)?;
    let mut bytes = Vec::new();
    // Read through `take` so a bogus length cannot force a huge allocation
    reader
        .take(len as u64)
        .read_to_end(&mut bytes)
        .map_err(GroupDbError::from_read)?;
    if bytes.len() != len {
        return Err(GroupDbError::Truncated);
    }
    Ok(String::from_utf8(bytes)?)
}

pub(crate) fn write_i32(writer: &mut impl Write, value: i32) -> Result<(), GroupDbError> {
    writer
        .write_all(&value.to_le_bytes())
        .map_err(GroupDbError::WriteStream)
}

/// Write a count as i32
pub(crate) fn write_count(
    writer: &mut impl Write,
    what: &'static str,
    len: usize,
) -> Result<(), GroupDbError> {
    let count = i32::try_from(len).map_err(|_| GroupDbError::TooLarge { what, len })?;
    write_i32(writer, count)
}

pub(crate) fn write_string(writer: &mut impl Write, value: &str) -> Result<(), GroupDbError> {
    let len = value.len();
    let mut remaining =
        u32::try_from(len).map_err(|_| GroupDbError::TooLarge { what: "string", len })?;

    let mut prefix = Vec::with_capacity(MAX_PREFIX_BYTES);
    loop {
        // Only the low 7 bits are kept
        #[allow(clippy::cast_possible_truncation)]
        let low = (remaining & 0x7f) as u8;
        remaining >>= 7;
        if remaining == 0 {
            prefix.push(low);
            break;
        }
        prefix.push(low | 0x80);
    }

    writer
        .write_all(&prefix)
        .and_then(|()| writer.write_all(value.as_bytes()))
        .map_err(GroupDbError::WriteStream)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &str) -> Vec<u8> {
        let mut out = Vec::new();
        write_string(&mut out, value).unwrap();
        out
    }

    #[test]
    fn test_short_string_has_one_byte_prefix() {
        assert_eq!(encode("abc"), vec![3, b'a', b'b', b'c']);
        assert_eq!(encode(""), vec![0]);
    }

    #[test]
    fn test_long_string_prefix_continues() {
        let value = "x".repeat(300);
        let bytes = encode(&value);
        // 300 = 0b10_0101100
        assert_eq!(&bytes[..2], &[0xac, 0x02]);
        assert_eq!(bytes.len(), 302);
        assert_eq!(read_string(&mut bytes.as_slice()).unwrap(), value);
    }

    #[test]
    fn test_multibyte_utf8_counts_bytes() {
        let bytes = encode("Ünïcode ☆");
        assert_eq!(usize::from(bytes[0]), "Ünïcode ☆".len());
        assert_eq!(read_string(&mut bytes.as_slice()).unwrap(), "Ünïcode ☆");
    }

    #[test]
    fn test_overlong_prefix_is_rejected() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        assert!(matches!(
            read_string(&mut bytes.as_slice()),
            Err(GroupDbError::InvalidLength)
        ));
    }

    #[test]
    fn test_short_string_body_is_truncated() {
        let bytes = [5, b'a', b'b'];
        assert!(matches!(
            read_string(&mut bytes.as_slice()),
            Err(GroupDbError::Truncated)
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = [2, 0xc3, 0x28];
        assert!(matches!(
            read_string(&mut bytes.as_slice()),
            Err(GroupDbError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_negative_count() {
        let bytes = (-1i32).to_le_bytes();
        assert!(matches!(
            read_count(&mut bytes.as_slice(), "group"),
            Err(GroupDbError::InvalidCount { what: "group", count: -1 })
        ));
    }

    #[test]
    fn test_i32_is_little_endian() {
        let mut out = Vec::new();
        write_i32(&mut out, 20_150_203).unwrap();
        assert_eq!(out, 20_150_203i32.to_le_bytes());
        assert_eq!(read_i32(&mut out.as_slice()).unwrap(), 20_150_203);
    }
}
