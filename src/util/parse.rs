/*!
Helpers for parsing fixed-width decimal numbers out of byte slices.
*/

use crate::{
    error::{parse_err, Error},
    util::escape,
};

/// Splits the given input into two slices at the offset given.
///
/// Returns `None` when the input is shorter than the offset.
pub(crate) fn split(input: &[u8], at: usize) -> Option<(&[u8], &[u8])> {
    if at > input.len() {
        None
    } else {
        Some(input.split_at(at))
    }
}

/// Parses an `i64` from a sequence of ASCII digits.
///
/// Every byte must be a digit. Signs are handled by callers, so that the
/// grammar decides where a sign is permitted.
pub(crate) fn i64(bytes: &[u8]) -> Result<i64, Error> {
    if bytes.is_empty() {
        return Err(parse_err!("invalid number, no digits found"));
    }
    let mut n: i64 = 0;
    for &byte in bytes.iter() {
        let digit = match byte.checked_sub(b'0') {
            Some(digit) if digit <= 9 => i64::from(digit),
            _ => {
                return Err(parse_err!(
                    "invalid digit, expected 0-9 but got {byte:?}",
                    byte = escape::Bytes(&[byte]),
                ));
            }
        };
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| {
                parse_err!(
                    "number {number:?} too big to parse into 64-bit integer",
                    number = escape::Bytes(bytes),
                )
            })?;
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_at_width() {
        assert_eq!(
            split(b"2010-08", 4),
            Some((&b"2010"[..], &b"-08"[..]))
        );
        assert_eq!(split(b"20", 4), None);
        assert_eq!(split(b"", 0), Some((&b""[..], &b""[..])));
    }

    #[test]
    fn digits() {
        assert_eq!(i64(b"0000").unwrap(), 0);
        assert_eq!(i64(b"2010").unwrap(), 2010);
        assert_eq!(i64(b"546875").unwrap(), 546875);
        assert!(i64(b"").is_err());
        assert!(i64(b"20a0").is_err());
        assert!(i64(b"-100").is_err());
        assert!(i64(b"99999999999999999999").is_err());
    }
}
