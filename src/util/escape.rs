/*!
Provides convenience routines for escaping raw bytes in error messages.
*/

/// Provides a convenient `Debug` implementation for `&[u8]`.
///
/// This works best when the bytes are presumed to be mostly ASCII (which is
/// always the case for the date-time grammars in this crate), but will work
/// for anything. Non-printable bytes are emitted as hex escape sequences.
pub(crate) struct Bytes<'a>(pub(crate) &'a [u8]);

impl<'a> core::fmt::Display for Bytes<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        for &byte in self.0.iter() {
            if byte == b' ' {
                write!(f, " ")?;
                continue;
            }
            for (i, mut b) in core::ascii::escape_default(byte).enumerate() {
                // capitalize \xab to \xAB
                if i >= 2 && b.is_ascii_lowercase() {
                    b -= 32;
                }
                write!(f, "{}", char::from(b))?;
            }
        }
        Ok(())
    }
}

impl<'a> core::fmt::Debug for Bytes<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "\"")?;
        core::fmt::Display::fmt(self, f)?;
        write!(f, "\"")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let b = Bytes(b"2010-08-12 21:06:31");
        assert_eq!(format!("{b:?}"), "\"2010-08-12 21:06:31\"");
    }

    #[test]
    fn non_printable_is_escaped() {
        let b = Bytes(b"\xff\x00a");
        assert_eq!(format!("{b:?}"), "\"\\xFF\\x00a\"");
    }
}
