use std::fmt;

/// An error that can occur in this crate.
///
/// This crate follows the "One True God Error Type Pattern": one error type
/// for everything that can go wrong. Finer grained error types proved
/// difficult in the face of composition, so introspection is limited to a
/// small set of predicates:
///
/// * [`Error::is_parse`] for malformed date-time strings and binary
/// encodings (wrong separators, non-numeric fields, wrong field or buffer
/// lengths).
/// * [`Error::is_range`] for field values outside their valid domain (month,
/// day, hour, minute, second, a format's year floor or ceiling, native
/// magnitude overflow).
/// * [`Error::is_unsupported_precision`] for precision tags that have no
/// registered helper.
///
/// # Example
///
/// ```
/// use forensic_time::{DateTimeValue, Filetime};
///
/// let mut ft = Filetime::default();
/// let err = ft.copy_from_string("1600-01-02 00:00:00").unwrap_err();
/// assert!(err.is_range());
/// ```
#[derive(Clone)]
pub struct Error {
    inner: Box<ErrorInner>,
}

#[derive(Clone, Debug)]
struct ErrorInner {
    kind: ErrorKind,
    message: Box<str>,
}

/// The underlying classification of an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ErrorKind {
    /// A malformed date-time string or binary encoding.
    Parse,
    /// A field value outside its valid domain.
    Range,
    /// A precision tag with no registered helper.
    UnsupportedPrecision,
}

impl Error {
    pub(crate) fn new(
        kind: ErrorKind,
        message: fmt::Arguments<'_>,
    ) -> Error {
        let message = match message.as_str() {
            Some(literal) => Box::from(literal),
            None => message.to_string().into_boxed_str(),
        };
        Error { inner: Box::new(ErrorInner { kind, message }) }
    }

    /// Returns true when this error was caused by a malformed date-time
    /// string or binary encoding.
    pub fn is_parse(&self) -> bool {
        self.inner.kind == ErrorKind::Parse
    }

    /// Returns true when this error was caused by a value being out of its
    /// valid range.
    pub fn is_range(&self) -> bool {
        self.inner.kind == ErrorKind::Range
    }

    /// Returns true when this error was caused by asking for a precision
    /// that has no registered helper.
    pub fn is_unsupported_precision(&self) -> bool {
        self.inner.kind == ErrorKind::UnsupportedPrecision
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inner.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.inner.kind)
            .field("message", &self.inner.message)
            .finish()
    }
}

/// Creates a new parse error from `format_args!`.
macro_rules! parse_err {
    ($($tt:tt)*) => {{
        crate::error::Error::new(
            crate::error::ErrorKind::Parse,
            format_args!($($tt)*),
        )
    }}
}

/// Creates a new range error from `format_args!`.
macro_rules! range_err {
    ($($tt:tt)*) => {{
        crate::error::Error::new(
            crate::error::ErrorKind::Range,
            format_args!($($tt)*),
        )
    }}
}

/// Creates a new unsupported-precision error from `format_args!`.
macro_rules! precision_err {
    ($($tt:tt)*) => {{
        crate::error::Error::new(
            crate::error::ErrorKind::UnsupportedPrecision,
            format_args!($($tt)*),
        )
    }}
}

pub(crate) use {parse_err, precision_err, range_err};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        let err = parse_err!("junk at {offset}", offset = 5);
        assert!(err.is_parse());
        assert!(!err.is_range());
        assert_eq!(err.to_string(), "junk at 5");

        let err = range_err!("month is not valid");
        assert!(err.is_range());
        assert!(!err.is_unsupported_precision());

        let err = precision_err!("no helper");
        assert!(err.is_unsupported_precision());
        assert!(!err.is_parse());
    }
}
