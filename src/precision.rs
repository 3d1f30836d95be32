/*!
Precision tags and the helpers that render sub-second fractions.
*/

use crate::{
    error::{precision_err, range_err, Error},
    fmt,
};

/// The granularity of a format's native timestamp.
///
/// Every [`DateTimeValue`](crate::DateTimeValue) reports exactly one of
/// these. It decides how many fraction digits the format's strings carry
/// and which [`PrecisionHelper`], if any, renders them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Precision {
    /// Whole seconds, no fraction. HFS.
    Seconds,
    /// Tenths of a second. RFC 2579.
    Deciseconds,
    /// Thousandths of a second. POSIX epoch-millis, Java.
    Milliseconds,
    /// Millionths of a second. POSIX epoch-micros.
    Microseconds,
    /// Ten-millionths of a second, the FILETIME tick.
    HundredNanoseconds,
    /// Billionths of a second. Golang, APFS.
    Nanoseconds,
}

/// Renders a fraction of a second at a fixed number of digits.
///
/// Only the precisions whose string form carries a 3 or 6 digit fraction
/// have a helper; the rest print their fraction (or lack of one) inline
/// in their own `copy_to_string` and asking for a helper fails with an
/// unsupported-precision error.
///
/// # Example
///
/// ```
/// use forensic_time::{Precision, PrecisionHelper};
///
/// let helper = PrecisionHelper::for_precision(Precision::Microseconds)?;
/// let fraction = helper.fraction_of_second(546875)?;
/// assert_eq!(
///     helper.date_time_string((2010, 8, 12, 21, 6, 31), fraction)?,
///     "2010-08-12 21:06:31.546875",
/// );
/// # Ok::<(), forensic_time::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrecisionHelper {
    /// Renders three fraction digits.
    Milliseconds,
    /// Renders six fraction digits.
    Microseconds,
}

impl PrecisionHelper {
    /// Looks up the helper for a precision tag.
    ///
    /// Fails with an unsupported-precision error for tags that render
    /// without a helper.
    pub fn for_precision(
        precision: Precision,
    ) -> Result<PrecisionHelper, Error> {
        match precision {
            Precision::Milliseconds => Ok(PrecisionHelper::Milliseconds),
            Precision::Microseconds => Ok(PrecisionHelper::Microseconds),
            _ => Err(precision_err!(
                "no date-time string helper is registered for \
                 precision {precision:?}"
            )),
        }
    }

    /// Converts a microsecond count to a fraction of a second.
    ///
    /// The milliseconds helper floors to whole milliseconds first. Fails
    /// with a range error when the count is negative.
    pub fn fraction_of_second(self, microseconds: i64) -> Result<f64, Error> {
        if microseconds < 0 {
            return Err(range_err!(
                "microseconds value {microseconds} is out of bounds, \
                 must not be negative"
            ));
        }
        match self {
            PrecisionHelper::Milliseconds => {
                Ok((microseconds / 1_000) as f64 / 1_000.0)
            }
            PrecisionHelper::Microseconds => {
                Ok(microseconds as f64 / 1_000_000.0)
            }
        }
    }

    /// Renders date and time elements plus a fraction of a second.
    ///
    /// `elements` is `(year, month, day_of_month, hours, minutes,
    /// seconds)`. Fails with a range error when the fraction is not in
    /// `[0, 1)`.
    pub fn date_time_string(
        self,
        elements: (i64, i64, i64, i64, i64, i64),
        fraction_of_second: f64,
    ) -> Result<String, Error> {
        if !(0.0..1.0).contains(&fraction_of_second) {
            return Err(range_err!(
                "fraction of second value {fraction_of_second} is out of \
                 bounds, must be in range [0, 1)"
            ));
        }
        let (year, month, day_of_month, hours, minutes, seconds) = elements;
        let base = fmt::date_time_string(
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
        );
        match self {
            PrecisionHelper::Milliseconds => {
                let milliseconds = (fraction_of_second * 1_000.0) as i64;
                Ok(format!("{base}.{milliseconds:03}"))
            }
            PrecisionHelper::Microseconds => {
                let microseconds = (fraction_of_second * 1_000_000.0) as i64;
                Ok(format!("{base}.{microseconds:06}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_lookup() {
        assert_eq!(
            PrecisionHelper::for_precision(Precision::Milliseconds).unwrap(),
            PrecisionHelper::Milliseconds,
        );
        assert_eq!(
            PrecisionHelper::for_precision(Precision::Microseconds).unwrap(),
            PrecisionHelper::Microseconds,
        );
        for precision in [
            Precision::Seconds,
            Precision::Deciseconds,
            Precision::HundredNanoseconds,
            Precision::Nanoseconds,
        ] {
            assert!(PrecisionHelper::for_precision(precision)
                .unwrap_err()
                .is_unsupported_precision());
        }
    }

    #[test]
    fn fractions_of_second() {
        let helper = PrecisionHelper::Milliseconds;
        // Floors to whole milliseconds first.
        assert_eq!(helper.fraction_of_second(546875).unwrap(), 0.546);
        assert!(helper.fraction_of_second(-1).unwrap_err().is_range());

        let helper = PrecisionHelper::Microseconds;
        assert_eq!(helper.fraction_of_second(546875).unwrap(), 0.546875);
        assert!(helper.fraction_of_second(-1).unwrap_err().is_range());
    }

    #[test]
    fn strings() {
        let elements = (2010, 8, 12, 21, 6, 31);
        // 0.546875 is 35/64, exactly representable.
        assert_eq!(
            PrecisionHelper::Milliseconds
                .date_time_string(elements, 0.546875)
                .unwrap(),
            "2010-08-12 21:06:31.546",
        );
        assert_eq!(
            PrecisionHelper::Microseconds
                .date_time_string(elements, 0.546875)
                .unwrap(),
            "2010-08-12 21:06:31.546875",
        );
        assert_eq!(
            PrecisionHelper::Microseconds
                .date_time_string(elements, 0.0)
                .unwrap(),
            "2010-08-12 21:06:31.000000",
        );
    }

    #[test]
    fn string_rejects_bad_fraction() {
        let elements = (2010, 8, 12, 21, 6, 31);
        assert!(PrecisionHelper::Milliseconds
            .date_time_string(elements, 1.0)
            .unwrap_err()
            .is_range());
        assert!(PrecisionHelper::Microseconds
            .date_time_string(elements, -0.5)
            .unwrap_err()
            .is_range());
    }
}
