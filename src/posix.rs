/*!
POSIX timestamps at second, millisecond, microsecond and nanosecond
granularity.

These are the plainest formats in the crate: a signed count since
1970-01-01 00:00:00 UTC with nothing but the unit varying. `JavaTime` is
the millisecond count under the name the Java ecosystem gives it, and
[`ApfsTime`] is the nanosecond count as stored by the Apple File System.
*/

use crate::{
    calendar::{self, Epoch},
    error::{range_err, Error},
    fmt::{self, DateTimeString},
    precision::{Precision, PrecisionHelper},
    value::{DateTimeValue, NormalizedCache, NormalizedTimestamp},
};

/// A count of milliseconds since the Unix epoch, as Java's
/// `System.currentTimeMillis` and friends record it.
pub type JavaTime = PosixTimeInMilliseconds;

/// A signed count of seconds since 1970-01-01 00:00:00 UTC.
///
/// # Example
///
/// ```
/// use forensic_time::{DateTimeValue, PosixTime};
///
/// let pt = PosixTime::new(1281643591);
/// assert_eq!(pt.copy_to_string().as_deref(), Some("2010-08-12 20:06:31"));
/// assert_eq!(pt.date(), Some((2010, 8, 12)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PosixTime {
    timestamp: Option<i64>,
    cache: NormalizedCache,
}

impl PosixTime {
    /// Creates a set value from a second count.
    pub fn new(timestamp: i64) -> PosixTime {
        PosixTime {
            timestamp: Some(timestamp),
            cache: NormalizedCache::default(),
        }
    }

    /// Returns the native second count, `None` when unset.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }
}

impl DateTimeValue for PosixTime {
    fn precision(&self) -> Precision {
        Precision::Seconds
    }

    /// The fraction of a second, if the string carries one, is dropped.
    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let timestamp = DateTimeString::parse(string.as_bytes())?
            .unix_seconds()?;
        self.timestamp = Some(timestamp);
        self.cache.reset();
        Ok(())
    }

    fn copy_to_string(&self) -> Option<String> {
        let (days, hours, minutes, seconds) =
            calendar::time_values(self.timestamp?);
        let (year, month, day_of_month) =
            calendar::date_values(days, Epoch::UNIX).ok()?;
        Some(fmt::date_time_string(
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
        ))
    }

    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        self.cache.get_or_derive(|| {
            self.timestamp.map(NormalizedTimestamp::from_seconds)
        })
    }
}

/// A signed count of milliseconds since 1970-01-01 00:00:00 UTC.
#[derive(Clone, Debug, Default)]
pub struct PosixTimeInMilliseconds {
    timestamp: Option<i64>,
    cache: NormalizedCache,
}

impl PosixTimeInMilliseconds {
    /// Creates a set value from a millisecond count.
    pub fn new(timestamp: i64) -> PosixTimeInMilliseconds {
        PosixTimeInMilliseconds {
            timestamp: Some(timestamp),
            cache: NormalizedCache::default(),
        }
    }

    /// Returns the native millisecond count, `None` when unset.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }
}

impl DateTimeValue for PosixTimeInMilliseconds {
    fn precision(&self) -> Precision {
        Precision::Milliseconds
    }

    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let parsed = DateTimeString::parse(string.as_bytes())?;
        let timestamp =
            parsed.unix_seconds()? * 1_000 + parsed.microseconds() / 1_000;
        self.timestamp = Some(timestamp);
        self.cache.reset();
        Ok(())
    }

    fn copy_to_string(&self) -> Option<String> {
        let timestamp = self.timestamp?;
        let (days, hours, minutes, seconds) =
            calendar::time_values(timestamp.div_euclid(1_000));
        let (year, month, day_of_month) =
            calendar::date_values(days, Epoch::UNIX).ok()?;
        let helper = PrecisionHelper::Milliseconds;
        // Exact: every whole-millisecond fraction survives the f64 round
        // trip, unlike the microsecond case below.
        let fraction = helper
            .fraction_of_second(timestamp.rem_euclid(1_000) * 1_000)
            .ok()?;
        helper
            .date_time_string(
                (year, month, day_of_month, hours, minutes, seconds),
                fraction,
            )
            .ok()
    }

    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        self.cache.get_or_derive(|| {
            let timestamp = self.timestamp?;
            Some(NormalizedTimestamp::from_nanoseconds(
                i128::from(timestamp) * 1_000_000,
            ))
        })
    }
}

/// A signed count of microseconds since 1970-01-01 00:00:00 UTC.
#[derive(Clone, Debug, Default)]
pub struct PosixTimeInMicroseconds {
    timestamp: Option<i64>,
    cache: NormalizedCache,
}

impl PosixTimeInMicroseconds {
    /// Creates a set value from a microsecond count.
    pub fn new(timestamp: i64) -> PosixTimeInMicroseconds {
        PosixTimeInMicroseconds {
            timestamp: Some(timestamp),
            cache: NormalizedCache::default(),
        }
    }

    /// Returns the native microsecond count, `None` when unset.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }
}

impl DateTimeValue for PosixTimeInMicroseconds {
    fn precision(&self) -> Precision {
        Precision::Microseconds
    }

    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let parsed = DateTimeString::parse(string.as_bytes())?;
        let timestamp =
            parsed.unix_seconds()? * 1_000_000 + parsed.microseconds();
        self.timestamp = Some(timestamp);
        self.cache.reset();
        Ok(())
    }

    /// Renders with a six digit microsecond fraction.
    fn copy_to_string(&self) -> Option<String> {
        let timestamp = self.timestamp?;
        let (days, hours, minutes, seconds) =
            calendar::time_values(timestamp.div_euclid(1_000_000));
        let (year, month, day_of_month) =
            calendar::date_values(days, Epoch::UNIX).ok()?;
        let base = fmt::date_time_string(
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
        );
        // The remainder prints as an integer. An f64 fraction of a second
        // cannot represent every microsecond value, so a float detour here
        // would misrender some of them.
        let microseconds = timestamp.rem_euclid(1_000_000);
        Some(format!("{base}.{microseconds:06}"))
    }

    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        self.cache.get_or_derive(|| {
            let timestamp = self.timestamp?;
            Some(NormalizedTimestamp::from_nanoseconds(
                i128::from(timestamp) * 1_000,
            ))
        })
    }
}

/// A signed count of nanoseconds since 1970-01-01 00:00:00 UTC, as the
/// Apple File System stores it.
///
/// On disk the count is a signed 64-bit integer, so the latest
/// expressible time is 2262-04-11 16:47:16.854775807 and
/// `copy_from_string` rejects anything later. The native slot is wider
/// than the on-disk field so that an out-of-range count can still be
/// held; such a value degrades every output to `None`.
#[derive(Clone, Debug, Default)]
pub struct ApfsTime {
    timestamp: Option<i128>,
    cache: NormalizedCache,
}

impl ApfsTime {
    /// Creates a set value from an on-disk nanosecond count.
    pub fn new(timestamp: i64) -> ApfsTime {
        ApfsTime {
            timestamp: Some(i128::from(timestamp)),
            cache: NormalizedCache::default(),
        }
    }

    /// Returns the native nanosecond count, `None` when unset.
    pub fn timestamp(&self) -> Option<i128> {
        self.timestamp
    }

    fn in_range(timestamp: i128) -> bool {
        i64::try_from(timestamp).is_ok()
    }
}

impl DateTimeValue for ApfsTime {
    fn precision(&self) -> Precision {
        Precision::Nanoseconds
    }

    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let parsed = DateTimeString::parse(string.as_bytes())?;
        let timestamp = i128::from(parsed.unix_seconds()?) * 1_000_000_000
            + i128::from(parsed.microseconds()) * 1_000;
        if timestamp > i128::from(i64::MAX) {
            return Err(range_err!(
                "date-time value {string:?} is out of bounds, the maximum \
                 APFS time is 2262-04-11 16:47:16.854775807"
            ));
        }
        self.timestamp = Some(timestamp);
        self.cache.reset();
        Ok(())
    }

    fn copy_to_string(&self) -> Option<String> {
        let timestamp = self.timestamp.filter(|&ts| ApfsTime::in_range(ts))?;
        let seconds = timestamp.div_euclid(1_000_000_000) as i64;
        let nanoseconds = timestamp.rem_euclid(1_000_000_000) as i64;
        let (days, hours, minutes, seconds) = calendar::time_values(seconds);
        let (year, month, day_of_month) =
            calendar::date_values(days, Epoch::UNIX).ok()?;
        let base = fmt::date_time_string(
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
        );
        Some(format!("{base}.{nanoseconds:09}"))
    }

    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        self.cache.get_or_derive(|| {
            let timestamp =
                self.timestamp.filter(|&ts| ApfsTime::in_range(ts))?;
            Some(NormalizedTimestamp::from_nanoseconds(timestamp))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_copy_from_string() {
        let mut pt = PosixTime::default();
        assert_eq!(pt.timestamp(), None);

        pt.copy_from_string("2010-08-12").unwrap();
        assert_eq!(pt.timestamp(), Some(1281571200));

        pt.copy_from_string("2010-08-12 21:06:31").unwrap();
        assert_eq!(pt.timestamp(), Some(1281647191));

        // The fraction is dropped at second granularity.
        pt.copy_from_string("2010-08-12 21:06:31.546875").unwrap();
        assert_eq!(pt.timestamp(), Some(1281647191));

        pt.copy_from_string("2010-08-12 21:06:31.546875-01:00").unwrap();
        assert_eq!(pt.timestamp(), Some(1281647191 + 3600));

        // A failed copy leaves the previous value in place.
        assert!(pt.copy_from_string("not a date").is_err());
        assert_eq!(pt.timestamp(), Some(1281647191 + 3600));
    }

    #[test]
    fn posix_outputs() {
        let pt = PosixTime::new(1281643591);
        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("2010-08-12 20:06:31"),
        );
        assert_eq!(pt.to_stat_time(), Some((1281643591, 0)));
        assert_eq!(pt.normalized_timestamp().unwrap().to_string(), "1281643591");
        assert_eq!(pt.date(), Some((2010, 8, 12)));
        assert_eq!(pt.to_posix_microseconds(), Some(1281643591000000));
        assert_eq!(pt.precision(), Precision::Seconds);
        assert!(!pt.is_local_time());

        let unset = PosixTime::default();
        assert_eq!(unset.copy_to_string(), None);
        assert_eq!(unset.to_stat_time(), None);
        assert_eq!(unset.normalized_timestamp(), None);
        assert_eq!(unset.date(), None);
        assert_eq!(unset.sort_position(), None);
    }

    #[test]
    fn posix_before_epoch() {
        let pt = PosixTime::new(-117600);
        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("1969-12-30 15:20:00"),
        );
        assert_eq!(pt.date(), Some((1969, 12, 30)));
    }

    #[test]
    fn milliseconds_round_trip() {
        let mut pt = PosixTimeInMilliseconds::default();
        pt.copy_from_string("2010-08-12 20:06:31.546").unwrap();
        assert_eq!(pt.timestamp(), Some(1281643591546));

        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("2010-08-12 20:06:31.546"),
        );
        assert_eq!(pt.to_stat_time(), Some((1281643591, 5460000)));
        assert_eq!(
            pt.normalized_timestamp().unwrap().to_string(),
            "1281643591.546",
        );
        assert_eq!(pt.to_posix_microseconds(), Some(1281643591546000));
        assert_eq!(pt.precision(), Precision::Milliseconds);

        // A six digit fraction floors to milliseconds.
        pt.copy_from_string("2010-08-12 20:06:31.546875").unwrap();
        assert_eq!(pt.timestamp(), Some(1281643591546));
    }

    #[test]
    fn milliseconds_before_epoch() {
        let pt = PosixTimeInMilliseconds::new(-117_600_000);
        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("1969-12-30 15:20:00.000"),
        );
        // Floor seconds, non-negative remainder.
        let pt = PosixTimeInMilliseconds::new(-1_500);
        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("1969-12-31 23:59:58.500"),
        );
        assert_eq!(pt.to_stat_time(), Some((-2, 5_000_000)));
    }

    #[test]
    fn microseconds_round_trip() {
        let mut pt = PosixTimeInMicroseconds::default();
        pt.copy_from_string("2010-08-12 20:06:31.546875").unwrap();
        assert_eq!(pt.timestamp(), Some(1281643591546875));

        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("2010-08-12 20:06:31.546875"),
        );
        assert_eq!(pt.to_stat_time(), Some((1281643591, 5468750)));
        assert_eq!(
            pt.normalized_timestamp().unwrap().to_string(),
            "1281643591.546875",
        );
        assert_eq!(pt.to_posix_microseconds(), Some(1281643591546875));
        assert_eq!(pt.precision(), Precision::Microseconds);
    }

    #[test]
    fn microsecond_fractions_without_an_exact_f64_form() {
        // 0.000249 is not exactly representable in binary; the rendered
        // string must still carry the microseconds as stored.
        let mut pt = PosixTimeInMicroseconds::default();
        pt.copy_from_string("2010-08-12 21:06:31.000249").unwrap();
        assert_eq!(pt.timestamp(), Some(1281647191000249));
        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("2010-08-12 21:06:31.000249"),
        );

        let pt = PosixTimeInMicroseconds::new(1281647191000489);
        assert_eq!(
            pt.copy_to_string().as_deref(),
            Some("2010-08-12 21:06:31.000489"),
        );
    }

    #[test]
    fn java_is_epoch_millis() {
        let jt = JavaTime::new(1281643591546);
        assert_eq!(
            jt.copy_to_string().as_deref(),
            Some("2010-08-12 20:06:31.546"),
        );
        assert_eq!(jt.precision(), Precision::Milliseconds);
    }

    #[test]
    fn apfs_outputs() {
        let at = ApfsTime::new(1281643591987654321);
        assert_eq!(
            at.copy_to_string().as_deref(),
            Some("2010-08-12 20:06:31.987654321"),
        );
        assert_eq!(
            at.normalized_timestamp().unwrap().to_string(),
            "1281643591.987654321",
        );
        assert_eq!(at.to_stat_time(), Some((1281643591, 9876543)));
        assert_eq!(at.to_posix_microseconds(), Some(1281643591987654));
        assert_eq!(at.date(), Some((2010, 8, 12)));
        assert_eq!(at.precision(), Precision::Nanoseconds);
    }

    #[test]
    fn apfs_copy_from_string() {
        let mut at = ApfsTime::default();
        at.copy_from_string("2010-08-12 21:06:31.546875").unwrap();
        assert_eq!(at.timestamp(), Some(1281647191546875000));

        // Later than 2262-04-11 16:47:16.854775807.
        let err = at.copy_from_string("2554-07-21 23:34:34").unwrap_err();
        assert!(err.is_range());
        assert_eq!(at.timestamp(), Some(1281647191546875000));
    }

    quickcheck::quickcheck! {
        // The moduli keep the count within about 126 years of the epoch,
        // so the year stays positive and four digits wide.
        fn prop_seconds_string_round_trip(timestamp: i64) -> bool {
            let timestamp = timestamp % 4_000_000_000;
            let pt = PosixTime::new(timestamp);
            let string = pt.copy_to_string().unwrap();
            let mut back = PosixTime::default();
            back.copy_from_string(&string).unwrap();
            back.timestamp() == Some(timestamp)
        }

        fn prop_milliseconds_string_round_trip(timestamp: i64) -> bool {
            let timestamp = timestamp % 4_000_000_000_000;
            let pt = PosixTimeInMilliseconds::new(timestamp);
            let string = pt.copy_to_string().unwrap();
            let mut back = PosixTimeInMilliseconds::default();
            back.copy_from_string(&string).unwrap();
            back.timestamp() == Some(timestamp)
        }

        fn prop_microseconds_string_round_trip(timestamp: i64) -> bool {
            let timestamp = timestamp % 4_000_000_000_000_000;
            let pt = PosixTimeInMicroseconds::new(timestamp);
            let string = pt.copy_to_string().unwrap();
            let mut back = PosixTimeInMicroseconds::default();
            back.copy_from_string(&string).unwrap();
            back.timestamp() == Some(timestamp)
        }
    }

    #[test]
    fn apfs_degrades_below_the_signed_floor() {
        // 1600-01-01 is fine as a copy-in but underflows the on-disk
        // signed 64-bit count, so every output degrades.
        let mut at = ApfsTime::default();
        at.copy_from_string("1600-01-01 00:00:00").unwrap();
        assert!(at.timestamp().unwrap() < i128::from(i64::MIN));
        assert_eq!(at.copy_to_string(), None);
        assert_eq!(at.normalized_timestamp(), None);
        assert_eq!(at.to_stat_time(), None);
        assert_eq!(at.date(), None);
    }
}
