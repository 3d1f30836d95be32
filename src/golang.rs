/*!
The serialized Golang `time.Time` timestamp.

Go's `time.Time` marshals to a versioned big-endian struct: a version
byte (1 or 2), a signed 64-bit count of seconds since 0001-01-01
00:00:00 UTC, a signed 32-bit nanosecond fraction and a signed 16-bit
time zone offset in minutes, where `-1` marks "no location", that is,
UTC. Version 2 appends a signed 8-bit seconds-of-offset byte.
*/

use crate::{
    calendar::{self, Epoch},
    error::{parse_err, Error},
    fmt::{self, DateTimeString, NanoDateTimeString},
    precision::Precision,
    util::parse,
    value::{DateTimeValue, NormalizedCache, NormalizedTimestamp},
};

const GOLANG_EPOCH: Epoch = Epoch::new(1, 1, 1);

/// Seconds between 0001-01-01 and the Unix epoch.
const GOLANG_TO_POSIX_BASE: i64 = 62_135_596_800;

/// The time zone offset marking "no location", that is, UTC.
const NO_LOCATION: i16 = -1;

#[derive(Clone, Copy, Debug)]
struct Fields {
    seconds: i64,
    nanoseconds: i32,
    utc_offset_minutes: i16,
    utc_offset_seconds: i8,
}

/// A deserialized Golang `time.Time` value.
///
/// The version 2 seconds-of-offset byte is decoded and kept but not yet
/// combined into the normalized timestamp.
///
/// # Example
///
/// ```
/// use forensic_time::{DateTimeValue, GolangTime};
///
/// let gt = GolangTime::new(63772480949, 711098348, -1);
/// assert_eq!(
///     gt.normalized_timestamp().unwrap().to_string(),
///     "1636884149.711098348",
/// );
/// assert!(!gt.is_local_time());
/// ```
#[derive(Clone, Debug, Default)]
pub struct GolangTime {
    fields: Option<Fields>,
    cache: NormalizedCache,
}

impl GolangTime {
    /// Creates a set value from the deserialized fields.
    pub fn new(
        seconds: i64,
        nanoseconds: i32,
        utc_offset_minutes: i16,
    ) -> GolangTime {
        let fields = Fields {
            seconds,
            nanoseconds,
            utc_offset_minutes,
            utc_offset_seconds: 0,
        };
        GolangTime {
            fields: Some(fields),
            cache: NormalizedCache::default(),
        }
    }

    /// Decodes the marshaled form, 15 bytes for version 1 or 16 bytes
    /// for version 2.
    pub fn from_bytes(bytes: &[u8]) -> Result<GolangTime, Error> {
        let (&version, rest) = bytes.split_first().ok_or_else(|| {
            parse_err!("serialized Golang time.Time value is empty")
        })?;
        let expected_len = match version {
            1 => 14,
            2 => 15,
            _ => {
                return Err(parse_err!(
                    "unsupported serialized Golang time.Time version {version}"
                ));
            }
        };
        if rest.len() != expected_len {
            return Err(parse_err!(
                "serialized version {version} Golang time.Time value must \
                 be {len} bytes, but got {got}",
                len = expected_len + 1,
                got = bytes.len(),
            ));
        }
        let (seconds, rest) = parse::split(rest, 8)
            .expect("length checked above");
        let (nanoseconds, rest) = parse::split(rest, 4)
            .expect("length checked above");
        let (offset_minutes, rest) = parse::split(rest, 2)
            .expect("length checked above");
        let fields = Fields {
            seconds: i64::from_be_bytes(seconds.try_into().unwrap()),
            nanoseconds: i32::from_be_bytes(nanoseconds.try_into().unwrap()),
            utc_offset_minutes: i16::from_be_bytes(
                offset_minutes.try_into().unwrap(),
            ),
            utc_offset_seconds: rest.first().map_or(0, |&byte| byte as i8),
        };
        trace!(
            "decoded version {version} Golang time.Time value: \
             seconds={seconds}, nanoseconds={nanoseconds}, \
             offset minutes={offset}",
            seconds = fields.seconds,
            nanoseconds = fields.nanoseconds,
            offset = fields.utc_offset_minutes,
        );
        Ok(GolangTime {
            fields: Some(fields),
            cache: NormalizedCache::default(),
        })
    }

    /// Returns the native count of seconds since 0001-01-01, `None`
    /// when unset.
    pub fn seconds(&self) -> Option<i64> {
        self.fields.map(|fields| fields.seconds)
    }

    /// Returns the nanosecond fraction, `None` when unset.
    pub fn nanoseconds(&self) -> Option<i32> {
        self.fields.map(|fields| fields.nanoseconds)
    }

    /// Returns the time zone offset in minutes, `None` when unset.
    pub fn utc_offset_minutes(&self) -> Option<i16> {
        self.fields.map(|fields| fields.utc_offset_minutes)
    }

    /// Returns the version 2 seconds-of-offset, zero for version 1
    /// values, `None` when unset.
    pub fn utc_offset_seconds(&self) -> Option<i8> {
        self.fields.map(|fields| fields.utc_offset_seconds)
    }
}

impl DateTimeValue for GolangTime {
    fn precision(&self) -> Precision {
        Precision::Nanoseconds
    }

    /// True when the value carries a location, that is, when the offset
    /// is anything but the `-1` sentinel.
    fn is_local_time(&self) -> bool {
        self.fields
            .is_some_and(|fields| fields.utc_offset_minutes != NO_LOCATION)
    }

    /// Accepts both grammars: the canonical one, and the nanosecond one
    /// when the date is followed by a literal `T`.
    ///
    /// The stored seconds are always UTC. A written offset is resolved
    /// into them and kept as the value's location; a string without an
    /// offset parses as "no location".
    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let bytes = string.as_bytes();
        let fields = if bytes.get(10) == Some(&b'T') {
            let parsed = NanoDateTimeString::parse(bytes)?;
            Fields {
                seconds: parsed.unix_seconds()? + GOLANG_TO_POSIX_BASE,
                nanoseconds: parsed.nanoseconds as i32,
                utc_offset_minutes: NO_LOCATION,
                utc_offset_seconds: 0,
            }
        } else {
            let parsed = DateTimeString::parse(bytes)?;
            let utc_offset_minutes = match parsed
                .time
                .and_then(|time| time.utc_offset_minutes)
            {
                None => NO_LOCATION,
                Some(minutes) => minutes as i16,
            };
            Fields {
                seconds: parsed.unix_seconds()? + GOLANG_TO_POSIX_BASE,
                nanoseconds: (parsed.microseconds() * 1_000) as i32,
                utc_offset_minutes,
                utc_offset_seconds: 0,
            }
        };
        self.fields = Some(fields);
        self.cache.reset();
        Ok(())
    }

    /// Renders with a six digit microsecond fraction.
    fn copy_to_string(&self) -> Option<String> {
        let fields = self.fields.filter(|fields| fields.seconds >= 0)?;
        let seconds = fields.seconds
            + i64::from(fields.nanoseconds).div_euclid(1_000_000_000);
        let microseconds =
            i64::from(fields.nanoseconds).rem_euclid(1_000_000_000) / 1_000;
        let (days, hours, minutes, seconds) = calendar::time_values(seconds);
        let (year, month, day_of_month) =
            calendar::date_values(days, GOLANG_EPOCH).ok()?;
        let base = fmt::date_time_string(
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
        );
        Some(format!("{base}.{microseconds:06}"))
    }

    /// `None` for values before the Unix epoch or with a negative
    /// fraction; Go itself never marshals either.
    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        self.cache.get_or_derive(|| {
            let fields = self.fields.filter(|fields| {
                fields.seconds >= GOLANG_TO_POSIX_BASE
                    && fields.nanoseconds >= 0
            })?;
            Some(NormalizedTimestamp::from_nanoseconds(
                i128::from(fields.seconds - GOLANG_TO_POSIX_BASE)
                    * 1_000_000_000
                    + i128::from(fields.nanoseconds),
            ))
        })
    }
}
