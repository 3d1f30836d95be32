/*!
The date-time value contract shared by every timestamp format.

A [`DateTimeValue`] is a single decoded artifact timestamp. Formats differ
in their native representation (FILETIME ticks, HFS seconds, a Golang
seconds/nanoseconds pair) but they all convert to the same
[`NormalizedTimestamp`], an exact count of nanoseconds since the Unix
epoch, and they all order through the same [`SortPosition`].
*/

use core::{cell::Cell, cmp::Ordering, fmt, str::FromStr};

use crate::{
    calendar::{self, Epoch},
    error::{parse_err, Error},
    precision::Precision,
};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// An exact decimal count of seconds since 1970-01-01 00:00:00 UTC.
///
/// Internally this is an `i128` count of nanoseconds, which covers every
/// format's full range at its native precision with no rounding. Values
/// before the epoch are negative.
///
/// The `Display` form is `seconds.fraction` with trailing zeros trimmed
/// (`1636884149.711098348`, `-0.5`, `1281571200`), and `FromStr` accepts
/// the same shape back.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NormalizedTimestamp {
    nanoseconds: i128,
}

impl NormalizedTimestamp {
    /// Creates a normalized timestamp from whole seconds.
    pub const fn from_seconds(seconds: i64) -> NormalizedTimestamp {
        NormalizedTimestamp {
            nanoseconds: seconds as i128 * NANOS_PER_SECOND,
        }
    }

    /// Creates a normalized timestamp from a nanosecond count.
    pub const fn from_nanoseconds(nanoseconds: i128) -> NormalizedTimestamp {
        NormalizedTimestamp { nanoseconds }
    }

    /// Returns the underlying nanosecond count.
    pub const fn as_nanoseconds(self) -> i128 {
        self.nanoseconds
    }

    /// Returns the whole seconds, rounded toward negative infinity, or
    /// `None` when they do not fit in an `i64`.
    pub fn floor_seconds(self) -> Option<i64> {
        i64::try_from(self.nanoseconds.div_euclid(NANOS_PER_SECOND)).ok()
    }

    /// Returns the sub-second part in nanoseconds, always in
    /// `0..1_000_000_000`.
    pub fn subsecond_nanoseconds(self) -> i64 {
        self.nanoseconds.rem_euclid(NANOS_PER_SECOND) as i64
    }

    /// Converts to the stat-style pair of whole seconds and a remainder
    /// in 100 nanosecond units.
    ///
    /// Returns `None` when the seconds do not fit in an `i64`. The
    /// remainder is non-negative even before the epoch, matching the
    /// floor semantics of the seconds.
    pub fn to_stat_time(self) -> Option<(i64, u32)> {
        let seconds = self.floor_seconds()?;
        let remainder = (self.subsecond_nanoseconds() / 100) as u32;
        Some((seconds, remainder))
    }

    /// Converts to a flat count of microseconds since the Unix epoch,
    /// truncated toward zero, or `None` when it does not fit in an
    /// `i64`.
    pub fn to_posix_microseconds(self) -> Option<i64> {
        i64::try_from(self.nanoseconds / 1_000).ok()
    }
}

impl fmt::Display for NormalizedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.nanoseconds < 0 {
            write!(f, "-")?;
        }
        let magnitude = self.nanoseconds.unsigned_abs();
        let seconds = magnitude / NANOS_PER_SECOND as u128;
        let fraction = (magnitude % NANOS_PER_SECOND as u128) as u64;
        if fraction == 0 {
            return write!(f, "{seconds}");
        }
        let digits = format!("{fraction:09}");
        write!(f, "{seconds}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for NormalizedTimestamp {
    type Err = Error;

    fn from_str(string: &str) -> Result<NormalizedTimestamp, Error> {
        let (sign, unsigned) = match string.strip_prefix('-') {
            Some(unsigned) => (-1, unsigned),
            None => (1, string),
        };
        let (seconds, fraction) = match unsigned.split_once('.') {
            Some((seconds, fraction)) => (seconds, Some(fraction)),
            None => (unsigned, None),
        };
        if seconds.is_empty()
            || !seconds.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(parse_err!(
                "invalid normalized timestamp {string:?}, \
                 expected decimal seconds"
            ));
        }
        let seconds: i128 = seconds.parse().map_err(|_| {
            parse_err!("normalized timestamp {string:?} is too large")
        })?;
        let mut nanoseconds = seconds
            .checked_mul(NANOS_PER_SECOND)
            .ok_or_else(|| {
                parse_err!("normalized timestamp {string:?} is too large")
            })?;
        if let Some(fraction) = fraction {
            if fraction.is_empty()
                || fraction.len() > 9
                || !fraction.bytes().all(|byte| byte.is_ascii_digit())
            {
                return Err(parse_err!(
                    "invalid fraction in normalized timestamp {string:?}, \
                     expected 1 to 9 digits"
                ));
            }
            let mut subsecond: i128 = fraction.parse().map_err(|_| {
                parse_err!("invalid fraction in normalized timestamp {string:?}")
            })?;
            for _ in fraction.len()..9 {
                subsecond *= 10;
            }
            nanoseconds += subsecond;
        }
        Ok(NormalizedTimestamp { nanoseconds: sign * nanoseconds })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NormalizedTimestamp {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NormalizedTimestamp {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NormalizedTimestamp, D::Error> {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = NormalizedTimestamp;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal seconds string")
            }

            fn visit_str<E: serde::de::Error>(
                self,
                value: &str,
            ) -> Result<NormalizedTimestamp, E> {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

/// The lazily derived normalized timestamp slot every format carries.
///
/// A `Cell` keeps derivation `&self` while making the type `!Sync`,
/// which matches the single-owner model: one value per decoded artifact
/// field, never shared across threads. An empty cell means "not derived
/// yet"; a derivation that comes back `None` (out-of-range native value)
/// is not cached, mirroring how an unset value re-derives on every ask.
#[derive(Clone, Debug, Default)]
pub(crate) struct NormalizedCache(Cell<Option<NormalizedTimestamp>>);

impl NormalizedCache {
    /// Returns the cached timestamp, deriving and caching it on first
    /// use.
    pub(crate) fn get_or_derive(
        &self,
        derive: impl FnOnce() -> Option<NormalizedTimestamp>,
    ) -> Option<NormalizedTimestamp> {
        if let Some(cached) = self.0.get() {
            return Some(cached);
        }
        let derived = derive();
        if derived.is_some() {
            self.0.set(derived);
        }
        derived
    }

    /// Invalidates the cache. Every native field mutation calls this.
    pub(crate) fn reset(&self) {
        self.0.set(None);
    }
}

/// Where a value sorts on the shared timeline.
///
/// Semantic placeholders carry a small sort order; concrete values carry
/// their normalized timestamp. The two kinds interleave at a fixed
/// pivot: a semantic order at or below [`SortPosition::SEMANTIC_PIVOT`]
/// sorts before every concrete timestamp, above it after. This puts
/// "Invalid" (1) and "Not set" (2) before all real timestamps and
/// "Never" (99) after them, regardless of magnitude.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortPosition {
    /// A semantic placeholder's sort order.
    Semantic(u8),
    /// A concrete time on the normalized timeline.
    Concrete(NormalizedTimestamp),
}

impl SortPosition {
    /// The semantic sort order at which concrete timestamps slot in.
    pub const SEMANTIC_PIVOT: u8 = 50;
}

impl Ord for SortPosition {
    fn cmp(&self, other: &SortPosition) -> Ordering {
        use SortPosition::*;
        match (self, other) {
            (Semantic(a), Semantic(b)) => a.cmp(b),
            (Concrete(a), Concrete(b)) => a.cmp(b),
            (Semantic(order), Concrete(_)) => {
                if *order <= SortPosition::SEMANTIC_PIVOT {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Concrete(_), Semantic(order)) => {
                if *order <= SortPosition::SEMANTIC_PIVOT {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        }
    }
}

impl PartialOrd for SortPosition {
    fn partial_cmp(&self, other: &SortPosition) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A timestamp decoded from some forensic artifact.
///
/// Every format implements this contract. A value has exactly two
/// states, unset and set; it becomes set through a typed constructor or
/// through [`DateTimeValue::copy_from_string`], and the output-side
/// operations degrade to `None` whenever the value is unset or outside
/// the format's representable range. Output never fails with an error.
pub trait DateTimeValue {
    /// The granularity of the native timestamp.
    fn precision(&self) -> Precision;

    /// Returns true when the value is in local time rather than UTC.
    fn is_local_time(&self) -> bool {
        false
    }

    /// Parses a date-time string and replaces the native value.
    ///
    /// This is atomic: parsing and conversion happen on temporaries, so
    /// an error leaves the previous value (set or unset) untouched.
    fn copy_from_string(&mut self, string: &str) -> Result<(), Error>;

    /// Renders the native value as a date-time string, `None` when unset
    /// or out of range.
    fn copy_to_string(&self) -> Option<String>;

    /// The exact position on the shared timeline, `None` when unset or
    /// out of range.
    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp>;

    /// Converts to whole POSIX seconds plus a remainder in 100
    /// nanosecond units.
    fn to_stat_time(&self) -> Option<(i64, u32)> {
        self.normalized_timestamp()?.to_stat_time()
    }

    /// Returns the calendar date, as `(year, month, day_of_month)`.
    fn date(&self) -> Option<(i64, i64, i64)> {
        let seconds = self.normalized_timestamp()?.floor_seconds()?;
        let (days, _, _, _) = calendar::time_values(seconds);
        calendar::date_values(days, Epoch::UNIX).ok()
    }

    /// Converts to a flat count of POSIX microseconds, truncated toward
    /// zero. Kept for downstream consumers that predate the stat pair.
    fn to_posix_microseconds(&self) -> Option<i64> {
        self.normalized_timestamp()?.to_posix_microseconds()
    }

    /// Where this value sorts relative to any other date-time value.
    fn sort_position(&self) -> Option<SortPosition> {
        self.normalized_timestamp().map(SortPosition::Concrete)
    }
}

/// Compares two date-time values of any format on the shared timeline.
///
/// Returns `None` when either side has no sort position, that is, when
/// it is unset or its native value is out of range.
pub fn compare(
    a: &dyn DateTimeValue,
    b: &dyn DateTimeValue,
) -> Option<Ordering> {
    let (a, b) = (a.sort_position()?, b.sort_position()?);
    Some(a.cmp(&b))
}
