/*!
The Windows FILETIME timestamp.

A FILETIME is an unsigned 64-bit count of 100 nanosecond ticks since
1601-01-01 00:00:00 UTC, stored on disk as two little-endian 32-bit
halves. NTFS, the registry and most of the Win32 API record times this
way.
*/

use crate::{
    calendar::{self, Epoch},
    error::{range_err, Error},
    fmt::{self, DateTimeString},
    precision::Precision,
    value::{DateTimeValue, NormalizedCache, NormalizedTimestamp},
};

const FILETIME_EPOCH: Epoch = Epoch::new(1601, 1, 1);

/// Seconds between 1601-01-01 and the Unix epoch.
const FILETIME_TO_POSIX_BASE: i128 = 11_644_473_600;

const TICKS_PER_SECOND: i128 = 10_000_000;

/// A count of 100 nanosecond ticks since 1601-01-01 00:00:00 UTC.
///
/// The native slot is wider than the on-disk field so that a count
/// outside the unsigned 64-bit range can still be held; such a value
/// degrades every output to `None` rather than failing.
///
/// # Example
///
/// ```
/// use forensic_time::{DateTimeValue, Filetime};
///
/// let ft = Filetime::new(0x01cb3a59db45afce);
/// assert_eq!(
///     ft.copy_to_string().as_deref(),
///     Some("2010-08-12 20:06:31.5468750"),
/// );
/// assert_eq!(ft.to_stat_time(), Some((1281643591, 5468750)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Filetime {
    timestamp: Option<i128>,
    cache: NormalizedCache,
}

impl Filetime {
    /// Creates a set value from a tick count.
    pub fn new(timestamp: i128) -> Filetime {
        Filetime {
            timestamp: Some(timestamp),
            cache: NormalizedCache::default(),
        }
    }

    /// Decodes the canonical little-endian on-disk form.
    pub fn from_le_bytes(bytes: [u8; 8]) -> Filetime {
        let timestamp = u64::from_le_bytes(bytes);
        trace!("decoded little-endian FILETIME tick count {timestamp}");
        Filetime::new(i128::from(timestamp))
    }

    /// Decodes the big-endian variant some artifacts carry.
    pub fn from_be_bytes(bytes: [u8; 8]) -> Filetime {
        let timestamp = u64::from_be_bytes(bytes);
        trace!("decoded big-endian FILETIME tick count {timestamp}");
        Filetime::new(i128::from(timestamp))
    }

    /// Returns the native tick count, `None` when unset.
    pub fn timestamp(&self) -> Option<i128> {
        self.timestamp
    }

    fn in_range(timestamp: i128) -> bool {
        (0..=i128::from(u64::MAX)).contains(&timestamp)
    }
}

impl DateTimeValue for Filetime {
    fn precision(&self) -> Precision {
        Precision::HundredNanoseconds
    }

    /// Rejects years before 1601, which a FILETIME cannot express.
    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let parsed = DateTimeString::parse(string.as_bytes())?;
        if parsed.year < 1601 {
            return Err(range_err!(
                "year value {year} is out of bounds, a FILETIME cannot \
                 express years before 1601",
                year = parsed.year,
            ));
        }
        let seconds =
            i128::from(parsed.unix_seconds()?) + FILETIME_TO_POSIX_BASE;
        let timestamp =
            (seconds * 1_000_000 + i128::from(parsed.microseconds())) * 10;
        self.timestamp = Some(timestamp);
        self.cache.reset();
        Ok(())
    }

    /// Renders with the full seven digit tick remainder.
    fn copy_to_string(&self) -> Option<String> {
        let timestamp =
            self.timestamp.filter(|&ts| Filetime::in_range(ts))?;
        let seconds = (timestamp / TICKS_PER_SECOND) as i64;
        let remainder = (timestamp % TICKS_PER_SECOND) as i64;
        let (days, hours, minutes, seconds) = calendar::time_values(seconds);
        let (year, month, day_of_month) =
            calendar::date_values(days, FILETIME_EPOCH).ok()?;
        let base = fmt::date_time_string(
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
        );
        Some(format!("{base}.{remainder:07}"))
    }

    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        self.cache.get_or_derive(|| {
            let timestamp =
                self.timestamp.filter(|&ts| Filetime::in_range(ts))?;
            Some(NormalizedTimestamp::from_nanoseconds(
                (timestamp - FILETIME_TO_POSIX_BASE * TICKS_PER_SECOND) * 100,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_from_string() {
        let mut ft = Filetime::default();
        ft.copy_from_string("2010-08-12 20:06:31.546875").unwrap();
        assert_eq!(ft.timestamp(), Some(129261171915468750));

        ft.copy_from_string("2010-08-12 21:06:31.546875").unwrap();
        assert_eq!(ft.timestamp(), Some(129261207915468750));

        ft.copy_from_string("2010-08-12").unwrap();
        assert_eq!(ft.timestamp(), Some(129260448000000000));

        // The offset moves the stored count.
        ft.copy_from_string("2010-08-12 21:06:31.546875-01:00").unwrap();
        assert_eq!(ft.timestamp(), Some(129261207915468750 + 36_000_000_000));
    }

    #[test]
    fn copy_from_string_rejects_pre_1601() {
        let mut ft = Filetime::default();
        let err = ft.copy_from_string("1500-01-02 00:00:00").unwrap_err();
        assert!(err.is_range());
        assert_eq!(ft.timestamp(), None);
    }

    #[test]
    fn outputs() {
        let ft = Filetime::new(0x01cb3a59db45afce);
        assert_eq!(
            ft.copy_to_string().as_deref(),
            Some("2010-08-12 20:06:31.5468750"),
        );
        assert_eq!(ft.to_stat_time(), Some((1281643591, 5468750)));
        assert_eq!(
            ft.normalized_timestamp().unwrap().to_string(),
            "1281643591.546875",
        );
        assert_eq!(ft.date(), Some((2010, 8, 12)));
        assert_eq!(ft.to_posix_microseconds(), Some(1281643591546875));
        assert_eq!(ft.precision(), Precision::HundredNanoseconds);
        assert!(!ft.is_local_time());
    }

    #[test]
    fn epoch_tick() {
        // Tick zero is the FILETIME epoch itself.
        let ft = Filetime::new(0);
        assert_eq!(
            ft.copy_to_string().as_deref(),
            Some("1601-01-01 00:00:00.0000000"),
        );
        assert_eq!(ft.to_stat_time(), Some((-11644473600, 0)));
    }

    #[test]
    fn out_of_range_counts_degrade() {
        // One past the on-disk maximum.
        let ft = Filetime::new(i128::from(u64::MAX) + 1);
        assert_eq!(ft.copy_to_string(), None);
        assert_eq!(ft.to_stat_time(), None);
        assert_eq!(ft.normalized_timestamp(), None);
        assert_eq!(ft.date(), None);
        assert_eq!(ft.sort_position(), None);

        let ft = Filetime::new(-1);
        assert_eq!(ft.copy_to_string(), None);
        assert_eq!(ft.normalized_timestamp(), None);

        let unset = Filetime::default();
        assert_eq!(unset.copy_to_string(), None);
        assert_eq!(unset.normalized_timestamp(), None);
    }

    #[test]
    fn byte_decoding() {
        let le = Filetime::from_le_bytes([
            0xce, 0xaf, 0x45, 0xdb, 0x59, 0x3a, 0xcb, 0x01,
        ]);
        assert_eq!(le.timestamp(), Some(0x01cb3a59db45afce));

        let be = Filetime::from_be_bytes([
            0x01, 0xcb, 0x3a, 0x59, 0xdb, 0x45, 0xaf, 0xce,
        ]);
        assert_eq!(be.timestamp(), Some(0x01cb3a59db45afce));
    }

    #[test]
    fn on_disk_maximum() {
        // The last representable tick, deep in the year 60056.
        let ft = Filetime::new(i128::from(u64::MAX));
        assert_eq!(
            ft.copy_to_string().as_deref(),
            Some("60056-06-01 05:36:10.9551615"),
        );
        assert!(ft.normalized_timestamp().is_some());
    }
}
