/*!
The HFS and HFS+ timestamp.

An unsigned 32-bit count of seconds since 1904-01-01 00:00:00, stored
big-endian on disk. HFS keeps it in local time, HFS+ in UTC; this type
does not try to guess which and reports UTC, the HFS+ convention.
*/

use crate::{
    calendar::{self, Epoch},
    error::{range_err, Error},
    fmt::{self, DateTimeString},
    precision::Precision,
    value::{DateTimeValue, NormalizedCache, NormalizedTimestamp},
};

const HFS_EPOCH: Epoch = Epoch::new(1904, 1, 1);

/// Seconds between 1904-01-01 and the Unix epoch.
const HFS_TO_POSIX_BASE: i64 = 2_082_844_800;

/// A count of seconds since 1904-01-01 00:00:00.
///
/// The unsigned 32-bit on-disk field tops out at 2040-02-06 06:28:15,
/// so `copy_from_string` restricts years to 1904 through 2040. A native
/// count outside the on-disk range degrades every output to `None`.
#[derive(Clone, Debug, Default)]
pub struct HfsTime {
    timestamp: Option<i64>,
    cache: NormalizedCache,
}

impl HfsTime {
    /// Creates a set value from a second count.
    pub fn new(timestamp: i64) -> HfsTime {
        HfsTime {
            timestamp: Some(timestamp),
            cache: NormalizedCache::default(),
        }
    }

    /// Decodes the big-endian on-disk form.
    pub fn from_be_bytes(bytes: [u8; 4]) -> HfsTime {
        let timestamp = u32::from_be_bytes(bytes);
        trace!("decoded big-endian HFS second count {timestamp}");
        HfsTime::new(i64::from(timestamp))
    }

    /// Returns the native second count, `None` when unset.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    fn in_range(timestamp: i64) -> bool {
        (0..=i64::from(u32::MAX)).contains(&timestamp)
    }
}

impl DateTimeValue for HfsTime {
    fn precision(&self) -> Precision {
        Precision::Seconds
    }

    /// Rejects years outside 1904 through 2040, the bounds of the
    /// unsigned 32-bit count. The fraction of a second, if any, is
    /// dropped.
    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let parsed = DateTimeString::parse(string.as_bytes())?;
        if !(1904..=2040).contains(&parsed.year) {
            return Err(range_err!(
                "year value {year} is out of bounds, an HFS time can only \
                 express years 1904 through 2040",
                year = parsed.year,
            ));
        }
        let timestamp = parsed.unix_seconds()? + HFS_TO_POSIX_BASE;
        self.timestamp = Some(timestamp);
        self.cache.reset();
        Ok(())
    }

    fn copy_to_string(&self) -> Option<String> {
        let timestamp = self.timestamp.filter(|&ts| HfsTime::in_range(ts))?;
        let (days, hours, minutes, seconds) = calendar::time_values(timestamp);
        let (year, month, day_of_month) =
            calendar::date_values(days, HFS_EPOCH).ok()?;
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
            let timestamp =
                self.timestamp.filter(|&ts| HfsTime::in_range(ts))?;
            Some(NormalizedTimestamp::from_seconds(
                timestamp - HFS_TO_POSIX_BASE,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_from_string() {
        let mut ht = HfsTime::default();
        ht.copy_from_string("2013-08-01 15:25:28").unwrap();
        assert_eq!(ht.timestamp(), Some(3458215528));

        // Fraction dropped at second granularity.
        ht.copy_from_string("2013-08-01 15:25:28.546875").unwrap();
        assert_eq!(ht.timestamp(), Some(3458215528));

        ht.copy_from_string("2013-08-01 15:25:28-01:00").unwrap();
        assert_eq!(ht.timestamp(), Some(3458215528 + 3600));
    }

    #[test]
    fn copy_from_string_rejects_out_of_range_years() {
        let mut ht = HfsTime::default();
        assert!(ht
            .copy_from_string("1899-12-31 00:00:00")
            .unwrap_err()
            .is_range());
        assert!(ht
            .copy_from_string("2041-01-01 00:00:00")
            .unwrap_err()
            .is_range());
        assert_eq!(ht.timestamp(), None);
    }

    #[test]
    fn outputs() {
        let ht = HfsTime::new(3458215528);
        assert_eq!(
            ht.copy_to_string().as_deref(),
            Some("2013-08-01 15:25:28"),
        );
        assert_eq!(ht.to_stat_time(), Some((1375370728, 0)));
        assert_eq!(
            ht.normalized_timestamp(),
            Some(NormalizedTimestamp::from_seconds(1375370728)),
        );
        assert_eq!(ht.date(), Some((2013, 8, 1)));
        assert_eq!(ht.to_posix_microseconds(), Some(1375370728000000));
        assert_eq!(ht.precision(), Precision::Seconds);
    }

    #[test]
    fn range_ends() {
        let ht = HfsTime::new(0);
        assert_eq!(
            ht.copy_to_string().as_deref(),
            Some("1904-01-01 00:00:00"),
        );

        let ht = HfsTime::new(i64::from(u32::MAX));
        assert_eq!(
            ht.copy_to_string().as_deref(),
            Some("2040-02-06 06:28:15"),
        );
    }

    #[test]
    fn out_of_range_counts_degrade() {
        let ht = HfsTime::new(i64::from(u32::MAX) + 1);
        assert_eq!(ht.copy_to_string(), None);
        assert_eq!(ht.normalized_timestamp(), None);
        assert_eq!(ht.to_stat_time(), None);
        assert_eq!(ht.date(), None);

        let ht = HfsTime::new(-1);
        assert_eq!(ht.normalized_timestamp(), None);
    }

    #[test]
    fn byte_decoding() {
        let ht = HfsTime::from_be_bytes([0xce, 0x24, 0x0e, 0x68]);
        assert_eq!(ht.timestamp(), Some(0xce240e68));
    }

    quickcheck::quickcheck! {
        // Every unsigned 32-bit count names a year in 1904..=2040, so
        // the rendered string always parses back.
        fn prop_string_round_trip(timestamp: u32) -> bool {
            let ht = HfsTime::new(i64::from(timestamp));
            let string = ht.copy_to_string().unwrap();
            let mut back = HfsTime::default();
            back.copy_from_string(&string).unwrap();
            back.timestamp() == Some(i64::from(timestamp))
        }
    }
}
