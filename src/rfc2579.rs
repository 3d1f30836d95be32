/*!
The RFC 2579 `DateAndTime` value.

SNMP's `DateAndTime` textual convention spells a timestamp out field by
field: year, month, day, hours, minutes, seconds, deciseconds, and a
direction-plus-offset from UTC. This module takes the decoded tuple, not
raw octets; wire decoding belongs to the SNMP layer.
*/

use crate::{
    calendar::{self, Epoch},
    error::{range_err, Error},
    precision::Precision,
    value::{DateTimeValue, NormalizedCache, NormalizedTimestamp},
};

/// Which side of UTC the offset lies on.
///
/// RFC 2579 spells this as a `+` or `-` octet; a tagged enum makes an
/// invalid direction unrepresentable instead of a tenth field to
/// validate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UtcDirection {
    /// East of UTC; the offset is subtracted to reach UTC.
    Plus,
    /// West of UTC; the offset is added to reach UTC.
    Minus,
}

#[derive(Clone, Copy, Debug)]
struct Fields {
    year: i64,
    month: i64,
    day_of_month: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    deciseconds: i64,
    /// UTC seconds since the Unix epoch, offset already folded in.
    number_of_seconds: i64,
}

/// An RFC 2579 `DateAndTime`, decisecond precision.
///
/// The UTC offset is folded into the stored seconds at construction;
/// the calendar fields are kept as given for display.
///
/// # Example
///
/// ```
/// use forensic_time::{DateTimeValue, Rfc2579DateTime, UtcDirection};
///
/// let dt = Rfc2579DateTime::new(
///     2010, 8, 12, 20, 6, 31, 6, UtcDirection::Plus, 0, 0,
/// )?;
/// assert_eq!(dt.copy_to_string().as_deref(), Some("2010-08-12 20:06:31.6"));
/// assert_eq!(dt.to_stat_time(), Some((1281643591, 6000000)));
/// # Ok::<(), forensic_time::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rfc2579DateTime {
    fields: Option<Fields>,
    cache: NormalizedCache,
}

impl Rfc2579DateTime {
    /// Creates a set value from a decoded `DateAndTime` tuple.
    ///
    /// Every field is validated in wire order and the first violation
    /// wins. A seconds value of 60 (a leap second on the wire) is
    /// rejected, since the normalized timeline cannot express it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i64,
        month: i64,
        day_of_month: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        deciseconds: i64,
        direction: UtcDirection,
        hours_from_utc: i64,
        minutes_from_utc: i64,
    ) -> Result<Rfc2579DateTime, Error> {
        if !(0..=65536).contains(&year) {
            return Err(range_err!(
                "year value {year} is out of bounds, \
                 must be in range 0..=65536"
            ));
        }
        // Month, day of month, hours, minutes and seconds are validated
        // here, in wire order.
        let number_of_seconds = calendar::seconds_from_elements(
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
        )?;
        if !(0..=9).contains(&deciseconds) {
            return Err(range_err!(
                "deciseconds value {deciseconds} is out of bounds, \
                 must be in range 0..=9"
            ));
        }
        if !(0..=13).contains(&hours_from_utc) {
            return Err(range_err!(
                "hours from UTC value {hours_from_utc} is out of bounds, \
                 must be in range 0..=13"
            ));
        }
        if !(0..=59).contains(&minutes_from_utc) {
            return Err(range_err!(
                "minutes from UTC value {minutes_from_utc} is out of \
                 bounds, must be in range 0..=59"
            ));
        }
        let offset_minutes = match direction {
            UtcDirection::Plus => hours_from_utc * 60 + minutes_from_utc,
            UtcDirection::Minus => -(hours_from_utc * 60 + minutes_from_utc),
        };
        let fields = Fields {
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
            deciseconds,
            number_of_seconds: number_of_seconds - offset_minutes * 60,
        };
        Ok(Rfc2579DateTime {
            fields: Some(fields),
            cache: NormalizedCache::default(),
        })
    }

    /// Returns the year as given, `None` when unset.
    pub fn year(&self) -> Option<i64> {
        self.fields.map(|fields| fields.year)
    }

    /// Returns the month as given, `None` when unset.
    pub fn month(&self) -> Option<i64> {
        self.fields.map(|fields| fields.month)
    }

    /// Returns the day of month as given, `None` when unset.
    pub fn day_of_month(&self) -> Option<i64> {
        self.fields.map(|fields| fields.day_of_month)
    }

    /// Returns the deciseconds, `None` when unset.
    pub fn deciseconds(&self) -> Option<i64> {
        self.fields.map(|fields| fields.deciseconds)
    }
}

impl DateTimeValue for Rfc2579DateTime {
    fn precision(&self) -> Precision {
        Precision::Deciseconds
    }

    /// The calendar fields are re-derived in UTC, so a string with an
    /// offset stores fields an offset away from the written ones.
    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        let parsed = crate::fmt::DateTimeString::parse(string.as_bytes())?;
        let number_of_seconds = parsed.unix_seconds()?;
        let (days, hours, minutes, seconds) =
            calendar::time_values(number_of_seconds);
        let (year, month, day_of_month) =
            calendar::date_values(days, Epoch::UNIX)?;
        if !(0..=65536).contains(&year) {
            return Err(range_err!(
                "year value {year} is out of bounds, \
                 must be in range 0..=65536"
            ));
        }
        self.fields = Some(Fields {
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
            deciseconds: parsed.microseconds() / 100_000,
            number_of_seconds,
        });
        self.cache.reset();
        Ok(())
    }

    /// Renders the fields as given with the single decisecond digit.
    fn copy_to_string(&self) -> Option<String> {
        let fields = self.fields?;
        Some(format!(
            "{year:04}-{month:02}-{day:02} \
             {hours:02}:{minutes:02}:{seconds:02}.{deciseconds:01}",
            year = fields.year,
            month = fields.month,
            day = fields.day_of_month,
            hours = fields.hours,
            minutes = fields.minutes,
            seconds = fields.seconds,
            deciseconds = fields.deciseconds,
        ))
    }

    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        self.cache.get_or_derive(|| {
            let fields = self.fields?;
            Some(NormalizedTimestamp::from_nanoseconds(
                i128::from(fields.number_of_seconds) * 1_000_000_000
                    + i128::from(fields.deciseconds) * 100_000_000,
            ))
        })
    }
}
