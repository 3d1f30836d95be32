/*!
Proleptic Gregorian calendar arithmetic shared by every timestamp format.

Everything in this module is a pure function over plain integers. The two
workhorses are [`seconds_from_elements`], which collapses calendar fields
into a flat seconds-since-Unix-epoch count, and [`date_values`], which
inverts a day count relative to an arbitrary [`Epoch`] back into calendar
fields. Both are exact over the whole range the formats in this crate can
express (1601 through 65536 and then some); there is no floating point
anywhere on these paths.
*/

use crate::error::{range_err, Error};

/// Days per month in a non-leap year, January first.
const DAYS_PER_MONTH: [i64; 12] =
    [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// The fixed calendar date a format's numeric timestamp counts from.
///
/// An epoch is expected to name a valid proleptic Gregorian date;
/// [`date_values`] rejects day counts paired with an invalid epoch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Epoch {
    year: i64,
    month: i64,
    day_of_month: i64,
}

impl Epoch {
    /// The Unix epoch, 1970-01-01.
    pub const UNIX: Epoch = Epoch::new(1970, 1, 1);

    /// Creates a new epoch from a year, month and day of month.
    pub const fn new(year: i64, month: i64, day_of_month: i64) -> Epoch {
        Epoch { year, month, day_of_month }
    }

    /// Returns the epoch's year.
    pub const fn year(&self) -> i64 {
        self.year
    }

    /// Returns the epoch's month, `1` through `12`.
    pub const fn month(&self) -> i64 {
        self.month
    }

    /// Returns the epoch's day of month, starting at `1`.
    pub const fn day_of_month(&self) -> i64 {
        self.day_of_month
    }
}

/// Returns true if the year given is a leap year.
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in a month of a specific year.
///
/// This fails with a range error when `month` is not in `1..=12`.
pub fn days_per_month(year: i64, month: i64) -> Result<i64, Error> {
    if !(1..=12).contains(&month) {
        return Err(range_err!(
            "month value {month} is out of bounds, must be in range 1..=12"
        ));
    }
    let mut days = DAYS_PER_MONTH[(month - 1) as usize];
    if month == 2 && is_leap_year(year) {
        days += 1;
    }
    Ok(days)
}

/// Returns the number of days in a specific year, `365` or `366`.
pub fn days_in_year(year: i64) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the number of days in the century containing `year`, `36524` or
/// `36525`.
///
/// Whether a century has the extra day depends on its own leap pattern,
/// which is decided by running the century index through the leap year
/// rule. This fails with a range error when `year` is negative.
pub fn days_in_century(year: i64) -> Result<i64, Error> {
    if year < 0 {
        return Err(range_err!(
            "year value {year} is out of bounds, must not be negative"
        ));
    }
    if is_leap_year(year / 100) {
        Ok(36525)
    } else {
        Ok(36524)
    }
}

/// Returns the 1-based day of the year for a specific day of a month.
///
/// This fails with a range error when the month or day of month is out of
/// bounds for the year given.
pub fn day_of_year(
    year: i64,
    month: i64,
    day_of_month: i64,
) -> Result<i64, Error> {
    let days = days_per_month(year, month)?;
    if day_of_month < 1 || day_of_month > days {
        return Err(range_err!(
            "day of month value {day_of_month} is out of bounds, \
             must be in range 1..={days}"
        ));
    }
    let mut day_of_year = day_of_month;
    for past_month in 1..month {
        day_of_year += days_per_month(year, past_month)?;
    }
    Ok(day_of_year)
}

/// Returns the number of days between the Unix epoch and the date given,
/// negative for dates before 1970-01-01.
///
/// The caller is expected to have validated the month and day of month.
///
/// Ref: http://howardhinnant.github.io/date_algorithms.html
fn days_from_unix_epoch(year: i64, month: i64, day_of_month: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100
        + (153 * shifted_month + 2) / 5
        + day_of_month
        - 1;
    era * 146097 + day_of_era - 719468
}

/// Returns the number of seconds since the Unix epoch for the date and time
/// elements given, negative for dates before 1970-01-01 00:00:00.
///
/// No leap seconds, proleptic Gregorian. This is the common pivot for every
/// format: non-Unix epochs add their own fixed base offset afterward. It
/// fails with a range error when any element is outside its domain
/// (including a zero month or day of month, which cannot name a date).
pub fn seconds_from_elements(
    year: i64,
    month: i64,
    day_of_month: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
) -> Result<i64, Error> {
    let days = days_per_month(year, month)?;
    if day_of_month < 1 || day_of_month > days {
        return Err(range_err!(
            "day of month value {day_of_month} is out of bounds, \
             must be in range 1..={days}"
        ));
    }
    if !(0..=23).contains(&hours) {
        return Err(range_err!(
            "hours value {hours} is out of bounds, must be in range 0..=23"
        ));
    }
    if !(0..=59).contains(&minutes) {
        return Err(range_err!(
            "minutes value {minutes} is out of bounds, must be in range 0..=59"
        ));
    }
    // Leap seconds are unsupported, so 60 is out of bounds too.
    if !(0..=59).contains(&seconds) {
        return Err(range_err!(
            "seconds value {seconds} is out of bounds, must be in range 0..=59"
        ));
    }
    let days = days_from_unix_epoch(year, month, day_of_month);
    Ok(days * SECONDS_PER_DAY + hours * 3600 + minutes * 60 + seconds)
}

/// Splits a flat seconds count into days, hours, minutes and seconds.
///
/// Floor semantics for negative counts: the day count absorbs the sign and
/// the smaller components are always non-negative, so `-1` second becomes
/// one day back at `23:59:59`.
pub fn time_values(number_of_seconds: i64) -> (i64, i64, i64, i64) {
    let number_of_minutes = number_of_seconds.div_euclid(60);
    let seconds = number_of_seconds.rem_euclid(60);
    let number_of_hours = number_of_minutes.div_euclid(60);
    let minutes = number_of_minutes.rem_euclid(60);
    let number_of_days = number_of_hours.div_euclid(24);
    let hours = number_of_hours.rem_euclid(24);
    (number_of_days, hours, minutes, seconds)
}

/// Determines the calendar date for a day count relative to an epoch.
///
/// Negative day counts address dates before the epoch and are handled
/// symmetrically. The count is walked outward in decreasing unit size
/// (century, then year, then month) with direction-aware stepping, so a
/// count of `-1` against a `1970-01-01` epoch lands on `1969-12-31` exactly
/// as `+1` lands on `1970-01-02`. This fails with a range error when the
/// epoch fields are out of bounds.
pub fn date_values(
    number_of_days: i64,
    epoch: Epoch,
) -> Result<(i64, i64, i64), Error> {
    if epoch.year < 0 {
        return Err(range_err!(
            "epoch year value {year} is out of bounds, must not be negative",
            year = epoch.year,
        ));
    }
    let epoch_days_per_month = days_per_month(epoch.year, epoch.month)?;
    if epoch.day_of_month < 1 || epoch.day_of_month > epoch_days_per_month {
        return Err(range_err!(
            "epoch day of month value {day} is out of bounds, \
             must be in range 1..={epoch_days_per_month}",
            day = epoch.day_of_month,
        ));
    }

    // Rebase the count onto January 1 of the epoch year, so both walking
    // directions share one "day offset into `year`" invariant.
    let mut year = epoch.year;
    let mut number_of_days = number_of_days
        + day_of_year(epoch.year, epoch.month, epoch.day_of_month)?
        - 1;

    if number_of_days < 0 {
        // Walk backward, entering the previous century when the boundary is
        // aligned and the whole century fits, otherwise the previous year.
        while number_of_days < 0 {
            if year % 100 == 0 && year >= 100 {
                let days_this_century = days_in_century(year - 100)?;
                if number_of_days + days_this_century <= 0 {
                    year -= 100;
                    number_of_days += days_this_century;
                    continue;
                }
            }
            year -= 1;
            number_of_days += days_in_year(year);
        }
    } else {
        // Walk forward: align with the start of the next century, then take
        // whole centuries, then whole years.
        let remainder = year.rem_euclid(100);
        for _ in remainder..100 {
            let days_this_year = days_in_year(year);
            if number_of_days < days_this_year {
                break;
            }
            number_of_days -= days_this_year;
            year += 1;
        }
        let mut days_this_century = days_in_century(year)?;
        while number_of_days >= days_this_century {
            number_of_days -= days_this_century;
            year += 100;
            days_this_century = days_in_century(year)?;
        }
        while number_of_days >= days_in_year(year) {
            number_of_days -= days_in_year(year);
            year += 1;
        }
    }

    // The remaining offset is within `year`; walk the months.
    let mut month = 1;
    let mut days_this_month = days_per_month(year, month)?;
    while number_of_days >= days_this_month {
        number_of_days -= days_this_month;
        month += 1;
        days_this_month = days_per_month(year, month)?;
    }

    Ok((year, month, number_of_days + 1))
}
