/*!
Parsing and printing of the canonical date-time string grammars.

Two grammars live here. The canonical one,
`YYYY-MM-DD[ hh:mm:ss[.FFF|.FFFFFF][(+|-)hh:mm]]`, is shared by every
format's `copy_from_string`. The stricter nanosecond one,
`YYYY-MM-DDThh:mm:ss.NNNNNNNNNZ`, carries nine fraction digits for the
formats whose native precision exceeds microseconds.

Both parsers are recursive descent over raw bytes. Since every field is
fixed width, "descent" mostly means peeling a known number of bytes off
the front and insisting on the separator that follows. Malformed input is
a parse error, a well-formed field with an impossible value is a range
error, and either way the offending input is echoed back escaped.
*/

use crate::{
    calendar,
    error::{parse_err, range_err, Error},
    util::{escape, parse},
};

/// The result of parsing one field out of a byte string.
///
/// Parsing a field never consumes more than it needs, so the unconsumed
/// `input` is handed to the next field's parser.
#[derive(Debug)]
struct Parsed<'i, T> {
    /// The value parsed.
    value: T,
    /// The remaining unparsed input.
    input: &'i [u8],
}

/// The time-of-day half of a parsed date-time string.
///
/// The optional pieces stay `None` when the input omits them. In
/// particular a missing fraction is distinct from `.000000`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeOfDay {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// The fraction of a second in microseconds. A three digit fraction
    /// is scaled by `1_000`.
    pub microseconds: Option<i64>,
    /// The UTC offset as written, in minutes. `+01:00` is `60`.
    pub utc_offset_minutes: Option<i64>,
}

/// A date-time string parsed from the canonical grammar.
///
/// ```text
/// YYYY-MM-DD[ hh:mm:ss[.FFF|.FFFFFF][(+|-)hh:mm]]
/// ```
///
/// The time of day, fraction and UTC offset are each optional. All fields
/// are in the time zone the string was written in; [`DateTimeString::unix_seconds`]
/// resolves them to UTC.
///
/// # Example
///
/// ```
/// use forensic_time::fmt::DateTimeString;
///
/// let dts = DateTimeString::parse(b"2010-08-12 21:06:31.546875-01:00")?;
/// assert_eq!(dts.year, 2010);
/// assert_eq!(dts.time.unwrap().microseconds, Some(546875));
/// assert_eq!(dts.time.unwrap().utc_offset_minutes, Some(-60));
/// assert_eq!(dts.unix_seconds()?, 1281647191 + 3600);
/// # Ok::<(), forensic_time::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateTimeString {
    pub year: i64,
    pub month: i64,
    pub day_of_month: i64,
    pub time: Option<TimeOfDay>,
}

impl DateTimeString {
    /// Parses a date-time string from the canonical grammar.
    pub fn parse(input: &[u8]) -> Result<DateTimeString, Error> {
        let Parsed { value: (year, month, day_of_month), input: rest } =
            parse_date(input)?;
        if rest.is_empty() {
            return Ok(DateTimeString { year, month, day_of_month, time: None });
        }
        if rest[0] != b' ' {
            return Err(parse_err!(
                "expected space as date and time separator in \
                 {string:?}, but found {got:?}",
                string = escape::Bytes(input),
                got = escape::Bytes(&rest[..1]),
            ));
        }
        let Parsed { value: time, input: rest } = parse_time(&rest[1..])?;
        if !rest.is_empty() {
            return Err(parse_err!(
                "unparsed input {unparsed:?} remains after date-time string",
                unparsed = escape::Bytes(rest),
            ));
        }
        Ok(DateTimeString { year, month, day_of_month, time: Some(time) })
    }

    /// Resolves the parsed fields to seconds since the Unix epoch.
    ///
    /// A written UTC offset is subtracted once, so `+01:00` lands an hour
    /// of seconds earlier than the same local fields written as UTC.
    pub fn unix_seconds(&self) -> Result<i64, Error> {
        let time = self.time.unwrap_or(TimeOfDay {
            hours: 0,
            minutes: 0,
            seconds: 0,
            microseconds: None,
            utc_offset_minutes: None,
        });
        let seconds = calendar::seconds_from_elements(
            self.year,
            self.month,
            self.day_of_month,
            time.hours,
            time.minutes,
            time.seconds,
        )?;
        Ok(seconds - time.utc_offset_minutes.unwrap_or(0) * 60)
    }

    /// Returns the parsed fraction in microseconds, zero when absent.
    pub fn microseconds(&self) -> i64 {
        self.time.and_then(|time| time.microseconds).unwrap_or(0)
    }
}

/// A date-time string parsed from the nanosecond grammar.
///
/// ```text
/// YYYY-MM-DDThh:mm:ss.NNNNNNNNNZ
/// ```
///
/// Exactly nine fraction digits, a literal `T` separator and a literal
/// `Z`. There is no offset; the fields are always UTC.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NanoDateTimeString {
    pub year: i64,
    pub month: i64,
    pub day_of_month: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub nanoseconds: i64,
}

impl NanoDateTimeString {
    /// Parses a date-time string from the nanosecond grammar.
    pub fn parse(input: &[u8]) -> Result<NanoDateTimeString, Error> {
        let Parsed { value: (year, month, day_of_month), input: rest } =
            parse_date(input)?;
        let Parsed { value: (), input: rest } = parse_literal(rest, b'T')?;
        let Parsed { value: hours, input: rest } =
            parse_unit(rest, 2, "hours", 0..=23)?;
        let Parsed { value: (), input: rest } = parse_literal(rest, b':')?;
        let Parsed { value: minutes, input: rest } =
            parse_unit(rest, 2, "minutes", 0..=59)?;
        let Parsed { value: (), input: rest } = parse_literal(rest, b':')?;
        let Parsed { value: seconds, input: rest } =
            parse_unit(rest, 2, "seconds", 0..=59)?;
        let Parsed { value: (), input: rest } = parse_literal(rest, b'.')?;
        let Parsed { value: nanoseconds, input: rest } =
            parse_unit(rest, 9, "nanoseconds", 0..=999_999_999)?;
        let Parsed { value: (), input: rest } = parse_literal(rest, b'Z')?;
        if !rest.is_empty() {
            return Err(parse_err!(
                "unparsed input {unparsed:?} remains after date-time string",
                unparsed = escape::Bytes(rest),
            ));
        }
        Ok(NanoDateTimeString {
            year,
            month,
            day_of_month,
            hours,
            minutes,
            seconds,
            nanoseconds,
        })
    }

    /// Resolves the parsed fields to seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> Result<i64, Error> {
        calendar::seconds_from_elements(
            self.year,
            self.month,
            self.day_of_month,
            self.hours,
            self.minutes,
            self.seconds,
        )
    }
}

/// Renders date and time elements as `YYYY-MM-DD hh:mm:ss`.
///
/// Callers append their own fraction. Fields are zero padded and the
/// year is at least four digits (wider years render with more).
pub(crate) fn date_time_string(
    year: i64,
    month: i64,
    day_of_month: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
) -> String {
    format!(
        "{year:04}-{month:02}-{day_of_month:02} \
         {hours:02}:{minutes:02}:{seconds:02}"
    )
}

/// Parses the leading `YYYY-MM-DD` and validates it as a calendar date.
fn parse_date(input: &[u8]) -> Result<Parsed<'_, (i64, i64, i64)>, Error> {
    let Parsed { value: year, input: rest } =
        parse_unit(input, 4, "year", 0..=i64::MAX)?;
    let Parsed { value: (), input: rest } = parse_literal(rest, b'-')?;
    let Parsed { value: month, input: rest } =
        parse_unit(rest, 2, "month", 1..=12)?;
    let Parsed { value: (), input: rest } = parse_literal(rest, b'-')?;
    let days_per_month = calendar::days_per_month(year, month)?;
    let Parsed { value: day_of_month, input: rest } =
        parse_unit(rest, 2, "day of month", 1..=days_per_month)?;
    Ok(Parsed { value: (year, month, day_of_month), input: rest })
}

/// Parses the `hh:mm:ss[.FFF|.FFFFFF][(+|-)hh:mm]` tail.
fn parse_time(input: &[u8]) -> Result<Parsed<'_, TimeOfDay>, Error> {
    let Parsed { value: hours, input: rest } =
        parse_unit(input, 2, "hours", 0..=23)?;
    let Parsed { value: (), input: rest } = parse_literal(rest, b':')?;
    let Parsed { value: minutes, input: rest } =
        parse_unit(rest, 2, "minutes", 0..=59)?;
    let Parsed { value: (), input: rest } = parse_literal(rest, b':')?;
    // Leap seconds are unsupported, so :60 is out of bounds here too.
    let Parsed { value: seconds, input: rest } =
        parse_unit(rest, 2, "seconds", 0..=59)?;
    let Parsed { value: microseconds, input: rest } = parse_fraction(rest)?;
    let Parsed { value: utc_offset_minutes, input: rest } =
        parse_utc_offset(rest)?;
    let value = TimeOfDay {
        hours,
        minutes,
        seconds,
        microseconds,
        utc_offset_minutes,
    };
    Ok(Parsed { value, input: rest })
}

/// Parses an optional `.FFF` or `.FFFFFF` fraction into microseconds.
///
/// Any other number of digits is a parse error. Three digits scale by
/// `1_000`, so `.546` and `.546000` parse to the same value.
fn parse_fraction(input: &[u8]) -> Result<Parsed<'_, Option<i64>>, Error> {
    if input.first() != Some(&b'.') {
        return Ok(Parsed { value: None, input });
    }
    let rest = &input[1..];
    let digits = rest
        .iter()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    // `digits` counts bytes already present, so this cannot panic.
    let (fraction, rest) = rest.split_at(digits);
    if digits != 3 && digits != 6 {
        return Err(parse_err!(
            "fraction {fraction:?} must have exactly 3 or 6 digits, \
             but has {digits}",
            fraction = escape::Bytes(fraction),
        ));
    }
    let mut microseconds = parse::i64(fraction)?;
    if digits == 3 {
        microseconds *= 1_000;
    }
    Ok(Parsed { value: Some(microseconds), input: rest })
}

/// Parses an optional `(+|-)hh:mm` UTC offset into signed minutes.
///
/// The offset is returned as written: `+01:00` parses to `60`. Resolving
/// it against the local fields is the caller's business.
fn parse_utc_offset(input: &[u8]) -> Result<Parsed<'_, Option<i64>>, Error> {
    let sign = match input.first() {
        Some(&b'+') => 1,
        Some(&b'-') => -1,
        _ => return Ok(Parsed { value: None, input }),
    };
    let Parsed { value: hours, input: rest } =
        parse_unit(&input[1..], 2, "UTC offset hours", 0..=14)?;
    let Parsed { value: (), input: rest } = parse_literal(rest, b':')?;
    let Parsed { value: minutes, input: rest } =
        parse_unit(rest, 2, "UTC offset minutes", 0..=59)?;
    let value = Some(sign * (hours * 60 + minutes));
    Ok(Parsed { value, input: rest })
}

/// Parses a fixed-width run of digits and checks it against a range.
///
/// A missing or non-digit field is a parse error; a well-formed value
/// outside `allowed` is a range error.
fn parse_unit<'i>(
    input: &'i [u8],
    width: usize,
    what: &'static str,
    allowed: core::ops::RangeInclusive<i64>,
) -> Result<Parsed<'i, i64>, Error> {
    let (digits, rest) = parse::split(input, width).ok_or_else(|| {
        parse_err!(
            "expected {width} digit {what}, but only {len} bytes remain \
             in {string:?}",
            len = input.len(),
            string = escape::Bytes(input),
        )
    })?;
    let value = parse::i64(digits).map_err(|_| {
        parse_err!(
            "failed to parse {what} from {digits:?}",
            digits = escape::Bytes(digits),
        )
    })?;
    if !allowed.contains(&value) {
        return Err(range_err!(
            "{what} value {value} is out of bounds, \
             must be in range {start}..={end}",
            start = allowed.start(),
            end = allowed.end(),
        ));
    }
    Ok(Parsed { value, input: rest })
}

/// Consumes a single expected literal byte.
fn parse_literal(input: &[u8], literal: u8) -> Result<Parsed<'_, ()>, Error> {
    match input.first() {
        Some(&byte) if byte == literal => {
            Ok(Parsed { value: (), input: &input[1..] })
        }
        Some(_) => Err(parse_err!(
            "expected separator {literal:?}, but found {got:?}",
            literal = escape::Bytes(&[literal]),
            got = escape::Bytes(&input[..1]),
        )),
        None => Err(parse_err!(
            "expected separator {literal:?}, but input ended",
            literal = escape::Bytes(&[literal]),
        )),
    }
}
