/*!
Semantic placeholder values for artifact fields with no real timestamp.

Forensic artifacts routinely store markers instead of times: a password
that never expires, a field the tool could not decode, a value that was
simply never written. A [`SemanticTime`] stands in for those so that a
column of timestamps still sorts coherently.
*/

use crate::{
    error::Error,
    precision::Precision,
    value::{DateTimeValue, NormalizedTimestamp, SortPosition},
};

/// A placeholder standing in for a timestamp that is not a time.
///
/// A semantic value carries display text and a sort order. The built-in
/// orders put "Invalid" (1) and "Not set" (2) before every concrete
/// timestamp and "Never" (99) after them; custom placeholders made with
/// [`SemanticTime::new`] take the pivot order (50) and also sort before
/// concrete values.
///
/// # Example
///
/// ```
/// use forensic_time::{compare, DateTimeValue, PosixTime, SemanticTime};
///
/// let never = SemanticTime::never();
/// let concrete = PosixTime::new(1281643591);
/// assert_eq!(
///     compare(&never, &concrete),
///     Some(core::cmp::Ordering::Greater),
/// );
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SemanticTime {
    text: String,
    sort_order: u8,
}

impl SemanticTime {
    /// Creates a custom placeholder with the default sort order.
    pub fn new(text: impl Into<String>) -> SemanticTime {
        SemanticTime {
            text: text.into(),
            sort_order: SortPosition::SEMANTIC_PIVOT,
        }
    }

    /// The placeholder for a value the source stored but this crate
    /// could not interpret.
    pub fn invalid() -> SemanticTime {
        SemanticTime { text: String::from("Invalid"), sort_order: 1 }
    }

    /// The placeholder for a value the source never wrote.
    pub fn not_set() -> SemanticTime {
        SemanticTime { text: String::from("Not set"), sort_order: 2 }
    }

    /// The placeholder for an event that will never happen, sorting
    /// after every concrete timestamp.
    pub fn never() -> SemanticTime {
        SemanticTime { text: String::from("Never"), sort_order: 99 }
    }

    /// Returns the display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the sort order.
    pub fn sort_order(&self) -> u8 {
        self.sort_order
    }
}

impl DateTimeValue for SemanticTime {
    /// A placeholder has no sub-second fraction to report.
    fn precision(&self) -> Precision {
        Precision::Seconds
    }

    /// Replaces the display text. Placeholders accept any text, so this
    /// never fails.
    fn copy_from_string(&mut self, string: &str) -> Result<(), Error> {
        self.text = string.to_string();
        Ok(())
    }

    fn copy_to_string(&self) -> Option<String> {
        Some(self.text.clone())
    }

    fn normalized_timestamp(&self) -> Option<NormalizedTimestamp> {
        None
    }

    /// Placeholders report zero for downstream consumers that expect a
    /// number for every row.
    fn to_posix_microseconds(&self) -> Option<i64> {
        Some(0)
    }

    fn sort_position(&self) -> Option<SortPosition> {
        Some(SortPosition::Semantic(self.sort_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::compare;
    use core::cmp::Ordering;

    #[test]
    fn built_in_placeholders() {
        let invalid = SemanticTime::invalid();
        assert_eq!(invalid.text(), "Invalid");
        assert_eq!(invalid.sort_order(), 1);

        let not_set = SemanticTime::not_set();
        assert_eq!(not_set.text(), "Not set");
        assert_eq!(not_set.sort_order(), 2);

        let never = SemanticTime::never();
        assert_eq!(never.text(), "Never");
        assert_eq!(never.sort_order(), 99);

        let custom = SemanticTime::new("Expired");
        assert_eq!(custom.text(), "Expired");
        assert_eq!(custom.sort_order(), 50);
    }

    #[test]
    fn contract() {
        let mut value = SemanticTime::not_set();
        assert_eq!(value.copy_to_string().as_deref(), Some("Not set"));
        assert_eq!(value.normalized_timestamp(), None);
        assert_eq!(value.to_stat_time(), None);
        assert_eq!(value.date(), None);
        assert_eq!(value.to_posix_microseconds(), Some(0));
        assert_eq!(value.sort_position(), Some(SortPosition::Semantic(2)));
        assert!(!value.is_local_time());

        value.copy_from_string("No timestamp recorded").unwrap();
        assert_eq!(
            value.copy_to_string().as_deref(),
            Some("No timestamp recorded"),
        );
    }

    #[test]
    fn placeholders_order_among_themselves() {
        let invalid = SemanticTime::invalid();
        let not_set = SemanticTime::not_set();
        let never = SemanticTime::never();
        assert_eq!(compare(&invalid, &not_set), Some(Ordering::Less));
        assert_eq!(compare(&not_set, &never), Some(Ordering::Less));
        assert_eq!(compare(&never, &never), Some(Ordering::Equal));
    }
}
