/*!
A registry mapping format tags to date-time value constructors.

Artifact definitions name their timestamp encodings with short tags
("filetime", "hfs"). A [`FormatRegistry`] turns a tag into a fresh unset
value to copy the artifact's data into. The registry is a plain value
the caller builds and passes around; there is no global one, so tools
can register their own formats without affecting each other.
*/

use std::collections::BTreeMap;

use crate::{
    filetime::Filetime,
    golang::GolangTime,
    hfs::HfsTime,
    posix::{ApfsTime, JavaTime, PosixTime, PosixTimeInMicroseconds},
    rfc2579::Rfc2579DateTime,
    value::DateTimeValue,
};

/// Constructs a fresh unset value for a registered format.
pub type FormatConstructor = fn() -> Box<dyn DateTimeValue>;

/// A map from format tag to value constructor.
///
/// # Example
///
/// ```
/// use forensic_time::FormatRegistry;
///
/// let registry = FormatRegistry::new();
/// let mut value = registry.create("posix").unwrap();
/// value.copy_from_string("2010-08-12 20:06:31")?;
/// assert_eq!(value.to_stat_time(), Some((1281643591, 0)));
/// # Ok::<(), forensic_time::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct FormatRegistry {
    constructors: BTreeMap<&'static str, FormatConstructor>,
}

impl FormatRegistry {
    /// Creates a registry holding the built-in formats.
    pub fn new() -> FormatRegistry {
        let mut registry =
            FormatRegistry { constructors: BTreeMap::new() };
        registry.register("apfs", || Box::<ApfsTime>::default());
        registry.register("filetime", || Box::<Filetime>::default());
        registry.register("golang", || Box::<GolangTime>::default());
        registry.register("hfs", || Box::<HfsTime>::default());
        registry.register("java", || Box::<JavaTime>::default());
        registry.register("posix", || Box::<PosixTime>::default());
        registry.register("posix_ms", || Box::<JavaTime>::default());
        registry
            .register("posix_us", || Box::<PosixTimeInMicroseconds>::default());
        registry.register("rfc2579", || Box::<Rfc2579DateTime>::default());
        debug!(
            "built format registry with {count} formats",
            count = registry.constructors.len(),
        );
        registry
    }

    /// Registers a constructor under a tag, replacing any previous one.
    pub fn register(
        &mut self,
        tag: &'static str,
        constructor: FormatConstructor,
    ) {
        self.constructors.insert(tag, constructor);
    }

    /// Creates a fresh unset value for a tag, `None` for an unknown
    /// tag.
    pub fn create(&self, tag: &str) -> Option<Box<dyn DateTimeValue>> {
        let constructor = self.constructors.get(tag)?;
        Some(constructor())
    }

    /// Returns the registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }
}

impl Default for FormatRegistry {
    fn default() -> FormatRegistry {
        FormatRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{precision::Precision, semantic::SemanticTime};

    #[test]
    fn built_in_tags() {
        let registry = FormatRegistry::new();
        let tags: Vec<&str> = registry.tags().collect();
        assert_eq!(
            tags,
            [
                "apfs", "filetime", "golang", "hfs", "java", "posix",
                "posix_ms", "posix_us", "rfc2579",
            ],
        );
    }

    #[test]
    fn create_starts_unset() {
        let registry = FormatRegistry::new();
        for tag in registry.tags() {
            let value = registry.create(tag).unwrap();
            assert_eq!(value.copy_to_string(), None, "{tag} starts set");
            assert_eq!(value.normalized_timestamp(), None);
        }
        assert!(registry.create("fat").is_none());
    }

    #[test]
    fn created_values_have_their_format_semantics() {
        let registry = FormatRegistry::new();

        let mut value = registry.create("filetime").unwrap();
        assert_eq!(value.precision(), Precision::HundredNanoseconds);
        value.copy_from_string("2010-08-12 20:06:31.546875").unwrap();
        assert_eq!(
            value.copy_to_string().as_deref(),
            Some("2010-08-12 20:06:31.5468750"),
        );

        let mut value = registry.create("hfs").unwrap();
        assert_eq!(value.precision(), Precision::Seconds);
        assert!(value.copy_from_string("1899-12-31 00:00:00").is_err());
    }

    #[test]
    fn callers_can_register_their_own() {
        let mut registry = FormatRegistry::new();
        registry.register("never", || Box::new(SemanticTime::never()));
        let value = registry.create("never").unwrap();
        assert_eq!(value.copy_to_string().as_deref(), Some("Never"));

        // Replacing a built-in is allowed too.
        registry.register("posix", || Box::new(SemanticTime::not_set()));
        let value = registry.create("posix").unwrap();
        assert_eq!(value.copy_to_string().as_deref(), Some("Not set"));
    }
}
