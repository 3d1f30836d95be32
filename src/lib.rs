/*!
Converts timestamp encodings found in forensic artifacts into
human-readable strings and exactly ordered values.

Operating systems, filesystems and runtimes each store time their own
way: Windows counts 100 nanosecond ticks since 1601 ([`Filetime`]), HFS
counts seconds since 1904 ([`HfsTime`]), Go marshals a versioned struct
counting from year 1 ([`GolangTime`]), SNMP spells the calendar fields
out one octet at a time ([`Rfc2579DateTime`]). This crate decodes each
of them, renders the canonical `YYYY-MM-DD hh:mm:ss.fraction` string,
and projects everything onto one exact timeline, the
[`NormalizedTimestamp`], so that values from different sources sort
together. Fields that hold a marker instead of a time ("Never", "Not
set") participate in that order through [`SemanticTime`].

# Example

Decode a FILETIME, print it, and order it against other values:

```
use forensic_time::{compare, DateTimeValue, Filetime, SemanticTime};

let ft = Filetime::from_le_bytes([
    0xce, 0xaf, 0x45, 0xdb, 0x59, 0x3a, 0xcb, 0x01,
]);
assert_eq!(
    ft.copy_to_string().as_deref(),
    Some("2010-08-12 20:06:31.5468750"),
);
assert_eq!(ft.to_stat_time(), Some((1281643591, 5468750)));

// "Never" sorts after every concrete timestamp.
let never = SemanticTime::never();
assert_eq!(compare(&ft, &never), Some(core::cmp::Ordering::Less));
```

Or go through the [`FormatRegistry`] when the format is chosen by an
artifact definition at runtime:

```
use forensic_time::FormatRegistry;

let registry = FormatRegistry::new();
let mut value = registry.create("hfs").unwrap();
value.copy_from_string("2013-08-01 15:25:28")?;
assert_eq!(value.to_posix_microseconds(), Some(1375370728000000));
# Ok::<(), forensic_time::Error>(())
```

# Semantics

All arithmetic is proleptic Gregorian with no leap seconds, over plain
integers; there is no floating point between a native timestamp and its
normalized form. Out-of-range values degrade: a value whose native
count cannot express a time returns `None` from every output operation
rather than failing. Copy-in operations are atomic, so a failed parse
leaves the previous value untouched.

# Crate features

* **logging** - Enables logging of binary decode and registry activity
via the `log` crate.
* **serde** - Enables `Serialize` and `Deserialize` implementations for
[`NormalizedTimestamp`], as a decimal seconds string.
*/

#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

pub use crate::{
    error::Error,
    filetime::Filetime,
    golang::GolangTime,
    hfs::HfsTime,
    posix::{
        ApfsTime, JavaTime, PosixTime, PosixTimeInMicroseconds,
        PosixTimeInMilliseconds,
    },
    precision::{Precision, PrecisionHelper},
    registry::{FormatConstructor, FormatRegistry},
    rfc2579::{Rfc2579DateTime, UtcDirection},
    semantic::SemanticTime,
    value::{compare, DateTimeValue, NormalizedTimestamp, SortPosition},
};

#[macro_use]
mod logging;

pub mod calendar;
mod error;
mod filetime;
pub mod fmt;
mod golang;
mod hfs;
mod posix;
mod precision;
mod registry;
mod rfc2579;
mod semantic;
mod util;
mod value;
