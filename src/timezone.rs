//! Converts the configured canonical timezone name into a UTC offset.

use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if the timezone name is not recognised.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current wall clock time in `canonical_timezone`.
pub fn local_now(canonical_timezone: &str) -> Option<PrimitiveDateTime> {
    let offset = get_local_offset(canonical_timezone)?;
    let now = OffsetDateTime::now_utc().to_offset(offset);

    Some(PrimitiveDateTime::new(now.date(), now.time()))
}
