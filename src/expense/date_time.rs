//! Conversions between expense date-times and their ISO-8601 text form.
//!
//! Date-times are stored as local ISO-8601 strings such as
//! "2024-03-01T10:00:00". Rows written by older versions may hold no
//! date-time or text that does not parse, so reads produce a
//! [StoredDateTime] rather than failing.

use rusqlite::types::{FromSql, FromSqlResult, ValueRef};
use time::{
    PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::Error;

/// The shapes accepted for an ISO local date-time, most precise first.
///
/// Browsers submit `datetime-local` inputs without seconds when the seconds
/// are zero.
const ISO_LOCAL_DATE_TIME_FORMATS: [&[BorrowedFormatItem<'static>]; 3] = [
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];

/// The date-time column of an expense as it was found in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredDateTime {
    /// A well-formed ISO local date-time.
    Valid(PrimitiveDateTime),
    /// Text that could not be parsed, kept as-is.
    Invalid(String),
    /// The column was NULL.
    Missing,
}

impl StoredDateTime {
    /// Interpret the text of a date-time column.
    pub fn from_text(raw_date_time: &str) -> Self {
        match parse_date_time(raw_date_time) {
            Ok(date_time) => StoredDateTime::Valid(date_time),
            Err(_) => StoredDateTime::Invalid(raw_date_time.to_owned()),
        }
    }

    /// The parsed date-time, if the stored value was valid.
    pub fn valid(&self) -> Option<PrimitiveDateTime> {
        match self {
            StoredDateTime::Valid(date_time) => Some(*date_time),
            StoredDateTime::Invalid(_) | StoredDateTime::Missing => None,
        }
    }
}

impl From<PrimitiveDateTime> for StoredDateTime {
    fn from(date_time: PrimitiveDateTime) -> Self {
        StoredDateTime::Valid(date_time)
    }
}

impl FromSql for StoredDateTime {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(StoredDateTime::Missing),
            ValueRef::Text(bytes) => Ok(StoredDateTime::from_text(&String::from_utf8_lossy(
                bytes,
            ))),
            other => Ok(StoredDateTime::Invalid(format!("{other:?}"))),
        }
    }
}

/// Parse an ISO local date-time, e.g. "2024-03-01T10:00" or "2024-03-01T10:00:00".
///
/// # Errors
///
/// Returns an [Error::ParseError] if `raw_date_time` is not an ISO local date-time.
pub fn parse_date_time(raw_date_time: &str) -> Result<PrimitiveDateTime, Error> {
    ISO_LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(raw_date_time, format).ok())
        .ok_or_else(|| Error::ParseError(format!("date-time \"{raw_date_time}\"")))
}

/// Format `date_time` the way it is stored, e.g. "2024-03-01T10:00:00".
///
/// The same format is used for the value of `datetime-local` inputs.
pub fn format_date_time(date_time: &PrimitiveDateTime) -> String {
    format!("{}T{}", format_date(date_time), format_time(date_time))
}

/// The calendar date of `date_time`, e.g. "2024-03-01".
pub fn format_date(date_time: &PrimitiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date_time.year(),
        u8::from(date_time.month()),
        date_time.day()
    )
}

/// The time of day of `date_time` to the second, e.g. "10:00:00".
pub fn format_time(date_time: &PrimitiveDateTime) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        date_time.hour(),
        date_time.minute(),
        date_time.second()
    )
}
