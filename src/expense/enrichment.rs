//! Derives the display fields of an expense row.
//!
//! The expense list and the filter results share [enrich], so legacy rows
//! with a missing category or a broken date-time render the same way in both.

use crate::expense::{
    ExpenseId, ExpenseRecord, StoredDateTime,
    date_time::{format_date, format_time},
};

pub const NO_CATEGORY: &str = "No Category";
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";
pub const NO_DATE: &str = "No Date Provided";
pub const NO_TIME: &str = "No Time Provided";
pub const INVALID_DATE: &str = "Invalid Date";
pub const INVALID_TIME: &str = "Invalid Time";

/// An expense row with its display-only fields filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseListItem {
    pub id: ExpenseId,
    pub amount: f64,
    pub description: String,
    pub category_name: String,
    pub date: String,
    pub time: String,
}

/// Label the category and split the date-time of `record` for display.
pub fn enrich(record: ExpenseRecord) -> ExpenseListItem {
    let category_name = match (record.category_id, record.category_name) {
        (None, _) => NO_CATEGORY.to_owned(),
        (Some(_), None) => UNKNOWN_CATEGORY.to_owned(),
        (Some(_), Some(name)) => name,
    };

    let (date, time) = match record.date_time {
        StoredDateTime::Valid(date_time) => (format_date(&date_time), format_time(&date_time)),
        StoredDateTime::Invalid(_) => (INVALID_DATE.to_owned(), INVALID_TIME.to_owned()),
        StoredDateTime::Missing => (NO_DATE.to_owned(), NO_TIME.to_owned()),
    };

    ExpenseListItem {
        id: record.id,
        amount: record.amount,
        description: record.description,
        category_name,
        date,
        time,
    }
}

#[cfg(test)]
mod enrich_tests {
    use time::macros::datetime;

    use crate::expense::{ExpenseRecord, StoredDateTime};

    use super::{
        ExpenseListItem, INVALID_DATE, INVALID_TIME, NO_CATEGORY, NO_DATE, NO_TIME,
        UNKNOWN_CATEGORY, enrich,
    };

    fn record(
        category_id: Option<i64>,
        category_name: Option<&str>,
        date_time: StoredDateTime,
    ) -> ExpenseRecord {
        ExpenseRecord {
            id: 7,
            amount: 42.5,
            date_time,
            description: "Taxi".to_owned(),
            category_id,
            category_name: category_name.map(str::to_owned),
        }
    }

    #[test]
    fn enriches_valid_record() {
        let got = enrich(record(
            Some(1),
            Some("Travel"),
            StoredDateTime::Valid(datetime!(2024-03-01 10:00:00)),
        ));

        assert_eq!(
            got,
            ExpenseListItem {
                id: 7,
                amount: 42.5,
                description: "Taxi".to_owned(),
                category_name: "Travel".to_owned(),
                date: "2024-03-01".to_owned(),
                time: "10:00:00".to_owned(),
            }
        );
    }

    #[test]
    fn missing_category_is_labelled() {
        let got = enrich(record(None, None, StoredDateTime::Missing));

        assert_eq!(got.category_name, NO_CATEGORY);
    }

    #[test]
    fn dangling_category_is_labelled() {
        let got = enrich(record(Some(99), None, StoredDateTime::Missing));

        assert_eq!(got.category_name, UNKNOWN_CATEGORY);
    }

    #[test]
    fn missing_date_time_is_labelled() {
        let got = enrich(record(Some(1), Some("Food"), StoredDateTime::Missing));

        assert_eq!(got.date, NO_DATE);
        assert_eq!(got.time, NO_TIME);
    }

    #[test]
    fn invalid_date_time_is_labelled() {
        let got = enrich(record(
            Some(1),
            Some("Food"),
            StoredDateTime::Invalid("03/01/2024".to_owned()),
        ));

        assert_eq!(got.date, INVALID_DATE);
        assert_eq!(got.time, INVALID_TIME);
    }
}
