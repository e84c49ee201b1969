//! Parses the filter form and builds the parameterised expense query.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{CategoryName, get_category_by_name},
    client::ClientId,
    expense::{ExpenseRecord, core::map_record_row},
};

/// The value of the category, year and month selects that disables the predicate.
pub const ALL: &str = "all";

/// The columns selected for an [ExpenseRecord], in the order expected by `map_record_row`.
pub(super) const EXPENSE_RECORD_COLUMNS: &str = "expense.id, expense.amount, expense.date_time, \
    expense.description, expense.category_id, category.name";

/// The raw values submitted with the filter form.
///
/// Every field is optional text so that malformed numbers are reported as
/// parse errors instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterForm {
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

/// The parsed filter criteria. `None` means the predicate is not applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFilter {
    pub category: Option<CategoryName>,
    pub amount_from: f64,
    pub amount_to: f64,
    pub year: Option<i32>,
    pub month: Option<u8>,
}

impl Default for ExpenseFilter {
    fn default() -> Self {
        Self {
            category: None,
            amount_from: 0.0,
            amount_to: f64::MAX,
            year: None,
            month: None,
        }
    }
}

impl ExpenseFilter {
    /// Parse the submitted filter form.
    ///
    /// Empty fields and [ALL] disable the category, year and month
    /// predicates. A missing lower amount defaults to zero and a missing
    /// upper amount to [f64::MAX].
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::ParseError] if an amount, the year or the month is not a number,
    /// - or [Error::ValidationError] if the month is not in 1 to 12, an amount
    ///   is not finite or the lower amount is larger than the upper amount.
    pub fn from_form(form: &FilterForm) -> Result<Self, Error> {
        let category = match selected(&form.category) {
            Some(name) => Some(CategoryName::new(name)?),
            None => None,
        };

        let amount_from = parse_amount(&form.from, "minimum amount")?.unwrap_or(0.0);
        let amount_to = parse_amount(&form.to, "maximum amount")?.unwrap_or(f64::MAX);

        if amount_from > amount_to {
            return Err(Error::ValidationError(format!(
                "the minimum amount {amount_from} is larger than the maximum amount {amount_to}"
            )));
        }

        let year = selected(&form.year)
            .map(|year| {
                year.parse::<i32>()
                    .map_err(|_| Error::ParseError(format!("year \"{year}\"")))
            })
            .transpose()?;

        let month = selected(&form.month)
            .map(|month| {
                month
                    .parse::<u8>()
                    .map_err(|_| Error::ParseError(format!("month \"{month}\"")))
            })
            .transpose()?;

        if let Some(month) = month.filter(|month| !(1..=12).contains(month)) {
            return Err(Error::ValidationError(format!(
                "the month {month} is not between 1 and 12"
            )));
        }

        Ok(Self {
            category,
            amount_from,
            amount_to,
            year,
            month,
        })
    }
}

/// The trimmed value of a select or text input, or `None` if it was left
/// empty or set to [ALL].
fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL))
}

fn parse_amount(value: &Option<String>, label: &str) -> Result<Option<f64>, Error> {
    let Some(raw_amount) = selected(value) else {
        return Ok(None);
    };

    let amount = raw_amount
        .parse::<f64>()
        .map_err(|_| Error::ParseError(format!("{label} \"{raw_amount}\"")))?;

    if !amount.is_finite() {
        return Err(Error::ValidationError(format!(
            "the {label} must be a finite number"
        )));
    }

    Ok(Some(amount))
}

/// Builds a `SELECT` for expense records from predicates with bound parameters.
///
/// Predicates are joined with `AND`. Values are never written into the SQL
/// text, each one gets a numbered placeholder instead.
#[derive(Debug, Default)]
pub(super) struct ExpenseQuery {
    where_clause_parts: Vec<String>,
    query_parameters: Vec<Value>,
}

impl ExpenseQuery {
    /// Only select expenses owned by `client_id`.
    pub(super) fn for_client(client_id: ClientId) -> Self {
        let mut query = Self::default();
        query.push_predicate(
            "expense.client_id = ?",
            vec![Value::Integer(client_id.as_i64())],
        );

        query
    }

    /// Only select expenses with an amount in `from..=to`.
    pub(super) fn amount_between(mut self, from: f64, to: f64) -> Self {
        self.push_predicate(
            "expense.amount BETWEEN ? AND ?",
            vec![Value::Real(from), Value::Real(to)],
        );

        self
    }

    pub(super) fn category_id(mut self, category_id: i64) -> Self {
        self.push_predicate(
            "expense.category_id = ?",
            vec![Value::Integer(category_id)],
        );

        self
    }

    /// Match the first four characters of the stored date-time as an integer.
    ///
    /// Date-times that do not start with `YYYY-` never match.
    pub(super) fn year(mut self, year: i32) -> Self {
        self.push_predicate(
            "(expense.date_time GLOB '[0-9][0-9][0-9][0-9]-*' \
            AND CAST(substr(expense.date_time, 1, 4) AS INTEGER) = ?)",
            vec![Value::Integer(year.into())],
        );

        self
    }

    /// Match characters six and seven of the stored date-time as an integer.
    ///
    /// Date-times that do not start with `YYYY-MM-` never match.
    pub(super) fn month(mut self, month: u8) -> Self {
        self.push_predicate(
            "(expense.date_time GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-*' \
            AND CAST(substr(expense.date_time, 6, 2) AS INTEGER) = ?)",
            vec![Value::Integer(month.into())],
        );

        self
    }

    /// Add a predicate whose `?` markers are replaced, in order, with
    /// numbered placeholders for `values`.
    ///
    /// `predicate` must not use `?` for anything else, e.g. as a GLOB wildcard.
    fn push_predicate(&mut self, predicate: &str, values: Vec<Value>) {
        let mut numbered_predicate = String::with_capacity(predicate.len() + 2 * values.len());
        let mut placeholder_number = self.query_parameters.len();

        for character in predicate.chars() {
            if character == '?' {
                placeholder_number += 1;
                numbered_predicate.push_str(&format!("?{placeholder_number}"));
            } else {
                numbered_predicate.push(character);
            }
        }

        self.query_parameters.extend(values);
        self.where_clause_parts.push(numbered_predicate);
    }

    fn to_sql(&self) -> String {
        let mut query_string_parts = vec![format!(
            "SELECT {EXPENSE_RECORD_COLUMNS} FROM expense \
            LEFT JOIN category ON expense.category_id = category.id"
        )];

        if !self.where_clause_parts.is_empty() {
            query_string_parts
                .push(String::from("WHERE ") + &self.where_clause_parts.join(" AND "));
        }

        query_string_parts.push("ORDER BY expense.id ASC".to_owned());

        query_string_parts.join(" ")
    }

    /// Run the query.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    pub(super) fn execute(&self, connection: &Connection) -> Result<Vec<ExpenseRecord>, Error> {
        let query_string = self.to_sql();
        let params = params_from_iter(self.query_parameters.iter());

        connection
            .prepare(&query_string)?
            .query_map(params, map_record_row)?
            .map(|record_result| record_result.map_err(Error::SqlError))
            .collect()
    }
}

/// Get all of the expenses owned by `client_id` in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is a SQL error.
pub fn get_expense_records_by_client(
    client_id: ClientId,
    connection: &Connection,
) -> Result<Vec<ExpenseRecord>, Error> {
    ExpenseQuery::for_client(client_id).execute(connection)
}

/// Get the expenses owned by `client_id` that match every criterion in `filter`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidReference] if the category in `filter` does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn find_filtered_expenses(
    filter: &ExpenseFilter,
    client_id: ClientId,
    connection: &Connection,
) -> Result<Vec<ExpenseRecord>, Error> {
    let mut query =
        ExpenseQuery::for_client(client_id).amount_between(filter.amount_from, filter.amount_to);

    if let Some(category_name) = &filter.category {
        let category = get_category_by_name(category_name.as_ref(), connection).map_err(
            |error| match error {
                Error::NotFound => Error::InvalidReference(format!("category \"{category_name}\"")),
                error => error,
            },
        )?;
        query = query.category_id(category.id);
    }

    if let Some(year) = filter.year {
        query = query.year(year);
    }

    if let Some(month) = filter.month {
        query = query.month(month);
    }

    query.execute(connection)
}
