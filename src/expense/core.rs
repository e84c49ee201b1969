//! Defines the core data models and database queries for expenses.

use rusqlite::{Connection, Row};
use time::PrimitiveDateTime;

use crate::{
    Error,
    category::{CategoryId, get_category_by_name},
    client::{ClientId, get_client_by_id},
    expense::{
        ExpenseForm,
        date_time::{StoredDateTime, format_date_time, parse_date_time},
    },
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// The largest amount a single expense may have.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// A single recorded spending event as stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much was spent.
    pub amount: f64,
    /// When the money was spent, in local time.
    pub date_time: StoredDateTime,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The client that recorded the expense.
    pub client_id: ClientId,
    /// The category the expense belongs to.
    ///
    /// Only rows written by older versions of the app lack a category.
    pub category_id: Option<CategoryId>,
}

/// An expense joined with the name of its category, ready to be enriched for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub amount: f64,
    pub date_time: StoredDateTime,
    pub description: String,
    pub category_id: Option<CategoryId>,
    /// `None` if the expense has no category or its category no longer exists.
    pub category_name: Option<String>,
}

/// The validated fields for creating or overwriting an expense.
///
/// Use [NewExpense::resolve] to build one from a submitted [ExpenseForm].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// How much was spent.
    pub amount: f64,
    /// When the money was spent, in local time.
    pub date_time: PrimitiveDateTime,
    /// What the money was spent on, may be empty.
    pub description: String,
    /// The client that owns the expense.
    pub client_id: ClientId,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
}

impl NewExpense {
    /// Map a submitted expense form to an expense owned by `client_id`.
    ///
    /// The category is looked up by its exact name.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidReference] if `client_id` or the category name do not exist,
    /// - [Error::ParseError] if the date-time is not an ISO local date-time,
    /// - [Error::ValidationError] if the amount is negative, larger than
    ///   [MAX_AMOUNT] or not a finite number,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn resolve(
        form: &ExpenseForm,
        client_id: ClientId,
        connection: &Connection,
    ) -> Result<Self, Error> {
        if !(0.0..=MAX_AMOUNT).contains(&form.amount) {
            return Err(Error::ValidationError(format!(
                "the amount {} must be a number from 0 to {MAX_AMOUNT}",
                form.amount
            )));
        }

        let date_time = parse_date_time(form.date_time.trim())?;

        get_client_by_id(client_id, connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidReference(format!("client with ID {client_id}")),
            error => error,
        })?;

        let category_name = form.category.trim();
        let category =
            get_category_by_name(category_name, connection).map_err(|error| match error {
                Error::NotFound => {
                    Error::InvalidReference(format!("category \"{category_name}\""))
                }
                error => error,
            })?;

        Ok(Self {
            amount: form.amount,
            date_time,
            description: form.description.trim().to_owned(),
            client_id,
            category_id: category.id,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table.
///
/// Requires the client and category tables to exist.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                date_time TEXT,
                description TEXT NOT NULL DEFAULT '',
                client_id INTEGER NOT NULL,
                category_id INTEGER,
                FOREIGN KEY(client_id) REFERENCES client(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_client_id ON expense(client_id)",
        (),
    )?;

    Ok(())
}

/// Create a new expense in the database.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidReference] if the client or category do not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expense (amount, date_time, description, client_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, date_time, description, client_id, category_id",
        )?
        .query_row(
            (
                new_expense.amount,
                format_date_time(&new_expense.date_time),
                &new_expense.description,
                new_expense.client_id.as_i64(),
                new_expense.category_id,
            ),
            map_expense_row,
        )
        .map_err(map_foreign_key_error)
}

/// Retrieve the expense with `id` if it belongs to `client_id`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if there is no such expense or it belongs to another client,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(
    id: ExpenseId,
    client_id: ClientId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, amount, date_time, description, client_id, category_id
             FROM expense
             WHERE id = :id AND client_id = :client_id",
        )?
        .query_row(
            &[(":id", &id), (":client_id", &client_id.as_i64())],
            map_expense_row,
        )
        .map_err(|error| error.into())
}

/// Overwrite the amount, date-time, description and category of the expense
/// with `id` owned by `new_expense.client_id`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if there is no such expense or it belongs to another client,
/// - [Error::InvalidReference] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    new_expense: NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE expense
             SET amount = ?1, date_time = ?2, description = ?3, category_id = ?4
             WHERE id = ?5 AND client_id = ?6",
            (
                new_expense.amount,
                format_date_time(&new_expense.date_time),
                &new_expense.description,
                new_expense.category_id,
                id,
                new_expense.client_id.as_i64(),
            ),
        )
        .map_err(map_foreign_key_error)?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the expense with `id` if it belongs to `client_id`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if there is no such expense or it belongs to another client,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(
    id: ExpenseId,
    client_id: ClientId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND client_id = ?2",
        (id, client_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// The distinct years in the client's expense date-times, newest first.
///
/// Date-times that do not start with a four digit year are skipped.
pub fn get_expense_years(client_id: ClientId, connection: &Connection) -> Result<Vec<i32>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT CAST(substr(date_time, 1, 4) AS INTEGER) AS year
             FROM expense
             WHERE client_id = ?1 AND date_time GLOB '[0-9][0-9][0-9][0-9]-*'
             ORDER BY year DESC",
        )?
        .query_map((client_id.as_i64(),), |row| row.get(0))?
        .map(|maybe_year| maybe_year.map_err(|error| error.into()))
        .collect()
}

fn map_foreign_key_error(error: rusqlite::Error) -> Error {
    match error {
        // The client or category was deleted, or never existed.
        rusqlite::Error::SqliteFailure(sql_error, _)
            if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            Error::InvalidReference("client or category for the expense".to_owned())
        }
        error => error.into(),
    }
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        date_time: row.get(2)?,
        description: row.get(3)?,
        client_id: ClientId::new(row.get(4)?),
        category_id: row.get(5)?,
    })
}

/// Map a row selected with [crate::expense::filter::EXPENSE_RECORD_COLUMNS].
pub(super) fn map_record_row(row: &Row) -> Result<ExpenseRecord, rusqlite::Error> {
    Ok(ExpenseRecord {
        id: row.get(0)?,
        amount: row.get(1)?,
        date_time: row.get(2)?,
        description: row.get(3)?,
        category_id: row.get(4)?,
        category_name: row.get(5)?,
    })
}
