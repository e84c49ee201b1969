//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryName},
};

/// The categories every new database starts with.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Bills",
    "Entertainment",
    "Food",
    "Health",
    "Other",
    "Shopping",
    "Travel",
];

/// Retrieve a single category by its exact name.
///
/// # Errors
/// Returns [Error::NotFound] if there is no category called `name`.
pub fn get_category_by_name(name: &str, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE name = :name;")?
        .query_row(&[(":name", name)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
        (),
    )?;

    Ok(())
}

/// Add any of the [DEFAULT_CATEGORIES] that are not already in the database.
pub fn insert_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare("INSERT OR IGNORE INTO category (name) VALUES (?1);")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name,))?;
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
