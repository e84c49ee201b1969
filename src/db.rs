//! Database schema initialization.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    category::{create_category_table, insert_default_categories},
    client::create_client_table,
    expense::create_expense_table,
};

/// Create the tables for the domain models and seed the default categories.
///
/// Safe to call on an existing database: tables are only created if they do
/// not exist and default categories are only added if they are missing.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the statements fail, in which case
/// no changes are made.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_client_table(&transaction)?;
    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    insert_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{category::get_all_categories, db::initialize};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialization failed");
        let categories_after_first = get_all_categories(&connection).unwrap();
        initialize(&connection).expect("second initialization failed");
        let categories_after_second = get_all_categories(&connection).unwrap();

        assert!(!categories_after_first.is_empty());
        assert_eq!(categories_after_first, categories_after_second);
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let foreign_keys: i64 = connection
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }
}
