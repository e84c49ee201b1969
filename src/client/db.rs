//! Database operations for clients.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::PasswordHash,
    client::{Client, ClientId, Email},
};

/// Create the client table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_client_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS client (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new client into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if a client with `email` already exists,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_client(
    email: Email,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<Client, Error> {
    connection.execute(
        "INSERT INTO client (email, password) VALUES (?1, ?2)",
        (email.as_ref(), password_hash.as_ref()),
    )?;

    let id = ClientId::new(connection.last_insert_rowid());

    Ok(Client {
        id,
        email,
        password_hash,
    })
}

/// Get the client from the database with an ID equal to `client_id`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if `client_id` does not belong to a client,
/// - or [Error::SqlError] if there was some other SQL error.
pub fn get_client_by_id(client_id: ClientId, connection: &Connection) -> Result<Client, Error> {
    connection
        .prepare("SELECT id, email, password FROM client WHERE id = :id")?
        .query_row(&[(":id", &client_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the client from the database that logs in with `email`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if no client has the email address,
/// - or [Error::SqlError] if there was some other SQL error.
pub fn get_client_by_email(email: &Email, connection: &Connection) -> Result<Client, Error> {
    connection
        .prepare("SELECT id, email, password FROM client WHERE email = :email")?
        .query_row(&[(":email", email.as_ref())], map_row)
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Client, rusqlite::Error> {
    let id = ClientId::new(row.get(0)?);
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(Client {
        id,
        email: Email::new_unchecked(&raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
