//! Expense Tracker is a web app for recording and reviewing personal expenses.
//!
//! This library provides a REST API that directly serves HTML pages.
//! Each client logs in, records expenses with an amount, category, date-time
//! and description, and can list, edit, delete and filter their expenses.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod client;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod landing_page;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, ValidatedPassword};
pub use category::get_all_categories;
pub use client::{ClientId, Email, create_client, get_client_by_email};
pub use db::initialize as initialize_db;
pub use expense::{NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{html::error_view, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    /// An expense that belongs to another client is also reported as not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A form referred to a client or category that does not exist.
    ///
    /// The string describes the reference that could not be resolved, e.g.
    /// `category "Snacks"`.
    #[error("could not find {0}")]
    InvalidReference(String),

    /// A value submitted by the client could not be parsed, e.g. a malformed
    /// date-time or a year that is not a number.
    #[error("could not parse {0}")]
    ParseError(String),

    /// A value submitted by the client was well-formed but not acceptable,
    /// e.g. a minimum amount that is larger than the maximum amount.
    #[error("invalid input: {0}")]
    ValidationError(String),

    /// The email and password combination did not match a client.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email address is empty or does not look like an email address.
    #[error("invalid email address \"{0}\"")]
    InvalidEmail(String),

    /// A client with the same email address already exists.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth token in the cookie jar is missing or could not be decoded.
    #[error("the auth cookie is missing or invalid")]
    InvalidAuthCookie,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("client.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidReference(_) => render_bad_request(
                "Unknown Reference",
                &self.to_string(),
                "Choose one of the options in the form and try again.",
            ),
            Error::ParseError(_) => render_bad_request(
                "Invalid Input",
                &self.to_string(),
                "Check the format of the values you entered and try again.",
            ),
            Error::ValidationError(ref message) => render_bad_request(
                "Invalid Input",
                message,
                "Correct the values you entered and try again.",
            ),
            Error::InvalidTimezoneError(timezone) => render_internal_server_error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::DatabaseLockError => render_internal_server_error(
                "Sorry, something went wrong.",
                "Try again later or check the server logs",
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs",
                )
            }
        }
    }
}

fn render_bad_request(description: &str, details: &str, fix: &str) -> Response {
    let fix = format!("{details}. {fix}");

    (
        StatusCode::BAD_REQUEST,
        error_view("Bad Request", "400", description, &fix),
    )
        .into_response()
}

fn render_internal_server_error(description: &str, fix: &str) -> Response {
    internal_server_error::InternalServerError { description, fix }.into_response()
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn client_errors_map_to_400() {
        let errors = [
            Error::InvalidReference("category \"Snacks\"".to_owned()),
            Error::ParseError("year \"twenty\"".to_owned()),
            Error::ValidationError("amount must be positive".to_owned()),
        ];

        for error in errors {
            let description = error.to_string();
            let response = error.into_response();

            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "want 400 for {description}"
            );
        }
    }

    #[test]
    fn sql_errors_map_to_500() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn no_rows_is_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }
}
