//! The routes for displaying the log-in page and handling log-in requests.
//! The cookie module handles the lower level token logic.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{invalidate_auth_cookie, redirect::normalize_redirect_url, set_auth_cookie},
    client::{Client, Email, get_client_by_email},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, log_in_card,
        password_input,
    },
};

/// How long the auth cookie should last if the client selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::LOG_IN)
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    type="email"
                    name="email"
                    id="email"
                    placeholder="you@example.com"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus
                    value=(email);
            }

            (password_input("", error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }
        }
    }
}

fn log_in_page(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    let form = log_in_form(email, error_message, redirect_url);
    let content = log_in_card("Log in to your account", &form);

    base("Log In", &content)
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");

    log_in_page("", None, redirect_url.as_deref()).into_response()
}

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection used to look up clients.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the client in the log-in form.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the hash in the database.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email address entered during log-in.
    pub email: String,

    /// Password entered during log-in.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set.
    /// The `Some` variant should be interpreted as `true` regardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the requested page or the expense list.
/// Otherwise, the log-in page is returned with an error message that does not
/// reveal whether the email or the password was wrong.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(log_in_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(log_in_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let entered_email = log_in_data.email.as_str();

    let client = match check_credentials(&log_in_data, &state.db_connection) {
        Ok(client) => client,
        Err(Error::InvalidCredentials) => {
            return log_in_page(
                entered_email,
                Some(INVALID_CREDENTIALS_ERROR_MSG),
                redirect_url,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_page(entered_email, Some(INTERNAL_ERROR_MSG), redirect_url)
                .into_response();
        }
    };

    let cookie_duration = if log_in_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::EXPENSE_LIST);

    match set_auth_cookie(jar.clone(), client.id, cookie_duration) {
        Ok(updated_jar) => {
            tracing::info!("Client {} logged in", client.id);
            (updated_jar, Redirect::to(redirect_url)).into_response()
        }
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                invalidate_auth_cookie(jar),
                log_in_page(entered_email, Some(INTERNAL_ERROR_MSG), Some(redirect_url)),
            )
                .into_response()
        }
    }
}

/// Find the client with the submitted email and verify their password.
///
/// Unknown or malformed email addresses and wrong passwords all produce
/// [Error::InvalidCredentials].
fn check_credentials(
    log_in_data: &LogInData,
    db_connection: &Mutex<Connection>,
) -> Result<Client, Error> {
    let email = Email::new(&log_in_data.email).map_err(|_| Error::InvalidCredentials)?;

    let client = {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        match get_client_by_email(&email, &connection) {
            Ok(client) => client,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    if client.password_hash.verify(&log_in_data.password)? {
        Ok(client)
    } else {
        Err(Error::InvalidCredentials)
    }
}
