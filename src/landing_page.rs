//! The landing page, which greets logged-in clients and links everyone else to the log-in page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::get_token_from_cookies,
    client::{ClientId, Email, get_client_by_id},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the landing page.
#[derive(Debug, Clone)]
pub struct LandingPageState {
    /// The database connection for looking up the logged-in client.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LandingPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn landing_page_view(email: Option<&Email>) -> Markup {
    let content = html! {
        @if email.is_some() {
            (NavBar::new(endpoints::ROOT).into_html())
        }

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="max-w-md space-y-4 text-center"
            {
                h1 class="text-2xl font-bold" { "Expense Tracker" }

                @if let Some(email) = email {
                    p id="greeting" { "Welcome back, " (email) "." }

                    p
                    {
                        "Review your spending on the "
                        a href=(endpoints::EXPENSE_LIST) class=(LINK_STYLE) { "expense list" }
                        " or "
                        a href=(endpoints::ADD_EXPENSE_VIEW) class=(LINK_STYLE) { "add an expense" }
                        "."
                    }
                } @else {
                    p { "Record what you spend and see where your money goes." }

                    a href=(endpoints::LOG_IN) role="button" class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Log in"
                    }
                }
            }
        }
    };

    base("Home", &content)
}

/// Display the landing page.
///
/// The auth cookie is optional here. A missing or invalid cookie shows the
/// page for anonymous visitors instead of redirecting to the log-in page.
pub async fn get_landing_page(
    State(state): State<LandingPageState>,
    jar: PrivateCookieJar,
) -> Response {
    let email = match get_token_from_cookies(&jar) {
        Ok(token) => match find_client_email(&state, token.client_id) {
            Ok(email) => Some(email),
            Err(Error::NotFound) => None,
            Err(error) => {
                tracing::error!("Could not get client {} for landing page: {error}", token.client_id);
                return error.into_response();
            }
        },
        Err(_) => None,
    };

    landing_page_view(email.as_ref()).into_response()
}

fn find_client_email(
    state: &LandingPageState,
    client_id: ClientId,
) -> Result<Email, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_client_by_id(client_id, &connection).map(|client| client.email)
}
