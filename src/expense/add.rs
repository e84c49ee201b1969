//! The page with the blank expense form and the endpoint it posts to.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};

use crate::{
    Error,
    category::{Category, get_all_categories},
    client::ClientId,
    endpoints,
    expense::{
        ExpenseForm, NewExpense, create_expense,
        form::{ExpenseFormDefaults, expense_form},
        state::ExpenseState,
    },
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::local_now,
};

fn add_expense_view(form: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::ADD_EXPENSE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Add Expense" }

            (form)
        }
    };

    base("Add Expense", &content)
}

/// Renders the page for recording a new expense.
///
/// The date-time is pre-filled with the current local time.
pub async fn get_add_expense_page(State(state): State<ExpenseState>) -> Response {
    let Some(now) = local_now(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let categories = match load_categories(&state) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not get categories for the add expense page: {error}");
            return error.into_response();
        }
    };

    let defaults = ExpenseFormDefaults {
        amount: None,
        category_name: None,
        date_time: Some(now),
        description: "",
    };
    let form = expense_form(
        endpoints::SUBMIT_ADD_EXPENSE,
        "Add Expense",
        &defaults,
        &categories,
    );

    add_expense_view(form).into_response()
}

fn load_categories(state: &ExpenseState) -> Result<Vec<Category>, Error> {
    let connection = state.lock_connection()?;

    get_all_categories(&connection)
}

/// A route handler for recording a new expense, redirects to the expense list on success.
pub async fn submit_add_expense(
    State(state): State<ExpenseState>,
    Extension(client_id): Extension<ClientId>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let result = state.lock_connection().and_then(|connection| {
        let new_expense = NewExpense::resolve(&form, client_id, &connection)?;

        create_expense(new_expense, &connection)
    });

    match result {
        Ok(expense) => {
            tracing::info!("Client {client_id} added expense {}", expense.id);
            Redirect::to(endpoints::EXPENSE_LIST).into_response()
        }
        Err(error) => {
            tracing::warn!("Client {client_id} could not add an expense: {error}");
            error.into_response()
        }
    }
}
