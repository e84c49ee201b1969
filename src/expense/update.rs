//! The page for editing an expense and the endpoint the edit form posts to.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    category::get_all_categories,
    client::ClientId,
    endpoints::{self, with_expense_id},
    expense::{
        ExpenseForm, ExpenseId, NewExpense,
        core::{get_expense, update_expense},
        form::{ExpenseFormDefaults, expense_form},
        state::ExpenseState,
    },
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The query string of the routes that act on a single expense, e.g. `?expId=3`.
#[derive(Debug, Deserialize)]
pub struct ExpenseIdQuery {
    #[serde(rename = "expId")]
    pub expense_id: ExpenseId,
}

fn update_expense_view(form: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::UPDATE_EXPENSE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Expense" }

            (form)
        }
    };

    base("Edit Expense", &content)
}

/// Renders the edit form pre-filled with the stored expense.
///
/// Responds with 404 if the expense does not exist or belongs to another client.
pub async fn get_update_expense_page(
    State(state): State<ExpenseState>,
    Extension(client_id): Extension<ClientId>,
    Query(query): Query<ExpenseIdQuery>,
) -> Response {
    let expense_id = query.expense_id;

    let result = state.lock_connection().and_then(|connection| {
        let expense = get_expense(expense_id, client_id, &connection)?;
        let categories = get_all_categories(&connection)?;

        Ok((expense, categories))
    });

    let (expense, categories) = match result {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!("Could not get expense {expense_id} for client {client_id}: {error}");
            return error.into_response();
        }
    };

    let category_name = expense.category_id.and_then(|category_id| {
        categories
            .iter()
            .find(|category| category.id == category_id)
            .map(|category| category.name.as_ref())
    });

    let defaults = ExpenseFormDefaults {
        amount: Some(expense.amount),
        category_name,
        date_time: expense.date_time.valid(),
        description: &expense.description,
    };
    let form = expense_form(
        &with_expense_id(endpoints::SUBMIT_UPDATE_EXPENSE, expense_id),
        "Save Changes",
        &defaults,
        &categories,
    );

    update_expense_view(form).into_response()
}

/// A route handler for saving an edited expense, redirects to the expense list on success.
///
/// The category is looked up again by name. Nothing is written if it does not exist.
pub async fn submit_update_expense(
    State(state): State<ExpenseState>,
    Extension(client_id): Extension<ClientId>,
    Query(query): Query<ExpenseIdQuery>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let expense_id = query.expense_id;

    let result = state.lock_connection().and_then(|connection| {
        get_expense(expense_id, client_id, &connection)?;
        let new_expense = NewExpense::resolve(&form, client_id, &connection)?;

        update_expense(expense_id, new_expense, &connection)
    });

    match result {
        Ok(()) => {
            tracing::info!("Client {client_id} updated expense {expense_id}");
            Redirect::to(endpoints::EXPENSE_LIST).into_response()
        }
        Err(error) => {
            tracing::warn!("Client {client_id} could not update expense {expense_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod update_expense_page_tests {
    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use crate::{
        endpoints::{self, with_expense_id},
        expense::state::test_state::{add_client, add_expense, get_test_state},
        test_utils::{
            assert_form_input_with_value, assert_valid_html, must_get_form, parse_html_document,
            selected_option_text,
        },
    };

    use super::{ExpenseIdQuery, get_update_expense_page};

    #[tokio::test]
    async fn prefills_form() {
        let (state, client_id) = get_test_state();
        let expense_id = add_expense(
            &state,
            client_id,
            42.5,
            "Travel",
            "2024-03-01T10:00:00",
            "Taxi",
        );

        let response = get_update_expense_page(
            State(state),
            Extension(client_id),
            Query(ExpenseIdQuery { expense_id }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_eq!(
            form.value().attr("action"),
            Some(with_expense_id(endpoints::SUBMIT_UPDATE_EXPENSE, expense_id).as_str())
        );
        assert_form_input_with_value(&form, "amount", "number", "42.50");
        assert_form_input_with_value(&form, "date_time", "datetime-local", "2024-03-01T10:00:00");
        assert_eq!(selected_option_text(&form), ["Travel"]);
    }

    #[tokio::test]
    async fn missing_expense_is_not_found() {
        let (state, client_id) = get_test_state();

        let response = get_update_expense_page(
            State(state),
            Extension(client_id),
            Query(ExpenseIdQuery { expense_id: 42 }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn expense_of_other_client_is_not_found() {
        let (state, client_id) = get_test_state();
        let other_client_id = add_client(&state, "other@bar.baz");
        let expense_id = add_expense(
            &state,
            other_client_id,
            1.0,
            "Food",
            "2024-03-01T10:00:00",
            "",
        );

        let response = get_update_expense_page(
            State(state),
            Extension(client_id),
            Query(ExpenseIdQuery { expense_id }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
