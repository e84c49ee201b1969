//! The endpoint that deletes an expense and returns to the expense list.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    client::ClientId,
    endpoints,
    expense::{core::delete_expense, state::ExpenseState, update::ExpenseIdQuery},
};

/// A route handler for deleting an expense, redirects to the expense list on success.
///
/// Responds with 404 if the expense does not exist or belongs to another client.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(client_id): Extension<ClientId>,
    Query(query): Query<ExpenseIdQuery>,
) -> Response {
    let expense_id = query.expense_id;

    let result = state
        .lock_connection()
        .and_then(|connection| delete_expense(expense_id, client_id, &connection));

    match result {
        Ok(()) => {
            tracing::info!("Client {client_id} deleted expense {expense_id}");
            Redirect::to(endpoints::EXPENSE_LIST).into_response()
        }
        Err(error) => {
            tracing::warn!("Client {client_id} could not delete expense {expense_id}: {error}");
            error.into_response()
        }
    }
}
