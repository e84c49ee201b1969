//! The expense list page and the filter endpoint that renders a narrowed list.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    Error,
    category::{Category, get_all_categories},
    client::ClientId,
    expense::{
        ExpenseFilter, FilterForm, enrich, find_filtered_expenses, get_expense_records_by_client,
        get_expense_years,
        state::ExpenseState,
        view::{FilterOptions, expense_list_view, filter_results_view},
    },
};

/// The data for the filter form selects.
struct FilterChoices {
    categories: Vec<Category>,
    years: Vec<i32>,
}

impl FilterChoices {
    fn load(client_id: ClientId, connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            categories: get_all_categories(connection)?,
            years: get_expense_years(client_id, connection)?,
        })
    }

    fn as_options(&self) -> FilterOptions<'_> {
        FilterOptions {
            categories: &self.categories,
            years: &self.years,
        }
    }
}

/// Renders every expense owned by the logged-in client, oldest first.
pub async fn get_expense_list_page(
    State(state): State<ExpenseState>,
    Extension(client_id): Extension<ClientId>,
) -> Response {
    let result = state.lock_connection().and_then(|connection| {
        let records = get_expense_records_by_client(client_id, &connection)?;
        let choices = FilterChoices::load(client_id, &connection)?;

        Ok((records, choices))
    });

    let (records, choices) = match result {
        Ok(data) => data,
        Err(error) => {
            tracing::error!("Could not get the expenses of client {client_id}: {error}");
            return error.into_response();
        }
    };

    let expenses = records.into_iter().map(enrich).collect::<Vec<_>>();

    expense_list_view(&expenses, &choices.as_options()).into_response()
}

/// A route handler for the filter form, renders the matching expenses.
pub async fn process_filter(
    State(state): State<ExpenseState>,
    Extension(client_id): Extension<ClientId>,
    Form(form): Form<FilterForm>,
) -> Response {
    let filter = match ExpenseFilter::from_form(&form) {
        Ok(filter) => filter,
        Err(error) => {
            tracing::warn!("Client {client_id} submitted an invalid filter {form:?}: {error}");
            return error.into_response();
        }
    };

    let result = state.lock_connection().and_then(|connection| {
        let records = find_filtered_expenses(&filter, client_id, &connection)?;
        let choices = FilterChoices::load(client_id, &connection)?;

        Ok((records, choices))
    });

    let (records, choices) = match result {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!("Could not filter the expenses of client {client_id}: {error}");
            return error.into_response();
        }
    };

    let expenses = records.into_iter().map(enrich).collect::<Vec<_>>();

    filter_results_view(&expenses, &choices.as_options(), &filter).into_response()
}
