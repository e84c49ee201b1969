//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, get_log_in_page, get_log_out, post_log_in},
    endpoints,
    expense::{
        delete_expense_endpoint, get_add_expense_page, get_expense_list_page,
        get_update_expense_page, process_filter, submit_add_expense, submit_update_expense,
    },
    landing_page::get_landing_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_landing_page))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::ADD_EXPENSE_VIEW, get(get_add_expense_page))
        .route(endpoints::SUBMIT_ADD_EXPENSE, post(submit_add_expense))
        .route(endpoints::EXPENSE_LIST, get(get_expense_list_page))
        .route(endpoints::UPDATE_EXPENSE_VIEW, get(get_update_expense_page))
        .route(endpoints::SUBMIT_UPDATE_EXPENSE, post(submit_update_expense))
        .route(endpoints::DELETE_EXPENSE, get(delete_expense_endpoint))
        .route(endpoints::PROCESS_FILTER, post(process_filter))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
