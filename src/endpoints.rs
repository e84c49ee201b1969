//! The URIs of the pages and form endpoints.
//!
//! Routes that act on a single expense take its ID in the `expId` query
//! parameter, use [with_expense_id] to build them.

use crate::expense::ExpenseId;

/// The landing page.
pub const ROOT: &str = "/";
/// The route for the log-in page and log-in form submissions.
pub const LOG_IN: &str = "/login";
/// The route for logging out.
pub const LOG_OUT: &str = "/logout";
/// The page with the blank expense form.
pub const ADD_EXPENSE_VIEW: &str = "/showAdd";
/// The route the add expense form posts to.
pub const SUBMIT_ADD_EXPENSE: &str = "/submitAdd";
/// The page listing the client's expenses.
pub const EXPENSE_LIST: &str = "/list";
/// The page with the form for editing an expense.
pub const UPDATE_EXPENSE_VIEW: &str = "/showUpdate";
/// The route the edit expense form posts to.
pub const SUBMIT_UPDATE_EXPENSE: &str = "/submitUpdate";
/// The route for deleting an expense.
pub const DELETE_EXPENSE: &str = "/delete";
/// The route the filter form posts to.
pub const PROCESS_FILTER: &str = "/processFilter";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The name of the query parameter that holds an expense ID.
pub const EXPENSE_ID_PARAM: &str = "expId";

/// Append the expense ID query parameter to `endpoint`.
///
/// ```rust,ignore
/// assert_eq!(with_expense_id(UPDATE_EXPENSE_VIEW, 3), "/showUpdate?expId=3");
/// ```
pub fn with_expense_id(endpoint: &str, expense_id: ExpenseId) -> String {
    format!("{endpoint}?{EXPENSE_ID_PARAM}={expense_id}")
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints::{self, with_expense_id};

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::ADD_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SUBMIT_ADD_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE_LIST);
        assert_endpoint_is_valid_uri(endpoints::UPDATE_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SUBMIT_UPDATE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::PROCESS_FILTER);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }

    #[test]
    fn with_expense_id_produces_valid_uri() {
        let uri = with_expense_id(endpoints::UPDATE_EXPENSE_VIEW, 42);

        assert_eq!(uri, "/showUpdate?expId=42");
        assert!(uri.parse::<Uri>().is_ok());
    }
}
