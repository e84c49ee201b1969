//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the database functions for storing, querying and managing expenses
//! - The enrichment that derives display fields from stored rows
//! - The filter form and the parameterised filter query
//! - The pages and endpoints for adding, listing, editing, deleting and filtering expenses

mod add;
mod core;
mod date_time;
mod delete;
mod enrichment;
mod filter;
mod form;
mod list;
mod state;
mod update;
mod view;

pub use add::{get_add_expense_page, submit_add_expense};
pub use core::{
    ExpenseId, ExpenseRecord, NewExpense, create_expense, create_expense_table, get_expense_years,
};
pub use date_time::StoredDateTime;
pub use delete::delete_expense_endpoint;
pub use enrichment::{ExpenseListItem, enrich};
pub use filter::{
    ALL, ExpenseFilter, FilterForm, find_filtered_expenses, get_expense_records_by_client,
};
pub use form::ExpenseForm;
pub use list::{get_expense_list_page, process_filter};
pub use update::{get_update_expense_page, submit_update_expense};

#[cfg(test)]
pub use enrichment::{NO_CATEGORY, NO_DATE, NO_TIME, UNKNOWN_CATEGORY};
