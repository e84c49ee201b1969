//! Clients are the people who log in and own expenses.

mod db;
mod domain;

pub use db::{create_client, create_client_table, get_client_by_email, get_client_by_id};
pub use domain::{Client, ClientId, Email};
