//! Categories classify expenses, e.g. 'Food' or 'Travel'.
//!
//! Categories are seeded when the database is initialized and are not edited
//! through the web app.

mod db;
mod domain;

pub use db::{
    create_category_table, get_all_categories, get_category_by_name, insert_default_categories,
};
pub use domain::{Category, CategoryId, CategoryName};
