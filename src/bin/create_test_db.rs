use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

use expense_tracker::{
    Email, NewExpense, PasswordHash, ValidatedPassword, create_client, create_expense,
    get_all_categories, initialize_db,
};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The email address of the client created for manual testing.
const TEST_EMAIL: &str = "test@example.com";
/// The password of the client created for manual testing.
const TEST_PASSWORD: &str = "test";

/// Sample expenses as (amount, category, day offset, description).
const SAMPLE_EXPENSES: [(f64, &str, i64, &str); 10] = [
    (12.5, "Food", 0, "Lunch"),
    (48.2, "Food", 3, "Groceries"),
    (3.8, "Food", 9, "Coffee"),
    (25.0, "Travel", 12, "Taxi to the airport"),
    (420.0, "Travel", 40, "Return flights"),
    (15.99, "Entertainment", 18, "Movie night"),
    (60.0, "Entertainment", 75, "Concert tickets"),
    (89.0, "Health", 31, "Dentist check-up"),
    (110.0, "Bills", 45, "Electricity bill"),
    (7.5, "Other", 380, ""),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test client {TEST_EMAIL}...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let client = create_client(Email::new_unchecked(TEST_EMAIL), password_hash, &connection)?;

    println!("Adding sample expenses...");

    let categories = get_all_categories(&connection)?;
    let start = PrimitiveDateTime::new(
        Date::from_calendar_date(2024, Month::January, 5)?,
        Time::from_hms(12, 30, 0)?,
    );

    for (amount, category_name, day_offset, description) in SAMPLE_EXPENSES {
        let Some(category) = categories
            .iter()
            .find(|category| category.name.as_ref() == category_name)
        else {
            eprintln!("Skipping \"{description}\", category {category_name} does not exist.");
            continue;
        };

        create_expense(
            NewExpense {
                amount,
                date_time: start + Duration::days(day_offset),
                description: description.to_owned(),
                client_id: client.id,
                category_id: category.id,
            },
            &connection,
        )?;
    }

    println!("Success!");

    Ok(())
}
