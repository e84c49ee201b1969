use std::{
    error::Error,
    io::{self, Write},
    path::Path,
    process::exit,
};

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{Email, PasswordHash, ValidatedPassword, create_client, initialize_db};

/// A utility for adding a client account to an expense tracker database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let Some(email) = get_email() else {
        return Ok(());
    };

    let Some(password_hash) = get_password_hash(&email) else {
        return Ok(());
    };

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    match create_client(email, password_hash, &connection) {
        Ok(client) => {
            println!("Created client {} with ID {}.", client.email, client.id);
            Ok(())
        }
        Err(error) => {
            print_error(&error);
            exit(1);
        }
    }
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            print_error("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }
}

fn get_email() -> Option<Email> {
    loop {
        print!("Enter the client's email address: ");
        if let Err(error) = io::stdout().flush() {
            print_error(format!("Could not write to stdout: {error}"));
            return None;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(error) => {
                print_error(format!("Could not read email from stdin: {error}"));
                return None;
            }
        }

        match Email::new(line.trim()) {
            Ok(email) => return Some(email),
            Err(error) => print_error(error),
        }
    }
}

fn get_password_hash(email: &Email) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = read_password("Enter a password: ")?;

        let validated_password = match ValidatedPassword::new(&first_password, email) {
            Ok(validated_password) => validated_password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = read_password("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => print_error(format!("Could not hash password: {error}. Try again.")),
        }
    }
}

fn read_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
