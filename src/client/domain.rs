//! Core client domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer client IDs.
///
/// This helps disambiguate client IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ClientId(i64);

impl ClientId {
    /// Create a new client ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the client ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An email address used to identify a client at log-in.
///
/// Email addresses are stored trimmed and in lowercase so that log-in is
/// case insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Email(String);

impl Email {
    /// Create an email address.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidEmail] if `email` does not have a non-empty
    /// local part and domain separated by a single '@'.
    pub fn new(email: &str) -> Result<Self, Error> {
        let email = email.trim().to_lowercase();

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(email))
            }
            _ => Err(Error::InvalidEmail(email)),
        }
    }

    /// Create an email address without validation.
    ///
    /// The caller should ensure that the string is a valid email address.
    pub fn new_unchecked(email: &str) -> Self {
        Self(email.to_owned())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Email::new(s)
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A client of the application, i.e. the person who owns expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    /// The client's ID in the application database.
    pub id: ClientId,
    /// The email address the client logs in with.
    pub email: Email,
    /// The client's password hash.
    pub password_hash: PasswordHash,
}
