//! Password strength checks and bcrypt hashing for client accounts.
//!
//! A password is checked against the email address of the account it is for,
//! so a password built from the client's own email is rejected as guessable.

use bcrypt::{hash, verify};
use zxcvbn::{Score, zxcvbn};

use crate::{Error, client::Email};

/// A raw password that passed the strength check for one client account.
///
/// The only use of this type is to build a [PasswordHash].
#[derive(Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check that `raw_password` is hard to guess for the client with `email`.
    ///
    /// The email address and its local part are given to zxcvbn as known
    /// user inputs, so reusing them in the password lowers its score.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's warning and suggestions if the
    /// password scores below three out of four.
    pub fn new(raw_password: &str, email: &Email) -> Result<Self, Error> {
        let email = email.as_ref();
        let local_part = email.split_once('@').map_or(email, |(local, _)| local);

        let estimate = zxcvbn(raw_password, &[email, local_part]);

        if matches!(estimate.score(), Score::Three | Score::Four) {
            return Ok(Self(raw_password.to_owned()));
        }

        let advice = estimate
            .feedback()
            .map(|feedback| feedback.to_string())
            .filter(|advice| !advice.trim().is_empty())
            .unwrap_or_else(|| "add more words or characters".to_owned());

        Err(Error::TooWeak(advice))
    }

    /// Skip the strength check, e.g. for fixed passwords in test databases.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

// Never print the password itself.
impl std::fmt::Debug for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidatedPassword(********)")
    }
}

/// A salted bcrypt hash as stored in the `client.password` column.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used for client accounts.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// Tests pass a low cost such as 4 to keep hashing fast.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt rejects the cost.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash loaded from the database.
    pub fn new_unchecked(stored_hash: &str) -> Self {
        Self(stored_hash.to_owned())
    }

    /// Whether `raw_password` is the password this hash was made from.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
