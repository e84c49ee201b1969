//! The token stored in the encrypted auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::client::ClientId;

mod expiry_format {
    //! Serializes the token expiry with a fixed-width format.
    //!
    //! The default [time::OffsetDateTime] serializer writes midnight as
    //! "0:00:00.0", which the default deserializer then rejects because it
    //! expects a two digit hour.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// e.g. "2021-01-01 00:00:00.0 +00:00:00".
    const EXPIRY_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(expires_at: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = expires_at
            .format(EXPIRY_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&raw, EXPIRY_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Identifies the logged-in client and when their session ends.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    /// The client the session belongs to.
    pub client_id: ClientId,

    /// The session is rejected after this time.
    #[serde(
        serialize_with = "expiry_format::serialize",
        deserialize_with = "expiry_format::deserialize"
    )]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the session has ended as of `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod token_tests {
    use time::{Duration, UtcOffset, macros::datetime};

    use crate::{auth::token::Token, client::ClientId};

    #[test]
    fn serialise_token() {
        let token = Token {
            client_id: ClientId::new(7),
            expires_at: datetime!(2025-12-21 03:54:00).assume_offset(UtcOffset::UTC),
        };
        let want = r#"{"client_id":7,"expires_at":"2025-12-21 03:54:00.0 +00:00:00"}"#;

        let got = serde_json::to_string(&token).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn deserialise_token_with_midnight_expiry() {
        let want = Token {
            client_id: ClientId::new(7),
            expires_at: datetime!(2025-12-21 00:00:00).assume_offset(UtcOffset::UTC),
        };
        let raw_token = r#"{"client_id":7,"expires_at":"2025-12-21 00:00:00.0 +00:00:00"}"#;

        let got: Token = serde_json::from_str(raw_token).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn token_expires_at_expiry_time() {
        let expires_at = datetime!(2025-12-21 12:00:00).assume_offset(UtcOffset::UTC);
        let token = Token {
            client_id: ClientId::new(1),
            expires_at,
        };

        assert!(!token.is_expired(expires_at - Duration::seconds(1)));
        assert!(token.is_expired(expires_at));
    }
}
