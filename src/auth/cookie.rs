//! Reading and writing the encrypted auth cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Token, client::ClientId};

/// The name of the cookie that holds the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";

/// How long a session lasts without activity.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(60);

/// Add the auth cookie to `jar`, marking `client_id` as logged in until
/// `duration` from now.
///
/// # Errors
///
/// Returns [Error::InvalidAuthCookie] if the token could not be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    client_id: ClientId,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;

    set_token(
        jar,
        Token {
            client_id,
            expires_at,
        },
    )
}

/// Overwrite the auth cookie with a value that cannot be decoded and an
/// expiry in the past so that the browser removes it.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Decode the auth token in `jar`.
///
/// # Errors
///
/// Returns [Error::InvalidAuthCookie] if the cookie is missing, cannot be
/// decoded or has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::InvalidAuthCookie)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidAuthCookie)?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(Error::InvalidAuthCookie);
    }

    Ok(token)
}

/// Push the auth cookie expiry out to at least `duration` from now.
///
/// Cookies that already expire later, such as "remember me" sessions, are
/// left alone.
///
/// # Errors
///
/// Returns [Error::InvalidAuthCookie] if `jar` does not hold a valid token.
/// The cookie jar is not modified if an error is returned.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::InvalidAuthCookie)?;

    set_token(
        jar,
        Token {
            client_id: token.client_id,
            expires_at: max(token.expires_at, new_expiry),
        },
    )
}

fn set_token(jar: PrivateCookieJar, token: Token) -> Result<PrivateCookieJar, Error> {
    let serialized_token = serde_json::to_string(&token).map_err(|error| {
        tracing::error!("Could not serialize auth token: {error}");
        Error::InvalidAuthCookie
    })?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, serialized_token))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, client::ClientId};

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
        get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    /// Asserts that two date times are within one second of each other.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(1),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn set_cookie_stores_client_id() {
        let client_id = ClientId::new(3);

        let jar = set_auth_cookie(get_jar(), client_id, DEFAULT_COOKIE_DURATION).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.client_id, client_id);
        assert_date_time_close!(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION
        );
    }

    #[test]
    fn set_cookie_sets_secure_attributes() {
        let jar = set_auth_cookie(get_jar(), ClientId::new(1), DEFAULT_COOKIE_DURATION).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_date_time_close!(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION
        );
    }

    #[test]
    fn get_token_fails_on_missing_cookie() {
        let result = get_token_from_cookies(&get_jar());

        assert_eq!(result, Err(Error::InvalidAuthCookie));
    }

    #[test]
    fn get_token_fails_on_garbage() {
        let jar = get_jar().add(Cookie::build((COOKIE_TOKEN, "FOOBAR")));

        let result = get_token_from_cookies(&jar);

        assert_eq!(result, Err(Error::InvalidAuthCookie));
    }

    #[test]
    fn get_token_fails_on_expired_token() {
        let jar = set_auth_cookie(get_jar(), ClientId::new(1), Duration::seconds(-5)).unwrap();

        let result = get_token_from_cookies(&jar);

        assert_eq!(result, Err(Error::InvalidAuthCookie));
    }

    #[test]
    fn extend_cookie_pushes_expiry_forward() {
        let jar = set_auth_cookie(get_jar(), ClientId::new(1), Duration::seconds(5)).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5)).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        let want = OffsetDateTime::now_utc() + Duration::minutes(5);
        assert_date_time_close!(token.expires_at, want);
        assert_date_time_close!(cookie.expires_datetime().unwrap(), want);
    }

    #[test]
    fn extend_cookie_keeps_later_expiry() {
        let jar = set_auth_cookie(get_jar(), ClientId::new(1), Duration::days(7)).unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5)).unwrap();
        let got = get_token_from_cookies(&jar).unwrap().expires_at;

        assert_eq!(got, want);
    }

    #[test]
    fn invalidate_auth_cookie_succeeds() {
        let jar = set_auth_cookie(get_jar(), ClientId::new(1), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(get_token_from_cookies(&jar), Err(Error::InvalidAuthCookie));
    }
}
