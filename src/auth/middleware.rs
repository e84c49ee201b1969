//! The auth guard placed in front of every expense route.
//!
//! It turns the encrypted cookie into the [ClientId] that handlers receive as
//! an `Extension`, and keeps active sessions alive by pushing the cookie
//! expiry forward after each request.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState,
    auth::{
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    client::ClientId,
    endpoints,
};

/// The cookie key and session length used by [auth_guard].
#[derive(Clone)]
pub struct AuthState {
    /// Decrypts the auth cookie.
    pub cookie_key: Key,
    /// How long a session lasts after the client's latest request.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Let the request through only if it carries a valid auth cookie.
///
/// The handler gets the logged-in client as `Extension<ClientId>`. Anonymous
/// requests are sent to the log-in page with a `redirect_url` that brings
/// the client back afterwards.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let Some((client_id, jar)) = authenticate(&mut parts, &state).await else {
        let request = Request::from_parts(parts, body);
        return Redirect::to(&log_in_url_for(&request)).into_response();
    };

    parts.extensions.insert(client_id);
    let mut response = next.run(Request::from_parts(parts, body)).await;

    let jar = extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration)
        .unwrap_or_else(|error| {
            tracing::error!("Could not extend session for client {client_id}: {error}");
            jar
        });
    copy_set_cookie_headers(jar.into_response().headers(), response.headers_mut());

    response
}

/// The client named by a valid, unexpired auth cookie, and the jar holding it.
async fn authenticate(
    parts: &mut Parts,
    state: &AuthState,
) -> Option<(ClientId, PrivateCookieJar)> {
    let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Could not read cookie jar: {error:?}");
            return None;
        }
    };

    let token = get_token_from_cookies(&jar).ok()?;

    Some((token.client_id, jar))
}

fn log_in_url_for(request: &Request) -> String {
    build_log_in_redirect_url(request)
        .or_else(|| {
            tracing::warn!("Could not build a redirect URL for {}", request.uri());
            build_log_in_redirect_url_from_target(endpoints::EXPENSE_LIST)
        })
        .unwrap_or_else(|| endpoints::LOG_IN.to_owned())
}

fn copy_set_cookie_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for value in from.get_all(SET_COOKIE) {
        to.append(SET_COOKIE, value.clone());
    }
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::{Path, State},
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime};

    use axum::http::{
        HeaderMap, HeaderValue,
        header::{CONTENT_TYPE, SET_COOKIE},
    };

    use crate::{
        Error,
        auth::{AuthState, COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, auth_guard, set_auth_cookie},
        client::ClientId,
        endpoints,
    };

    use super::copy_set_cookie_headers;

    async fn test_handler(Extension(client_id): Extension<ClientId>) -> String {
        format!("Hello, client {client_id}!")
    }

    async fn stub_log_in_route(
        State(state): State<AuthState>,
        Path(client_id): Path<i64>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, ClientId::new(client_id), state.cookie_duration)
    }

    const TEST_LOG_IN_ROUTE: &str = "/log_in/{client_id}";
    const TEST_PROTECTED_ROUTE: &str = "/protected";

    fn get_test_server(cookie_duration: Duration) -> TestServer {
        let hash = sha2::Sha512::digest("nafstenoas");
        let state = AuthState {
            cookie_key: Key::from(&hash),
            cookie_duration,
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler).post(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {:?}, want {:?}",
            left,
            right
        );
    }

    fn log_in_redirect_to(target: &str) -> String {
        let query = serde_urlencoded::to_string([("redirect_url", target)]).unwrap();
        format!("{}?{}", endpoints::LOG_IN, query)
    }

    #[tokio::test]
    async fn protected_route_receives_client_id() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let response = server.post("/log_in/42").await;
        response.assert_status_ok();
        let token_cookie = response.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        response.assert_text("Hello, client 42!");
    }

    #[tokio::test]
    async fn auth_guard_extends_valid_cookie_duration() {
        let server = get_test_server(Duration::minutes(30));
        let response = server.post("/log_in/1").await;
        response.assert_status_ok();
        let mut token_cookie = response.cookie(COOKIE_TOKEN);
        let stale_expiry = OffsetDateTime::now_utc() + Duration::minutes(30);
        assert_date_time_close(token_cookie.expires_datetime().unwrap(), stale_expiry);
        token_cookie.set_expires(None);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        let auth_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            auth_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::minutes(30),
        );
        assert_eq!(auth_cookie.secure(), Some(true));
        assert_eq!(auth_cookie.http_only(), Some(true));
        assert_eq!(auth_cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn no_auth_cookie_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_redirect_to(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn form_post_without_auth_cookie_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server.post(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_redirect_to(endpoints::EXPENSE_LIST)
        );
    }

    #[tokio::test]
    async fn invalid_auth_cookie_redirects_to_log_in() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build())
            .await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_redirect_to(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn expired_token_redirects_to_log_in() {
        let server = get_test_server(Duration::seconds(-5));
        let response = server.post("/log_in/1").await;
        response.assert_status_ok();
        let mut token_cookie = response.cookie(COOKIE_TOKEN);
        token_cookie.set_expires(None);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn redirect_keeps_path_and_query_of_get_request() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let target = format!("{TEST_PROTECTED_ROUTE}?expId=7");

        let response = server.get(&target).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), log_in_redirect_to(&target));
    }

    #[test]
    fn copies_every_set_cookie_header() {
        let mut from = HeaderMap::new();
        from.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        from.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        from.append(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let mut to = HeaderMap::new();
        to.append(SET_COOKIE, HeaderValue::from_static("c=3"));

        copy_set_cookie_headers(&from, &mut to);

        let got = to
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(got, ["c=3", "a=1", "b=2"]);
        assert!(to.get(CONTENT_TYPE).is_none());
    }
}
