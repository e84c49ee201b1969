//! Log-in, log-out and the auth guard that identifies the client behind each request.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod token;

pub(crate) use cookie::{
    DEFAULT_COOKIE_DURATION, get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub(crate) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
