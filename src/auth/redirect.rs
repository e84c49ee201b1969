//! Helpers for redirect URLs during log-in.

use axum::{
    extract::Request,
    http::{Method, Uri},
};

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    path != endpoints::LOG_IN
}

/// Reduce `raw_url` to a local path and query, or `None` if it points
/// somewhere else or back at the log-in page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the log-in URL that sends the client back to `request` afterwards.
///
/// Only GET requests can be replayed by a redirect, so form submissions
/// return to the expense list instead.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.method() == Method::GET {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    } else {
        endpoints::EXPENSE_LIST.to_owned()
    };

    build_log_in_redirect_url_from_target(&redirect_target)
}

pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN, param)),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

#[cfg(test)]
mod redirect_tests {
    use axum::{body::Body, extract::Request, http::Method};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn accepts_local_path_with_query() {
        let got = normalize_redirect_url("/showUpdate?expId=3");

        assert_eq!(got.as_deref(), Some("/showUpdate?expId=3"));
    }

    #[test]
    fn rejects_external_urls() {
        assert_eq!(normalize_redirect_url("https://example.com/list"), None);
        assert_eq!(normalize_redirect_url("//example.com/list"), None);
    }

    #[test]
    fn rejects_log_in_page() {
        assert_eq!(normalize_redirect_url(endpoints::LOG_IN), None);
    }

    #[test]
    fn form_submission_redirects_back_to_list() {
        let request = Request::builder()
            .method(Method::POST)
            .uri(endpoints::SUBMIT_ADD_EXPENSE)
            .body(Body::empty())
            .unwrap();

        let got = build_log_in_redirect_url(&request).unwrap();

        let want_query =
            serde_urlencoded::to_string([("redirect_url", endpoints::EXPENSE_LIST)]).unwrap();
        assert_eq!(got, format!("{}?{}", endpoints::LOG_IN, want_query));
    }
}
