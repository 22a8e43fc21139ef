//! Redirect chain handling.

use reqwest::Method;
use url::Url;

use crate::error_handling::StepError;

/// Whether a status code is a redirect the executor follows.
pub(crate) fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Resolves a `Location` header value against the URL that produced it.
///
/// Absolute URLs are used as-is; otherwise the value is joined against the
/// current URL, which covers relative paths, query strings, and
/// protocol-relative targets.
pub(crate) fn resolve_location(current: &Url, location: &str) -> Result<Url, StepError> {
    Url::parse(location)
        .or_else(|_| current.join(location))
        .map_err(|e| StepError::Transport(format!("invalid redirect target '{location}': {e}")))
}

/// Method to use when following a redirect.
///
/// 303 always re-issues as GET (except for HEAD); 301 and 302 downgrade POST
/// to GET; 307 and 308 preserve the method.
pub(crate) fn redirect_method(status: u16, method: &Method) -> Method {
    match status {
        303 if *method != Method::HEAD => Method::GET,
        301 | 302 if *method == Method::POST => Method::GET,
        _ => method.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_status_set() {
        for status in [301, 302, 303, 307, 308] {
            assert!(is_redirect(status));
        }
        for status in [200, 204, 300, 304, 400, 404, 500] {
            assert!(!is_redirect(status));
        }
    }

    #[test]
    fn test_location_absolute() {
        let base = Url::parse("https://example.com/path").unwrap();
        let resolved = resolve_location(&base, "https://other.com/new-path").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/new-path");
    }

    #[test]
    fn test_location_relative_root() {
        let base = Url::parse("https://example.com/old/path").unwrap();
        let resolved = resolve_location(&base, "/new/path").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/new/path");
    }

    #[test]
    fn test_location_relative_path() {
        let base = Url::parse("https://example.com/old/path").unwrap();
        let resolved = resolve_location(&base, "new/path").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/old/new/path");
    }

    #[test]
    fn test_location_relative_query() {
        let base = Url::parse("https://example.com/path").unwrap();
        let resolved = resolve_location(&base, "/new?param=value").unwrap();
        assert_eq!(resolved.path(), "/new");
        assert_eq!(resolved.query(), Some("param=value"));
    }

    #[test]
    fn test_location_scheme_change() {
        let base = Url::parse("http://example.com/path").unwrap();
        let resolved = resolve_location(&base, "https://example.com/secure").unwrap();
        assert_eq!(resolved.scheme(), "https");
    }

    #[test]
    fn test_method_preserved_on_307_and_308() {
        assert_eq!(redirect_method(307, &Method::POST), Method::POST);
        assert_eq!(redirect_method(308, &Method::PUT), Method::PUT);
    }

    #[test]
    fn test_post_downgrades_to_get_on_301_302_303() {
        assert_eq!(redirect_method(301, &Method::POST), Method::GET);
        assert_eq!(redirect_method(302, &Method::POST), Method::GET);
        assert_eq!(redirect_method(303, &Method::POST), Method::GET);
    }

    #[test]
    fn test_get_and_head_keep_their_method() {
        assert_eq!(redirect_method(302, &Method::GET), Method::GET);
        assert_eq!(redirect_method(303, &Method::HEAD), Method::HEAD);
    }
}
