//! URL helpers used before and after extraction.

use url::Url;

/// Domain reported for URLs that cannot be parsed
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// True iff `input` parses as an absolute URL with an `http` or `https` scheme
pub fn validate_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Hostname of `input`, or `"unknown"` when it does not parse or has no host
pub fn domain_of(input: &str) -> String {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_http_and_https() {
        assert!(validate_url("https://a.com"));
        assert!(validate_url("http://a.com/path?q=1#frag"));
        assert!(validate_url("https://sub.example.com:8443/x"));
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        assert!(!validate_url("ftp://a.com"));
        assert!(!validate_url("mailto:someone@example.com"));
        assert!(!validate_url("file:///etc/hosts"));
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(!validate_url("not a url"));
        assert!(!validate_url(""));
        assert!(!validate_url("example.com"));
        assert!(!validate_url("https://"));
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://sub.example.com/path"), "sub.example.com");
        assert_eq!(domain_of("http://localhost:3000/"), "localhost");
        assert_eq!(domain_of("garbage"), "unknown");
        assert_eq!(domain_of("mailto:someone@example.com"), "unknown");
    }
}
