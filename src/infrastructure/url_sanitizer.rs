use crate::domain::error::HrefError;
use url::{ParseError, Url};

const BLOCKED_SCHEMES: [&str; 5] = ["javascript", "data", "vbscript", "file", "about"];

/// Turn a raw `href` from an export into a link that is safe to import again.
///
/// Script-capable and local schemes are refused, as are web URLs without a
/// host. Protocol-relative and scheme-less hosts (`//a.com`, `a.com`,
/// `www.a.com`) get `https://`. Anything else that fails to parse is passed
/// through untouched so the normalizer can report it as malformed.
pub fn sanitize_href(raw: &str) -> Result<String, HrefError> {
    let stripped: String = raw.chars().filter(|c| !c.is_control()).collect();
    let href = stripped.trim();
    if href.is_empty() {
        return Err(HrefError::Empty);
    }

    if let Some(scheme) = blocked_scheme(href) {
        return Err(HrefError::BlockedScheme(scheme.to_string()));
    }

    if let Some(rest) = href.strip_prefix("//") {
        return with_https(rest, |_| true).ok_or_else(|| HrefError::MissingHost(href.to_string()));
    }

    match Url::parse(href) {
        Ok(url) if is_web(&url) && url.host_str().map_or(true, str::is_empty) => {
            Err(HrefError::MissingHost(href.to_string()))
        }
        Ok(_) => Ok(href.to_string()),
        Err(ParseError::EmptyHost) => Err(HrefError::MissingHost(href.to_string())),
        // bare host: only promote things that look like a domain
        Err(ParseError::RelativeUrlWithoutBase) => {
            Ok(with_https(href, |host| host.contains('.')).unwrap_or_else(|| href.to_string()))
        }
        Err(_) => Ok(href.to_string()),
    }
}

fn blocked_scheme(href: &str) -> Option<&'static str> {
    let lower = href.to_ascii_lowercase();
    BLOCKED_SCHEMES.into_iter().find(|scheme| {
        lower
            .strip_prefix(scheme)
            .is_some_and(|rest| rest.starts_with(':'))
    })
}

fn is_web(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn with_https(rest: &str, accept_host: impl Fn(&str) -> bool) -> Option<String> {
    let candidate = format!("https://{rest}");
    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str().filter(|h| !h.is_empty())?;
    accept_host(host).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangerous_schemes_are_blocked_case_insensitively() {
        let cases = [
            ("javascript:alert('xss')", "javascript"),
            ("data:text/html,<script>alert('xss')</script>", "data"),
            ("vbscript:msgbox(\"xss\")", "vbscript"),
            ("file:///etc/passwd", "file"),
            ("about:blank", "about"),
            ("JAVASCRIPT:alert(\"XSS\")", "javascript"),
            ("  JavaScript:void(0)", "javascript"),
            ("java\tscript:alert(1)", "javascript"),
        ];
        for (href, scheme) in cases {
            assert_eq!(
                sanitize_href(href),
                Err(HrefError::BlockedScheme(scheme.to_string())),
                "{href}"
            );
        }
    }

    #[test]
    fn web_links_pass_and_bare_hosts_get_https() {
        let cases = [
            ("http://example.com", "http://example.com"),
            ("https://example.com", "https://example.com"),
            ("//example.com", "https://example.com"),
            ("example.com", "https://example.com"),
            ("example.org/path?q=1", "https://example.org/path?q=1"),
            ("www.example.com", "https://www.example.com"),
            (" https://a.com/x ", "https://a.com/x"),
        ];
        for (href, expected) in cases {
            assert_eq!(sanitize_href(href).as_deref(), Ok(expected), "{href}");
        }
    }

    #[test]
    fn empty_and_hostless_links_are_refused() {
        assert_eq!(sanitize_href(""), Err(HrefError::Empty));
        assert_eq!(sanitize_href("   "), Err(HrefError::Empty));
        assert_eq!(
            sanitize_href("http://"),
            Err(HrefError::MissingHost("http://".to_string()))
        );
        assert_eq!(
            sanitize_href("https://"),
            Err(HrefError::MissingHost("https://".to_string()))
        );
        assert_eq!(
            sanitize_href("//"),
            Err(HrefError::MissingHost("//".to_string()))
        );
    }

    #[test]
    fn other_schemes_and_junk_pass_through_for_the_normalizer() {
        assert_eq!(sanitize_href("mailto:me@a.com").as_deref(), Ok("mailto:me@a.com"));
        assert_eq!(sanitize_href("::nope::").as_deref(), Ok("::nope::"));
        assert_eq!(sanitize_href("localhost").as_deref(), Ok("localhost"));
    }
}
