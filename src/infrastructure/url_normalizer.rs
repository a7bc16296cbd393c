use crate::domain::model::NormalizedUrl;
use crate::domain::traits::UrlNormalizer;
use url::Url;

pub struct DefaultUrlNormalizer;

impl UrlNormalizer for DefaultUrlNormalizer {
    fn normalize(&self, url: &str) -> NormalizedUrl {
        canonicalize(url.trim()).unwrap_or_else(|| NormalizedUrl::Unparsed(url.to_string()))
    }
}

/// Lower-cased host with a leading `www.` removed. `None` for host-less or unparsable URLs.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(strip_www(&host).to_string())
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn is_tracking_param(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.starts_with("utm_") || lower == "fbclid" || lower == "gclid"
}

fn canonicalize(raw: &str) -> Option<NormalizedUrl> {
    if raw.is_empty() {
        return None;
    }

    // The parser lower-cases scheme and host and drops default ports.
    let mut parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    // http and https address the same bookmark.
    if parsed.scheme() == "http" {
        parsed.set_scheme("https").ok()?;
        if parsed.port() == Some(443) {
            parsed.set_port(None).ok()?;
        }
    }

    let bare = strip_www(&host).to_string();
    if bare != host {
        parsed.set_host(Some(&bare)).ok()?;
    }

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    Some(NormalizedUrl::Canonical {
        value: parsed.to_string(),
        host: bare,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        DefaultUrlNormalizer.normalize(s).as_str().to_string()
    }

    #[test]
    fn lowercases_scheme_and_host_but_not_path() {
        assert_eq!(norm("HTTPS://EXAMPLE.COM/Path"), "https://example.com/Path");
    }

    #[test]
    fn strips_www_and_single_trailing_slash() {
        assert_eq!(norm("https://www.example.com/docs/"), "https://example.com/docs");
        assert_eq!(norm("https://www.example.com/"), "https://example.com/");
        assert_eq!(norm("https://example.com"), "https://example.com/");
    }

    #[test]
    fn removes_tracking_params_and_keeps_the_rest() {
        assert_eq!(
            norm("https://example.com/?page=1&utm_source=google&sort=date"),
            "https://example.com/?page=1&sort=date"
        );
        assert_eq!(
            norm("https://example.com/?fbclid=123&gclid=456&UTM_Medium=cpc"),
            "https://example.com/"
        );
    }

    #[test]
    fn drops_empty_query_string() {
        assert_eq!(norm("https://example.com/a?"), "https://example.com/a");
    }

    #[test]
    fn http_and_https_share_a_canonical_form() {
        assert_eq!(norm("http://x.com"), norm("https://www.x.com/"));
    }

    #[test]
    fn default_ports_are_dropped_and_custom_ports_kept() {
        assert_eq!(norm("http://example.com:80/a"), "https://example.com/a");
        assert_eq!(norm("https://example.com:443/a"), "https://example.com/a");
        assert_eq!(norm("http://example.com:8080/a"), "https://example.com:8080/a");
    }

    #[test]
    fn fragment_is_preserved() {
        assert_eq!(norm("https://app.io/#/inbox"), "https://app.io/#/inbox");
    }

    #[test]
    fn malformed_and_hostless_urls_fail_open() {
        let n = DefaultUrlNormalizer.normalize("not a url");
        assert!(n.is_malformed());
        assert_eq!(n.as_str(), "not a url");

        assert!(DefaultUrlNormalizer.normalize("javascript:void(0)").is_malformed());
        assert!(DefaultUrlNormalizer.normalize("").is_malformed());
    }

    #[test]
    fn extract_domain_strips_www_and_lowercases() {
        assert_eq!(extract_domain("https://WWW.GitHub.com/x").as_deref(), Some("github.com"));
        assert_eq!(extract_domain("nope"), None);
    }
}
