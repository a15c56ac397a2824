// src/domain.rs
//! # Domain Extraction
//!
//! Pulls the registrable domain (second-level label + public suffix) out
//! of a website URL so it can be compared against a company name. Known
//! multi-part public suffixes (co.uk, com.au, ...) are kept whole, and
//! legal-entity suffixes glued to the second-level label are stripped
//! ("gulftradingllc.ae" → "gulftrading.ae").
//!
//! Extraction is total: any URL that cannot be parsed down to a usable
//! host yields an empty string, never an error.

use url::{Host, Url};

use crate::similarity::TextMatcher;

/// Multi-part public suffixes recognized without a full public-suffix
/// database. Covers the registries this tool actually encounters.
const MULTI_PART_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au", "org.au", "gov.au", "co.nz", "org.nz",
    "gov.nz", "co.za", "org.za", "gov.za", "com.br", "org.br", "gov.br", "co.jp", "or.jp",
    "go.jp", "co.ae", "org.ae", "gov.ae", "ac.ae", "com.sa", "org.sa", "com.qa", "com.kw",
    "com.bh", "com.om",
];

/// Registrable domain of a host: second-level label + public suffix.
/// `None` for IP addresses and hosts without a dot.
fn registrable_domain(host: &str) -> Option<String> {
    let host = host.strip_prefix("www.").unwrap_or(host);
    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    if parts.len() >= 3 {
        let tail = format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);
        if MULTI_PART_SUFFIXES.contains(&tail.as_str()) {
            return Some(format!("{}.{}", parts[parts.len() - 3], tail));
        }
    }

    Some(format!(
        "{}.{}",
        parts[parts.len() - 2],
        parts[parts.len() - 1]
    ))
}

impl TextMatcher {
    /// Extract the registrable domain from a URL, lower-cased, with
    /// business suffixes stripped from the end of the second-level label.
    /// Returns an empty string on any parse failure.
    pub fn domain_from_url(&self, url: &str) -> String {
        let parsed = match Url::parse(url)
            .or_else(|_| Url::parse(&format!("https://{url}")))
        {
            Ok(u) => u,
            Err(_) => return String::new(),
        };

        let host = match parsed.host() {
            // IPs carry no brandable label worth matching.
            Some(Host::Domain(d)) => d.to_lowercase(),
            _ => return String::new(),
        };

        let domain = match registrable_domain(&host) {
            Some(d) => d,
            None => return String::new(),
        };

        let (label, suffix) = match domain.split_once('.') {
            Some((l, s)) => (l, s),
            None => return String::new(),
        };

        let mut label = label.to_string();
        for s in self.normalizer().suffixes() {
            if label.len() > s.len() && label.ends_with(s.as_str()) {
                label.truncate(label.len() - s.len());
            }
        }

        format!("{label}.{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> TextMatcher {
        TextMatcher::with_defaults()
    }

    #[test]
    fn extracts_simple_domain() {
        assert_eq!(
            matcher().domain_from_url("https://gulftrading.ae/contact"),
            "gulftrading.ae"
        );
    }

    #[test]
    fn strips_www_and_subdomains() {
        assert_eq!(
            matcher().domain_from_url("https://www.gulftrading.ae"),
            "gulftrading.ae"
        );
        assert_eq!(
            matcher().domain_from_url("http://shop.gulftrading.ae/items?id=1"),
            "gulftrading.ae"
        );
    }

    #[test]
    fn keeps_multi_part_suffix_whole() {
        assert_eq!(
            matcher().domain_from_url("https://www.acme.co.uk"),
            "acme.co.uk"
        );
        assert_eq!(
            matcher().domain_from_url("https://portal.gulfstar.co.ae"),
            "gulfstar.co.ae"
        );
    }

    #[test]
    fn strips_glued_business_suffix() {
        assert_eq!(
            matcher().domain_from_url("https://gulftradingllc.ae"),
            "gulftrading.ae"
        );
        assert_eq!(
            matcher().domain_from_url("https://acmeholdings.com"),
            "acme.com"
        );
    }

    #[test]
    fn lowercases() {
        assert_eq!(
            matcher().domain_from_url("HTTPS://GulfTrading.AE"),
            "gulftrading.ae"
        );
    }

    #[test]
    fn tolerates_missing_scheme() {
        assert_eq!(
            matcher().domain_from_url("gulftrading.ae/about"),
            "gulftrading.ae"
        );
    }

    #[test]
    fn degrades_to_empty_on_garbage() {
        let m = matcher();
        assert_eq!(m.domain_from_url(""), "");
        assert_eq!(m.domain_from_url("http://"), "");
        assert_eq!(m.domain_from_url("not a url at all"), "");
        assert_eq!(m.domain_from_url("http://localhost"), "");
        assert_eq!(m.domain_from_url("http://192.168.0.1/admin"), "");
    }
}
