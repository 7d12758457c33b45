//! Page object support.
//!
//! A page object is the exclusive gateway to one logical page or page
//! group: it owns a locator registry and exposes intention-revealing
//! actions and assertions, hiding raw selector detail from scenarios.
//! Page objects are stateless between actions except for the session
//! handle they were constructed with.

use crate::registry::LocatorRegistry;

/// A page or page group in the target site
pub trait PageObject {
    /// URL pattern that identifies this page (see [`UrlMatcher`])
    fn url_pattern(&self) -> &str;

    /// The locators this page declares
    fn registry(&self) -> &dyn LocatorRegistry;

    /// Page name for logs and failure reports
    fn page_name(&self) -> &str {
        self.registry().page_name()
    }
}

/// Glob-style URL pattern matcher.
///
/// Patterns match against the path of a URL (scheme and host are ignored):
/// - literal segments: `/checkout`
/// - `*` matches exactly one segment: `/product/*`
/// - `**` matches any number of segments: `**/checkout`
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UrlSegment {
    Literal(String),
    Single,
    Globstar,
}

impl UrlMatcher {
    /// Parse a pattern
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => UrlSegment::Single,
                "**" => UrlSegment::Globstar,
                literal => UrlSegment::Literal(literal.to_string()),
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// The original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether a URL's path matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let path = Self::path_of(url);
        let url_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        Self::match_segments(&self.segments, &url_segments)
    }

    /// Strip scheme, host, query, and fragment
    fn path_of(url: &str) -> &str {
        let after_scheme = url
            .find("://")
            .map_or(url, |idx| {
                let rest = &url[idx + 3..];
                rest.find('/').map_or("", |slash| &rest[slash..])
            });
        let end = after_scheme
            .find(['?', '#'])
            .unwrap_or(after_scheme.len());
        &after_scheme[..end]
    }

    fn match_segments(pattern: &[UrlSegment], url: &[&str]) -> bool {
        match pattern.first() {
            None => url.is_empty(),
            Some(UrlSegment::Globstar) => {
                // Globstar consumes zero or more segments
                (0..=url.len()).any(|skip| Self::match_segments(&pattern[1..], &url[skip..]))
            }
            Some(UrlSegment::Single) => {
                !url.is_empty() && Self::match_segments(&pattern[1..], &url[1..])
            }
            Some(UrlSegment::Literal(lit)) => {
                url.first() == Some(&lit.as_str())
                    && Self::match_segments(&pattern[1..], &url[1..])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match_ignores_host() {
            let matcher = UrlMatcher::new("/checkout");
            assert!(matcher.matches("https://practicesoftwaretesting.com/checkout"));
            assert!(!matcher.matches("https://practicesoftwaretesting.com/contact"));
        }

        #[test]
        fn test_globstar_matches_any_prefix() {
            let matcher = UrlMatcher::new("**/checkout");
            assert!(matcher.matches("https://shop.example/checkout"));
            assert!(matcher.matches("https://shop.example/en/cart/checkout"));
            assert!(!matcher.matches("https://shop.example/checkout/payment"));
        }

        #[test]
        fn test_single_wildcard_consumes_one_segment() {
            let matcher = UrlMatcher::new("/product/*");
            assert!(matcher.matches("https://shop.example/product/01HGW"));
            assert!(!matcher.matches("https://shop.example/product"));
            assert!(!matcher.matches("https://shop.example/product/01HGW/reviews"));
        }

        #[test]
        fn test_query_and_fragment_are_ignored() {
            let matcher = UrlMatcher::new("/contact");
            assert!(matcher.matches("https://shop.example/contact?ref=nav#form"));
        }

        #[test]
        fn test_root_pattern() {
            let matcher = UrlMatcher::new("/");
            assert!(matcher.matches("https://shop.example/"));
            assert!(matcher.matches("https://shop.example"));
            assert!(!matcher.matches("https://shop.example/checkout"));
        }

        #[test]
        fn test_pattern_getter() {
            assert_eq!(UrlMatcher::new("**/checkout").pattern(), "**/checkout");
        }
    }
}
