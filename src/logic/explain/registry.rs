//! Explanation Registry
//!
//! Maps feature identifiers emitted by the classification service to
//! human-readable explanations. Lookups are exact and case-sensitive; a miss
//! resolves to the text stored under [`DEFAULT_KEY`].

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

/// Reserved key holding the fallback explanation
pub const DEFAULT_KEY: &str = "default";

const DEFAULT_EXPLANATION: &str =
    "This characteristic of the URL influenced the verdict, but no detailed explanation is available for it.";

// ============================================================================
// BUILT-IN TABLE
// ============================================================================

static BUILTIN_ENTRIES: &[(&str, &str)] = &[
    (DEFAULT_KEY, DEFAULT_EXPLANATION),
    // Addressing
    ("ip_address", "Using an IP address instead of a domain name is a strong indicator of phishing behavior."),
    ("domain_in_ip", "The host is a raw IP address rather than a registered domain name, which legitimate sites rarely do."),
    ("url_shortened", "The link goes through a URL shortener, which hides the real destination."),
    ("has_https", "Whether the link uses HTTPS. Its absence is suspicious, though many phishing sites now use HTTPS too."),
    ("email_in_url", "The URL contains an email address or mailto reference, a pattern used to harvest credentials."),
    // Whole-URL lexical features
    ("length_url", "Unusually long URLs are often used to hide the real destination or mimic legitimate paths."),
    ("qty_dot_url", "Many dots in the URL can indicate nested subdomains crafted to imitate a trusted brand."),
    ("qty_hyphen_url", "Hyphens are frequently used to build look-alike domains such as secure-login-bank.com."),
    ("qty_underline_url", "Underscores are uncommon in legitimate URLs and often appear in generated phishing links."),
    ("qty_slash_url", "A deep path with many slashes can bury a deceptive page inside a compromised site."),
    ("qty_questionmark_url", "Multiple query markers suggest redirect tricks or obfuscated parameters."),
    ("qty_equal_url", "Many key=value pairs can carry tracking tokens or embedded redirect targets."),
    ("qty_at_url", "An @ symbol makes browsers ignore everything before it, a classic trick to disguise the real host."),
    ("qty_and_url", "Many & separators indicate heavily parameterised links, common in redirect chains."),
    ("qty_exclamation_url", "Exclamation marks are rare in legitimate URLs and often signal obfuscation."),
    ("qty_space_url", "Spaces in a URL are unusual and can be used to confuse link previews."),
    ("qty_tilde_url", "A tilde often points to personal directories on shared hosting, frequently abused for phishing kits."),
    ("qty_comma_url", "Commas are unusual in URLs and can indicate crafted or malformed links."),
    ("qty_plus_url", "Plus signs can encode spaces or hide payloads inside the link."),
    ("qty_asterisk_url", "Asterisks almost never appear in legitimate URLs."),
    ("qty_hashtag_url", "Fragments (#) can hide content from servers and scanners while still steering the page."),
    ("qty_dollar_url", "Dollar signs are unusual in URLs and often part of obfuscated links."),
    ("qty_percent_url", "Heavy percent-encoding is used to hide suspicious characters or keywords."),
    ("qty_tld_url", "A multi-part top-level domain can be used to imitate a trusted country or brand domain."),
    // Domain features
    ("qty_dot_domain", "A domain with many dots stacks subdomains to make a trusted brand appear at the start of the host."),
    ("qty_hyphen_domain", "Hyphenated domains are commonly registered to imitate well-known brands."),
    ("qty_underline_domain", "Underscores in a host name are non-standard and suspicious."),
    ("domain_length", "Very long domain names are often generated or crafted to mislead."),
    ("qty_vowels_domain", "An unusual vowel distribution suggests an auto-generated or random-looking domain."),
    // Path, file and query features
    ("qty_dot_directory", "Dots inside the path can indicate hidden file names or traversal tricks."),
    ("directory_length", "A long path can hide a phishing page deep inside a compromised site."),
    ("qty_dot_file", "Multiple dots in the file name can disguise the real file type."),
    ("file_length", "An unusually long file name is typical of generated phishing pages."),
    ("qty_params", "The presence of query parameters, which phishing links often use to carry victim data or redirects."),
    ("params_length", "Long query strings can carry encoded redirects or tracking payloads."),
    // Registration and infrastructure
    ("time_domain_activation", "Recently registered domains are much more likely to be used for phishing."),
    ("time_domain_expiration", "Domains registered for a short period are typical of throw-away phishing sites."),
    ("qty_ip_resolved", "The number of IP addresses the domain resolves to; unusual counts can indicate fast-flux hosting."),
    ("qty_nameservers", "The number of name servers; phishing domains often have minimal DNS setups."),
    ("qty_mx_servers", "The number of mail servers; legitimate organisations usually publish mail records."),
    ("time_response", "How quickly the site responded; very slow or very fast responses can indicate unusual hosting."),
    ("domain_spf", "Whether the domain publishes an SPF record; missing email authentication is common for phishing domains."),
    ("ttl_hostname", "The DNS time-to-live; very short values are associated with rapidly changing malicious infrastructure."),
    ("tls_ssl_certificate", "The remaining validity of the TLS certificate; missing or short-lived certificates are suspicious."),
    ("qty_redirects", "Multiple redirects are used to hide the final destination from users and filters."),
    ("url_google_index", "Pages that are not indexed by search engines are more likely to be short-lived phishing pages."),
    ("domain_google_index", "Domains that are not indexed by search engines are often newly created for phishing."),
    ("asn_ip", "The network (ASN) hosting the site; some networks host a disproportionate share of malicious sites."),
];

static BUILTIN: Lazy<Arc<ExplanationRegistry>> =
    Lazy::new(|| Arc::new(ExplanationRegistry::from_entries(BUILTIN_ENTRIES.iter().copied())));

// ============================================================================
// REGISTRY
// ============================================================================

/// Read-only feature id → explanation mapping
#[derive(Debug, Clone)]
pub struct ExplanationRegistry {
    entries: HashMap<String, String>,
}

impl ExplanationRegistry {
    /// Shared registry built from the bundled explanation table
    pub fn builtin() -> Arc<ExplanationRegistry> {
        Arc::clone(&*BUILTIN)
    }

    /// Build a registry from `(feature_id, text)` pairs.
    ///
    /// Blank texts are dropped. If no usable `default` entry is given, the
    /// bundled fallback text is used so lookups never return an empty string.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map: HashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();

        map.entry(DEFAULT_KEY.to_string())
            .or_insert_with(|| DEFAULT_EXPLANATION.to_string());

        Self { entries: map }
    }

    /// Explanation for `feature_id`, or the default text on a miss
    pub fn explain(&self, feature_id: &str) -> &str {
        self.entries
            .get(feature_id)
            .or_else(|| self.entries.get(DEFAULT_KEY))
            .map(String::as_str)
            .unwrap_or(DEFAULT_EXPLANATION)
    }

    /// Whether `feature_id` has its own explanation
    pub fn contains(&self, feature_id: &str) -> bool {
        feature_id != DEFAULT_KEY && self.entries.contains_key(feature_id)
    }

    pub fn default_explanation(&self) -> &str {
        self.explain(DEFAULT_KEY)
    }

    /// Number of explained features, excluding the default entry
    pub fn len(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_feature() {
        let registry = ExplanationRegistry::builtin();
        assert_eq!(
            registry.explain("length_url"),
            "Unusually long URLs are often used to hide the real destination or mimic legitimate paths."
        );
        assert_eq!(
            registry.explain("ip_address"),
            "Using an IP address instead of a domain name is a strong indicator of phishing behavior."
        );
    }

    #[test]
    fn test_unknown_feature_falls_back() {
        let registry = ExplanationRegistry::builtin();
        let text = registry.explain("not_a_real_feature");
        assert_eq!(text, registry.default_explanation());
        assert!(!text.is_empty());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = ExplanationRegistry::builtin();
        assert!(registry.contains("length_url"));
        assert!(!registry.contains("LENGTH_URL"));
        assert_eq!(registry.explain("LENGTH_URL"), registry.default_explanation());
    }

    #[test]
    fn test_builtin_has_no_blank_entries() {
        let registry = ExplanationRegistry::builtin();
        for (id, _) in BUILTIN_ENTRIES {
            assert!(!registry.explain(id).trim().is_empty(), "{} is blank", id);
        }
        assert_eq!(registry.len(), BUILTIN_ENTRIES.len() - 1);
    }

    #[test]
    fn test_custom_registry_without_default() {
        let registry = ExplanationRegistry::from_entries([("a", "Alpha"), ("b", "   ")]);
        assert_eq!(registry.explain("a"), "Alpha");
        // blank text is dropped, so "b" resolves to the default
        assert!(!registry.contains("b"));
        assert_eq!(registry.explain("b"), DEFAULT_EXPLANATION);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_custom_default_is_honored() {
        let registry = ExplanationRegistry::from_entries([(DEFAULT_KEY, "Fallback")]);
        assert_eq!(registry.explain("anything"), "Fallback");
        assert!(registry.is_empty());
    }
}
