//! Stateless unauthorized-link classifier.
//!
//! Recognized links:
//! - scheme URLs: `http://`, `https://`, `ftp://`
//! - Telegram deep links: `tg://…` (treated as host `t.me`)
//! - `www.` hosts with any TLD (`www.casino.bet`)
//! - bare hosts with a known TLD (`bit.ly/x`, `t.me/+invite`, `telegram.me/joinchat/…`)
//!
//! A link is allowed when its host equals an allow-listed host or is a subdomain of one.
//! A leading `www.` is ignored on both sides. E-mail addresses are not links.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;

static SCHEME_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?|ftp)://(?:[^\s/@]*@)?([^\s/:?#\]\[)(<>]+)").expect("valid scheme regex")
});

static TG_DEEP_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btg://\S+").expect("valid deep-link regex"));

/// TLDs recognized for bare hosts. Kept short so ordinary words joined by dots
/// ("e.g.", "v1.2", "file.txt") are not flagged.
const BARE_TLDS: &[&str] = &[
    "com", "net", "org", "io", "me", "ru", "xyz", "info", "biz", "co", "in", "app", "dev", "gg",
    "ly", "to", "top", "site", "online", "link", "club", "shop", "store", "live", "pro", "uk",
    "us", "de", "cc", "tk", "ml", "ga", "cf", "gq", "su", "ua", "kz", "by", "tv", "dog", "icu",
    "vip", "win", "bid", "click", "bet", "casino", "loan", "space", "website",
];

static WWW_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[\s(\[<>'\x22,;])(www\.(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63})",
    )
    .expect("valid www-host regex")
});

static BARE_HOST: Lazy<Regex> = Lazy::new(|| {
    // Longest first: alternation is leftmost-first, so "top" must be tried before "to".
    let mut tlds = BARE_TLDS.to_vec();
    tlds.sort_by_key(|t| Reverse(t.len()));
    Regex::new(&format!(
        r"(?i)(?:^|[\s(\[<>'\x22,;])((?:[a-z0-9](?:[a-z0-9-]{{0,61}}[a-z0-9])?\.)+(?:{}))",
        tlds.join("|")
    ))
    .expect("valid bare-host regex")
});

const TELEGRAM_HOST: &str = "t.me";

#[derive(Debug, Clone)]
pub struct LinkSpamMatcher {
    enabled: bool,
    allowlist: Vec<String>,
}

impl LinkSpamMatcher {
    pub fn new(enabled: bool, allowlist: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let allowlist = allowlist
            .into_iter()
            .map(|h| normalize_host(h.as_ref()))
            .filter(|h| !h.is_empty())
            .collect();
        Self { enabled, allowlist }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            allowlist: Vec::new(),
        }
    }

    /// True when enabled and `text` contains at least one link whose host is not allow-listed.
    pub fn is_spam(&self, text: &str) -> bool {
        if !self.enabled {
            return false;
        }
        extract_hosts(text)
            .iter()
            .any(|host| !self.is_allowed(host))
    }

    fn is_allowed(&self, host: &str) -> bool {
        self.allowlist.iter().any(|allowed| {
            host == allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// All link hosts found in `text`, normalized (lowercase, no `www.`, no trailing dot).
pub fn extract_hosts(text: &str) -> Vec<String> {
    let mut hosts: Vec<String> = SCHEME_URL
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| normalize_host(m.as_str()))
        .collect();

    if TG_DEEP_LINK.is_match(text) {
        hosts.push(TELEGRAM_HOST.to_string());
    }

    // Scheme URLs are preceded by "/" so the host patterns never re-match them.
    for pattern in [&*WWW_HOST, &*BARE_HOST] {
        hosts.extend(
            pattern
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .filter(|m| ends_host(&text[m.end()..]))
                .map(|m| normalize_host(m.as_str())),
        );
    }

    hosts.retain(|h| !h.is_empty());
    hosts.sort();
    hosts.dedup();
    hosts
}

/// A bare host must not run on into more word characters ("example.company", "a.com.evil").
fn ends_host(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        None => true,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_alphanumeric()),
        Some(c) => !(c.is_ascii_alphanumeric() || c == '@' || c == '-' || c == '_'),
    }
}

fn normalize_host(host: &str) -> String {
    let lower = host.trim().trim_end_matches('.').to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(allow: &[&str]) -> LinkSpamMatcher {
        LinkSpamMatcher::new(true, allow.iter().copied())
    }

    #[test]
    fn disabled_matcher_never_flags() {
        let m = LinkSpamMatcher::disabled();
        assert!(!m.is_spam("https://evil.example.com"));
        assert!(!m.is_spam("join t.me/+AbCdEf now"));
        let m = LinkSpamMatcher::new(false, ["github.com"]);
        assert!(!m.is_spam("http://spam.xyz"));
    }

    #[test]
    fn scheme_urls_are_flagged() {
        let m = matcher(&[]);
        assert!(m.is_spam("check https://example.com/page"));
        assert!(m.is_spam("HTTP://EXAMPLE.ORG"));
        assert!(m.is_spam("ftp://files.example.net/x"));
    }

    #[test]
    fn bare_domains_and_invites_are_flagged() {
        let m = matcher(&[]);
        assert!(m.is_spam("visit www.casino.top today"));
        assert!(m.is_spam("bit.ly/abc"));
        assert!(m.is_spam("join t.me/+AbCdEf"));
        assert!(m.is_spam("telegram.me/joinchat/xyz"));
        assert!(m.is_spam("(see example.com)"));
        assert!(m.is_spam("go to example.com."));
        assert!(m.is_spam("tg://resolve?domain=spam"));
    }

    #[test]
    fn plain_text_is_not_flagged() {
        let m = matcher(&[]);
        assert!(!m.is_spam("hello everyone"));
        assert!(!m.is_spam("e.g. version 1.2.3 works"));
        assert!(!m.is_spam("open report.txt please"));
        assert!(!m.is_spam("mail me at someone@example.com"));
        assert!(!m.is_spam("end of sentence.Next one"));
    }

    #[test]
    fn allowlisted_hosts_and_subdomains_pass() {
        let m = matcher(&["github.com", "www.wikipedia.org"]);
        assert!(!m.is_spam("https://github.com/rust-lang/rust"));
        assert!(!m.is_spam("https://gist.github.com/x"));
        assert!(!m.is_spam("en.wikipedia.org/wiki/Rust"));
        assert!(m.is_spam("https://notgithub.com"));
    }

    #[test]
    fn one_unlisted_link_among_allowed_ones_is_spam() {
        let m = matcher(&["github.com"]);
        assert!(m.is_spam("https://github.com and https://spam.xyz"));
        assert!(m.is_spam("github.com spam.xyz"));
    }

    #[test]
    fn www_hosts_are_flagged_whatever_the_tld() {
        let m = matcher(&["www.example.org"]);
        assert!(m.is_spam("visit www.casino.bet now"));
        assert!(m.is_spam("www.spam.zz"));
        assert!(m.is_spam("(WWW.Promo.Online)"));
        assert!(!m.is_spam("docs at www.example.org"));
        assert_eq!(extract_hosts("www.casino.top"), vec!["casino.top".to_string()]);
    }

    #[test]
    fn common_spam_tlds_are_recognized_without_www() {
        let m = matcher(&[]);
        assert!(m.is_spam("best odds on lucky.bet"));
        assert!(m.is_spam("spin at royal.casino today"));
    }

    #[test]
    fn longer_words_after_a_tld_are_not_hosts() {
        let m = matcher(&[]);
        assert!(!m.is_spam("our example.company rocks"));
        assert!(m.is_spam("shop at casino.top"));
    }

    #[test]
    fn extract_hosts_strips_credentials_and_ports() {
        assert_eq!(
            extract_hosts("https://user:pw@Example.COM:8080/x"),
            vec!["example.com".to_string()]
        );
    }
}
