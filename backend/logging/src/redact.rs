//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens and URI credentials from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(AIza[0-9A-Za-z\-_]{35})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});
static URI_CREDENTIALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<scheme>[a-zA-Z][a-zA-Z0-9+.\-]*://)[^/\s:@]+:[^/\s@]+@").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    URI_CREDENTIALS_RE
        .replace_all(&redacted, "${scheme}[REDACTED_CREDENTIALS]@")
        .to_string()
}
