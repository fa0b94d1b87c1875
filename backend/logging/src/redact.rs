//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens, and credentials embedded in URLs from
//! strings prior to logging. Model output routinely echoes repository URLs,
//! which may carry `user:token@` pairs.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(gh[pousr]_[A-Za-z0-9]{36,})")
        .unwrap()
});
static URL_CREDENTIALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<scheme>[a-zA-Z][a-zA-Z0-9+.-]*://)[^/\s@:]+(:[^/\s@]*)?@").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    URL_CREDENTIALS_RE
        .replace_all(&redacted, "${scheme}[REDACTED_CREDENTIALS]@")
        .into_owned()
}
