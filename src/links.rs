// Link target normalization

use url::Url;

/// Adds `https://` when `raw` has no http(s) scheme and checks the result
/// parses as a URL with a host. Returns `None` for anything unusable.
///
/// The normalized string is returned as written, so `https://x.com` stays
/// `https://x.com` rather than gaining a trailing slash.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = Url::parse(&candidate).ok()?;
    parsed.host_str().filter(|h| !h.is_empty())?;
    Some(candidate)
}

/// `mailto:` target for an email address.
pub fn mailto(email: &str) -> String {
    format!("mailto:{}", email.trim())
}
