use axum::http::HeaderMap;

use bookmark_domain::RuntimeConfig;

/// Session token from the Authorization header, falling back to the
/// platform's session cookie. The token is opaque here; the platform
/// session layer validates it.
pub fn session_token(config: &RuntimeConfig, headers: &HeaderMap) -> Option<String> {
    extract_bearer(headers).or_else(|| extract_cookie(headers, &config.session_cookie_name))
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get("Cookie")?.to_str().ok()?;
    value.split(';').find_map(|pair| {
        let (key, val) = pair.trim().split_once('=')?;
        if key == name && !val.is_empty() {
            Some(val.to_string())
        } else {
            None
        }
    })
}
