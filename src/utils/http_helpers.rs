/// Maximum number of error body characters surfaced to callers.
pub const MAX_ERROR_CHARS: usize = 200;

/// Joins a base URL and a path with exactly one `/` between them.
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Trims and truncates an error body so it can be shown to a user.
pub fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

/// Extracts the credential from an `Authorization: Bearer <token>` value.
/// The scheme is matched case-insensitively.
pub fn bearer_credential(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;
    let credential = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(credential)
}
