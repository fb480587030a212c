/// Parse and validate a bind address for the dev server.
///
/// Accepts host names and IP literals; rejects empty values, whitespace, and
/// anything that looks like a URL.
///
/// # Examples
///
/// Valid: localhost, 0.0.0.0, 127.0.0.1, ::1
/// Invalid: "", "http://localhost", "local host", "localhost:3000"
pub fn parse_host(s: &str) -> Result<String, String> {
    let host = s.trim();
    if host.is_empty() {
        return Err("Host cannot be empty".to_string());
    }

    if host.contains("://") {
        return Err(format!(
            "Host must be an address, not a URL: '{}' (try '{}')",
            s,
            host.split("://").nth(1).unwrap_or_default().trim_end_matches('/')
        ));
    }

    if host.chars().any(char::is_whitespace) {
        return Err(format!("Host cannot contain whitespace: '{}'", s));
    }

    // A single colon means host:port; IPv6 literals have several.
    if host.matches(':').count() == 1 {
        return Err(format!("Host cannot include a port: '{}' (use --port)", s));
    }

    Ok(host.to_string())
}
