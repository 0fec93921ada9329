//! Input validation for settings values and path identifiers

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ));
    }

    Ok(())
}

/// A request timeout of zero seconds would fail every request.
pub fn validate_timeout_secs(secs: u64) -> Result<(), String> {
    if secs == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(())
}

/// Validate a value that is interpolated verbatim into one URL path segment.
pub fn validate_path_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("identifier cannot be empty".to_string());
    }

    if let Some(c) = segment
        .chars()
        .find(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(format!(
            "identifier '{}' contains '{}', which is not allowed in a path segment",
            segment,
            c.escape_default()
        ));
    }

    if segment == "." || segment == ".." {
        return Err(format!("identifier '{}' is a relative path segment", segment));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_valid_urls() {
        assert!(validate_url("http://localhost:5000/api/").is_ok());
        assert!(validate_url("https://bot.example.com/node-bot/api/v1/").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("localhost:5000").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_timeout_secs() {
        assert!(validate_timeout_secs(30).is_ok());
        assert_eq!(
            validate_timeout_secs(0),
            Err("timeout must be greater than zero".to_string())
        );
    }

    #[test]
    fn test_validate_path_segment_accepts_ids() {
        assert!(validate_path_segment("42").is_ok());
        assert!(validate_path_segment("65f1c0a2e4b0d3").is_ok());
        assert!(validate_path_segment("bot-config_1.v2").is_ok());
    }

    #[test]
    fn test_validate_path_segment_rejects_unsafe_ids() {
        assert!(validate_path_segment("").is_err());
        assert!(validate_path_segment("a/b").is_err());
        assert!(validate_path_segment("a?b=1").is_err());
        assert!(validate_path_segment("frag#1").is_err());
        assert!(validate_path_segment("with space").is_err());
        assert!(validate_path_segment("50%").is_err());
        assert!(validate_path_segment("..").is_err());
    }
}
