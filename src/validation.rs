// Validation utilities module
// Provides custom validation functions for domain-specific rules

use validator::ValidationError;

/// Validates that every entry in a photo URL list parses as an http(s) URL.
/// List length bounds (1..=10) are enforced by the DTO itself.
pub fn validate_photo_urls(urls: &[String]) -> Result<(), ValidationError> {
    for url in urls {
        if !is_http_url(url) {
            return Err(ValidationError::new("invalid_photo_url"));
        }
    }
    Ok(())
}

/// Validates a WhatsApp contact string: at least 8 characters, digits with
/// an optional leading '+'.
pub fn validate_whatsapp(contact: &str) -> Result<(), ValidationError> {
    let digits = contact.strip_prefix('+').unwrap_or(contact);
    if digits.len() < 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("invalid_whatsapp"));
    }
    Ok(())
}

fn is_http_url(url: &str) -> bool {
    let rest = if let Some(rest) = url.strip_prefix("https://") {
        rest
    } else if let Some(rest) = url.strip_prefix("http://") {
        rest
    } else {
        return false;
    };
    !rest.is_empty() && !rest.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_photo_urls() {
        let urls = vec![
            "https://example.com/rex.jpg".to_string(),
            "http://cdn.example.com/a/b.png".to_string(),
        ];
        assert!(validate_photo_urls(&urls).is_ok());
    }

    #[test]
    fn test_rejects_non_url_entries() {
        let urls = vec!["not-a-url".to_string()];
        assert!(validate_photo_urls(&urls).is_err());

        let urls = vec!["ftp://example.com/rex.jpg".to_string()];
        assert!(validate_photo_urls(&urls).is_err());
    }

    #[test]
    fn test_whatsapp_accepts_international_format() {
        assert!(validate_whatsapp("+5511999999999").is_ok());
        assert!(validate_whatsapp("11999999999").is_ok());
    }

    #[test]
    fn test_whatsapp_rejects_short_or_alpha() {
        assert!(validate_whatsapp("1234567").is_err());
        assert!(validate_whatsapp("not-a-phone").is_err());
    }
}
