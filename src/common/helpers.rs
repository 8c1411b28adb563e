// Helper functions for safe logging, file naming and JSON columns

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
///
/// # Example
/// ```
/// let masked = safe_token_log("gsk_abcdefghijklmnop");
/// // Returns: "gsk_...mnop"
/// ```
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

// Stored names stay well under the 255-byte filesystem limit
const MAX_STORED_BASE_LEN: usize = 200;
const MAX_EXTENSION_LEN: usize = 10;

/// Builds a unique, filesystem-safe name for an uploaded file:
/// `{prefix}_{8 hex chars}_{original with unsafe chars replaced by '_'}`
pub fn safe_filename(prefix: &str, original: &str) -> String {
    // Drop any client-side directory components
    let base = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(original);
    let base = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let unique = uuid::Uuid::new_v4().simple().to_string();

    format!("{}_{}_{}", prefix, &unique[..8], cap_length(&base, MAX_STORED_BASE_LEN))
}

/// Shorten an ASCII name to `max` bytes, keeping a short extension
fn cap_length(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let extension = name
        .rfind('.')
        .map(|dot| &name[dot..])
        .filter(|ext| ext.len() <= MAX_EXTENSION_LEN)
        .unwrap_or("");
    format!("{}{}", &name[..max - extension.len()], extension)
}

/// Parses a JSON string column into a list, empty on bad data
pub fn parse_json_list(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_token_log() {
        assert_eq!(safe_token_log("gsk_abcdefghijklmnop"), "gsk_...mnop");
        assert_eq!(safe_token_log("short"), "***");
    }

    #[test]
    fn test_safe_filename_sanitizes_and_prefixes() {
        let name = safe_filename("resume", "../My CV (final).pdf");
        assert!(name.starts_with("resume_"));
        assert!(name.ends_with("_My_CV__final_.pdf"));
        assert!(!name.contains('/'));
        // prefix + '_' + 8 hex + '_'
        let unique = &name["resume_".len().."resume_".len() + 8];
        assert!(unique.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_safe_filename_caps_long_names() {
        let original = format!("{}.txt", "a".repeat(246));
        let name = safe_filename("resume", &original);
        assert!(name.len() < 255, "stored name is {} bytes", name.len());
        assert!(name.ends_with("aaa.txt"));

        let no_extension = safe_filename("resume", &"b".repeat(300));
        assert_eq!(no_extension.len(), "resume_".len() + 9 + MAX_STORED_BASE_LEN);
    }

    #[test]
    fn test_safe_filename_is_unique() {
        assert_ne!(safe_filename("resume", "a.pdf"), safe_filename("resume", "a.pdf"));
    }

    #[test]
    fn test_parse_json_list() {
        assert_eq!(parse_json_list(r#"["rust","sql"]"#), vec!["rust", "sql"]);
        assert!(parse_json_list("not json").is_empty());
    }
}
