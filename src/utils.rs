use regex::Regex;
use std::sync::LazyLock;

static DISPOSITION_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|([^;\s]+))"#)
        .expect("Content-Disposition pattern should be valid")
});

/// Extract the suggested filename from a `Content-Disposition` header value
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let caps = DISPOSITION_FILENAME.captures(header)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Convert a string to a sanitized filename
pub fn sanitize_filename(name: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let name = name.replace("http://", "").replace("https://", "");
    let name = name.replace(
        ['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'],
        "_",
    );

    // Limit filename length
    let name: String = name.trim().chars().take(100).collect();

    // "." and ".." name directories, not files
    if name.chars().all(|c| c == '.') {
        return String::new();
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_filename() {
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="scraped_data.csv""#),
            Some("scraped_data.csv".to_string())
        );
    }

    #[test]
    fn test_bare_filename() {
        assert_eq!(
            filename_from_content_disposition("attachment; filename=scrape-results.csv"),
            Some("scrape-results.csv".to_string())
        );
        assert_eq!(
            filename_from_content_disposition("attachment; FILENAME=report.pdf; size=10"),
            Some("report.pdf".to_string())
        );
    }

    #[test]
    fn test_missing_filename() {
        assert_eq!(filename_from_content_disposition("inline"), None);
        assert_eq!(filename_from_content_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(
            sanitize_filename("https://example.com/a?b=c"),
            "example.com_a_b_c"
        );
        assert_eq!(sanitize_filename(&"é".repeat(150)).chars().count(), 100);
    }

    #[test]
    fn test_sanitize_directory_names() {
        assert_eq!(sanitize_filename("."), "");
        assert_eq!(sanitize_filename(".."), "");
        assert_eq!(sanitize_filename("  ..  "), "");
        assert_eq!(sanitize_filename("   "), "");
        assert_eq!(sanitize_filename(".hidden"), ".hidden");
    }
}
