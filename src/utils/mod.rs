pub mod ip;
pub mod url_validator;

pub use url_validator::validate_http_url;

/// 超过 max_chars 个字符时截断并追加 "..."
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
