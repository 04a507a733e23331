//! Storage key generation for uploaded blobs.

use chrono::Utc;
use uuid::Uuid;

/// Longest sanitized file name kept in a key.
const MAX_NAME_LEN: usize = 128;

/// Build a fresh storage key for an uploaded file.
///
/// Shape: `{random}-{unix millis}-{sanitized name}`. The random prefix keeps
/// keys unique when the same name is uploaded twice in one millisecond.
pub fn generate_storage_key(file_name: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        &random[..8],
        Utc::now().timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

/// Upload time embedded in a key produced by [`generate_storage_key`], in
/// unix milliseconds. `None` for keys of any other shape.
pub fn key_timestamp(key: &str) -> Option<i64> {
    let mut parts = key.splitn(3, '-');
    let random = parts.next()?;
    let millis = parts.next()?;
    parts.next()?;
    if random.len() != 8 || !random.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    millis.parse().ok()
}

/// Replace anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}
