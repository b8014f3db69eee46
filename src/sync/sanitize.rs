use std::sync::OnceLock;

use regex::Regex;

fn reserved_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[:*?"<>|\\]"#).expect("valid reserved-char pattern"))
}

/// Replace characters that are invalid in local file names with `_`.
///
/// Only `: * ? " < > | \` are touched; `/` stays a path separator.
#[must_use]
pub fn sanitize_path(path: &str) -> String {
    reserved_chars().replace_all(path, "_").into_owned()
}

/// Local path for a file: `<course_folder>/<folder_path><display_name>`, sanitized.
#[must_use]
pub fn local_path(course_folder: &str, folder_path: &str, display_name: &str) -> String {
    sanitize_path(&format!("{course_folder}/{folder_path}{display_name}"))
}
