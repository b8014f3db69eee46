use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::SyncError;

/// Numeric course identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CourseId(pub u64);

fn course_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"courses/(\d+)").expect("valid course pattern"))
}

impl FromStr for CourseId {
    type Err = SyncError;

    /// Accepts a bare ID (`80071`) or any URL containing `courses/<id>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = if trimmed.chars().all(|c| c.is_ascii_digit()) {
            Some(trimmed)
        } else {
            course_url_pattern()
                .captures(trimmed)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
        };
        match digits.and_then(|d| d.parse::<u64>().ok()) {
            Some(id) if id > 0 => Ok(Self(id)),
            _ => Err(SyncError::InvalidCourse {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
