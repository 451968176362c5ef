use serde::{Deserialize, Serialize};

/// Parameters for list/query operations.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Maximum number of results to return.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,

    /// Exact-match category filter.
    #[serde(default)]
    pub category: Option<String>,

    /// Substring search over names.
    #[serde(default)]
    pub q: Option<String>,
}

fn default_limit() -> usize {
    50
}

/// Upper bound applied to any caller-supplied `limit`.
pub const MAX_LIMIT: usize = 200;

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            category: None,
            q: None,
        }
    }
}

impl ListParams {
    /// `limit` clamped to `1..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// `offset` as a SQL integer, saturating at `i64::MAX`.
    pub fn effective_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
        assert_ne!(id, new_id());
    }

    #[test]
    fn test_now_rfc3339() {
        let ts = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_limit_clamped() {
        let mut p = ListParams::default();
        assert_eq!(p.effective_limit(), 50);
        p.limit = 0;
        assert_eq!(p.effective_limit(), 1);
        p.limit = 10_000;
        assert_eq!(p.effective_limit(), MAX_LIMIT);
    }

    #[test]
    fn test_offset_saturates() {
        let mut p = ListParams::default();
        assert_eq!(p.effective_offset(), 0);
        p.offset = 25;
        assert_eq!(p.effective_offset(), 25);
        p.offset = usize::MAX;
        assert_eq!(p.effective_offset(), i64::MAX);
    }
}
