//! Result types for query execution

use serde::Serialize;

/// Counters for one query execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionStats {
    /// Identifiers pulled from the native result and run through the filter
    pub scanned: usize,
    /// Records dropped by a residual predicate
    pub filtered_out: usize,
    /// Records yielded as resolution errors
    pub failed: usize,
    /// Records handed to the consumer
    pub returned: usize,
    /// Whether the post-sort limit cut the sequence short
    pub truncated: bool,
}

impl ExecutionStats {
    /// Stats as log fields
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("scanned", self.scanned.to_string()),
            ("filtered_out", self.filtered_out.to_string()),
            ("failed", self.failed.to_string()),
            ("returned", self.returned.to_string()),
            ("truncated", self.truncated.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = ExecutionStats::default();
        assert_eq!(stats.scanned, 0);
        assert!(!stats.truncated);
    }

    #[test]
    fn test_stats_fields() {
        let stats = ExecutionStats {
            scanned: 5,
            filtered_out: 2,
            failed: 0,
            returned: 3,
            truncated: false,
        };
        let fields = stats.fields();
        assert_eq!(fields[0], ("scanned", "5".to_string()));
        assert_eq!(fields[2], ("failed", "0".to_string()));
        assert_eq!(fields[4], ("truncated", "false".to_string()));
    }

    #[test]
    fn test_stats_serialize() {
        let stats = ExecutionStats {
            scanned: 1,
            filtered_out: 0,
            failed: 0,
            returned: 1,
            truncated: true,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["returned"], 1);
        assert_eq!(json["truncated"], true);
    }
}
