use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical severity classification for scan findings.
///
/// Every raw severity label a scanner emits maps to exactly one bucket;
/// unrecognized labels land in [`SeverityBucket::Info`].
///
/// # Examples
///
/// ```
/// use vigil_core::SeverityBucket;
///
/// assert_eq!(SeverityBucket::from_label("ERROR"), SeverityBucket::Critical);
/// assert_eq!(SeverityBucket::from_label("warning"), SeverityBucket::Major);
/// assert_eq!(SeverityBucket::from_label("something-else"), SeverityBucket::Info);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBucket {
    /// Must not merge.
    Blocker,
    /// Severe defect or vulnerability.
    Critical,
    /// Significant issue.
    Major,
    /// Low-impact issue.
    Minor,
    /// Informational finding.
    Info,
}

impl SeverityBucket {
    /// Normalize a raw severity label (case-insensitive) into a bucket.
    ///
    /// `blocker` → Blocker; `error`/`critical` → Critical; `warning`/`major`
    /// → Major; `note`/`minor` → Minor; anything else → Info.
    pub fn from_label(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "blocker" => SeverityBucket::Blocker,
            "error" | "critical" => SeverityBucket::Critical,
            "warning" | "major" => SeverityBucket::Major,
            "note" | "minor" => SeverityBucket::Minor,
            _ => SeverityBucket::Info,
        }
    }

}

impl fmt::Display for SeverityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityBucket::Blocker => write!(f, "blocker"),
            SeverityBucket::Critical => write!(f, "critical"),
            SeverityBucket::Major => write!(f, "major"),
            SeverityBucket::Minor => write!(f, "minor"),
            SeverityBucket::Info => write!(f, "info"),
        }
    }
}

/// Per-bucket finding counts carried from the scan stage to synthesis.
///
/// Invariant: the sum of all five fields equals the number of findings
/// classified.
///
/// # Examples
///
/// ```
/// use vigil_core::{SeverityBucket, SeverityCounts};
///
/// let counts = SeverityCounts::from_labels(["blocker", "error", "warning", "note", "custom"]);
/// assert_eq!(counts.blocker, 1);
/// assert_eq!(counts.critical, 1);
/// assert_eq!(counts.major, 1);
/// assert_eq!(counts.minor, 1);
/// assert_eq!(counts.info, 1);
/// assert_eq!(counts.total(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Number of blocker findings.
    #[serde(default)]
    pub blocker: u32,
    /// Number of critical findings.
    #[serde(default)]
    pub critical: u32,
    /// Number of major findings.
    #[serde(default)]
    pub major: u32,
    /// Number of minor findings.
    #[serde(default)]
    pub minor: u32,
    /// Number of informational findings.
    #[serde(default)]
    pub info: u32,
}

impl SeverityCounts {
    /// Record one finding in the given bucket.
    pub fn record(&mut self, bucket: SeverityBucket) {
        match bucket {
            SeverityBucket::Blocker => self.blocker += 1,
            SeverityBucket::Critical => self.critical += 1,
            SeverityBucket::Major => self.major += 1,
            SeverityBucket::Minor => self.minor += 1,
            SeverityBucket::Info => self.info += 1,
        }
    }

    /// Tally a sequence of raw severity labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = Self::default();
        for label in labels {
            counts.record(SeverityBucket::from_label(label.as_ref()));
        }
        counts
    }

    /// Count for a single bucket.
    pub fn get(&self, bucket: SeverityBucket) -> u32 {
        match bucket {
            SeverityBucket::Blocker => self.blocker,
            SeverityBucket::Critical => self.critical,
            SeverityBucket::Major => self.major,
            SeverityBucket::Minor => self.minor,
            SeverityBucket::Info => self.info,
        }
    }

    /// Total number of findings across all buckets.
    pub fn total(&self) -> u32 {
        self.blocker + self.critical + self.major + self.minor + self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_total() {
        // Every raw label maps to exactly one bucket; no label is rejected.
        for label in [
            "blocker", "BLOCKER", "error", "critical", "warning", "major", "note", "minor",
            "info", "INVALID", "", "hIgH",
        ] {
            let _ = SeverityBucket::from_label(label);
        }
        assert_eq!(SeverityBucket::from_label("hIgH"), SeverityBucket::Info);
        assert_eq!(SeverityBucket::from_label(""), SeverityBucket::Info);
    }

    #[test]
    fn normalization_matches_table() {
        assert_eq!(SeverityBucket::from_label("blocker"), SeverityBucket::Blocker);
        assert_eq!(SeverityBucket::from_label("error"), SeverityBucket::Critical);
        assert_eq!(SeverityBucket::from_label("critical"), SeverityBucket::Critical);
        assert_eq!(SeverityBucket::from_label("warning"), SeverityBucket::Major);
        assert_eq!(SeverityBucket::from_label("major"), SeverityBucket::Major);
        assert_eq!(SeverityBucket::from_label("note"), SeverityBucket::Minor);
        assert_eq!(SeverityBucket::from_label("minor"), SeverityBucket::Minor);
        assert_eq!(SeverityBucket::from_label("weird"), SeverityBucket::Info);
    }

    #[test]
    fn counts_sum_to_findings() {
        let labels = ["blocker", "error", "error", "warning", "note", "custom", "x"];
        let counts = SeverityCounts::from_labels(labels);
        assert_eq!(counts.total(), labels.len() as u32);
        assert_eq!(counts.blocker, 1);
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.major, 1);
        assert_eq!(counts.minor, 1);
        assert_eq!(counts.info, 2);
    }

    #[test]
    fn counts_are_commutative() {
        let forward = SeverityCounts::from_labels(["blocker", "note", "error"]);
        let backward = SeverityCounts::from_labels(["error", "note", "blocker"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn counts_serialize_snake_case() {
        let counts = SeverityCounts {
            blocker: 1,
            critical: 2,
            major: 3,
            minor: 4,
            info: 5,
        };
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["blocker"], 1);
        assert_eq!(json["critical"], 2);
        assert_eq!(json["info"], 5);
    }

    #[test]
    fn counts_deserialize_with_missing_fields() {
        let counts: SeverityCounts = serde_json::from_str("{}").unwrap();
        assert_eq!(counts.total(), 0);
    }
}
