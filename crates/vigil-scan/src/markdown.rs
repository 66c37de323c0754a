//! Markdown shaping for scan findings.
//!
//! Produces the "Semgrep Summary" comment section: a five-column severity
//! count table followed by one section per non-empty bucket in descending
//! severity order. Blocker, critical, and major findings are listed in
//! full; minor is capped at 5 entries and info at 3, each with an
//! "…and N more" suffix.

use std::fmt::Write;

use vigil_core::{SeverityBucket, SeverityCounts};

use crate::rpc::Finding;

const MINOR_LIMIT: usize = 5;
const INFO_LIMIT: usize = 3;

/// Shape findings into the summary markdown.
///
/// Ordering within each severity section follows the findings' order of
/// arrival.
pub fn format_findings(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No security issues found by Semgrep.".into();
    }

    let counts = tally(findings);
    let mut out = String::new();

    out.push_str("### Semgrep Summary\n\n");
    out.push_str("**Issue Counts:**\n\n");
    out.push_str(
        "| \u{1f6ab} Blocker | \u{1f534} Critical | \u{1f7e0} Major | \u{1f7e1} Minor | \u{2139}\u{fe0f} Info |\n",
    );
    out.push_str("|:----------:|:-----------:|:--------:|:--------:|:-------:|\n");
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} | {} |\n",
        format_count(counts.blocker, true),
        format_count(counts.critical, true),
        format_count(counts.major, true),
        format_count(counts.minor, false),
        format_count(counts.info, false),
    );

    let blocker = in_bucket(findings, SeverityBucket::Blocker);
    let critical = in_bucket(findings, SeverityBucket::Critical);
    let major = in_bucket(findings, SeverityBucket::Major);
    let minor = in_bucket(findings, SeverityBucket::Minor);
    let info = in_bucket(findings, SeverityBucket::Info);

    write_full_section(&mut out, "### \u{1f6ab} Blocker Issues\n\n", &blocker);
    write_full_section(&mut out, "### \u{1f534} Critical Issues\n\n", &critical);
    write_full_section(&mut out, "### \u{1f7e0} Major Issues\n\n", &major);

    if !minor.is_empty() {
        out.push_str("### \u{1f7e1} Minor Issues\n\n");
        for finding in minor.iter().take(MINOR_LIMIT) {
            let _ = writeln!(
                out,
                "- {} in `{}:{}`",
                finding.extra.message, finding.path, finding.start.line
            );
        }
        if minor.len() > MINOR_LIMIT {
            let _ = writeln!(
                out,
                "\n*...and {} more minor issues*\n",
                minor.len() - MINOR_LIMIT
            );
        }
    }

    if !info.is_empty() {
        out.push_str("### \u{2139}\u{fe0f} Info\n\n");
        for finding in info.iter().take(INFO_LIMIT) {
            let _ = writeln!(
                out,
                "- {} in `{}:{}`",
                finding.extra.message, finding.path, finding.start.line
            );
        }
        if info.len() > INFO_LIMIT {
            let _ = writeln!(out, "\n*...and {} more info items*\n", info.len() - INFO_LIMIT);
        }
    }

    out
}

/// Severity totals for a finding set.
pub fn tally(findings: &[Finding]) -> SeverityCounts {
    SeverityCounts::from_labels(findings.iter().map(|f| f.extra.severity.as_str()))
}

fn in_bucket(findings: &[Finding], bucket: SeverityBucket) -> Vec<&Finding> {
    findings
        .iter()
        .filter(|f| SeverityBucket::from_label(&f.extra.severity) == bucket)
        .collect()
}

/// Blocker/critical/major sections list every finding with its rule and a
/// trimmed excerpt.
fn write_full_section(out: &mut String, header: &str, findings: &[&Finding]) {
    if findings.is_empty() {
        return;
    }
    out.push_str(header);
    for finding in findings {
        let _ = writeln!(
            out,
            "- **{}** in `{}:{}`",
            finding.extra.message, finding.path, finding.start.line
        );
        let _ = writeln!(out, "  - Rule: `{}`", finding.check_id);
        let excerpt = finding.extra.lines.trim();
        if !excerpt.is_empty() {
            let _ = writeln!(out, "  - Code: `{excerpt}`");
        }
        out.push('\n');
    }
}

fn format_count(count: u32, bold: bool) -> String {
    if bold && count > 0 {
        format!("**{count}**")
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{FindingDetail, Position};

    fn finding(severity: &str, message: &str, path: &str, line: u32, lines: &str) -> Finding {
        Finding {
            check_id: format!("rules.{}", severity.to_lowercase()),
            path: path.into(),
            start: Position { line },
            extra: FindingDetail {
                severity: severity.into(),
                message: message.into(),
                lines: lines.into(),
            },
        }
    }

    #[test]
    fn one_of_each_bucket() {
        let findings = vec![
            finding("blocker", "stop", "a.py", 1, "x = 1"),
            finding("error", "bad", "b.py", 2, ""),
            finding("warning", "meh", "c.py", 3, "  y = 2  "),
            finding("note", "fyi", "d.py", 4, ""),
            finding("custom", "huh", "e.py", 5, ""),
        ];

        let counts = tally(&findings);
        assert_eq!(
            (counts.blocker, counts.critical, counts.major, counts.minor, counts.info),
            (1, 1, 1, 1, 1)
        );

        let md = format_findings(&findings);
        assert!(md.contains("### Semgrep Summary"));
        // Blocker/critical/major counts are bolded, minor/info are not.
        assert!(md.contains("| **1** | **1** | **1** | 1 | 1 |"));
        assert!(md.contains("### \u{1f6ab} Blocker Issues"));
        assert!(md.contains("- **stop** in `a.py:1`"));
        assert!(md.contains("  - Rule: `rules.blocker`"));
        assert!(md.contains("  - Code: `x = 1`"));
        assert!(md.contains("### \u{1f534} Critical Issues"));
        assert!(md.contains("### \u{1f7e0} Major Issues"));
        // Excerpt is trimmed before rendering.
        assert!(md.contains("  - Code: `y = 2`"));
        assert!(md.contains("### \u{1f7e1} Minor Issues"));
        assert!(md.contains("- fyi in `d.py:4`"));
        assert!(md.contains("### \u{2139}\u{fe0f} Info"));
        assert!(md.contains("- huh in `e.py:5`"));
    }

    #[test]
    fn zero_counts_are_not_bolded() {
        let findings = vec![finding("note", "fyi", "a.py", 1, "")];
        let md = format_findings(&findings);
        assert!(md.contains("| 0 | 0 | 0 | 1 | 0 |"));
        assert!(!md.contains("**0**"));
    }

    #[test]
    fn minor_section_caps_at_five() {
        let findings: Vec<Finding> = (0..8)
            .map(|i| finding("minor", &format!("issue {i}"), "m.py", i, ""))
            .collect();
        let md = format_findings(&findings);
        assert!(md.contains("- issue 4 in `m.py:4`"));
        assert!(!md.contains("- issue 5 in `m.py:5`"));
        assert!(md.contains("*...and 3 more minor issues*"));
    }

    #[test]
    fn info_section_caps_at_three() {
        let findings: Vec<Finding> = (0..5)
            .map(|i| finding("whatever", &format!("note {i}"), "i.py", i, ""))
            .collect();
        let md = format_findings(&findings);
        assert!(md.contains("- note 2 in `i.py:2`"));
        assert!(!md.contains("- note 3 in `i.py:3`"));
        assert!(md.contains("*...and 2 more info items*"));
    }

    #[test]
    fn sections_for_empty_buckets_are_omitted() {
        let findings = vec![finding("error", "bad", "x.py", 9, "")];
        let md = format_findings(&findings);
        assert!(md.contains("### \u{1f534} Critical Issues"));
        assert!(!md.contains("Blocker Issues"));
        assert!(!md.contains("Major Issues"));
        assert!(!md.contains("Minor Issues"));
        assert!(!md.contains("### \u{2139}\u{fe0f} Info"));
    }

    #[test]
    fn section_order_follows_arrival_order() {
        let findings = vec![
            finding("error", "first", "a.py", 1, ""),
            finding("error", "second", "b.py", 2, ""),
        ];
        let md = format_findings(&findings);
        let first = md.find("first").unwrap();
        let second = md.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_input_yields_clean_message() {
        assert_eq!(format_findings(&[]), "No security issues found by Semgrep.");
    }
}
