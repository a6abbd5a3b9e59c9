//! Compare two snapshot files.

use crate::cmd::OutputFormat;
use crate::report;
use anyhow::Result;
use spoolcost_core::{diff, DiffReport};
use spoolcost_store::load_snapshot;
use std::io::Write;
use std::path::Path;

/// Load both snapshots, diff them and render the report.
pub fn run<W: Write>(
    baseline: &Path,
    later: &Path,
    include_unchanged: bool,
    format: OutputFormat,
    out: &mut W,
) -> Result<DiffReport> {
    let before = load_snapshot(baseline)?;
    let after = load_snapshot(later)?;
    if let (Some(a), Some(b)) = (before.captured_at(), after.captured_at()) {
        if b < a {
            tracing::warn!(
                baseline = %baseline.display(),
                later = %later.display(),
                "baseline snapshot is newer than the later one"
            );
        }
    }

    let report = diff(&before, &after, include_unchanged)?;
    tracing::debug!(
        records = report.records.len(),
        total_weight = %report.total_weight_used,
        "snapshots compared"
    );

    match format {
        OutputFormat::Text => report::write_diff_text(baseline, later, &report, out)?,
        OutputFormat::Json => report::write_diff_json(&report, out)?,
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spoolcost_core::SpoolId;
    use std::path::PathBuf;

    fn fixtures_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn compare(include_unchanged: bool, format: OutputFormat) -> (DiffReport, String) {
        let mut out = Vec::new();
        let report = run(
            &fixtures_path("snapshot_2024-05-01_08-00-00.json"),
            &fixtures_path("snapshot_2024-05-08_08-00-00.json"),
            include_unchanged,
            format,
            &mut out,
        )
        .unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_compare_text() {
        let (report, text) = compare(false, OutputFormat::Text);

        assert_eq!(report.records.len(), 1);
        assert!(text.contains("Comparing "));
        assert!(text.contains("PLA Red"));
        assert!(text.contains("100.00"));
        assert!(text.contains("1.65"));
        assert!(text.lines().last().unwrap().starts_with("TOTAL"));
    }

    #[test]
    fn test_compare_show_unchanged() {
        let (report, _) = compare(true, OutputFormat::Text);
        let ids: Vec<_> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![SpoolId(1), SpoolId(5), SpoolId(7)]);
        assert_eq!(report.total_weight_used, dec!(100));
    }

    #[test]
    fn test_compare_json() {
        let (_, text) = compare(false, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 1);
        assert_eq!(value["total_weight_used"], 100.0);
    }

    #[test]
    fn test_compare_missing_file() {
        let err = run(
            &fixtures_path("snapshot_2024-05-01_08-00-00.json"),
            &fixtures_path("missing.json"),
            false,
            OutputFormat::Text,
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }

    #[test]
    fn test_compare_degenerate_initial_weight() {
        let temp = tempfile::tempdir().unwrap();
        let baseline = temp.path().join("baseline.json");
        let later = temp.path().join("later.json");
        std::fs::write(
            &baseline,
            r#"[{"id": 3, "price": 20, "initial_weight": 1e-22, "remaining_weight": 1e8}]"#,
        )
        .unwrap();
        std::fs::write(&later, r#"[{"id": 3, "remaining_weight": 0}]"#).unwrap();

        let mut out = Vec::new();
        let err = run(&baseline, &later, false, OutputFormat::Text, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));
        assert!(out.is_empty());
    }
}
