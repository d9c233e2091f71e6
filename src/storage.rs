use crate::config::Registry;
use crate::results::CandidateResult;
use anyhow::Result;
use csv::WriterBuilder;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn csv_safe(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save a district results table as CSV with header.
pub fn save_results_csv<P: AsRef<Path>>(
    results: &[CandidateResult],
    registry: &Registry,
    path: P,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("candidate_id", "candidate_name", "votes", "percentage"))?;
    for r in results {
        let name = registry
            .candidate(&r.candidate)
            .map(|c| c.name.as_str())
            .unwrap_or(r.candidate.as_str());
        wtr.serialize((csv_safe(&r.candidate), csv_safe(name), r.votes, r.percentage))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a style document as pretty JSON.
pub fn save_style_json<P: AsRef<Path>>(style: &Value, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(style)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
