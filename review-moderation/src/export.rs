//! Result export: JSON Lines or flattened CSV for per-review results,
//! pretty JSON for the summary.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use review_common::error::ResultExt;
use review_common::Result;

use crate::model::{AnalysisResult, Provenance};
use crate::report::SummaryReport;

/// Separator for list-valued CSV cells.
const LIST_SEPARATOR: &str = "; ";

/// Per-review results file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jsonl,
    Csv,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to JSON Lines.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Jsonl,
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// One result flattened to a CSV row.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    review_id: &'a str,
    hotel_id: &'a str,
    rating: u8,
    publish_decision: &'static str,
    rejection_reasons: String,
    tags: String,
    sentiment: &'static str,
    summary: &'a str,
    flags: String,
    provenance: Provenance,
    fallback_reason: Option<&'a str>,
    model_name: &'a str,
    prompt_version: &'a str,
    analyzed_at: String,
}

impl<'a> From<&'a AnalysisResult> for CsvRow<'a> {
    fn from(r: &'a AnalysisResult) -> Self {
        Self {
            review_id: &r.review_id,
            hotel_id: &r.hotel_id,
            rating: r.rating,
            publish_decision: r.publish_decision.as_str(),
            rejection_reasons: join(r.rejection_reasons.iter().map(|reason| reason.message())),
            tags: join(r.tags.iter().map(|tag| tag.as_str())),
            sentiment: r.sentiment.as_str(),
            summary: &r.summary,
            flags: join(r.flags.iter().map(String::as_str)),
            provenance: r.provenance,
            fallback_reason: r.fallback_reason.as_deref(),
            model_name: &r.model_name,
            prompt_version: &r.prompt_version,
            analyzed_at: r.analyzed_at.to_rfc3339(),
        }
    }
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(LIST_SEPARATOR)
}

/// Write one JSON object per line.
pub fn write_results_jsonl<W: Write>(mut writer: W, results: &[AnalysisResult]) -> Result<()> {
    for result in results {
        let line = serde_json::to_string(result)?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one flattened row per result after a header row.
///
/// List fields (tags, rejection reasons, flags) are joined with `"; "`.
pub fn write_results_csv<W: Write>(writer: W, results: &[AnalysisResult]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(CsvRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the summary as indented JSON.
pub fn write_summary_json<W: Write>(mut writer: W, summary: &SummaryReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn export_results(path: &Path, results: &[AnalysisResult]) -> Result<()> {
    export_results_as(path, results, ExportFormat::Jsonl)
}

pub fn export_results_csv(path: &Path, results: &[AnalysisResult]) -> Result<()> {
    export_results_as(path, results, ExportFormat::Csv)
}

pub fn export_results_as(path: &Path, results: &[AnalysisResult], format: ExportFormat) -> Result<()> {
    let file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    match format {
        ExportFormat::Jsonl => write_results_jsonl(writer, results)?,
        ExportFormat::Csv => write_results_csv(writer, results)?,
    }
    tracing::info!(path = %path.display(), count = results.len(), format = ?format, "Results exported");
    Ok(())
}

pub fn export_summary(path: &Path, summary: &SummaryReport) -> Result<()> {
    let file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    write_summary_json(BufWriter::new(file), summary)?;
    tracing::info!(path = %path.display(), "Summary exported");
    Ok(())
}
