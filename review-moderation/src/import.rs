//! Review ingestion from JSON Lines, JSON array and CSV files.
//!
//! Importers are lazy iterators of `Result<Review, ImportError>`: a bad
//! record is reported with its position and the import carries on.

use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

use crate::model::Review;

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// One JSON object per line.
    Jsonl,
    /// A single JSON array of objects.
    Json,
    /// Comma-separated values with a header row naming the review fields.
    Csv,
}

impl ImportFormat {
    /// Guess the format from a file extension, defaulting to JSON Lines.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Jsonl,
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jsonl => write!(f, "jsonl"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for ImportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown import format: {}", s)),
        }
    }
}

/// A record that could not be turned into a review.
///
/// `record` is the 1-based line number for JSON Lines, the 1-based
/// element position for JSON arrays and the 1-based data row (header not
/// counted) for CSV.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not a JSON array of reviews: {0}")]
    NotAnArray(String),

    #[error("record {record}: malformed review: {message}")]
    Parse { record: usize, message: String },

    #[error("record {record}: invalid review: {message}")]
    Invalid { record: usize, message: String },
}

impl ImportError {
    /// Position of the offending record, if the error concerns one.
    pub fn record(&self) -> Option<usize> {
        match self {
            ImportError::Parse { record, .. } | ImportError::Invalid { record, .. } => {
                Some(*record)
            }
            _ => None,
        }
    }
}

/// Review as it appears in input files. Identifiers are optional here.
#[derive(Debug, Deserialize)]
struct ReviewRecord {
    #[serde(default)]
    review_id: Option<String>,
    #[serde(default)]
    hotel_id: Option<String>,
    rating: u8,
    review_text: String,
    #[serde(default)]
    reviewer_name: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

impl ReviewRecord {
    fn into_review(self, record: usize, hotel_override: Option<&str>) -> Result<Review, ImportError> {
        let hotel_id = hotel_override
            .map(ToString::to_string)
            .or(self.hotel_id)
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| ImportError::Invalid {
                record,
                message: "hotel_id is required".into(),
            })?;

        let review_id = self
            .review_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Review::generate_id(&hotel_id));

        let review = Review {
            review_id,
            hotel_id,
            rating: self.rating,
            review_text: self.review_text,
            reviewer_name: self.reviewer_name,
            source: self.source,
        };

        review.validate().map_err(|e| ImportError::Invalid {
            record,
            message: e.to_string(),
        })?;

        Ok(review)
    }
}

fn parse_record(value: Value, record: usize, hotel_override: Option<&str>) -> Result<Review, ImportError> {
    let raw: ReviewRecord = serde_json::from_value(value).map_err(|e| ImportError::Parse {
        record,
        message: e.to_string(),
    })?;
    raw.into_review(record, hotel_override)
}

/// Read reviews from JSON Lines. Blank lines are skipped.
pub fn import_jsonl<R: BufRead>(
    reader: R,
    hotel_override: Option<String>,
) -> impl Iterator<Item = Result<Review, ImportError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(move |(i, line)| {
            let record = i + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(ImportError::Io(e))),
            };
            if line.trim().is_empty() {
                return None;
            }
            let parsed = serde_json::from_str::<Value>(&line)
                .map_err(|e| ImportError::Parse {
                    record,
                    message: e.to_string(),
                })
                .and_then(|value| parse_record(value, record, hotel_override.as_deref()));
            Some(parsed)
        })
}

/// Read reviews from a JSON array.
///
/// The array is parsed up front; records are converted lazily.
pub fn import_json<R: Read>(
    reader: R,
    hotel_override: Option<String>,
) -> Result<impl Iterator<Item = Result<Review, ImportError>>, ImportError> {
    let value: Value =
        serde_json::from_reader(reader).map_err(|e| ImportError::NotAnArray(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray("top-level value is not an array".into()));
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(move |(i, value)| parse_record(value, i + 1, hotel_override.as_deref())))
}

/// Read reviews from CSV with a header row.
///
/// Columns are matched by name and may come in any order. Unknown columns
/// are ignored and empty optional cells count as absent.
pub fn import_csv<R: Read>(
    reader: R,
    hotel_override: Option<String>,
) -> impl Iterator<Item = Result<Review, ImportError>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader)
        .into_deserialize::<ReviewRecord>()
        .enumerate()
        .map(move |(i, row)| {
            let record = i + 1;
            match row {
                Ok(raw) => raw.into_review(record, hotel_override.as_deref()),
                Err(e) if e.is_io_error() => match e.into_kind() {
                    csv::ErrorKind::Io(io) => Err(ImportError::Io(io)),
                    other => Err(ImportError::Parse {
                        record,
                        message: format!("{other:?}"),
                    }),
                },
                Err(e) => Err(ImportError::Parse {
                    record,
                    message: e.to_string(),
                }),
            }
        })
}

/// Boxed review stream returned by [`open_reviews`].
pub type ReviewStream = Box<dyn Iterator<Item = Result<Review, ImportError>> + Send>;

/// Open `path` and import it in the given format.
pub fn open_reviews(
    path: &Path,
    format: ImportFormat,
    hotel_override: Option<String>,
) -> Result<ReviewStream, ImportError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    tracing::info!(path = %path.display(), format = %format, "Importing reviews");

    Ok(match format {
        ImportFormat::Jsonl => Box::new(import_jsonl(reader, hotel_override)),
        ImportFormat::Json => Box::new(import_json(reader, hotel_override)?),
        ImportFormat::Csv => Box::new(import_csv(reader, hotel_override)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const JSONL: &str = r#"{"review_id":"r1","hotel_id":"H1","rating":5,"review_text":"Great stay, lovely staff"}

{"hotel_id":"H1","rating":2,"review_text":"Noisy and dirty room"}
not json
{"review_id":"r4","hotel_id":"H1","rating":9,"review_text":"Impossible rating here"}
{"review_id":"r5","rating":4,"review_text":"No hotel on this one"}
"#;

    #[test]
    fn test_format_from_str() {
        assert_eq!("jsonl".parse::<ImportFormat>(), Ok(ImportFormat::Jsonl));
        assert_eq!("JSON".parse::<ImportFormat>(), Ok(ImportFormat::Json));
        assert_eq!("csv".parse::<ImportFormat>(), Ok(ImportFormat::Csv));
        assert!("xml".parse::<ImportFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImportFormat::from_path(Path::new("a/reviews.json")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("reviews.jsonl")), ImportFormat::Jsonl);
        assert_eq!(ImportFormat::from_path(Path::new("reviews")), ImportFormat::Jsonl);
        assert_eq!(ImportFormat::from_path(Path::new("dump/REVIEWS.CSV")), ImportFormat::Csv);
    }

    #[test]
    fn test_jsonl_reports_bad_records_and_continues() {
        let items: Vec<_> = import_jsonl(Cursor::new(JSONL), None).collect();
        assert_eq!(items.len(), 5);

        let first = items[0].as_ref().unwrap();
        assert_eq!(first.review_id, "r1");

        let generated = items[1].as_ref().unwrap();
        assert!(generated.review_id.starts_with("H1_"));

        assert_eq!(items[2].as_ref().unwrap_err().record(), Some(4));
        assert!(matches!(items[2], Err(ImportError::Parse { .. })));
        assert!(matches!(items[3], Err(ImportError::Invalid { record: 5, .. })));
        assert!(matches!(items[4], Err(ImportError::Invalid { record: 6, .. })));
    }

    #[test]
    fn test_hotel_override_applies_to_all_records() {
        let reviews: Vec<Review> = import_jsonl(Cursor::new(JSONL), Some("OVERRIDE".into()))
            .filter_map(Result::ok)
            .collect();
        assert_eq!(reviews.len(), 3);
        assert!(reviews.iter().all(|r| r.hotel_id == "OVERRIDE"));
    }

    #[test]
    fn test_json_array_import() {
        let input = r#"[
            {"review_id":"a","hotel_id":"H","rating":3,"review_text":"Average in every way"},
            {"review_id":"b","hotel_id":"H","rating":"five","review_text":"Bad rating type"}
        ]"#;
        let items: Vec<_> = import_json(Cursor::new(input), None).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().review_id, "a");
        assert!(matches!(items[1], Err(ImportError::Parse { record: 2, .. })));
    }

    #[test]
    fn test_json_import_rejects_non_array() {
        let result = import_json(Cursor::new(r#"{"review_id":"a"}"#), None);
        assert!(matches!(result, Err(ImportError::NotAnArray(_))));
    }

    #[test]
    fn test_csv_import_by_header_name() {
        let input = "hotel_id,rating,review_text,review_id,stay_month\n\
                     H1,5,\"Quiet room, friendly staff\",c1,June\n\
                     H1,2,Cold shower every morning,,July\n\
                     H1,five,Bad rating type,c3,May\n\
                     ,4,No hotel on this row,c4,May\n";
        let items: Vec<_> = import_csv(Cursor::new(input), None).collect();
        assert_eq!(items.len(), 4);

        let first = items[0].as_ref().unwrap();
        assert_eq!(first.review_id, "c1");
        assert_eq!(first.review_text, "Quiet room, friendly staff");

        assert!(items[1].as_ref().unwrap().review_id.starts_with("H1_"));
        assert!(matches!(items[2], Err(ImportError::Parse { record: 3, .. })));
        assert!(matches!(items[3], Err(ImportError::Invalid { record: 4, .. })));
    }

    #[test]
    fn test_csv_hotel_override() {
        let input = "rating,review_text\n3,Average breakfast spread\n";
        let reviews: Vec<Review> = import_csv(Cursor::new(input), Some("H7".into()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].hotel_id, "H7");
    }

    #[test]
    fn test_open_reviews_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.jsonl");
        std::fs::write(&path, JSONL).unwrap();

        let ok = open_reviews(&path, ImportFormat::Jsonl, None)
            .unwrap()
            .filter(Result::is_ok)
            .count();
        assert_eq!(ok, 2);
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let result = open_reviews(Path::new("/nonexistent/reviews.jsonl"), ImportFormat::Jsonl, None);
        assert!(matches!(result, Err(ImportError::Io(_))));
    }
}
