mod parser;

use crate::scoring::DisclosureRecord;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RecordImportError {
    #[error("failed to read disclosure records: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid disclosure CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid disclosure JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported disclosure file '{0}' (expected .json or .csv)")]
    UnsupportedFormat(String),
}

/// Serialization of an exported disclosure batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Loads analysed disclosures exported by the report pipeline.
pub struct DisclosureImporter;

impl DisclosureImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<DisclosureRecord>, RecordImportError> {
        let path = path.as_ref();
        let format = RecordFormat::from_path(path)
            .ok_or_else(|| RecordImportError::UnsupportedFormat(path.display().to_string()))?;
        let file = std::fs::File::open(path)?;
        let records = Self::from_reader(std::io::BufReader::new(file), format)?;
        debug!(path = %path.display(), count = records.len(), "loaded disclosure records");
        Ok(records)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: RecordFormat,
    ) -> Result<Vec<DisclosureRecord>, RecordImportError> {
        let records = match format {
            RecordFormat::Json => parser::parse_json(reader)?,
            RecordFormat::Csv => parser::parse_csv(reader)?,
        };
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn format_is_detected_from_extension() {
        assert_eq!(
            RecordFormat::from_path(Path::new("2024_2330_p3.JSON")),
            Some(RecordFormat::Json)
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("report/details.csv")),
            Some(RecordFormat::Csv)
        );
        assert_eq!(RecordFormat::from_path(Path::new("report.pdf")), None);
        assert_eq!(RecordFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn unsupported_extension_is_rejected_before_io() {
        let error = DisclosureImporter::from_path("./missing.xlsx").expect_err("rejected");
        assert!(matches!(error, RecordImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = DisclosureImporter::from_path("./does-not-exist.json").expect_err("io error");
        match error {
            RecordImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn from_reader_dispatches_on_format() {
        let records = DisclosureImporter::from_reader(
            Cursor::new("category,topic,risk_score\nE,能源管理,2\n"),
            RecordFormat::Csv,
        )
        .expect("csv import");
        assert_eq!(records.len(), 1);

        let error = DisclosureImporter::from_reader(Cursor::new("not json"), RecordFormat::Json)
            .expect_err("json error");
        assert!(matches!(error, RecordImportError::Json(_)));
    }
}
