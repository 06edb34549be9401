use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::matching::models::CandidatePool;
use crate::sources::{parse_candidate_csv, parse_candidate_workbook, CandidateSource, SourceError};

/// Candidate records from a CSV or Excel file on the server's filesystem.
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CandidateSource for LocalFileSource {
    async fn load(&self) -> Result<CandidatePool, SourceError> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let parse: fn(Vec<u8>) -> Result<CandidatePool, SourceError> = match extension.as_str() {
            "csv" => |bytes| parse_candidate_csv(&bytes),
            "xlsx" | "xls" => parse_candidate_workbook,
            other => return Err(SourceError::UnsupportedFormat(other.to_string())),
        };

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(self.path.display().to_string())
            } else {
                SourceError::Io(e)
            }
        })?;

        let pool = parse(bytes)?;
        debug!(
            "Loaded {} candidate rows from {}",
            pool.records.len(),
            self.path.display()
        );
        Ok(pool)
    }

    fn describe(&self) -> String {
        format!("local file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_reads_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Candidate Name,Skills").unwrap();
        writeln!(file, "Asha,\"Rust, Go\"").unwrap();

        let pool = LocalFileSource::new(file.path()).load().await.unwrap();
        assert_eq!(pool.records.len(), 1);
        assert_eq!(pool.records[0].skills(), Some("Rust, Go"));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFileSource::new(dir.path().join("absent.csv"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_extension_is_rejected() {
        let err = LocalFileSource::new("/data/candidates.ods")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat(ext) if ext == "ods"));
    }

    #[tokio::test]
    async fn test_xlsx_is_read_as_a_workbook() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not really a workbook").unwrap();

        let err = LocalFileSource::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, SourceError::Workbook(_)));
    }

    #[tokio::test]
    async fn test_missing_workbook_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFileSource::new(dir.path().join("absent.XLSX"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
