use crate::constants::EXPORT_FILE_NAME;
use crate::error::ClientError;
use csv::ReaderBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV export of an event table, as served by the `/export` endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    raw: Vec<u8>,
}

impl ExportTable {
    /// Parses the export. The first record is the header row.
    pub fn from_csv(bytes: Vec<u8>) -> Result<Self, ClientError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes.as_slice());

        let headers = reader.headers()?.iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(String::from).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        debug!("Parsed export with {} rows", rows.len());
        Ok(Self { headers, rows, raw: bytes })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column by header name.
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let index = self.headers.iter().position(|h| h == header)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn suggested_file_name(&self) -> &'static str {
        EXPORT_FILE_NAME
    }

    /// Writes the export unchanged into `dir` under the suggested file name.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(self.suggested_file_name());
        fs::write(&path, &self.raw)?;
        Ok(path)
    }
}
