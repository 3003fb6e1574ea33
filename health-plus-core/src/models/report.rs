use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Largest file the backend accepts for analysis.
pub const MAX_REPORT_BYTES: usize = 10 * 1024 * 1024;

/// Analyses longer than this are collapsed in listings.
pub const ANALYSIS_PREVIEW_CHARS: usize = 400;

/// A medical report stored by the backend, with its AI analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub cloudinary_url: String,
    #[serde(default)]
    pub ai_analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(date) = &self.upload_date {
            write!(f, " ({})", date)?;
        }
        write!(f, "\n  File: {}", self.cloudinary_url)
    }
}

/// Shortens `text` to `limit` characters, marking the cut with an ellipsis.
pub fn truncate_analysis(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Reasons a local file cannot be sent for analysis.
#[derive(Error, Debug)]
pub enum ReportFileError {
    #[error("Please upload a valid image (JPG, PNG) or PDF file")]
    UnsupportedType(String),

    #[error("File size should be less than 10MB")]
    TooLarge(usize),

    #[error("Please select a file and enter a title")]
    MissingTitle,

    #[error("Failed to read {0}: {1}")]
    Read(String, #[source] std::io::Error),
}

/// A file accepted for upload, with its detected content type.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReportFile {
    /// Validates type and size of an in-memory file.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ReportFileError> {
        let file_name = file_name.into();
        let mime_type = mime_type_for(&file_name)
            .ok_or_else(|| ReportFileError::UnsupportedType(file_name.clone()))?;

        if bytes.len() > MAX_REPORT_BYTES {
            return Err(ReportFileError::TooLarge(bytes.len()));
        }

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    /// Reads and validates a file from disk.
    pub async fn from_path(path: &Path) -> Result<Self, ReportFileError> {
        let display = path.display().to_string();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ReportFileError::UnsupportedType(display.clone()))?
            .to_string();

        // Reject by extension and size before reading the file
        if mime_type_for(&file_name).is_none() {
            return Err(ReportFileError::UnsupportedType(file_name));
        }

        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| ReportFileError::Read(display.clone(), e))?
            .len();
        if size > MAX_REPORT_BYTES as u64 {
            return Err(ReportFileError::TooLarge(
                usize::try_from(size).unwrap_or(usize::MAX),
            ));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ReportFileError::Read(display, e))?;
        Self::new(file_name, bytes)
    }

    /// File name without its extension, used as the default title.
    pub fn stem(&self) -> &str {
        match self.file_name.split_once('.') {
            Some((stem, _)) => stem,
            None => &self.file_name,
        }
    }
}

fn mime_type_for(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// A validated file plus the title it will be stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportUpload {
    pub file: ReportFile,
    pub title: String,
}

impl ReportUpload {
    /// Pairs a file with a title, defaulting to the file's stem.
    pub fn new(file: ReportFile, title: Option<String>) -> Result<Self, ReportFileError> {
        let title = title.unwrap_or_else(|| file.stem().to_string());
        let title = title.trim();
        if title.is_empty() {
            return Err(ReportFileError::MissingTitle);
        }

        Ok(Self {
            title: title.to_string(),
            file,
        })
    }
}
