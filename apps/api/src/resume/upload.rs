//! Request-scoped PDF uploads.
//!
//! Each uploaded part is staged in a `NamedTempFile` owned by an `UploadedPdf`. The file
//! is removed when the guard drops, whichever way the request ends.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("PDF contained no extractable text")]
    EmptyText,
}

/// A PDF staged on disk for the lifetime of one request.
#[derive(Debug)]
pub struct UploadedPdf {
    file: NamedTempFile,
    original_name: String,
}

impl UploadedPdf {
    pub fn stage(bytes: &[u8], original_name: &str) -> Result<Self, UploadError> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(
            "Staged upload '{}' ({} bytes) at {}",
            original_name,
            bytes.len(),
            file.path().display()
        );
        Ok(Self {
            file,
            original_name: original_name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Extracts plain text on the blocking pool. Empty output counts as a failure,
    /// as does a panic inside the PDF parser.
    pub async fn extract_text(&self) -> Result<String, UploadError> {
        let path: PathBuf = self.path().to_path_buf();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| UploadError::Extraction(format!("parser aborted: {e}")))?
            .map_err(|e| UploadError::Extraction(e.to_string()))?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(UploadError::EmptyText);
        }
        Ok(text)
    }
}

/// True for `application/pdf` parts or filenames ending in `.pdf`.
pub fn is_pdf(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let by_type = content_type
        .map(|ct| ct.trim().eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false);
    let by_name = file_name
        .map(|n| n.to_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    by_type || by_name
}

/// Reads the multipart body, staging each field named in `wanted` as a PDF.
/// Other fields are skipped. Every wanted field must be present.
pub async fn collect_pdfs(
    multipart: &mut Multipart,
    wanted: &[&str],
) -> Result<HashMap<String, UploadedPdf>, AppError> {
    let mut staged: HashMap<String, UploadedPdf> = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if !wanted.contains(&name.as_str()) {
            debug!("Ignoring unexpected multipart field '{name}'");
            continue;
        }
        if !is_pdf(field.content_type(), field.file_name()) {
            return Err(AppError::Validation(format!(
                "'{name}' must be a PDF file"
            )));
        }

        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::Validation(format!("'{name}' is empty")));
        }

        let pdf = UploadedPdf::stage(&bytes, &file_name).map_err(anyhow::Error::new)?;
        staged.insert(name, pdf);
    }

    if let Some(missing) = wanted.iter().find(|w| !staged.contains_key(**w)) {
        return Err(AppError::Validation(format!(
            "missing PDF upload field '{missing}'"
        )));
    }
    Ok(staged)
}

/// Extracts text from a staged upload, mapping failures to a client error.
pub async fn read_pdf_text(pdf: &UploadedPdf) -> Result<String, AppError> {
    pdf.extract_text().await.map_err(|e| match e {
        UploadError::Io(io) => AppError::Internal(anyhow::Error::new(io)),
        other => {
            warn!("Could not read '{}': {other}", pdf.original_name());
            AppError::Validation(format!(
                "Could not extract text from '{}'. Upload a text-based PDF.",
                pdf.original_name()
            ))
        }
    })
}
