//! Input validation for uploads, forms and configuration values
//!
//! These checks run before anything touches the network; failures are
//! reported to the user and never sent to the server.

use crate::error::ValidationError;
use std::path::Path;

/// Largest screenplay the server accepts
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Accepted screenplay extensions, lowercase and without the dot
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "fountain"];

/// Name and size of a file the user wants to upload
#[derive(Debug, Clone, PartialEq)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Read the file name and size from disk
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(name, metadata.len()))
    }

    /// Lowercased text after the last dot, or the whole name if there is none
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Check a file against the upload limits. Size is checked before type.
pub fn validate_file(file: &FileCandidate) -> Result<(), ValidationError> {
    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge {
            size: file.size,
            max: MAX_UPLOAD_BYTES,
        });
    }

    let extension = file.extension();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::InvalidFileType {
            extension: format!(".{}", extension),
        });
    }

    Ok(())
}

/// A named form input marked as required
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Every required field must have a non-blank value.
///
/// All blank fields are collected so the caller can flag each of them.
pub fn validate_required_fields(fields: &[FormField]) -> Result<(), ValidationError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|f| f.value.trim().is_empty())
        .map(|f| f.name.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: "URL must start with http:// or https://".to_string(),
        });
    }

    Ok(())
}
