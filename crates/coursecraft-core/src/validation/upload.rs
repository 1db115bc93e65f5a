//! Upload validation rules
//!
//! Extension allow-lists and size ceilings per media class. Validation runs
//! before any blob-store write; a rejected file never reaches storage.

use crate::models::payload::UploadedFile;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "wmv"];
// flv is accepted for the course feature video only.
const FEATURE_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "wmv", "flv"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "ppt", "pptx"];

const VIDEO_MAX_KB: u64 = 51200;
const IMAGE_MAX_KB: u64 = 2048;
const DOCUMENT_MAX_KB: u64 = 10240;

/// Media class an upload is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    FeatureVideo,
    Video,
    Image,
    Document,
}

impl MediaClass {
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaClass::FeatureVideo => FEATURE_VIDEO_EXTENSIONS,
            MediaClass::Video => VIDEO_EXTENSIONS,
            MediaClass::Image => IMAGE_EXTENSIONS,
            MediaClass::Document => DOCUMENT_EXTENSIONS,
        }
    }

    pub fn max_size_kb(&self) -> u64 {
        match self {
            MediaClass::FeatureVideo | MediaClass::Video => VIDEO_MAX_KB,
            MediaClass::Image => IMAGE_MAX_KB,
            MediaClass::Document => DOCUMENT_MAX_KB,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaClass::FeatureVideo => "feature video",
            MediaClass::Video => "video",
            MediaClass::Image => "image",
            MediaClass::Document => "document",
        }
    }
}

/// Why an upload was rejected. Each reason is reported distinctly but all
/// map to the same "upload rejected" outcome for the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadError {
    #[error("invalid file type '{extension}' (allowed: {allowed})")]
    Extension { extension: String, allowed: String },

    #[error("file size {size_kb} KB exceeds limit of {max_kb} KB")]
    TooLarge { size_kb: u64, max_kb: u64 },

    #[error("upload failed: {0}")]
    Transport(String),
}

/// Check an uploaded file against a media class allow-list and size ceiling.
pub fn validate_upload(file: &UploadedFile, class: MediaClass) -> Result<(), UploadError> {
    let allowed = class.allowed_extensions();
    let extension = file.extension().unwrap_or_default();
    if !allowed.contains(&extension.as_str()) {
        return Err(UploadError::Extension {
            extension,
            allowed: allowed.join(", "),
        });
    }

    let max_kb = class.max_size_kb();
    if file.size_bytes() > max_kb * 1024 {
        return Err(UploadError::TooLarge {
            size_kb: file.size_bytes().div_ceil(1024),
            max_kb,
        });
    }

    // An empty body means the transfer was truncated or never happened.
    if file.bytes.is_empty() {
        return Err(UploadError::Transport(
            "file is empty or was not fully uploaded".to_string(),
        ));
    }

    Ok(())
}
