//! Course submission payloads and persistence drafts
//!
//! A create/update submission is modeled as an explicit typed tree: an
//! ordered sequence of module payloads, each holding an ordered sequence of
//! content payloads, with uploaded files carried inline. Sibling order is
//! positional; the repository assigns dense zero-based `order` values from
//! the sequence.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use validator::Validate;

use super::course::{ColumnPosition, ContentType, VideoSourceType};

/// A file received with the request, held in memory until ingested.
#[derive(Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Bytes) -> Self {
        UploadedFile {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lowercased extension of the client-supplied filename.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// Incoming course submission.
///
/// Serialize is needed by the validator derive (failed length rules record
/// the offending value); file bodies are skipped so they never end up in a
/// validation error or a log line.
#[derive(Debug, Clone, Default, Validate, Serialize)]
pub struct CoursePayload {
    #[validate(length(min = 1, max = 255, message = "Please enter a course title."))]
    pub title: String,
    #[validate(length(min = 1, message = "Please provide a course description."))]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "Please select a course category."))]
    pub category: String,
    /// Required on create, optional on update; the service enforces that
    /// split since it depends on the operation.
    #[serde(skip)]
    pub feature_video: Option<UploadedFile>,
    #[validate(
        length(min = 1, message = "Please add at least one module to the course."),
        nested
    )]
    pub modules: Vec<ModulePayload>,
}

#[derive(Debug, Clone, Default, Validate, Serialize)]
pub struct ModulePayload {
    #[validate(length(min = 1, max = 255, message = "Module title is required."))]
    pub title: String,
    #[validate(nested)]
    pub contents: Vec<ContentPayload>,
}

#[derive(Debug, Clone, Default, Validate, Serialize)]
pub struct ContentPayload {
    #[validate(length(max = 255, message = "Content title cannot exceed 255 characters."))]
    pub title: Option<String>,
    pub content_type: Option<ContentType>,
    pub content_text: Option<String>,
    #[validate(
        url(message = "Please enter a valid video URL."),
        length(max = 500, message = "Video URL is too long.")
    )]
    pub video_url: Option<String>,
    pub video_source_type: Option<VideoSourceType>,
    #[validate(length(max = 50, message = "Video length is too long."))]
    pub video_length: Option<String>,
    pub column_position: Option<ColumnPosition>,
    #[serde(skip)]
    pub video_file: Option<UploadedFile>,
    #[serde(skip)]
    pub image_file: Option<UploadedFile>,
    #[serde(skip)]
    pub document_file: Option<UploadedFile>,
}

/// Derive a content type when none was set by an upload or the client.
///
/// An uploaded or externally hosted video wins, then non-empty text; the
/// fallback is text.
pub fn infer_content_type(
    video_path: Option<&str>,
    video_url: Option<&str>,
    content_text: Option<&str>,
) -> ContentType {
    if video_path.is_some() || video_url.is_some_and(|url| !url.is_empty()) {
        ContentType::Video
    } else if content_text.is_some_and(|text| !text.is_empty()) {
        ContentType::Text
    } else {
        ContentType::Text
    }
}

// ----- Persistence drafts -----

/// A fully resolved course tree, ready for transactional persistence:
/// uploads ingested to stored paths, content types settled.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    /// `None` on update means "keep the current feature video".
    pub feature_video_path: Option<String>,
    pub modules: Vec<ModuleDraft>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleDraft {
    pub title: String,
    pub contents: Vec<ContentDraft>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentDraft {
    pub title: Option<String>,
    pub content_type: ContentType,
    pub content_text: Option<String>,
    pub video_url: Option<String>,
    pub video_source_type: Option<VideoSourceType>,
    pub video_length: Option<String>,
    pub video_path: Option<String>,
    pub image_path: Option<String>,
    pub document_path: Option<String>,
    pub column_position: Option<ColumnPosition>,
}
