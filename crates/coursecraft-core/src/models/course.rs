//! Course aggregate models
//!
//! The persisted Course -> Module -> Content tree, the listing summary, and
//! the API response shapes. Enum-valued columns are stored as TEXT; the
//! repositories convert through `as_str`/`FromStr`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of a content item. Exactly one per content row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Text,
    Image,
    Document,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Document => "document",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ContentType::Video),
            "text" => Ok(ContentType::Text),
            "image" => Ok(ContentType::Image),
            "document" => Ok(ContentType::Document),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

/// Where an externally hosted video comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VideoSourceType {
    Youtube,
    Vimeo,
    Upload,
}

impl VideoSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoSourceType::Youtube => "youtube",
            VideoSourceType::Vimeo => "vimeo",
            VideoSourceType::Upload => "upload",
        }
    }
}

impl FromStr for VideoSourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(VideoSourceType::Youtube),
            "vimeo" => Ok(VideoSourceType::Vimeo),
            "upload" => Ok(VideoSourceType::Upload),
            other => Err(format!("unknown video source type '{other}'")),
        }
    }
}

/// Display hint for a content item's placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPosition {
    Left,
    Right,
    Full,
}

impl ColumnPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnPosition::Left => "left",
            ColumnPosition::Right => "right",
            ColumnPosition::Full => "full",
        }
    }
}

impl FromStr for ColumnPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(ColumnPosition::Left),
            "right" => Ok(ColumnPosition::Right),
            "full" => Ok(ColumnPosition::Full),
            other => Err(format!("unknown column position '{other}'")),
        }
    }
}

/// A persisted course with its module/content tree loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub feature_video_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modules: Vec<Module>,
}

/// A persisted module, ordered within its course.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub contents: Vec<Content>,
}

/// A persisted content item, ordered within its module.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub id: Uuid,
    pub module_id: Uuid,
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
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Every stored media path referenced by this course tree.
    pub fn media_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        if let Some(p) = self.feature_video_path.as_deref() {
            paths.push(p);
        }
        paths.extend(self.content_media_paths());
        paths
    }

    /// Media paths referenced by the module/content subtree only, without
    /// the course feature video. These are the blobs that lose their
    /// referent when the subtree is replaced.
    pub fn content_media_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for module in &self.modules {
            for content in &module.contents {
                for p in [
                    content.video_path.as_deref(),
                    content.image_path.as_deref(),
                    content.document_path.as_deref(),
                ]
                .into_iter()
                .flatten()
                {
                    paths.push(p);
                }
            }
        }
        paths
    }
}

/// Listing row: course scalars plus a module count, no subtree loaded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub feature_video_path: Option<String>,
    pub module_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of the course listing, newest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoursePage {
    pub data: Vec<CourseSummary>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

// ----- API response shapes -----

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub feature_video_path: Option<String>,
    pub feature_video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modules: Vec<ModuleResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleResponse {
    pub id: Uuid,
    pub title: String,
    pub order: i32,
    pub contents: Vec<ContentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentResponse {
    pub id: Uuid,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub content_text: Option<String>,
    pub video_url: Option<String>,
    pub video_source_type: Option<VideoSourceType>,
    pub video_length: Option<String>,
    pub video_path: Option<String>,
    pub video_file_url: Option<String>,
    pub image_path: Option<String>,
    pub image_url: Option<String>,
    pub document_path: Option<String>,
    pub document_url: Option<String>,
    pub column_position: Option<ColumnPosition>,
    pub order: i32,
}

impl CourseResponse {
    /// Build a response, resolving each stored path to a public URL.
    pub fn from_course<F>(course: Course, resolve_url: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let feature_video_url = course.feature_video_path.as_deref().map(&resolve_url);
        CourseResponse {
            id: course.id,
            title: course.title,
            description: course.description,
            category: course.category,
            feature_video_url,
            feature_video_path: course.feature_video_path,
            created_at: course.created_at,
            updated_at: course.updated_at,
            modules: course
                .modules
                .into_iter()
                .map(|module| ModuleResponse {
                    id: module.id,
                    title: module.title,
                    order: module.order,
                    contents: module
                        .contents
                        .into_iter()
                        .map(|content| {
                            let video_file_url =
                                content.video_path.as_deref().map(&resolve_url);
                            let image_url = content.image_path.as_deref().map(&resolve_url);
                            let document_url =
                                content.document_path.as_deref().map(&resolve_url);
                            ContentResponse {
                                id: content.id,
                                title: content.title,
                                content_type: content.content_type,
                                content_text: content.content_text,
                                video_url: content.video_url,
                                video_source_type: content.video_source_type,
                                video_length: content.video_length,
                                video_file_url,
                                video_path: content.video_path,
                                image_url,
                                image_path: content.image_path,
                                document_url,
                                document_path: content.document_path,
                                column_position: content.column_position,
                                order: content.order,
                            }
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
