//! Shared constants.

/// Fixed category list offered by the authoring UI.
pub const COURSE_CATEGORIES: &[&str] =
    &["Programming", "Design", "Business", "Marketing", "Other"];

/// Courses per page on the listing endpoint.
pub const COURSES_PER_PAGE: i64 = 10;

/// Storage directory for course feature videos.
pub const FEATURE_VIDEO_DIR: &str = "videos/features";

/// Storage directory for per-content uploaded videos.
pub const CONTENT_VIDEO_DIR: &str = "videos/contents";

/// Storage directory for per-content images.
pub const CONTENT_IMAGE_DIR: &str = "images/contents";

/// Storage directory for per-content documents.
pub const CONTENT_DOCUMENT_DIR: &str = "documents/contents";
