//! Domain models module

pub mod course;
pub mod payload;

pub use course::{
    ColumnPosition, Content, ContentResponse, ContentType, Course, CoursePage, CourseResponse,
    CourseSummary, Module, ModuleResponse, VideoSourceType,
};
pub use payload::{
    infer_content_type, ContentDraft, ContentPayload, CourseDraft, CoursePayload, ModuleDraft,
    ModulePayload, UploadedFile,
};
