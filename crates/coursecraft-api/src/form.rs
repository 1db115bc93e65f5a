//! Multipart course form parsing
//!
//! The authoring form posts bracketed field names (`title`,
//! `modules[0][title]`, `modules[0][contents][2][video_file]`,
//! `feature_video`). This module resolves those stringly-keyed paths at the
//! HTTP boundary into the typed course tree the service consumes. Unknown
//! fields are ignored; sparse indices are compacted in ascending key order.

use std::collections::BTreeMap;

use axum::extract::Multipart;

use coursecraft_core::models::{ContentPayload, CoursePayload, ModulePayload, UploadedFile};
use coursecraft_core::AppError;

/// Split `modules[0][contents][2][video_file]` into its segments.
fn split_field_name(name: &str) -> Vec<&str> {
    name.split('[')
        .map(|segment| segment.trim_end_matches(']'))
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn parse_index(segment: &str, name: &str) -> Result<usize, AppError> {
    segment
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("malformed form field '{name}'")))
}

fn parse_enum_value<T>(value: &str, name: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| AppError::InvalidInput(format!("invalid value for '{name}': {e}")))
}

#[derive(Default)]
struct ModuleBuilder {
    title: Option<String>,
    contents: BTreeMap<usize, ContentPayload>,
}

/// Accumulates form fields in arrival order and produces a `CoursePayload`.
#[derive(Default)]
pub struct CourseFormBuilder {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    feature_video: Option<UploadedFile>,
    modules: BTreeMap<usize, ModuleBuilder>,
}

impl CourseFormBuilder {
    /// Record a scalar form value. Empty optional values are dropped, the
    /// way an untouched HTML input submits an empty string.
    pub fn set_value(&mut self, name: &str, value: String) -> Result<(), AppError> {
        let segments = split_field_name(name);
        match segments.as_slice() {
            ["title"] => self.title = Some(value),
            ["description"] => self.description = Some(value),
            ["category"] => self.category = Some(value),
            ["modules", index, "title"] => {
                let index = parse_index(index, name)?;
                self.modules.entry(index).or_default().title = Some(value);
            }
            ["modules", module_index, "contents", content_index, field] => {
                let module_index = parse_index(module_index, name)?;
                let content_index = parse_index(content_index, name)?;
                if value.is_empty() {
                    return Ok(());
                }
                let content = self
                    .modules
                    .entry(module_index)
                    .or_default()
                    .contents
                    .entry(content_index)
                    .or_default();
                match *field {
                    "title" => content.title = Some(value),
                    "type" => content.content_type = Some(parse_enum_value(&value, name)?),
                    "content_text" => content.content_text = Some(value),
                    "video_url" => content.video_url = Some(value),
                    "video_source_type" => {
                        content.video_source_type = Some(parse_enum_value(&value, name)?)
                    }
                    "video_length" => content.video_length = Some(value),
                    "column_position" => {
                        content.column_position = Some(parse_enum_value(&value, name)?)
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Record a file form field.
    pub fn set_file(&mut self, name: &str, file: UploadedFile) -> Result<(), AppError> {
        let segments = split_field_name(name);
        match segments.as_slice() {
            ["feature_video"] => self.feature_video = Some(file),
            ["modules", module_index, "contents", content_index, field] => {
                let module_index = parse_index(module_index, name)?;
                let content_index = parse_index(content_index, name)?;
                let content = self
                    .modules
                    .entry(module_index)
                    .or_default()
                    .contents
                    .entry(content_index)
                    .or_default();
                match *field {
                    "video_file" => content.video_file = Some(file),
                    "image_file" => content.image_file = Some(file),
                    "document_file" => content.document_file = Some(file),
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn build(self) -> CoursePayload {
        CoursePayload {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            feature_video: self.feature_video,
            modules: self
                .modules
                .into_values()
                .map(|module| ModulePayload {
                    title: module.title.unwrap_or_default(),
                    contents: module.contents.into_values().collect(),
                })
                .collect(),
        }
    }
}

/// Drain a multipart request into a course payload.
pub async fn course_payload_from_multipart(
    mut multipart: Multipart,
) -> Result<CoursePayload, AppError> {
    let mut builder = CourseFormBuilder::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("malformed multipart request: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let bytes = field.bytes().await.map_err(|e| {
                AppError::InvalidInput(format!("failed to read upload '{name}': {e}"))
            })?;
            // A file input left empty still submits a part, with an empty
            // filename and no body; that is not an attachment.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            builder.set_file(&name, UploadedFile::new(file_name, bytes))?;
        } else {
            let value = field.text().await.map_err(|e| {
                AppError::InvalidInput(format!("failed to read field '{name}': {e}"))
            })?;
            builder.set_value(&name, value)?;
        }
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use coursecraft_core::models::{ColumnPosition, ContentType};

    fn file(name: &str) -> UploadedFile {
        UploadedFile::new(name, Bytes::from_static(b"x"))
    }

    #[test]
    fn builds_typed_tree_from_bracketed_names() {
        let mut builder = CourseFormBuilder::default();
        builder.set_value("title", "Rust 101".into()).unwrap();
        builder.set_value("description", "Learn Rust".into()).unwrap();
        builder.set_value("category", "Programming".into()).unwrap();
        builder.set_file("feature_video", file("intro.mp4")).unwrap();
        builder.set_value("modules[0][title]", "Basics".into()).unwrap();
        builder
            .set_value("modules[0][contents][0][content_text]", "Welcome".into())
            .unwrap();
        builder
            .set_value("modules[0][contents][1][type]", "image".into())
            .unwrap();
        builder
            .set_file("modules[0][contents][1][image_file]", file("pic.png"))
            .unwrap();
        builder.set_value("modules[1][title]", "Advanced".into()).unwrap();

        let payload = builder.build();

        assert_eq!(payload.title, "Rust 101");
        assert!(payload.feature_video.is_some());
        assert_eq!(payload.modules.len(), 2);
        assert_eq!(payload.modules[0].title, "Basics");
        assert_eq!(payload.modules[0].contents.len(), 2);
        assert_eq!(
            payload.modules[0].contents[0].content_text.as_deref(),
            Some("Welcome")
        );
        assert_eq!(
            payload.modules[0].contents[1].content_type,
            Some(ContentType::Image)
        );
        assert!(payload.modules[0].contents[1].image_file.is_some());
        assert!(payload.modules[1].contents.is_empty());
    }

    #[test]
    fn sparse_indices_are_compacted_in_order() {
        let mut builder = CourseFormBuilder::default();
        builder.set_value("modules[7][title]", "last".into()).unwrap();
        builder.set_value("modules[2][title]", "first".into()).unwrap();

        let payload = builder.build();
        assert_eq!(payload.modules.len(), 2);
        assert_eq!(payload.modules[0].title, "first");
        assert_eq!(payload.modules[1].title, "last");
    }

    #[test]
    fn empty_optional_values_stay_unset() {
        let mut builder = CourseFormBuilder::default();
        builder.set_value("modules[0][title]", "m".into()).unwrap();
        builder
            .set_value("modules[0][contents][0][video_url]", "".into())
            .unwrap();
        builder
            .set_value("modules[0][contents][0][content_text]", "body".into())
            .unwrap();

        let payload = builder.build();
        assert_eq!(payload.modules[0].contents[0].video_url, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut builder = CourseFormBuilder::default();
        builder.set_value("csrf_token", "abc".into()).unwrap();
        builder
            .set_value("modules[0][contents][0][surprise]", "x".into())
            .unwrap();
        builder.set_file("avatar", file("a.png")).unwrap();

        let payload = builder.build();
        assert!(payload.title.is_empty());
        assert_eq!(payload.modules.len(), 1);
    }

    #[test]
    fn invalid_enum_value_is_rejected() {
        let mut builder = CourseFormBuilder::default();
        let err = builder
            .set_value("modules[0][contents][0][type]", "podcast".into())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn column_position_parses() {
        let mut builder = CourseFormBuilder::default();
        builder
            .set_value("modules[0][contents][0][column_position]", "left".into())
            .unwrap();
        let payload = builder.build();
        assert_eq!(
            payload.modules[0].contents[0].column_position,
            Some(ColumnPosition::Left)
        );
    }

    #[test]
    fn malformed_index_is_rejected() {
        let mut builder = CourseFormBuilder::default();
        let err = builder
            .set_value("modules[abc][title]", "m".into())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
