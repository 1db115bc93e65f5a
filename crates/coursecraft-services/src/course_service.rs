//! Course service
//!
//! Orchestrates one create/update/delete request: validates the submitted
//! course tree, resolves every file attachment to a stored path through the
//! media ingestor, settles content types, and hands the resolved draft to
//! the repository for transactional persistence.
//!
//! Failure policy: the mandatory feature video is all-or-nothing (any
//! ingest failure aborts the operation), while per-content files are
//! best-effort (a rejected file is logged and skipped, the content item is
//! persisted without that media). Blob writes are not part of the domain
//! transaction, so blobs ingested before a failed persist are orphaned;
//! that gap is accepted here rather than papered over with compensation.

use std::sync::Arc;

use validator::Validate;

use coursecraft_core::constants::{
    CONTENT_DOCUMENT_DIR, CONTENT_IMAGE_DIR, CONTENT_VIDEO_DIR, FEATURE_VIDEO_DIR,
};
use coursecraft_core::models::{
    infer_content_type, ContentDraft, ContentPayload, ContentType, Course, CourseDraft,
    CoursePage, CoursePayload, ModuleDraft, ModulePayload,
};
use coursecraft_core::validation::MediaClass;
use coursecraft_core::AppError;
use coursecraft_db::CourseRepository;
use uuid::Uuid;

use crate::ingestor::MediaIngestor;

#[derive(Clone)]
pub struct CourseService {
    repository: Arc<dyn CourseRepository>,
    ingestor: MediaIngestor,
}

impl CourseService {
    pub fn new(repository: Arc<dyn CourseRepository>, ingestor: MediaIngestor) -> Self {
        Self {
            repository,
            ingestor,
        }
    }

    /// Create a course from a submitted tree. The feature video is
    /// mandatory; any failure ingesting it aborts the whole operation.
    #[tracing::instrument(skip(self, payload), fields(operation = "create_course", title = %payload.title))]
    pub async fn create_course(&self, payload: CoursePayload) -> Result<Course, AppError> {
        payload.validate()?;

        let feature_video = payload.feature_video.as_ref().ok_or_else(|| {
            AppError::InvalidInput("Please upload a feature video for the course.".to_string())
        })?;
        let feature_video_path = self
            .ingestor
            .ingest(feature_video, MediaClass::FeatureVideo, FEATURE_VIDEO_DIR)
            .await?;

        let modules = self.resolve_modules(&payload.modules).await;

        let draft = CourseDraft {
            title: payload.title,
            description: payload.description,
            category: payload.category,
            feature_video_path: Some(feature_video_path),
            modules,
        };

        self.repository.create_course(draft).await
    }

    /// Update a course: scalar fields plus a full replace of the
    /// module/content subtree. A newly attached feature video replaces the
    /// stored one, deleting the old blob first; blobs of the replaced
    /// subtree are cleaned up best-effort after the new tree is committed.
    #[tracing::instrument(skip(self, payload), fields(operation = "update_course", course_id = %id))]
    pub async fn update_course(&self, id: Uuid, payload: CoursePayload) -> Result<Course, AppError> {
        payload.validate()?;

        let current = self.repository.get_course_with_relations(id).await?;

        let feature_video_path = match payload.feature_video.as_ref() {
            Some(file) => {
                if let Some(old_path) = current.feature_video_path.as_deref() {
                    // Delete-then-replace; not atomic with the ingest. A
                    // missing old blob is fine, an I/O failure aborts.
                    self.ingestor.remove(old_path).await?;
                }
                Some(
                    self.ingestor
                        .ingest(file, MediaClass::FeatureVideo, FEATURE_VIDEO_DIR)
                        .await?,
                )
            }
            None => None,
        };

        let modules = self.resolve_modules(&payload.modules).await;

        let draft = CourseDraft {
            title: payload.title,
            description: payload.description,
            category: payload.category,
            feature_video_path,
            modules,
        };

        let updated = self.repository.update_course(id, draft).await?;

        // The old subtree is gone from the store of record; its blobs have
        // no referent left. Cleanup failures are logged, same as on delete.
        for path in current.content_media_paths() {
            if let Err(e) = self.ingestor.remove(path).await {
                tracing::warn!(path = %path, error = %e, "Blob cleanup failed, continuing");
            }
        }

        Ok(updated)
    }

    /// Delete a course: best-effort blob cleanup first, then the
    /// authoritative soft delete of the domain tree.
    #[tracing::instrument(skip(self), fields(operation = "delete_course", course_id = %id))]
    pub async fn delete_course(&self, id: Uuid) -> Result<(), AppError> {
        let course = self.repository.get_course_with_relations(id).await?;

        for path in course.media_paths() {
            if let Err(e) = self.ingestor.remove(path).await {
                tracing::warn!(path = %path, error = %e, "Blob cleanup failed, continuing");
            }
        }

        self.repository.delete_course(id).await
    }

    pub async fn get_course(&self, id: Uuid) -> Result<Course, AppError> {
        self.repository.get_course_with_relations(id).await
    }

    pub async fn list_courses(&self, page: i64) -> Result<CoursePage, AppError> {
        self.repository.list_courses(page).await
    }

    /// Public URL for a stored media path.
    pub fn file_url(&self, path: &str) -> String {
        self.ingestor.file_url(path)
    }

    async fn resolve_modules(&self, modules: &[ModulePayload]) -> Vec<ModuleDraft> {
        let mut drafts = Vec::with_capacity(modules.len());
        for module in modules {
            let mut contents = Vec::with_capacity(module.contents.len());
            for content in &module.contents {
                contents.push(self.resolve_content(content).await);
            }
            drafts.push(ModuleDraft {
                title: module.title.clone(),
                contents,
            });
        }
        drafts
    }

    /// Resolve one content item's attachments and settle its type.
    ///
    /// A per-content file that fails validation or storage is skipped: the
    /// item is kept, just without that media. An uploaded or externally
    /// hosted video takes type precedence; image/document only provide a
    /// type when none was set yet.
    async fn resolve_content(&self, content: &ContentPayload) -> ContentDraft {
        let mut content_type = content.content_type;
        let mut video_path = None;
        let mut image_path = None;
        let mut document_path = None;

        if let Some(file) = &content.video_file {
            match self
                .ingestor
                .ingest(file, MediaClass::Video, CONTENT_VIDEO_DIR)
                .await
            {
                Ok(path) => {
                    video_path = Some(path);
                    content_type = Some(ContentType::Video);
                }
                Err(e) => {
                    tracing::warn!(file_name = %file.file_name, error = %e, "Content video skipped");
                }
            }
        }

        if content_type.is_none()
            && content.video_url.as_deref().is_some_and(|url| !url.is_empty())
        {
            content_type = Some(ContentType::Video);
        }

        if let Some(file) = &content.image_file {
            match self
                .ingestor
                .ingest(file, MediaClass::Image, CONTENT_IMAGE_DIR)
                .await
            {
                Ok(path) => {
                    image_path = Some(path);
                    content_type.get_or_insert(ContentType::Image);
                }
                Err(e) => {
                    tracing::warn!(file_name = %file.file_name, error = %e, "Content image skipped");
                }
            }
        }

        if let Some(file) = &content.document_file {
            match self
                .ingestor
                .ingest(file, MediaClass::Document, CONTENT_DOCUMENT_DIR)
                .await
            {
                Ok(path) => {
                    document_path = Some(path);
                    content_type.get_or_insert(ContentType::Document);
                }
                Err(e) => {
                    tracing::warn!(file_name = %file.file_name, error = %e, "Content document skipped");
                }
            }
        }

        let content_type = content_type.unwrap_or_else(|| {
            infer_content_type(
                video_path.as_deref(),
                content.video_url.as_deref(),
                content.content_text.as_deref(),
            )
        });

        ContentDraft {
            title: content.title.clone(),
            content_type,
            content_text: content.content_text.clone(),
            video_url: content.video_url.clone(),
            video_source_type: content.video_source_type,
            video_length: content.video_length.clone(),
            video_path,
            image_path,
            document_path,
            column_position: content.column_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;

    use coursecraft_core::models::{Content, Module, UploadedFile};
    use coursecraft_storage::{Storage, StorageError, StorageResult};

    // ----- fakes -----

    #[derive(Default)]
    struct InMemoryStorage {
        files: Mutex<HashMap<String, Bytes>>,
        fail_puts: Mutex<bool>,
    }

    impl InMemoryStorage {
        fn keys(&self) -> Vec<String> {
            self.files.lock().unwrap().keys().cloned().collect()
        }

        fn remove_raw(&self, key: &str) {
            self.files.lock().unwrap().remove(key);
        }

        fn set_fail_puts(&self, fail: bool) {
            *self.fail_puts.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl Storage for InMemoryStorage {
        async fn put(&self, key: &str, data: Bytes) -> StorageResult<String> {
            if *self.fail_puts.lock().unwrap() {
                return Err(StorageError::WriteFailed("disk full".to_string()));
            }
            self.files.lock().unwrap().insert(key.to_string(), data);
            Ok(key.to_string())
        }

        async fn exists(&self, key: &str) -> StorageResult<bool> {
            Ok(self.files.lock().unwrap().contains_key(key))
        }

        async fn delete(&self, key: &str) -> StorageResult<bool> {
            Ok(self.files.lock().unwrap().remove(key).is_some())
        }

        fn url(&self, key: &str) -> String {
            format!("http://test/storage/{key}")
        }
    }

    #[derive(Default)]
    struct InMemoryRepository {
        courses: Mutex<HashMap<Uuid, Course>>,
    }

    fn assemble(id: Uuid, draft: CourseDraft) -> Course {
        let now = Utc::now();
        let modules = draft
            .modules
            .into_iter()
            .enumerate()
            .map(|(module_index, module)| {
                let module_id = Uuid::new_v4();
                Module {
                    id: module_id,
                    course_id: id,
                    title: module.title,
                    order: module_index as i32,
                    created_at: now,
                    updated_at: now,
                    contents: module
                        .contents
                        .into_iter()
                        .enumerate()
                        .map(|(content_index, content)| Content {
                            id: Uuid::new_v4(),
                            module_id,
                            title: content.title,
                            content_type: content.content_type,
                            content_text: content.content_text,
                            video_url: content.video_url,
                            video_source_type: content.video_source_type,
                            video_length: content.video_length,
                            video_path: content.video_path,
                            image_path: content.image_path,
                            document_path: content.document_path,
                            column_position: content.column_position,
                            order: content_index as i32,
                            created_at: now,
                            updated_at: now,
                        })
                        .collect(),
                }
            })
            .collect();

        Course {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            feature_video_path: draft.feature_video_path,
            created_at: now,
            updated_at: now,
            modules,
        }
    }

    #[async_trait]
    impl CourseRepository for InMemoryRepository {
        async fn create_course(&self, draft: CourseDraft) -> Result<Course, AppError> {
            let course = assemble(Uuid::new_v4(), draft);
            self.courses
                .lock()
                .unwrap()
                .insert(course.id, course.clone());
            Ok(course)
        }

        async fn get_course_with_relations(&self, id: Uuid) -> Result<Course, AppError> {
            self.courses
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("course {id}")))
        }

        async fn update_course(&self, id: Uuid, mut draft: CourseDraft) -> Result<Course, AppError> {
            let mut courses = self.courses.lock().unwrap();
            let existing = courses
                .get(&id)
                .ok_or_else(|| AppError::NotFound(format!("course {id}")))?;
            if draft.feature_video_path.is_none() {
                draft.feature_video_path = existing.feature_video_path.clone();
            }
            let course = assemble(id, draft);
            courses.insert(id, course.clone());
            Ok(course)
        }

        async fn delete_course(&self, id: Uuid) -> Result<(), AppError> {
            self.courses
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| AppError::NotFound(format!("course {id}")))
        }

        async fn list_courses(&self, page: i64) -> Result<CoursePage, AppError> {
            let courses = self.courses.lock().unwrap();
            let data = courses
                .values()
                .map(|c| coursecraft_core::models::CourseSummary {
                    id: c.id,
                    title: c.title.clone(),
                    description: c.description.clone(),
                    category: c.category.clone(),
                    feature_video_path: c.feature_video_path.clone(),
                    module_count: c.modules.len() as i64,
                    created_at: c.created_at,
                    updated_at: c.updated_at,
                })
                .collect::<Vec<_>>();
            let total = data.len() as i64;
            Ok(CoursePage {
                data,
                page,
                per_page: 10,
                total,
                total_pages: (total + 9) / 10,
            })
        }
    }

    struct Harness {
        service: CourseService,
        storage: Arc<InMemoryStorage>,
        repository: Arc<InMemoryRepository>,
    }

    fn harness() -> Harness {
        let storage = Arc::new(InMemoryStorage::default());
        let repository = Arc::new(InMemoryRepository::default());
        let service = CourseService::new(
            repository.clone(),
            MediaIngestor::new(storage.clone()),
        );
        Harness {
            service,
            storage,
            repository,
        }
    }

    fn video(name: &str) -> UploadedFile {
        UploadedFile::new(name, Bytes::from_static(b"video-bytes"))
    }

    fn base_payload() -> CoursePayload {
        CoursePayload {
            title: "Rust for Web".into(),
            description: "A course".into(),
            category: "Programming".into(),
            feature_video: Some(video("intro.mp4")),
            modules: vec![ModulePayload {
                title: "Module one".into(),
                contents: vec![],
            }],
        }
    }

    // ----- tests -----

    #[tokio::test]
    async fn create_assigns_dense_orders_in_submission_order() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules = vec![
            ModulePayload {
                title: "first".into(),
                contents: vec![
                    ContentPayload {
                        content_text: Some("a".into()),
                        ..Default::default()
                    },
                    ContentPayload {
                        content_text: Some("b".into()),
                        ..Default::default()
                    },
                ],
            },
            ModulePayload {
                title: "second".into(),
                contents: vec![ContentPayload {
                    content_text: Some("c".into()),
                    ..Default::default()
                }],
            },
            ModulePayload {
                title: "third".into(),
                contents: vec![],
            },
        ];

        let course = h.service.create_course(payload).await.unwrap();

        assert_eq!(course.modules.len(), 3);
        for (i, module) in course.modules.iter().enumerate() {
            assert_eq!(module.order, i as i32);
            for (j, content) in module.contents.iter().enumerate() {
                assert_eq!(content.order, j as i32);
            }
        }
        assert_eq!(course.modules[0].contents.len(), 2);
        assert_eq!(course.modules[1].contents[0].content_type, ContentType::Text);
    }

    #[tokio::test]
    async fn create_without_feature_video_is_rejected() {
        let h = harness();
        let mut payload = base_payload();
        payload.feature_video = None;

        let err = h.service.create_course(payload).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(h.storage.keys().is_empty());
    }

    #[tokio::test]
    async fn feature_video_rejection_aborts_whole_create() {
        let h = harness();
        let mut payload = base_payload();
        payload.feature_video = Some(UploadedFile::new(
            "intro.txt",
            Bytes::from_static(b"not a video"),
        ));

        let err = h.service.create_course(payload).await.unwrap_err();
        assert!(matches!(err, AppError::UploadRejected(_)));
        assert!(h.storage.keys().is_empty());
        assert!(h.repository.courses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn feature_video_storage_failure_aborts_whole_create() {
        let h = harness();
        h.storage.set_fail_puts(true);

        let err = h.service.create_course(base_payload()).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(h.repository.courses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn validation_failure_writes_nothing() {
        let h = harness();
        let mut payload = base_payload();
        payload.title = String::new();

        let err = h.service.create_course(payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(h.storage.keys().is_empty());
    }

    #[tokio::test]
    async fn rejected_content_image_is_skipped_but_video_kept() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules[0].contents = vec![ContentPayload {
            video_file: Some(video("lecture.mp4")),
            image_file: Some(UploadedFile::new(
                "diagram.bmp", // not in the image allow-list
                Bytes::from_static(b"bits"),
            )),
            ..Default::default()
        }];

        let course = h.service.create_course(payload).await.unwrap();

        let content = &course.modules[0].contents[0];
        assert_eq!(content.content_type, ContentType::Video);
        assert!(content.video_path.is_some());
        assert!(content.image_path.is_none());
    }

    #[tokio::test]
    async fn uploaded_video_wins_type_over_image() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules[0].contents = vec![ContentPayload {
            video_file: Some(video("lecture.mp4")),
            image_file: Some(UploadedFile::new("a.png", Bytes::from_static(b"png"))),
            ..Default::default()
        }];

        let course = h.service.create_course(payload).await.unwrap();

        let content = &course.modules[0].contents[0];
        assert_eq!(content.content_type, ContentType::Video);
        assert!(content.video_path.is_some());
        assert!(content.image_path.is_some());
    }

    #[tokio::test]
    async fn external_video_url_wins_type_over_image() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules[0].contents = vec![ContentPayload {
            video_url: Some("https://youtu.be/abc".into()),
            image_file: Some(UploadedFile::new("a.png", Bytes::from_static(b"png"))),
            ..Default::default()
        }];

        let course = h.service.create_course(payload).await.unwrap();

        let content = &course.modules[0].contents[0];
        assert_eq!(content.content_type, ContentType::Video);
        assert!(content.image_path.is_some());
    }

    #[tokio::test]
    async fn image_alone_sets_image_type() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules[0].contents = vec![ContentPayload {
            image_file: Some(UploadedFile::new("a.png", Bytes::from_static(b"png"))),
            content_text: Some("caption".into()),
            ..Default::default()
        }];

        let course = h.service.create_course(payload).await.unwrap();
        assert_eq!(
            course.modules[0].contents[0].content_type,
            ContentType::Image
        );
    }

    #[tokio::test]
    async fn update_replaces_subtree_not_merges() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules = vec![
            ModulePayload {
                title: "one".into(),
                contents: vec![],
            },
            ModulePayload {
                title: "two".into(),
                contents: vec![],
            },
            ModulePayload {
                title: "three".into(),
                contents: vec![],
            },
        ];
        let course = h.service.create_course(payload).await.unwrap();
        assert_eq!(course.modules.len(), 3);

        let mut update = base_payload();
        update.feature_video = None;
        update.modules = vec![ModulePayload {
            title: "only".into(),
            contents: vec![],
        }];

        let updated = h.service.update_course(course.id, update).await.unwrap();
        assert_eq!(updated.modules.len(), 1);
        assert_eq!(updated.modules[0].title, "only");
        // No new feature video attached: the stored one is kept.
        assert_eq!(updated.feature_video_path, course.feature_video_path);
    }

    #[tokio::test]
    async fn update_deletes_replaced_content_blobs() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules[0].contents = vec![ContentPayload {
            image_file: Some(UploadedFile::new("a.png", Bytes::from_static(b"png"))),
            ..Default::default()
        }];
        let course = h.service.create_course(payload).await.unwrap();
        let image_path = course.modules[0].contents[0]
            .image_path
            .clone()
            .unwrap();
        let feature_path = course.feature_video_path.clone().unwrap();

        let mut update = base_payload();
        update.feature_video = None;
        update.modules = vec![ModulePayload {
            title: "rewritten".into(),
            contents: vec![],
        }];
        h.service.update_course(course.id, update).await.unwrap();

        // The replaced subtree's blob is gone, the kept feature video is not.
        assert!(!h.storage.keys().contains(&image_path));
        assert!(h.storage.keys().contains(&feature_path));
    }

    #[tokio::test]
    async fn update_with_new_feature_video_deletes_old_blob() {
        let h = harness();
        let course = h.service.create_course(base_payload()).await.unwrap();
        let old_path = course.feature_video_path.clone().unwrap();
        assert!(h.storage.keys().contains(&old_path));

        let mut update = base_payload();
        update.feature_video = Some(video("new-intro.mov"));
        let updated = h.service.update_course(course.id, update).await.unwrap();

        let new_path = updated.feature_video_path.unwrap();
        assert_ne!(new_path, old_path);
        assert!(!h.storage.keys().contains(&old_path));
        assert!(h.storage.keys().contains(&new_path));
    }

    #[tokio::test]
    async fn update_of_missing_course_is_not_found() {
        let h = harness();
        let mut update = base_payload();
        update.feature_video = None;

        let err = h
            .service
            .update_course(Uuid::new_v4(), update)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_cascades_blob_cleanup() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules[0].contents = vec![ContentPayload {
            image_file: Some(UploadedFile::new("a.png", Bytes::from_static(b"png"))),
            ..Default::default()
        }];
        let course = h.service.create_course(payload).await.unwrap();
        assert_eq!(h.storage.keys().len(), 2); // feature video + image

        h.service.delete_course(course.id).await.unwrap();

        assert!(h.storage.keys().is_empty());
        assert!(h.repository.courses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_succeeds_when_blob_already_missing() {
        let h = harness();
        let mut payload = base_payload();
        payload.modules[0].contents = vec![ContentPayload {
            image_file: Some(UploadedFile::new("a.png", Bytes::from_static(b"png"))),
            ..Default::default()
        }];
        let course = h.service.create_course(payload).await.unwrap();

        let image_path = course.modules[0].contents[0]
            .image_path
            .clone()
            .unwrap();
        h.storage.remove_raw(&image_path);

        h.service.delete_course(course.id).await.unwrap();
        assert!(h.repository.courses.lock().unwrap().is_empty());
    }
}
