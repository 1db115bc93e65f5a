//! Course tree repository
//!
//! Owns transactional create/read/update/delete of the course aggregate.
//! Writes replace the entire module/content subtree: modules are deleted and
//! reinserted (contents follow via FK cascade), there is no stable child
//! identity across an update. Courses and contents soft-delete; modules do
//! not carry a tombstone because replace-on-update recreates them anyway.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use coursecraft_core::constants::COURSES_PER_PAGE;
use coursecraft_core::models::{
    Content, Course, CourseDraft, CoursePage, CourseSummary, Module, ModuleDraft,
};
use coursecraft_core::AppError;

/// Persistence contract for the course aggregate.
///
/// Every mutating operation is atomic: it either commits the whole tree
/// change or leaves the store untouched.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist a new course with its full module/content tree.
    async fn create_course(&self, draft: CourseDraft) -> Result<Course, AppError>;

    /// Load a live course with modules and contents eager-loaded, both
    /// ordered by `order` ascending. `NotFound` when the id does not
    /// resolve to a live row.
    async fn get_course_with_relations(&self, id: Uuid) -> Result<Course, AppError>;

    /// Update course scalars and replace the entire subtree in one
    /// transaction.
    async fn update_course(&self, id: Uuid, draft: CourseDraft) -> Result<Course, AppError>;

    /// Soft-delete a course (tombstoned, recoverable).
    async fn delete_course(&self, id: Uuid) -> Result<(), AppError>;

    /// Paginated listing, newest first, with a module count per course.
    async fn list_courses(&self, page: i64) -> Result<CoursePage, AppError>;
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    feature_video_path: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ModuleRow {
    id: Uuid,
    course_id: Uuid,
    title: String,
    order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ContentRow {
    id: Uuid,
    module_id: Uuid,
    title: Option<String>,
    content_type: String,
    content_text: Option<String>,
    video_url: Option<String>,
    video_source_type: Option<String>,
    video_length: Option<String>,
    video_path: Option<String>,
    image_path: Option<String>,
    document_path: Option<String>,
    column_position: Option<String>,
    order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct CourseListRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    feature_video_path: Option<String>,
    module_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_enum<T>(value: String) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    value.parse::<T>().map_err(AppError::Internal)
}

fn parse_enum_opt<T>(value: Option<String>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = String>,
{
    value.map(|v| v.parse::<T>()).transpose().map_err(AppError::Internal)
}

impl ContentRow {
    fn into_content(self) -> Result<Content, AppError> {
        Ok(Content {
            id: self.id,
            module_id: self.module_id,
            title: self.title,
            content_type: parse_enum(self.content_type)?,
            content_text: self.content_text,
            video_url: self.video_url,
            video_source_type: parse_enum_opt(self.video_source_type)?,
            video_length: self.video_length,
            video_path: self.video_path,
            image_path: self.image_path,
            document_path: self.document_path,
            column_position: parse_enum_opt(self.column_position)?,
            order: self.order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Postgres-backed course tree repository.
#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert the module/content subtree for `course_id`, assigning dense
/// zero-based orders from submission position.
async fn insert_module_tree(
    tx: &mut Transaction<'_, Postgres>,
    course_id: Uuid,
    modules: &[ModuleDraft],
) -> Result<(), AppError> {
    for (module_index, module) in modules.iter().enumerate() {
        let module_id = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO modules (course_id, title, "order")
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(course_id)
        .bind(&module.title)
        .bind(module_index as i32)
        .fetch_one(&mut **tx)
        .await?;

        for (content_index, content) in module.contents.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO contents
                    (module_id, title, type, content_text, video_url, video_source_type,
                     video_length, video_path, image_path, document_path, column_position, "order")
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(module_id)
            .bind(&content.title)
            .bind(content.content_type.as_str())
            .bind(&content.content_text)
            .bind(&content.video_url)
            .bind(content.video_source_type.map(|v| v.as_str()))
            .bind(&content.video_length)
            .bind(&content.video_path)
            .bind(&content.image_path)
            .bind(&content.document_path)
            .bind(content.column_position.map(|v| v.as_str()))
            .bind(content_index as i32)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    #[tracing::instrument(skip(self, draft), fields(db.table = "courses", db.operation = "insert"))]
    async fn create_course(&self, draft: CourseDraft) -> Result<Course, AppError> {
        let mut tx = self.pool.begin().await?;

        let course_id = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO courses (title, description, category, feature_video_path)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.feature_video_path)
        .fetch_one(&mut *tx)
        .await?;

        insert_module_tree(&mut tx, course_id, &draft.modules).await?;

        tx.commit().await?;

        tracing::info!(course_id = %course_id, modules = draft.modules.len(), "Course created");

        self.get_course_with_relations(course_id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "courses", db.operation = "select", db.record_id = %id))]
    async fn get_course_with_relations(&self, id: Uuid) -> Result<Course, AppError> {
        let course = sqlx::query_as::<Postgres, CourseRow>(
            r#"
            SELECT id, title, description, category, feature_video_path, created_at, updated_at
            FROM courses
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("course {id}")))?;

        let module_rows = sqlx::query_as::<Postgres, ModuleRow>(
            r#"
            SELECT id, course_id, title, "order", created_at, updated_at
            FROM modules
            WHERE course_id = $1
            ORDER BY "order" ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let module_ids: Vec<Uuid> = module_rows.iter().map(|m| m.id).collect();

        let content_rows = sqlx::query_as::<Postgres, ContentRow>(
            r#"
            SELECT id, module_id, title, type AS content_type, content_text, video_url, video_source_type,
                   video_length, video_path, image_path, document_path, column_position,
                   "order", created_at, updated_at
            FROM contents
            WHERE module_id = ANY($1) AND deleted_at IS NULL
            ORDER BY "order" ASC
            "#,
        )
        .bind(&module_ids)
        .fetch_all(&self.pool)
        .await?;

        // Rows arrive ordered; stable grouping keeps each module's contents
        // in `order` sequence.
        let mut contents_by_module: HashMap<Uuid, Vec<Content>> = HashMap::new();
        for row in content_rows {
            let content = row.into_content()?;
            contents_by_module
                .entry(content.module_id)
                .or_default()
                .push(content);
        }

        let modules = module_rows
            .into_iter()
            .map(|row| Module {
                contents: contents_by_module.remove(&row.id).unwrap_or_default(),
                id: row.id,
                course_id: row.course_id,
                title: row.title,
                order: row.order,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();

        Ok(Course {
            id: course.id,
            title: course.title,
            description: course.description,
            category: course.category,
            feature_video_path: course.feature_video_path,
            created_at: course.created_at,
            updated_at: course.updated_at,
            modules,
        })
    }

    #[tracing::instrument(skip(self, draft), fields(db.table = "courses", db.operation = "update", db.record_id = %id))]
    async fn update_course(&self, id: Uuid, draft: CourseDraft) -> Result<Course, AppError> {
        let mut tx = self.pool.begin().await?;

        // COALESCE keeps the current feature video when no new one was
        // ingested for this update.
        let updated = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            UPDATE courses
            SET title = $1,
                description = $2,
                category = $3,
                feature_video_path = COALESCE($4, feature_video_path),
                updated_at = now()
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(&draft.feature_video_path)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("course {id}")));
        }

        // Full tree replace: drop the old subtree (contents cascade) and
        // rebuild from the draft in the same transaction.
        sqlx::query("DELETE FROM modules WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_module_tree(&mut tx, id, &draft.modules).await?;

        tx.commit().await?;

        tracing::info!(course_id = %id, modules = draft.modules.len(), "Course tree replaced");

        self.get_course_with_relations(id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "courses", db.operation = "soft_delete", db.record_id = %id))]
    async fn delete_course(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("course {id}")));
        }

        tracing::info!(course_id = %id, "Course soft-deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "courses", db.operation = "select"))]
    async fn list_courses(&self, page: i64) -> Result<CoursePage, AppError> {
        let page = page.max(1);
        let offset = (page - 1) * COURSES_PER_PAGE;

        let rows = sqlx::query_as::<Postgres, CourseListRow>(
            r#"
            SELECT c.id, c.title, c.description, c.category, c.feature_video_path,
                   COUNT(m.id) AS module_count, c.created_at, c.updated_at
            FROM courses c
            LEFT JOIN modules m ON m.course_id = c.id
            WHERE c.deleted_at IS NULL
            GROUP BY c.id
            ORDER BY c.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(COURSES_PER_PAGE)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>(
            "SELECT COUNT(*) FROM courses WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        let data = rows
            .into_iter()
            .map(|row| CourseSummary {
                id: row.id,
                title: row.title,
                description: row.description,
                category: row.category,
                feature_video_path: row.feature_video_path,
                module_count: row.module_count,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();

        Ok(CoursePage {
            data,
            page,
            per_page: COURSES_PER_PAGE,
            total,
            total_pages: (total + COURSES_PER_PAGE - 1) / COURSES_PER_PAGE,
        })
    }
}
