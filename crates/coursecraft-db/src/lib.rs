//! Coursecraft DB Library
//!
//! The course tree repository: transactional create/replace/soft-delete of
//! the Course -> Module -> Content aggregate over Postgres, plus the
//! paginated listing. The `CourseRepository` trait is the seam the course
//! service orchestrates through (and tests fake).

pub mod db;

pub use db::course::{CourseRepository, PgCourseRepository};
