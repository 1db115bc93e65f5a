//! Database access modules

pub mod course;
