//! Coursecraft Storage Library
//!
//! Blob store abstraction for uploaded course media. The store is
//! key-addressed: a stored path like `videos/features/{token}_{ts}.mp4` is
//! the persisted reference, and a public URL is derived by concatenating a
//! base URL. Keys must not contain `..` or a leading `/`.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::generate_media_key;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
