//! Storage key generation.
//!
//! Key format: `{directory}/{token}_{unix_ts}.{ext}` where `token` is a
//! 40-character random alphanumeric string. The entropy makes collisions
//! practically impossible without an existence lookup.

use rand::distr::Alphanumeric;
use rand::Rng;

const TOKEN_LEN: usize = 40;

/// Generate a collision-resistant storage key for an uploaded file.
///
/// The original filename only contributes its extension (lowercased); the
/// client-controlled name never reaches the store.
pub fn generate_media_key(directory: &str, original_filename: &str) -> String {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    let timestamp = chrono::Utc::now().timestamp();

    let extension = original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string());

    format!(
        "{}/{}_{}.{}",
        directory.trim_matches('/'),
        token,
        timestamp,
        extension
    )
}
