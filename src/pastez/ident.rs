//! Identity generation: storage suffixes, private keys, and the
//! description slug that makes storage directory names readable.

use rand::distr::{Alphanumeric, SampleString};
use uuid::Uuid;

/// Length of the private-key token. Short on purpose: the key travels in
/// URLs and is obscurity, not authentication.
pub const PRIVATE_KEY_LEN: usize = 5;

/// How much of the description slug survives into the directory name.
pub const SLUG_MAX_LEN: usize = 10;

/// Returns a fresh 32-character lowercase hex suffix.
///
/// The suffix is what actually guarantees directory uniqueness; the slug
/// in front of it is decoration. Collisions are ignored as negligible.
pub fn storage_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns a fresh 5-character alphanumeric private key.
pub fn private_key() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), PRIVATE_KEY_LEN)
}

/// Reduces a description to a filesystem- and URL-safe slug: ASCII
/// lowercase, `[a-z0-9_]` kept, runs of whitespace and hyphens collapsed
/// to single hyphens, everything else dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        }
    }
    slug
}

/// Directory name for a new storage unit: the truncated description slug
/// plus a unique suffix. A blank description leaves just `-{suffix}`.
pub fn storage_dirname(description: &str, suffix: &str) -> String {
    let slug: String = slugify(description).chars().take(SLUG_MAX_LEN).collect();
    format!("{}-{}", slug, suffix)
}
