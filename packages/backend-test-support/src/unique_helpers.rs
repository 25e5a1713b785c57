//! Unique fixture values so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("game");
/// let b = unique_str("game");
/// assert_ne!(a, b);
/// assert!(a.starts_with("game-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A game code that fits the 40-character column: `{prefix}-{ulid}` with the
/// prefix cut to 13 characters.
pub fn unique_game_code(prefix: &str) -> String {
    let prefix: String = prefix.chars().take(13).collect();
    unique_str(&prefix)
}
