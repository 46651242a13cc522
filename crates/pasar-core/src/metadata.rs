//! Row metadata: public identifiers, timestamps and slugs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity and timestamps for a row about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub uid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    /// Fresh UUID v4 with both timestamps set to now.
    pub fn generate() -> Self {
        let now = Utc::now();
        Metadata {
            uid: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lowercases a name and replaces spaces with `-`.
///
/// ```rust
/// use pasar_core::metadata::slugify;
///
/// assert_eq!(slugify("Kopi Gayo Arabika"), "kopi-gayo-arabika");
/// ```
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}
