use chrono::{DateTime, Duration, Utc};
use crate::entities::Media;

pub const TRASH_RETENTION_DAYS: i64 = 30;

/// A soft-deleted item: the media record plus the moment it was deleted.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TrashEntry {
    pub media: Media,
    pub deleted_at: DateTime<Utc>,
}

impl TrashEntry {
    pub fn new(media: Media) -> Self {
        Self { media, deleted_at: Utc::now() }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.deleted_at > Duration::days(TRASH_RETENTION_DAYS)
    }
}
