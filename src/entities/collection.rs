use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::entities::MediaId;

pub type CollectionId = Uuid;

/// A named group of media items. `items` mirrors `Media::collections`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: String,
    pub items: Vec<MediaId>,
    pub created_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            items: vec![],
            created_at: Utc::now(),
        }
    }
}
