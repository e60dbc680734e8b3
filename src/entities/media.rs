use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::entities::CollectionId;

pub type MediaId = Uuid;

/// A bookmarked embeddable media snippet.
///
/// `tags` is kept as the user typed it: a comma-separated free-text string.
/// `collections` mirrors `Collection::items` and both sides are updated
/// together by the store.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Media {
    pub id: MediaId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: String,
    pub embed: String,
    pub favorite: bool,
    pub pinned: bool,
    pub view_count: u64,
    pub last_viewed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub collections: Vec<CollectionId>,
}

impl Media {
    pub fn from_draft(draft: MediaDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            tags: draft.tags,
            embed: draft.embed,
            favorite: false,
            pinned: false,
            view_count: 0,
            last_viewed: None,
            created_at: Utc::now(),
            updated_at: None,
            collections: vec![],
        }
    }

    /// Comma-split, trimmed, lowercased, empty entries dropped.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(|x| x.trim().to_lowercase())
            .filter(|x| !x.is_empty())
            .collect()
    }

    /// Lowercased whitespace-split title words.
    pub fn title_words(&self) -> Vec<String> {
        self.title
            .split_whitespace()
            .map(|x| x.to_lowercase())
            .collect()
    }
}

/// User-supplied fields for a new item. Everything else is assigned on save.
#[derive(serde::Serialize, serde::Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct MediaDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: String,
    pub embed: String,
}

/// Shallow partial update: present fields fully replace, absent fields are
/// left untouched.
#[derive(serde::Serialize, serde::Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct MediaPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub embed: Option<String>,
}

impl MediaPatch {
    pub fn apply_to(self, media: &mut Media) {
        if let Some(title) = self.title {
            media.title = title;
        }
        if let Some(description) = self.description {
            media.description = description;
        }
        if let Some(category) = self.category {
            media.category = category;
        }
        if let Some(tags) = self.tags {
            media.tags = tags;
        }
        if let Some(embed) = self.embed {
            media.embed = embed;
        }
    }
}
