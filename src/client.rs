use std::collections::HashMap;
use std::str::FromStr;
use chrono::Utc;
use itertools::Itertools;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::entities::*;
use crate::error::MediakeepError;
use crate::storage::{BlobStorage, StoreKey};

const POPULAR_VIEW_THRESHOLD: u64 = 5;
const RECOMMENDATION_LIMIT: usize = 5;
const DUPLICATE_TITLE_SUFFIX: &str = " (Copy)";

/// Active-set filters. Only one filter is active at a time; anything that
/// is not a built-in filter name is an exact case-insensitive category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaFilter {
    All,
    Favorites,
    Pinned,
    Popular,
    Category(String),
}

impl MediaFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "all" => MediaFilter::All,
            "favorites" => MediaFilter::Favorites,
            "pinned" => MediaFilter::Pinned,
            "popular" => MediaFilter::Popular,
            other => MediaFilter::Category(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Pinned,
    Newest,
    Oldest,
    Alphabetical,
    AlphabeticalReverse,
    MostViewed,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pinned" => Ok(SortMode::Pinned),
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "alphabetical" => Ok(SortMode::Alphabetical),
            "alphabetical-reverse" => Ok(SortMode::AlphabeticalReverse),
            "most-viewed" => Ok(SortMode::MostViewed),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

/// Returns a sorted copy; the input sequence is never mutated. All sorts
/// are stable, so ties keep their incoming order.
pub fn sort_media(items: &[Media], mode: SortMode) -> Vec<Media> {
    let mut sorted = items.to_vec();
    match mode {
        SortMode::Pinned => sorted.sort_by(|a, b| {
            b.pinned.cmp(&a.pinned).then(b.created_at.cmp(&a.created_at))
        }),
        SortMode::Newest => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::Alphabetical => sorted.sort_by_key(|x| x.title.to_lowercase()),
        SortMode::AlphabeticalReverse => {
            sorted.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        SortMode::MostViewed => sorted.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
    }
    sorted
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total_items: usize,
    pub total_favorites: usize,
    pub most_used_category: Option<String>,
    pub total_views: u64,
    pub storage_size: u64,
    pub categories: HashMap<String, u64>,
}

enum Activity {
    Added,
    Viewed,
}

/// Persistence-and-query façade over the four blobs. Every operation is a
/// whole-blob read-modify-write; nothing is cached between calls, so a
/// failed write leaves the persisted state as it was.
pub struct MediaStore<S: BlobStorage> {
    storage: S,
}

impl<S: BlobStorage> MediaStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn read_blob<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        let maybe_payload = match self.storage.read(key) {
            Ok(x) => x,
            Err(e) => {
                warn!("failed to read blob {:?}, treating as empty: {}", key, e);
                return T::default();
            }
        };
        let Some(payload) = maybe_payload else {
            return T::default();
        };
        match serde_json::from_str(&payload) {
            Ok(value) => value,
            Err(e) => {
                warn!("unreadable blob {:?}, treating as empty: {}", key, e);
                T::default()
            }
        }
    }

    fn write_blob<T: Serialize>(&mut self, key: StoreKey, value: &T) -> anyhow::Result<()> {
        let payload = serde_json::to_string(value)
            .map_err(MediakeepError::BlobSerializationError)?;
        self.storage.write(key, &payload)?;
        Ok(())
    }

    fn read_items(&self) -> Vec<Media> {
        self.read_blob(StoreKey::Media)
    }

    fn read_trash(&self) -> Vec<TrashEntry> {
        self.read_blob(StoreKey::Trash)
    }

    fn read_collections(&self) -> Vec<Collection> {
        self.read_blob(StoreKey::Collections)
    }

    fn track_activity(&mut self, activity: Activity, id: MediaId) {
        let mut log: ActivityLog = self.read_blob(StoreKey::Analytics);
        let day = log.entry(Utc::now().date_naive()).or_default();
        match activity {
            Activity::Added => day.added += 1,
            Activity::Viewed => day.viewed += 1,
        }
        day.touch(id);
        // the primary mutation already persisted, a lost counter is not fatal
        if let Err(e) = self.write_blob(StoreKey::Analytics, &log) {
            warn!("failed to record activity: {}", e);
        }
    }

    // ---- active set ----

    pub fn all_media(&self) -> Vec<Media> {
        self.read_items()
    }

    pub fn media_by_id(&self, id: MediaId) -> Option<Media> {
        let maybe_media = self.read_items().into_iter().find(|x| x.id == id);
        maybe_media
    }

    /// Persists a new item at the head of the active list (newest-first by
    /// construction) and records an "added" event for today.
    pub fn save_media(&mut self, draft: MediaDraft) -> anyhow::Result<Media> {
        let media = Media::from_draft(draft);
        let mut items = self.read_items();
        items.insert(0, media.clone());
        self.write_blob(StoreKey::Media, &items)?;
        debug!("saved media {}", media.id);
        self.track_activity(Activity::Added, media.id);
        Ok(media)
    }

    /// Shallow merge of the patch over the stored record. Returns `false`
    /// when the id is unknown.
    pub fn update_media(&mut self, id: MediaId, patch: MediaPatch) -> anyhow::Result<bool> {
        let mut items = self.read_items();
        let Some(media) = items.iter_mut().find(|x| x.id == id) else {
            return Ok(false);
        };
        patch.apply_to(media);
        media.updated_at = Some(Utc::now());
        self.write_blob(StoreKey::Media, &items)?;
        Ok(true)
    }

    pub fn increment_view(&mut self, id: MediaId) -> anyhow::Result<bool> {
        let mut items = self.read_items();
        let Some(media) = items.iter_mut().find(|x| x.id == id) else {
            return Ok(false);
        };
        media.view_count += 1;
        media.last_viewed = Some(Utc::now());
        self.write_blob(StoreKey::Media, &items)?;
        self.track_activity(Activity::Viewed, id);
        Ok(true)
    }

    /// Flips the flag and returns its new value, or `None` for an unknown id.
    pub fn toggle_favorite(&mut self, id: MediaId) -> anyhow::Result<Option<bool>> {
        let mut items = self.read_items();
        let Some(media) = items.iter_mut().find(|x| x.id == id) else {
            return Ok(None);
        };
        media.favorite = !media.favorite;
        let flag = media.favorite;
        self.write_blob(StoreKey::Media, &items)?;
        Ok(Some(flag))
    }

    pub fn toggle_pin(&mut self, id: MediaId) -> anyhow::Result<Option<bool>> {
        let mut items = self.read_items();
        let Some(media) = items.iter_mut().find(|x| x.id == id) else {
            return Ok(None);
        };
        media.pinned = !media.pinned;
        let flag = media.pinned;
        self.write_blob(StoreKey::Media, &items)?;
        Ok(Some(flag))
    }

    /// Saves a copy of an existing item with a fresh id, a `" (Copy)"`
    /// title suffix and zeroed view state.
    pub fn duplicate_media(&mut self, id: MediaId) -> anyhow::Result<Option<Media>> {
        let Some(media) = self.media_by_id(id) else {
            return Ok(None);
        };
        let draft = MediaDraft {
            title: format!("{}{}", media.title, DUPLICATE_TITLE_SUFFIX),
            description: media.description,
            category: media.category,
            tags: media.tags,
            embed: media.embed,
        };
        let copy = self.save_media(draft)?;
        Ok(Some(copy))
    }

    // ---- trash ----

    /// Moves the item into trash and out of the active set in one call.
    /// The trash blob is written first so a failure in between can
    /// duplicate the record across blobs but never lose it.
    pub fn delete_media(&mut self, id: MediaId) -> anyhow::Result<bool> {
        let mut items = self.read_items();
        let Some(position) = items.iter().position(|x| x.id == id) else {
            return Ok(false);
        };
        let media = items.remove(position);
        let mut trash = self.read_trash();
        trash.insert(0, TrashEntry::new(media));
        self.write_blob(StoreKey::Trash, &trash)?;
        self.write_blob(StoreKey::Media, &items)?;
        Ok(true)
    }

    /// Pure read: expired entries are filtered from the result but the
    /// blob is not rewritten. Use [`MediaStore::purge_expired`] for that.
    pub fn trash(&self) -> Vec<TrashEntry> {
        let now = Utc::now();
        self.read_trash()
            .into_iter()
            .filter(|x| !x.is_expired(now))
            .collect()
    }

    /// Rewrites the trash blob without entries past the retention window.
    /// Returns how many entries were dropped.
    pub fn purge_expired(&mut self) -> anyhow::Result<usize> {
        let trash = self.read_trash();
        let now = Utc::now();
        let kept = trash
            .iter()
            .filter(|x| !x.is_expired(now))
            .cloned()
            .collect::<Vec<TrashEntry>>();
        let purged = trash.len() - kept.len();
        if purged > 0 {
            self.write_blob(StoreKey::Trash, &kept)?;
            debug!("purged {} expired trash entries", purged);
        }
        Ok(purged)
    }

    /// Inverse of delete: the item rejoins the head of the active set and
    /// its deletion timestamp is gone with the discarded trash entry.
    pub fn restore_media(&mut self, id: MediaId) -> anyhow::Result<bool> {
        let now = Utc::now();
        let mut trash = self.read_trash();
        let Some(position) = trash
            .iter()
            .position(|x| x.media.id == id && !x.is_expired(now))
        else {
            return Ok(false);
        };
        let entry = trash.remove(position);
        let mut items = self.read_items();
        items.insert(0, entry.media);
        self.write_blob(StoreKey::Media, &items)?;
        self.write_blob(StoreKey::Trash, &trash)?;
        Ok(true)
    }

    pub fn permanent_delete(&mut self, id: MediaId) -> anyhow::Result<bool> {
        let mut trash = self.read_trash();
        let Some(position) = trash.iter().position(|x| x.media.id == id) else {
            return Ok(false);
        };
        trash.remove(position);
        self.write_blob(StoreKey::Trash, &trash)?;
        Ok(true)
    }

    pub fn empty_trash(&mut self) -> anyhow::Result<()> {
        self.write_blob(StoreKey::Trash, &Vec::<TrashEntry>::new())
    }

    // ---- queries ----

    pub fn filter_media(&self, filter: &MediaFilter) -> Vec<Media> {
        let items = self.read_items();
        match filter {
            MediaFilter::All => items,
            MediaFilter::Favorites => items.into_iter().filter(|x| x.favorite).collect(),
            MediaFilter::Pinned => items.into_iter().filter(|x| x.pinned).collect(),
            MediaFilter::Popular => {
                let mut popular = items
                    .into_iter()
                    .filter(|x| x.view_count >= POPULAR_VIEW_THRESHOLD)
                    .collect::<Vec<Media>>();
                popular.sort_by(|a, b| b.view_count.cmp(&a.view_count));
                popular
            }
            MediaFilter::Category(category) => {
                let category = category.to_lowercase();
                items
                    .into_iter()
                    .filter(|x| x.category.to_lowercase() == category)
                    .collect()
            }
        }
    }

    /// Case-insensitive substring match over title, category, tags and
    /// description. A blank query returns the whole active set.
    pub fn search_media(&self, query: &str) -> Vec<Media> {
        let items = self.read_items();
        let term = query.to_lowercase().trim().to_string();
        if term.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|x| {
                x.title.to_lowercase().contains(&term)
                    || x.category.to_lowercase().contains(&term)
                    || x.tags.to_lowercase().contains(&term)
                    || x.description.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Groups of ids sharing the same trimmed, case-folded title, in order
    /// of first occurrence. Exact equality only, no fuzzy matching.
    pub fn find_duplicates(&self) -> Vec<Vec<MediaId>> {
        let items = self.read_items();
        let mut first_seen: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<MediaId>> = HashMap::new();
        for item in &items {
            let key = item.title.trim().to_lowercase();
            let group = groups.entry(key.clone()).or_insert_with(|| {
                first_seen.push(key);
                Vec::new()
            });
            group.push(item.id);
        }
        first_seen
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .filter(|group| group.len() >= 2)
            .collect()
    }

    /// Scores every other active item against the source: +3 for the same
    /// category (case-insensitive, same policy as filtering), +2 per shared
    /// tag, +1 per shared title word longer than 3 characters. Top 5 by
    /// descending score, ties in storage order, zero scores excluded.
    pub fn recommendations(&self, id: MediaId) -> Vec<Media> {
        let items = self.read_items();
        let Some(source) = items.iter().find(|x| x.id == id) else {
            return vec![];
        };
        let source_category = source.category.to_lowercase();
        let source_tags = source.tag_list();
        let source_words = source.title_words();

        let mut scored: Vec<(usize, Media)> = Vec::new();
        for item in items.iter().filter(|x| x.id != id) {
            let mut score = 0;
            if item.category.to_lowercase() == source_category {
                score += 3;
            }
            let item_tags = item.tag_list();
            score += source_tags.iter().filter(|x| item_tags.contains(x)).count() * 2;
            let item_words = item.title_words();
            score += source_words
                .iter()
                .filter(|x| x.chars().count() > 3 && item_words.contains(x))
                .count();
            if score > 0 {
                scored.push((score, item.clone()));
            }
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(RECOMMENDATION_LIMIT)
            .map(|x| x.1)
            .collect()
    }

    pub fn statistics(&self) -> Statistics {
        let items = self.read_items();
        let mut categories: HashMap<String, u64> = HashMap::new();
        let mut total_views = 0;
        for item in &items {
            *categories.entry(item.category.to_lowercase()).or_default() += 1;
            total_views += item.view_count;
        }
        // first-encountered category wins a tie, so scan in storage order
        let mut most_used_category: Option<(String, u64)> = None;
        for category in items.iter().map(|x| x.category.to_lowercase()).unique() {
            let count = categories[&category];
            if most_used_category.as_ref().map_or(true, |x| count > x.1) {
                most_used_category = Some((category, count));
            }
        }
        let storage_size = match self.storage.read(StoreKey::Media) {
            Ok(Some(payload)) => payload.len() as u64,
            _ => 0,
        };
        Statistics {
            total_items: items.len(),
            total_favorites: items.iter().filter(|x| x.favorite).count(),
            most_used_category: most_used_category.map(|x| x.0),
            total_views,
            storage_size,
            categories,
        }
    }

    // ---- analytics ----

    pub fn analytics(&self) -> ActivityLog {
        self.read_blob(StoreKey::Analytics)
    }

    pub fn most_viewed(&self, limit: usize) -> Vec<Media> {
        let mut items = self
            .read_items()
            .into_iter()
            .filter(|x| x.view_count > 0)
            .collect::<Vec<Media>>();
        items.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        items.truncate(limit);
        items
    }

    pub fn recently_viewed(&self, limit: usize) -> Vec<Media> {
        let mut items = self
            .read_items()
            .into_iter()
            .filter(|x| x.last_viewed.is_some())
            .collect::<Vec<Media>>();
        items.sort_by(|a, b| b.last_viewed.cmp(&a.last_viewed));
        items.truncate(limit);
        items
    }

    /// Per-day "added" counts for the trailing window ending today, with
    /// days without activity zero-filled.
    pub fn activity_heatmap(&self, days: usize) -> Vec<(chrono::NaiveDate, u64)> {
        let log = self.analytics();
        let today = Utc::now().date_naive();
        (0..days)
            .rev()
            .map(|offset| {
                let date = today - chrono::Duration::days(offset as i64);
                let added = log.get(&date).map(|x| x.added).unwrap_or(0);
                (date, added)
            })
            .collect()
    }

    // ---- collections ----

    pub fn all_collections(&self) -> Vec<Collection> {
        self.read_collections()
    }

    pub fn collection_by_id(&self, id: CollectionId) -> Option<Collection> {
        let maybe_collection = self.read_collections().into_iter().find(|x| x.id == id);
        maybe_collection
    }

    pub fn create_collection(&mut self, name: String, description: String) -> anyhow::Result<Collection> {
        let collection = Collection::new(name, description);
        let mut collections = self.read_collections();
        collections.insert(0, collection.clone());
        self.write_blob(StoreKey::Collections, &collections)?;
        Ok(collection)
    }

    /// Adds the item to the collection and the collection id to the item,
    /// keeping the membership invariant in one call. `false` when the
    /// collection is unknown or already holds the item.
    pub fn add_to_collection(&mut self, collection_id: CollectionId, media_id: MediaId) -> anyhow::Result<bool> {
        let mut collections = self.read_collections();
        let Some(collection) = collections.iter_mut().find(|x| x.id == collection_id) else {
            return Ok(false);
        };
        if collection.items.contains(&media_id) {
            return Ok(false);
        }
        collection.items.push(media_id);
        self.write_blob(StoreKey::Collections, &collections)?;

        let mut items = self.read_items();
        if let Some(media) = items.iter_mut().find(|x| x.id == media_id) {
            if !media.collections.contains(&collection_id) {
                media.collections.push(collection_id);
                self.write_blob(StoreKey::Media, &items)?;
            }
        }
        Ok(true)
    }

    pub fn remove_from_collection(&mut self, collection_id: CollectionId, media_id: MediaId) -> anyhow::Result<bool> {
        let mut collections = self.read_collections();
        let Some(collection) = collections.iter_mut().find(|x| x.id == collection_id) else {
            return Ok(false);
        };
        collection.items.retain(|x| *x != media_id);
        self.write_blob(StoreKey::Collections, &collections)?;

        let mut items = self.read_items();
        if let Some(media) = items.iter_mut().find(|x| x.id == media_id) {
            media.collections.retain(|x| *x != collection_id);
            self.write_blob(StoreKey::Media, &items)?;
        }
        Ok(true)
    }

    /// Deletes the collection and strips its id from every member item.
    pub fn delete_collection(&mut self, collection_id: CollectionId) -> anyhow::Result<bool> {
        let mut collections = self.read_collections();
        let before = collections.len();
        collections.retain(|x| x.id != collection_id);
        if collections.len() == before {
            return Ok(false);
        }
        self.write_blob(StoreKey::Collections, &collections)?;

        let mut items = self.read_items();
        for media in items.iter_mut() {
            media.collections.retain(|x| *x != collection_id);
        }
        self.write_blob(StoreKey::Media, &items)?;
        Ok(true)
    }
}
