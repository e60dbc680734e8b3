pub mod analytics;
pub mod collection;
pub mod media;
pub mod trash;

pub use crate::entities::analytics::{ActivityLog, DayActivity};
pub use crate::entities::collection::{Collection, CollectionId};
pub use crate::entities::media::{Media, MediaDraft, MediaId, MediaPatch};
pub use crate::entities::trash::{TrashEntry, TRASH_RETENTION_DAYS};
