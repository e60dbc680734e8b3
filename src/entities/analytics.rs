use std::collections::BTreeMap;
use chrono::NaiveDate;
use crate::entities::MediaId;

/// Per-day activity counters, keyed by calendar date. Append-only within a
/// day, never pruned.
pub type ActivityLog = BTreeMap<NaiveDate, DayActivity>;

#[derive(serde::Serialize, serde::Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct DayActivity {
    pub added: u64,
    pub viewed: u64,
    pub items: Vec<MediaId>,
}

impl DayActivity {
    /// Records that an item was touched today. Ids are kept distinct.
    pub fn touch(&mut self, id: MediaId) {
        if !self.items.contains(&id) {
            self.items.push(id);
        }
    }
}
