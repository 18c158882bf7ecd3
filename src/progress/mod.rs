//! Reading progress tracking
//!
//! Topics become "read" once at least half of them has been on screen. The
//! set of read topic ids is persisted under [`READ_TOPICS_KEY`] and only ever
//! grows; at load time every navigation link targeting a read topic gets a
//! read mark.

mod visibility;

pub use visibility::{Intersection, TopicExtent, VisibilityWatch};

use serde::{Deserialize, Serialize};

use crate::document::LinkMarks;
use crate::storage::{self, KeyValueStore, StorageError};

/// Storage key of the read-topic list
pub const READ_TOPICS_KEY: &str = "readTopics";

/// Fraction of a topic that must be visible for it to count as read
pub const READ_THRESHOLD: f32 = 0.5;

/// Glyph appended to read links
pub const READ_INDICATOR: &str = " ✓";

/// Ordered set of read topic ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadSet {
    topics: Vec<String>,
}

impl ReadSet {
    /// Load the persisted set.
    ///
    /// A missing or unparseable value is treated as an empty set; read marks
    /// are advisory and never worth failing over.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match storage::get_json::<ReadSet>(store, READ_TOPICS_KEY) {
            Ok(Some(set)) => set.deduplicated(),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring malformed {} value: {}", READ_TOPICS_KEY, e);
                Self::default()
            }
        }
    }

    /// Write the whole set back to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        storage::set_json(store, READ_TOPICS_KEY, self)
    }

    /// Add a topic id. Returns false if it was already present.
    pub fn insert(&mut self, topic: &str) -> bool {
        if self.contains(topic) {
            return false;
        }
        self.topics.push(topic.to_string());
        true
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }

    fn deduplicated(self) -> Self {
        let mut set = Self::default();
        for topic in &self.topics {
            set.insert(topic);
        }
        set
    }
}

/// Records topics as read when their visibility crosses the threshold
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    read: ReadSet,
}

impl ProgressTracker {
    /// Start from the persisted read set
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let read = ReadSet::load(store);
        if !read.is_empty() {
            tracing::debug!("Loaded {} read topics", read.len());
        }
        Self { read }
    }

    pub fn read_set(&self) -> &ReadSet {
        &self.read
    }

    /// Record every topic whose intersection reached the threshold.
    ///
    /// Returns the ids that were newly recorded. The set is written through
    /// whenever it changes.
    pub fn observe(
        &mut self,
        store: &mut dyn KeyValueStore,
        entries: &[Intersection],
    ) -> Vec<String> {
        let newly_read: Vec<String> = entries
            .iter()
            .filter(|entry| entry.ratio >= READ_THRESHOLD)
            .filter(|entry| self.read.insert(&entry.topic))
            .map(|entry| entry.topic.clone())
            .collect();

        if !newly_read.is_empty() {
            tracing::info!("Marked topics as read: {}", newly_read.join(", "));
            if let Err(e) = self.read.save(store) {
                tracing::warn!("Failed to persist read topics: {}", e);
            }
        }

        newly_read
    }
}

/// Mark every link whose target has been read.
///
/// The indicator is appended only once, so calling this repeatedly is safe.
pub fn apply_read_status<'a>(
    read: &ReadSet,
    links: impl IntoIterator<Item = (&'a str, &'a mut LinkMarks)>,
) -> usize {
    let mut marked = 0;
    for (target, marks) in links {
        if !read.contains(target.trim_start_matches('#')) {
            continue;
        }
        marks.read = true;
        if marks.indicator.is_none() {
            marks.indicator = Some(READ_INDICATOR.to_string());
        }
        marked += 1;
    }
    marked
}
