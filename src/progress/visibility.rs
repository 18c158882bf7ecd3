//! Viewport visibility of topics
//!
//! The content pane reports where each topic sits in its rendered lines and
//! which lines are on screen. [`VisibilityWatch`] turns that into
//! intersection events, one per topic each time it rises to the read
//! threshold.

use std::collections::HashSet;

use super::READ_THRESHOLD;

/// Rendered line range of a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicExtent {
    pub topic: String,
    /// First rendered line
    pub start: usize,
    /// Number of rendered lines
    pub len: usize,
}

impl TopicExtent {
    /// Fraction of this topic inside the lines `[top, top + height)`
    pub fn visible_ratio(&self, top: usize, height: usize) -> f32 {
        if self.len == 0 {
            return 0.0;
        }
        let end = self.start + self.len;
        let bottom = top + height;
        let overlap = end.min(bottom).saturating_sub(self.start.max(top));
        overlap as f32 / self.len as f32
    }
}

/// A topic whose visible fraction crossed the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub topic: String,
    pub ratio: f32,
}

/// Tracks which topics are currently at or above the threshold
#[derive(Debug, Clone, Default)]
pub struct VisibilityWatch {
    visible: HashSet<String>,
}

impl VisibilityWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the viewport against every topic and report new crossings
    pub fn update(&mut self, extents: &[TopicExtent], top: usize, height: usize) -> Vec<Intersection> {
        let mut entries = Vec::new();

        for extent in extents {
            let ratio = extent.visible_ratio(top, height);
            if ratio >= READ_THRESHOLD {
                if self.visible.insert(extent.topic.clone()) {
                    entries.push(Intersection { topic: extent.topic.clone(), ratio });
                }
            } else {
                self.visible.remove(&extent.topic);
            }
        }

        entries
    }
}
