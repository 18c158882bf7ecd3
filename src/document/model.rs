//! Document model
//!
//! A document is a fixed tree of chapters and sections laid over a flat,
//! ordered list of blocks. The outline is what the sidebar navigates; the
//! blocks are what the content pane renders and what search scans. Ids are
//! anchor targets shared by both.

use serde::{Deserialize, Serialize};

/// A complete loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Display title
    pub title: String,
    /// Chapters in order
    pub chapters: Vec<ChapterEntry>,
    /// Topics tracked for read status, in document order
    pub topics: Vec<Topic>,
    /// Rendered blocks in document order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), chapters: Vec::new(), topics: Vec::new(), blocks: Vec::new() }
    }

    /// Get total section count across all chapters
    pub fn section_count(&self) -> usize {
        self.chapters.iter().map(|c| c.sections.len()).sum()
    }

    /// Find the topic with the given id
    pub fn find_topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Whether any heading in the document carries this anchor
    pub fn has_anchor(&self, id: &str) -> bool {
        self.blocks.iter().any(|b| b.anchor() == Some(id))
    }

    /// Iterate over the searchable content nodes with their block index
    pub fn content_nodes(&self) -> impl Iterator<Item = (usize, &ContentNode)> {
        self.blocks.iter().enumerate().filter_map(|(idx, block)| match block {
            Block::Content(node) => Some((idx, node)),
            _ => None,
        })
    }

    /// Mutable access to the searchable content nodes with their block index
    pub fn content_nodes_mut(&mut self) -> impl Iterator<Item = (usize, &mut ContentNode)> {
        self.blocks.iter_mut().enumerate().filter_map(|(idx, block)| match block {
            Block::Content(node) => Some((idx, node)),
            _ => None,
        })
    }

    /// Every topic link in the document
    pub fn topic_links_mut(&mut self) -> impl Iterator<Item = &mut TopicLink> {
        self.chapters.iter_mut().flat_map(|c| c.topic_links.iter_mut())
    }

    /// Target and read marks of every topic link
    pub fn topic_link_marks_mut(&mut self) -> impl Iterator<Item = (&str, &mut LinkMarks)> {
        self.topic_links_mut().map(|link| (link.target.as_str(), &mut link.marks))
    }
}

/// A top-level navigable unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterEntry {
    /// Anchor id
    pub id: String,
    /// Label shown in the sidebar and title bar
    pub label: String,
    /// Marked as the initially active chapter in the source
    pub marked_active: bool,
    /// Sections within this chapter
    pub sections: Vec<SectionEntry>,
    /// Links to the topics this chapter contains
    pub topic_links: Vec<TopicLink>,
}

impl ChapterEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            marked_active: false,
            sections: Vec::new(),
            topic_links: Vec::new(),
        }
    }
}

/// A second-level navigable unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionEntry {
    pub id: String,
    pub label: String,
}

impl SectionEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

/// A content unit tracked for read status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    /// Owning chapter index, if the topic appears inside a chapter
    pub chapter: Option<usize>,
}

/// Read marks carried by a navigation link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMarks {
    /// Link target has been read
    pub read: bool,
    /// Appended read indicator, if one has been added
    pub indicator: Option<String>,
}

/// A link from a chapter's topic list to a topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicLink {
    pub target: String,
    pub label: String,
    pub marks: LinkMarks,
}

/// A block of rendered content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Block {
    /// A heading; chapters are level 1, sections level 2, topics level 3
    Heading { level: u8, text: String, anchor: Option<String> },
    /// A searchable content node
    Content(ContentNode),
    /// The topic list of the chapter with this index
    TopicList(usize),
    /// A code block (rendered, never searched)
    Code(String),
    /// A horizontal rule
    Rule,
}

impl Block {
    /// Anchor id of this block, if it is an anchored heading
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Block::Heading { anchor, .. } => anchor.as_deref(),
            _ => None,
        }
    }
}

/// The four categories of content that search scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Paragraph,
    ListItem,
    Definition,
    Example,
}

/// A piece of rendered text, possibly wrapped in a search highlight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fragment {
    Text(String),
    Highlight(String),
}

impl Fragment {
    pub fn as_str(&self) -> &str {
        match self {
            Fragment::Text(s) | Fragment::Highlight(s) => s,
        }
    }

    pub fn is_highlight(&self) -> bool {
        matches!(self, Fragment::Highlight(_))
    }
}

/// A searchable node: its category and current markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    pub kind: ContentKind,
    pub markup: Vec<Fragment>,
}

impl ContentNode {
    /// Create a node holding plain, unhighlighted text
    pub fn new(kind: ContentKind, text: impl Into<String>) -> Self {
        Self { kind, markup: vec![Fragment::Text(text.into())] }
    }

    /// The node's text with all markup removed
    pub fn text(&self) -> String {
        self.markup.iter().map(Fragment::as_str).collect()
    }

    /// Number of highlight fragments currently applied
    pub fn highlight_count(&self) -> usize {
        self.markup.iter().filter(|f| f.is_highlight()).count()
    }
}
