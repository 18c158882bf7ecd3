//! Chapter/section navigation
//!
//! [`Navigator`] owns the active selection of the sidebar tree. Chapters own
//! their sections; every section keeps the index of its chapter, so
//! activating a section can mark its chapter without walking the tree.
//!
//! After every operation at most one chapter and at most one section are
//! active, and an active section's chapter is active too.

use crate::document::{Document, LinkMarks};

/// Direction of chapter traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// A reference to a link in the sidebar tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkRef {
    Chapter(usize),
    Section { chapter: usize, section: usize },
}

impl LinkRef {
    /// Index of the chapter this link belongs to
    pub fn chapter(self) -> usize {
        match self {
            LinkRef::Chapter(chapter) | LinkRef::Section { chapter, .. } => chapter,
        }
    }
}

/// Where a scrolled-to target should land in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
}

/// What to scroll to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    /// A heading anchor id
    Anchor(String),
    /// A content block by its index in the document
    Block(usize),
}

/// A request for the view to bring a target into sight with smoothed motion.
///
/// Scrolling is fire-and-forget; a target the view cannot resolve is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: ScrollTarget,
    pub block: ScrollBlock,
}

impl ScrollRequest {
    pub fn anchor(id: impl Into<String>) -> Self {
        Self { target: ScrollTarget::Anchor(id.into()), block: ScrollBlock::Start }
    }

    pub fn centered_block(index: usize) -> Self {
        Self { target: ScrollTarget::Block(index), block: ScrollBlock::Center }
    }
}

/// Disabled state of the prev/next chapter controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavButtons {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// A chapter in the sidebar tree
#[derive(Debug, Clone)]
pub struct ChapterNode {
    pub id: String,
    pub label: String,
    pub index: usize,
    pub sections: Vec<SectionNode>,
    pub marks: LinkMarks,
    active: bool,
    expanded: bool,
}

impl ChapterNode {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the chapter's sections are shown
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// A section in the sidebar tree
#[derive(Debug, Clone)]
pub struct SectionNode {
    pub id: String,
    pub label: String,
    /// Index of the owning chapter
    pub chapter: usize,
    pub marks: LinkMarks,
    active: bool,
}

impl SectionNode {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// The navigation state machine
#[derive(Debug, Clone)]
pub struct Navigator {
    chapters: Vec<ChapterNode>,
    current: usize,
    active_link: Option<LinkRef>,
}

impl Navigator {
    /// Build the tree from a document and select the initial chapter.
    ///
    /// The last chapter marked active in the document wins, defaulting to the
    /// first. A fragment naming a chapter or section overrides that.
    pub fn from_document(doc: &Document, fragment: Option<&str>) -> Self {
        let chapters = doc
            .chapters
            .iter()
            .enumerate()
            .map(|(index, entry)| ChapterNode {
                id: entry.id.clone(),
                label: entry.label.clone(),
                index,
                sections: entry
                    .sections
                    .iter()
                    .map(|s| SectionNode {
                        id: s.id.clone(),
                        label: s.label.clone(),
                        chapter: index,
                        marks: LinkMarks::default(),
                        active: false,
                    })
                    .collect(),
                marks: LinkMarks::default(),
                active: false,
                expanded: false,
            })
            .collect();

        let mut nav = Self { chapters, current: 0, active_link: None };

        if !nav.chapters.is_empty() {
            let initial = doc.chapters.iter().rposition(|c| c.marked_active).unwrap_or(0);
            nav.activate_link(LinkRef::Chapter(initial));
        }

        if let Some(fragment) = fragment {
            if nav.activate_fragment(fragment).is_none() {
                tracing::debug!("Fragment {:?} matches no navigable link", fragment);
            }
        }

        nav
    }

    pub fn chapters(&self) -> &[ChapterNode] {
        &self.chapters
    }

    /// Index of the current chapter
    pub fn current_chapter(&self) -> usize {
        self.current
    }

    pub fn active_link(&self) -> Option<LinkRef> {
        self.active_link
    }

    /// Label of the current chapter, for the title region
    pub fn title(&self) -> Option<&str> {
        self.chapters.get(self.current).map(|c| c.label.as_str())
    }

    pub fn nav_buttons(&self) -> NavButtons {
        NavButtons {
            prev_disabled: self.current == 0,
            next_disabled: self.current + 1 >= self.chapters.len(),
        }
    }

    /// Move to the neighbouring chapter. No-op at either end.
    pub fn go_to_chapter(&mut self, direction: Direction) -> Option<ScrollRequest> {
        let target = match direction {
            Direction::Next if self.current + 1 < self.chapters.len() => self.current + 1,
            Direction::Prev if self.current > 0 => self.current - 1,
            _ => return None,
        };

        self.clear_active();
        self.current = target;
        self.mark_active(LinkRef::Chapter(target));

        tracing::debug!("Moved {:?} to chapter {} ({})", direction, target, self.chapters[target].id);
        Some(ScrollRequest::anchor(self.chapters[target].id.clone()))
    }

    /// Make `link` the single active link and scroll to its target
    pub fn activate_link(&mut self, link: LinkRef) -> Option<ScrollRequest> {
        let Some(id) = self.link_id(link).map(str::to_string) else {
            tracing::debug!("Ignoring activation of unknown link {:?}", link);
            return None;
        };

        self.clear_active();
        self.current = link.chapter();
        self.mark_active(link);

        Some(ScrollRequest::anchor(id))
    }

    /// Handle a click on a chapter link.
    ///
    /// Clicking the active chapter only shows or hides its sections;
    /// clicking any other chapter activates it.
    pub fn toggle_chapter_disclosure(&mut self, chapter: usize) -> Option<ScrollRequest> {
        let node = self.chapters.get_mut(chapter)?;
        if !node.active {
            return self.activate_link(LinkRef::Chapter(chapter));
        }

        node.expanded = !node.expanded;
        Some(ScrollRequest::anchor(node.id.clone()))
    }

    /// Scroll to a topic without touching the active selection
    pub fn follow_topic_link(&self, target: &str) -> ScrollRequest {
        ScrollRequest::anchor(target.trim_start_matches('#'))
    }

    /// Activate the link whose target matches a URL fragment
    pub fn activate_fragment(&mut self, fragment: &str) -> Option<ScrollRequest> {
        let link = self.find_link(fragment.trim_start_matches('#'))?;
        self.activate_link(link)
    }

    /// Find the chapter or section link targeting `id`
    pub fn find_link(&self, id: &str) -> Option<LinkRef> {
        for chapter in &self.chapters {
            if chapter.id == id {
                return Some(LinkRef::Chapter(chapter.index));
            }
            if let Some(section) = chapter.sections.iter().position(|s| s.id == id) {
                return Some(LinkRef::Section { chapter: chapter.index, section });
            }
        }
        None
    }

    /// Links currently shown in the sidebar, top to bottom
    pub fn visible_links(&self) -> Vec<LinkRef> {
        let mut links = Vec::new();
        for chapter in &self.chapters {
            links.push(LinkRef::Chapter(chapter.index));
            if chapter.expanded {
                links.extend(
                    (0..chapter.sections.len())
                        .map(|section| LinkRef::Section { chapter: chapter.index, section }),
                );
            }
        }
        links
    }

    /// Every chapter and section link with its target id and read marks
    pub fn links_mut(&mut self) -> impl Iterator<Item = (&str, &mut LinkMarks)> {
        self.chapters.iter_mut().flat_map(|chapter| {
            std::iter::once((chapter.id.as_str(), &mut chapter.marks)).chain(
                chapter.sections.iter_mut().map(|s| (s.id.as_str(), &mut s.marks)),
            )
        })
    }

    /// Check the single-active-item rules over the whole tree
    pub fn invariants_hold(&self) -> bool {
        let active_chapters = self.chapters.iter().filter(|c| c.active).count();
        let active_sections: Vec<&SectionNode> =
            self.chapters.iter().flat_map(|c| c.sections.iter()).filter(|s| s.active).collect();

        active_chapters <= 1
            && active_sections.len() <= 1
            && active_sections.iter().all(|s| self.chapters[s.chapter].active)
    }

    fn link_id(&self, link: LinkRef) -> Option<&str> {
        match link {
            LinkRef::Chapter(chapter) => self.chapters.get(chapter).map(|c| c.id.as_str()),
            LinkRef::Section { chapter, section } => self
                .chapters
                .get(chapter)
                .and_then(|c| c.sections.get(section))
                .map(|s| s.id.as_str()),
        }
    }

    fn clear_active(&mut self) {
        for chapter in &mut self.chapters {
            chapter.active = false;
            chapter.expanded = false;
            for section in &mut chapter.sections {
                section.active = false;
            }
        }
        self.active_link = None;
    }

    fn mark_active(&mut self, link: LinkRef) {
        let chapter = &mut self.chapters[link.chapter()];
        chapter.active = true;
        chapter.expanded = true;
        if let LinkRef::Section { section, .. } = link {
            chapter.sections[section].active = true;
        }
        self.active_link = Some(link);
        debug_assert!(self.invariants_hold());
    }
}
