//! Application state definitions

use std::collections::{HashMap, VecDeque};

use crate::config::Config;
use crate::document::Document;
use crate::nav::{LinkRef, Navigator, ScrollBlock, ScrollRequest, ScrollTarget};
use crate::progress::{ProgressTracker, TopicExtent, VisibilityWatch, apply_read_status};
use crate::search::SearchEngine;
use crate::storage::KeyValueStore;
use crate::theme::ThemeController;

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    Sidebar,
    #[default]
    Content,
}

/// State for the chapter/section sidebar
#[derive(Debug, Clone, Default)]
pub struct SidebarState {
    /// Whether the sidebar is shown
    pub open: bool,
    /// Index of the cursor among the visible links
    pub cursor: usize,
    /// Scroll offset for long outlines
    pub scroll_offset: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl SidebarState {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Ensure the cursor row is visible by adjusting scroll offset
    pub fn ensure_cursor_visible(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        }
        let rows = self.visible_height;
        if rows > 0 && self.cursor >= self.scroll_offset + rows {
            self.scroll_offset = self.cursor + 1 - rows;
        }
    }
}

/// Rendered positions of everything a scroll can target
#[derive(Debug, Clone, Default)]
pub struct ContentLayout {
    /// First line of each anchored heading
    pub anchors: HashMap<String, usize>,
    /// First line of each rendered block, by block index
    pub blocks: HashMap<usize, usize>,
    /// Line range of every topic
    pub topics: Vec<TopicExtent>,
    /// Total rendered lines
    pub total_lines: usize,
}

/// State for the content pane
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    /// Current scroll position (lines from top)
    pub scroll_offset: usize,
    /// Where a smooth scroll is heading, if one is in flight
    pub scroll_target: Option<usize>,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
    /// Positions from the last render
    pub layout: ContentLayout,
    /// Scroll requested before the next layout is known
    pub pending_scroll: Option<ScrollRequest>,
}

impl ContentState {
    /// Get the maximum allowed scroll offset
    pub fn max_scroll(&self) -> usize {
        self.layout.total_lines.saturating_sub(self.visible_height / 2)
    }

    /// Clamp scroll offset to valid range
    pub fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }

    /// Queue a smooth scroll; it is resolved against the next layout
    pub fn request_scroll(&mut self, request: ScrollRequest) {
        self.pending_scroll = Some(request);
    }

    /// Scroll by whole lines, cancelling any animation
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_target = None;
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp_scroll();
    }

    /// Turn the pending request into a scroll target.
    ///
    /// Targets missing from the layout are dropped without scrolling.
    pub fn resolve_pending_scroll(&mut self) {
        let Some(request) = self.pending_scroll.take() else { return };

        let line = match &request.target {
            ScrollTarget::Anchor(id) => self.layout.anchors.get(id).copied(),
            ScrollTarget::Block(index) => self.layout.blocks.get(index).copied(),
        };

        let Some(line) = line else {
            tracing::debug!("Scroll target {:?} not found, skipping", request.target);
            return;
        };

        let target = match request.block {
            ScrollBlock::Start => line,
            ScrollBlock::Center => line.saturating_sub(self.visible_height / 2),
        };
        let target = target.min(self.max_scroll());
        self.scroll_target = (target != self.scroll_offset).then_some(target);
    }

    /// Advance an in-flight smooth scroll by one frame
    pub fn tick(&mut self, config: &Config) {
        let Some(target) = self.scroll_target else { return };

        let distance = target.abs_diff(self.scroll_offset);
        if distance > 0 {
            let step = config.scroll_step(distance).min(distance);
            if target > self.scroll_offset {
                self.scroll_offset += step;
            } else {
                self.scroll_offset -= step;
            }
        }

        if self.scroll_offset == target {
            self.scroll_target = None;
        }
    }
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Normal mode - command line hidden or showing status
    #[default]
    Normal,
    /// Command mode - accepting : commands
    Command,
    /// Search mode - accepting / search queries
    Search,
}

/// Previously submitted lines, oldest first
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<String>,
    /// Entry being recalled, if any
    position: Option<usize>,
}

impl History {
    const CAPACITY: usize = 1000;

    /// Record a submitted line, skipping blanks and immediate repeats
    pub fn push(&mut self, line: String) {
        self.position = None;
        if line.is_empty() || self.entries.back() == Some(&line) {
            return;
        }
        if self.entries.len() == Self::CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(line);
    }

    /// Step to an older entry, stopping at the oldest
    fn older(&mut self) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;
        let position = self.position.map_or(last, |p| p.saturating_sub(1));
        self.position = Some(position);
        self.entries.get(position).map(String::as_str)
    }

    /// Step to a newer entry; `None` once past the newest
    fn newer(&mut self) -> Option<&str> {
        let next = self.position? + 1;
        self.position = (next < self.entries.len()).then_some(next);
        self.position.and_then(|p| self.entries.get(p)).map(String::as_str)
    }

    fn is_recalling(&self) -> bool {
        self.position.is_some()
    }

    fn reset(&mut self) {
        self.position = None;
    }
}

/// The `:` / `/` input row and its status message
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    pub mode: CommandMode,
    pub input: String,
    /// Cursor position in characters, not bytes
    pub cursor: usize,
    /// Shown while not typing
    pub message: Option<String>,
    pub is_error: bool,
    pub history: History,
}

impl CommandLineState {
    pub fn enter_command_mode(&mut self) {
        self.enter_mode(CommandMode::Command);
    }

    pub fn enter_search_mode(&mut self) {
        self.enter_mode(CommandMode::Search);
    }

    fn enter_mode(&mut self, mode: CommandMode) {
        self.mode = mode;
        self.message = None;
        self.history.reset();
        self.set_input(String::new());
    }

    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.set_input(String::new());
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    /// Replace the input and put the cursor at its end
    fn set_input(&mut self, input: String) {
        self.cursor = input.chars().count();
        self.input = input;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input.char_indices().nth(chars).map_or(self.input.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if let Some(cursor) = self.cursor.checked_sub(1) {
            let at = self.byte_offset(cursor);
            self.input.remove(at);
            self.cursor = cursor;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn is_input_mode(&self) -> bool {
        self.mode != CommandMode::Normal
    }

    pub fn add_to_history(&mut self, line: String) {
        self.history.push(line);
    }

    pub fn history_up(&mut self) {
        if let Some(line) = self.history.older().map(str::to_string) {
            self.set_input(line);
        }
    }

    pub fn history_down(&mut self) {
        if !self.history.is_recalling() {
            return;
        }
        let line = self.history.newer().map(str::to_string).unwrap_or_default();
        self.set_input(line);
    }
}

/// A blocking popup that swallows the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into() }
    }
}

/// Full application state
#[derive(Debug)]
pub struct AppState {
    /// The loaded document (content nodes carry search highlights)
    pub document: Document,

    /// Active chapter/section selection
    pub nav: Navigator,

    /// Last search and its matches
    pub search: SearchEngine,

    /// Read topics
    pub progress: ProgressTracker,

    /// Topics currently on screen
    pub visibility: VisibilityWatch,

    /// Light/dark mode
    pub theme: ThemeController,

    /// Sidebar state
    pub sidebar: SidebarState,

    /// Content pane state
    pub content: ContentState,

    /// Currently focused panel
    pub focused_panel: Panel,

    /// Command line state
    pub command_line: CommandLineState,

    /// Popup awaiting dismissal
    pub notification: Option<Notification>,

    /// Terminal width at the last render
    pub screen_width: u16,
}

impl AppState {
    /// Run load-time initialization against the persisted store.
    ///
    /// Restores the theme and read marks, and selects the initial chapter,
    /// letting `fragment` override the document's own choice.
    pub fn new(
        mut document: Document,
        store: &dyn KeyValueStore,
        config: &Config,
        fragment: Option<&str>,
    ) -> Self {
        let theme = ThemeController::load(store);
        let progress = ProgressTracker::load(store);
        let mut nav = Navigator::from_document(&document, None);

        let mut content = ContentState::default();
        if let Some(fragment) = fragment {
            match nav.activate_fragment(fragment) {
                Some(request) => content.request_scroll(request),
                None => tracing::debug!("Fragment {:?} matches no navigable link", fragment),
            }
        }

        apply_read_status(progress.read_set(), nav.links_mut());
        apply_read_status(progress.read_set(), document.topic_link_marks_mut());

        let mut state = Self {
            document,
            nav,
            search: SearchEngine::new(),
            progress,
            visibility: VisibilityWatch::new(),
            theme,
            sidebar: SidebarState { open: config.sidebar_open, ..Default::default() },
            content,
            focused_panel: Panel::default(),
            command_line: CommandLineState::default(),
            notification: None,
            screen_width: 0,
        };
        state.sync_sidebar_cursor();
        state
    }

    /// Put the sidebar cursor on the active link
    pub fn sync_sidebar_cursor(&mut self) {
        let links = self.nav.visible_links();
        if let Some(active) = self.nav.active_link() {
            if let Some(pos) = links.iter().position(|l| *l == active) {
                self.sidebar.cursor = pos;
            }
        }
        self.sidebar.cursor = self.sidebar.cursor.min(links.len().saturating_sub(1));
        self.sidebar.ensure_cursor_visible();
    }

    /// Link under the sidebar cursor
    pub fn link_under_cursor(&self) -> Option<LinkRef> {
        self.nav.visible_links().get(self.sidebar.cursor).copied()
    }

    /// Whether the sidebar overlays the content at the current width
    pub fn sidebar_is_overlay(&self, config: &Config) -> bool {
        self.screen_width < config.sidebar_breakpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;
    use crate::progress::READ_TOPICS_KEY;
    use crate::storage::MemoryStore;

    const DOC: &str = "# One\n\n### Alpha {#t1}\n\ntext\n\n# Two\n\n## Deep {#two-deep}\n\nmore\n";

    fn content_with_layout() -> ContentState {
        let mut content = ContentState { visible_height: 10, ..Default::default() };
        content.layout.total_lines = 100;
        content.layout.anchors.insert("two".into(), 40);
        content.layout.blocks.insert(7, 60);
        content
    }

    #[test]
    fn new_restores_read_marks() {
        let mut store = MemoryStore::new();
        store.set(READ_TOPICS_KEY, r#"["t1","two"]"#).unwrap();

        let doc = parse_document("d", DOC).unwrap();
        let state = AppState::new(doc, &store, &Config::default(), None);

        assert!(state.document.chapters[0].topic_links[0].marks.read);
        assert!(state.nav.chapters()[1].marks.read);
        assert!(!state.nav.chapters()[0].marks.read);
    }

    #[test]
    fn fragment_selects_link_and_queues_scroll() {
        let doc = parse_document("d", DOC).unwrap();
        let state = AppState::new(doc, &MemoryStore::new(), &Config::default(), Some("#two-deep"));

        assert_eq!(state.nav.active_link(), Some(LinkRef::Section { chapter: 1, section: 0 }));
        assert_eq!(state.content.pending_scroll, Some(ScrollRequest::anchor("two-deep")));
        assert_eq!(state.link_under_cursor(), state.nav.active_link());
    }

    #[test]
    fn resolve_anchor_scroll_targets_line() {
        let mut content = content_with_layout();
        content.request_scroll(ScrollRequest::anchor("two"));
        content.resolve_pending_scroll();
        assert_eq!(content.scroll_target, Some(40));
        assert!(content.pending_scroll.is_none());
    }

    #[test]
    fn resolve_centered_block_scroll() {
        let mut content = content_with_layout();
        content.request_scroll(ScrollRequest::centered_block(7));
        content.resolve_pending_scroll();
        assert_eq!(content.scroll_target, Some(55));
    }

    #[test]
    fn missing_target_skips_scroll() {
        let mut content = content_with_layout();
        content.scroll_offset = 3;
        content.request_scroll(ScrollRequest::anchor("nowhere"));
        content.resolve_pending_scroll();

        assert_eq!(content.scroll_target, None);
        assert_eq!(content.scroll_offset, 3);
    }

    #[test]
    fn tick_settles_on_target() {
        let mut content = content_with_layout();
        content.scroll_target = Some(40);
        let config = Config::default();

        let mut frames = 0;
        while content.scroll_target.is_some() {
            content.tick(&config);
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(content.scroll_offset, 40);
        assert!(frames > 1);
    }

    #[test]
    fn tick_at_target_top_stops_without_moving() {
        let mut content = content_with_layout();
        content.scroll_target = Some(0);
        content.tick(&Config::default());
        assert_eq!(content.scroll_offset, 0);
        assert_eq!(content.scroll_target, None);
    }

    #[test]
    fn tick_at_target_mid_document_stops_without_moving() {
        let mut content = content_with_layout();
        content.scroll_offset = 40;
        content.scroll_target = Some(40);
        content.tick(&Config::default());
        assert_eq!(content.scroll_offset, 40);
        assert_eq!(content.scroll_target, None);
    }

    #[test]
    fn resolving_to_current_offset_starts_no_animation() {
        let mut content = content_with_layout();
        content.layout.blocks.insert(0, 2);
        content.request_scroll(ScrollRequest::centered_block(0));
        content.resolve_pending_scroll();
        assert_eq!(content.scroll_target, None);
        assert_eq!(content.scroll_offset, 0);
    }

    #[test]
    fn instant_animation_settles_in_one_tick() {
        let mut content = content_with_layout();
        content.scroll_offset = 50;
        content.scroll_target = Some(10);
        content.tick(&Config { animation_speed: 0.0, ..Default::default() });
        assert_eq!(content.scroll_offset, 10);
        assert_eq!(content.scroll_target, None);
    }

    #[test]
    fn scroll_by_cancels_animation() {
        let mut content = content_with_layout();
        content.scroll_target = Some(40);
        content.scroll_by(-5);
        assert_eq!(content.scroll_offset, 0);
        assert_eq!(content.scroll_target, None);
    }

    #[test]
    fn command_line_history() {
        let mut cl = CommandLineState::default();
        cl.add_to_history("goto a".into());
        cl.add_to_history("goto a".into());
        cl.add_to_history("theme".into());
        assert_eq!(cl.history.entries.len(), 2);

        cl.enter_command_mode();
        cl.history_up();
        assert_eq!(cl.input, "theme");
        cl.history_up();
        assert_eq!(cl.input, "goto a");
        cl.history_down();
        assert_eq!(cl.input, "theme");
        cl.history_down();
        assert!(cl.input.is_empty());
    }

    #[test]
    fn history_up_stops_at_oldest() {
        let mut cl = CommandLineState::default();
        cl.add_to_history("next".into());
        cl.add_to_history(String::new());
        assert_eq!(cl.history.entries.len(), 1);

        cl.enter_command_mode();
        cl.history_up();
        cl.history_up();
        assert_eq!(cl.input, "next");
        assert_eq!(cl.cursor, 4);
    }

    #[test]
    fn history_down_without_recall_keeps_input() {
        let mut cl = CommandLineState::default();
        cl.add_to_history("next".into());
        cl.enter_command_mode();
        cl.insert_char('q');
        cl.history_down();
        assert_eq!(cl.input, "q");
    }

    #[test]
    fn command_line_editing_handles_multibyte() {
        let mut cl = CommandLineState::default();
        cl.enter_search_mode();
        for c in "héllo".chars() {
            cl.insert_char(c);
        }
        cl.move_left();
        cl.delete_char();
        assert_eq!(cl.input, "hélo");
        assert_eq!(cl.cursor, 3);
    }

    #[test]
    fn sidebar_cursor_scrolls_into_view() {
        let mut sidebar = SidebarState { visible_height: 6, cursor: 10, ..Default::default() };
        sidebar.ensure_cursor_visible();
        // Cursor lands on the last of the six rows
        assert_eq!(sidebar.scroll_offset, 5);

        sidebar.cursor = 5;
        sidebar.ensure_cursor_visible();
        assert_eq!(sidebar.scroll_offset, 5);

        sidebar.cursor = 2;
        sidebar.ensure_cursor_visible();
        assert_eq!(sidebar.scroll_offset, 2);
    }
}
