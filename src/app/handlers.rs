//! Key and command handling
//!
//! Every user gesture funnels through [`AppState::dispatch`] (normal mode)
//! or [`AppState::handle_input_key`] (command/search input). Handlers that
//! persist something take the store as an argument.

use crossterm::event::{KeyCode, KeyEvent};

use super::command::{Command, ParseResult, parse_command, parse_search};
use super::input::{Action, key_with_modifier_to_action};
use super::state::{AppState, CommandMode, Notification, Panel};
use crate::config::Config;
use crate::nav::{Direction, LinkRef, ScrollRequest};
use crate::progress::apply_read_status;
use crate::search::SearchOutcome;
use crate::storage::KeyValueStore;

/// Summary shown by `?` and `:help`
const HELP_TEXT: &str = "\
j/k  scroll or move        g/G  top/bottom
H/L  prev/next chapter     Enter  open link
h/l  focus sidebar/content Tab  switch panel
/    search                n/N  next/prev match
t    toggle theme          [    toggle sidebar
:goto <id>  jump to a chapter, section or topic
:nohl  clear highlights    :q  quit";

impl AppState {
    /// Handle a key press. Returns true if the app should exit.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        config: &Config,
        store: &mut dyn KeyValueStore,
    ) -> bool {
        if self.notification.take().is_some() {
            return false;
        }

        if self.command_line.is_input_mode() {
            return self.handle_input_key(key.code, store);
        }

        match key_with_modifier_to_action(key.code, key.modifiers, config.vim_mode) {
            Some(action) => self.dispatch(action, config, store),
            None => false,
        }
    }

    /// Handle a key while the command line is accepting input
    pub fn handle_input_key(&mut self, key: KeyCode, store: &mut dyn KeyValueStore) -> bool {
        match key {
            KeyCode::Esc => self.command_line.exit_input_mode(),
            KeyCode::Enter => return self.submit_command_line(store),
            KeyCode::Backspace if self.command_line.input.is_empty() => {
                self.command_line.exit_input_mode();
            }
            KeyCode::Backspace => self.command_line.delete_char(),
            KeyCode::Left => self.command_line.move_left(),
            KeyCode::Right => self.command_line.move_right(),
            KeyCode::Up => self.command_line.history_up(),
            KeyCode::Down => self.command_line.history_down(),
            KeyCode::Char(c) => self.command_line.insert_char(c),
            _ => {}
        }
        false
    }

    fn submit_command_line(&mut self, store: &mut dyn KeyValueStore) -> bool {
        let input = self.command_line.input.clone();
        let mode = self.command_line.mode;
        self.command_line.add_to_history(input.clone());
        self.command_line.exit_input_mode();

        let command = match mode {
            CommandMode::Search => parse_search(&input),
            CommandMode::Command => match parse_command(&input) {
                ParseResult::Ok(command) => command,
                ParseResult::UnknownCommand(cmd) => {
                    self.command_line.set_error(format!("Unknown command: {}", cmd));
                    return false;
                }
                ParseResult::MissingArgument(cmd) => {
                    self.command_line.set_error(format!("{} requires an argument", cmd));
                    return false;
                }
            },
            CommandMode::Normal => return false,
        };

        self.run_command(command, store)
    }

    /// Execute a parsed command. Returns true if the app should exit.
    pub fn run_command(&mut self, command: Command, store: &mut dyn KeyValueStore) -> bool {
        match command {
            Command::Quit => return true,
            Command::Help => self.show_help(),
            Command::Search(term) => self.submit_search(&term),
            Command::Goto(id) => self.goto(&id),
            Command::NextChapter => self.go_to_chapter(Direction::Next),
            Command::PrevChapter => self.go_to_chapter(Direction::Prev),
            Command::ToggleTheme => self.toggle_theme(store),
            Command::ToggleSidebar => self.toggle_sidebar(),
            Command::ClearSearch => self.clear_search(),
            Command::Nop => self.command_line.message = None,
        }
        false
    }

    /// Perform a normal-mode action. Returns true if the app should exit.
    pub fn dispatch(&mut self, action: Action, config: &Config, store: &mut dyn KeyValueStore) -> bool {
        let page = self.content.visible_height.max(1);

        match action {
            Action::Quit => return true,

            Action::Up => self.move_by(-1),
            Action::Down => self.move_by(1),
            Action::HalfPageUp => self.move_by(-((page / 2).max(1) as isize)),
            Action::HalfPageDown => self.move_by((page / 2).max(1) as isize),
            Action::PageUp => self.content.scroll_by(-(page as isize)),
            Action::PageDown => self.content.scroll_by(page as isize),
            Action::Top => match self.focused_panel {
                Panel::Sidebar => {
                    self.sidebar.cursor = 0;
                    self.sidebar.ensure_cursor_visible();
                }
                Panel::Content => self.content.scroll_by(isize::MIN),
            },
            Action::Bottom => match self.focused_panel {
                Panel::Sidebar => {
                    self.sidebar.cursor = self.nav.visible_links().len().saturating_sub(1);
                    self.sidebar.ensure_cursor_visible();
                }
                Panel::Content => self.content.scroll_by(isize::MAX),
            },

            Action::Select => {
                if self.focused_panel == Panel::Sidebar {
                    self.select_link_under_cursor(config);
                }
            }
            Action::Back => {
                if self.search.term().is_some() {
                    self.clear_search();
                } else if self.sidebar.open && self.sidebar_is_overlay(config) {
                    self.sidebar.open = false;
                    self.focused_panel = Panel::Content;
                }
            }

            Action::NextChapter => self.go_to_chapter(Direction::Next),
            Action::PrevChapter => self.go_to_chapter(Direction::Prev),

            Action::Search => self.command_line.enter_search_mode(),
            Action::NextMatch => self.cycle_match(true),
            Action::PrevMatch => self.cycle_match(false),

            Action::ToggleSidebar => self.toggle_sidebar(),
            Action::FocusSidebar => {
                if self.sidebar.open {
                    self.focused_panel = Panel::Sidebar;
                }
            }
            Action::FocusContent => self.focus_content(config),
            Action::SwitchPanel => match self.focused_panel {
                Panel::Sidebar => self.focus_content(config),
                Panel::Content if self.sidebar.open => self.focused_panel = Panel::Sidebar,
                Panel::Content => {}
            },

            Action::ToggleTheme => self.toggle_theme(store),
            Action::Command => self.command_line.enter_command_mode(),
            Action::Help => self.show_help(),
        }
        false
    }

    /// Record topics that crossed the visibility threshold since the last
    /// frame and mark their links as read
    pub fn observe_viewport(&mut self, store: &mut dyn KeyValueStore) {
        let entries = self.visibility.update(
            &self.content.layout.topics,
            self.content.scroll_offset,
            self.content.visible_height,
        );
        if entries.is_empty() {
            return;
        }

        let newly_read = self.progress.observe(store, &entries);
        if !newly_read.is_empty() {
            apply_read_status(self.progress.read_set(), self.nav.links_mut());
            apply_read_status(self.progress.read_set(), self.document.topic_link_marks_mut());
        }
    }

    fn move_by(&mut self, delta: isize) {
        match self.focused_panel {
            Panel::Sidebar => {
                let count = self.nav.visible_links().len();
                if count == 0 {
                    return;
                }
                let cursor = self.sidebar.cursor.saturating_add_signed(delta);
                self.sidebar.cursor = cursor.min(count - 1);
                self.sidebar.ensure_cursor_visible();
            }
            Panel::Content => self.content.scroll_by(delta),
        }
    }

    fn scroll_to(&mut self, request: Option<ScrollRequest>) {
        if let Some(request) = request {
            self.content.request_scroll(request);
        }
    }

    fn select_link_under_cursor(&mut self, config: &Config) {
        let Some(link) = self.link_under_cursor() else { return };

        let request = match link {
            LinkRef::Chapter(chapter) => self.nav.toggle_chapter_disclosure(chapter),
            LinkRef::Section { .. } => self.nav.activate_link(link),
        };
        self.scroll_to(request);
        self.sync_sidebar_cursor();

        if self.sidebar_is_overlay(config) {
            self.sidebar.open = false;
            self.focused_panel = Panel::Content;
        }
    }

    fn go_to_chapter(&mut self, direction: Direction) {
        let request = self.nav.go_to_chapter(direction);
        if request.is_some() {
            self.sync_sidebar_cursor();
        }
        self.scroll_to(request);
    }

    /// Jump to a chapter or section (activating it) or to a topic
    fn goto(&mut self, id: &str) {
        let id = id.trim_start_matches('#');

        if let Some(link) = self.nav.find_link(id) {
            let request = self.nav.activate_link(link);
            self.scroll_to(request);
            self.sync_sidebar_cursor();
        } else if let Some(topic) = self.document.find_topic(id) {
            let chapter = topic.chapter.and_then(|i| self.document.chapters.get(i));
            let message = match chapter {
                Some(chapter) => format!("Topic: {} ({})", topic.title, chapter.label),
                None => format!("Topic: {}", topic.title),
            };
            self.content.request_scroll(self.nav.follow_topic_link(id));
            self.command_line.set_message(message);
        } else if self.document.has_anchor(id) {
            self.content.request_scroll(ScrollRequest::anchor(id));
        } else {
            self.command_line.set_error(format!("Nothing to go to at #{}", id));
        }
    }

    fn submit_search(&mut self, term: &str) {
        match self.search.search(&mut self.document, term) {
            SearchOutcome::Skipped => {}
            SearchOutcome::Found { total, scroll, .. } => {
                self.content.request_scroll(scroll);
                self.command_line.set_message(format!("Match 1 of {}", total));
            }
            SearchOutcome::NotFound { term } => {
                self.notification =
                    Some(Notification::new("Search", format!("No results found for: {}", term)));
            }
        }
    }

    fn cycle_match(&mut self, forward: bool) {
        let request = if forward { self.search.next_match() } else { self.search.prev_match() };
        match (request, self.search.current()) {
            (Some(request), Some(current)) => {
                self.content.request_scroll(request);
                self.command_line.set_message(format!(
                    "Match {} of {}",
                    current + 1,
                    self.search.matches().len()
                ));
            }
            _ => self.command_line.set_error("No active search"),
        }
    }

    fn clear_search(&mut self) {
        self.search.clear(&mut self.document);
        self.command_line.message = None;
    }

    fn toggle_theme(&mut self, store: &mut dyn KeyValueStore) {
        self.theme.toggle(store);
    }

    fn toggle_sidebar(&mut self) {
        self.sidebar.toggle();
        self.focused_panel = if self.sidebar.open { Panel::Sidebar } else { Panel::Content };
        if self.sidebar.open {
            self.sync_sidebar_cursor();
        }
    }

    /// Focus the content pane; an overlaid sidebar closes
    fn focus_content(&mut self, config: &Config) {
        self.focused_panel = Panel::Content;
        if self.sidebar_is_overlay(config) {
            self.sidebar.open = false;
        }
    }

    fn show_help(&mut self) {
        self.notification = Some(Notification::new("Help", HELP_TEXT));
    }
}
