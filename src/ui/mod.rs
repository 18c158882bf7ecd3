//! UI rendering components

pub mod command_line;
pub mod content;
pub mod header;
pub mod layout;
pub mod sidebar;

use ratatui::{Frame, style::Style, widgets::Block};

use crate::app::state::{AppState, Panel};
use crate::config::Config;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, config: &Config) {
    let theme = state.theme.palette().clone();
    let area = frame.area();
    state.screen_width = area.width;

    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let overlay = state.sidebar_is_overlay(config);
    let areas = layout::split_screen(area, state.sidebar.open, overlay);

    header::draw(
        frame,
        areas.header,
        state.nav.title().unwrap_or(state.document.title.as_str()),
        state.nav.nav_buttons(),
        &state.theme,
        &theme,
    );

    // Content first so an overlaid sidebar lands on top of it
    let content_focused = state.focused_panel == Panel::Content || areas.sidebar.is_none();
    content::draw(frame, areas.content, state, &theme, content_focused);

    if let Some(sidebar_area) = areas.sidebar {
        let focused = state.focused_panel == Panel::Sidebar;
        sidebar::draw(frame, sidebar_area, state, &theme, focused, overlay);
    }

    let status = reading_status(state);
    command_line::draw(frame, areas.command_line, &state.command_line, &status, &theme);

    if let Some(notification) = &state.notification {
        layout::draw_notification(frame, notification, &theme);
    }
}

/// "read/total" summary for the status row
fn reading_status(state: &AppState) -> String {
    let total = state.document.topics.len();
    if total == 0 {
        return String::new();
    }
    // Stored ids can outlive the topics of an edited document
    let read = state
        .progress
        .read_set()
        .iter()
        .filter(|id| state.document.find_topic(id).is_some())
        .count();
    format!(" {}/{} read ", read, total)
}
