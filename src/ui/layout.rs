//! Screen layout and popups

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::state::Notification;
use crate::theme::Theme;

/// Minimum width for the docked sidebar
const SIDEBAR_MIN_WIDTH: u16 = 24;

/// Maximum width of the overlaid sidebar
const OVERLAY_MAX_WIDTH: u16 = 40;

/// Areas of the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    /// Sidebar area, when it is open
    pub sidebar: Option<Rect>,
    pub content: Rect,
    pub command_line: Rect,
}

/// Split the screen into header, sidebar, content and command line.
///
/// A docked sidebar takes a column of its own; an overlaid one covers the
/// left part of the content area.
pub fn split_screen(area: Rect, sidebar_open: bool, overlay: bool) -> ScreenAreas {
    let [header, main, command_line] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
            .areas(area);

    if !sidebar_open {
        return ScreenAreas { header, sidebar: None, content: main, command_line };
    }

    if overlay {
        let width = (main.width * 4 / 5).min(OVERLAY_MAX_WIDTH);
        let sidebar = Rect { width, ..main };
        return ScreenAreas { header, sidebar: Some(sidebar), content: main, command_line };
    }

    let sidebar_width = (main.width / 5).max(SIDEBAR_MIN_WIDTH);
    let [sidebar, content] =
        Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(30)]).areas(main);

    ScreenAreas { header, sidebar: Some(sidebar), content, command_line }
}

/// Draw a blocking notification in the middle of the screen
pub fn draw_notification(frame: &mut Frame, notification: &Notification, theme: &Theme) {
    let area = popup_rect(frame.area(), &notification.message);

    let block = Block::default()
        .title(format!(" {} ", notification.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.warning))
        .style(Style::default().bg(theme.bg_secondary));

    let body = Paragraph::new(notification.message.as_str())
        .style(Style::default().fg(theme.fg_primary))
        .wrap(Wrap { trim: false })
        .block(block);

    frame.render_widget(Clear, area);
    frame.render_widget(body, area);

    let hint = Span::styled(
        " press any key ",
        Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
    );
    let hint_area = Rect {
        x: area.x + 2,
        y: area.y + area.height.saturating_sub(1),
        width: area.width.saturating_sub(4).min(hint.width() as u16),
        height: 1,
    };
    frame.render_widget(Paragraph::new(hint), hint_area);
}

/// Size a popup around `message`, centered and clamped to `area`
fn popup_rect(area: Rect, message: &str) -> Rect {
    let longest = message.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let width = (longest + 4).max(30).min(area.width);
    let height = (message.lines().count() as u16 + 2).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(row);
    popup
}
