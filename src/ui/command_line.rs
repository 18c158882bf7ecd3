//! Command line and status row

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{CommandLineState, CommandMode};
use crate::theme::Theme;

const IDLE_HINT: &str = "Press : for commands, / to search, ? for help";

/// Draw the command line at the bottom of the screen.
///
/// `status` is shown right-aligned while no input is being typed.
pub fn draw(frame: &mut Frame, area: Rect, state: &CommandLineState, status: &str, theme: &Theme) {
    let (text, style) = match state.mode {
        CommandMode::Normal => match &state.message {
            Some(msg) if state.is_error => (msg.clone(), Style::default().fg(theme.error)),
            Some(msg) => (msg.clone(), Style::default().fg(theme.fg_secondary)),
            None => (IDLE_HINT.to_string(), Style::default().fg(theme.fg_muted)),
        },
        CommandMode::Command => (format!(":{}", state.input), Style::default().fg(theme.accent_primary)),
        CommandMode::Search => (format!("/{}", state.input), Style::default().fg(theme.info)),
    };

    if state.is_input_mode() {
        // +1 for the mode prefix
        let line = build_line_with_cursor(&text, state.cursor + 1, style, theme);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let status_width = status.chars().count() as u16;
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);

    frame.render_widget(Paragraph::new(Span::styled(text, style)), left);
    frame.render_widget(
        Paragraph::new(Span::styled(status.to_string(), Style::default().fg(theme.read_mark))),
        right,
    );
}

/// Split `text` around the char at `cursor`, drawing that char inverted.
/// A cursor past the end shows as an inverted blank.
fn build_line_with_cursor(text: &str, cursor: usize, style: Style, theme: &Theme) -> Line<'static> {
    let split = |n: usize| text.char_indices().nth(n).map_or(text.len(), |(i, _)| i);
    let (head, rest) = text.split_at(split(cursor));
    let mut chars = rest.chars();
    let under = chars.next().unwrap_or(' ');
    let tail = chars.as_str();

    let cursor_style =
        Style::default().fg(theme.bg_primary).bg(theme.cursor).add_modifier(Modifier::BOLD);

    let mut spans = Vec::with_capacity(3);
    if !head.is_empty() {
        spans.push(Span::styled(head.to_string(), style));
    }
    spans.push(Span::styled(under.to_string(), cursor_style));
    if !tail.is_empty() {
        spans.push(Span::styled(tail.to_string(), style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_cursor_at_start() {
        let theme = Theme::default();
        let line = build_line_with_cursor("/term", 0, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2); // cursor + rest
    }

    #[test]
    fn build_cursor_at_end() {
        let theme = Theme::default();
        let line = build_line_with_cursor("/term", 5, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2); // before + cursor (space)
        assert_eq!(line.spans[1].content, " ");
    }

    #[test]
    fn cursor_handles_multibyte_input() {
        let theme = Theme::default();
        let line = build_line_with_cursor("/café", 4, Style::default(), &theme);
        assert_eq!(line.spans[0].content, "/caf");
        assert_eq!(line.spans[1].content, "é");
        assert_eq!(line.spans.len(), 2);
    }

    #[test]
    fn build_cursor_in_middle() {
        let theme = Theme::default();
        let line = build_line_with_cursor(":goto", 2, Style::default(), &theme);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "o");
        assert_eq!(line.spans[1].style.bg, Some(theme.cursor));
    }
}
