//! Chapter/section sidebar

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::state::AppState;
use crate::document::LinkMarks;
use crate::nav::{LinkRef, Navigator};
use crate::theme::Theme;

/// Draw the sidebar tree.
///
/// `overlay` clears the area first so the sidebar sits on top of the content.
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    theme: &Theme,
    focused: bool,
    overlay: bool,
) {
    let border_color = if focused { theme.border_focused } else { theme.border };

    let block = Block::default()
        .title(" Contents ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(if overlay { theme.bg_secondary } else { theme.bg_primary }));

    if overlay {
        frame.render_widget(Clear, area);
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    state.sidebar.visible_height = inner.height as usize;
    state.sidebar.ensure_cursor_visible();

    let cursor = if focused { Some(state.sidebar.cursor) } else { None };
    let lines = build_lines(&state.nav, cursor, theme);

    let visible_lines: Vec<Line> =
        lines.into_iter().skip(state.sidebar.scroll_offset).take(inner.height as usize).collect();

    frame.render_widget(Paragraph::new(visible_lines), inner);
}

/// One line per visible link; `cursor` is the selected row, if focused
pub fn build_lines(nav: &Navigator, cursor: Option<usize>, theme: &Theme) -> Vec<Line<'static>> {
    let selected_style =
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD);

    nav.visible_links()
        .into_iter()
        .enumerate()
        .map(|(row, link)| {
            let is_selected = cursor == Some(row);

            let (text, marks, style) = match link {
                LinkRef::Chapter(index) => {
                    let chapter = &nav.chapters()[index];
                    let icon = if chapter.is_expanded() { "▼" } else { "▶" };
                    let style = if chapter.is_active() {
                        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.fg_primary)
                    };
                    let style = read_link_style(style, &chapter.marks, chapter.is_active(), theme);
                    (format!("{} {}", icon, chapter.label), &chapter.marks, style)
                }
                LinkRef::Section { chapter, section } => {
                    let section = &nav.chapters()[chapter].sections[section];
                    let style = if section.is_active() {
                        Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.fg_secondary)
                    };
                    let style = read_link_style(style, &section.marks, section.is_active(), theme);
                    (format!("   {}", section.label), &section.marks, style)
                }
            };

            let mut spans = vec![Span::styled(text, if is_selected { selected_style } else { style })];
            spans.extend(read_indicator(marks, theme));
            Line::from(spans)
        })
        .collect()
}

/// Read links take the read color; an active link keeps its accent
pub fn read_link_style(style: Style, marks: &LinkMarks, active: bool, theme: &Theme) -> Style {
    match (marks.read, active) {
        (false, _) => style,
        (true, true) => style.add_modifier(Modifier::ITALIC),
        (true, false) => style.fg(theme.read_mark).add_modifier(Modifier::ITALIC),
    }
}

fn read_indicator(marks: &LinkMarks, theme: &Theme) -> Option<Span<'static>> {
    marks
        .indicator
        .as_ref()
        .map(|indicator| Span::styled(indicator.clone(), Style::default().fg(theme.read_mark)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::parse_document;
    use crate::nav::Direction;
    use crate::progress::{ReadSet, apply_read_status};

    const DOC: &str = "# Intro {#intro}\n\n## Setup {#setup}\n\n# Usage {#usage}\n\n## Flags {#flags}\n";

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn only_active_chapter_is_expanded() {
        let doc = parse_document("d", DOC).unwrap();
        let nav = Navigator::from_document(&doc, None);

        let texts: Vec<String> =
            build_lines(&nav, None, &Theme::default()).iter().map(text_of).collect();
        assert_eq!(texts, vec!["▼ Intro", "   Setup", "▶ Usage"]);
    }

    #[test]
    fn chapter_change_moves_disclosure() {
        let doc = parse_document("d", DOC).unwrap();
        let mut nav = Navigator::from_document(&doc, None);
        nav.go_to_chapter(Direction::Next);

        let texts: Vec<String> =
            build_lines(&nav, None, &Theme::default()).iter().map(text_of).collect();
        assert_eq!(texts, vec!["▶ Intro", "▼ Usage", "   Flags"]);
    }

    #[test]
    fn read_links_show_indicator() {
        let doc = parse_document("d", DOC).unwrap();
        let mut nav = Navigator::from_document(&doc, None);
        let mut read = ReadSet::default();
        read.insert("setup");
        apply_read_status(&read, nav.links_mut());

        let theme = Theme::default();
        let lines = build_lines(&nav, None, &theme);
        assert_eq!(text_of(&lines[1]), "   Setup ✓");
        assert_eq!(lines[1].spans[1].style.fg, Some(theme.read_mark));
    }

    #[test]
    fn read_links_are_styled_as_read() {
        let doc = parse_document("d", DOC).unwrap();
        let mut nav = Navigator::from_document(&doc, None);
        let mut read = ReadSet::default();
        read.insert("setup");
        read.insert("intro");
        read.insert("usage");
        apply_read_status(&read, nav.links_mut());

        let theme = Theme::default();
        let lines = build_lines(&nav, None, &theme);

        // Active chapter keeps its accent
        assert_eq!(lines[0].spans[0].style.fg, Some(theme.accent_primary));
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::ITALIC));

        assert_eq!(lines[1].spans[0].style.fg, Some(theme.read_mark));
        assert_eq!(lines[2].spans[0].style.fg, Some(theme.read_mark));
        assert!(lines[2].spans[0].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn unread_links_keep_plain_style() {
        let doc = parse_document("d", DOC).unwrap();
        let nav = Navigator::from_document(&doc, None);
        let theme = Theme::default();

        let lines = build_lines(&nav, None, &theme);
        assert_eq!(lines[2].spans[0].style.fg, Some(theme.fg_primary));
        assert!(!lines[2].spans[0].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn cursor_row_uses_selection_style() {
        let doc = parse_document("d", DOC).unwrap();
        let nav = Navigator::from_document(&doc, None);
        let theme = Theme::default();

        let lines = build_lines(&nav, Some(2), &theme);
        assert_eq!(lines[2].spans[0].style.bg, Some(theme.accent_primary));
        assert_eq!(lines[0].spans[0].style.bg, None);
    }
}
