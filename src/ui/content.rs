//! Content pane renderer
//!
//! The document is laid out into styled lines once per frame. Layout also
//! records where every anchor, block and topic landed so scroll requests and
//! read tracking can work in line coordinates.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block as BorderBlock, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
    },
};

use crate::app::state::{AppState, ContentLayout, ContentState};
use crate::document::{Block, ContentKind, ContentNode, Document, Fragment};
use crate::progress::TopicExtent;
use crate::search::MatchLocation;
use crate::theme::Theme;
use crate::ui::sidebar::read_link_style;

/// Styled lines plus the positions recorded while producing them
pub struct RenderedContent {
    pub lines: Vec<Line<'static>>,
    pub layout: ContentLayout,
}

/// Draw the content panel
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, focused: bool) {
    let border_color = if focused { theme.border_focused } else { theme.border };

    let block = BorderBlock::default()
        .title(format!(" {} ", state.document.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Last column is the scrollbar, plus a gap before it
    let content_width = inner.width.saturating_sub(2) as usize;
    let content_area = Rect { width: inner.width.saturating_sub(1), ..inner };

    let focus = state.search.current().and_then(|i| state.search.matches().get(i).copied());
    let rendered = render_document(&state.document, focus, theme, content_width);

    state.content.layout = rendered.layout;
    state.content.visible_height = inner.height as usize;
    state.content.resolve_pending_scroll();
    state.content.clamp_scroll();

    let scroll_offset = state.content.scroll_offset;
    let visible_lines: Vec<Line> =
        rendered.lines.into_iter().skip(scroll_offset).take(inner.height as usize).collect();

    frame.render_widget(Paragraph::new(visible_lines), content_area);
    draw_scrollbar(frame, inner, &state.content, theme);
}

/// Scrollbar in the rightmost column of `area`, sized against the same
/// maximum offset the content pane clamps to
fn draw_scrollbar(frame: &mut Frame, area: Rect, content: &ContentState, theme: &Theme) {
    if content.layout.total_lines <= area.height as usize {
        return;
    }

    let mut scrollbar_state = ScrollbarState::new(content.max_scroll())
        .position(content.scroll_offset)
        .viewport_content_length(area.height as usize);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None)
        .track_symbol(Some("░"))
        .thumb_symbol("█")
        .track_style(Style::default().fg(theme.bg_tertiary))
        .thumb_style(Style::default().fg(theme.accent_secondary));

    frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
}

/// Lay out every block of the document at the given width.
///
/// `focus` is the search occurrence in focus; it gets an extra emphasis on
/// top of the regular highlight.
pub fn render_document(
    doc: &Document,
    focus: Option<MatchLocation>,
    theme: &Theme,
    width: usize,
) -> RenderedContent {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut layout = ContentLayout::default();
    let mut open_topic: Option<(String, usize)> = None;

    for (idx, block) in doc.blocks.iter().enumerate() {
        if let Block::Heading { level, .. } = block {
            if *level <= 3 {
                close_topic(&mut layout, &mut open_topic, lines.len());
            }
        }

        layout.blocks.insert(idx, lines.len());

        match block {
            Block::Heading { level, text, anchor } => {
                // Anchors point at the heading text, below its spacer
                let heading_line = lines.len() + 1;
                if let Some(anchor) = anchor {
                    layout.anchors.insert(anchor.clone(), heading_line);
                    if *level == 3 {
                        open_topic = Some((anchor.clone(), heading_line));
                    }
                }
                render_heading(&mut lines, *level, text, theme, width);
            }
            Block::Content(node) => {
                let focused = focus.filter(|f| f.block == idx).map(|f| f.occurrence);
                render_node(&mut lines, node, focused, theme, width);
            }
            Block::TopicList(chapter) => {
                if let Some(chapter) = doc.chapters.get(*chapter) {
                    render_topic_list(&mut lines, chapter, theme);
                }
            }
            Block::Code(code) => render_code_block(&mut lines, code, theme),
            Block::Rule => render_horizontal_rule(&mut lines, theme, width),
        }
    }

    close_topic(&mut layout, &mut open_topic, lines.len());
    layout.total_lines = lines.len();

    RenderedContent { lines, layout }
}

fn close_topic(layout: &mut ContentLayout, open: &mut Option<(String, usize)>, end: usize) {
    if let Some((topic, start)) = open.take() {
        layout.topics.push(TopicExtent { topic, start, len: end.saturating_sub(start) });
    }
}

fn render_heading(lines: &mut Vec<Line<'static>>, level: u8, text: &str, theme: &Theme, width: usize) {
    let (style, indent) = match level {
        1 => (
            Style::default()
                .fg(theme.accent_primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            "",
        ),
        2 => (Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD), ""),
        3 => (Style::default().fg(theme.info).add_modifier(Modifier::BOLD), "  "),
        _ => (Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD), "    "),
    };

    lines.push(Line::from(""));
    let options = textwrap::Options::new(width.max(1)).initial_indent(indent).subsequent_indent(indent);
    for wrapped in textwrap::wrap(text, options) {
        lines.push(Line::from(Span::styled(wrapped.into_owned(), style)));
    }
    if level <= 2 {
        lines.push(Line::from(""));
    }
}

/// Convert a node's markup into spans, highlighting matches
fn fragment_spans(
    markup: &[Fragment],
    base: Style,
    focused_occurrence: Option<usize>,
    theme: &Theme,
) -> Vec<Span<'static>> {
    let highlight = Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg);
    let mut occurrence = 0;

    markup
        .iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => Span::styled(text.clone(), base),
            Fragment::Highlight(text) => {
                let style = if focused_occurrence == Some(occurrence) {
                    highlight.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    highlight
                };
                occurrence += 1;
                Span::styled(text.clone(), style)
            }
        })
        .collect()
}

fn render_node(
    lines: &mut Vec<Line<'static>>,
    node: &ContentNode,
    focused_occurrence: Option<usize>,
    theme: &Theme,
    width: usize,
) {
    let (prefix, prefix_style, base) = match node.kind {
        ContentKind::Paragraph => ("", Style::default(), Style::default().fg(theme.fg_primary)),
        ContentKind::ListItem => {
            ("  • ", Style::default().fg(theme.accent_primary), Style::default().fg(theme.fg_primary))
        }
        ContentKind::Definition => {
            ("  │ ", Style::default().fg(theme.accent_primary), Style::default().fg(theme.fg_secondary))
        }
        ContentKind::Example => {
            ("  ┃ ", Style::default().fg(theme.success), Style::default().fg(theme.fg_muted))
        }
    };

    let spans = fragment_spans(&node.markup, base, focused_occurrence, theme);
    let prefix_width = prefix.chars().count();
    let continuation = " ".repeat(prefix_width);

    for (i, line) in wrap_spans(spans, width.saturating_sub(prefix_width)).into_iter().enumerate() {
        let lead = match (i, node.kind) {
            (0, _) | (_, ContentKind::Definition | ContentKind::Example) => prefix.to_string(),
            _ => continuation.clone(),
        };
        let mut line_spans = Vec::with_capacity(line.spans.len() + 1);
        if !lead.is_empty() {
            line_spans.push(Span::styled(lead, prefix_style));
        }
        line_spans.extend(line.spans);
        lines.push(Line::from(line_spans));
    }

    if node.kind != ContentKind::ListItem {
        lines.push(Line::from(""));
    }
}

fn render_topic_list(
    lines: &mut Vec<Line<'static>>,
    chapter: &crate::document::ChapterEntry,
    theme: &Theme,
) {
    if chapter.topic_links.is_empty() {
        return;
    }

    for link in &chapter.topic_links {
        let label_style = read_link_style(
            Style::default().fg(theme.accent_secondary),
            &link.marks,
            false,
            theme,
        );
        let mut spans = vec![
            Span::styled("  → ", Style::default().fg(theme.fg_muted)),
            Span::styled(link.label.clone(), label_style),
        ];
        if let Some(indicator) = &link.marks.indicator {
            spans.push(Span::styled(indicator.clone(), Style::default().fg(theme.read_mark)));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
}

fn render_code_block(lines: &mut Vec<Line<'static>>, code: &str, theme: &Theme) {
    let border = Style::default().fg(theme.border);
    lines.push(Line::from(Span::styled("┌──────", border)));
    for line in code.lines() {
        lines.push(Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(line.to_string(), Style::default().fg(theme.code)),
        ]));
    }
    lines.push(Line::from(Span::styled("└──────", border)));
    lines.push(Line::from(""));
}

fn render_horizontal_rule(lines: &mut Vec<Line<'static>>, theme: &Theme, width: usize) {
    let rule_width = width.saturating_sub(4).min(32);
    lines.push(Line::from(Span::styled("─".repeat(rule_width), Style::default().fg(theme.border))));
    lines.push(Line::from(""));
}

/// Greedy word wrap over styled spans. Each word keeps the style of the
/// span it came from, so highlights survive line breaks.
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }

    let words = spans.iter().flat_map(|span| {
        span.content.split_inclusive(char::is_whitespace).map(move |word| (word, span.style))
    });

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut row = Line::default();
    let mut used = 0;

    for (word, style) in words {
        let len = word.chars().count();
        if used > 0 && used + len > width {
            lines.push(std::mem::take(&mut row));
            used = 0;
        }
        row.spans.push(Span::styled(word.to_string(), style));
        used += len;
    }

    if !row.spans.is_empty() || lines.is_empty() {
        lines.push(row);
    }
    lines
}
