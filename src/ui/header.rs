//! Title bar: chapter controls, current title and theme toggle

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::nav::NavButtons;
use crate::theme::{Theme, ThemeController};

const PREV_LABEL: &str = " ◀ Prev ";
const NEXT_LABEL: &str = " Next ▶ ";

/// Draw the one-row header
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    buttons: NavButtons,
    theme_toggle: &ThemeController,
    theme: &Theme,
) {
    let toggle = toggle_label(theme_toggle);
    let toggle_width = toggle.chars().count() as u16;
    let nav_width = (PREV_LABEL.chars().count() + NEXT_LABEL.chars().count()) as u16;

    let [nav_area, title_area, toggle_area] = Layout::horizontal([
        Constraint::Length(nav_width),
        Constraint::Min(1),
        Constraint::Length(toggle_width),
    ])
    .areas(area);

    let bar = Style::default().bg(theme.bg_secondary);

    let controls = Line::from(vec![
        Span::styled(PREV_LABEL, button_style(buttons.prev_disabled, theme)),
        Span::styled(NEXT_LABEL, button_style(buttons.next_disabled, theme)),
    ]);
    frame.render_widget(Paragraph::new(controls).style(bar), nav_area);

    let title = Paragraph::new(Span::styled(
        title.to_string(),
        Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
    ))
    .style(bar)
    .centered();
    frame.render_widget(title, title_area);

    let toggle = Paragraph::new(Span::styled(toggle, Style::default().fg(theme.accent_secondary)))
        .style(bar);
    frame.render_widget(toggle, toggle_area);
}

/// Icon and label of the theme control
pub fn toggle_label(controller: &ThemeController) -> String {
    format!(" {} {} ", controller.icon(), controller.label())
}

fn button_style(disabled: bool, theme: &Theme) -> Style {
    if disabled {
        Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;

    #[test]
    fn toggle_label_names_the_other_mode() {
        assert_eq!(toggle_label(&ThemeController::with_mode(ThemeMode::Light)), " ☾ Dark Mode ");
        assert_eq!(toggle_label(&ThemeController::with_mode(ThemeMode::Dark)), " ☀ Light Mode ");
    }

    #[test]
    fn disabled_buttons_are_dimmed() {
        let theme = Theme::default();
        assert!(button_style(true, &theme).add_modifier.contains(Modifier::DIM));
        assert!(!button_style(false, &theme).add_modifier.contains(Modifier::DIM));
    }
}
