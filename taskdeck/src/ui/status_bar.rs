//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.focus {
        PanelFocus::Input => {
            "Enter: add | Ctrl-P: priority | Tab: list | Ctrl-R: refresh | Ctrl-L: sign out | Esc: quit"
        }
        PanelFocus::List => {
            "Space: toggle | d: delete | f: filter | ↑↓/jk: move | Tab: input | Esc: quit"
        }
    };

    let (dot_color, mode_text) = if app.online {
        (theme::SUCCESS, "Online")
    } else {
        (theme::OFFLINE, "Offline")
    };

    let mut spans = vec![
        Span::styled("Taskdeck v0.1.0", theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {mode_text}")),
        Span::raw(" | "),
        Span::styled(app.user_label.as_str(), theme::normal()),
        Span::raw(" | "),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(status.as_str(), theme::error()));
    } else {
        spans.push(Span::styled(help_text, theme::dimmed()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
