//! Login screen rendering (sign-in / sign-up form).

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, AuthMode, LoginField};

/// Render the centered login form.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let form_area = centered_rect(area, 50, 12);

    let title = match app.auth_mode {
        AuthMode::SignIn => "Sign In",
        AuthMode::SignUp => "Sign Up",
    };
    let block = Block::default()
        .title(format!(" Taskdeck — {title} "))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(1), // Error line
            Constraint::Length(1), // Hint line
        ])
        .split(inner);

    render_field(
        frame,
        rows[0],
        "Email",
        &app.email,
        app.login_focus == LoginField::Email,
        false,
    );
    render_field(
        frame,
        rows[1],
        "Password",
        &app.password,
        app.login_focus == LoginField::Password,
        true,
    );

    if let Some(status) = &app.status {
        let line = Line::from(Span::styled(status.as_str(), theme::error()));
        frame.render_widget(Paragraph::new(line), rows[2]);
    }

    let toggle_hint = match app.auth_mode {
        AuthMode::SignIn => "Ctrl-S: sign up instead",
        AuthMode::SignUp => "Ctrl-S: sign in instead",
    };
    let hint = Line::from(Span::styled(
        format!("Enter: submit | Tab: next field | {toggle_hint} | Esc: quit"),
        theme::dimmed(),
    ));
    frame.render_widget(Paragraph::new(hint), rows[3]);
}

/// Render one labeled input field; the password field is masked.
fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    is_focused: bool,
    mask: bool,
) {
    let mut display = if mask {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if is_focused {
        display.push('█');
    }

    let block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });
    let field = Paragraph::new(Line::from(Span::styled(display, theme::normal()))).block(block);
    frame.render_widget(field, area);
}

/// A centered rectangle of at most `width` x `height` inside `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
