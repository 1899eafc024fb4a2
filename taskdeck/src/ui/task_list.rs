//! Task list rendering: stats row plus the filtered, display-sorted list.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use taskdeck_proto::task::Task;

use super::theme;
use crate::app::{App, PanelFocus};
use crate::store::views::{Filter, count_summary};

/// Render the stats row and the task list.
pub fn render(frame: &mut Frame, area: Rect, app: &App, tasks: &[Task]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(2)])
        .split(area);

    render_summary(frame, chunks[0], tasks);
    render_list(frame, chunks[1], app, tasks);
}

/// Render the Active / Completed / Total tallies.
fn render_summary(frame: &mut Frame, area: Rect, tasks: &[Task]) {
    let summary = count_summary(tasks);
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(summary.active.to_string(), theme::bold()),
        Span::styled(" active", theme::dimmed()),
        Span::raw("  "),
        Span::styled(summary.completed.to_string(), theme::bold()),
        Span::styled(" completed", theme::dimmed()),
        Span::raw("  "),
        Span::styled(summary.total.to_string(), theme::bold()),
        Span::styled(" total", theme::dimmed()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the filtered, display-sorted task list.
fn render_list(frame: &mut Frame, area: Rect, app: &App, tasks: &[Task]) {
    let is_focused = app.focus == PanelFocus::List;
    let visible = app.visible_tasks(tasks);

    let block = Block::default()
        .title(format!(" Tasks — {} ", app.filter.label()))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    if visible.is_empty() {
        let (headline, hint) = empty_state(app.filter);
        let lines = vec![
            Line::from(Span::styled(headline, theme::bold())),
            Line::from(Span::styled(hint, theme::dimmed())),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|task| task_item(task, &app.date_format))
        .collect();

    let mut state = ListState::default();
    if is_focused {
        state.select(Some(app.selected.min(visible.len() - 1)));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected());
    frame.render_stateful_widget(list, area, &mut state);
}

/// One task line: checkbox, priority tag, text, completion date.
fn task_item<'a>(task: &'a Task, date_format: &str) -> ListItem<'a> {
    let checkbox = if task.completed { "[✓]" } else { "[ ]" };
    let text_style = if task.completed {
        theme::dimmed()
    } else {
        theme::normal()
    };

    let mut spans = vec![
        Span::styled(checkbox, text_style),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", task.priority.label()),
            theme::priority(task.priority),
        ),
        Span::raw(" "),
        Span::styled(task.text.as_str(), text_style),
    ];
    if let Some(completed_at) = task.completed_at {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("done {}", completed_at.format(date_format)),
            theme::dimmed(),
        ));
    }

    ListItem::new(Line::from(spans))
}

/// Headline and hint shown when the current filter matches nothing.
const fn empty_state(filter: Filter) -> (&'static str, &'static str) {
    match filter {
        Filter::Completed => (
            "No completed tasks yet",
            "Complete some tasks to see them here!",
        ),
        Filter::Active => ("No active tasks", "Add a new task to get started"),
        Filter::All => ("No tasks yet", "Add a new task to get started"),
    }
}
