//! Terminal UI rendering.

pub mod input_bar;
pub mod login;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use taskdeck_proto::task::Task;

use crate::app::{App, Screen};

/// Main draw function for the entire UI.
///
/// `tasks` is the store's full list; filtering and display sorting happen
/// here via the app's view settings, never in the store.
pub fn draw(frame: &mut Frame, app: &App, tasks: &[Task]) {
    match app.screen {
        Screen::Login => login::render(frame, frame.area(), app),
        Screen::Tasks => draw_tasks_screen(frame, app, tasks),
    }
}

/// Layout and render the tasks screen.
fn draw_tasks_screen(frame: &mut Frame, app: &App, tasks: &[Task]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input bar
            Constraint::Min(3),    // Task list (with stats row)
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    input_bar::render(frame, chunks[0], app);
    task_list::render(frame, chunks[1], app, tasks);
    status_bar::render(frame, chunks[2], app);
}
