//! Application state and event handling.
//!
//! [`App`] owns everything the UI needs except the task list itself, which
//! lives in the Task Store. Key handling returns a [`Command`] when a user
//! action requires a store or auth operation; the main loop executes it and
//! reports failures back via the status line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck_proto::task::{Priority, Task, TaskId};

use crate::store::views::{Filter, sort_for_display};

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Sign-in / sign-up form.
    Login,
    /// The task list.
    Tasks,
}

/// Login form mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Sign in to an existing account.
    SignIn,
    /// Create a new account.
    SignUp,
}

/// Which login field is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    /// Email (or username, in offline mode).
    Email,
    /// Password.
    Password,
}

/// Which panel of the tasks screen is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// New-task input bar (default).
    Input,
    /// Task list.
    List,
}

/// A store- or auth-affecting action produced by key handling.
///
/// The main loop executes these against the Task Store and the API client;
/// the app itself never talks to either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in with the entered credentials.
    SignIn {
        /// Entered email (or username offline).
        email: String,
        /// Entered password.
        password: String,
    },
    /// Create an account with the entered credentials.
    SignUp {
        /// Entered email.
        email: String,
        /// Entered password.
        password: String,
    },
    /// Sign out, discard the session and the task list.
    SignOut,
    /// Create a task from the input bar.
    Create {
        /// Raw input text (the store trims and validates).
        text: String,
        /// Priority chosen in the picker.
        priority: Priority,
    },
    /// Flip a task's completion state.
    Toggle(TaskId),
    /// Delete a task.
    Remove(TaskId),
    /// Reload the task list from the backend.
    Refresh,
}

/// Main application state.
pub struct App {
    /// Which screen is showing.
    pub screen: Screen,

    // -- Login form --
    /// Sign-in or sign-up.
    pub auth_mode: AuthMode,
    /// Email field contents.
    pub email: String,
    /// Password field contents.
    pub password: String,
    /// Focused login field.
    pub login_focus: LoginField,

    // -- Tasks screen --
    /// Current new-task input.
    pub input: String,
    /// Cursor position in input (character index).
    pub cursor_position: usize,
    /// Priority the next created task will get.
    pub pending_priority: Priority,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Current display filter.
    pub filter: Filter,
    /// Selected index into the visible (filtered + sorted) tasks.
    pub selected: usize,

    // -- Shared --
    /// Label for the signed-in user, shown in the status bar.
    pub user_label: String,
    /// Whether a backend is configured and reachable at sign-in.
    pub online: bool,
    /// Last error or notice; replaced by the next action.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Date format (chrono) for completion dates in the list.
    pub date_format: String,

    max_task_text_len: usize,
}

impl App {
    /// Creates the application in its initial (login) state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            auth_mode: AuthMode::SignIn,
            email: String::new(),
            password: String::new(),
            login_focus: LoginField::Email,
            input: String::new(),
            cursor_position: 0,
            pending_priority: Priority::default(),
            focus: PanelFocus::Input,
            filter: Filter::default(),
            selected: 0,
            user_label: String::new(),
            online: false,
            status: None,
            should_quit: false,
            date_format: "%Y-%m-%d".to_string(),
            max_task_text_len: taskdeck_proto::task::MAX_TASK_TEXT_LENGTH,
        }
    }

    /// Overrides the input length cap (from config).
    #[must_use]
    pub const fn with_max_task_text_len(mut self, max: usize) -> Self {
        self.max_task_text_len = max;
        self
    }

    /// Overrides the completion date format (from config).
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the status line.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Switches to the tasks screen after a successful sign-in.
    pub fn enter_tasks(&mut self, user_label: &str, online: bool) {
        self.screen = Screen::Tasks;
        self.user_label = user_label.to_string();
        self.online = online;
        self.password.clear();
        self.status = None;
        self.focus = PanelFocus::Input;
        self.filter = Filter::default();
        self.selected = 0;
    }

    /// Returns to the login screen after sign-out, clearing form state.
    pub fn reset_to_login(&mut self) {
        self.screen = Screen::Login;
        self.auth_mode = AuthMode::SignIn;
        self.email.clear();
        self.password.clear();
        self.login_focus = LoginField::Email;
        self.input.clear();
        self.cursor_position = 0;
        self.pending_priority = Priority::default();
        self.user_label.clear();
        self.status = None;
        self.selected = 0;
    }

    /// Clears the input bar (after a confirmed create).
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    /// The tasks the list panel shows: filtered, then display-sorted.
    #[must_use]
    pub fn visible_tasks<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        sort_for_display(self.filter.apply(tasks))
    }

    /// Handle a key event. `visible` is the currently displayed task list,
    /// used to resolve the selection to a task id.
    pub fn handle_key_event(&mut self, key: KeyEvent, visible: &[&Task]) -> Option<Command> {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return None;
            }
            _ => {}
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Tasks => self.handle_tasks_key(key, visible),
        }
    }

    // -----------------------------------------------------------------
    // Login screen
    // -----------------------------------------------------------------

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Command> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                self.auth_mode = match self.auth_mode {
                    AuthMode::SignIn => AuthMode::SignUp,
                    AuthMode::SignUp => AuthMode::SignIn,
                };
                self.status = None;
                None
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.login_focus = match self.login_focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
                None
            }
            (KeyCode::Enter, _) => self.submit_login(),
            (KeyCode::Char(c), _) => {
                match self.login_focus {
                    LoginField::Email => self.email.push(c),
                    LoginField::Password => self.password.push(c),
                }
                None
            }
            (KeyCode::Backspace, _) => {
                match self.login_focus {
                    LoginField::Email => self.email.pop(),
                    LoginField::Password => self.password.pop(),
                };
                None
            }
            _ => None,
        }
    }

    fn submit_login(&mut self) -> Option<Command> {
        if self.email.trim().is_empty() {
            self.set_status("Enter an email (or a username in offline mode) to sign in.");
            return None;
        }
        let email = self.email.trim().to_string();
        let password = self.password.clone();
        match self.auth_mode {
            AuthMode::SignIn => Some(Command::SignIn { email, password }),
            AuthMode::SignUp => Some(Command::SignUp { email, password }),
        }
    }

    // -----------------------------------------------------------------
    // Tasks screen
    // -----------------------------------------------------------------

    fn handle_tasks_key(&mut self, key: KeyEvent, visible: &[&Task]) -> Option<Command> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => return Some(Command::SignOut),
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => return Some(Command::Refresh),
            (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
                self.pending_priority = self.pending_priority.cycle();
                return None;
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.focus = match self.focus {
                    PanelFocus::Input => PanelFocus::List,
                    PanelFocus::List => PanelFocus::Input,
                };
                return None;
            }
            _ => {}
        }

        match self.focus {
            PanelFocus::Input => self.handle_input_key(key),
            PanelFocus::List => self.handle_list_key(key, visible),
        }
    }

    /// Handle key event when the input bar is focused.
    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => self.submit_task(),
            KeyCode::Char(c) => {
                self.enter_char(c);
                None
            }
            KeyCode::Backspace => {
                self.delete_char();
                None
            }
            KeyCode::Left => {
                self.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.move_cursor_right();
                None
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                None
            }
            KeyCode::End => {
                self.cursor_position = self.input.len();
                None
            }
            _ => None,
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_list_key(&mut self, key: KeyEvent, visible: &[&Task]) -> Option<Command> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(visible.len().saturating_sub(1));
                None
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.cycle();
                self.selected = 0;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.selected_task(visible).map(|t| Command::Toggle(t.id))
            }
            KeyCode::Char('d') => self.selected_task(visible).map(|t| Command::Remove(t.id)),
            _ => None,
        }
    }

    /// Submit the current input as a new task.
    fn submit_task(&mut self) -> Option<Command> {
        if self.input.trim().is_empty() {
            return None;
        }
        if self.input.trim().chars().count() > self.max_task_text_len {
            self.set_status(format!(
                "Task text too long (max {} characters).",
                self.max_task_text_len
            ));
            return None;
        }
        Some(Command::Create {
            text: self.input.clone(),
            priority: self.pending_priority,
        })
    }

    fn selected_task<'a>(&self, visible: &[&'a Task]) -> Option<&'a Task> {
        if visible.is_empty() {
            return None;
        }
        visible.get(self.selected.min(visible.len() - 1)).copied()
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        self.input.insert(self.cursor_position, c);
        self.cursor_position += 1;
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.input.remove(self.cursor_position - 1);
            self.cursor_position -= 1;
        }
    }

    /// Move cursor left.
    const fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    /// Move cursor right.
    const fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.len() {
            self.cursor_position += 1;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
