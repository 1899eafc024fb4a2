//! `Taskdeck` — terminal-native to-do list.
//!
//! Launches the TUI and, when a backend is configured, signs in and mirrors
//! every task mutation to it. Configuration via CLI flags, environment
//! variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Offline mode (tasks live in memory, any username works)
//! cargo run --bin taskdeck
//!
//! # Against a backend
//! cargo run --bin taskdeck -- --backend-url http://127.0.0.1:9400
//!
//! # Or via environment variable
//! TASKDECK_BACKEND_URL=http://127.0.0.1:9400 cargo run --bin taskdeck
//! ```

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use taskdeck_proto::auth::Session;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::app::{App, AuthMode, Command};
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::remote::{ApiClient, ApiError};
use taskdeck::session;
use taskdeck::store::TaskStore;
use taskdeck::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskdeck starting");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown to
/// ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let session_file: Option<PathBuf> = config
        .session_file
        .clone()
        .or_else(session::default_session_path);

    let mut app = App::new()
        .with_max_task_text_len(config.max_task_text_len)
        .with_date_format(config.date_format.clone());
    let mut store: Option<TaskStore> = None;

    // Remembered login: the session is loaded exactly once, here.
    if let Some(path) = session_file.as_deref() {
        match session::load(path) {
            Ok(Some(saved)) => restore_session(&mut app, &mut store, config, saved).await,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to load session file"),
        }
    }

    loop {
        // Step 1: Draw the UI frame.
        let tasks = store.as_ref().map(|s| s.tasks().to_vec()).unwrap_or_default();
        terminal.draw(|frame| ui::draw(frame, &app, &tasks))?;

        // Step 2: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(Command) when a user action
            // requires a store or auth operation.
            let command = {
                let visible = app.visible_tasks(&tasks);
                app.handle_key_event(key, &visible)
            };
            if let Some(command) = command {
                execute_command(command, &mut app, &mut store, config, session_file.as_deref())
                    .await;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Rebuilds the store from a saved session, validating the token against
/// the backend when one is configured.
async fn restore_session(
    app: &mut App,
    store: &mut Option<TaskStore>,
    config: &ClientConfig,
    saved: Session,
) {
    match build_store_from_saved(config, saved).await {
        Ok(Some(mut restored)) => {
            let label = restored.session().user.email.clone();
            let online = restored.is_remote();
            let refresh_result = restored.refresh().await;
            app.enter_tasks(&label, online);
            if let Err(e) = refresh_result {
                app.set_status(format!("Could not load tasks: {e}"));
            }
            *store = Some(restored);
            tracing::info!(user = %label, online, "session restored");
        }
        Ok(None) => app.set_status("Session expired — sign in again."),
        Err(e) => app.set_status(format!("Could not restore session: {e}")),
    }
}

/// Validates a saved session and builds the matching store.
///
/// Offline the saved session is taken at face value; online the token must
/// still resolve to a user (`Ok(None)` when it no longer does).
async fn build_store_from_saved(
    config: &ClientConfig,
    saved: Session,
) -> Result<Option<TaskStore>, ApiError> {
    let Some(remote_config) = config.to_remote_config() else {
        return Ok(Some(TaskStore::new(saved)));
    };
    let mut client = ApiClient::from_config(&remote_config)?;
    client.set_token(Some(saved.token.clone()));
    match client.current_user().await? {
        Some(user) => {
            let session = Session {
                token: saved.token,
                user,
            };
            Ok(Some(TaskStore::with_remote(session, client)))
        }
        None => Ok(None),
    }
}

/// Execute a [`Command`] against the store and auth state, reporting any
/// failure on the status line. No failure is fatal.
async fn execute_command(
    command: Command,
    app: &mut App,
    store: &mut Option<TaskStore>,
    config: &ClientConfig,
    session_file: Option<&Path>,
) {
    match command {
        Command::SignIn { email, password } => {
            sign_in(app, store, config, session_file, &email, &password).await;
        }
        Command::SignUp { email, password } => {
            sign_up(app, config, &email, &password).await;
        }
        Command::SignOut => sign_out(app, store, session_file).await,
        Command::Create { text, priority } => {
            let Some(store) = store.as_mut() else { return };
            match store.create_task(&text, Some(priority)).await {
                Ok(task) => {
                    app.clear_input();
                    app.status = None;
                    tracing::debug!(task_id = %task.id, "task added");
                }
                Err(e) => app.set_status(format!("Could not add task: {e}")),
            }
        }
        Command::Toggle(id) => {
            let Some(store) = store.as_mut() else { return };
            match store.toggle_task(&id).await {
                Ok(()) => app.status = None,
                Err(e) => app.set_status(format!("Could not update task: {e}")),
            }
        }
        Command::Remove(id) => {
            let Some(store) = store.as_mut() else { return };
            match store.remove_task(&id).await {
                Ok(()) => app.status = None,
                Err(e) => app.set_status(format!("Could not delete task: {e}")),
            }
        }
        Command::Refresh => {
            let Some(store) = store.as_mut() else { return };
            match store.refresh().await {
                Ok(()) => app.status = None,
                Err(e) => app.set_status(format!("Could not refresh tasks: {e}")),
            }
        }
    }
}

/// Sign in: against the backend when configured, locally otherwise.
async fn sign_in(
    app: &mut App,
    store: &mut Option<TaskStore>,
    config: &ClientConfig,
    session_file: Option<&Path>,
    email: &str,
    password: &str,
) {
    let Some(remote_config) = config.to_remote_config() else {
        // Offline mode: any username works, the password is not verified.
        let session = session::local_session(email);
        persist_session(session_file, &session);
        let label = session.user.email.clone();
        *store = Some(TaskStore::new(session));
        app.enter_tasks(&label, false);
        return;
    };

    let mut client = match ApiClient::from_config(&remote_config) {
        Ok(c) => c,
        Err(e) => {
            app.set_status(format!("Backend unavailable: {e}"));
            return;
        }
    };

    match client.sign_in(email, password).await {
        Ok(session) => {
            persist_session(session_file, &session);
            let label = session.user.email.clone();
            let mut new_store = TaskStore::with_remote(session, client);
            let refresh_result = new_store.refresh().await;
            app.enter_tasks(&label, true);
            if let Err(e) = refresh_result {
                app.set_status(format!("Could not load tasks: {e}"));
            }
            *store = Some(new_store);
        }
        Err(e) => app.set_status(format!("Sign-in failed: {e}")),
    }
}

/// Create an account, then drop back to the sign-in form.
async fn sign_up(app: &mut App, config: &ClientConfig, email: &str, password: &str) {
    let Some(remote_config) = config.to_remote_config() else {
        app.set_status("Offline mode — just sign in with a username.");
        return;
    };

    let client = match ApiClient::from_config(&remote_config) {
        Ok(c) => c,
        Err(e) => {
            app.set_status(format!("Backend unavailable: {e}"));
            return;
        }
    };

    match client.sign_up(email, password).await {
        Ok(user) => {
            app.auth_mode = AuthMode::SignIn;
            app.set_status("Account created — sign in to continue.");
            tracing::info!(user_id = %user.id, "account created");
        }
        Err(e) => app.set_status(format!("Sign-up failed: {e}")),
    }
}

/// Sign out: revoke the token (best-effort), forget the session file, and
/// discard the task list.
async fn sign_out(app: &mut App, store: &mut Option<TaskStore>, session_file: Option<&Path>) {
    if let Some(existing) = store.take() {
        let (_session, remote) = existing.into_parts();
        if let Some(mut client) = remote
            && let Err(e) = client.sign_out().await
        {
            tracing::warn!(error = %e, "backend sign-out failed");
        }
    }
    if let Some(path) = session_file
        && let Err(e) = session::clear(path)
    {
        tracing::warn!(error = %e, "failed to clear session file");
    }
    app.reset_to_login();
}

/// Write the session file, logging (not failing) on error.
fn persist_session(session_file: Option<&Path>, session: &Session) {
    if let Some(path) = session_file
        && let Err(e) = session::save(path, session)
    {
        tracing::warn!(error = %e, "failed to save session file");
    }
}
