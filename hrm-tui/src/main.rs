//! HRM admin console entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hrm_tui::api_client::ApiClient;
use hrm_tui::config::TuiConfig;
use hrm_tui::error::TuiError;
use hrm_tui::events::TuiEvent;
use hrm_tui::keys::map_key;
use hrm_tui::nav::View;
use hrm_tui::notifications::NotificationLevel;
use hrm_tui::persistence;
use hrm_tui::state::{App, Command};
use hrm_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    let api = ApiClient::new(&config)?;
    let mut app = App::new(config);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(&state),
        Ok(None) => {}
        Err(err) => app.notify(NotificationLevel::Warning, format!("Saved state ignored: {}", err)),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let initial = Command::Load(app.active_view);
    execute_command(&mut app, &api, initial).await;

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                let now = chrono::Utc::now();
                let stale = app.notifications.last().is_some_and(|n| n.is_stale(now, 5));
                if stale {
                    app.notifications.clear();
                }
            }
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, &api, event).await {
                    break;
                }
            }
        }
    }

    persistence::save(&app.config.persistence_path, &app.persisted())?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Returns true when the console should exit.
async fn handle_event(app: &mut App, api: &ApiClient, event: TuiEvent) -> bool {
    let TuiEvent::Input(key) = event else {
        return false;
    };
    let command = if app.prompt.is_some() {
        app.handle_prompt_key(key)
    } else {
        map_key(key).and_then(|action| app.handle_action(action))
    };
    match command {
        Some(Command::Quit) => true,
        Some(command) => {
            execute_command(app, api, command).await;
            false
        }
        None => false,
    }
}

async fn execute_command(app: &mut App, api: &ApiClient, command: Command) {
    let mut next = Some(command);
    while let Some(command) = next.take() {
        match command {
            Command::Quit => return,
            Command::Load(View::Analytics) => match api.analytics_summary().await {
                Ok(summary) => app.apply_analytics(summary),
                Err(err) => app.notify(NotificationLevel::Error, format!("Analytics failed: {}", err)),
            },
            Command::Load(view) => {
                let Some(kind) = view.entity() else {
                    continue;
                };
                let query = app.list_query(view);
                match api.list(kind, &query).await {
                    Ok(page) => app.apply_page(view, page),
                    Err(err) => app.notify(
                        NotificationLevel::Error,
                        format!("Loading {} failed: {}", view.title(), err),
                    ),
                }
            }
            Command::Delete { view, kind, id } => match api.delete(kind, id).await {
                Ok(()) => next = Some(app.apply_deleted(view, id)),
                Err(err) => app.notify(NotificationLevel::Error, format!("Delete failed: {}", err)),
            },
            Command::Create { view, kind, body } => match api.create(kind, &body).await {
                Ok(record) => next = Some(app.apply_created(view, &record)),
                Err(err) => app.notify(NotificationLevel::Error, format!("Create failed: {}", err)),
            },
            Command::Patch { view, kind, id, body } => match api.patch(kind, id, &body).await {
                Ok(record) => app.apply_updated(view, record),
                Err(err) => app.notify(NotificationLevel::Error, format!("Update failed: {}", err)),
            },
        }
    }
}
