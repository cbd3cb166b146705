//! Application state and view state definitions.
//!
//! Everything here is synchronous. Key handling returns a [`Command`] that
//! the event loop executes against the API, then feeds the result back
//! through [`App::apply_page`], [`App::apply_analytics`] and friends.

use crate::api_client::{ListQuery, Page};
use crate::config::TuiConfig;
use crate::keys::Action;
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::theme::SynthBruteTheme;
use crossterm::event::{KeyCode, KeyEvent};
use hrm_core::{AnalyticsSummary, EntityKind};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Notifications kept for the footer.
const MAX_NOTIFICATIONS: usize = 50;

/// A table column: header text and the dotted JSON path of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub path: &'static str,
    pub width: u16,
}

const fn col(header: &'static str, path: &'static str, width: u16) -> Column {
    Column { header, path, width }
}

/// Table layout per record type.
pub fn columns(kind: EntityKind) -> &'static [Column] {
    match kind {
        EntityKind::Department => const { &[
            col("Code", "code", 8),
            col("Name", "name", 24),
            col("Budget", "budget", 14),
            col("Headcount", "headcount", 10),
        ] },
        EntityKind::Role => const { &[
            col("Title", "title", 24),
            col("Level", "level", 8),
            col("Band min", "salary_band_min", 12),
            col("Band max", "salary_band_max", 12),
        ] },
        EntityKind::Employee => const { &[
            col("First", "first_name", 14),
            col("Last", "last_name", 16),
            col("Email", "email", 30),
            col("Department", "department.name", 18),
            col("Role", "role.title", 20),
            col("Salary", "base_salary", 12),
            col("Active", "is_active", 7),
        ] },
        EntityKind::Attendance => const { &[
            col("Date", "date", 12),
            col("Employee", "employee_id", 38),
            col("Status", "status", 9),
            col("Hours", "hours_worked", 7),
            col("Notes", "notes", 24),
        ] },
        EntityKind::PerformanceReview => const { &[
            col("Employee", "employee_id", 38),
            col("From", "period_start", 12),
            col("To", "period_end", 12),
            col("Rating", "rating", 7),
            col("Goals", "goals_met", 6),
            col("Bonus", "bonus_amount", 10),
        ] },
        EntityKind::Project => const { &[
            col("Code", "code", 10),
            col("Name", "name", 24),
            col("Start", "start_date", 12),
            col("End", "end_date", 12),
            col("Budget", "budget", 12),
        ] },
        EntityKind::Assignment => const { &[
            col("Employee", "employee_id", 38),
            col("Project", "project_id", 38),
            col("Role", "role_on_project", 12),
            col("Start", "start_date", 12),
            col("Alloc %", "allocation_percent", 8),
        ] },
    }
}

/// Render the value at a dotted path as display text. Strings are shown
/// without quotes; missing values and `null` are empty.
pub fn field_text(record: &Value, path: &str) -> String {
    let value = path
        .split('.')
        .try_fold(record, |current, key| current.get(key));
    value.map(scalar_text).unwrap_or_default()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
        other => other.to_string(),
    }
}

/// Flatten a record into `(label, value)` pairs for the detail panel.
/// Nested objects contribute their fields as `parent.child`.
pub fn detail_fields(record: &Value) -> Vec<(String, String)> {
    fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let label = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    walk(&label, child, out);
                }
            }
            _ => out.push((prefix.to_string(), scalar_text(value))),
        }
    }
    let mut out = Vec::new();
    walk("", record, &mut out);
    out
}

/// Number of pages for `total` rows; an empty collection still has one.
pub fn total_pages(total: i64, page_size: u32) -> u32 {
    if total <= 0 || page_size == 0 {
        return 1;
    }
    let pages = (total as u64).div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Parse `field=value` into a one-field PATCH body.
///
/// `null`, `true`, `false` and bare integers become JSON literals. Anything
/// else, including decimals and dates, is sent as a string; wrap a value in
/// double quotes to force a string.
pub fn parse_edit(input: &str) -> Result<Value, String> {
    let (field, value) = parse_pair(input)?;
    let mut body = serde_json::Map::new();
    body.insert(field, value);
    Ok(Value::Object(body))
}

/// Parse `field=value; field=value; ...` into a create body. Values follow
/// [`parse_edit`]; a `;` inside double quotes does not split.
pub fn parse_create(input: &str) -> Result<Value, String> {
    let mut body = serde_json::Map::new();
    for segment in split_fields(input) {
        if segment.trim().is_empty() {
            continue;
        }
        let (field, value) = parse_pair(segment)?;
        if body.insert(field.clone(), value).is_some() {
            return Err(format!("field '{}' given twice", field));
        }
    }
    if body.is_empty() {
        return Err("expected field=value; field=value".to_string());
    }
    Ok(Value::Object(body))
}

fn split_fields(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&input[start..]);
    segments
}

fn parse_pair(input: &str) -> Result<(String, Value), String> {
    let (field, raw) = input
        .split_once('=')
        .ok_or_else(|| "expected field=value".to_string())?;
    let field = field.trim();
    if field.is_empty()
        || !field
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!("invalid field name '{}'", field));
    }

    let raw = raw.trim();
    let value = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        Value::String(raw[1..raw.len() - 1].to_string())
    } else if raw == "null" {
        Value::Null
    } else if raw == "true" || raw == "false" {
        Value::Bool(raw == "true")
    } else if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else {
        Value::String(raw.to_string())
    };
    Ok((field.to_string(), value))
}

/// Paging, selection and search for one record collection.
#[derive(Debug, Clone, Default)]
pub struct EntityViewState {
    pub items: Vec<Value>,
    pub total: i64,
    pub page: u32,
    pub selected: Option<usize>,
    pub search: String,
    pub loaded: bool,
}

impl EntityViewState {
    fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn selected_record(&self) -> Option<&Value> {
        self.selected.and_then(|i| self.items.get(i))
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected_record()
            .and_then(|r| r.get("id"))
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    fn select_next(&mut self) {
        if self.items.is_empty() {
            self.selected = None;
            return;
        }
        let next = self.selected.map_or(0, |i| (i + 1).min(self.items.len() - 1));
        self.selected = Some(next);
    }

    fn select_previous(&mut self) {
        if self.items.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }
}

/// Text input or confirmation shown in the footer.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Search(String),
    Edit(String),
    Create(String),
    ConfirmDelete { id: Uuid, label: String },
}

/// Work for the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(View),
    Delete { view: View, kind: EntityKind, id: Uuid },
    Patch { view: View, kind: EntityKind, id: Uuid, body: Value },
    Create { view: View, kind: EntityKind, body: Value },
    Quit,
}

#[derive(Clone)]
pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub active_view: View,
    pub views: BTreeMap<View, EntityViewState>,
    pub analytics: Option<AnalyticsSummary>,
    pub prompt: Option<Prompt>,
    pub notifications: Vec<Notification>,
}

impl App {
    pub fn new(config: TuiConfig) -> Self {
        let views = View::all()
            .iter()
            .filter(|v| v.entity().is_some())
            .map(|v| (*v, EntityViewState::new()))
            .collect();
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            active_view: View::Employees,
            views,
            analytics: None,
            prompt: None,
            notifications: Vec::new(),
        }
    }

    pub fn restore(&mut self, state: &PersistedState) {
        if let Some(view) = state.active_view {
            self.active_view = view;
        }
        for (view, search) in &state.searches {
            if let Some(entity_view) = self.views.get_mut(view) {
                entity_view.search = search.clone();
            }
        }
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            active_view: Some(self.active_view),
            searches: self
                .views
                .iter()
                .filter(|(_, v)| !v.search.is_empty())
                .map(|(view, v)| (*view, v.search.clone()))
                .collect(),
        }
    }

    pub fn current(&self) -> Option<&EntityViewState> {
        self.views.get(&self.active_view)
    }

    fn current_mut(&mut self) -> Option<&mut EntityViewState> {
        self.views.get_mut(&self.active_view)
    }

    /// Query for the next load of `view`.
    pub fn list_query(&self, view: View) -> ListQuery {
        let state = self.views.get(&view);
        let search = state
            .map(|s| s.search.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        ListQuery {
            search,
            page: state.map_or(1, |s| s.page.max(1)),
            page_size: self.config.page_size,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let excess = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..excess);
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Quit => Some(Command::Quit),
            Action::NextView => self.switch_to(self.active_view.next()),
            Action::PrevView => self.switch_to(self.active_view.previous()),
            Action::SwitchView(index) => View::from_index(index).and_then(|v| self.switch_to(v)),
            Action::MoveDown => {
                if let Some(view) = self.current_mut() {
                    view.select_next();
                }
                None
            }
            Action::MoveUp => {
                if let Some(view) = self.current_mut() {
                    view.select_previous();
                }
                None
            }
            Action::NextPage => self.turn_page(true),
            Action::PrevPage => self.turn_page(false),
            Action::Refresh => Some(Command::Load(self.active_view)),
            Action::OpenSearch => {
                let search = self.current()?.search.clone();
                self.prompt = Some(Prompt::Search(search));
                None
            }
            Action::EditItem => {
                if self.current()?.selected_id().is_none() {
                    self.notify(NotificationLevel::Warning, "Select a record to edit");
                    return None;
                }
                self.prompt = Some(Prompt::Edit(String::new()));
                None
            }
            Action::NewItem => {
                self.active_view.entity()?;
                self.prompt = Some(Prompt::Create(String::new()));
                None
            }
            Action::DeleteItem => {
                let current = self.current()?;
                let Some(id) = current.selected_id() else {
                    self.notify(NotificationLevel::Warning, "Select a record to delete");
                    return None;
                };
                let label = self.selected_label(current.selected_record());
                self.prompt = Some(Prompt::ConfirmDelete { id, label });
                None
            }
            Action::Cancel => {
                self.prompt = None;
                None
            }
        }
    }

    /// Keys while a prompt is open. Returns the command a confirmed prompt
    /// produces.
    pub fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<Command> {
        let prompt = self.prompt.take()?;
        match prompt {
            Prompt::ConfirmDelete { id, .. } => {
                let kind = self.active_view.entity()?;
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::Delete {
                        view: self.active_view,
                        kind,
                        id,
                    }),
                    _ => None,
                }
            }
            Prompt::Search(mut text) => match key.code {
                KeyCode::Enter => {
                    let view = self.active_view;
                    let state = self.current_mut()?;
                    state.search = text.trim().to_string();
                    state.page = 1;
                    state.selected = None;
                    Some(Command::Load(view))
                }
                KeyCode::Esc => None,
                code => {
                    edit_buffer(&mut text, code);
                    self.prompt = Some(Prompt::Search(text));
                    None
                }
            },
            Prompt::Edit(mut text) => match key.code {
                KeyCode::Enter => self.commit_edit(&text),
                KeyCode::Esc => None,
                code => {
                    edit_buffer(&mut text, code);
                    self.prompt = Some(Prompt::Edit(text));
                    None
                }
            },
            Prompt::Create(mut text) => match key.code {
                KeyCode::Enter => self.commit_create(&text),
                KeyCode::Esc => None,
                code => {
                    edit_buffer(&mut text, code);
                    self.prompt = Some(Prompt::Create(text));
                    None
                }
            },
        }
    }

    fn commit_edit(&mut self, text: &str) -> Option<Command> {
        let kind = self.active_view.entity()?;
        let id = self.current()?.selected_id()?;
        match parse_edit(text) {
            Ok(body) => Some(Command::Patch {
                view: self.active_view,
                kind,
                id,
                body,
            }),
            Err(reason) => {
                self.notify(NotificationLevel::Error, reason);
                None
            }
        }
    }

    fn commit_create(&mut self, text: &str) -> Option<Command> {
        let kind = self.active_view.entity()?;
        match parse_create(text) {
            Ok(body) => Some(Command::Create {
                view: self.active_view,
                kind,
                body,
            }),
            Err(reason) => {
                // Keep the typed text so a typo can be fixed in place.
                self.prompt = Some(Prompt::Create(text.to_string()));
                self.notify(NotificationLevel::Error, reason);
                None
            }
        }
    }

    fn switch_to(&mut self, view: View) -> Option<Command> {
        self.active_view = view;
        self.prompt = None;
        let needs_load = match self.views.get(&view) {
            Some(state) => !state.loaded,
            None => self.analytics.is_none(),
        };
        needs_load.then_some(Command::Load(view))
    }

    fn turn_page(&mut self, forward: bool) -> Option<Command> {
        let view = self.active_view;
        let page_size = self.config.page_size;
        let state = self.current_mut()?;
        let last = total_pages(state.total, page_size);
        let target = if forward {
            (state.page + 1).min(last)
        } else {
            state.page.saturating_sub(1).max(1)
        };
        if target == state.page {
            return None;
        }
        state.page = target;
        state.selected = None;
        Some(Command::Load(view))
    }

    fn selected_label(&self, record: Option<&Value>) -> String {
        match (self.active_view.entity(), record) {
            (Some(kind), Some(record)) => record_label(kind, record),
            _ => String::new(),
        }
    }

    /// Store a loaded page. Selection is kept when still in range.
    pub fn apply_page(&mut self, view: View, page: Page) {
        let Some(state) = self.views.get_mut(&view) else {
            return;
        };
        state.items = page.items;
        state.total = page.total;
        state.page = page.page.max(1);
        state.loaded = true;
        state.selected = match state.selected {
            Some(i) if i < state.items.len() => Some(i),
            _ if state.items.is_empty() => None,
            _ => Some(0),
        };
    }

    pub fn apply_analytics(&mut self, summary: AnalyticsSummary) {
        self.analytics = Some(summary);
    }

    /// Replace the record with the same id after a successful update.
    pub fn apply_updated(&mut self, view: View, record: Value) {
        let Some(state) = self.views.get_mut(&view) else {
            return;
        };
        let id = record.get("id").cloned();
        if let Some(slot) = state.items.iter_mut().find(|r| r.get("id") == id.as_ref()) {
            *slot = record;
        }
        self.notify(NotificationLevel::Success, "Record updated");
    }

    /// Count the new record and reload the page it belongs on.
    pub fn apply_created(&mut self, view: View, record: &Value) -> Command {
        if let Some(state) = self.views.get_mut(&view) {
            state.total += 1;
            state.selected = None;
        }
        let label = view.entity().map(|kind| record_label(kind, record)).unwrap_or_default();
        self.notify(NotificationLevel::Success, format!("Created {}", label).trim_end().to_string());
        Command::Load(view)
    }

    /// Forget the deleted record and reload the page.
    pub fn apply_deleted(&mut self, view: View, id: Uuid) -> Command {
        if let Some(state) = self.views.get_mut(&view) {
            let id = id.to_string();
            state
                .items
                .retain(|r| r.get("id").and_then(Value::as_str) != Some(id.as_str()));
            state.total = (state.total - 1).max(0);
            state.page = state.page.min(total_pages(state.total, self.config.page_size));
            state.selected = None;
        }
        self.notify(NotificationLevel::Success, "Record deleted");
        Command::Load(view)
    }
}

/// First two table columns of a record, used in prompts and notices.
fn record_label(kind: EntityKind, record: &Value) -> String {
    columns(kind)
        .iter()
        .take(2)
        .map(|c| field_text(record, c.path))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn edit_buffer(text: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(c) => text.push(c),
        KeyCode::Backspace => {
            text.pop();
        }
        _ => {}
    }
}
