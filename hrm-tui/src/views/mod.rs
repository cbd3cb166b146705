//! View rendering dispatch.

pub mod analytics;
pub mod table;

use crate::nav::View;
use crate::state::{App, Prompt};
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

const HELP: &str = "j/k move • [ ] page • Tab switch view • / search • a add • e edit • d delete • r refresh • q quit";

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Analytics => analytics::render(f, app, layout[1]),
        _ => table::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let titles: Vec<Line> = View::all()
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_view.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(Span::styled(
                    format!("HRM Admin | {}", app.config.api_base_url),
                    Style::default().fg(app.theme.primary),
                )),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = match &app.prompt {
        Some(Prompt::Search(buffer)) => (
            format!("search: {}_", buffer),
            Style::default().fg(app.theme.tertiary),
        ),
        Some(Prompt::Edit(buffer)) => (
            format!("edit (field=value): {}_", buffer),
            Style::default().fg(app.theme.tertiary),
        ),
        Some(Prompt::Create(buffer)) => (
            format!("new (field=value; field=value): {}_", buffer),
            Style::default().fg(app.theme.tertiary),
        ),
        Some(Prompt::ConfirmDelete { label, .. }) => (
            format!("Delete {}? y to confirm, any other key cancels", label),
            Style::default().fg(app.theme.error),
        ),
        None => match app.notifications.last() {
            Some(note) => (
                format!("{}: {}", note.level.label(), note.message),
                Style::default().fg(notification_color(note.level, &app.theme)),
            ),
            None => (HELP.to_string(), Style::default().fg(app.theme.text_dim)),
        },
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(style);
    f.render_widget(footer, area);
}
