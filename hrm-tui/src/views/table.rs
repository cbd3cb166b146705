//! Paged record table with a detail panel for the selected row.

use crate::state::{columns, detail_fields, field_text, total_pages, App};
use crate::theme::cell_color;
use crate::widgets::DetailPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (Some(kind), Some(state)) = (app.active_view.entity(), app.current()) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let cols = columns(kind);
    let header = Row::new(cols.iter().map(|c| {
        Cell::from(c.header).style(
            Style::default()
                .fg(app.theme.secondary)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = state.items.iter().map(|record| {
        Row::new(cols.iter().map(|c| {
            let text = field_text(record, c.path);
            let color = cell_color(c.path, &text, &app.theme);
            Cell::from(text).style(Style::default().fg(color))
        }))
    });
    let widths: Vec<Constraint> = cols.iter().map(|c| Constraint::Length(c.width)).collect();

    let mut title = format!(
        "{} | page {}/{} | {} total",
        app.active_view.title(),
        state.page,
        total_pages(state.total, app.config.page_size),
        state.total
    );
    if !state.search.is_empty() {
        title.push_str(&format!(" | search: {}", state.search));
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus))
                .title(Span::styled(title, Style::default().fg(app.theme.primary))),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme.bg_highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(state.selected);
    f.render_stateful_widget(table, chunks[0], &mut table_state);

    let fields = state
        .selected_record()
        .map(detail_fields)
        .unwrap_or_default();
    let panel = DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
    };
    panel.render(f, chunks[1]);
}
