//! Organization analytics: overall rating, bonus total and headcount.

use crate::state::App;
use crate::theme::rating_color;
use crate::widgets::ProgressBar;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{BarChart, Block, Borders, Paragraph},
    Frame,
};

/// Top of the review rating scale.
const RATING_MAX: f32 = 5.0;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(summary) = &app.analytics else {
        let empty = Paragraph::new("No analytics loaded. Press r to refresh.")
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().borders(Borders::ALL).title("Analytics"));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let rating_style = Style::default().fg(rating_color(summary.average_rating_overall, &app.theme));
    let gauge = ProgressBar {
        title: format!("Average rating {:.2} / 5", summary.average_rating_overall),
        value: summary.average_rating_overall as f32,
        max: RATING_MAX,
        style: rating_style,
    };
    gauge.render(f, chunks[0]);

    let bonus = Paragraph::new(Line::from(format!("{:.2}", summary.total_bonus_paid)))
        .style(Style::default().fg(app.theme.tertiary))
        .block(Block::default().borders(Borders::ALL).title("Total bonus paid"));
    f.render_widget(bonus, chunks[1]);

    let data: Vec<(&str, u64)> = summary
        .headcount_by_department
        .iter()
        .map(|row| (row.name.as_str(), row.c.max(0) as u64))
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Headcount by department"),
        )
        .data(data.as_slice())
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(app.theme.primary))
        .value_style(Style::default().fg(app.theme.bg).bg(app.theme.primary));
    f.render_widget(chart, chunks[2]);
}
