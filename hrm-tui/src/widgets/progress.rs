//! Gauge for a value on a bounded scale.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

pub struct ProgressBar {
    pub title: String,
    pub value: f32,
    pub max: f32,
    pub style: Style,
}

impl ProgressBar {
    /// Fill ratio clamped to `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            f64::from((self.value / self.max).clamp(0.0, 1.0))
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().title(self.title.as_str()).borders(Borders::ALL))
            .gauge_style(self.style)
            .ratio(self.ratio());
        f.render_widget(gauge, area);
    }
}
