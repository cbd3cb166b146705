//! SynthBrute theme and color utilities.

use crate::notifications::NotificationLevel;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct SynthBruteTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub secondary_dim: Color,
    pub tertiary: Color,
    pub tertiary_dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl SynthBruteTheme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_secondary: Color::Rgb(26, 26, 26),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            secondary_dim: Color::Rgb(136, 0, 136),
            tertiary: Color::Rgb(255, 255, 0),
            tertiary_dim: Color::Rgb(136, 136, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            text_muted: Color::Rgb(68, 68, 68),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }
}

/// Color for an attendance status string as the API renders it.
pub fn attendance_status_color(status: &str, theme: &SynthBruteTheme) -> Color {
    match status.trim().to_ascii_lowercase().as_str() {
        "present" => theme.success,
        "remote" => theme.primary,
        "leave" => theme.warning,
        "absent" => theme.error,
        _ => theme.text_dim,
    }
}

/// Ratings of 4 and above read as strong, below 2.5 as weak.
pub fn rating_color(rating: f64, theme: &SynthBruteTheme) -> Color {
    if rating >= 4.0 {
        theme.success
    } else if rating >= 2.5 {
        theme.warning
    } else {
        theme.error
    }
}

pub fn active_color(active: bool, theme: &SynthBruteTheme) -> Color {
    if active {
        theme.success
    } else {
        theme.text_muted
    }
}

pub fn notification_color(level: NotificationLevel, theme: &SynthBruteTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}

/// Per-cell color for a table column, keyed on its JSON path.
pub fn cell_color(path: &str, text: &str, theme: &SynthBruteTheme) -> Color {
    match path {
        "status" => attendance_status_color(text, theme),
        "is_active" => active_color(text == "yes", theme),
        "rating" => text
            .parse::<f64>()
            .map(|r| rating_color(r, theme))
            .unwrap_or(theme.text),
        _ => theme.text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_colors() {
        let theme = SynthBruteTheme::synthbrute();
        assert_eq!(attendance_status_color("present", &theme), theme.success);
        assert_eq!(attendance_status_color("ABSENT", &theme), theme.error);
        assert_eq!(attendance_status_color("unknown", &theme), theme.text_dim);
    }

    #[test]
    fn test_rating_thresholds() {
        let theme = SynthBruteTheme::synthbrute();
        assert_eq!(rating_color(4.0, &theme), theme.success);
        assert_eq!(rating_color(3.9, &theme), theme.warning);
        assert_eq!(rating_color(1.0, &theme), theme.error);
        assert_eq!(cell_color("rating", "4.5", &theme), theme.success);
        assert_eq!(cell_color("name", "4.5", &theme), theme.text);
    }
}
