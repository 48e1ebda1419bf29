use crate::config::Theme;
use crate::models::TaskStatus;
use crate::ui::color_parser::parse_color;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct ThemeTokens {
    pub border_default: Color,
    pub border_focus: Color,
    pub todo: Color,
    pub in_progress: Color,
    pub completed: Color,
    pub selected: Color,
    pub highlight_bg: Color,
    pub time_label: Color,
    pub points: Color,
    pub toast: Color,
}

impl ThemeTokens {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            border_default: parse_color(&theme.border_default),
            border_focus: parse_color(&theme.border_focus),
            todo: parse_color(&theme.todo),
            in_progress: parse_color(&theme.in_progress),
            completed: parse_color(&theme.completed),
            selected: parse_color(&theme.selected),
            highlight_bg: parse_color(&theme.text_highlight),
            time_label: parse_color(&theme.time_label),
            points: parse_color(&theme.points),
            toast: parse_color(&theme.toast),
        }
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_maps_status_colors() {
        let tokens = ThemeTokens::from_theme(&Theme::default());
        assert_eq!(tokens.status_color(TaskStatus::Todo), Color::Yellow);
        assert_eq!(tokens.status_color(TaskStatus::Completed), Color::Green);
        assert_eq!(tokens.selected, Color::Rgb(0xf5, 0xa6, 0x23));
    }
}
