//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub tables: Rect,
    pub attributes: Rect,
    pub error: Option<Rect>,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout
///
/// The error banner sits between the status line and the help bar and only
/// takes space while an error is shown.
pub fn calculate_main_layout(area: Rect, has_error: bool) -> MainLayout {
    let main_chunks = if has_error {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area)
    };

    // Horizontal split: table list (30%) and attribute cards (70%)
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_chunks[0]);

    let (error_area, status_area, help_area) = if has_error {
        (Some(main_chunks[2]), main_chunks[1], main_chunks[3])
    } else {
        (None, main_chunks[1], main_chunks[2])
    };

    MainLayout {
        tables: horizontal_chunks[0],
        attributes: horizontal_chunks[1],
        error: error_area,
        status: status_area,
        help: help_area,
    }
}
