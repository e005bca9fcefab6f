//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        // Clear the area
        frame.render_widget(Clear, area);

        let margin = 4;
        let dialog_area = Rect::new(
            margin,
            margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Navigation");
    add_shortcut(&mut lines, "j / ↓", "Move to next item");
    add_shortcut(&mut lines, "k / ↑", "Move to previous item");
    add_shortcut(&mut lines, "g", "Jump to first item");
    add_shortcut(&mut lines, "G", "Jump to last item");
    add_shortcut(&mut lines, "Tab", "Switch between tables and attributes");

    add_section(&mut lines, "Tables");
    add_shortcut(&mut lines, "Enter", "Show attributes of the highlighted table");
    add_shortcut(&mut lines, "r", "Reload the table list");
    add_shortcut(&mut lines, "s", "Show sample data of the selected table");

    add_section(&mut lines, "Attributes");
    add_shortcut(&mut lines, "Enter / e", "Edit the memo of the highlighted attribute");
    add_shortcut(&mut lines, "s", "Show sample data");

    add_section(&mut lines, "Memo Editor");
    add_shortcut(&mut lines, "Enter", "Save the memo");
    add_shortcut(&mut lines, "Backspace", "Delete last character");
    add_shortcut(&mut lines, "Ctrl+u", "Clear the memo");
    add_shortcut(&mut lines, "Esc", "Close, keeping the draft");

    add_section(&mut lines, "Sample Data");
    add_shortcut(&mut lines, "j / k", "Scroll");
    add_shortcut(&mut lines, "PgUp/PgDn", "Scroll by page");
    add_shortcut(&mut lines, "q / Esc", "Close");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "x", "Dismiss the error banner");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");
    add_shortcut(&mut lines, "Ctrl+c", "Quit immediately");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_lists_memo_keys() {
        let text: Vec<String> = build_help_content().iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("Ctrl+u") && l.contains("Clear the memo")));
        assert!(text.iter().any(|l| l.contains("Dismiss the error banner")));
    }

    #[test]
    fn test_scroll_and_close() {
        let mut dialog = HelpDialog::default();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(dialog.handle_key_event(key(KeyCode::PageDown)).unwrap(), None);
        assert_eq!(dialog.scroll_offset, 10);
        dialog.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(dialog.scroll_offset, 9);
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Char('?'))).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
