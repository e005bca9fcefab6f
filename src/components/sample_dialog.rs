//! Sample data overlay
//!
//! Shows the sample rows of the selected table as pretty-printed JSON blocks.

use crate::action::Action;
use crate::component::Component;
use crate::view::render::EMPTY_SAMPLES_MESSAGE;
use crate::view::SamplePanel;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct SampleDialog {
    pub scroll_offset: usize,
}

impl Component for SampleDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => Some(Action::CloseSample),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            Action::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(20);
            }
            Action::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(20);
            }
            Action::CloseSample => {
                self.scroll_offset = 0;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the sample panel, so App calls draw_with_panel
        Ok(())
    }
}

impl SampleDialog {
    pub fn draw_with_panel(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        panel: &SamplePanel,
        table_name: Option<&str>,
    ) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 2;
        let overlay_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay_area);

        let content_area = chunks[0];
        let help_area = chunks[1];

        let content_lines = build_sample_lines(panel);
        let total = content_lines.len();
        let visible_height = content_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let title = format!(" Sample Data: {} ", table_name.unwrap_or("-"));

        let paragraph = Paragraph::new(content_lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Green)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, content_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                content_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        let help_text = Line::from(vec![
            Span::styled("j/k", Style::default().fg(Color::Cyan)),
            Span::raw(" Scroll  "),
            Span::styled("PgUp/PgDn", Style::default().fg(Color::Cyan)),
            Span::raw(" Page  "),
            Span::styled("q/Esc", Style::default().fg(Color::Cyan)),
            Span::raw(" Close"),
        ]);

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .style(Style::default().fg(Color::DarkGray));

        frame.render_widget(help, help_area);

        Ok(())
    }
}

fn build_sample_lines(panel: &SamplePanel) -> Vec<Line<'static>> {
    match panel {
        SamplePanel::Hidden => Vec::new(),
        SamplePanel::Empty => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", EMPTY_SAMPLES_MESSAGE),
                Style::default().fg(Color::Yellow),
            )),
        ],
        SamplePanel::Blocks(blocks) => {
            let mut lines = Vec::new();
            for block in blocks {
                lines.push(Line::from(Span::styled(
                    format!("  {}", block.label),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
                for body_line in block.body.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", body_line),
                        Style::default().fg(Color::White),
                    )));
                }
                lines.push(Line::from(""));
            }
            lines
        }
    }
}
