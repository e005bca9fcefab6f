//! Memo editor popup
//!
//! Edits the memo text of one attribute card in place. Closing with Esc keeps
//! the draft on the card; Enter saves it.

use crate::action::Action;
use crate::component::Component;
use crate::components::attribute_cards::badge_style;
use crate::components::centered_popup;
use crate::view::{AttributeCard, SaveFeedback};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct MemoEditor {
    pub attribute_name: String,
}

impl MemoEditor {
    pub fn open(&mut self, attribute_name: &str) {
        self.attribute_name = attribute_name.to_string();
    }

    pub fn draw_with_card(&self, frame: &mut Frame, area: Rect, card: &AttributeCard) {
        let popup_area = centered_popup(area, 64, 12);
        frame.render_widget(Clear, popup_area);

        let (badge, badge_color) = badge_style(card.badge);
        let status = match card.feedback {
            SaveFeedback::Saved => Span::styled(
                "Saved!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            SaveFeedback::Idle => Span::raw(""),
        };

        let content = vec![
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", badge),
                    Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    card.attribute_name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({})", card.type_hint),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("> {}_", card.memo_input),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
            Line::from(status),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("Save  "),
                Span::styled(" Ctrl+u ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw("Clear  "),
                Span::styled(" Esc ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw("Close"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(" Edit Memo ")
                    .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}

impl Component for MemoEditor {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SaveMemo(self.attribute_name.clone())),
            KeyCode::Backspace => Some(Action::MemoBackspace),
            KeyCode::Char('u') if ctrl => Some(Action::MemoClear),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(Action::MemoInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the edited card, so App calls draw_with_card
        Ok(())
    }
}
