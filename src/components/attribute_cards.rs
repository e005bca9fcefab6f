//! Attribute cards pane
//!
//! One dotted box per attribute with its type badge, memo and last-seen
//! time. The highlighted card is the one the memo editor opens for.

use crate::action::Action;
use crate::component::Component;
use crate::model::TypeBadge;
use crate::view::render::{EMPTY_ATTRIBUTES_MESSAGE, PLACEHOLDER_LABEL};
use crate::view::{AttributeCard, AttributesPanel, SaveFeedback};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Lines taken by one card, borders included
const CARD_HEIGHT: usize = 5;

#[derive(Default)]
pub struct AttributeCards {
    pub selected: usize,
    pub scroll_offset: usize,
    table_name: Option<String>,
    names: Vec<String>,
}

impl AttributeCards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the latest panel. Returns `true` when it now shows another table.
    pub fn sync(&mut self, panel: &AttributesPanel) -> bool {
        let table_name = panel.table_name().map(str::to_string);
        let changed = table_name != self.table_name;

        self.table_name = table_name;
        self.names = panel
            .cards()
            .iter()
            .map(|card| card.attribute_name.clone())
            .collect();

        if changed {
            self.selected = 0;
            self.scroll_offset = 0;
        } else {
            self.selected = self.selected.min(self.names.len().saturating_sub(1));
        }
        changed
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.names.get(self.selected).map(String::as_str)
    }

    pub fn next(&mut self) {
        if !self.names.is_empty() {
            self.selected = (self.selected + 1) % self.names.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.names.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.names.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.names.len().saturating_sub(1);
    }

    pub fn draw_with_panel(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        panel: &AttributesPanel,
        focused: bool,
    ) {
        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let title = match panel.table_name() {
            Some(name) => format!(" Attributes: {} ", name),
            None => " Attributes ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color));

        let lines: Vec<Line<'static>> = match panel {
            AttributesPanel::Hidden => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", PLACEHOLDER_LABEL),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            AttributesPanel::Empty { .. } => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", EMPTY_ATTRIBUTES_MESSAGE),
                    Style::default().fg(Color::Yellow),
                )),
            ],
            AttributesPanel::Cards { cards, .. } => {
                let box_width = area.width.saturating_sub(3) as usize;
                cards
                    .iter()
                    .enumerate()
                    .flat_map(|(i, card)| {
                        build_card_lines(card, box_width, focused && i == self.selected)
                    })
                    .collect()
            }
        };

        let visible_height = area.height.saturating_sub(2) as usize;
        self.scroll_to_selected(visible_height);

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, area);
    }

    /// Keep the whole selected card inside the visible rows
    fn scroll_to_selected(&mut self, visible_height: usize) {
        let top = self.selected * CARD_HEIGHT;
        let bottom = top + CARD_HEIGHT;
        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + visible_height {
            self.scroll_offset = bottom.saturating_sub(visible_height);
        }
    }
}

impl Component for AttributeCards {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),
            KeyCode::Enter | KeyCode::Char('e') => self
                .selected_name()
                .map(|name| Action::OpenMemoEditor(name.to_string())),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => self.next(),
            Action::PrevItem => self.previous(),
            Action::FirstItem => self.select_first(),
            Action::LastItem => self.select_last(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the attributes panel, so App calls draw_with_panel
        Ok(())
    }
}

pub fn badge_style(badge: TypeBadge) -> (&'static str, Color) {
    match badge {
        TypeBadge::String => ("S", Color::Green),
        TypeBadge::Number => ("N", Color::Yellow),
        TypeBadge::Binary => ("B", Color::Magenta),
        TypeBadge::Other => ("?", Color::DarkGray),
    }
}

fn build_card_lines(card: &AttributeCard, box_width: usize, selected: bool) -> Vec<Line<'static>> {
    let border_color = if selected { Color::Cyan } else { Color::DarkGray };
    let border = Style::default().fg(border_color);
    let inner_width = box_width.saturating_sub(4);

    let (badge_text, badge_color) = badge_style(card.badge);
    let badge = format!("[{}]", badge_text);
    let saved = match card.feedback {
        SaveFeedback::Saved => " Saved!",
        SaveFeedback::Idle => "",
    };
    let marker = if selected { "▶ " } else { "  " };
    let type_hint = format!(" {}", card.type_hint);

    let fixed = marker.width() + badge.width() + 1 + type_hint.width() + saved.width();
    let name = truncate_to_width(&card.attribute_name, inner_width.saturating_sub(fixed));
    let header_padding = inner_width.saturating_sub(fixed + name.width());

    let name_style = if selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let (memo, memo_style) = if card.memo_input.is_empty() {
        ("(no memo)".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (
            truncate_to_width(&card.memo_input.replace('\n', " "), inner_width.saturating_sub(2)),
            Style::default().fg(Color::White),
        )
    };

    let last_seen = format!(
        "last seen: {}",
        card.last_seen.as_deref().unwrap_or("-")
    );
    let last_seen = truncate_to_width(&last_seen, inner_width.saturating_sub(2));

    vec![
        Line::from(Span::styled(
            format!("┌{}┐", "╌".repeat(box_width.saturating_sub(2))),
            border,
        )),
        Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(
                badge,
                Style::default()
                    .fg(badge_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(name, name_style),
            Span::styled(type_hint, Style::default().fg(Color::DarkGray)),
            Span::raw(" ".repeat(header_padding)),
            Span::styled(
                saved,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │", border),
        ]),
        padded_line(&memo, memo_style, inner_width, border),
        padded_line(&last_seen, Style::default().fg(Color::DarkGray), inner_width, border),
        Line::from(Span::styled(
            format!("└{}┘", "╌".repeat(box_width.saturating_sub(2))),
            border,
        )),
    ]
}

fn padded_line(text: &str, style: Style, inner_width: usize, border: Style) -> Line<'static> {
    let padding = inner_width.saturating_sub(text.width() + 2);
    Line::from(vec![
        Span::styled("│   ", border),
        Span::styled(text.to_string(), style),
        Span::raw(" ".repeat(padding)),
        Span::styled(" │", border),
    ])
}

/// Cut `text` to at most `max_width` display columns, ending with an ellipsis
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width + 1 > max_width {
            break;
        }
        out.push(c);
        width += char_width;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeInfo, TableInfo};
    use crate::view::render::attributes_panel;
    use crossterm::event::KeyModifiers;

    fn panel(table: &str, names: &[&str]) -> AttributesPanel {
        attributes_panel(&TableInfo {
            table_name: table.to_string(),
            attributes: names
                .iter()
                .map(|n| AttributeInfo::new(*n, "string"))
                .collect(),
        })
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        // Wide characters take two columns each
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本語…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_sync_resets_selection_on_table_change() {
        let mut cards = AttributeCards::new();
        assert!(cards.sync(&panel("users", &["id", "name", "email"])));
        cards.update(Action::LastItem).unwrap();
        assert_eq!(cards.selected_name(), Some("email"));

        // Same table re-rendered: selection stays
        assert!(!cards.sync(&panel("users", &["id", "name", "email"])));
        assert_eq!(cards.selected_name(), Some("email"));

        assert!(cards.sync(&panel("orders", &["order_id"])));
        assert_eq!(cards.selected_name(), Some("order_id"));

        assert!(cards.sync(&AttributesPanel::Hidden));
        assert_eq!(cards.selected_name(), None);
    }

    #[test]
    fn test_enter_opens_editor_for_selected_card() {
        let mut cards = AttributeCards::new();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(cards.handle_key_event(enter).unwrap(), None);

        cards.sync(&panel("users", &["id", "name"]));
        cards.update(Action::NextItem).unwrap();
        assert_eq!(
            cards.handle_key_event(enter).unwrap(),
            Some(Action::OpenMemoEditor("name".to_string()))
        );

        cards.update(Action::NextItem).unwrap();
        assert_eq!(cards.selected_name(), Some("id"));
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut cards = AttributeCards::new();
        cards.sync(&panel("t", &["a", "b", "c", "d"]));

        cards.selected = 3;
        cards.scroll_to_selected(8);
        assert_eq!(cards.scroll_offset, 4 * CARD_HEIGHT - 8);

        cards.selected = 0;
        cards.scroll_to_selected(8);
        assert_eq!(cards.scroll_offset, 0);
    }

    #[test]
    fn test_card_lines_show_feedback_and_fit_width() {
        let mut card = crate::view::render::attribute_card(
            &AttributeInfo::new("id", "number").with_description("primary key"),
        );
        card.feedback = SaveFeedback::Saved;

        let lines = build_card_lines(&card, 40, true);
        assert_eq!(lines.len(), CARD_HEIGHT);

        let header: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(header.contains("[N]"));
        assert!(header.contains("Saved!"));
        assert!(lines.iter().all(|line| line.width() == 40));
    }
}
