//! Table selector pane
//!
//! Lists the options rendered by the view, placeholder first. Enter asks the
//! controller to select the highlighted option.

use crate::action::Action;
use crate::component::Component;
use crate::view::TableOption;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

#[derive(Default)]
pub struct TableSelector {
    pub list_state: ListState,
    /// Option values in display order, synced before each draw
    values: Vec<Option<String>>,
}

impl TableSelector {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            values: vec![None],
        }
    }

    /// Take the latest options, keeping the highlight on the same table
    pub fn sync(&mut self, options: &[TableOption]) {
        let previous = self.selected_value();
        self.values = options.iter().map(|o| o.value.clone()).collect();

        let index = previous
            .and_then(|value| {
                self.values
                    .iter()
                    .position(|v| v.as_deref() == Some(value.as_str()))
            })
            .or_else(|| self.list_state.selected())
            .map(|i| i.min(self.values.len().saturating_sub(1)));

        if self.values.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(index.or(Some(0)));
        }
    }

    pub fn selected_value(&self) -> Option<String> {
        self.list_state
            .selected()
            .and_then(|i| self.values.get(i))
            .cloned()
            .flatten()
    }

    pub fn next(&mut self) {
        if self.values.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((current + 1) % self.values.len()));
    }

    pub fn previous(&mut self) {
        if self.values.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let prev = if current == 0 {
            self.values.len() - 1
        } else {
            current - 1
        };
        self.list_state.select(Some(prev));
    }

    pub fn select_first(&mut self) {
        if !self.values.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.values.is_empty() {
            self.list_state.select(Some(self.values.len() - 1));
        }
    }

    /// Draw the list, marking the table whose attributes are shown
    pub fn draw_with_options(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        options: &[TableOption],
        current: Option<&str>,
        focused: bool,
    ) {
        let items: Vec<ListItem> = options
            .iter()
            .map(|option| match option.value.as_deref() {
                None => ListItem::new(Line::from(Span::styled(
                    format!("  {}", option.label),
                    Style::default().fg(Color::DarkGray),
                ))),
                Some(value) => {
                    let is_current = current == Some(value);
                    let marker = if is_current { "● " } else { "  " };
                    let style = if is_current {
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Green)),
                        Span::styled(option.label.clone(), style),
                    ]))
                }
            })
            .collect();

        let table_count = options.iter().filter(|o| o.value.is_some()).count();
        let border_color = if focused { Color::Cyan } else { Color::DarkGray };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Tables ({}) ", table_count))
                    .border_style(Style::default().fg(border_color)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl Component for TableSelector {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),
            KeyCode::Enter => Some(Action::SelectTable(self.selected_value())),
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
        // Needs the rendered options, so App calls draw_with_options
        Ok(())
    }
}
