//! In-memory display surface

use super::render::{self, AttributeCard, AttributesPanel, SamplePanel, SaveFeedback, TableOption};
use super::View;
use crate::model::{SampleRow, TableInfo};

/// Everything currently shown, region by region
#[derive(Debug, Clone)]
pub struct Screen {
    pub table_options: Vec<TableOption>,
    pub attributes: AttributesPanel,
    pub samples: SamplePanel,
    pub error: Option<String>,
    pub loading: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            table_options: vec![TableOption::placeholder()],
            attributes: AttributesPanel::Hidden,
            samples: SamplePanel::Hidden,
            error: None,
            loading: false,
        }
    }

    pub fn card(&self, attribute_name: &str) -> Option<&AttributeCard> {
        self.attributes
            .cards()
            .iter()
            .find(|card| card.attribute_name == attribute_name)
    }

    fn card_mut(&mut self, attribute_name: &str) -> Option<&mut AttributeCard> {
        self.attributes
            .cards_mut()
            .iter_mut()
            .find(|card| card.attribute_name == attribute_name)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Memo editing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn push_memo_char(&mut self, attribute_name: &str, c: char) {
        if let Some(card) = self.card_mut(attribute_name) {
            card.memo_input.push(c);
        }
    }

    pub fn pop_memo_char(&mut self, attribute_name: &str) {
        if let Some(card) = self.card_mut(attribute_name) {
            card.memo_input.pop();
        }
    }

    pub fn clear_memo_input(&mut self, attribute_name: &str) {
        if let Some(card) = self.card_mut(attribute_name) {
            card.memo_input.clear();
        }
    }
}

impl View for Screen {
    fn render_table_options(&mut self, names: &[String]) {
        self.table_options = render::table_options(names);
    }

    fn render_attributes_panel(&mut self, table_info: &TableInfo) {
        self.attributes = render::attributes_panel(table_info);
        self.samples = SamplePanel::Hidden;
    }

    fn hide_attributes_panel(&mut self) {
        self.attributes = AttributesPanel::Hidden;
    }

    fn render_sample_panel(&mut self, samples: &[SampleRow]) {
        self.samples = render::sample_panel(samples);
    }

    fn hide_sample_panel(&mut self) {
        self.samples = SamplePanel::Hidden;
    }

    fn render_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn render_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn render_save_feedback(&mut self, attribute_name: &str, feedback: SaveFeedback) {
        if let Some(card) = self.card_mut(attribute_name) {
            card.feedback = feedback;
        }
    }

    fn memo_input(&self, attribute_name: &str) -> Option<String> {
        self.card(attribute_name).map(|card| card.memo_input.clone())
    }
}
