//! View layer
//!
//! The controller talks to the display only through the `View` trait.
//! `Screen` is the in-memory display surface the terminal components draw
//! from; tests substitute a recording stub.

pub mod render;
pub mod screen;

use crate::model::{SampleRow, TableInfo};

pub use render::{
    AttributeCard, AttributesPanel, SampleBlock, SamplePanel, SaveFeedback, TableOption,
};
pub use screen::Screen;

/// Capability interface for everything the controller may display
pub trait View {
    fn render_table_options(&mut self, names: &[String]);

    /// Replace the attributes panel. Always hides the sample panel.
    fn render_attributes_panel(&mut self, table_info: &TableInfo);

    fn hide_attributes_panel(&mut self);

    fn render_sample_panel(&mut self, samples: &[SampleRow]);

    fn hide_sample_panel(&mut self);

    fn render_error(&mut self, message: &str);

    fn clear_error(&mut self);

    fn render_loading(&mut self, loading: bool);

    fn render_save_feedback(&mut self, attribute_name: &str, feedback: SaveFeedback);

    /// Current text of the memo input for an attribute card
    fn memo_input(&self, attribute_name: &str) -> Option<String>;
}
