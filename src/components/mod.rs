//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod attribute_cards;
pub mod help_dialog;
pub mod layout;
pub mod memo_editor;
pub mod quit_dialog;
pub mod sample_dialog;
pub mod setup;
pub mod status_bar;
pub mod table_selector;

pub use attribute_cards::AttributeCards;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use memo_editor::MemoEditor;
pub use quit_dialog::QuitDialog;
pub use sample_dialog::SampleDialog;
pub use setup::SetupComponent;
pub use status_bar::{render_error_banner, render_help_bar, render_status_bar, StatusContext};
pub use table_selector::TableSelector;
