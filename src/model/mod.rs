//! Model layer - centralized state management
//!
//! - `AppState` - the selected table and its attributes
//! - `TableInfo` / `AttributeInfo` - backend payloads
//! - `ModalStack` - modal overlay management

pub mod modal;
pub mod state;
pub mod table;
pub mod ui;

pub use state::AppState;
pub use table::{AttributeInfo, SampleRow, TableInfo, TypeBadge};
