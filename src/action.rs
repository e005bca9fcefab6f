//! Action enum - All possible application actions
//!
//! Components turn key events into Actions. Intent actions (refresh, select,
//! sample, save, dismiss) go to the controller; the rest only change
//! presentation state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: apply request replies and expire timers
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,
    /// Setup screen saved a config
    SetupConfirm,

    // ─────────────────────────────────────────────────────────────────────────
    // Intents (handled by the controller)
    // ─────────────────────────────────────────────────────────────────────────
    /// Reload the table list
    RefreshTables,
    /// Select a table, or clear the selection with `None`
    SelectTable(Option<String>),
    /// Fetch sample rows for the selected table
    ShowSample,
    /// Persist the edited memo of an attribute
    SaveMemo(String),
    /// Hide the error banner
    DismissError,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextItem,
    PrevItem,
    FirstItem,
    LastItem,
    /// Switch focus between the table list and the attribute cards
    FocusNext,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling (sample overlay)
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals & Overlays
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    OpenMemoEditor(String),
    CloseModal,
    CloseSample,

    // ─────────────────────────────────────────────────────────────────────────
    // Memo Editing
    // ─────────────────────────────────────────────────────────────────────────
    MemoInput(char),
    MemoBackspace,
    MemoClear,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::SetupConfirm => write!(f, "SetupConfirm"),
            Action::RefreshTables => write!(f, "RefreshTables"),
            Action::SelectTable(Some(name)) => write!(f, "SelectTable({})", name),
            Action::SelectTable(None) => write!(f, "SelectTable(none)"),
            Action::ShowSample => write!(f, "ShowSample"),
            Action::SaveMemo(name) => write!(f, "SaveMemo({})", name),
            Action::DismissError => write!(f, "DismissError"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::FocusNext => write!(f, "FocusNext"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenMemoEditor(name) => write!(f, "OpenMemoEditor({})", name),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::CloseSample => write!(f, "CloseSample"),
            Action::MemoInput(c) => write!(f, "MemoInput('{}')", c),
            Action::MemoBackspace => write!(f, "MemoBackspace"),
            Action::MemoClear => write!(f, "MemoClear"),
        }
    }
}
