//! UI state - presentation state separate from domain data

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// No backend URL configured yet
    Setup,
    Running,
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tables,
    Attributes,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Tables => Focus::Attributes,
            Focus::Attributes => Focus::Tables,
        }
    }
}
