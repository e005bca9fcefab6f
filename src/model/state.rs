//! Application state - the currently selected table and its attributes

use super::table::{AttributeInfo, TableInfo};

/// Owned record of the current selection
///
/// Only one table is held at a time. Selecting another table replaces
/// both fields together.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppState {
    pub current_table: Option<String>,
    pub current_attributes: Vec<AttributeInfo>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a freshly fetched table
    pub fn select(&mut self, table_info: TableInfo) {
        self.current_table = Some(table_info.table_name);
        self.current_attributes = table_info.attributes;
    }

    pub fn clear(&mut self) {
        self.current_table = None;
        self.current_attributes.clear();
    }

    /// Overwrite the description of the named attribute
    ///
    /// Returns `false` and leaves state untouched when no attribute has
    /// that name.
    pub fn update_memo(&mut self, attribute_name: &str, description: &str) -> bool {
        match self
            .current_attributes
            .iter_mut()
            .find(|attr| attr.attribute_name == attribute_name)
        {
            Some(attr) => {
                attr.description = Some(description.to_string());
                true
            }
            None => false,
        }
    }

    pub fn attribute(&self, attribute_name: &str) -> Option<&AttributeInfo> {
        self.current_attributes
            .iter()
            .find(|attr| attr.attribute_name == attribute_name)
    }

    pub fn is_current(&self, table_name: &str) -> bool {
        self.current_table.as_deref() == Some(table_name)
    }
}
