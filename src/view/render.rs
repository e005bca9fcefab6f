//! Pure builders from fetched data to display structures
//!
//! Every builder produces a complete replacement for its region; nothing is
//! diffed against what was shown before.

use crate::model::{AttributeInfo, SampleRow, TableInfo, TypeBadge};

pub const PLACEHOLDER_LABEL: &str = "Select a table";
pub const EMPTY_ATTRIBUTES_MESSAGE: &str = "No attribute information.";
pub const EMPTY_SAMPLES_MESSAGE: &str = "No sample data.";

/// Transient state of a card's save action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFeedback {
    #[default]
    Idle,
    Saved,
}

/// One entry of the table selector. The placeholder has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOption {
    pub label: String,
    pub value: Option<String>,
}

impl TableOption {
    pub fn placeholder() -> Self {
        Self {
            label: PLACEHOLDER_LABEL.to_string(),
            value: None,
        }
    }

    /// The option value as the selector reports it (`""` for the placeholder)
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Display block for one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCard {
    pub attribute_name: String,
    pub type_hint: String,
    pub badge: TypeBadge,
    /// Editable memo text, pre-filled with the stored description
    pub memo_input: String,
    pub last_seen: Option<String>,
    pub feedback: SaveFeedback,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttributesPanel {
    #[default]
    Hidden,
    Empty {
        table_name: String,
    },
    Cards {
        table_name: String,
        cards: Vec<AttributeCard>,
    },
}

impl AttributesPanel {
    pub fn is_visible(&self) -> bool {
        !matches!(self, AttributesPanel::Hidden)
    }

    pub fn table_name(&self) -> Option<&str> {
        match self {
            AttributesPanel::Hidden => None,
            AttributesPanel::Empty { table_name } | AttributesPanel::Cards { table_name, .. } => {
                Some(table_name)
            }
        }
    }

    pub fn cards(&self) -> &[AttributeCard] {
        match self {
            AttributesPanel::Cards { cards, .. } => cards,
            _ => &[],
        }
    }

    pub fn cards_mut(&mut self) -> &mut [AttributeCard] {
        match self {
            AttributesPanel::Cards { cards, .. } => cards,
            _ => &mut [],
        }
    }
}

/// One formatted sample row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBlock {
    pub label: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SamplePanel {
    #[default]
    Hidden,
    Empty,
    Blocks(Vec<SampleBlock>),
}

impl SamplePanel {
    pub fn is_visible(&self) -> bool {
        !matches!(self, SamplePanel::Hidden)
    }
}

/// Placeholder first, then one option per name in the order received
pub fn table_options(names: &[String]) -> Vec<TableOption> {
    std::iter::once(TableOption::placeholder())
        .chain(names.iter().map(|name| TableOption {
            label: name.clone(),
            value: Some(name.clone()),
        }))
        .collect()
}

pub fn attribute_card(attribute: &AttributeInfo) -> AttributeCard {
    AttributeCard {
        attribute_name: attribute.attribute_name.clone(),
        type_hint: attribute.type_hint.clone(),
        badge: TypeBadge::from_hint(&attribute.type_hint),
        memo_input: attribute.description.clone().unwrap_or_default(),
        last_seen: attribute.formatted_last_seen(),
        feedback: SaveFeedback::Idle,
    }
}

pub fn attributes_panel(table_info: &TableInfo) -> AttributesPanel {
    let table_name = table_info.table_name.clone();
    if table_info.attributes.is_empty() {
        AttributesPanel::Empty { table_name }
    } else {
        AttributesPanel::Cards {
            table_name,
            cards: table_info.attributes.iter().map(attribute_card).collect(),
        }
    }
}

pub fn sample_panel(samples: &[SampleRow]) -> SamplePanel {
    if samples.is_empty() {
        return SamplePanel::Empty;
    }

    SamplePanel::Blocks(
        samples
            .iter()
            .enumerate()
            .map(|(index, sample)| SampleBlock {
                label: format!("Sample {}", index + 1),
                body: serde_json::to_string_pretty(sample).unwrap_or_else(|_| sample.to_string()),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_options_placeholder_first_in_order() {
        for list in [vec!["a"], vec!["users", "orders"], vec!["z", "y", "x", "w"]] {
            let options = table_options(&names(&list));

            assert_eq!(options.len(), list.len() + 1);
            assert_eq!(options[0], TableOption::placeholder());
            let values: Vec<&str> = options[1..].iter().map(|o| o.value_str()).collect();
            assert_eq!(values, list);
        }
    }

    #[test]
    fn test_table_options_values() {
        let options = table_options(&names(&["users", "orders"]));
        let values: Vec<&str> = options.iter().map(|o| o.value_str()).collect();
        assert_eq!(values, vec!["", "users", "orders"]);
    }

    #[test]
    fn test_attributes_panel_empty() {
        let panel = attributes_panel(&TableInfo {
            table_name: "empty".to_string(),
            attributes: vec![],
        });

        assert_eq!(
            panel,
            AttributesPanel::Empty {
                table_name: "empty".to_string()
            }
        );
        assert!(panel.cards().is_empty());
    }

    #[test]
    fn test_attributes_panel_one_card_per_attribute() {
        let info = TableInfo {
            table_name: "orders".to_string(),
            attributes: vec![
                AttributeInfo::new("id", "number"),
                AttributeInfo::new("status", "string").with_description("order status"),
                AttributeInfo::new("blob", "binary"),
            ],
        };

        let panel = attributes_panel(&info);
        let cards = panel.cards();

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].memo_input, "");
        assert_eq!(cards[1].memo_input, "order status");
        assert_eq!(cards[2].badge, TypeBadge::Binary);
        assert!(cards.iter().all(|c| c.feedback == SaveFeedback::Idle));
    }

    #[test]
    fn test_sample_panel_labels_are_one_indexed() {
        let panel = sample_panel(&[json!({"id": 1}), json!({"id": 2})]);

        let SamplePanel::Blocks(blocks) = panel else {
            panic!("expected sample blocks");
        };
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].label, "Sample 1");
        assert_eq!(blocks[1].label, "Sample 2");
        assert_eq!(blocks[0].body, "{\n  \"id\": 1\n}");
    }

    #[test]
    fn test_sample_panel_empty() {
        assert_eq!(sample_panel(&[]), SamplePanel::Empty);
    }
}
