//! Block template registry.
//!
//! The registry is the single source of truth for which block types a host
//! supports and what a freshly inserted block of each type contains. Hosts
//! can trim the standard set or register their own defaults; the load path
//! and `AddBlock` both consult the same registry, so an unsupported type can
//! neither load nor be inserted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{BlockData, BlockType};

/// Per-type template: picker label, picker description, and the data payload
/// a new block of that type starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub display_name: String,
    pub description: String,
    pub default_data: BlockData,
}

/// Registry of supported block types.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRegistry {
    templates: BTreeMap<BlockType, BlockTemplate>,
}

impl TemplateRegistry {
    /// Registry with no types. Every load filters everything out and every
    /// `AddBlock` no-ops; useful as a base for hosts that register their own
    /// subset.
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// The standard checkout block set.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(
            BlockType::Header,
            BlockTemplate {
                display_name: "Header".to_string(),
                description: "Page heading with optional subtitle".to_string(),
                default_data: BlockData::Header {
                    title: "Complete your order".to_string(),
                    subtitle: None,
                },
            },
        );
        registry.register(
            BlockType::Text,
            BlockTemplate {
                display_name: "Text".to_string(),
                description: "Free-form text content".to_string(),
                default_data: BlockData::Text {
                    content: "Add your text here".to_string(),
                },
            },
        );
        registry.register(
            BlockType::Image,
            BlockTemplate {
                display_name: "Image".to_string(),
                description: "Single image with alt text".to_string(),
                default_data: BlockData::Image {
                    src: String::new(),
                    alt: String::new(),
                },
            },
        );
        registry.register(
            BlockType::Button,
            BlockTemplate {
                display_name: "Button".to_string(),
                description: "Call-to-action link button".to_string(),
                default_data: BlockData::Button {
                    label: "Continue".to_string(),
                    url: "#".to_string(),
                },
            },
        );
        registry.register(
            BlockType::ProductPanel,
            BlockTemplate {
                display_name: "Product panel".to_string(),
                description: "Order summary with price and quantity".to_string(),
                default_data: BlockData::ProductPanel {
                    heading: "Your order".to_string(),
                    show_price: true,
                    show_quantity: true,
                },
            },
        );
        registry.register(
            BlockType::Testimonial,
            BlockTemplate {
                display_name: "Testimonial".to_string(),
                description: "Customer quote with attribution".to_string(),
                default_data: BlockData::Testimonial {
                    quote: "This product changed everything for me.".to_string(),
                    author: "Happy customer".to_string(),
                    avatar: None,
                },
            },
        );
        registry.register(
            BlockType::PaymentForm,
            BlockTemplate {
                display_name: "Payment form".to_string(),
                description: "Card fields and the pay button".to_string(),
                default_data: BlockData::PaymentForm {
                    button_label: "Pay now".to_string(),
                    show_billing_address: true,
                },
            },
        );
        registry.register(
            BlockType::Divider,
            BlockTemplate {
                display_name: "Divider".to_string(),
                description: "Horizontal separator".to_string(),
                default_data: BlockData::Divider { thickness: 1 },
            },
        );
        registry
    }

    /// Register or replace the template for a type.
    pub fn register(&mut self, block_type: BlockType, template: BlockTemplate) {
        self.templates.insert(block_type, template);
    }

    pub fn get(&self, block_type: BlockType) -> Option<&BlockTemplate> {
        self.templates.get(&block_type)
    }

    pub fn contains(&self, block_type: BlockType) -> bool {
        self.templates.contains_key(&block_type)
    }

    /// Starting data payload for a new block, `None` for unregistered types.
    pub fn default_data(&self, block_type: BlockType) -> Option<BlockData> {
        self.templates
            .get(&block_type)
            .map(|t| t.default_data.clone())
    }

    /// Registered types, in stable order.
    pub fn types(&self) -> impl Iterator<Item = BlockType> + '_ {
        self.templates.keys().copied()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_covers_every_block_type() {
        let registry = TemplateRegistry::standard();
        for block_type in BlockType::ALL {
            assert!(registry.contains(block_type), "{block_type} missing");
        }
    }

    #[test]
    fn test_default_data_matches_type() {
        let registry = TemplateRegistry::standard();
        for block_type in BlockType::ALL {
            let data = registry.default_data(block_type).unwrap();
            assert_eq!(data.block_type(), block_type);
        }
    }

    #[test]
    fn test_empty_registry_has_no_defaults() {
        let registry = TemplateRegistry::empty();
        assert!(!registry.contains(BlockType::Header));
        assert_eq!(registry.default_data(BlockType::Header), None);
    }

    #[test]
    fn test_register_replaces_template() {
        let mut registry = TemplateRegistry::standard();
        registry.register(
            BlockType::Button,
            BlockTemplate {
                display_name: "Buy button".to_string(),
                description: "Host-customized button".to_string(),
                default_data: BlockData::Button {
                    label: "Buy now".to_string(),
                    url: "/checkout".to_string(),
                },
            },
        );

        let template = registry.get(BlockType::Button).unwrap();
        assert_eq!(template.display_name, "Buy button");
        match &template.default_data {
            BlockData::Button { label, .. } => assert_eq!(label, "Buy now"),
            _ => panic!("expected button data"),
        }
    }

    #[test]
    fn test_types_in_stable_order() {
        let registry = TemplateRegistry::standard();
        let types: Vec<BlockType> = registry.types().collect();
        let mut sorted = types.clone();
        sorted.sort();
        assert_eq!(types, sorted);
        assert_eq!(types.len(), BlockType::ALL.len());
    }
}
