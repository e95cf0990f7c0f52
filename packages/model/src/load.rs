//! Load path for persisted documents.
//!
//! Accepts the current payload shape (full or simplified mode) and the legacy
//! "sections of blocks" shape, which is normalized into the simplified flat
//! list. Blocks that fail to deserialize or whose type is absent from the
//! template registry are dropped with a warning; a dropped block never fails
//! the load.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::document::{Block, Body, Column, Document, Section};
use crate::error::LoadError;
use crate::registry::TemplateRegistry;
use crate::responsive::{ResponsiveSettings, ResponsiveValue};

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    sections: Option<Vec<RawSection>>,
    #[serde(default)]
    blocks: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawSection {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    columns: Option<Vec<RawColumn>>,
    /// Legacy shape: blocks directly under the section.
    #[serde(default)]
    blocks: Option<Vec<Value>>,
    #[serde(default)]
    settings: ResponsiveSettings,
    #[serde(default)]
    visibility: Option<ResponsiveValue<bool>>,
}

#[derive(Deserialize)]
struct RawColumn {
    id: String,
    #[serde(default)]
    span: Option<ResponsiveValue<u8>>,
    #[serde(default)]
    offset: Option<ResponsiveValue<u8>>,
    #[serde(default)]
    blocks: Vec<Value>,
    #[serde(default)]
    settings: ResponsiveSettings,
}

/// Parse a persisted payload into a [`Document`].
///
/// Fatal only when the payload is not a document-shaped object at all;
/// individual bad blocks are filtered out.
pub fn load_document(payload: Value, registry: &TemplateRegistry) -> Result<Document, LoadError> {
    if !payload.is_object() {
        return Err(LoadError::NotAnObject);
    }
    let raw: RawDocument = serde_json::from_value(payload)?;
    let name = raw.name.unwrap_or_else(|| "untitled".to_string());

    let body = match (raw.mode.as_deref(), raw.sections, raw.blocks) {
        (Some("simplified"), _, Some(blocks)) | (None, None, Some(blocks)) => Body::Simplified {
            blocks: filter_blocks(blocks, registry),
        },
        (Some("full"), Some(sections), _) => Body::Full {
            sections: sections
                .into_iter()
                .map(|s| load_section(s, registry))
                .collect(),
        },
        // Legacy payloads carry no mode tag and nest blocks directly under
        // sections. Flatten into the simplified master order, section by
        // section.
        (None, Some(sections), _) => {
            let mut blocks = Vec::new();
            for section in sections {
                if let Some(section_blocks) = section.blocks {
                    blocks.extend(filter_blocks(section_blocks, registry));
                } else if let Some(columns) = section.columns {
                    for column in columns {
                        blocks.extend(filter_blocks(column.blocks, registry));
                    }
                }
            }
            Body::Simplified { blocks }
        }
        _ => return Err(LoadError::UnrecognizedShape),
    };

    Ok(Document { name, body })
}

fn load_section(raw: RawSection, registry: &TemplateRegistry) -> Section {
    Section {
        id: raw.id,
        name: raw.name,
        columns: raw
            .columns
            .unwrap_or_default()
            .into_iter()
            .map(|c| load_column(c, registry))
            .collect(),
        settings: raw.settings,
        visibility: raw.visibility,
    }
}

fn load_column(raw: RawColumn, registry: &TemplateRegistry) -> Column {
    Column {
        id: raw.id,
        span: raw.span.unwrap_or_else(|| ResponsiveValue::of(12)),
        offset: raw.offset,
        blocks: filter_blocks(raw.blocks, registry),
        settings: raw.settings,
    }
}

fn filter_blocks(values: Vec<Value>, registry: &TemplateRegistry) -> Vec<Block> {
    values
        .into_iter()
        .filter_map(|value| {
            let type_tag = value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<missing>")
                .to_string();
            match serde_json::from_value::<Block>(value) {
                Ok(block) if registry.contains(block.block_type()) => Some(block),
                Ok(block) => {
                    warn!(
                        block_type = %block.block_type(),
                        id = %block.id,
                        "dropping block: type not in template registry"
                    );
                    None
                }
                Err(err) => {
                    warn!(%type_tag, %err, "dropping malformed block");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_simplified_payload() {
        let payload = json!({
            "name": "checkout",
            "mode": "simplified",
            "blocks": [
                { "id": "b1", "type": "header", "data": { "title": "Hi" } },
                { "id": "b2", "type": "paymentForm", "data": { "button_label": "Pay" }, "column": "right" }
            ]
        });
        let doc = load_document(payload, &TemplateRegistry::standard()).unwrap();
        match doc.body {
            Body::Simplified { blocks } => {
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[0].id, "b1");
            }
            _ => panic!("expected simplified body"),
        }
    }

    #[test]
    fn test_load_drops_unknown_block_type() {
        let payload = json!({
            "name": "checkout",
            "mode": "simplified",
            "blocks": [
                { "id": "b1", "type": "text", "data": { "content": "ok" } },
                { "id": "b2", "type": "legacyWidget", "data": {} }
            ]
        });
        let doc = load_document(payload, &TemplateRegistry::standard()).unwrap();
        match doc.body {
            Body::Simplified { blocks } => {
                assert_eq!(blocks.len(), 1);
                assert_eq!(blocks[0].id, "b1");
            }
            _ => panic!("expected simplified body"),
        }
    }

    #[test]
    fn test_load_full_payload() {
        let payload = json!({
            "name": "checkout",
            "mode": "full",
            "sections": [{
                "id": "s1",
                "name": "Hero",
                "columns": [{
                    "id": "c1",
                    "span": { "base": 12, "md": 6 },
                    "blocks": [
                        { "id": "b1", "type": "image", "data": { "src": "/x.png" } }
                    ]
                }]
            }]
        });
        let doc = load_document(payload, &TemplateRegistry::standard()).unwrap();
        match doc.body {
            Body::Full { sections } => {
                assert_eq!(sections[0].columns[0].blocks[0].id, "b1");
            }
            _ => panic!("expected full body"),
        }
    }

    #[test]
    fn test_load_legacy_sections_of_blocks() {
        let payload = json!({
            "name": "old page",
            "sections": [
                { "id": "s1", "blocks": [
                    { "id": "b1", "type": "header", "data": { "title": "A" } }
                ]},
                { "id": "s2", "blocks": [
                    { "id": "b2", "type": "text", "data": { "content": "B" } }
                ]}
            ]
        });
        let doc = load_document(payload, &TemplateRegistry::standard()).unwrap();
        match doc.body {
            Body::Simplified { blocks } => {
                // Section order preserved in the flattened master order.
                assert_eq!(blocks[0].id, "b1");
                assert_eq!(blocks[1].id, "b2");
            }
            _ => panic!("legacy payload should normalize to simplified"),
        }
    }

    #[test]
    fn test_load_non_object_is_fatal() {
        let err = load_document(json!([1, 2, 3]), &TemplateRegistry::standard());
        assert!(matches!(err, Err(LoadError::NotAnObject)));
    }

    #[test]
    fn test_load_registry_filter_applies() {
        // A type valid in the model but absent from the host registry drops.
        let payload = json!({
            "name": "checkout",
            "mode": "simplified",
            "blocks": [
                { "id": "b1", "type": "divider", "data": {} }
            ]
        });
        let doc = load_document(payload, &TemplateRegistry::empty()).unwrap();
        match doc.body {
            Body::Simplified { blocks } => assert!(blocks.is_empty()),
            _ => panic!("expected simplified body"),
        }
    }
}
