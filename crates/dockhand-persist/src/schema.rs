//! Persisted layout schema.
//!
//! The stored form mirrors the live layout tree node for node, with two
//! deliberate differences: every node carries an explicit `kind` tag (a
//! component collection is a *kind*, never something inferred from field
//! names), and component collections hold replayable
//! [`ComponentRecord`]s instead of live references.
//!
//! # Versioning policy
//!
//! Breaking changes (field removal, semantic changes) increment
//! [`LAYOUT_SCHEMA_VERSION`]. Every envelope carries the version it was
//! written with; loaders reject unknown versions with an actionable
//! error rather than guessing.

use std::collections::BTreeMap;

use dockhand_core::{ConstructionDescriptor, SerializationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current persisted layout schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

/// Maximum nesting depth the codec will represent.
///
/// Aligned with serde_json's own recursion limit; a deeper tree cannot be
/// written out, let alone read back.
pub const MAX_LAYOUT_DEPTH: usize = 128;

/// Envelope around a stored layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLayout {
    /// Schema version the envelope was written with.
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    /// The stored tree.
    pub root: StoredNode,
}

fn default_schema_version() -> u16 {
    LAYOUT_SCHEMA_VERSION
}

impl StoredLayout {
    /// Wrap a tree in a current-version envelope.
    #[must_use]
    pub fn new(root: StoredNode) -> Self {
        Self {
            schema_version: LAYOUT_SCHEMA_VERSION,
            root,
        }
    }

    /// Reject envelopes written by an incompatible schema revision.
    pub fn validate(&self) -> Result<(), SerializationError> {
        if self.schema_version != LAYOUT_SCHEMA_VERSION {
            return Err(SerializationError::UnsupportedSchema {
                found: self.schema_version,
                expected: LAYOUT_SCHEMA_VERSION,
            });
        }
        Ok(())
    }
}

/// Stored counterpart of one layout tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoredNode {
    /// A plain value, stored verbatim.
    Scalar {
        /// The value.
        value: Value,
    },
    /// An ordered sequence of child nodes.
    List {
        /// The children, in order.
        items: Vec<StoredNode>,
    },
    /// Named child nodes.
    Object {
        /// The children, by field name.
        fields: BTreeMap<String, StoredNode>,
    },
    /// An ordered collection of replayable component records.
    Components {
        /// The records, in collection order.
        records: Vec<ComponentRecord>,
    },
}

/// Replayable record of one component in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Which factory rebuilds the component, with what options.
    pub construction_options: ConstructionDescriptor,
    /// Inner state snapshot, present iff the component exposes the
    /// stateful capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_state: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> ComponentRecord {
        ComponentRecord {
            construction_options: ConstructionDescriptor::new("editor", json!({"uri": "a.rs"})),
            inner_state: Some(json!({"cursor": 12})),
        }
    }

    #[test]
    fn envelope_round_trips() {
        let layout = StoredLayout::new(StoredNode::Object {
            fields: BTreeMap::from([
                (
                    "theme".to_owned(),
                    StoredNode::Scalar { value: json!("dark") },
                ),
                (
                    "editors".to_owned(),
                    StoredNode::Components {
                        records: vec![sample_record()],
                    },
                ),
            ]),
        });
        let text = serde_json::to_string(&layout).unwrap();
        let back: StoredLayout = serde_json::from_str(&text).unwrap();
        assert_eq!(back, layout);
        back.validate().unwrap();
    }

    #[test]
    fn absent_inner_state_is_omitted_from_the_wire() {
        let record = ComponentRecord {
            construction_options: ConstructionDescriptor::new("tree", Value::Null),
            inner_state: None,
        };
        let text = serde_json::to_string(&record).unwrap();
        assert!(!text.contains("inner_state"));
    }

    #[test]
    fn missing_version_defaults_to_current() {
        let back: StoredLayout =
            serde_json::from_str(r#"{"root":{"kind":"scalar","value":null}}"#).unwrap();
        assert_eq!(back.schema_version, LAYOUT_SCHEMA_VERSION);
        back.validate().unwrap();
    }

    #[test]
    fn foreign_version_is_rejected() {
        let mut layout = StoredLayout::new(StoredNode::Scalar { value: Value::Null });
        layout.schema_version = 42;
        assert!(matches!(
            layout.validate(),
            Err(SerializationError::UnsupportedSchema { found: 42, expected: LAYOUT_SCHEMA_VERSION })
        ));
    }
}
