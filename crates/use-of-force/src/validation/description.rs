use std::fmt;

use super::metadata::{MergedMetadata, MetadataBag};

/// Structural view of a schema: the shape it validates plus the metadata
/// attached to every node.
#[derive(Debug, Clone)]
pub enum SchemaDescription {
    Primitive {
        meta: MetadataBag,
    },
    Object {
        keys: Vec<(String, SchemaDescription)>,
        meta: MetadataBag,
    },
    Array {
        /// Zero or one entries describing every item.
        items: Vec<SchemaDescription>,
        meta: MetadataBag,
    },
    Conditional {
        whens: Vec<WhenDescription>,
        meta: MetadataBag,
    },
}

#[derive(Debug, Clone)]
pub struct WhenDescription {
    pub then: Option<Box<SchemaDescription>>,
    pub otherwise: Option<Box<SchemaDescription>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionKind {
    Primitive,
    Object,
    Array,
    Conditional,
}

impl fmt::Display for DescriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DescriptionKind::Primitive => "primitive",
            DescriptionKind::Object => "object",
            DescriptionKind::Array => "array",
            DescriptionKind::Conditional => "conditional",
        };
        f.write_str(label)
    }
}

impl SchemaDescription {
    pub fn kind(&self) -> DescriptionKind {
        match self {
            SchemaDescription::Primitive { .. } => DescriptionKind::Primitive,
            SchemaDescription::Object { .. } => DescriptionKind::Object,
            SchemaDescription::Array { .. } => DescriptionKind::Array,
            SchemaDescription::Conditional { .. } => DescriptionKind::Conditional,
        }
    }

    pub fn meta(&self) -> &MetadataBag {
        match self {
            SchemaDescription::Primitive { meta }
            | SchemaDescription::Object { meta, .. }
            | SchemaDescription::Array { meta, .. }
            | SchemaDescription::Conditional { meta, .. } => meta,
        }
    }

    /// Collapses a conditional to the shape of its first `then` branch.
    ///
    /// Only `whens[0].then` is consulted, whichever branch validation picks
    /// at runtime. Returns `None` when that branch is missing.
    pub fn resolve(&self) -> Option<&SchemaDescription> {
        match self {
            SchemaDescription::Conditional { whens, .. } => whens
                .first()
                .and_then(|when| when.then.as_deref())
                .and_then(SchemaDescription::resolve),
            other => Some(other),
        }
    }

    /// Scalar metadata for this node. A conditional layers its own metadata
    /// over whatever its resolved branch declares.
    pub fn merged_metadata(&self) -> MergedMetadata {
        match self {
            SchemaDescription::Conditional { meta, .. } => {
                let mut merged = self
                    .resolve()
                    .map(|resolved| resolved.meta().merged())
                    .unwrap_or_default();
                merged.overlay(meta);
                merged
            }
            other => other.meta().merged(),
        }
    }

    pub fn key(&self, name: &str) -> Option<&SchemaDescription> {
        match self {
            SchemaDescription::Object { keys, .. } => keys
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, description)| description),
            _ => None,
        }
    }
}
