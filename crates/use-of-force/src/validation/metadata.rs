use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Pure value transform attached to a schema node as sanitiser metadata.
///
/// Transforms hold closures, so schema descriptions carrying them only ever
/// live in memory and are never serialized.
#[derive(Clone)]
pub struct Transform {
    name: &'static str,
    func: Arc<dyn Fn(Value) -> Value + Send + Sync>,
}

impl Transform {
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, value: Value) -> Value {
        (self.func)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform({})", self.name)
    }
}

/// Where a validated top-level field is stored once a section is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldType {
    /// Stored inside the section payload.
    #[default]
    Payload,
    /// Promoted out of the payload, e.g. into a dedicated column.
    Extracted,
}

/// One metadata map attached to a schema node. Every key is optional.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub sanitiser: Option<Transform>,
    pub field_type: Option<FieldType>,
    pub first_field_name: Option<String>,
}

impl Metadata {
    pub fn sanitiser(transform: Transform) -> Self {
        Self {
            sanitiser: Some(transform),
            ..Self::default()
        }
    }

    pub fn field_type(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    pub fn first_field_name(name: impl Into<String>) -> Self {
        Self {
            first_field_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Ordered metadata maps in attachment order.
///
/// Scalar keys merge last-wins; sanitisers never merge, every attached one
/// takes part in the composition.
#[derive(Debug, Clone, Default)]
pub struct MetadataBag {
    entries: Vec<Metadata>,
}

impl MetadataBag {
    pub fn push(&mut self, entry: Metadata) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Metadata] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sanitisers(&self) -> impl Iterator<Item = &Transform> {
        self.entries
            .iter()
            .filter_map(|entry| entry.sanitiser.as_ref())
    }

    pub fn merged(&self) -> MergedMetadata {
        let mut merged = MergedMetadata::default();
        merged.overlay(self);
        merged
    }
}

/// Scalar metadata keys after last-wins merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedMetadata {
    field_type: Option<FieldType>,
    first_field_name: Option<String>,
}

impl MergedMetadata {
    pub fn overlay(&mut self, bag: &MetadataBag) {
        for entry in bag.entries() {
            if let Some(field_type) = entry.field_type {
                self.field_type = Some(field_type);
            }
            if let Some(name) = &entry.first_field_name {
                self.first_field_name = Some(name.clone());
            }
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type.unwrap_or_default()
    }

    pub fn first_field_name(&self) -> Option<&str> {
        self.first_field_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_entries_win_per_key() {
        let mut bag = MetadataBag::default();
        bag.push(Metadata::field_type(FieldType::Extracted));
        bag.push(Metadata::first_field_name("first[0][name]"));
        bag.push(Metadata::first_field_name("first[0][tag]"));

        let merged = bag.merged();
        assert_eq!(merged.field_type(), FieldType::Extracted);
        assert_eq!(merged.first_field_name(), Some("first[0][tag]"));
    }

    #[test]
    fn every_sanitiser_is_kept_in_order() {
        let mut bag = MetadataBag::default();
        bag.push(Metadata::sanitiser(Transform::new("one", |value| value)));
        bag.push(Metadata::field_type(FieldType::Payload));
        bag.push(Metadata::sanitiser(Transform::new("two", |value| value)));

        let names: Vec<_> = bag.sanitisers().map(Transform::name).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(format!("{:?}", bag.sanitisers().next()), "Some(Transform(one))");
    }

    #[test]
    fn field_type_defaults_to_payload() {
        assert_eq!(MetadataBag::default().merged().field_type(), FieldType::Payload);
    }
}
