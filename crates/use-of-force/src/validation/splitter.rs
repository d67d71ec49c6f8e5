use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use super::description::{DescriptionKind, SchemaDescription};
use super::metadata::FieldType;
use super::values::is_nil_or_empty;
use super::SchemaError;

/// Top-level fields of a section, partitioned by where they are stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResult {
    pub payload_fields: Map<String, Value>,
    pub extracted_fields: Map<String, Value>,
}

/// Partitions a flat object by the `fieldType` metadata of its top-level keys.
#[derive(Debug, Clone)]
pub struct FieldTypeSplitter {
    target: FieldType,
    tagged: BTreeSet<String>,
}

impl FieldTypeSplitter {
    pub fn build(description: &SchemaDescription, target: FieldType) -> Result<Self, SchemaError> {
        let SchemaDescription::Object { keys, .. } = description else {
            return Err(SchemaError::InvalidSchemaKind {
                expected: DescriptionKind::Object,
                found: description.kind(),
            });
        };

        let tagged = keys
            .iter()
            .filter(|(_, child)| child.merged_metadata().field_type() == target)
            .map(|(name, _)| name.clone())
            .collect();

        Ok(Self { target, tagged })
    }

    pub fn target(&self) -> FieldType {
        self.target
    }

    pub fn is_tagged(&self, key: &str) -> bool {
        self.tagged.contains(key)
    }

    /// Blank values land in neither half. Anything other than an object
    /// splits into two empty halves.
    pub fn split(&self, value: Value) -> SplitResult {
        let mut result = SplitResult::default();
        let Value::Object(fields) = value else {
            return result;
        };

        for (key, value) in fields {
            if is_nil_or_empty(&value) {
                continue;
            }
            if self.tagged.contains(&key) {
                result.extracted_fields.insert(key, value);
            } else {
                result.payload_fields.insert(key, value);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::metadata::{Metadata, MetadataBag};
    use serde_json::json;

    fn tagged(field_type: FieldType) -> SchemaDescription {
        let mut meta = MetadataBag::default();
        meta.push(Metadata::field_type(field_type));
        SchemaDescription::Primitive { meta }
    }

    fn description() -> SchemaDescription {
        SchemaDescription::Object {
            keys: vec![
                ("incidentDate".to_string(), tagged(FieldType::Extracted)),
                ("locationId".to_string(), tagged(FieldType::Payload)),
                (
                    "witnesses".to_string(),
                    SchemaDescription::Primitive {
                        meta: MetadataBag::default(),
                    },
                ),
            ],
            meta: MetadataBag::default(),
        }
    }

    #[test]
    fn splits_by_tag_and_omits_blank_values() {
        let splitter =
            FieldTypeSplitter::build(&description(), FieldType::Extracted).expect("object root");

        let result = splitter.split(json!({
            "incidentDate": { "value": "2019-01-15T10:00" },
            "locationId": 4,
            "witnesses": [],
            "undeclared": "kept",
            "blank": ""
        }));

        assert_eq!(
            Value::Object(result.extracted_fields),
            json!({ "incidentDate": { "value": "2019-01-15T10:00" } })
        );
        assert_eq!(
            Value::Object(result.payload_fields),
            json!({ "locationId": 4, "undeclared": "kept" })
        );
    }

    #[test]
    fn target_tag_is_configurable() {
        let splitter =
            FieldTypeSplitter::build(&description(), FieldType::Payload).expect("object root");
        assert!(splitter.is_tagged("locationId"));
        assert!(splitter.is_tagged("witnesses"));
        assert!(!splitter.is_tagged("incidentDate"));
        assert_eq!(splitter.target(), FieldType::Payload);
    }

    #[test]
    fn rejects_non_object_roots() {
        let error = FieldTypeSplitter::build(&tagged(FieldType::Payload), FieldType::Extracted)
            .expect_err("primitive root rejected");
        assert!(matches!(
            error,
            SchemaError::InvalidSchemaKind {
                expected: DescriptionKind::Object,
                found: DescriptionKind::Primitive,
            }
        ));
        assert_eq!(error.to_string(), "expected an object schema, found primitive");
    }

    #[test]
    fn non_object_values_split_to_nothing() {
        let splitter =
            FieldTypeSplitter::build(&description(), FieldType::Extracted).expect("object root");
        assert_eq!(splitter.split(Value::Null), SplitResult::default());
    }
}
