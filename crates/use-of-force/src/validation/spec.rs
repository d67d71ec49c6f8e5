use super::error_adapter::ErrorDetailAdapter;
use super::metadata::FieldType;
use super::sanitiser::Sanitiser;
use super::schema::Schema;
use super::splitter::FieldTypeSplitter;
use super::SchemaError;

/// Everything the pipeline needs for one form section, compiled once at
/// startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct ValidationSpec {
    schema: Schema,
    sanitiser: Sanitiser,
    error_detail_adapter: ErrorDetailAdapter,
    field_type_splitter: FieldTypeSplitter,
}

impl ValidationSpec {
    /// Fails when the schema root is not an object.
    pub fn build(schema: Schema) -> Result<Self, SchemaError> {
        let description = schema.describe();
        let field_type_splitter = FieldTypeSplitter::build(&description, FieldType::Extracted)?;

        Ok(Self {
            sanitiser: Sanitiser::build(&description),
            error_detail_adapter: ErrorDetailAdapter::build(&description),
            field_type_splitter,
            schema,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn sanitiser(&self) -> &Sanitiser {
        &self.sanitiser
    }

    pub fn error_detail_adapter(&self) -> &ErrorDetailAdapter {
        &self.error_detail_adapter
    }

    pub fn field_type_splitter(&self) -> &FieldTypeSplitter {
        &self.field_type_splitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::description::DescriptionKind;
    use crate::validation::transforms::trimmed_string;
    use serde_json::json;

    #[test]
    fn compiles_every_part_from_one_description() {
        let spec = ValidationSpec::build(Schema::object([
            ("name", Schema::string().sanitise(trimmed_string())),
            (
                "tags",
                Schema::array(Schema::object([("tag", Schema::string())]))
                    .first_field_name("tags[0][tag]"),
            ),
            ("when", Schema::string().field_type(FieldType::Extracted)),
        ]))
        .expect("object schema compiles");

        assert_eq!(
            spec.sanitiser().sanitise(json!({ "name": " Jo ", "other": 1 })),
            json!({ "name": "Jo" })
        );
        assert_eq!(
            spec.error_detail_adapter().first_field_name("tags"),
            Some("tags[0][tag]")
        );
        assert!(spec.field_type_splitter().is_tagged("when"));
        assert!(!spec.field_type_splitter().is_tagged("name"));
    }

    #[test]
    fn rejects_schemas_without_an_object_root() {
        let error = ValidationSpec::build(Schema::array(Schema::string())).expect_err("array root");
        assert!(matches!(
            error,
            SchemaError::InvalidSchemaKind {
                found: DescriptionKind::Array,
                ..
            }
        ));
    }
}
