use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::error_adapter::UiError;
use super::schema::ValidationPolicy;
use super::spec::ValidationSpec;

/// Result of processing one submitted section.
///
/// Both field maps are filled even when `errors` is not empty, so the form
/// can be re-displayed with what the user entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedInput {
    pub payload_fields: Map<String, Value>,
    pub extracted_fields: Map<String, Value>,
    pub errors: Vec<UiError>,
}

impl ProcessedInput {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sanitise, validate, adapt errors and split fields, using the current time.
pub fn process_input(spec: &ValidationSpec, input: Value) -> ProcessedInput {
    process_input_with(spec, input, &ValidationPolicy::current())
}

/// Never fails on user input; problems come back in `errors`.
pub fn process_input_with(
    spec: &ValidationSpec,
    input: Value,
    policy: &ValidationPolicy,
) -> ProcessedInput {
    let sanitised = spec.sanitiser().sanitise(input);
    let validated = spec.schema().validate(&sanitised, policy);

    let errors: Vec<UiError> = validated
        .errors
        .iter()
        .map(|detail| spec.error_detail_adapter().adapt(detail))
        .collect();

    let split = spec.field_type_splitter().split(validated.value);

    debug!(
        errors = errors.len(),
        payload_fields = split.payload_fields.len(),
        extracted_fields = split.extracted_fields.len(),
        "processed form input"
    );

    ProcessedInput {
        payload_fields: split.payload_fields,
        extracted_fields: split.extracted_fields,
        errors,
    }
}
