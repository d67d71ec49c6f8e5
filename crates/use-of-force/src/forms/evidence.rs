use super::fields::{one_of, optional_text, repeatable_group, required_text, when_yes, yes_no};
use super::{NOT_KNOWN, NO, YES};
use crate::validation::Schema;

pub fn schema() -> Schema {
    Schema::object([
        ("baggedEvidence", bagged_evidence()),
        ("evidenceTagAndDescription", evidence_tag_and_description()),
        (
            "photographsTaken",
            yes_no("Select yes if any photographs were taken"),
        ),
        (
            "cctvRecording",
            one_of(
                &[YES, NO, NOT_KNOWN],
                "Select yes if any part of the incident was captured on CCTV",
            ),
        ),
    ])
}

pub fn bagged_evidence() -> Schema {
    yes_no("Select yes if any evidence was bagged and tagged")
}

/// Tags are only kept while evidence was bagged.
pub fn evidence_tag_and_description() -> Schema {
    let tags = repeatable_group(
        [
            (
                "evidenceTagReference",
                required_text("Enter the evidence tag number"),
            ),
            ("description", optional_text()),
        ],
        "evidenceTagReference",
        "Evidence tag '{#dupeValue}' has already been added - remove this evidence tag",
    )
    .min(1)
    .required()
    .messages([
        ("any.required", "Enter the evidence tag number"),
        ("array.min", "Enter the evidence tag number"),
    ]);

    when_yes("baggedEvidence", tags)
        .first_field_name("evidenceTagAndDescription[0][evidenceTagReference]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{process_input_with, ValidationPolicy, ValidationSpec};
    use serde_json::json;

    fn spec() -> ValidationSpec {
        ValidationSpec::build(schema()).expect("evidence compiles")
    }

    #[test]
    fn bagged_evidence_needs_a_tag() {
        let result = process_input_with(
            &spec(),
            json!({
                "baggedEvidence": "true",
                "evidenceTagAndDescription": [{ "evidenceTagReference": "", "description": "" }],
                "photographsTaken": "false",
                "cctvRecording": "NOT_KNOWN"
            }),
            &ValidationPolicy::default(),
        );

        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].href,
            "#evidenceTagAndDescription[0][evidenceTagReference]"
        );
        assert_eq!(result.errors[0].text, "Enter the evidence tag number");
    }

    #[test]
    fn description_without_tag_reports_the_tag_input() {
        let result = process_input_with(
            &spec(),
            json!({
                "baggedEvidence": "true",
                "evidenceTagAndDescription": [{ "evidenceTagReference": "", "description": "Knife" }],
                "photographsTaken": "false",
                "cctvRecording": "NO"
            }),
            &ValidationPolicy::default(),
        );

        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].href,
            "#evidenceTagAndDescription[0][evidenceTagReference]"
        );
    }

    #[test]
    fn tags_are_dropped_when_nothing_was_bagged() {
        let result = process_input_with(
            &spec(),
            json!({
                "baggedEvidence": "false",
                "evidenceTagAndDescription": [{ "evidenceTagReference": "123", "description": "" }],
                "photographsTaken": "true",
                "cctvRecording": "YES"
            }),
            &ValidationPolicy::default(),
        );

        assert!(result.is_valid(), "{:?}", result.errors);
        assert_eq!(
            serde_json::Value::Object(result.payload_fields),
            json!({ "baggedEvidence": false, "photographsTaken": true, "cctvRecording": "YES" })
        );
    }
}
