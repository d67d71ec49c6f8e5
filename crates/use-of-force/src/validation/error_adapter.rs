use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::description::SchemaDescription;
use super::schema::ErrorDetail;
use super::values::PathSegment;

/// Error ready for display: the anchor of the offending input and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiError {
    pub href: String,
    pub text: String,
}

/// Maps validator errors onto form input anchors.
///
/// An error reported against a whole top-level field (a path of length one)
/// is redirected to that field's `firstFieldName`, when one is declared, so
/// that array-level errors focus the first real input.
#[derive(Debug, Clone, Default)]
pub struct ErrorDetailAdapter {
    first_field_names: BTreeMap<String, String>,
}

impl ErrorDetailAdapter {
    pub fn build(description: &SchemaDescription) -> Self {
        let first_field_names = match description {
            SchemaDescription::Object { keys, .. } => keys
                .iter()
                .filter_map(|(name, child)| {
                    child
                        .merged_metadata()
                        .first_field_name()
                        .map(|first| (name.clone(), first.to_string()))
                })
                .collect(),
            _ => BTreeMap::new(),
        };
        Self { first_field_names }
    }

    pub fn first_field_name(&self, field: &str) -> Option<&str> {
        self.first_field_names.get(field).map(String::as_str)
    }

    pub fn adapt(&self, detail: &ErrorDetail) -> UiError {
        UiError {
            href: format!("#{}", self.anchor(&detail.path)),
            text: detail.message.clone(),
        }
    }

    fn anchor(&self, path: &[PathSegment]) -> String {
        if let [only] = path {
            if let Some(first) = only.as_key().and_then(|key| self.first_field_name(key)) {
                return first.to_string();
            }
        }

        let mut segments = path.iter();
        let mut anchor = segments
            .next()
            .map(ToString::to_string)
            .unwrap_or_default();
        for segment in segments {
            anchor.push('[');
            anchor.push_str(&segment.to_string());
            anchor.push(']');
        }
        anchor
    }
}
