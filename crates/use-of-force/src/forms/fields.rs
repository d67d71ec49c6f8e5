use std::sync::Arc;

use chrono::Datelike;
use serde_json::Value;

use crate::validation::transforms::{remove_empty_items, to_boolean, trimmed_string};
use crate::validation::{Comparator, Condition, RuleContext, Schema, Violation};

pub const YES: &str = "YES";
pub const NO: &str = "NO";
pub const NOT_KNOWN: &str = "NOT_KNOWN";

/// Longest free-text answer kept for names and short descriptions.
pub(crate) const SHORT_TEXT_LIMIT: i64 = 255;

/// Compares projected keys ignoring case and surrounding whitespace.
pub fn case_insensitive_trimmed() -> Comparator {
    Arc::new(|left: &Value, right: &Value| match (left.as_str(), right.as_str()) {
        (Some(left), Some(right)) => left.trim().to_lowercase() == right.trim().to_lowercase(),
        _ => left == right,
    })
}

/// Required yes/no radio, submitted as "true" or "false".
pub(crate) fn yes_no(message: &str) -> Schema {
    Schema::boolean()
        .required()
        .message(message)
        .sanitise(to_boolean())
}

pub(crate) fn required_text(message: &str) -> Schema {
    Schema::string()
        .required()
        .max(SHORT_TEXT_LIMIT)
        .message(message)
        .sanitise(trimmed_string())
}

pub(crate) fn optional_text() -> Schema {
    Schema::string().sanitise(trimmed_string())
}

pub(crate) fn one_of(values: &[&str], message: &str) -> Schema {
    Schema::string()
        .required()
        .valid(values.iter().copied())
        .message(message)
        .sanitise(trimmed_string())
}

/// Applies `then` only while `reference` was answered yes; otherwise the
/// submitted value is discarded so hidden inputs are never stored.
pub(crate) fn when_yes(reference: &str, then: Schema) -> Schema {
    when_answer(reference, Condition::equals(true), then)
}

pub(crate) fn when_answer(reference: &str, is: Condition, then: Schema) -> Schema {
    Schema::when(reference, is, then).otherwise(Schema::any().strip())
}

/// Repeatable group of inputs: blank entries are dropped and `unique_key`
/// must not repeat between entries.
pub(crate) fn repeatable_group<I>(
    fields: I,
    unique_key: &str,
    duplicate_message: &str,
) -> Schema
where
    I: IntoIterator<Item = (&'static str, Schema)>,
{
    Schema::array(Schema::object(fields).strip_unknown())
        .unique_by(unique_key, case_insensitive_trimmed())
        .messages([("array.unique", duplicate_message)])
        .sanitise(remove_empty_items())
}

/// Rejects years later than the policy clock's current year.
pub(crate) fn not_after_current_year(
    message: &'static str,
) -> impl Fn(&Value, &RuleContext<'_>) -> Result<Option<Value>, Vec<Violation>> + Send + Sync + 'static
{
    move |value: &Value, context: &RuleContext<'_>| {
        let current = i64::from(context.now.year());
        match value.as_i64() {
            Some(year) if year > current => Err(vec![Violation::new("year.future", message)]),
            _ => Ok(None),
        }
    }
}
