use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::messages::{default_template, render};
use super::{Kind, ObjectKeys, Presence, Rule, Schema, UnknownKeys, When};
use crate::validation::values::{is_nil_or_empty, PathSegment};

/// How a submission is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Stop at the first error instead of collecting every one.
    pub abort_early: bool,
    /// Convert compatible strings into numbers and booleans.
    pub convert: bool,
    /// Keep undeclared object keys instead of rejecting them.
    pub allow_unknown: bool,
    /// Clock for rules that compare answers with the present.
    pub now: NaiveDateTime,
}

impl ValidationPolicy {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            abort_early: false,
            convert: true,
            allow_unknown: false,
            now,
        }
    }

    pub fn current() -> Self {
        Self::at(Local::now().naive_local())
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::current()
    }
}

/// A single failed constraint, addressed by its path into the submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub path: Vec<PathSegment>,
    pub message: String,
    #[serde(rename = "type")]
    pub code: String,
    pub context: Map<String, Value>,
}

/// Converted value plus every error found. The value is returned even when
/// errors exist so callers can re-display what was entered.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub value: Value,
    pub errors: Vec<ErrorDetail>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What a custom rule can see besides the value under test.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub now: NaiveDateTime,
    pub path: &'a [PathSegment],
    pub parent: Option<&'a Map<String, Value>>,
}

impl RuleContext<'_> {
    pub fn sibling(&self, key: &str) -> Option<&Value> {
        self.parent.and_then(|parent| parent.get(key))
    }
}

/// Failure raised by a custom rule, relative to the node it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: Vec<PathSegment>,
    pub code: String,
    pub message: String,
}

impl Violation {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn at(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push(segment.into());
        self
    }
}

pub(super) fn run(schema: &Schema, value: &Value, policy: &ValidationPolicy) -> Validated {
    let mut validator = Validator {
        policy,
        errors: Vec::new(),
    };
    let output = validator.validate(schema, Some(value.clone()), &[], None);
    Validated {
        value: output.unwrap_or(Value::Null),
        errors: validator.errors,
    }
}

struct Validator<'p> {
    policy: &'p ValidationPolicy,
    errors: Vec<ErrorDetail>,
}

impl Validator<'_> {
    fn halted(&self) -> bool {
        self.policy.abort_early && !self.errors.is_empty()
    }

    /// Returns `None` when the value is absent or stripped.
    fn validate(
        &mut self,
        schema: &Schema,
        value: Option<Value>,
        path: &[PathSegment],
        parent: Option<&Map<String, Value>>,
    ) -> Option<Value> {
        if let Kind::Conditional(whens) = &schema.kind {
            return match select_branch(whens, parent) {
                Some(branch) => self.validate(branch, value, path, parent),
                None => value,
            };
        }

        let raw = match value {
            Some(raw) if !raw.is_null() => raw,
            missing => {
                if schema.presence == Presence::Required {
                    self.report(schema, path, "any.required", None, Vec::new());
                    return missing;
                }
                return if schema.strip { None } else { missing };
            }
        };

        if schema.presence == Presence::Forbidden {
            self.report(schema, path, "any.unknown", Some(&raw), Vec::new());
            return Some(raw);
        }

        let before = self.errors.len();
        let converted = match self.convert(schema, raw, path) {
            Ok(converted) => converted,
            Err(raw) => return Some(raw),
        };
        let children_failed = self.errors.len() > before;

        if !schema.valid.is_empty() {
            if !schema.valid.contains(&converted) {
                let valids = Value::Array(schema.valid.clone());
                self.report(
                    schema,
                    path,
                    "any.only",
                    Some(&converted),
                    vec![("valids", valids)],
                );
                return Some(converted);
            }
            return self.finish(schema, converted);
        }

        if self.halted() || !self.check_rules(schema, &converted, path) || children_failed {
            return Some(converted);
        }
        let converted = whole_number(schema, converted);

        match self.run_custom_rules(schema, converted, path, parent) {
            Ok(value) => self.finish(schema, value),
            Err(value) => Some(value),
        }
    }

    fn finish(&self, schema: &Schema, value: Value) -> Option<Value> {
        if schema.strip {
            None
        } else {
            Some(value)
        }
    }

    /// Type checks and converts a present value; objects and arrays also
    /// validate their children here. `Err` carries the untouched value.
    fn convert(
        &mut self,
        schema: &Schema,
        raw: Value,
        path: &[PathSegment],
    ) -> Result<Value, Value> {
        match &schema.kind {
            Kind::Any | Kind::Conditional(_) => Ok(raw),
            Kind::String => {
                let failure = match &raw {
                    Value::String(text) if text.is_empty() => Some("string.empty"),
                    Value::String(_) => None,
                    _ => Some("string.base"),
                };
                match failure {
                    None => Ok(raw),
                    Some(code) => {
                        self.report(schema, path, code, Some(&raw), Vec::new());
                        Err(raw)
                    }
                }
            }
            Kind::Number => self.convert_number(schema, raw, path),
            Kind::Boolean => {
                let converted = match &raw {
                    Value::Bool(_) => Some(raw.clone()),
                    Value::String(text) if self.policy.convert => {
                        match text.trim().to_ascii_lowercase().as_str() {
                            "true" => Some(Value::Bool(true)),
                            "false" => Some(Value::Bool(false)),
                            _ => None,
                        }
                    }
                    _ => None,
                };
                converted.ok_or_else(|| {
                    self.report(schema, path, "boolean.base", Some(&raw), Vec::new());
                    raw
                })
            }
            Kind::Object(keys) => match raw {
                Value::Object(map) => Ok(Value::Object(self.validate_keys(keys, map, path))),
                other => {
                    self.report(schema, path, "object.base", Some(&other), Vec::new());
                    Err(other)
                }
            },
            Kind::Array { item, single } => {
                let items = match raw {
                    Value::Array(items) => items,
                    other if *single => vec![other],
                    other => {
                        self.report(schema, path, "array.base", Some(&other), Vec::new());
                        return Err(other);
                    }
                };
                let Some(item_schema) = item else {
                    return Ok(Value::Array(items));
                };

                let mut validated = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    if self.halted() {
                        break;
                    }
                    let item_path = child_path(path, PathSegment::Index(index));
                    if let Some(value) = self.validate(item_schema, Some(item), &item_path, None) {
                        validated.push(value);
                    }
                }
                Ok(Value::Array(validated))
            }
        }
    }

    fn convert_number(
        &mut self,
        schema: &Schema,
        raw: Value,
        path: &[PathSegment],
    ) -> Result<Value, Value> {
        let parsed = match &raw {
            Value::Number(_) => Some(raw.clone()),
            Value::String(text) if self.policy.convert => parse_number(text.trim()),
            _ => None,
        };
        let Some(number) = parsed else {
            self.report(schema, path, "number.base", Some(&raw), Vec::new());
            return Err(raw);
        };

        if let Some(limit) = schema.max_digits_limit() {
            if digit_width(&raw) > limit {
                self.report(
                    schema,
                    path,
                    "number.digits",
                    Some(&raw),
                    vec![("limit", Value::from(limit))],
                );
                return Err(raw);
            }
        }

        Ok(number)
    }

    fn validate_keys(
        &mut self,
        keys: &ObjectKeys,
        mut output: Map<String, Value>,
        path: &[PathSegment],
    ) -> Map<String, Value> {
        let undeclared: Vec<String> = output
            .keys()
            .filter(|name| !keys.contains(name))
            .cloned()
            .collect();

        for &index in &keys.order {
            if self.halted() {
                return output;
            }
            let (name, child) = &keys.keys[index];
            let current = output.remove(name);
            let child_path = child_path(path, PathSegment::Key(name.clone()));
            if let Some(value) = self.validate(child, current, &child_path, Some(&output)) {
                output.insert(name.clone(), value);
            }
        }

        let allow = match keys.unknown {
            UnknownKeys::Policy => self.policy.allow_unknown,
            UnknownKeys::Allow => true,
            UnknownKeys::Strip => false,
        };
        for name in undeclared {
            if allow {
                continue;
            }
            if keys.unknown == UnknownKeys::Strip {
                output.remove(&name);
                continue;
            }
            if self.halted() {
                break;
            }
            let unknown_path = child_path(path, PathSegment::Key(name.clone()));
            let value = output.get(&name).cloned();
            self.report_unknown(&unknown_path, value);
        }

        output
    }

    /// Runs built-in rules in order, stopping at the first failure.
    fn check_rules(&mut self, schema: &Schema, value: &Value, path: &[PathSegment]) -> bool {
        for rule in &schema.rules {
            let passed = match rule {
                Rule::Min(limit) => self.check_bound(schema, value, path, *limit, Bound::Min),
                Rule::Max(limit) => self.check_bound(schema, value, path, *limit, Bound::Max),
                Rule::Integer => {
                    let whole = value.as_f64().map_or(true, |number| number.fract() == 0.0);
                    if !whole {
                        self.report(schema, path, "number.integer", Some(value), Vec::new());
                    }
                    whole
                }
                Rule::Pattern { name, test } => {
                    let matched = value.as_str().map_or(true, |text| test(text));
                    if !matched {
                        self.report(
                            schema,
                            path,
                            "string.pattern.base",
                            Some(value),
                            vec![("name", Value::from(*name))],
                        );
                    }
                    matched
                }
                Rule::Unique { key, comparator } => {
                    self.check_unique(schema, value, path, key, comparator.as_ref())
                }
                Rule::MaxDigits(_) | Rule::Custom { .. } => true,
            };
            if !passed {
                return false;
            }
        }
        true
    }

    fn check_bound(
        &mut self,
        schema: &Schema,
        value: &Value,
        path: &[PathSegment],
        limit: i64,
        bound: Bound,
    ) -> bool {
        let (measured, family) = match (&schema.kind, value) {
            (Kind::String, Value::String(text)) => (text.chars().count() as f64, "string"),
            (Kind::Number, Value::Number(number)) => (number.as_f64().unwrap_or(0.0), "number"),
            (Kind::Array { .. }, Value::Array(items)) => (items.len() as f64, "array"),
            _ => return true,
        };
        let within = match bound {
            Bound::Min => measured >= limit as f64,
            Bound::Max => measured <= limit as f64,
        };
        if !within {
            let code = format!("{family}.{}", bound.suffix());
            self.report(
                schema,
                path,
                &code,
                Some(value),
                vec![("limit", Value::from(limit))],
            );
        }
        within
    }

    fn check_unique(
        &mut self,
        schema: &Schema,
        value: &Value,
        path: &[PathSegment],
        key: &str,
        comparator: &(dyn Fn(&Value, &Value) -> bool + Send + Sync),
    ) -> bool {
        let Some(items) = value.as_array() else {
            return true;
        };
        let projected: Vec<Option<&Value>> = items
            .iter()
            .map(|item| project(item, key).filter(|value| !is_nil_or_empty(value)))
            .collect();

        let mut unique = true;
        for later in 1..items.len() {
            let Some(candidate) = projected[later] else {
                continue;
            };
            let collides = projected[..later]
                .iter()
                .flatten()
                .any(|earlier| comparator(earlier, candidate));
            if collides {
                unique = false;
                let item_path = child_path(path, PathSegment::Index(later));
                self.report(
                    schema,
                    &item_path,
                    "array.unique",
                    Some(&items[later]),
                    vec![
                        ("dupeValue", candidate.clone()),
                        ("pos", Value::from(later)),
                    ],
                );
                if self.halted() {
                    break;
                }
            }
        }
        unique
    }

    fn run_custom_rules(
        &mut self,
        schema: &Schema,
        mut value: Value,
        path: &[PathSegment],
        parent: Option<&Map<String, Value>>,
    ) -> Result<Value, Value> {
        for rule in &schema.rules {
            let Rule::Custom { name, check } = rule else {
                continue;
            };
            let context = RuleContext {
                now: self.policy.now,
                path,
                parent,
            };
            match check(&value, &context) {
                Ok(Some(replacement)) => value = replacement,
                Ok(None) => {}
                Err(violations) => {
                    tracing::trace!(rule = *name, violations = violations.len(), "custom rule failed");
                    for violation in violations {
                        let mut violation_path = path.to_vec();
                        violation_path.extend(violation.path);
                        let message = schema
                            .messages
                            .specific(&violation.code)
                            .map(str::to_string)
                            .unwrap_or(violation.message);
                        let context = error_context(&violation_path, Some(&value), Vec::new());
                        let message = render(&message, &context);
                        self.errors.push(ErrorDetail {
                            path: violation_path,
                            message,
                            code: violation.code,
                            context,
                        });
                        if self.halted() {
                            break;
                        }
                    }
                    return Err(value);
                }
            }
        }
        Ok(value)
    }

    fn report(
        &mut self,
        schema: &Schema,
        path: &[PathSegment],
        code: &str,
        value: Option<&Value>,
        extra: Vec<(&'static str, Value)>,
    ) {
        let context = error_context(path, value, extra);
        let template = schema
            .messages
            .template(code)
            .unwrap_or_else(|| default_template(code));
        let message = render(template, &context);
        self.errors.push(ErrorDetail {
            path: path.to_vec(),
            message,
            code: code.to_string(),
            context,
        });
    }

    /// Undeclared keys have no schema of their own, so only defaults apply.
    fn report_unknown(&mut self, path: &[PathSegment], value: Option<Value>) {
        let context = error_context(path, value.as_ref(), Vec::new());
        let message = render(default_template("object.unknown"), &context);
        self.errors.push(ErrorDetail {
            path: path.to_vec(),
            message,
            code: "object.unknown".to_string(),
            context,
        });
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Min,
    Max,
}

impl Bound {
    fn suffix(self) -> &'static str {
        match self {
            Bound::Min => "min",
            Bound::Max => "max",
        }
    }
}

fn select_branch<'s>(whens: &'s [When], parent: Option<&Map<String, Value>>) -> Option<&'s Schema> {
    whens.iter().find_map(|when| {
        let sibling = parent.and_then(|parent| parent.get(&when.reference));
        if when.is.matches(sibling) {
            when.then.as_deref()
        } else {
            when.otherwise.as_deref()
        }
    })
}

fn child_path(path: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut child = Vec::with_capacity(path.len() + 1);
    child.extend_from_slice(path);
    child.push(segment);
    child
}

fn project<'v>(item: &'v Value, key: &str) -> Option<&'v Value> {
    if key.is_empty() {
        Some(item)
    } else {
        item.get(key)
    }
}

fn error_context(
    path: &[PathSegment],
    value: Option<&Value>,
    extra: Vec<(&'static str, Value)>,
) -> Map<String, Value> {
    let mut context = Map::new();
    let label = match path.last() {
        Some(PathSegment::Key(key)) => key.clone(),
        Some(PathSegment::Index(index)) => format!("[{index}]"),
        None => "value".to_string(),
    };
    context.insert("label".to_string(), Value::String(label));
    if let Some(segment) = path.last() {
        let key = match segment {
            PathSegment::Key(key) => Value::String(key.clone()),
            PathSegment::Index(index) => Value::from(*index),
        };
        context.insert("key".to_string(), key);
    }
    if let Some(value) = value {
        context.insert("value".to_string(), value.clone());
    }
    for (name, value) in extra {
        context.insert(name.to_string(), value);
    }
    context
}

fn parse_number(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::from(integer));
    }
    text.parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Stores a float that passed `integer()` as an integer, so `2.0` reads
/// back through `as_i64` like `2`.
fn whole_number(schema: &Schema, value: Value) -> Value {
    if !schema.rules.iter().any(|rule| matches!(rule, Rule::Integer)) || !value.is_f64() {
        return value;
    }
    match value.as_f64() {
        Some(number) if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
            Value::from(number as i64)
        }
        _ => value,
    }
}

/// Digits the number was written with, ignoring sign and decimal point.
fn digit_width(raw: &Value) -> usize {
    let written = match raw {
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    };
    written.chars().filter(char::is_ascii_digit).count()
}

#[cfg(test)]
mod tests {
    use super::super::Condition;
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;

    fn policy() -> ValidationPolicy {
        let now = NaiveDate::from_ymd_opt(2019, 1, 15)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .expect("valid timestamp");
        ValidationPolicy::at(now)
    }

    fn paths(validated: &Validated) -> Vec<Vec<PathSegment>> {
        validated.errors.iter().map(|error| error.path.clone()).collect()
    }

    fn ignore_case(left: &Value, right: &Value) -> bool {
        match (left.as_str(), right.as_str()) {
            (Some(left), Some(right)) => left.trim().eq_ignore_ascii_case(right.trim()),
            _ => left == right,
        }
    }

    #[test]
    fn collects_every_missing_required_field() {
        let schema = Schema::object([
            ("first", Schema::string().required()),
            ("second", Schema::boolean().required().message("Select yes or no")),
        ]);

        let validated = schema.validate(&json!({}), &policy());

        assert_eq!(validated.errors.len(), 2);
        assert_eq!(validated.errors[0].message, "\"first\" is required");
        assert_eq!(validated.errors[0].code, "any.required");
        assert_eq!(validated.errors[1].message, "Select yes or no");
        assert_eq!(validated.value, json!({}));
    }

    #[test]
    fn abort_early_stops_after_first_error() {
        let schema = Schema::object([
            ("first", Schema::string().required()),
            ("second", Schema::string().required()),
        ]);
        let mut policy = policy();
        policy.abort_early = true;

        let validated = schema.validate(&json!({}), &policy);
        assert_eq!(validated.errors.len(), 1);
    }

    #[test]
    fn converts_strings_when_allowed() {
        let schema = Schema::object([
            ("count", Schema::number().integer()),
            ("flag", Schema::boolean()),
        ]);

        let validated = schema.validate(&json!({ "count": " 2 ", "flag": "TRUE" }), &policy());
        assert!(validated.is_valid());
        assert_eq!(validated.value, json!({ "count": 2, "flag": true }));

        let mut strict = policy();
        strict.convert = false;
        let validated = schema.validate(&json!({ "count": "2", "flag": "true" }), &strict);
        let codes: Vec<_> = validated.errors.iter().map(|error| error.code.as_str()).collect();
        assert_eq!(codes, vec!["number.base", "boolean.base"]);
    }

    #[test]
    fn rejects_unknown_keys_unless_allowed_or_stripped() {
        let schema = Schema::object([("known", Schema::string())]);
        let input = json!({ "known": "a", "extra": "b" });

        let validated = schema.validate(&input, &policy());
        assert_eq!(paths(&validated), vec![vec![PathSegment::from("extra")]]);
        assert_eq!(validated.errors[0].message, "\"extra\" is not allowed");

        let mut lenient = policy();
        lenient.allow_unknown = true;
        assert!(schema.validate(&input, &lenient).is_valid());

        let stripping = Schema::object([("known", Schema::string())]).strip_unknown();
        let validated = stripping.validate(&input, &policy());
        assert!(validated.is_valid());
        assert_eq!(validated.value, json!({ "known": "a" }));
    }

    #[test]
    fn conditional_branch_follows_converted_sibling() {
        let schema = Schema::object([
            ("worn", Schema::string().valid(["YES", "NO"])),
            (
                "numbers",
                Schema::when(
                    "worn",
                    Condition::equals("YES"),
                    Schema::array(Schema::string()).min(1).required(),
                )
                .otherwise(Schema::any().strip()),
            ),
        ]);

        let validated = schema.validate(&json!({ "worn": "YES" }), &policy());
        assert_eq!(paths(&validated), vec![vec![PathSegment::from("numbers")]]);

        let validated = schema.validate(&json!({ "worn": "NO", "numbers": ["1"] }), &policy());
        assert!(validated.is_valid());
        assert_eq!(validated.value, json!({ "worn": "NO" }));
    }

    #[test]
    fn later_conditions_apply_when_earlier_ones_have_no_branch() {
        let schema = Schema::object([
            ("kind", Schema::string()),
            (
                "detail",
                Schema::when("kind", Condition::equals("NAME"), Schema::string().required())
                    .or_when(
                        "kind",
                        Condition::equals("COUNT"),
                        Schema::number().integer().required(),
                    ),
            ),
        ]);

        let validated = schema.validate(&json!({ "kind": "COUNT", "detail": "12" }), &policy());
        assert!(validated.is_valid(), "{:?}", validated.errors);
        assert_eq!(validated.value, json!({ "kind": "COUNT", "detail": 12 }));

        let validated = schema.validate(&json!({ "kind": "COUNT", "detail": "twelve" }), &policy());
        assert_eq!(validated.errors[0].code, "number.base");
        assert_eq!(paths(&validated), vec![vec![PathSegment::from("detail")]]);

        let validated = schema.validate(&json!({ "kind": "NAME" }), &policy());
        assert_eq!(validated.errors[0].code, "any.required");

        let validated = schema.validate(&json!({ "kind": "OTHER", "detail": [1] }), &policy());
        assert!(validated.is_valid());
        assert_eq!(validated.value["detail"], json!([1]));
    }

    #[test]
    fn forbidden_values_are_reported_but_absence_is_fine() {
        let schema = Schema::object([
            ("planned", Schema::boolean()),
            (
                "authorisedBy",
                Schema::when("planned", Condition::equals(true), Schema::string().required())
                    .otherwise(Schema::any().forbidden()),
            ),
        ]);

        let validated =
            schema.validate(&json!({ "planned": false, "authorisedBy": "Sam" }), &policy());
        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].code, "any.unknown");
        assert_eq!(validated.errors[0].message, "\"authorisedBy\" is not allowed");

        let validated = schema.validate(&json!({ "planned": false }), &policy());
        assert!(validated.is_valid());
    }

    #[test]
    fn pattern_failures_name_the_pattern_and_value() {
        let schema = Schema::object([(
            "cameraNum",
            Schema::string().pattern("alphanumeric", |text| {
                text.chars().all(|c| c.is_ascii_alphanumeric())
            }),
        )]);

        let validated = schema.validate(&json!({ "cameraNum": "AB123" }), &policy());
        assert!(validated.is_valid());

        let validated = schema.validate(&json!({ "cameraNum": "AB-12" }), &policy());
        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].code, "string.pattern.base");
        assert_eq!(
            validated.errors[0].message,
            "\"cameraNum\" with value \"AB-12\" fails to match the alphanumeric pattern"
        );
    }

    #[test]
    fn integer_rule_stores_whole_decimals_as_integers() {
        let schema = Schema::object([("month", Schema::number().integer().max_digits(2))]);
        let validated = schema.validate(&json!({ "month": "2.0" }), &policy());
        assert!(validated.is_valid());
        assert_eq!(validated.value["month"].as_i64(), Some(2));
    }

    #[test]
    fn valid_list_reports_allowed_values() {
        let schema = Schema::object([("camera", Schema::string().valid(["YES", "NO"]))]);
        let validated = schema.validate(&json!({ "camera": "MAYBE" }), &policy());
        assert_eq!(validated.errors[0].code, "any.only");
        assert_eq!(validated.errors[0].message, "\"camera\" must be one of [YES, NO]");
    }

    #[test]
    fn unique_reports_each_later_duplicate_once() {
        let schema = Schema::object([(
            "witnesses",
            Schema::array(Schema::object([("name", Schema::string())]))
                .unique_by("name", Arc::new(ignore_case))
                .messages([("array.unique", "Witness '{#dupeValue}' has already been added")]),
        )]);

        let input = json!({
            "witnesses": [{ "name": "Jo Bloggs" }, { "name": "Sam" }, { "name": " jo bloggs" }]
        });
        let validated = schema.validate(&input, &policy());

        assert_eq!(
            paths(&validated),
            vec![vec![PathSegment::from("witnesses"), PathSegment::from(2)]]
        );
        assert_eq!(
            validated.errors[0].message,
            "Witness ' jo bloggs' has already been added"
        );
    }

    #[test]
    fn array_rules_still_run_when_items_fail() {
        let schema = Schema::object([(
            "tags",
            Schema::array(Schema::object([("tag", Schema::string().required())]))
                .unique_by("tag", Arc::new(ignore_case)),
        )]);

        let input = json!({ "tags": [{ "tag": "A" }, {}, { "tag": "a" }] });
        let validated = schema.validate(&input, &policy());

        assert_eq!(
            paths(&validated),
            vec![
                vec![PathSegment::from("tags"), PathSegment::from(1), PathSegment::from("tag")],
                vec![PathSegment::from("tags"), PathSegment::from(2)],
            ]
        );
    }

    #[test]
    fn number_rules_stop_at_first_failure() {
        let schema = Schema::object([(
            "minute",
            Schema::number().integer().min(0).max(59).max_digits(2),
        )]);

        let validated = schema.validate(&json!({ "minute": "007" }), &policy());
        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].code, "number.digits");

        let validated = schema.validate(&json!({ "minute": "-1" }), &policy());
        assert_eq!(validated.errors[0].code, "number.min");
        assert_eq!(
            validated.errors[0].message,
            "\"minute\" must be greater than or equal to 0"
        );

        let validated = schema.validate(&json!({ "minute": "1.5" }), &policy());
        assert_eq!(validated.errors[0].code, "number.integer");
    }

    #[test]
    fn custom_rules_see_siblings_and_clock() {
        let schema = Schema::object([
            ("year", Schema::number()),
            (
                "later",
                Schema::number().custom("after-year", |value, context| {
                    let year = context.sibling("year").and_then(Value::as_i64).unwrap_or(0);
                    let current = i64::from(chrono::Datelike::year(&context.now.date()));
                    match value.as_i64() {
                        Some(later) if later < year => {
                            Err(vec![Violation::new("later.before", "Must be after {#label}")])
                        }
                        Some(later) if later > current => Ok(Some(Value::from(current))),
                        _ => Ok(None),
                    }
                }),
            ),
        ]);

        let validated = schema.validate(&json!({ "year": 2010, "later": 2005 }), &policy());
        assert_eq!(validated.errors[0].code, "later.before");
        assert_eq!(validated.errors[0].message, "Must be after later");

        let validated = schema.validate(&json!({ "year": 2010, "later": 2030 }), &policy());
        assert!(validated.is_valid());
        assert_eq!(validated.value, json!({ "year": 2010, "later": 2019 }));
    }

    #[test]
    fn single_value_is_wrapped_into_array() {
        let schema = Schema::object([(
            "positions",
            Schema::array(Schema::string().valid(["STANDING", "KNEELING"])).single(),
        )]);

        let validated = schema.validate(&json!({ "positions": "KNEELING" }), &policy());
        assert!(validated.is_valid());
        assert_eq!(validated.value, json!({ "positions": ["KNEELING"] }));
    }

    #[test]
    fn empty_string_is_not_a_string_answer() {
        let schema = Schema::object([("name", Schema::string().required())]);
        let validated = schema.validate(&json!({ "name": "" }), &policy());
        assert_eq!(validated.errors[0].code, "string.empty");
    }

    #[test]
    fn null_counts_as_missing() {
        let schema = Schema::object([
            ("name", Schema::string().required()),
            ("note", Schema::string()),
        ]);
        let validated = schema.validate(&json!({ "name": null, "note": null }), &policy());
        assert_eq!(paths(&validated), vec![vec![PathSegment::from("name")]]);
    }
}
