#![allow(dead_code)]

use chrono::NaiveDate;
use use_of_force::forms::{FormRegistry, SectionName};
use use_of_force::validation::{ProcessedInput, ValidationPolicy};
use serde_json::Value;

/// 2019-01-15 10:00, the clock every scenario is judged against.
pub fn policy() -> ValidationPolicy {
    let now = NaiveDate::from_ymd_opt(2019, 1, 15)
        .and_then(|date| date.and_hms_opt(10, 0, 0))
        .expect("valid timestamp");
    ValidationPolicy::at(now)
}

pub fn registry() -> FormRegistry {
    FormRegistry::build().expect("every section compiles")
}

pub fn process(section: SectionName, input: Value) -> ProcessedInput {
    registry()
        .process(section, input, &policy())
        .expect("section is registered")
}

pub fn hrefs(result: &ProcessedInput) -> Vec<&str> {
    result.errors.iter().map(|error| error.href.as_str()).collect()
}
