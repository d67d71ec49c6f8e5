//! A staff member's own account of the incident.

use super::fields::{not_after_current_year, optional_text};
use crate::validation::transforms::{to_integer, trimmed_string};
use crate::validation::Schema;

pub fn schema() -> Schema {
    Schema::object([
        (
            "lastTrainingMonth",
            Schema::number()
                .integer()
                .min(0)
                .max(11)
                .required()
                .message("Select the month you last attended refresher training")
                .sanitise(to_integer()),
        ),
        (
            "lastTrainingYear",
            past_year("Enter the year you last attended refresher training"),
        ),
        (
            "jobStartYear",
            past_year("Enter the year you joined the prison service"),
        ),
        (
            "statement",
            Schema::string()
                .required()
                .message("Enter your statement")
                .sanitise(trimmed_string()),
        ),
        ("additionalComments", optional_text()),
    ])
}

fn past_year(missing: &str) -> Schema {
    Schema::number()
        .integer()
        .min(1900)
        .max_digits(4)
        .required()
        .message("Enter a real year using 4 numbers")
        .messages([("any.required", missing)])
        .custom(
            "not-after-current-year",
            not_after_current_year("Enter a year that is not in the future"),
        )
        .sanitise(trimmed_string())
}
