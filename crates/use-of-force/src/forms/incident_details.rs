//! When and where the incident happened, and who saw it.

use chrono::NaiveDate;
use serde_json::Value;

use super::fields::{repeatable_group, required_text, when_yes, yes_no};
use crate::validation::transforms::{to_integer, trimmed_string};
use crate::validation::{FieldType, RuleContext, Schema, Violation};

/// Format of the `value` added to a validated incident date.
pub const INCIDENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn schema() -> Schema {
    Schema::object([
        ("incidentDate", incident_date()),
        (
            "locationId",
            Schema::number()
                .integer()
                .min(1)
                .required()
                .message("Select the location of the incident")
                .sanitise(to_integer()),
        ),
        (
            "plannedUseOfForce",
            yes_no("Select yes if the use of force was planned"),
        ),
        (
            "authorisedBy",
            when_yes(
                "plannedUseOfForce",
                required_text("Enter the name of the person who authorised the use of force"),
            ),
        ),
        ("witnesses", witnesses()),
    ])
}

/// Date and time entered as separate inputs. Stored outside the section
/// payload, with the reconstructed timestamp under `value`.
pub fn incident_date() -> Schema {
    Schema::object([
        (
            "date",
            Schema::object([
                ("day", date_part(1, 31, 2, "Enter the day", "Enter a day between 1 and 31")),
                (
                    "month",
                    date_part(1, 12, 2, "Enter the month", "Enter a month between 1 and 12"),
                ),
                (
                    "year",
                    date_part(1900, 9999, 4, "Enter the year", "Enter a year using 4 numbers"),
                ),
            ])
            .required()
            .message("Enter the date of the incident"),
        ),
        (
            "time",
            Schema::object([
                ("hour", date_part(0, 23, 2, "Enter the hour", "Enter an hour between 0 and 23")),
                (
                    "minute",
                    date_part(0, 59, 2, "Enter the minute", "Enter a minute between 0 and 59"),
                ),
            ])
            .required()
            .message("Enter the time of the incident"),
        ),
    ])
    .required()
    .message("Enter the date and time of the incident")
    .custom("incident-date-not-in-future", check_incident_date)
    .field_type(FieldType::Extracted)
}

fn date_part(min: i64, max: i64, digits: usize, missing: &str, invalid: &str) -> Schema {
    Schema::number()
        .integer()
        .min(min)
        .max(max)
        .max_digits(digits)
        .required()
        .message(invalid)
        .messages([("any.required", missing)])
        .sanitise(trimmed_string())
}

pub fn witnesses() -> Schema {
    repeatable_group(
        [("name", required_text("Enter the witness name"))],
        "name",
        "Witness '{#dupeValue}' has already been added - remove this witness",
    )
}

fn check_incident_date(
    value: &Value,
    context: &RuleContext<'_>,
) -> Result<Option<Value>, Vec<Violation>> {
    let part = |group: &str, field: &str| {
        value
            .get(group)
            .and_then(|group| group.get(field))
            .and_then(Value::as_i64)
            .and_then(|part| u32::try_from(part).ok())
    };
    let (Some(day), Some(month), Some(year), Some(hour), Some(minute)) = (
        part("date", "day"),
        part("date", "month"),
        part("date", "year"),
        part("time", "hour"),
        part("time", "minute"),
    ) else {
        return Err(vec![
            Violation::new("date.invalid", "Enter a date that is valid").at("date")
        ]);
    };

    let date = i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day));
    let Some(date) = date else {
        return Err(vec![
            Violation::new("date.invalid", "Enter a date that is valid").at("date")
        ]);
    };
    if date > context.now.date() {
        return Err(vec![Violation::new(
            "date.future",
            "Enter a date that is not in the future",
        )
        .at("date")]);
    }

    let Some(occurred_at) = date.and_hms_opt(hour, minute, 0) else {
        return Err(vec![
            Violation::new("time.invalid", "Enter a time that is valid").at("time")
        ]);
    };
    if occurred_at > context.now {
        return Err(vec![Violation::new(
            "time.future",
            "Enter a time which is not in the future",
        )
        .at("time")]);
    }

    let mut incident = value.as_object().cloned().unwrap_or_default();
    incident.insert(
        "value".to_string(),
        Value::String(occurred_at.format(INCIDENT_DATE_FORMAT).to_string()),
    );
    Ok(Some(Value::Object(incident)))
}
