//! Techniques and equipment used during the incident.

use super::fields::{one_of, repeatable_group, required_text, when_answer, when_yes, yes_no};
use super::{NOT_KNOWN, NO, YES};
use crate::validation::transforms::to_integer;
use crate::validation::{Condition, Schema};

pub const RESTRAINT_POSITIONS: [&str; 4] = ["STANDING", "FACE_DOWN", "ON_BACK", "KNEELING"];

pub fn schema() -> Schema {
    Schema::object([
        (
            "positiveCommunication",
            yes_no("Select yes if positive communication was used"),
        ),
        (
            "bodyWornCamera",
            one_of(
                &[YES, NO, NOT_KNOWN],
                "Select yes if any part of the incident was captured on a body-worn camera",
            ),
        ),
        ("bodyWornCameraNumbers", body_worn_camera_numbers()),
        (
            "personalProtectionTechniques",
            yes_no("Select yes if any personal protection techniques were used"),
        ),
        ("batonDrawn", yes_no("Select yes if a baton was drawn")),
        (
            "batonUsed",
            when_yes("batonDrawn", yes_no("Select yes if a baton was used")),
        ),
        ("pavaDrawn", yes_no("Select yes if PAVA was drawn")),
        (
            "pavaUsed",
            when_yes("pavaDrawn", yes_no("Select yes if PAVA was used")),
        ),
        ("guidingHold", yes_no("Select yes if a guiding hold was used")),
        (
            "guidingHoldOfficersInvolved",
            when_yes(
                "guidingHold",
                Schema::number()
                    .valid([1, 2])
                    .required()
                    .message("Select how many officers were involved in the guiding hold")
                    .sanitise(to_integer()),
            ),
        ),
        ("restraint", yes_no("Select yes if control and restraint was used")),
        (
            "restraintPositions",
            when_yes(
                "restraint",
                Schema::array(
                    Schema::string()
                        .valid(RESTRAINT_POSITIONS)
                        .message("Select the control and restraint positions used"),
                )
                .single()
                .min(1)
                .required()
                .message("Select the control and restraint positions used"),
            ),
        ),
        (
            "handcuffsApplied",
            when_yes("restraint", yes_no("Select yes if handcuffs were applied")),
        ),
    ])
}

/// Only kept while a camera recorded the incident.
pub fn body_worn_camera_numbers() -> Schema {
    let numbers = repeatable_group(
        [("cameraNum", required_text("Enter the body-worn camera number"))],
        "cameraNum",
        "Camera '{#dupeValue}' has already been added - remove this camera number",
    )
    .min(1)
    .required()
    .messages([
        ("any.required", "Enter the body-worn camera number"),
        ("array.min", "Enter the body-worn camera number"),
    ]);

    when_answer("bodyWornCamera", Condition::equals(YES), numbers)
        .first_field_name("bodyWornCameraNumbers[0][cameraNum]")
}
