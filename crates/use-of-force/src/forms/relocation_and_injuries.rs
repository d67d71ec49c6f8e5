use super::fields::{one_of, repeatable_group, required_text, when_answer, when_yes, yes_no};
use crate::validation::{Condition, Schema};

pub const RELOCATION_DESTINATIONS: [&str; 7] = [
    "OWN_CELL",
    "GATED_CELL",
    "SEGREGATION_UNIT",
    "SPECIAL_ACCOMMODATION",
    "CELLULAR_VEHICLE",
    "RECEPTION",
    "OTHER_WING",
];

pub const RELOCATION_TYPES: [&str; 3] = ["PRIMARY", "FULL", "OTHER"];

pub fn schema() -> Schema {
    Schema::object([
        (
            "prisonerRelocation",
            one_of(&RELOCATION_DESTINATIONS, "Select where the prisoner was relocated to"),
        ),
        (
            "relocationCompliancy",
            yes_no("Select yes if the relocation was compliant"),
        ),
        (
            "relocationType",
            when_answer(
                "relocationCompliancy",
                Condition::equals(false),
                one_of(&RELOCATION_TYPES, "Select the type of relocation"),
            ),
        ),
        (
            "healthcareInvolved",
            yes_no("Select yes if a member of healthcare was present during the incident"),
        ),
        (
            "healthcarePractionerName",
            when_yes(
                "healthcareInvolved",
                required_text("Enter the name of the member of healthcare"),
            ),
        ),
        (
            "prisonerInjuries",
            yes_no("Select yes if the prisoner sustained any injuries"),
        ),
        (
            "f213CompletedBy",
            required_text("Enter the name of the person who completed the F213 form"),
        ),
        (
            "prisonerHospitalisation",
            yes_no("Select yes if the prisoner needed outside hospitalisation"),
        ),
        (
            "staffMedicalAttention",
            yes_no("Select yes if a staff member needed medical attention"),
        ),
        ("staffNeedingMedicalAttention", staff_needing_medical_attention()),
    ])
}

pub fn staff_needing_medical_attention() -> Schema {
    let staff = repeatable_group(
        [
            (
                "name",
                required_text("Enter the name of who needed medical attention"),
            ),
            (
                "hospitalisation",
                yes_no("Select yes if the staff member had to go to hospital"),
            ),
        ],
        "name",
        "Name '{#dupeValue}' has already been added - remove this name",
    )
    .min(1)
    .required()
    .messages([
        ("any.required", "Enter the name of who needed medical attention"),
        ("array.min", "Enter the name of who needed medical attention"),
    ]);

    when_yes("staffMedicalAttention", staff).first_field_name("staffNeedingMedicalAttention[0][name]")
}
