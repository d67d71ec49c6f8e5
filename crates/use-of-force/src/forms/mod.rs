//! Report sections and the schemas their submissions are checked against.

pub mod evidence;
mod fields;
pub mod incident_details;
pub mod relocation_and_injuries;
pub mod statement;
pub mod use_of_force_details;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::validation::{
    process_input_with, ProcessedInput, Schema, SchemaError, ValidationPolicy, ValidationSpec,
};

/// Reported against the whole section when its body is not an object.
pub const SECTION_ANSWERS_MISSING: &str = "Answer the questions in this section";

pub use fields::{case_insensitive_trimmed, NOT_KNOWN, NO, YES};

/// A page of the report. The serialized name is the key its answers are
/// persisted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionName {
    IncidentDetails,
    UseOfForceDetails,
    RelocationAndInjuries,
    Evidence,
    Statement,
}

impl SectionName {
    pub const ALL: [SectionName; 5] = [
        SectionName::IncidentDetails,
        SectionName::UseOfForceDetails,
        SectionName::RelocationAndInjuries,
        SectionName::Evidence,
        SectionName::Statement,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SectionName::IncidentDetails => "incidentDetails",
            SectionName::UseOfForceDetails => "useOfForceDetails",
            SectionName::RelocationAndInjuries => "relocationAndInjuries",
            SectionName::Evidence => "evidence",
            SectionName::Statement => "statement",
        }
    }

    /// A section is submitted as one object of answers; anything else,
    /// `null` included, is rejected as a whole.
    pub fn schema(self) -> Schema {
        let section = match self {
            SectionName::IncidentDetails => incident_details::schema(),
            SectionName::UseOfForceDetails => use_of_force_details::schema(),
            SectionName::RelocationAndInjuries => relocation_and_injuries::schema(),
            SectionName::Evidence => evidence::schema(),
            SectionName::Statement => statement::schema(),
        };
        section.required().message(SECTION_ANSWERS_MISSING)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SectionName {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SectionName::ALL
            .into_iter()
            .find(|section| section.key() == value)
            .ok_or_else(|| SchemaError::UnknownSection(value.to_string()))
    }
}

/// One section with its compiled spec.
#[derive(Debug, Clone)]
pub struct FormSection {
    name: SectionName,
    spec: ValidationSpec,
}

impl FormSection {
    pub fn build(name: SectionName) -> Result<Self, SchemaError> {
        Ok(Self {
            name,
            spec: ValidationSpec::build(name.schema())?,
        })
    }

    pub fn name(&self) -> SectionName {
        self.name
    }

    pub fn spec(&self) -> &ValidationSpec {
        &self.spec
    }

    pub fn process(&self, input: Value, policy: &ValidationPolicy) -> ProcessedInput {
        process_input_with(&self.spec, input, policy)
    }
}

/// Every section, compiled once at startup and shared between requests.
#[derive(Debug, Clone)]
pub struct FormRegistry {
    sections: BTreeMap<SectionName, FormSection>,
}

impl FormRegistry {
    /// Fails fast when any section schema is misconfigured.
    pub fn build() -> Result<Self, SchemaError> {
        let sections = SectionName::ALL
            .into_iter()
            .map(|name| FormSection::build(name).map(|section| (name, section)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        info!(sections = sections.len(), "compiled form sections");
        Ok(Self { sections })
    }

    pub fn section(&self, name: SectionName) -> Option<&FormSection> {
        self.sections.get(&name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &FormSection> {
        self.sections.values()
    }

    pub fn process(
        &self,
        name: SectionName,
        input: Value,
        policy: &ValidationPolicy,
    ) -> Result<ProcessedInput, SchemaError> {
        let section = self
            .section(name)
            .ok_or_else(|| SchemaError::UnknownSection(name.key().to_string()))?;
        Ok(section.process(input, policy))
    }
}
