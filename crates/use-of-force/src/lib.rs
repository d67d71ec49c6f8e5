//! Use of force incident reporting: form section schemas and the pipeline that
//! sanitises, validates and splits each submitted section.

pub mod config;
pub mod error;
pub mod forms;
pub mod reports;
pub mod telemetry;
pub mod validation;
