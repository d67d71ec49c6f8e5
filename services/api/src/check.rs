use chrono::NaiveDateTime;
use clap::Args;
use std::path::PathBuf;
use use_of_force::config::{AppConfig, ClockConfig};
use use_of_force::error::AppError;
use use_of_force::forms::{FormRegistry, SectionName};
use use_of_force::validation::ProcessedInput;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Section to check, e.g. incidentDetails or evidence
    #[arg(long)]
    pub(crate) section: SectionName,
    /// JSON file holding the submitted answers
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Judge dates against this moment (YYYY-MM-DDTHH:MM) instead of the clock
    #[arg(long, value_parser = crate::infra::parse_now)]
    pub(crate) now: Option<NaiveDateTime>,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        section,
        input,
        now,
    } = args;

    let clock = match now {
        Some(now) => ClockConfig::Fixed(now),
        None => AppConfig::load()?.clock,
    };
    let raw = std::fs::read_to_string(&input)?;
    let submission = serde_json::from_str(&raw)?;

    let registry = FormRegistry::build()?;
    let processed = registry.process(section, submission, &clock.policy())?;
    print!("{}", render_outcome(section, &processed)?);

    Ok(())
}

pub(crate) fn render_outcome(
    section: SectionName,
    processed: &ProcessedInput,
) -> Result<String, AppError> {
    let mut lines = Vec::new();
    if processed.is_valid() {
        lines.push(format!("Section {section}: valid"));
    } else {
        lines.push(format!(
            "Section {section}: {} error(s)",
            processed.errors.len()
        ));
        for error in &processed.errors {
            lines.push(format!("  {:<48} {}", error.href, error.text));
        }
    }

    lines.push(String::new());
    lines.push("Payload fields".to_string());
    lines.push(serde_json::to_string_pretty(&processed.payload_fields)?);
    if !processed.extracted_fields.is_empty() {
        lines.push(String::new());
        lines.push("Extracted fields".to_string());
        lines.push(serde_json::to_string_pretty(&processed.extracted_fields)?);
    }
    lines.push(String::new());
    Ok(lines.join("\n"))
}
