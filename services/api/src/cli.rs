use crate::check::{run_check, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use use_of_force::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "use-of-force",
    about = "Check and store use of force report sections",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a JSON submission through a section's checks and print the outcome
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use use_of_force::forms::SectionName;

    #[test]
    fn check_parses_section_and_clock() {
        let cli = Cli::try_parse_from([
            "use-of-force",
            "check",
            "--section",
            "incidentDetails",
            "--input",
            "answers.json",
            "--now",
            "2019-01-15T10:00",
        ])
        .expect("arguments parse");

        let Some(Command::Check(args)) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.section, SectionName::IncidentDetails);
        assert_eq!(args.input.to_string_lossy(), "answers.json");
        assert!(args.now.is_some());
    }

    #[test]
    fn unknown_sections_are_rejected_by_the_parser() {
        let result = Cli::try_parse_from([
            "use-of-force",
            "check",
            "--section",
            "summary",
            "--input",
            "answers.json",
        ]);
        assert!(result.is_err());
    }
}
