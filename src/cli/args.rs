use crate::constants::{exit_codes, verbosity};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Interactive question and answer prompts for the command line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the questions of a question file and print the answers as JSON.
    Ask(AskArgs),

    /// Run a command, streaming its output above a status bar.
    Watch(WatchArgs),
}

/// Arguments for the ask command.
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// Question file (`.json`, `.yaml`, `.yml`) or `-` to read YAML from stdin.
    #[arg(value_name = "QUESTIONS")]
    pub questions: PathBuf,

    /// Predefined answers as JSON string or `-` to read from stdin.
    #[arg(short, long)]
    pub answers: Option<String>,

    /// Answer every question with its default instead of asking.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,

    /// Write the answers to a file instead of stdout. Prompts are drawn on stderr.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the watch command.
#[derive(Parser, Debug, Clone)]
pub struct WatchArgs {
    /// Text shown in the status bar next to the spinner.
    #[arg(short, long, default_value = "Running")]
    pub status: String,

    /// The command to run, after `--`.
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
    pub command: Vec<String>,
}

/// Parse command line arguments, printing help when a required input is missing.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument
            || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_verbose_flags_to_log_filters() {
        assert_eq!(get_log_level_from_verbose(verbosity::OFF), LevelFilter::Error);
        assert_eq!(get_log_level_from_verbose(verbosity::INFO), LevelFilter::Info);
        assert_eq!(get_log_level_from_verbose(verbosity::DEBUG), LevelFilter::Debug);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE), LevelFilter::Trace);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE + 1), LevelFilter::Trace);
    }

    #[test]
    fn parses_ask_command() {
        let cli = Cli::parse_from([
            "inquiry",
            "ask",
            "questions.yaml",
            "-vv",
            "--answers",
            "{\"name\":\"John\"}",
            "--non-interactive",
            "--output",
            "answers.json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Ask(args) = cli.command else {
            panic!("expected the ask command");
        };
        assert_eq!(args.questions, PathBuf::from("questions.yaml"));
        assert_eq!(args.answers.as_deref(), Some("{\"name\":\"John\"}"));
        assert!(args.non_interactive);
        assert_eq!(args.output, Some(PathBuf::from("answers.json")));
    }

    #[test]
    fn parses_watch_command_with_trailing_args() {
        let cli = Cli::parse_from(["inquiry", "watch", "--", "cargo", "build", "--release"]);
        let Commands::Watch(args) = cli.command else {
            panic!("expected the watch command");
        };
        assert_eq!(args.status, "Running");
        assert_eq!(args.command, ["cargo", "build", "--release"]);
    }

    #[test]
    fn watch_requires_a_command() {
        assert!(Cli::try_parse_from(["inquiry", "watch"]).is_err());
    }
}
