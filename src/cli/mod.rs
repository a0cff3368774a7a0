pub mod answers;
pub mod args;
pub mod runner;

pub use args::{get_log_level_from_verbose, parse_cli, AskArgs, Cli, Commands, WatchArgs};
pub use runner::run;
