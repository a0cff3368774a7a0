//! Constants used throughout inquiry

/// Question file extensions in order of preference
pub const QUESTION_FILE_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Prompt type used when a question does not name one
pub const DEFAULT_PROMPT_TYPE: &str = "input";

/// Default number of choices shown at once by paginated lists
pub const DEFAULT_PAGE_SIZE: usize = 7;

/// Default separator line
pub const SEPARATOR_LINE: &str = "──────────────";

/// Default password mask
pub const DEFAULT_MASK: char = '*';

/// Width used when the output is not a terminal
pub const FALLBACK_WIDTH: u16 = 80;

/// Status bar spinner used by `inquiry watch`
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Milliseconds between spinner frames
pub const SPINNER_INTERVAL_MS: u64 = 80;

/// User facing validation messages
pub mod validation {
    pub const INVALID_ANSWER: &str = "Please enter a valid value";
    pub const INVALID_INDEX: &str = "Please enter a valid index";
    pub const INVALID_KEY: &str = "Please enter a valid command";
    pub const DEFAULT_CONDITION: &str = "true";
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const INTERRUPTED: i32 = 130;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
