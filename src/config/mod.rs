//! Question files
//!
//! - `types`: field types shared by question definitions
//! - `question`: a single question definition and its conversion
//! - `loader`: reading and parsing whole files

pub mod loader;
pub mod question;
pub mod types;


pub use loader::QuestionFile;
pub use question::QuestionSpec;
pub use types::{ChoicesSpec, ValidationRule, When};
