//! Terminal UI building blocks shared by the prompts.

pub mod base;
pub mod bottom_bar;
pub mod console;
pub mod keypress;
pub mod screen;
pub mod text;

pub use base::BaseUi;
pub use bottom_bar::{BarLog, BottomBar};
pub use console::{Console, KeyStream, Output, VirtualTerminal};
pub use keypress::Keypress;
pub use screen::Screen;
