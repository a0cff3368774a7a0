//! Structured keypress events

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Logical key names and the raw sequences a terminal sends for them.
const NAMED_KEYS: &[(&str, &str)] = &[
    ("return", "\r"),
    ("backspace", "\x7f"),
    ("tab", "\t"),
    ("escape", "\x1b"),
    ("space", " "),
    ("up", "\x1b[A"),
    ("down", "\x1b[B"),
    ("right", "\x1b[C"),
    ("left", "\x1b[D"),
    ("home", "\x1b[H"),
    ("end", "\x1b[F"),
    ("delete", "\x1b[3~"),
    ("pageup", "\x1b[5~"),
    ("pagedown", "\x1b[6~"),
];

/// A keypress as dispatched to the active prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypress {
    /// Raw input the key produced.
    pub sequence: String,
    /// Logical key name (`"return"`, `"up"`, `"a"`, ...), if it has one.
    pub name: Option<String>,
    pub meta: bool,
    pub shift: bool,
    pub ctrl: bool,
}

impl Keypress {
    /// A printable character, as typed.
    pub fn char(c: char) -> Self {
        let name = match c {
            ' ' => Some("space".to_string()),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase().to_string()),
            _ => None,
        };
        Self {
            sequence: c.to_string(),
            name,
            meta: false,
            shift: c.is_uppercase(),
            ctrl: false,
        }
    }

    /// A non-printable key by its logical name.
    pub fn named(name: &str) -> Self {
        let sequence = NAMED_KEYS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, seq)| seq.to_string())
            .unwrap_or_default();
        Self { sequence, name: Some(name.to_string()), meta: false, shift: false, ctrl: false }
    }

    /// Ctrl + letter.
    pub fn ctrl(c: char) -> Self {
        let lower = c.to_ascii_lowercase();
        let sequence = if lower.is_ascii_lowercase() {
            char::from(lower as u8 - b'a' + 1).to_string()
        } else {
            String::new()
        };
        Self { sequence, name: Some(lower.to_string()), meta: false, shift: false, ctrl: true }
    }

    /// One keypress per character of `text`.
    pub fn text(text: &str) -> Vec<Self> {
        text.chars().map(Self::char).collect()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    /// The character this key inserts into a text line, if any.
    pub fn printable(&self) -> Option<char> {
        if self.ctrl || self.meta {
            return None;
        }
        let mut chars = self.sequence.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// Ctrl+C: the user asked to abort.
    pub fn is_interrupt(&self) -> bool {
        self.ctrl && self.is("c")
    }
}

impl From<KeyEvent> for Keypress {
    fn from(event: KeyEvent) -> Self {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let meta = event.modifiers.contains(KeyModifiers::ALT);
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);

        let mut key = match event.code {
            KeyCode::Char(c) if ctrl => Self::ctrl(c),
            KeyCode::Char(c) => Self::char(c),
            KeyCode::Enter => Self::named("return"),
            KeyCode::Backspace => Self::named("backspace"),
            KeyCode::Tab => Self::named("tab"),
            KeyCode::BackTab => Self { shift: true, ..Self::named("tab") },
            KeyCode::Esc => Self::named("escape"),
            KeyCode::Up => Self::named("up"),
            KeyCode::Down => Self::named("down"),
            KeyCode::Left => Self::named("left"),
            KeyCode::Right => Self::named("right"),
            KeyCode::Home => Self::named("home"),
            KeyCode::End => Self::named("end"),
            KeyCode::Delete => Self::named("delete"),
            KeyCode::PageUp => Self::named("pageup"),
            KeyCode::PageDown => Self::named("pagedown"),
            KeyCode::F(n) => Self::named(&format!("f{n}")),
            _ => Self { sequence: String::new(), name: None, meta, shift, ctrl },
        };
        key.ctrl |= ctrl;
        key.meta |= meta;
        key.shift |= shift;
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: KeyCode, modifiers: KeyModifiers) -> Keypress {
        KeyEvent::new(code, modifiers).into()
    }

    #[test]
    fn converts_plain_characters() {
        let key = event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(key.sequence, "a");
        assert_eq!(key.name(), Some("a"));
        assert_eq!(key.printable(), Some('a'));
        assert!(!key.ctrl && !key.meta && !key.shift);
    }

    #[test]
    fn uppercase_sets_shift() {
        let key = event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key.name(), Some("a"));
        assert!(key.shift);
        assert_eq!(key.printable(), Some('A'));
    }

    #[test]
    fn converts_named_keys() {
        let enter = event(KeyCode::Enter, KeyModifiers::NONE);
        assert!(enter.is("return"));
        assert_eq!(enter.sequence, "\r");
        assert_eq!(enter.printable(), None);

        let up = event(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(up.sequence, "\x1b[A");
        assert!(event(KeyCode::Char(' '), KeyModifiers::NONE).is("space"));
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        let key = event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(key.is_interrupt());
        assert_eq!(key.sequence, "\x03");
        assert_eq!(key.printable(), None);
        assert_eq!(key, Keypress::ctrl('c'));
        assert!(!Keypress::char('c').is_interrupt());
    }

    #[test]
    fn meta_modifier_is_kept() {
        let key = event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert!(key.meta);
        assert_eq!(key.printable(), None);
    }

    #[test]
    fn text_expands_to_characters() {
        let keys = Keypress::text("Ada");
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].printable(), Some('A'));
    }
}
