use crate::ui::Keypress;

/// Single-line text buffer edited by keypresses.
#[derive(Debug, Default)]
pub(crate) struct LineEditor {
    buffer: String,
}

impl LineEditor {
    /// Applies an editing key. Returns `false` for keys it does not handle.
    pub fn handle(&mut self, key: &Keypress) -> bool {
        if key.is("backspace") {
            self.buffer.pop();
            return true;
        }
        match key.printable() {
            Some(c) => {
                self.buffer.push(c);
                true
            }
            None => false,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
