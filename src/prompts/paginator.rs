//! Windowing of long choice lists.

use super::hint;

const MORE_CHOICES: &str = "(Move up and down to reveal more choices)";

/// Shows at most `page_size` lines around the active one.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: usize,
    enabled: bool,
}

impl Paginator {
    pub fn new(page_size: usize, enabled: bool) -> Self {
        Self { page_size: page_size.max(1), enabled }
    }

    /// Joins the visible window of `lines`, keeping `active` in view.
    pub fn paginate(&self, lines: &[String], active: usize) -> String {
        if !self.enabled || lines.len() <= self.page_size {
            return lines.join("\n");
        }
        let half = self.page_size / 2;
        let start = active.saturating_sub(half).min(lines.len() - self.page_size);
        let mut page = lines[start..start + self.page_size].join("\n");
        page.push('\n');
        page.push_str(&hint(MORE_CHOICES));
        page
    }
}
