//! Measuring rendered text on the terminal.

use unicode_width::UnicodeWidthStr;

/// Removes ANSI escape sequences (CSI and two-byte escapes) from `s`.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        match chars.next() {
            // CSI: parameters and intermediates up to a final byte in @..~
            Some('[') => {
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            // OSC: terminated by BEL or ST
            Some(']') => {
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Number of columns `s` occupies, ignoring escape sequences.
pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

/// Number of terminal rows `text` occupies once soft-wrapped at `width`.
///
/// Every `\n`-separated line takes at least one row; a line wider than the
/// terminal takes one extra row per started `width` columns.
pub fn line_count(text: &str, width: u16) -> usize {
    let width = usize::from(width.max(1));
    text.split('\n')
        .map(|line| visible_width(line).div_ceil(width).max(1))
        .sum()
}

/// Column the cursor sits on after writing the last line of `text`.
pub fn last_line_column(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let last = text.rsplit('\n').next().unwrap_or_default();
    (visible_width(last) % width) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_ansi("\x1b[32m?\x1b[39m \x1b[1mName\x1b[22m"), "? Name");
        assert_eq!(visible_width("\x1b[36mAda\x1b[0m"), 3);
    }

    #[test]
    fn counts_wide_characters() {
        assert_eq!(visible_width("日本"), 4);
        assert_eq!(visible_width("❯ a"), 3);
    }

    #[test]
    fn counts_explicit_lines() {
        assert_eq!(line_count("one", 80), 1);
        assert_eq!(line_count("one\ntwo\nthree", 80), 3);
        assert_eq!(line_count("", 80), 1);
        assert_eq!(line_count("trailing\n", 80), 2);
    }

    #[test]
    fn counts_soft_wrapped_lines() {
        let long = "x".repeat(25);
        assert_eq!(line_count(&long, 10), 3);
        assert_eq!(line_count(&"x".repeat(20), 10), 2);
        assert_eq!(line_count(&format!("{long}\nshort"), 10), 4);
        assert_eq!(line_count(&format!("\x1b[1m{}\x1b[0m", "x".repeat(10)), 10), 1);
    }

    #[test]
    fn cursor_column_after_last_line() {
        assert_eq!(last_line_column("? Name: Ada", 80), 11);
        assert_eq!(last_line_column("first\nab", 80), 2);
        assert_eq!(last_line_column(&"x".repeat(12), 10), 2);
    }
}
