//! A status region pinned below streaming log output.

use crate::{
    error::Result,
    ui::{
        base::BaseUi,
        console::{Console, Output},
        keypress::Keypress,
        screen::erase_lines,
        text::line_count,
    },
};
use parking_lot::Mutex;
use std::{
    io::{self, Write},
    sync::Arc,
};

struct BarState {
    content: String,
    /// Rows the pinned region occupied when last drawn.
    height: usize,
}

/// Pinned bottom region with log output flowing above it.
///
/// The bar holds the keyboard while it is open, like any other UI. Hand a
/// [`BarLog`] to background producers that need to write above it.
pub struct BottomBar {
    ui: BaseUi,
    log: BarLog,
}

impl BottomBar {
    /// Acquires the console and draws `content` immediately.
    pub fn new(console: &Console, content: impl Into<String>) -> Result<Self> {
        let ui = BaseUi::new(console)?;
        let log = BarLog {
            output: console.output().clone(),
            state: Arc::new(Mutex::new(BarState { content: content.into(), height: 0 })),
            pending: Vec::new(),
        };
        let bar = Self { ui, log };
        bar.render()?;
        Ok(bar)
    }

    /// Redraws the pinned region in place.
    pub fn render(&self) -> Result<&Self> {
        self.log.redraw()?;
        Ok(self)
    }

    pub fn update_bottom_bar(&self, content: impl Into<String>) -> Result<&Self> {
        self.log.update_bottom_bar(content)?;
        Ok(self)
    }

    pub fn write_log(&self, data: &str) -> Result<&Self> {
        self.log.write_log(data)?;
        Ok(self)
    }

    /// Appends a line feed unless `text` already ends a line.
    pub fn enforce_lf(text: &str) -> String {
        if text.ends_with(|c| c == '\n' || c == '\r') {
            text.to_string()
        } else {
            format!("{text}\n")
        }
    }

    pub fn content(&self) -> String {
        self.log.state.lock().content.clone()
    }

    /// A writer handle for producers on other tasks or threads.
    pub fn log(&self) -> BarLog {
        self.log.clone()
    }

    pub async fn next_keypress(&mut self) -> Result<Keypress> {
        self.ui.next_keypress().await
    }

    /// Releases the keyboard and leaves the bar's last content on screen.
    pub fn close(&mut self) {
        if self.ui.is_closed() {
            return;
        }
        self.ui.close();
        if let Err(e) = self.log.output.write_str("\n") {
            log::warn!("Failed to finish bottom bar: {e}");
        }
    }
}

impl Drop for BottomBar {
    fn drop(&mut self) {
        self.close();
    }
}

/// Cloneable writer into a [`BottomBar`].
///
/// Each log entry is one complete erase/write/redraw sequence, so writers on
/// different threads never interleave inside a line. Through `io::Write`,
/// bytes are collected per handle and logged one full line at a time.
pub struct BarLog {
    output: Output,
    state: Arc<Mutex<BarState>>,
    pending: Vec<u8>,
}

impl Clone for BarLog {
    fn clone(&self) -> Self {
        Self {
            output: self.output.clone(),
            state: Arc::clone(&self.state),
            pending: Vec::new(),
        }
    }
}

impl BarLog {
    /// Prints `data` above the bar, then draws the bar again beneath it.
    pub fn write_log(&self, data: &str) -> Result<()> {
        let mut state = self.state.lock();
        let mut w = self.output.lock();
        erase_lines(&mut *w, state.height)?;
        self.output.write_text(&mut *w, &BottomBar::enforce_lf(data))?;
        let height = self.draw(&mut *w, &state.content)?;
        state.height = height;
        w.flush()?;
        Ok(())
    }

    /// Replaces the bar content.
    pub fn update_bottom_bar(&self, content: impl Into<String>) -> Result<()> {
        let mut state = self.state.lock();
        let mut w = self.output.lock();
        erase_lines(&mut *w, state.height)?;
        state.content = content.into();
        let height = self.draw(&mut *w, &state.content)?;
        state.height = height;
        w.flush()?;
        Ok(())
    }

    fn redraw(&self) -> Result<()> {
        let mut state = self.state.lock();
        let mut w = self.output.lock();
        erase_lines(&mut *w, state.height)?;
        let height = self.draw(&mut *w, &state.content)?;
        state.height = height;
        w.flush()?;
        Ok(())
    }

    fn draw<W: Write + ?Sized>(&self, w: &mut W, content: &str) -> io::Result<usize> {
        self.output.write_text(w, content)?;
        Ok(line_count(content, self.output.width()))
    }
}

impl Write for BarLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(end) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            self.write_log(&String::from_utf8_lossy(&line)).map_err(io::Error::other)?;
        }
        Ok(buf.len())
    }

    /// Logs a trailing partial line, if any.
    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let rest = std::mem::take(&mut self.pending);
        self.write_log(&String::from_utf8_lossy(&rest)).map_err(io::Error::other)
    }
}

impl Drop for BarLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("Failed to flush bottom bar log: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: &str = "\x1b[2K";
    const UP: &str = "\x1b[1A";

    #[test]
    fn enforce_lf_is_idempotent() {
        assert_eq!(BottomBar::enforce_lf("line"), "line\n");
        assert_eq!(BottomBar::enforce_lf("line\n"), "line\n");
        assert_eq!(BottomBar::enforce_lf("line\n\n"), "line\n\n");
        assert_eq!(BottomBar::enforce_lf("line\r"), "line\r");
        let once = BottomBar::enforce_lf("x");
        assert_eq!(BottomBar::enforce_lf(&once), once);
    }

    #[tokio::test]
    async fn logged_blank_lines_are_kept() {
        let (console, terminal) = Console::virtual_terminal(80);
        let bar = BottomBar::new(&console, "bar").unwrap();
        terminal.clear_output();
        bar.write_log("a\n\n").unwrap();
        let out = crate::ui::text::strip_ansi(&terminal.output());
        assert_eq!(out, "a\n\nbar");
    }

    #[tokio::test]
    async fn renders_on_creation() {
        let (console, terminal) = Console::virtual_terminal(80);
        let bar = BottomBar::new(&console, "Loading...").unwrap();
        assert_eq!(terminal.output(), "Loading...");
        assert_eq!(bar.content(), "Loading...");
    }

    #[tokio::test]
    async fn update_erases_every_previous_line() {
        let (console, terminal) = Console::virtual_terminal(80);
        let bar = BottomBar::new(&console, "one\ntwo\nthree").unwrap();
        terminal.clear_output();
        bar.update_bottom_bar("done").unwrap();

        let out = terminal.output();
        assert_eq!(out.matches(CLEAR).count(), 3);
        assert_eq!(out.matches(UP).count(), 2);
        assert!(out.ends_with("done"));
    }

    #[tokio::test]
    async fn update_counts_wrapped_lines() {
        let (console, terminal) = Console::virtual_terminal(10);
        let bar = BottomBar::new(&console, "x".repeat(25)).unwrap();
        terminal.clear_output();
        bar.update_bottom_bar("ok").unwrap();
        assert_eq!(terminal.output().matches(CLEAR).count(), 3);
    }

    #[tokio::test]
    async fn log_lands_above_the_bar() {
        let (console, terminal) = Console::virtual_terminal(80);
        let bar = BottomBar::new(&console, "[bar]").unwrap();
        bar.write_log("first").unwrap().write_log("second\n").unwrap();

        let out = terminal.output();
        let first = out.find("first\n").unwrap();
        let second = out.find("second\n").unwrap();
        assert!(first < second);
        assert!(out.ends_with("second\n[bar]"));
        assert!(!out.contains("second\n\n"));
    }

    #[tokio::test]
    async fn concurrent_writers_leave_the_bar_last() {
        let (console, terminal) = Console::virtual_terminal(80);
        let bar = BottomBar::new(&console, "[status]").unwrap();

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let mut log = bar.log();
                std::thread::spawn(move || {
                    for line in 0..25 {
                        writeln!(log, "worker {worker} line {line}").unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let out = terminal.output();
        for worker in 0..4 {
            for line in 0..25 {
                assert!(out.contains(&format!("worker {worker} line {line}\n")));
            }
        }
        assert!(out.ends_with("[status]"));
    }

    #[tokio::test]
    async fn partial_writes_are_joined_into_lines() {
        let (console, terminal) = Console::virtual_terminal(80);
        let bar = BottomBar::new(&console, "[bar]").unwrap();
        let mut log = bar.log();
        log.write_all(b"hel").unwrap();
        assert!(!terminal.output().contains("hel"));
        log.write_all(b"lo\nwor").unwrap();
        assert!(terminal.output().contains("hello\n[bar]"));
        log.flush().unwrap();
        assert!(terminal.output().ends_with("wor\n[bar]"));
    }

    #[tokio::test]
    async fn keypresses_go_through_the_base_ui() {
        let (console, terminal) = Console::virtual_terminal(80);
        terminal.press_named("up").interrupt();
        let mut bar = BottomBar::new(&console, "").unwrap();
        assert!(bar.next_keypress().await.unwrap().is("up"));
        assert!(matches!(
            bar.next_keypress().await,
            Err(crate::error::Error::Interrupted)
        ));
    }
}
