//! Keyboard subscription and teardown shared by every prompt UI.

use crate::{
    error::{Error, Result},
    ui::{
        console::{Console, KeyStream, Output},
        keypress::Keypress,
        screen::Screen,
    },
};

/// One active UI instance: it owns the keyboard until closed.
///
/// Dropping a `BaseUi` closes it, so the terminal is restored on every exit
/// path, early returns and panics included.
pub struct BaseUi {
    console: Console,
    keys: KeyStream,
    screen: Screen,
    closed: bool,
}

impl BaseUi {
    pub fn new(console: &Console) -> Result<Self> {
        let keys = console.acquire()?;
        log::debug!("Keyboard input acquired");
        Ok(Self {
            console: console.clone(),
            keys,
            screen: Screen::new(console.output().clone()),
            closed: false,
        })
    }

    /// Waits for the next keypress and hands it to the caller.
    ///
    /// Ctrl+C force-closes the UI and yields [`Error::Interrupted`].
    pub async fn next_keypress(&mut self) -> Result<Keypress> {
        if self.closed {
            return Err(Error::InputClosed);
        }
        match self.keys.next().await {
            Some(key) if key.is_interrupt() => {
                self.on_force_close();
                Err(Error::Interrupted)
            }
            Some(key) => {
                log::trace!("Keypress {:?} ({:?})", key.name, key.sequence);
                Ok(key)
            }
            None => {
                self.close();
                Err(Error::InputClosed)
            }
        }
    }

    /// Handles Ctrl+C: release everything, then move to a clean line.
    pub fn on_force_close(&mut self) {
        log::debug!("Forced close requested");
        self.close();
        if let Err(e) = self.console.output().write_str("\n") {
            log::warn!("Failed to write after forced close: {e}");
        }
    }

    /// Detaches the keyboard listener and restores the terminal mode.
    /// Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.keys.close();
        log::debug!("Keyboard input released");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn output(&self) -> &Output {
        self.console.output()
    }

    pub fn screen(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Redraws the prompt region.
    pub fn render(&mut self, content: &str, bottom: Option<&str>) -> Result<()> {
        self.screen.render(content, bottom)
    }

    /// Leaves the prompt region behind and moves to a new line.
    pub fn finish(&mut self) -> Result<()> {
        self.screen.done()
    }

    /// Hands the terminal to blocking work (an external editor, say) and
    /// takes it back afterwards.
    pub async fn release_terminal<F, T>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.closed {
            return Err(Error::InputClosed);
        }
        self.keys.close();
        let outcome = tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| Error::IoError(std::io::Error::other(e)));
        self.keys = self.console.acquire()?;
        outcome
    }
}

impl Drop for BaseUi {
    fn drop(&mut self) {
        self.close();
    }
}
