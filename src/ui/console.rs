//! Terminal access: a serialized output sink and an exclusive keypress source.
//!
//! A [`Console`] is either the process terminal or a virtual terminal driven
//! through a channel. Only one [`KeyStream`] can be open on a console at a
//! time; opening a second one fails with [`Error::InputBusy`] until the first
//! is closed.

use crate::{
    constants::FALLBACK_WIDTH,
    error::{Error, Result},
    ui::keypress::Keypress,
};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    terminal,
};
use futures::StreamExt;
use parking_lot::{Mutex, MutexGuard};
use std::{
    io::{self, Write},
    sync::{Arc, LazyLock},
};
use tokio::{
    sync::{mpsc, Mutex as AsyncMutex, OwnedMutexGuard},
    task::JoinHandle,
};

type Sink = Box<dyn Write + Send>;

/// Shared, serialized output. Every clone writes to the same sink.
#[derive(Clone)]
pub struct Output {
    sink: Arc<Mutex<Sink>>,
    width: Option<u16>,
    /// Translate `\n` to `\r\n`; raw mode does not return the carriage.
    crlf: bool,
}

impl Output {
    pub fn stdout() -> Self {
        Self { sink: Arc::new(Mutex::new(Box::new(io::stdout()))), width: None, crlf: true }
    }

    pub fn stderr() -> Self {
        Self { sink: Arc::new(Mutex::new(Box::new(io::stderr()))), width: None, crlf: true }
    }

    /// An in-memory output with a fixed width, and a handle to read it back.
    pub fn capture(width: u16) -> (Self, Captured) {
        let captured = Captured::default();
        let output = Self {
            sink: Arc::new(Mutex::new(Box::new(captured.clone()))),
            width: Some(width),
            crlf: false,
        };
        (output, captured)
    }

    /// Current terminal width in columns.
    pub fn width(&self) -> u16 {
        self.width
            .or_else(|| terminal::size().ok().map(|(cols, _)| cols))
            .filter(|cols| *cols > 0)
            .unwrap_or(FALLBACK_WIDTH)
    }

    /// Locks the sink; hold the guard for a whole erase/redraw sequence.
    pub fn lock(&self) -> MutexGuard<'_, Sink> {
        self.sink.lock()
    }

    /// Writes `text` through an already locked sink.
    pub fn write_text<W: Write + ?Sized>(&self, w: &mut W, text: &str) -> io::Result<()> {
        if self.crlf {
            w.write_all(text.replace('\n', "\r\n").as_bytes())
        } else {
            w.write_all(text.as_bytes())
        }
    }

    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut w = self.lock();
        self.write_text(&mut *w, text)?;
        w.flush()
    }
}

/// Bytes written to a captured [`Output`].
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// All terminal consoles share one lease: there is only one keyboard.
static TERMINAL_LEASE: LazyLock<Arc<AsyncMutex<()>>> =
    LazyLock::new(|| Arc::new(AsyncMutex::new(())));

#[derive(Clone)]
enum KeySource {
    Terminal(Arc<AsyncMutex<()>>),
    Channel(Arc<AsyncMutex<mpsc::UnboundedReceiver<Keypress>>>),
}

/// Where prompts read keys from and draw to.
#[derive(Clone)]
pub struct Console {
    output: Output,
    keys: KeySource,
}

impl Console {
    /// The process terminal: stdout and the keyboard in raw mode.
    pub fn terminal() -> Self {
        Self::terminal_on(Output::stdout())
    }

    /// The keyboard in raw mode, drawing to `output`. Drawing to stderr keeps
    /// stdout free for results.
    pub fn terminal_on(output: Output) -> Self {
        Self { output, keys: KeySource::Terminal(Arc::clone(&TERMINAL_LEASE)) }
    }

    /// A console fed by a [`VirtualTerminal`], for tests and automation.
    pub fn virtual_terminal(width: u16) -> (Self, VirtualTerminal) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (output, captured) = Output::capture(width);
        let console = Self {
            output,
            keys: KeySource::Channel(Arc::new(AsyncMutex::new(rx))),
        };
        (console, VirtualTerminal { keys: Some(tx), captured })
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Takes the exclusive keypress subscription.
    pub fn acquire(&self) -> Result<KeyStream> {
        let state = match &self.keys {
            KeySource::Channel(rx) => {
                StreamState::Channel(Arc::clone(rx).try_lock_owned().map_err(|_| Error::InputBusy)?)
            }
            KeySource::Terminal(lease) => {
                let lease = Arc::clone(lease).try_lock_owned().map_err(|_| Error::InputBusy)?;
                let restore_raw = !terminal::is_raw_mode_enabled()?;
                if restore_raw {
                    terminal::enable_raw_mode()?;
                }
                let (tx, rx) = mpsc::unbounded_channel();
                let reader = tokio::spawn(read_terminal_keys(tx.clone()));
                let signals = tokio::spawn(forward_termination(termination_signal(), tx));
                StreamState::Terminal { events: rx, reader, signals, restore_raw, _lease: lease }
            }
        };
        Ok(KeyStream { state })
    }
}

/// Forwards key presses from the terminal until the receiver goes away.
async fn read_terminal_keys(tx: mpsc::UnboundedSender<Keypress>) {
    let mut events = EventStream::new();
    while let Some(event) = events.next().await {
        match event {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if tx.send(Keypress::from(key)).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("Failed to read terminal event: {e}");
                break;
            }
        }
    }
}

/// Waits for SIGINT, SIGTERM or SIGHUP and names the one that arrived.
#[cfg(unix)]
async fn termination_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = hangup.recv() => Ok("SIGHUP"),
    }
}

#[cfg(not(unix))]
async fn termination_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl+C")
}

/// Delivers a termination signal as a Ctrl+C keypress, so whoever holds the
/// keyboard force-closes and restores the terminal.
async fn forward_termination<F>(signal: F, tx: mpsc::UnboundedSender<Keypress>)
where
    F: std::future::Future<Output = io::Result<&'static str>>,
{
    match signal.await {
        Ok(name) => {
            log::debug!("Received {name} while holding the keyboard");
            // the stream may already be closed
            let _ = tx.send(Keypress::ctrl('c'));
        }
        Err(e) => log::warn!("Failed to listen for termination signals: {e}"),
    }
}

enum StreamState {
    Terminal {
        events: mpsc::UnboundedReceiver<Keypress>,
        reader: JoinHandle<()>,
        signals: JoinHandle<()>,
        /// Raw mode was off before we took the keyboard.
        restore_raw: bool,
        _lease: OwnedMutexGuard<()>,
    },
    Channel(OwnedMutexGuard<mpsc::UnboundedReceiver<Keypress>>),
    Closed,
}

/// An open keypress subscription. Closing (or dropping) it restores the
/// terminal and frees the console for the next subscriber.
pub struct KeyStream {
    state: StreamState,
}

impl KeyStream {
    /// Next keypress, or `None` once the source hung up or the stream closed.
    pub async fn next(&mut self) -> Option<Keypress> {
        match &mut self.state {
            StreamState::Terminal { events, .. } => events.recv().await,
            StreamState::Channel(rx) => rx.recv().await,
            StreamState::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, StreamState::Closed)
    }

    /// Detaches from the source. Safe to call more than once.
    pub fn close(&mut self) {
        if let StreamState::Terminal { reader, signals, restore_raw, .. } =
            std::mem::replace(&mut self.state, StreamState::Closed)
        {
            reader.abort();
            signals.abort();
            if restore_raw {
                if let Err(e) = terminal::disable_raw_mode() {
                    log::warn!("Failed to restore terminal mode: {e}");
                }
            }
        }
    }
}

impl Drop for KeyStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Drives a virtual console: queue keypresses, read what was drawn.
pub struct VirtualTerminal {
    keys: Option<mpsc::UnboundedSender<Keypress>>,
    captured: Captured,
}

impl VirtualTerminal {
    pub fn press(&self, key: Keypress) -> &Self {
        if let Some(tx) = &self.keys {
            // the receiving console may already be gone
            let _ = tx.send(key);
        }
        self
    }

    pub fn press_named(&self, name: &str) -> &Self {
        self.press(Keypress::named(name))
    }

    pub fn type_text(&self, text: &str) -> &Self {
        for key in Keypress::text(text) {
            self.press(key);
        }
        self
    }

    /// Types `text` followed by Enter.
    pub fn submit(&self, text: &str) -> &Self {
        self.type_text(text).press_named("return")
    }

    pub fn interrupt(&self) -> &Self {
        self.press(Keypress::ctrl('c'))
    }

    /// Closes the key channel; a prompt still waiting sees the input end.
    pub fn hang_up(&mut self) {
        self.keys = None;
    }

    pub fn output(&self) -> String {
        self.captured.contents()
    }

    pub fn clear_output(&self) {
        self.captured.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn virtual_keys_arrive_in_order() {
        let (console, terminal) = Console::virtual_terminal(80);
        terminal.type_text("hi").press_named("return");
        let mut keys = console.acquire().unwrap();
        assert_eq!(keys.next().await.unwrap().printable(), Some('h'));
        assert_eq!(keys.next().await.unwrap().printable(), Some('i'));
        assert!(keys.next().await.unwrap().is("return"));
    }

    #[tokio::test]
    async fn subscription_is_exclusive() {
        let (console, _terminal) = Console::virtual_terminal(80);
        let mut first = console.acquire().unwrap();
        assert!(matches!(console.acquire(), Err(Error::InputBusy)));
        first.close();
        drop(first);
        assert!(console.acquire().is_ok());
    }

    #[tokio::test]
    async fn hang_up_ends_the_stream() {
        let (console, mut terminal) = Console::virtual_terminal(80);
        terminal.press_named("up");
        terminal.hang_up();
        let mut keys = console.acquire().unwrap();
        assert!(keys.next().await.is_some());
        assert!(keys.next().await.is_none());
    }

    #[tokio::test]
    async fn closed_stream_yields_nothing() {
        let (console, terminal) = Console::virtual_terminal(80);
        terminal.press_named("down");
        let mut keys = console.acquire().unwrap();
        keys.close();
        keys.close();
        assert!(keys.is_closed());
        assert!(keys.next().await.is_none());
    }

    #[tokio::test]
    async fn termination_signal_arrives_as_interrupt() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward_termination(async { Ok("SIGTERM") }, tx).await;
        assert!(rx.recv().await.unwrap().is_interrupt());
    }

    #[tokio::test]
    async fn failed_signal_listener_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward_termination(async { Err(io::Error::other("unsupported")) }, tx).await;
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn captured_output_is_shared_between_clones() {
        let (output, captured) = Output::capture(40);
        output.clone().write_str("hello\n").unwrap();
        assert_eq!(captured.contents(), "hello\n");
        assert_eq!(output.width(), 40);
    }
}
