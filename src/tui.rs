use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::Result;
use crossterm::{
    cursor,
    event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use futures::{FutureExt, StreamExt};
use ratatui::backend::CrosstermBackend as Backend;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::constants::TITLE;

pub type IO = std::io::Stdout;
pub fn io() -> IO {
    std::io::stdout()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Init,
    Error,
    Tick,
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// What the event task does with one item read from the terminal.
#[derive(Debug, PartialEq, Eq)]
enum Polled {
    Emit(Event),
    Skip,
    Closed,
}

fn classify(maybe_event: Option<std::io::Result<CrosstermEvent>>) -> Polled {
    match maybe_event {
        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Polled::Emit(Event::Key(key)),
        Some(Ok(CrosstermEvent::Resize(x, y))) => Polled::Emit(Event::Resize(x, y)),
        Some(Ok(_)) => Polled::Skip,
        Some(Err(_)) => Polled::Emit(Event::Error),
        // The stream never yields again once it has ended.
        None => Polled::Closed,
    }
}

pub struct Tui {
    pub terminal: ratatui::Terminal<Backend<IO>>,
    pub task: Option<JoinHandle<()>>,
    pub cancellation_token: CancellationToken,
    pub event_rx: UnboundedReceiver<Event>,
    pub event_tx: UnboundedSender<Event>,
    pub frame_rate: f64,
    pub tick_rate: f64,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let tick_rate = 30.0;
        let frame_rate = 30.0;
        let terminal = ratatui::Terminal::new(Backend::new(io()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancellation_token = CancellationToken::new();
        Ok(Self { terminal, task: None, cancellation_token, event_rx, event_tx, frame_rate, tick_rate })
    }

    pub fn tick_rate(&mut self, tick_rate: f64) {
        self.tick_rate = tick_rate;
    }

    pub fn frame_rate(&mut self, frame_rate: f64) {
        self.frame_rate = frame_rate;
    }

    pub fn start(&mut self) {
        let tick_delay = Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = Duration::from_secs_f64(1.0 / self.frame_rate);
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let cancellation_token = self.cancellation_token.clone();
        let event_tx = self.event_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            if event_tx.send(Event::Init).is_err() {
                return;
            }
            loop {
                let tick_delay = tick_interval.tick();
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                let event = tokio::select! {
                    _ = cancellation_token.cancelled() => break,
                    maybe_event = crossterm_event => match classify(maybe_event) {
                        Polled::Emit(event) => event,
                        Polled::Skip => continue,
                        Polled::Closed => {
                            error!("Terminal event stream ended");
                            break;
                        },
                    },
                    _ = tick_delay => Event::Tick,
                    _ = render_delay => Event::Render,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&self) -> Result<()> {
        self.cancel();
        let Some(task) = &self.task else {
            return Ok(());
        };
        let mut counter = 0;
        while !task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            counter += 1;
            if counter > 50 {
                task.abort();
            }
            if counter > 100 {
                error!("Failed to abort task in 100 milliseconds for unknown reason");
                break;
            }
        }
        Ok(())
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io(), EnterAlternateScreen, cursor::Hide, SetTitle(TITLE))?;
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            crossterm::execute!(io(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::signal::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.enter()?;
        Ok(())
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl Deref for Tui {
    type Target = ratatui::Terminal<Backend<IO>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            warn!("Failed to restore terminal: {err:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_key_presses_and_resizes_are_emitted() {
        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty());
        assert_eq!(classify(Some(Ok(CrosstermEvent::Key(key)))), Polled::Emit(Event::Key(key)));
        assert_eq!(classify(Some(Ok(CrosstermEvent::Resize(80, 24)))), Polled::Emit(Event::Resize(80, 24)));
    }

    #[test]
    fn test_releases_and_focus_are_skipped() {
        let release =
            KeyEvent::new_with_kind_and_state(KeyCode::Up, KeyModifiers::empty(), KeyEventKind::Release, KeyEventState::empty());
        assert_eq!(classify(Some(Ok(CrosstermEvent::Key(release)))), Polled::Skip);
        assert_eq!(classify(Some(Ok(CrosstermEvent::FocusGained))), Polled::Skip);
    }

    #[test]
    fn test_read_errors_are_reported() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "tty gone");
        assert_eq!(classify(Some(Err(err))), Polled::Emit(Event::Error));
    }

    #[test]
    fn test_ended_stream_stops_the_task() {
        assert_eq!(classify(None), Polled::Closed);
    }
}
