//! Terminal container - crossterm-backed host.
//!
//! Puts the terminal in raw mode with mouse capture for as long as the
//! container lives. Coordinates are in cells: a left-button press at
//! (column, row) becomes a click at `offset_x = column`, `offset_y = row`, and
//! `client_height` is the row count.
//!
//! # Example
//!
//! ```ignore
//! use spark_vdom::pipeline::{init_with_renderer, run, TerminalContainer};
//!
//! let container = TerminalContainer::new()?;
//! let mut handle = init_with_renderer(container, |tree| draw(tree)).start(app())?;
//! run(&mut handle)?; // until Ctrl+C
//! handle.unmount();
//! ```

use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::{execute, terminal};

use super::container::{Container, Listener, Listeners};
use crate::error::Result;
use crate::events::{EventKind, HostEvent};

pub struct TerminalContainer {
    height: f64,
    listeners: Listeners,
    started: Instant,
    closed: bool,
}

impl TerminalContainer {
    /// Enter raw mode and enable mouse capture.
    pub fn new() -> Result<Self> {
        let (_, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnableMouseCapture)?;
        tracing::debug!(rows, "terminal container attached");

        Ok(Self {
            height: f64::from(rows),
            listeners: Listeners::default(),
            started: Instant::now(),
            closed: false,
        })
    }

    fn deliver(&mut self, raw: &HostEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        listeners.emit(&*self, raw);
        listeners.merge(std::mem::take(&mut self.listeners));
        self.listeners = listeners;
    }

    fn handle(&mut self, event: CrosstermEvent) {
        match &event {
            CrosstermEvent::Key(key) if is_interrupt(key) => {
                tracing::debug!("interrupt, closing terminal container");
                self.closed = true;
                return;
            }
            CrosstermEvent::Resize(_, rows) => self.height = f64::from(*rows),
            _ => {}
        }
        for raw in convert_event(&event) {
            self.deliver(&raw);
        }
    }
}

impl Container for TerminalContainer {
    fn client_height(&self) -> f64 {
        self.height
    }

    fn add_event_listener(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.add(kind, listener);
    }

    fn next_frame(&mut self, budget: Duration) -> Result<()> {
        let deadline = Instant::now() + budget;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if !event::poll(left)? {
                return Ok(());
            }
            self.handle(event::read()?);
            if self.closed || left.is_zero() {
                return Ok(());
            }
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for TerminalContainer {
    fn drop(&mut self) {
        // Best effort: the terminal may already be gone.
        let _ = execute!(stdout(), DisableMouseCapture);
        let _ = terminal::disable_raw_mode();
    }
}

// =============================================================================
// Conversion
// =============================================================================

fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && key.code == KeyCode::Char('c')
}

/// Map a crossterm event to the host events a browser-like host would emit.
///
/// A printable key yields a keydown followed by a keypress; other keys only
/// a keydown. Releases and non-left buttons yield nothing.
pub fn convert_event(event: &CrosstermEvent) -> Vec<HostEvent> {
    match event {
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => vec![HostEvent::Click {
                offset_x: f64::from(mouse.column),
                offset_y: f64::from(mouse.row),
            }],
            _ => Vec::new(),
        },
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => convert_key(key.code),
        CrosstermEvent::Resize(..) => vec![HostEvent::Other("resize".into())],
        _ => Vec::new(),
    }
}

fn convert_key(code: KeyCode) -> Vec<HostEvent> {
    let (key, key_code) = match code {
        KeyCode::Char(c) => {
            let key = c.to_string();
            return vec![
                HostEvent::KeyDown {
                    key: key.clone(),
                    key_code: u32::from(c.to_ascii_uppercase()),
                },
                HostEvent::KeyPress {
                    key,
                    key_code: u32::from(c),
                },
            ];
        }
        KeyCode::Enter => {
            return vec![
                HostEvent::KeyDown { key: "Enter".into(), key_code: 13 },
                HostEvent::KeyPress { key: "Enter".into(), key_code: 13 },
            ];
        }
        KeyCode::Backspace => ("Backspace", 8),
        KeyCode::Tab => ("Tab", 9),
        KeyCode::Esc => ("Escape", 27),
        KeyCode::PageUp => ("PageUp", 33),
        KeyCode::PageDown => ("PageDown", 34),
        KeyCode::End => ("End", 35),
        KeyCode::Home => ("Home", 36),
        KeyCode::Left => ("ArrowLeft", 37),
        KeyCode::Up => ("ArrowUp", 38),
        KeyCode::Right => ("ArrowRight", 39),
        KeyCode::Down => ("ArrowDown", 40),
        KeyCode::Insert => ("Insert", 45),
        KeyCode::Delete => ("Delete", 46),
        KeyCode::F(n) => {
            return vec![HostEvent::KeyDown {
                key: format!("F{n}"),
                key_code: 111 + u32::from(n),
            }];
        }
        _ => return Vec::new(),
    };
    vec![HostEvent::KeyDown {
        key: key.into(),
        key_code,
    }]
}
