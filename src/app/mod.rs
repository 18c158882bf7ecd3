//! Application state and event handling

pub mod command;
pub mod handlers;
pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Config;
use crate::document::Document;
use crate::storage::KeyValueStore;
use crate::ui;
use state::AppState;

/// Frame interval; also the smooth-scroll tick
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Lines moved per mouse wheel notch
const WHEEL_LINES: isize = 3;

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Current application state
    state: AppState,

    /// Persistent key-value store for theme and read progress
    store: Box<dyn KeyValueStore>,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance.
    ///
    /// `fragment` selects the initial chapter or section, like a URL fragment.
    pub fn new(
        config: Config,
        document: Document,
        store: Box<dyn KeyValueStore>,
        fragment: Option<&str>,
    ) -> Result<Self> {
        let state = AppState::new(document, &*store, &config, fragment);
        let terminal = Self::setup_terminal()?;

        Ok(Self { config, state, store, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        tracing::info!("Opened {}", self.state.document.title);

        loop {
            self.state.content.tick(&self.config);

            let state = &mut self.state;
            let config = &self.config;
            self.terminal.draw(|frame| ui::draw(frame, state, config))?;

            // Read tracking works on what was actually drawn
            self.state.observe_viewport(self.store.as_mut());

            if !event::poll(FRAME_INTERVAL)? {
                continue;
            }

            let quit = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.state.handle_key(key, &self.config, self.store.as_mut())
                }
                Event::Mouse(mouse) => {
                    match mouse.kind {
                        MouseEventKind::ScrollDown => self.state.content.scroll_by(WHEEL_LINES),
                        MouseEventKind::ScrollUp => self.state.content.scroll_by(-WHEEL_LINES),
                        _ => {}
                    }
                    false
                }
                _ => false,
            };

            if quit {
                break;
            }
        }

        tracing::info!("Closing {}", self.state.document.title);
        self.restore_terminal()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
