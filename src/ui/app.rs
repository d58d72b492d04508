//! Terminal event loop.
//!
//! Redraws whenever the session reports a state change, a key is pressed, or
//! the terminal is resized. Everything runs on the caller's task.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use ratatui::widgets::TableState;

use super::render::{DashboardView, render};
use crate::error::DashboardError;
use crate::session::DashboardSession;

/// Rows moved by `PgUp` / `PgDn`.
const PAGE: usize = 10;

/// UI-local state: scroll position and the exit flag.
#[derive(Debug, Default)]
pub struct App {
    table_state: TableState,
    exit: bool,
}

impl App {
    /// Creates an app scrolled to the top.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a quit key was pressed.
    #[must_use]
    pub const fn should_exit(&self) -> bool {
        self.exit
    }

    /// Selected table row, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Draws until the user quits, then shuts the session down.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Io`] if drawing or reading terminal events
    /// fails. The session is shut down in every case.
    pub async fn run(
        mut self,
        terminal: &mut DefaultTerminal,
        mut session: DashboardSession,
        api_base: &str,
    ) -> Result<(), DashboardError> {
        let outcome = self.event_loop(terminal, &mut session, api_base).await;
        session.shutdown().await;
        outcome
    }

    async fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        session: &mut DashboardSession,
        api_base: &str,
    ) -> Result<(), DashboardError> {
        let mut terminal_events = EventStream::new();

        while !self.exit {
            {
                let poll = session.poll_state();
                let live = session.live_state();
                let view = DashboardView {
                    poll: &poll,
                    live: &live,
                    api_base,
                };
                terminal.draw(|frame| render(frame, &view, &mut self.table_state))?;
            }

            tokio::select! {
                () = session.changed() => {}
                next = terminal_events.next() => match next {
                    Some(Ok(Event::Key(key))) => self.on_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
            }
        }
        Ok(())
    }

    /// Applies one key press.
    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.exit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.exit = true;
            }
            KeyCode::Down => self.scroll_down(1),
            KeyCode::Up => self.scroll_up(1),
            KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::Home => self.table_state.select(None),
            _ => {}
        }
    }

    // The upper bound is clamped at render time, when the row count is known.
    fn scroll_down(&mut self, by: usize) {
        let next = self
            .table_state
            .selected()
            .map_or(0, |i| i.saturating_add(by));
        self.table_state.select(Some(next));
    }

    fn scroll_up(&mut self, by: usize) {
        match self.table_state.selected() {
            Some(i) if i > by => self.table_state.select(Some(i - by)),
            Some(_) | None => self.table_state.select(Some(0)),
        }
    }
}
