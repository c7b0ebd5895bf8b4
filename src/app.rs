use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::event::{KeyCode, KeyEvent};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{DefaultTerminal, Frame};
use tracing::info;

use crate::{game::TuiGame, scoreboard::Scoreboard, simon::Simon};

use super::config::*;

#[derive(Debug)]
pub struct App {
    exit: bool,
    game: Simon,
}

impl App {
    /// Build the app. A `seed` makes the generated sequences reproducible.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let game = Simon::new(config, rng, Instant::now())?;
        Ok(Self { exit: false, game })
    }

    fn reset(&mut self) {
        self.game.reset(Instant::now());
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.exit = false;
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
            self.game.tick(Instant::now());
        }

        let best = self.game.view.scoreboard.first().map(|run| run.score);
        info!(score = self.game.game.score(), ?best, "exiting");
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        frame.render_widget(&self.game, frame.area());
    }

    fn handle_events(&mut self) -> Result<()> {
        // sleep until the next flash is due or a key arrives, whichever is first
        let timeout = self
            .game
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(MAX_IDLE_WAIT)
            .min(MAX_IDLE_WAIT);

        if !event::poll(timeout)? {
            return Ok(());
        }

        match event::read()? {
            // it's important to check that the event is a key press event as
            // crossterm also emits key release and repeat events on Windows.
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event)?;
            }
            _ => {}
        };
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            // new game
            KeyCode::Enter => {
                if self.game.can_restart() {
                    self.reset();
                }
            }

            // quit
            KeyCode::Char('q') | KeyCode::Esc => self.exit(),

            _ => self.game.handle_key_event(key_event, Instant::now())?,
        }

        Ok(())
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}
