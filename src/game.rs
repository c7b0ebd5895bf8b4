use std::time::Instant;

use anyhow::Result;
use crossterm::event::KeyEvent;

pub trait TuiGame {
    /// Respond to events (key presses, etc).
    fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) -> Result<()>;

    /// Advance anything time driven up to `now`.
    fn tick(&mut self, now: Instant);

    /// The next moment `tick` has work to do, if any.
    fn next_deadline(&self) -> Option<Instant>;

    /// Whether a new game may be started now.
    fn can_restart(&self) -> bool;

    /// Reset the game state.
    fn reset(&mut self, now: Instant);
}
