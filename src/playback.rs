//! Time-stepped reveal of the target sequence.
//!
//! Playback runs on the same thread as the rest of the game: instead of
//! sleeping, the scheduler records when its next step is due and the app loop
//! calls [`PlaybackScheduler::poll`] whenever it wakes up. Only one playback is
//! ever active; starting a new one drops the old one, so a superseded run can
//! never emit another event.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::symbol::Symbol;

/// Identifies one call to [`PlaybackScheduler::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Light up `symbol`, the `index`th element of the sequence.
    Reveal {
        handle: PlaybackHandle,
        index: usize,
        symbol: Symbol,
    },
    /// Every symbol has been shown.
    Complete { handle: PlaybackHandle },
}

#[derive(Debug)]
struct ActivePlayback {
    handle: PlaybackHandle,
    sequence: Vec<Symbol>,
    next: usize,
    due: Instant,
}

#[derive(Debug)]
pub struct PlaybackScheduler {
    step_delay: Duration,
    generation: u64,
    active: Option<ActivePlayback>,
}

impl PlaybackScheduler {
    pub fn new(step_delay: Duration) -> Self {
        PlaybackScheduler {
            step_delay,
            generation: 0,
            active: None,
        }
    }

    /// Start revealing `sequence`, cancelling any playback still in flight.
    ///
    /// The first reveal is due one step after `now`, each following reveal one
    /// step after the previous, and completion one step after the last reveal.
    pub fn play(&mut self, sequence: &[Symbol], now: Instant) -> PlaybackHandle {
        if let Some(previous) = self.active.take() {
            debug!(
                superseded = previous.handle.0,
                revealed = previous.next,
                "playback superseded"
            );
        }

        self.generation += 1;
        let handle = PlaybackHandle(self.generation);
        let due = if sequence.is_empty() {
            now
        } else {
            now + self.step_delay
        };
        self.active = Some(ActivePlayback {
            handle,
            sequence: sequence.to_vec(),
            next: 0,
            due,
        });

        handle
    }

    /// Drop the active playback, if any. Returns whether one was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// When the next event becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.as_ref().map(|a| a.due)
    }

    /// Return the next event if it is due at `now`.
    ///
    /// Call repeatedly until it returns `None`; if the caller woke up late,
    /// overdue events are still delivered one at a time and in order.
    pub fn poll(&mut self, now: Instant) -> Option<PlaybackEvent> {
        let active = self.active.as_mut()?;
        if now < active.due {
            return None;
        }

        if active.next < active.sequence.len() {
            let index = active.next;
            active.next += 1;
            active.due += self.step_delay;
            return Some(PlaybackEvent::Reveal {
                handle: active.handle,
                index,
                symbol: active.sequence[index],
            });
        }

        let handle = active.handle;
        self.active = None;
        Some(PlaybackEvent::Complete { handle })
    }
}
