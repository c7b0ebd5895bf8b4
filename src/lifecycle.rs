//! The round state machine.
//!
//! [`Game`] owns the target sequence, the player's input and the score, and
//! drives them through `Idle -> PlayingBack -> AwaitingInput -> ...` according
//! to its [`GameConfig`]. It never touches the terminal: everything the UI
//! needs to know is queued as a [`GameEvent`] and handed to a
//! [`GameObserver`] by [`Game::flush`].

use std::{collections::VecDeque, time::Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::{
    config::{GameConfig, GrowthPolicy, InputPolicy, RoundPolicy},
    error::ConfigError,
    matcher::{self, Classification},
    playback::{PlaybackEvent, PlaybackHandle, PlaybackScheduler},
    sequence::SequenceEngine,
    symbol::Symbol,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// No game has been started yet.
    Idle,
    PlayingBack,
    AwaitingInput,
    /// A single-round game has been decided.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    RoundStarted { round: u32, length: usize },
    Reveal { index: usize, symbol: Symbol },
    PlaybackComplete,
    Pressed { symbol: Symbol },
    Outcome(Outcome),
    ScoreChanged { previous: u32, current: u32 },
    GameOver,
}

/// Receives game events in the order they happened.
pub trait GameObserver {
    fn notify(&mut self, event: &GameEvent);
}

impl GameObserver for Vec<GameEvent> {
    fn notify(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// What became of a single press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressResult {
    /// Input is not being collected right now.
    Ignored,
    /// Recorded during playback; judged once playback completes.
    Deferred,
    Evaluated(Classification),
}

#[derive(Debug)]
pub struct Game<R: Rng> {
    config: GameConfig,
    engine: SequenceEngine<R>,
    scheduler: PlaybackScheduler,
    playback: Option<PlaybackHandle>,
    target: Vec<Symbol>,
    input: Vec<Symbol>,
    score: u32,
    round: u32,
    state: RoundState,
    outbox: VecDeque<GameEvent>,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = PlaybackScheduler::new(config.step_delay);

        Ok(Game {
            config,
            engine: SequenceEngine::new(rng),
            scheduler,
            playback: None,
            target: Vec::new(),
            input: Vec::new(),
            score: 0,
            round: 0,
            state: RoundState::Idle,
            outbox: VecDeque::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Rounds played in the current game, including the one in progress.
    /// Replaying a sequence after a miss does not start a new round.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn target(&self) -> &[Symbol] {
        &self.target
    }

    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    pub fn is_over(&self) -> bool {
        self.state == RoundState::GameOver
    }

    /// Whether a press made now would be recorded.
    pub fn accepts_input(&self) -> bool {
        match self.state {
            RoundState::AwaitingInput => true,
            RoundState::PlayingBack => self.config.input == InputPolicy::AcceptDuringPlayback,
            RoundState::Idle | RoundState::GameOver => false,
        }
    }

    /// When [`Game::tick`] next has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Start a new game, abandoning whatever was in progress.
    pub fn start(&mut self, now: Instant) {
        self.scheduler.cancel();
        self.engine.reset(&mut self.target);
        self.input.clear();
        self.round = 0;
        self.set_score(0);

        info!(config = ?self.config, "new game");
        self.outbox.push_back(GameEvent::GameStarted);
        self.begin_round(now, true);
    }

    /// Advance playback to `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(event) = self.scheduler.poll(now) {
            match event {
                PlaybackEvent::Reveal {
                    handle,
                    index,
                    symbol,
                } if Some(handle) == self.playback => {
                    self.outbox.push_back(GameEvent::Reveal { index, symbol });
                }
                PlaybackEvent::Complete { handle } if Some(handle) == self.playback => {
                    self.playback = None;
                    self.state = RoundState::AwaitingInput;
                    self.outbox.push_back(GameEvent::PlaybackComplete);

                    // presses collected during playback
                    if !self.input.is_empty() {
                        self.judge(now);
                    }
                }
                stale => debug!(?stale, "dropping event from superseded playback"),
            }
        }
    }

    /// Handle the player pressing `symbol`.
    pub fn press(&mut self, symbol: Symbol, now: Instant) -> PressResult {
        if !self.accepts_input() {
            debug!(%symbol, state = ?self.state, "press ignored");
            return PressResult::Ignored;
        }

        matcher::record(&mut self.input, symbol);
        self.outbox.push_back(GameEvent::Pressed { symbol });

        if self.state == RoundState::PlayingBack {
            return PressResult::Deferred;
        }

        PressResult::Evaluated(self.judge(now))
    }

    /// Deliver queued events to `observer`.
    pub fn flush(&mut self, observer: &mut impl GameObserver) {
        while let Some(event) = self.outbox.pop_front() {
            observer.notify(&event);
        }
    }

    fn judge(&mut self, now: Instant) -> Classification {
        let classification =
            matcher::evaluate_with(self.config.matching, &self.input, &self.target);

        match classification {
            Classification::Incomplete => {}
            Classification::Match => self.win(now),
            Classification::Mismatch => self.lose(now),
        }

        classification
    }

    fn win(&mut self, now: Instant) {
        info!(round = self.round, length = self.target.len(), "round won");
        self.outbox.push_back(GameEvent::Outcome(Outcome::Win));
        if self.config.is_scored() {
            self.set_score(self.score + 1);
        }

        self.after_round(now, true);
    }

    fn lose(&mut self, now: Instant) {
        info!(
            round = self.round,
            length = self.target.len(),
            pressed = self.input.len(),
            "round lost"
        );
        self.outbox.push_back(GameEvent::Outcome(Outcome::Lose));
        if self.config.is_scored() {
            self.set_score(0);
        }

        let continues = self.config.rounds == RoundPolicy::Endless;
        if continues && self.config.reset_sequence_on_loss {
            self.engine.reset(&mut self.target);
            self.round = 0;
        }

        // without a reset the same sequence is replayed
        self.after_round(now, self.config.reset_sequence_on_loss);
    }

    fn after_round(&mut self, now: Instant, extend: bool) {
        match self.config.rounds {
            RoundPolicy::Single => {
                self.scheduler.cancel();
                self.playback = None;
                self.state = RoundState::GameOver;
                self.outbox.push_back(GameEvent::GameOver);
                info!("game over");
            }
            RoundPolicy::Endless => self.begin_round(now, extend),
        }
    }

    fn begin_round(&mut self, now: Instant, extend: bool) {
        if extend {
            match self.config.growth {
                GrowthPolicy::Fixed(len) => self.engine.regenerate(&mut self.target, len),
                GrowthPolicy::Growing => {
                    self.engine.extend(&mut self.target);
                }
            }
        }

        // a replay of the same sequence is still the same round
        if extend {
            self.round += 1;
        }
        self.input.clear();
        self.state = RoundState::PlayingBack;
        self.playback = Some(self.scheduler.play(&self.target, now));

        debug!(round = self.round, target = ?self.target, "round started");
        self.outbox.push_back(GameEvent::RoundStarted {
            round: self.round,
            length: self.target.len(),
        });
    }

    fn set_score(&mut self, score: u32) {
        if score == self.score {
            return;
        }

        info!(previous = self.score, current = score, "score changed");
        self.outbox.push_back(GameEvent::ScoreChanged {
            previous: self.score,
            current: score,
        });
        self.score = score;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Variant;
    use rand::{SeedableRng, rngs::StdRng};
    use std::time::Duration;

    fn game(variant: Variant) -> Game<StdRng> {
        Game::new(variant.config(), StdRng::seed_from_u64(3)).unwrap()
    }

    /// Run playback to completion and return the time it finished.
    fn finish_playback(game: &mut Game<StdRng>, from: Instant) -> Instant {
        let step = game.config().step_delay;
        let done = from + step * (game.target().len() as u32 + 1);
        game.tick(done);
        assert_eq!(game.state(), RoundState::AwaitingInput);
        done
    }

    fn wrong(symbol: Symbol) -> Symbol {
        if symbol == Symbol::Green {
            Symbol::Red
        } else {
            Symbol::Green
        }
    }

    #[test]
    fn starts_idle_and_ignores_presses() {
        let mut game = game(Variant::C);
        assert_eq!(game.state(), RoundState::Idle);
        assert_eq!(game.press(Symbol::Green, Instant::now()), PressResult::Ignored);
    }

    #[test]
    fn locked_input_is_ignored_during_playback() {
        let now = Instant::now();
        let mut game = game(Variant::C);
        game.start(now);

        assert_eq!(game.state(), RoundState::PlayingBack);
        assert_eq!(game.press(Symbol::Green, now), PressResult::Ignored);
        assert!(game.input().is_empty());
    }

    #[test]
    fn correct_answer_scores_and_grows() {
        let now = Instant::now();
        let mut game = game(Variant::C);
        game.start(now);
        let now = finish_playback(&mut game, now);

        let answer = game.target().to_vec();
        for symbol in answer {
            game.press(symbol, now);
        }

        assert_eq!(game.score(), 1);
        assert_eq!(game.round(), 2);
        assert_eq!(game.target().len(), 2);
        assert_eq!(game.state(), RoundState::PlayingBack);
        assert!(game.input().is_empty());
    }

    #[test]
    fn wrong_answer_resets_score_and_sequence() {
        let now = Instant::now();
        let mut game = game(Variant::C);
        game.start(now);
        let mut now = finish_playback(&mut game, now);
        for _ in 0..2 {
            for symbol in game.target().to_vec() {
                game.press(symbol, now);
            }
            now = finish_playback(&mut game, now);
        }
        assert_eq!(game.score(), 2);
        assert_eq!(game.target().len(), 3);

        let miss = wrong(game.target()[0]);
        let mut result = PressResult::Ignored;
        for _ in 0..3 {
            result = game.press(miss, now);
        }

        assert_eq!(result, PressResult::Evaluated(Classification::Mismatch));
        assert_eq!(game.score(), 0);
        assert_eq!(game.target().len(), 1);
        assert_eq!(game.round(), 1);
    }

    #[test]
    fn score_events_report_previous_and_current() {
        let now = Instant::now();
        let mut game = game(Variant::C);
        game.start(now);
        let now = finish_playback(&mut game, now);
        game.press(game.target()[0], now);
        let now = finish_playback(&mut game, now);
        let miss = wrong(game.target()[0]);
        game.press(miss, now);
        game.press(miss, now);

        let mut events = Vec::new();
        game.flush(&mut events);
        let scores: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ScoreChanged { .. }))
            .cloned()
            .collect();

        assert_eq!(
            scores,
            vec![
                GameEvent::ScoreChanged {
                    previous: 0,
                    current: 1
                },
                GameEvent::ScoreChanged {
                    previous: 1,
                    current: 0
                },
            ]
        );
    }

    #[test]
    fn single_round_ends_the_game() {
        let now = Instant::now();
        let mut game = game(Variant::A);
        game.start(now);
        assert_eq!(game.target().len(), 4);
        let now = finish_playback(&mut game, now);

        let target = game.target().to_vec();
        game.press(target[0], now);
        game.press(target[1], now);
        game.press(target[2], now);
        game.press(wrong(target[3]), now);

        assert_eq!(game.state(), RoundState::GameOver);
        assert_eq!(game.target(), target.as_slice());
        assert_eq!(game.press(target[0], now), PressResult::Ignored);
        assert_eq!(game.next_deadline(), None);

        let mut events = Vec::new();
        game.flush(&mut events);
        let outcomes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Outcome(_)))
            .count();
        assert_eq!(outcomes, 1);
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
    }

    #[test]
    fn retry_keeps_the_sequence_when_not_resetting() {
        let now = Instant::now();
        let mut game = game(Variant::B);
        game.start(now);
        let now = finish_playback(&mut game, now);
        game.press(game.target()[0], now);
        let now = finish_playback(&mut game, now);
        let target = game.target().to_vec();

        assert_eq!(game.round(), 2);

        game.press(wrong(target[0]), now);
        game.press(wrong(target[0]), now);

        assert_eq!(game.target(), target.as_slice());
        assert_eq!(game.state(), RoundState::PlayingBack);
        assert_eq!(game.score(), 0);
        assert_eq!(game.round(), 2);
    }

    #[test]
    fn new_game_resets_the_score() {
        let now = Instant::now();
        let mut game = game(Variant::C);
        game.start(now);
        let now = finish_playback(&mut game, now);
        game.press(game.target()[0], now);
        assert_eq!(game.score(), 1);
        game.flush(&mut Vec::<GameEvent>::new());

        game.start(now);

        assert_eq!(game.score(), 0);
        assert_eq!(game.target().len(), 1);
        assert_eq!(game.round(), 1);

        let mut events = Vec::new();
        game.flush(&mut events);
        assert_eq!(
            events[..2],
            [
                GameEvent::ScoreChanged {
                    previous: 1,
                    current: 0
                },
                GameEvent::GameStarted,
            ]
        );
    }

    #[test]
    fn accepted_presses_are_judged_after_playback() {
        let now = Instant::now();
        let mut game = game(Variant::B);
        game.start(now);
        let symbol = game.target()[0];

        assert_eq!(game.press(symbol, now), PressResult::Deferred);
        assert_eq!(game.state(), RoundState::PlayingBack);

        game.tick(now + Duration::from_secs(10));

        let mut events = Vec::new();
        game.flush(&mut events);
        assert!(events.contains(&GameEvent::Outcome(Outcome::Win)));
        assert_eq!(game.target().len(), 2);
    }

    #[test]
    fn fixed_rounds_regenerate() {
        let now = Instant::now();
        let mut game = game(Variant::D);
        game.start(now);
        let mut now = finish_playback(&mut game, now);
        for _ in 0..5 {
            for symbol in game.target().to_vec() {
                game.press(symbol, now);
            }
            assert_eq!(game.target().len(), 4);
            now = finish_playback(&mut game, now);
        }
        assert_eq!(game.score(), 5);
    }

    #[test]
    fn restart_supersedes_playback() {
        let now = Instant::now();
        let mut game = game(Variant::C);
        game.start(now);
        game.start(now + Duration::from_millis(500));

        game.tick(now + Duration::from_secs(30));
        let mut events = Vec::new();
        game.flush(&mut events);

        let reveals = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Reveal { .. }))
            .count();
        let completions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlaybackComplete))
            .count();
        assert_eq!(reveals, 1);
        assert_eq!(completions, 1);
    }
}
