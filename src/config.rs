use std::{str::FromStr, time::Duration};

use crate::{error::ConfigError, matcher::MatchPolicy};

/// Sequence length used by the fixed-length variants.
pub const FIXED_SEQUENCE_LEN: usize = 4;

/// Delay between two reveals during playback.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_secs(1);

/// How long a revealed or pressed button stays lit.
pub const DEFAULT_FLASH: Duration = Duration::from_millis(450);

/// Number of runs kept on the session scoreboard.
pub const SCOREBOARD_SIZE: usize = 5;

/// Upper bound on how long the app loop blocks waiting for input.
pub const MAX_IDLE_WAIT: Duration = Duration::from_millis(250);

pub const BUTTON_HEIGHT: u16 = 8;
pub const BUTTON_WIDTH: u16 = 16;

/// How the target sequence changes from one round to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// A fresh sequence of this many symbols every round.
    Fixed(usize),
    /// One symbol appended per round, starting from a single symbol.
    Growing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePolicy {
    None,
    IncrementOnMatchResetOnMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPolicy {
    /// The game ends after the first evaluated round.
    Single,
    /// Rounds continue until the player quits.
    Endless,
}

/// Whether presses count while the sequence is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPolicy {
    LockedDuringPlayback,
    /// Presses made during playback are kept and evaluated once it completes.
    AcceptDuringPlayback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub growth: GrowthPolicy,
    pub score: ScorePolicy,
    /// Clear the target sequence after a mismatch. When false the same
    /// sequence is played again.
    pub reset_sequence_on_loss: bool,
    pub rounds: RoundPolicy,
    pub input: InputPolicy,
    pub matching: MatchPolicy,
    pub step_delay: Duration,
    pub flash: Duration,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.growth == GrowthPolicy::Fixed(0) {
            return Err(ConfigError::Validation(
                "fixed sequence length must be > 0".to_string(),
            ));
        }
        if self.step_delay.is_zero() {
            return Err(ConfigError::Validation("step delay must be > 0".to_string()));
        }
        // the button must go dark between two reveals
        if self.flash >= self.step_delay {
            return Err(ConfigError::Validation(format!(
                "flash ({:?}) must be shorter than the step delay ({:?})",
                self.flash, self.step_delay
            )));
        }
        Ok(())
    }

    pub fn is_scored(&self) -> bool {
        self.score == ScorePolicy::IncrementOnMatchResetOnMismatch
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Variant::C.config()
    }
}

/// The four canned rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One round of four symbols, no score.
    A,
    /// Growing sequence without score; a miss replays the same sequence.
    B,
    /// Growing sequence with score; a miss starts over.
    C,
    /// A fresh four-symbol sequence every round, with score.
    D,
}

impl Variant {
    pub fn config(&self) -> GameConfig {
        let base = GameConfig {
            growth: GrowthPolicy::Growing,
            score: ScorePolicy::None,
            reset_sequence_on_loss: true,
            rounds: RoundPolicy::Endless,
            input: InputPolicy::LockedDuringPlayback,
            matching: MatchPolicy::FullLength,
            step_delay: DEFAULT_STEP_DELAY,
            flash: DEFAULT_FLASH,
        };

        match self {
            Variant::A => GameConfig {
                growth: GrowthPolicy::Fixed(FIXED_SEQUENCE_LEN),
                rounds: RoundPolicy::Single,
                ..base
            },
            Variant::B => GameConfig {
                reset_sequence_on_loss: false,
                input: InputPolicy::AcceptDuringPlayback,
                ..base
            },
            Variant::C => GameConfig {
                score: ScorePolicy::IncrementOnMatchResetOnMismatch,
                ..base
            },
            Variant::D => GameConfig {
                growth: GrowthPolicy::Fixed(FIXED_SEQUENCE_LEN),
                score: ScorePolicy::IncrementOnMatchResetOnMismatch,
                ..base
            },
        }
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Variant::A),
            "b" => Ok(Variant::B),
            "c" => Ok(Variant::C),
            "d" => Ok(Variant::D),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for variant in [Variant::A, Variant::B, Variant::C, Variant::D] {
            assert!(variant.config().validate().is_ok(), "{variant:?}");
        }
    }

    #[test]
    fn only_c_and_d_keep_score() {
        assert!(!Variant::A.config().is_scored());
        assert!(!Variant::B.config().is_scored());
        assert!(Variant::C.config().is_scored());
        assert!(Variant::D.config().is_scored());
    }

    #[test]
    fn rejects_empty_fixed_sequence() {
        let config = GameConfig {
            growth: GrowthPolicy::Fixed(0),
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_flash_longer_than_step() {
        let config = GameConfig {
            step_delay: Duration::from_millis(100),
            flash: Duration::from_millis(200),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_flash_as_long_as_step() {
        let config = GameConfig {
            step_delay: Duration::from_millis(200),
            flash: Duration::from_millis(200),
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = GameConfig {
            flash: Duration::from_millis(199),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_variant() {
        assert_eq!("a".parse::<Variant>().unwrap(), Variant::A);
        assert_eq!(" D ".parse::<Variant>().unwrap(), Variant::D);
        assert!("e".parse::<Variant>().is_err());
    }
}
