//! Comparison of the player's presses against the target sequence.

use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Fewer presses than the target has symbols.
    Incomplete,
    Match,
    Mismatch,
}

/// When a wrong press is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Only once the player has pressed as many symbols as the target holds.
    #[default]
    FullLength,
    /// As soon as a press differs from the target at the same position.
    FirstError,
}

/// Append a player press.
pub fn record(input: &mut Vec<Symbol>, symbol: Symbol) {
    input.push(symbol);
}

/// Classify `input` against `target`.
///
/// Input longer than the target can only happen when presses were collected
/// during playback and is always a mismatch.
pub fn evaluate(input: &[Symbol], target: &[Symbol]) -> Classification {
    if input.len() < target.len() {
        Classification::Incomplete
    } else if input == target {
        Classification::Match
    } else {
        Classification::Mismatch
    }
}

/// Classify `input` against `target` under `policy`.
pub fn evaluate_with(policy: MatchPolicy, input: &[Symbol], target: &[Symbol]) -> Classification {
    match policy {
        MatchPolicy::FullLength => evaluate(input, target),
        MatchPolicy::FirstError => {
            if input.iter().zip(target).any(|(pressed, expected)| pressed != expected) {
                Classification::Mismatch
            } else {
                evaluate(input, target)
            }
        }
    }
}
