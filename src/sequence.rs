//! Generation of the sequence the player has to reproduce.

use rand::Rng;

use crate::symbol::{PALETTE, Symbol};

/// Picks symbols uniformly from the palette.
///
/// The random source is a type parameter so tests and `--seed` runs can use a
/// seeded `StdRng`.
#[derive(Debug)]
pub struct SequenceEngine<R: Rng> {
    rng: R,
}

impl<R: Rng> SequenceEngine<R> {
    pub fn new(rng: R) -> Self {
        SequenceEngine { rng }
    }

    /// Pick one symbol at random.
    pub fn pick(&mut self) -> Symbol {
        PALETTE[self.rng.random_range(0..PALETTE.len())]
    }

    /// Append a random symbol to `target` and return it.
    pub fn extend(&mut self, target: &mut Vec<Symbol>) -> Symbol {
        let symbol = self.pick();
        target.push(symbol);
        symbol
    }

    /// Clear `target`.
    pub fn reset(&mut self, target: &mut Vec<Symbol>) {
        target.clear();
    }

    /// Replace the contents of `target` with `len` fresh symbols.
    pub fn regenerate(&mut self, target: &mut Vec<Symbol>, len: usize) {
        self.reset(target);
        for _ in 0..len {
            self.extend(target);
        }
    }
}
