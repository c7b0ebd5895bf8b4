use std::fmt;

use ratatui::style::Color;

/// One of the four buttons the player has to remember.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Green,
    Red,
    Yellow,
    Blue,
}

/// Every symbol, in grid order (top-left, top-right, bottom-left, bottom-right).
pub const PALETTE: [Symbol; 4] = [Symbol::Green, Symbol::Red, Symbol::Yellow, Symbol::Blue];

impl Symbol {
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Green => "green",
            Symbol::Red => "red",
            Symbol::Yellow => "yellow",
            Symbol::Blue => "blue",
        }
    }

    /// The key that presses this symbol, always the first letter of its name.
    pub fn key(&self) -> char {
        match self {
            Symbol::Green => 'g',
            Symbol::Red => 'r',
            Symbol::Yellow => 'y',
            Symbol::Blue => 'b',
        }
    }

    /// Look up the symbol bound to `key`, ignoring case.
    pub fn from_key(key: char) -> Option<Symbol> {
        let key = key.to_ascii_lowercase();
        PALETTE.into_iter().find(|s| s.key() == key)
    }

    /// Color used while the button is lit.
    pub fn color(&self) -> Color {
        match self {
            Symbol::Green => Color::LightGreen,
            Symbol::Red => Color::LightRed,
            Symbol::Yellow => Color::LightYellow,
            Symbol::Blue => Color::LightBlue,
        }
    }

    /// Tinted color used while the button is idle.
    pub fn dim_color(&self) -> Color {
        match self {
            Symbol::Green => Color::Green,
            Symbol::Red => Color::Red,
            Symbol::Yellow => Color::Yellow,
            Symbol::Blue => Color::Blue,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
