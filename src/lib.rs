//! A terminal Simon game: watch the buttons flash, then repeat the sequence.
//!
//! The rules live in [`lifecycle`], built from [`sequence`], [`playback`] and
//! [`matcher`]; [`simon`] and [`app`] put them on screen.

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod lifecycle;
pub mod matcher;
pub mod playback;
pub mod scoreboard;
pub mod sequence;
pub mod simon;
pub mod symbol;
