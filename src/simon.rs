//! The Simon game as a terminal widget: four colored buttons in a 2x2 grid
//! that flash the sequence and light up when pressed.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use ratatui::widgets::Widget;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout},
    prelude::*,
    symbols::border,
    text::{Line, Text},
    widgets::{Block, BorderType, Clear, Paragraph},
};

use crate::{
    config::{BUTTON_HEIGHT, BUTTON_WIDTH, GameConfig, RoundPolicy},
    error::ConfigError,
    game::TuiGame,
    lifecycle::{Game, GameEvent, GameObserver, Outcome, RoundState},
    scoreboard::{Scoreboard, SessionScoreboard},
    symbol::{PALETTE, Symbol},
};

/// Everything the widget shows that is not read straight off the [`Game`].
#[derive(Debug)]
pub struct SimonView {
    /// Time at which the events being delivered happened.
    now: Instant,
    flash: Duration,
    pub lit: Option<Symbol>,
    pub lit_until: Option<Instant>,
    pub message: Option<(String, Color)>,
    pub last_outcome: Option<Outcome>,
    pub score_display: String,
    pub scoreboard: SessionScoreboard,
}

impl SimonView {
    pub fn new(flash: Duration, now: Instant) -> Self {
        SimonView {
            now,
            flash,
            lit: None,
            lit_until: None,
            message: None,
            last_outcome: None,
            score_display: format_score(0),
            scoreboard: SessionScoreboard::default(),
        }
    }

    fn light(&mut self, symbol: Symbol) {
        self.lit = Some(symbol);
        self.lit_until = Some(self.now + self.flash);
    }

    fn expire(&mut self, now: Instant) {
        if self.lit_until.is_some_and(|until| until <= now) {
            self.lit = None;
            self.lit_until = None;
        }
    }
}

impl GameObserver for SimonView {
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted => {
                self.last_outcome = None;
                self.message = Some(("Watch closely...".to_string(), Color::Cyan));
            }
            GameEvent::Reveal { symbol, .. } | GameEvent::Pressed { symbol } => {
                self.light(*symbol);
            }
            GameEvent::PlaybackComplete => {
                self.message = Some(("Your turn!".to_string(), Color::Cyan));
            }
            GameEvent::Outcome(outcome) => {
                self.last_outcome = Some(*outcome);
                self.message = Some(match outcome {
                    Outcome::Win => ("Correct!".to_string(), Color::Green),
                    Outcome::Lose => ("Wrong!".to_string(), Color::Red),
                });
            }
            GameEvent::ScoreChanged { previous, current } => {
                if *current == 0 && *previous > 0 {
                    self.scoreboard.add(*previous);
                }
                self.score_display = format_score(*current);
            }
            GameEvent::RoundStarted { .. } | GameEvent::GameOver => {}
        }
    }
}

/// Scores are shown as two zero-padded digits.
pub fn format_score(score: u32) -> String {
    format!("{:02}", score)
}

/// Game state for the Simon TUI.
#[derive(Debug)]
pub struct Simon {
    pub game: Game<StdRng>,
    pub view: SimonView,
}

impl Simon {
    pub fn new(config: GameConfig, rng: StdRng, now: Instant) -> Result<Self, ConfigError> {
        let flash = config.flash;
        Ok(Simon {
            game: Game::new(config, rng)?,
            view: SimonView::new(flash, now),
        })
    }

    fn sync(&mut self, now: Instant) {
        self.view.now = now;
        self.game.flush(&mut self.view);
        self.view.expire(now);
    }

    fn state_label(&self) -> &'static str {
        match self.game.state() {
            RoundState::Idle => "Ready",
            RoundState::PlayingBack => "Watch",
            RoundState::AwaitingInput => "Your turn",
            RoundState::GameOver => "Game over",
        }
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(vec![
            format!("Round {} ", self.game.round()).bold(),
            format!("({} to remember) ", self.game.target().len()).into(),
            self.state_label().blue().bold(),
        ])];

        if let Some((message, color)) = &self.view.message {
            lines.push(Line::from(message.as_str().fg(*color).bold()));
        }

        Paragraph::new(Text::from(lines))
            .centered()
            .render(area, buf);
    }

    fn render_scoreboard(&self, area: Rect, buf: &mut Buffer) {
        let content = self
            .view
            .scoreboard
            .all()
            .iter()
            .map(|run| format!("{} {:>3}", run.when.format("%H:%M"), format_score(run.score)))
            .collect::<Vec<String>>()
            .join("\n");

        Paragraph::new(Text::from(format!("Session Best:\n{}", content)))
            .yellow()
            .centered()
            .render(area, buf);
    }

    fn render_buttons(&self, area: Rect, buf: &mut Buffer) {
        let [grid] = Layout::horizontal([Constraint::Length(BUTTON_WIDTH * 2)])
            .flex(Flex::Center)
            .areas(area);
        let [grid] = Layout::vertical([Constraint::Length(BUTTON_HEIGHT * 2)])
            .flex(Flex::Center)
            .areas(grid);

        let [top, bottom] =
            Layout::vertical([Constraint::Length(BUTTON_HEIGHT); 2]).areas(grid);
        let [top_left, top_right] =
            Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 2]).areas(top);
        let [bottom_left, bottom_right] =
            Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 2]).areas(bottom);

        let cells = [top_left, top_right, bottom_left, bottom_right];
        for (i, (symbol, cell)) in PALETTE.iter().zip(cells).enumerate() {
            self.render_button(*symbol, i, cell, buf);
        }
    }

    fn render_button(&self, symbol: Symbol, position: usize, area: Rect, buf: &mut Buffer) {
        let lit = self.view.lit == Some(symbol);
        let background = if self.game.is_over() {
            Color::DarkGray
        } else if lit {
            symbol.color()
        } else {
            symbol.dim_color()
        };

        Block::default()
            .style(Style::default().bg(background))
            .render(area, buf);

        // the key letter sits in the button's outer corner
        let inner = area.inner(Margin::new(2, 1));
        let [label_area] = if position < 2 {
            Layout::vertical([Constraint::Length(1)]).areas(inner)
        } else {
            Layout::vertical([Constraint::Length(1)])
                .flex(Flex::End)
                .areas(inner)
        };
        let alignment = if position % 2 == 0 {
            Alignment::Left
        } else {
            Alignment::Right
        };

        let mut label = Span::from(symbol.key().to_string()).fg(Color::Black);
        if lit {
            label = label.bold();
        }
        Paragraph::new(Line::from(label))
            .alignment(alignment)
            .render(label_area, buf);
    }
}

impl TuiGame for Simon {
    fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) -> Result<()> {
        if let KeyCode::Char(c) = key_event.code
            && let Some(symbol) = Symbol::from_key(c)
        {
            self.game.press(symbol, now);
            self.sync(now);
        }

        Ok(())
    }

    fn tick(&mut self, now: Instant) {
        self.game.tick(now);
        self.sync(now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.game.next_deadline(), self.view.lit_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn can_restart(&self) -> bool {
        match self.game.state() {
            RoundState::Idle | RoundState::GameOver => true,
            // a single round has to be played out
            RoundState::PlayingBack | RoundState::AwaitingInput => {
                self.game.config().rounds == RoundPolicy::Endless
            }
        }
    }

    fn reset(&mut self, now: Instant) {
        self.game.start(now);
        self.sync(now);
    }
}

impl Widget for &Simon {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let status_constraint = Constraint::Length(3);
        let grid_constraint = Constraint::Min(BUTTON_HEIGHT * 2);
        let help_constraint = Constraint::Length(2);

        let [status_area, grid_area, help_area] =
            Layout::vertical([status_constraint, grid_constraint, help_constraint])
                .vertical_margin(2)
                .flex(Flex::Center)
                .areas(area);

        let [_, board_area, side_area] = Layout::horizontal([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 2),
            Constraint::Ratio(1, 4),
        ])
        .horizontal_margin(2)
        .areas(grid_area);

        self.render_status(status_area, buf);
        self.render_buttons(board_area, buf);
        if self.game.config().is_scored() {
            self.render_scoreboard(side_area, buf);
        }

        match self.game.state() {
            RoundState::Idle => {
                let help_txt = Text::from("Press ENTER to start.".to_string()).blue();
                Paragraph::new(help_txt).centered().render(help_area, buf);
            }
            RoundState::GameOver => {
                Clear.render(help_area, buf);
                let verdict = match self.view.last_outcome {
                    Some(Outcome::Win) => Line::from("YOU WIN".green().bold()),
                    _ => Line::from("GAME OVER".red().bold()),
                };
                let help_txt = Line::from("Press ENTER to play again.".blue());
                Paragraph::new(Text::from(vec![verdict, help_txt]))
                    .centered()
                    .render(help_area, buf);
            }
            RoundState::PlayingBack | RoundState::AwaitingInput => {}
        }

        let mode = match self.game.config().rounds {
            RoundPolicy::Single => " Single Round ",
            RoundPolicy::Endless => " Endless ",
        };
        let title = Line::from(" Simon TUI ".bold());
        let mut block = Block::bordered()
            .title(title.left_aligned())
            .title(Line::from(mode).right_aligned());
        if self.game.config().is_scored() {
            let score = Line::from(format!(" Score: {} ", self.view.score_display).bold());
            block = block.title(score.centered());
        }

        let mut instructions = vec![" Quit ".into(), "<q> ".blue().bold()];
        for symbol in PALETTE {
            instructions.push(format!(" {} ", symbol.name()).into());
            instructions.push(format!("<{}> ", symbol.key()).fg(symbol.dim_color()).bold());
        }
        instructions.push(" New Game ".into());
        instructions.push("<Enter> ".blue().bold());

        let block = block
            .title_bottom(Line::from(instructions).centered())
            .border_set(border::THICK)
            .border_type(BorderType::Rounded);
        Paragraph::default().block(block).render(area, buf);
    }
}
