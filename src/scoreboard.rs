use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A finished scored run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub score: u32,
    pub when: DateTime<Utc>,
}

impl RunRecord {
    pub fn new(score: u32, when: DateTime<Utc>) -> RunRecord {
        RunRecord { score, when }
    }
}

impl PartialEq for RunRecord {
    fn eq(&self, other: &RunRecord) -> bool {
        self.score == other.score
    }
}

impl Eq for RunRecord {}

impl PartialOrd for RunRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

/// Tracks the best runs.
pub trait Scoreboard {
    /// Record a finished run.
    ///
    /// Returns `true` if the run made the board, `false` if it was not good enough.
    fn add(&mut self, score: u32) -> bool;

    /// The best run, if one exists.
    fn first(&self) -> Option<&RunRecord>;

    /// The worst run still on the board, if one exists.
    fn last(&self) -> Option<&RunRecord>;

    /// All runs, best first.
    fn all(&self) -> &[RunRecord];
}

/// Best runs of the current session. Nothing is written to disk.
#[derive(Debug)]
pub struct SessionScoreboard {
    limit: usize,
    runs: Vec<RunRecord>,
}

impl SessionScoreboard {
    /// Construct a scoreboard keeping the top `limit` runs.
    pub fn new(limit: usize) -> Self {
        SessionScoreboard {
            limit,
            runs: Vec::with_capacity(limit),
        }
    }
}

impl Scoreboard for SessionScoreboard {
    fn add(&mut self, score: u32) -> bool {
        if self.limit == 0 {
            return false;
        }

        if self.runs.len() == self.limit {
            match self.last() {
                Some(worst) if worst.score >= score => return false,
                _ => {
                    self.runs.pop();
                }
            }
        }

        self.runs.push(RunRecord::new(score, Utc::now()));
        // stable, so earlier runs win ties
        self.runs.sort_by(|a, b| b.cmp(a));
        true
    }

    fn first(&self) -> Option<&RunRecord> {
        self.runs.first()
    }

    fn last(&self) -> Option<&RunRecord> {
        self.runs.last()
    }

    fn all(&self) -> &[RunRecord] {
        self.runs.as_slice()
    }
}

impl Default for SessionScoreboard {
    fn default() -> Self {
        SessionScoreboard::new(crate::config::SCOREBOARD_SIZE)
    }
}
