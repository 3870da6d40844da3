//! Session high score
//!
//! Held in memory only. A new world is handed the current best so its HUD
//! can show the running high score while the run is in progress.

use serde::{Deserialize, Serialize};

use crate::settings::Contour;

/// Best finished run of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRun {
    pub score: u64,
    pub contour: Contour,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    best: Option<BestRun>,
    runs: u32,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// The score a new world starts its running high score from
    pub fn high_score(&self) -> u64 {
        self.best.map_or(0, |run| run.score)
    }

    pub fn best(&self) -> Option<BestRun> {
        self.best
    }

    /// Finished runs recorded this session
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Record a finished run. Returns true when it beat the session best;
    /// a tie keeps the earlier run.
    pub fn record(&mut self, score: u64, contour: Contour) -> bool {
        self.runs += 1;
        if score <= self.high_score() {
            return false;
        }
        log::info!("New high score {score} on {}", contour.as_str());
        self.best = Some(BestRun { score, contour });
        true
    }
}
