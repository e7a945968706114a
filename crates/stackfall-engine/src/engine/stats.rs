use serde::Serialize;

/// Counters accumulated over a session.
///
/// The score is the plain number of lines cleared; there is no multi-line
/// bonus, level or combo.
///
/// # Example
///
/// ```
/// use stackfall_engine::SessionStats;
///
/// let mut stats = SessionStats::new();
/// stats.complete_piece_drop(0);
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 2);
/// assert_eq!(stats.landed_pieces(), 2);
/// assert_eq!(stats.line_cleared_counter(), &[1, 0, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    score: usize,
    landed_pieces: usize,
    ticks: usize,
    line_cleared_counter: [usize; 5],
}

impl SessionStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            landed_pieces: 0,
            ticks: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Total lines cleared so far.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn landed_pieces(&self) -> usize {
        self.landed_pieces
    }

    /// Number of ticks processed, including the one that ended the session.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    /// Histogram of landings by lines cleared.
    ///
    /// Index `n` counts landings that cleared exactly `n` lines. A single
    /// piece spans at most four rows, so clears beyond that only happen on
    /// preset fields and are counted in the score alone.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    pub(crate) const fn tick(&mut self) {
        self.ticks += 1;
    }

    /// Records a landed piece and the lines its landing cleared.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.landed_pieces += 1;
        self.score += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
    }
}
