use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    ConfigError, HoldError, ParseActionError, SessionOverError,
    core::{
        cell::Cell,
        color::{Color, ColorCycle},
        field::{Field, FieldView},
        piece::Piece,
    },
};

use super::{config::SessionConfig, spawner::Spawner, stats::SessionStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Running,
    GameOver,
}

/// One input applied by [`Session::tick`].
///
/// Gravity is not implied: a driving loop that wants the piece to fall on its
/// own sends [`Action::SoftDrop`] from its timer.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    #[default]
    #[display("none")]
    None,
    #[display("move-left")]
    MoveLeft,
    #[display("move-right")]
    MoveRight,
    #[display("soft-drop")]
    SoftDrop,
    #[display("hard-drop")]
    HardDrop,
    #[display("rotate-cw")]
    RotateCw,
    #[display("rotate-ccw")]
    RotateCcw,
    #[display("hold")]
    Hold,
}

impl Action {
    pub const ALL: [Self; 8] = [
        Action::None,
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::HardDrop,
        Action::RotateCw,
        Action::RotateCcw,
        Action::Hold,
    ];

    /// Returns the script code of this action.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::Action;
    ///
    /// assert_eq!(Action::MoveLeft.as_char(), '<');
    /// assert_eq!(Action::HardDrop.as_char(), 'V');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Action::None => '.',
            Action::MoveLeft => '<',
            Action::MoveRight => '>',
            Action::SoftDrop => 'v',
            Action::HardDrop => 'V',
            Action::RotateCw => ')',
            Action::RotateCcw => '(',
            Action::Hold => 'h',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Action::None),
            '<' => Some(Action::MoveLeft),
            '>' => Some(Action::MoveRight),
            'v' => Some(Action::SoftDrop),
            'V' => Some(Action::HardDrop),
            ')' => Some(Action::RotateCw),
            '(' => Some(Action::RotateCcw),
            'h' => Some(Action::Hold),
            _ => None,
        }
    }

    /// Parses a script of single-character codes, ignoring whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::Action;
    ///
    /// let actions = Action::parse_script("<< )V\nh").unwrap();
    /// assert_eq!(actions.len(), 5);
    /// assert!(Action::parse_script("<?").is_err());
    /// ```
    pub fn parse_script(script: &str) -> Result<Vec<Self>, ParseActionError> {
        script
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                Self::from_char(c).ok_or_else(|| ParseActionError {
                    input: c.to_string(),
                })
            })
            .collect()
    }
}

/// Accepts either the kebab-case name (`"rotate-cw"`) or the script code (`")"`).
impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(action) = Self::from_char(c)
        {
            return Ok(action);
        }
        Self::ALL
            .into_iter()
            .find(|action| action.to_string() == s)
            .ok_or_else(|| ParseActionError {
                input: s.to_owned(),
            })
    }
}

/// What happened during one [`Session::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// A new piece entered the field (at the start of the tick or by a hold).
    pub spawned: bool,
    /// The action changed the piece (or swapped it out).
    pub applied: bool,
    /// The falling piece landed and became part of the stack.
    pub landed: bool,
    pub cleared_lines: usize,
    /// This tick ended the session.
    pub game_over: bool,
}

/// A single game: the field, the falling and held pieces, and the score.
///
/// The falling piece is registered in the field between ticks, so
/// [`Self::field`] always shows the complete picture. Use [`Self::view`] or
/// [`Self::is_falling`] to tell falling cells from landed ones.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    field: Field,
    spawner: Spawner,
    colors: ColorCycle,
    falling: Option<Piece>,
    held: Option<Piece>,
    hold_used: bool,
    stats: SessionStats,
    state: SessionState,
}

impl Session {
    /// Starts a session on an empty field.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let field = Field::new(config.width, config.height);
        Self::with_field(config, field)
    }

    /// Starts a session on a pre-filled field.
    ///
    /// The field must have the dimensions named by `config`.
    pub fn with_field(config: SessionConfig, field: Field) -> Result<Self, ConfigError> {
        let origin = config.spawn_position()?;
        if (field.width(), field.height()) != (config.width, config.height) {
            return Err(ConfigError::FieldMismatch {
                width: config.width,
                height: config.height,
                actual_width: field.width(),
                actual_height: field.height(),
            });
        }
        Ok(Self {
            config,
            field,
            spawner: Spawner::new(origin),
            colors: ColorCycle::new(),
            falling: None,
            held: None,
            hold_used: false,
            stats: SessionStats::new(),
            state: SessionState::Running,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn field(&self) -> &Field {
        &self.field
    }

    /// Returns the field as a renderer sees it, with falling cells marked.
    #[must_use]
    pub fn view(&self) -> FieldView<'_> {
        FieldView::new(&self.field, self.falling.map(|piece| piece.id()))
    }

    #[must_use]
    pub const fn falling_piece(&self) -> Option<&Piece> {
        self.falling.as_ref()
    }

    #[must_use]
    pub const fn held_piece(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    #[must_use]
    pub const fn is_hold_used(&self) -> bool {
        self.hold_used
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Returns whether `cell` belongs to the piece that is still falling.
    #[must_use]
    pub fn is_falling(&self, cell: &Cell) -> bool {
        self.falling
            .is_some_and(|piece| piece.is_falling() && piece.id() == cell.piece())
    }

    /// Returns the color (and so the shape) of the next piece to spawn.
    #[must_use]
    pub const fn next_color(&self) -> Color {
        self.colors.peek()
    }

    /// Advances the session by one step, applying at most one action.
    ///
    /// Returns [`SessionOverError`] once the session has ended; the tick that
    /// ends it still returns a report with `game_over` set.
    pub fn tick(&mut self, action: Action) -> Result<TickReport, SessionOverError> {
        if self.state.is_game_over() {
            return Err(SessionOverError);
        }
        self.stats.tick();
        let mut report = TickReport::default();

        let mut piece = if let Some(piece) = self.falling.take().filter(Piece::is_falling) {
            piece
        } else {
            let Some(piece) = self.spawn_next() else {
                self.end_session("no room to spawn a new piece");
                report.game_over = true;
                return Ok(report);
            };
            report.spawned = true;
            piece
        };

        self.field.remove_piece(&piece);
        let field = &self.field;
        match action {
            Action::None => {}
            Action::MoveLeft => report.applied = piece.try_move(-1, 0, field),
            Action::MoveRight => report.applied = piece.try_move(1, 0, field),
            Action::SoftDrop => report.applied = piece.try_move(0, 1, field),
            Action::HardDrop => {
                piece.hard_drop(field);
                report.applied = true;
            }
            Action::RotateCw => report.applied = piece.try_rotate(true, field),
            Action::RotateCcw => report.applied = piece.try_rotate(false, field),
            Action::Hold => match self.hold(piece) {
                Ok((next, spawned)) => {
                    piece = next;
                    report.applied = true;
                    report.spawned |= spawned;
                }
                Err(HoldError::HoldAlreadyUsed) => {}
                Err(err) => {
                    if matches!(err, HoldError::SpawnCollision) {
                        // No replacement entered the field, so the held piece
                        // stays on it as well.
                        self.field.place_piece(&piece);
                    }
                    self.end_session(&err.to_string());
                    report.game_over = true;
                    return Ok(report);
                }
            },
        }
        self.field.place_piece(&piece);

        if piece.is_falling() {
            self.falling = Some(piece);
            return Ok(report);
        }

        let cleared = self.field.clear_lines();
        self.stats.complete_piece_drop(cleared);
        report.landed = true;
        report.cleared_lines = cleared;
        debug!(id = %piece.id(), shape = ?piece.shape(), "piece landed");
        if cleared > 0 {
            info!(cleared, score = self.score(), "lines cleared");
        }
        Ok(report)
    }

    /// Moves `piece` into the hold slot and returns the piece that replaces it,
    /// together with whether that piece was newly spawned.
    ///
    /// `piece` must already be removed from the field.
    fn hold(&mut self, piece: Piece) -> Result<(Piece, bool), HoldError> {
        if self.hold_used {
            return Err(HoldError::HoldAlreadyUsed);
        }
        let next = match self.held.replace(piece) {
            None => (
                self.spawn_next().ok_or(HoldError::SpawnCollision)?,
                true,
            ),
            Some(held) => (
                held.recentered(self.spawner.origin(), &self.field)
                    .map_err(HoldError::RecenterCollision)?,
                false,
            ),
        };
        self.hold_used = true;
        debug!(held = %piece.id(), falling = %next.0.id(), "hold");
        Ok(next)
    }

    /// Spawns the next piece of the color cycle without registering it in the field.
    fn spawn_next(&mut self) -> Option<Piece> {
        let color = self.colors.next_color();
        let piece = self.spawner.spawn(color, &self.field)?;
        self.hold_used = false;
        Some(piece)
    }

    fn end_session(&mut self, reason: &str) {
        self.falling = None;
        self.state = SessionState::GameOver;
        info!(
            reason,
            score = self.score(),
            ticks = self.stats.ticks(),
            "game over"
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{PieceId, Position, Shape};

    use super::*;

    fn session() -> Session {
        Session::new(SessionConfig::default()).unwrap()
    }

    fn assert_field_consistent(session: &Session) {
        let field = session.field();
        for y in 0..field.height() {
            for x in 0..field.width() {
                let position = Position::new(x as i32, y as i32);
                if let Some(cell) = field.get(position) {
                    assert_eq!(cell.position(), position);
                }
            }
        }
        if let Some(piece) = session.falling_piece() {
            for cell in piece.cells() {
                assert_eq!(field.get(cell.position()), Some(cell));
            }
        }
    }

    #[test]
    fn test_action_chars() {
        for action in Action::ALL {
            assert_eq!(Action::from_char(action.as_char()), Some(action));
        }
        assert_eq!(Action::from_char('x'), None);
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("rotate-ccw".parse(), Ok(Action::RotateCcw));
        assert_eq!("V".parse(), Ok(Action::HardDrop));
        assert_eq!("hold".parse(), Ok(Action::Hold));
        assert_eq!(
            "jump".parse::<Action>(),
            Err(ParseActionError {
                input: "jump".to_owned()
            })
        );
    }

    #[test]
    fn test_action_serde() {
        assert_eq!(
            serde_json::to_string(&Action::SoftDrop).unwrap(),
            "\"soft-drop\""
        );
        let actions: Vec<Action> = serde_json::from_str(r#"["move-left", "none"]"#).unwrap();
        assert_eq!(actions, [Action::MoveLeft, Action::None]);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(Session::new(SessionConfig::new(0, 0)).is_err());
        assert!(matches!(
            Session::with_field(SessionConfig::default(), Field::new(8, 20)),
            Err(ConfigError::FieldMismatch { actual_width: 8, .. })
        ));
    }

    #[test]
    fn test_first_tick_spawns_and_registers() {
        let mut session = session();
        assert!(session.falling_piece().is_none());
        assert_eq!(session.next_color(), Color::Cyan);

        let report = session.tick(Action::None).unwrap();
        assert!(report.spawned);
        assert!(!report.applied);

        let piece = *session.falling_piece().unwrap();
        assert_eq!(piece.shape(), Shape::I);
        assert_eq!(session.field().occupied_count(), 4);
        assert!(piece.cells().iter().all(|cell| session.is_falling(cell)));
        assert_eq!(session.next_color(), Color::Blue);
        assert_field_consistent(&session);
    }

    #[test]
    fn test_move_keeps_footprint_in_step() {
        let mut session = session();
        session.tick(Action::None).unwrap();
        let before: Vec<_> = session.falling_piece().unwrap().positions().collect();

        let report = session.tick(Action::MoveLeft).unwrap();
        assert!(report.applied);
        assert!(!report.spawned);
        for position in before {
            let moved = position.offset(-1, 0);
            assert!(session.field().is_occupied(moved));
        }
        assert_eq!(session.field().occupied_count(), 4);
        assert_field_consistent(&session);
    }

    #[test]
    fn test_rejected_move_is_not_applied() {
        let mut session = session();
        session.tick(Action::None).unwrap();
        // The straight piece spans columns 4..=7; it can move right twice.
        assert!(session.tick(Action::MoveRight).unwrap().applied);
        assert!(session.tick(Action::MoveRight).unwrap().applied);
        let report = session.tick(Action::MoveRight).unwrap();
        assert!(!report.applied);
        assert!(!report.landed);
        assert_field_consistent(&session);
    }

    #[test]
    fn test_hard_drop_lands_and_next_tick_spawns() {
        let mut session = session();
        let report = session.tick(Action::HardDrop).unwrap();
        assert!(report.spawned);
        assert!(report.landed);
        assert_eq!(report.cleared_lines, 0);
        assert!(session.falling_piece().is_none());
        assert_eq!(session.stats().landed_pieces(), 1);

        let landed = session.field().get(Position::new(5, 19)).copied().unwrap();
        assert!(!session.is_falling(&landed));

        let report = session.tick(Action::None).unwrap();
        assert!(report.spawned);
        assert_eq!(session.falling_piece().unwrap().shape(), Shape::J);
        assert_eq!(session.field().occupied_count(), 8);
    }

    #[test]
    fn test_soft_drop_onto_floor_lands() {
        let mut session = Session::new(SessionConfig::new(10, 3)).unwrap();
        session.tick(Action::None).unwrap();
        assert!(session.tick(Action::SoftDrop).unwrap().applied);
        assert!(session.tick(Action::SoftDrop).unwrap().applied);

        let report = session.tick(Action::SoftDrop).unwrap();
        assert!(!report.applied);
        assert!(report.landed);
        assert!(session.falling_piece().is_none());
    }

    #[test]
    fn test_hold_into_empty_slot_spawns() {
        let mut session = session();
        session.tick(Action::None).unwrap();
        let first = *session.falling_piece().unwrap();

        let report = session.tick(Action::Hold).unwrap();
        assert!(report.applied);
        assert!(report.spawned);
        assert!(session.is_hold_used());
        assert_eq!(session.held_piece().map(Piece::id), Some(first.id()));

        let falling = session.falling_piece().unwrap();
        assert_eq!(falling.shape(), Shape::J);
        assert_eq!(session.field().occupied_count(), 4);
        assert!(
            session
                .field()
                .occupied_cells()
                .all(|cell| cell.piece() == falling.id())
        );
    }

    #[test]
    fn test_second_hold_in_same_turn_is_ignored() {
        let mut session = session();
        session.tick(Action::Hold).unwrap();
        let falling = *session.falling_piece().unwrap();

        let report = session.tick(Action::Hold).unwrap();
        assert!(!report.applied);
        assert_eq!(session.falling_piece(), Some(&falling));
        assert_eq!(session.held_piece().map(Piece::shape), Some(Shape::I));
    }

    #[test]
    fn test_hold_swaps_and_recenters() {
        let mut session = session();
        session.tick(Action::None).unwrap();
        session.tick(Action::Hold).unwrap();
        session.tick(Action::HardDrop).unwrap();

        // Fresh spawn resets the hold.
        session.tick(Action::None).unwrap();
        assert!(!session.is_hold_used());
        let orange = session.falling_piece().unwrap().id();

        let report = session.tick(Action::Hold).unwrap();
        assert!(report.applied);
        assert!(!report.spawned);

        let straight = session.falling_piece().unwrap();
        assert_eq!(straight.shape(), Shape::I);
        assert_eq!(straight.id(), PieceId::new(1));
        let mut xs: Vec<_> = straight.positions().map(|p| (p.x, p.y)).collect();
        xs.sort_unstable();
        assert_eq!(xs, [(4, 0), (5, 0), (6, 0), (7, 0)]);
        assert_eq!(session.held_piece().map(Piece::id), Some(orange));
        assert_field_consistent(&session);
    }

    #[test]
    fn test_spawn_collision_ends_session() {
        let field = Field::from_ascii(&format!("{}\n{}", "....x.....", "..........\n".repeat(19)));
        let mut session = Session::with_field(SessionConfig::default(), field).unwrap();

        let report = session.tick(Action::MoveLeft).unwrap();
        assert!(report.game_over);
        assert!(!report.spawned);
        assert!(!session.is_running());
        assert!(session.state().is_game_over());
        assert_eq!(session.tick(Action::None), Err(SessionOverError));
        assert_eq!(session.stats().ticks(), 1);
    }

    #[test]
    fn test_view_marks_only_falling_cells() {
        let mut session = session();
        session.tick(Action::HardDrop).unwrap();
        session.tick(Action::None).unwrap();

        let view = session.view();
        let floor = view.cell(Position::new(5, 19)).unwrap();
        assert_eq!(floor.color, Color::Cyan);
        assert!(!floor.falling);
        let top = view.cell(Position::new(5, 1)).unwrap();
        assert_eq!(top.color, Color::Blue);
        assert!(top.falling);
    }

    fn field_with_top_rows(top: &[&str]) -> Field {
        let mut art = top.join("\n");
        for _ in top.len()..20 {
            art.push_str("\n..........");
        }
        Field::from_ascii(&art)
    }

    #[test]
    fn test_blocked_spawn_on_hold_keeps_piece_on_field() {
        let field = field_with_top_rows(&["..........", "....x....."]);
        let mut session = Session::with_field(SessionConfig::default(), field).unwrap();
        session.tick(Action::None).unwrap();
        let straight = session.falling_piece().unwrap().id();

        // The blue piece needs (4, 1), which is taken.
        let report = session.tick(Action::Hold).unwrap();
        assert!(report.game_over);
        assert!(!report.applied);
        assert!(!session.is_running());
        assert!(session.falling_piece().is_none());
        assert_eq!(session.held_piece().map(Piece::id), Some(straight));

        let dump = session.field().to_string();
        let top: Vec<_> = dump.lines().take(2).collect();
        assert_eq!(top, ["....xxxx..", "....x....."]);
        assert_eq!(session.field().occupied_count(), 5);
        assert_eq!(session.tick(Action::None), Err(SessionOverError));
    }

    #[test]
    fn test_blocked_recenter_on_hold_ends_session() {
        let field = field_with_top_rows(&["x........."]);
        let mut session = Session::with_field(SessionConfig::default(), field).unwrap();

        // Park the straight piece on row 1 against the left wall and hold it.
        session.tick(Action::SoftDrop).unwrap();
        for _ in 0..4 {
            assert!(session.tick(Action::MoveLeft).unwrap().applied);
        }
        session.tick(Action::Hold).unwrap();
        session.tick(Action::HardDrop).unwrap();
        session.tick(Action::None).unwrap();
        let orange = session.falling_piece().unwrap().id();

        // Moving back to spawn steps up first, into the cell at (0, 0).
        let report = session.tick(Action::Hold).unwrap();
        assert!(report.game_over);
        assert!(!session.is_running());
        assert!(session.falling_piece().is_none());
        assert_eq!(session.held_piece().map(Piece::id), Some(orange));

        // Only the preset cell and the landed blue piece remain.
        let field = session.field();
        assert_eq!(field.occupied_count(), 5);
        assert!(field.is_occupied(Position::new(0, 0)));
        assert!(
            field
                .occupied_cells()
                .all(|cell| cell.piece() != orange && cell.piece() != PieceId::new(1))
        );
        assert_eq!(session.tick(Action::Hold), Err(SessionOverError));
    }
}
