use serde::{Deserialize, Serialize};

use crate::Rejection;

use super::{color::Color, field::Field};

/// Coordinate on the field.
///
/// - (0, 0) is the top-left cell
/// - X increases rightward (columns)
/// - Y increases downward (rows)
///
/// Signed so that rotation offsets and out-of-field candidates can be expressed
/// before they are validated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Identity of the piece a cell was spawned with.
///
/// Cells of the same piece never block each other; cells of different pieces do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{_0}")]
pub struct PieceId(u64);

impl PieceId {
    /// Owner of cells loaded from a fixture rather than spawned.
    pub const PRESET: Self = Self(0);

    /// Creates an id. Ids from 1 up are handed out by the spawner, so cells
    /// built by hand should use [`Self::PRESET`] to avoid being mistaken for a
    /// spawned piece.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A single occupied grid square.
///
/// A cell only knows where it is, its color and which piece it came from. Whether
/// it is still falling is a property of its piece, see
/// [`Session::is_falling`](crate::Session::is_falling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    position: Position,
    color: Color,
    piece: PieceId,
}

impl Cell {
    #[must_use]
    pub const fn new(position: Position, color: Color, piece: PieceId) -> Self {
        Self {
            position,
            color,
            piece,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn piece(&self) -> PieceId {
        self.piece
    }

    /// Returns this cell moved to `target`.
    ///
    /// Fails if `target` is outside the field or held by a cell of another piece.
    pub fn relocated(self, target: Position, field: &Field) -> Result<Self, Rejection> {
        field.check_vacant(target, self.piece)?;
        Ok(Self {
            position: target,
            ..self
        })
    }

    /// Gravity step used by line clearing; the caller owns the bookkeeping.
    pub(crate) fn shift_down(&mut self) {
        self.position.y += 1;
    }
}
