use crate::{MoveRejected, Rejection};

use super::{
    cell::{Cell, PieceId, Position},
    color::Color,
    field::Field,
    shape::Shape,
};

/// A falling piece: four cells moved and rotated as one rigid unit.
///
/// Cell index 0 is the pivot. Every move or rotation is validated against the
/// [`Field`] as a whole before anything changes; a rejected attempt leaves all
/// four cells where they were.
///
/// Two API flavours are offered:
///
/// - [`Self::moved`] / [`Self::rotated`] / [`Self::recentered`] return a new piece
///   or the rejection, without touching `self`
/// - [`Self::try_move`] / [`Self::try_rotate`] / [`Self::hard_drop`] commit in
///   place and report success as `bool`
///
/// Neither writes into the field; keeping the field's registrations in step is
/// the caller's job (see [`Field::remove_piece`] and [`Field::place_piece`]).
///
/// # Example
///
/// ```
/// use stackfall_engine::{Field, Piece, PieceId, Position, Shape, Color};
///
/// let field = Field::new(10, 20);
/// let origin = Position::new(5, 0);
/// let mut piece = Piece::try_new(PieceId::new(1), Shape::T, Color::Magenta, origin, &field).unwrap();
///
/// assert!(piece.try_move(-1, 0, &field));
/// assert!(piece.try_rotate(true, &field));
/// assert_eq!(piece.hard_drop(&field), 17);
/// assert!(!piece.is_falling());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    shape: Shape,
    cells: [Cell; 4],
    falling: bool,
}

impl Piece {
    /// Instantiates `shape`'s template with its top row at `origin`.
    ///
    /// Fails if any of the four cells is outside the field or occupied.
    pub fn try_new(
        id: PieceId,
        shape: Shape,
        color: Color,
        origin: Position,
        field: &Field,
    ) -> Result<Self, Rejection> {
        let mut cells = [Cell::new(origin, color, id); 4];
        for (cell, &(dx, dy)) in cells.iter_mut().zip(shape.offsets()) {
            *cell = cell.relocated(origin.offset(dx, dy), field)?;
        }
        Ok(Self {
            id,
            shape,
            cells,
            falling: true,
        })
    }

    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.cells[0].color()
    }

    #[must_use]
    pub const fn is_straight(&self) -> bool {
        self.shape.is_straight()
    }

    #[must_use]
    pub const fn is_falling(&self) -> bool {
        self.falling
    }

    #[must_use]
    pub const fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    #[must_use]
    pub const fn pivot(&self) -> Position {
        self.cells[0].position()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().map(Cell::position)
    }

    /// Ends the piece's fall.
    pub fn land(&mut self) {
        self.falling = false;
    }

    /// Returns the piece translated by `(dx, dy)`.
    ///
    /// For each cell the vertical step is checked before the full step. If a
    /// vertical step with `dy > 0` is blocked, the rejection is flagged `landed`.
    pub fn moved(&self, dx: i32, dy: i32, field: &Field) -> Result<Self, MoveRejected> {
        let mut cells = self.cells;
        for cell in &mut cells {
            let vertical = Position::new(cell.x(), cell.y() + dy);
            field
                .check_vacant(vertical, self.id)
                .map_err(|rejection| MoveRejected {
                    rejection,
                    landed: dy > 0,
                })?;
            *cell = cell
                .relocated(cell.position().offset(dx, dy), field)
                .map_err(|rejection| MoveRejected {
                    rejection,
                    landed: false,
                })?;
        }
        Ok(Self { cells, ..*self })
    }

    /// Moves the piece by `(dx, dy)` if the field allows it.
    ///
    /// A blocked downward move lands the piece even though the move fails.
    pub fn try_move(&mut self, dx: i32, dy: i32, field: &Field) -> bool {
        match self.moved(dx, dy, field) {
            Ok(piece) => {
                *self = piece;
                true
            }
            Err(MoveRejected { landed, .. }) => {
                if landed {
                    self.land();
                }
                false
            }
        }
    }

    /// Drops the piece until it is blocked and lands it.
    ///
    /// Returns the number of rows travelled.
    pub fn hard_drop(&mut self, field: &Field) -> usize {
        let mut rows = 0;
        while self.try_move(0, 1, field) {
            rows += 1;
        }
        self.land();
        rows
    }

    /// Returns the piece turned a quarter around its pivot.
    ///
    /// With y growing downward, `clockwise` turns the piece clockwise on screen.
    /// The straight piece only toggles between horizontal and vertical, whatever
    /// the direction.
    pub fn rotated(&self, clockwise: bool, field: &Field) -> Result<Self, Rejection> {
        let pivot = self.pivot();
        let mut cells = self.cells;

        if self.is_straight() {
            // Decided once up front, later cells would change the answer.
            let horizontal = self.cells[0].x() != self.cells[1].x();
            for cell in &mut cells[1..] {
                let target = if horizontal {
                    Position::new(pivot.x, pivot.y + (cell.x() - pivot.x))
                } else {
                    Position::new(pivot.x + (cell.y() - pivot.y), pivot.y)
                };
                *cell = cell.relocated(target, field)?;
            }
        } else {
            for cell in &mut cells[1..] {
                let (bx, by) = rotate_offset(cell.x() - pivot.x, cell.y() - pivot.y, clockwise);
                *cell = cell.relocated(pivot.offset(bx, by), field)?;
            }
        }

        Ok(Self { cells, ..*self })
    }

    /// Rotates the piece if the field allows it.
    pub fn try_rotate(&mut self, clockwise: bool, field: &Field) -> bool {
        match self.rotated(clockwise, field) {
            Ok(piece) => {
                *self = piece;
                true
            }
            Err(_) => false,
        }
    }

    /// Returns the piece translated so its topmost cell stands on `target`.
    ///
    /// On ties the lowest cell index wins.
    pub fn recentered(&self, target: Position, field: &Field) -> Result<Self, MoveRejected> {
        let top = self
            .cells
            .iter()
            .reduce(|top, cell| if cell.y() < top.y() { cell } else { top })
            .map_or(self.pivot(), Cell::position);
        self.moved(target.x - top.x, target.y - top.y, field)
    }
}

/// Quarter turn of a pivot-relative offset.
///
/// Counter-clockwise on screen when `clockwise` is false; swapping the axes
/// around the same rule mirrors it into the clockwise turn.
fn rotate_offset(bx: i32, by: i32, clockwise: bool) -> (i32, i32) {
    let (mut bx, mut by) = if clockwise { (by, bx) } else { (bx, by) };

    if bx != 0 && by != 0 {
        // corner
        if bx == by {
            by = -by;
        } else {
            bx = by;
        }
    } else if bx != 0 {
        by = -bx;
        bx = 0;
    } else {
        bx = by;
        by = 0;
    }

    if clockwise { (by, bx) } else { (bx, by) }
}
