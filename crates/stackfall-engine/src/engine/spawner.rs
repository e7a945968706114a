use tracing::debug;

use crate::core::{
    cell::{PieceId, Position},
    color::Color,
    field::Field,
    piece::Piece,
};

/// Creates new pieces at a fixed spawn coordinate.
///
/// Every spawned piece receives a fresh [`PieceId`]; ids start at 1, leaving
/// [`PieceId::PRESET`] for cells that never belonged to a spawned piece.
#[derive(Debug, Clone)]
pub struct Spawner {
    origin: Position,
    next_id: u64,
}

impl Spawner {
    #[must_use]
    pub const fn new(origin: Position) -> Self {
        Self { origin, next_id: 1 }
    }

    /// Returns the coordinate the topmost row of every template lands on.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Spawns the shape bound to `color`.
    ///
    /// Returns `None` if any of the four cells would be out of bounds or
    /// occupied. Nothing is written to the field either way.
    ///
    /// # Example
    ///
    /// ```
    /// use stackfall_engine::{Color, Field, Position, Shape, Spawner};
    ///
    /// let field = Field::new(10, 20);
    /// let mut spawner = Spawner::new(Position::new(5, 0));
    /// let piece = spawner.spawn(Color::Cyan, &field).unwrap();
    ///
    /// assert_eq!(piece.shape(), Shape::I);
    /// assert!(piece.is_straight());
    /// assert_eq!(field.occupied_count(), 0);
    /// ```
    pub fn spawn(&mut self, color: Color, field: &Field) -> Option<Piece> {
        let shape = color.shape();
        let id = PieceId::new(self.next_id);
        match Piece::try_new(id, shape, color, self.origin, field) {
            Ok(piece) => {
                self.next_id += 1;
                debug!(%id, ?shape, origin = %self.origin, "spawned piece");
                Some(piece)
            }
            Err(rejection) => {
                debug!(?shape, origin = %self.origin, %rejection, "spawn blocked");
                None
            }
        }
    }
}
