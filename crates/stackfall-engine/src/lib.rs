//! Falling-piece simulation core for a grid stacking puzzle.
//!
//! The crate is split the same way the game is played:
//!
//! - [`core`] holds the passive data: [`Cell`], [`Piece`], [`Shape`], [`Color`]
//!   and the [`Field`] occupancy map with its line-clear algorithm.
//! - [`engine`] orchestrates them: [`Spawner`] creates pieces, [`Session`]
//!   processes one [`Action`] per tick and keeps score.
//!
//! # Example
//!
//! ```
//! use stackfall_engine::{Action, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default()).unwrap();
//! session.tick(Action::MoveLeft).unwrap();
//! session.tick(Action::RotateCw).unwrap();
//! let report = session.tick(Action::HardDrop).unwrap();
//!
//! assert!(report.landed);
//! assert!(session.is_running());
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Why the field refused to accept a cell at a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum Rejection {
    #[display("coordinate outside the field")]
    OutOfBounds,
    #[display("coordinate occupied by another piece")]
    Occupied,
}

/// A rejected translation of a piece.
///
/// `landed` is set when a downward step was blocked, which ends the piece's fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("move rejected: {rejection}")]
pub struct MoveRejected {
    pub rejection: Rejection,
    pub landed: bool,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
    #[display("no room to spawn a piece after holding")]
    SpawnCollision,
    #[display("held piece colliding when moved back to spawn")]
    RecenterCollision(MoveRejected),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("session is over, no further ticks are accepted")]
pub struct SessionOverError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("field must be at least 1x1, got {width}x{height}")]
    EmptyField { width: usize, height: usize },
    #[display("field of {width}x{height} is too large")]
    FieldTooLarge { width: usize, height: usize },
    #[display("spawn position {position} lies outside the field")]
    SpawnOutOfBounds { position: Position },
    #[display("{shape:?} piece does not fit the field when spawned at {position}")]
    TemplateOutOfBounds { shape: Shape, position: Position },
    #[display("field is {actual_width}x{actual_height}, expected {width}x{height}")]
    FieldMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown action `{input}`")]
pub struct ParseActionError {
    pub input: String,
}
