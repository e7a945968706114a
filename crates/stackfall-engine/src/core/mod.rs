pub use self::{cell::*, color::*, field::*, piece::*, shape::*};

pub(crate) mod cell;
pub(crate) mod color;
pub(crate) mod field;
pub(crate) mod piece;
pub(crate) mod shape;
