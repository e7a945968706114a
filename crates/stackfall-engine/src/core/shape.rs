use serde::{Deserialize, Serialize};

/// The seven piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Shape {
    /// Straight piece, rotated by the two-orientation toggle.
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

impl Shape {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Shape::I,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    #[must_use]
    pub const fn is_straight(self) -> bool {
        matches!(self, Shape::I)
    }

    /// Cell offsets from the spawn coordinate, pivot first.
    ///
    /// The topmost cells sit on the spawn row (`dy == 0`) and no cell is above it.
    #[must_use]
    pub const fn offsets(self) -> &'static [(i32, i32); 4] {
        &TEMPLATES[self as usize]
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Shape::I => 'I',
            Shape::J => 'J',
            Shape::L => 'L',
            Shape::O => 'O',
            Shape::S => 'S',
            Shape::T => 'T',
            Shape::Z => 'Z',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Shape::I),
            'J' => Some(Shape::J),
            'L' => Some(Shape::L),
            'O' => Some(Shape::O),
            'S' => Some(Shape::S),
            'T' => Some(Shape::T),
            'Z' => Some(Shape::Z),
            _ => None,
        }
    }
}

// Index 0 is the rotation pivot. Non-straight shapes keep every other cell
// within one step of the pivot so the corner/edge rotation rule is a true
// quarter turn.
const TEMPLATES: [[(i32, i32); 4]; Shape::LEN] = [
    // I: ####, pivot second from the left
    [(0, 0), (-1, 0), (1, 0), (2, 0)],
    // J: #..
    //    ###
    [(0, 1), (-1, 0), (-1, 1), (1, 1)],
    // L: ..#
    //    ###
    [(0, 1), (1, 0), (-1, 1), (1, 1)],
    // O: ##
    //    ##
    [(0, 0), (1, 0), (0, 1), (1, 1)],
    // S: .##
    //    ##.
    [(0, 0), (1, 0), (-1, 1), (0, 1)],
    // T: .#.
    //    ###
    [(0, 1), (0, 0), (-1, 1), (1, 1)],
    // Z: ##.
    //    .##
    [(0, 0), (-1, 0), (0, 1), (1, 1)],
];
