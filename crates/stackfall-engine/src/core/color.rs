use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Color tag carried by every cell of a piece.
///
/// Each color is bound to one shape (the conventional guideline pairing), so
/// the color sequence also decides which piece comes next.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Color {
    #[display("cyan")]
    Cyan = 0,
    #[display("blue")]
    Blue = 1,
    #[display("orange")]
    Orange = 2,
    #[display("yellow")]
    Yellow = 3,
    #[display("lime")]
    Lime = 4,
    #[display("magenta")]
    Magenta = 5,
    #[display("red")]
    Red = 6,
}

impl Color {
    /// Number of colors (7).
    pub const LEN: usize = 7;

    /// All colors in cycle order.
    pub const ALL: [Self; Self::LEN] = [
        Color::Cyan,
        Color::Blue,
        Color::Orange,
        Color::Yellow,
        Color::Lime,
        Color::Magenta,
        Color::Red,
    ];

    /// Returns the shape spawned with this color.
    #[must_use]
    pub const fn shape(self) -> Shape {
        match self {
            Color::Cyan => Shape::I,
            Color::Blue => Shape::J,
            Color::Orange => Shape::L,
            Color::Yellow => Shape::O,
            Color::Lime => Shape::S,
            Color::Magenta => Shape::T,
            Color::Red => Shape::Z,
        }
    }

    /// Returns the 8-bit RGB value a renderer should use for this tag.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Cyan => (0, 255, 255),
            Color::Blue => (0, 0, 255),
            Color::Orange => (255, 165, 0),
            Color::Yellow => (255, 255, 0),
            Color::Lime => (0, 255, 0),
            Color::Magenta => (255, 0, 255),
            Color::Red => (255, 0, 0),
        }
    }

    /// Returns the single character glyph of this color.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::Color;
    ///
    /// assert_eq!(Color::Cyan.as_char(), 'c');
    /// assert_eq!(Color::Magenta.as_char(), 'm');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Color::Cyan => 'c',
            Color::Blue => 'b',
            Color::Orange => 'o',
            Color::Yellow => 'y',
            Color::Lime => 'l',
            Color::Magenta => 'm',
            Color::Red => 'r',
        }
    }

    /// Parses a color from its glyph.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::Color;
    ///
    /// assert_eq!(Color::from_char('y'), Some(Color::Yellow));
    /// assert_eq!(Color::from_char('x'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Color::Cyan),
            'b' => Some(Color::Blue),
            'o' => Some(Color::Orange),
            'y' => Some(Color::Yellow),
            'l' => Some(Color::Lime),
            'm' => Some(Color::Magenta),
            'r' => Some(Color::Red),
            _ => None,
        }
    }
}

/// Deterministic round-robin over the seven colors.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Color, ColorCycle};
///
/// let mut colors = ColorCycle::new();
/// assert_eq!(colors.peek(), Color::Cyan);
/// assert_eq!(colors.next_color(), Color::Cyan);
/// assert_eq!(colors.next_color(), Color::Blue);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColorCycle {
    index: usize,
}

impl ColorCycle {
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Returns the color the next call to [`Self::next_color`] will yield.
    #[must_use]
    pub const fn peek(&self) -> Color {
        Color::ALL[self.index]
    }

    pub fn next_color(&mut self) -> Color {
        let color = self.peek();
        self.index = (self.index + 1) % Color::LEN;
        color
    }
}

impl Iterator for ColorCycle {
    type Item = Color;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_color())
    }
}
