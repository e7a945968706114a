use std::fmt;

use crate::Rejection;

use super::{
    cell::{Cell, PieceId, Position},
    color::Color,
    piece::Piece,
};

/// The playing field: a flat, row-major map from coordinate to occupant.
///
/// The field is the single source of truth for occupancy. A coordinate holds a
/// [`Cell`] if and only if it is occupied, and the stored cell's own position
/// always equals the coordinate it is stored at.
///
/// # Footprint Protocol
///
/// A falling piece is registered in the field like any landed cell. Before a
/// piece is moved its footprint is removed with [`Self::remove_piece`], the
/// move is validated against what remains, and the (new or unchanged) cells are
/// registered again with [`Self::place_piece`].
///
/// # Example
///
/// ```
/// use stackfall_engine::Field;
///
/// let mut field = Field::from_ascii(
///     "
///     ....
///     x.x.
///     xxxx
///     ",
/// );
/// assert_eq!(field.clear_lines(), 1);
/// assert_eq!(field.to_string(), "....\n....\nx.x.\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
}

impl Field {
    /// Creates an empty field.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Returns the occupant at `position`, `None` if empty or outside the field.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.index(position)
            .and_then(|index| self.cells[index].as_ref())
    }

    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.get(position).is_some()
    }

    /// Checks whether a cell of `piece` may stand at `position`.
    ///
    /// The coordinate must be inside the field and either empty or held by a cell
    /// of the same piece.
    pub fn check_vacant(&self, position: Position, piece: PieceId) -> Result<(), Rejection> {
        let index = self.index(position).ok_or(Rejection::OutOfBounds)?;
        match &self.cells[index] {
            Some(occupant) if occupant.piece() != piece => Err(Rejection::Occupied),
            _ => Ok(()),
        }
    }

    /// Registers `cell` at its own coordinate.
    ///
    /// Cells outside the field are ignored; callers only place validated cells.
    /// The coordinate must be empty or held by a cell of the same piece.
    pub fn place(&mut self, cell: &Cell) {
        debug_assert!(self.contains(cell.position()), "placing {cell:?}");
        debug_assert!(
            self.get(cell.position())
                .is_none_or(|occupant| occupant.piece() == cell.piece()),
            "placing {cell:?} over a cell of another piece"
        );
        if let Some(index) = self.index(cell.position()) {
            self.cells[index] = Some(*cell);
        }
    }

    /// Empties the coordinate `cell` stands on.
    pub fn clear_footprint(&mut self, cell: &Cell) {
        if let Some(index) = self.index(cell.position()) {
            self.cells[index] = None;
        }
    }

    pub fn place_piece(&mut self, piece: &Piece) {
        for cell in piece.cells() {
            self.place(cell);
        }
    }

    pub fn remove_piece(&mut self, piece: &Piece) {
        for cell in piece.cells() {
            self.clear_footprint(cell);
        }
    }

    /// Returns an iterator over all occupants, top row first.
    pub fn occupied_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().flatten()
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied_cells().count()
    }

    /// Returns an iterator over the rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Cell>]> + '_ {
        self.cells.chunks(self.width.max(1))
    }

    /// Checks whether every column of row `y` is occupied.
    #[must_use]
    pub fn is_row_solid(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        self.cells[y * self.width..][..self.width]
            .iter()
            .all(Option::is_some)
    }

    /// Clears solid rows and returns the number of rows cleared.
    ///
    /// Rows are scanned bottom to top. For each solid row, every cell above it
    /// drops exactly one row, and the same row index is examined again since new
    /// content has shifted into it.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            if !self.is_row_solid(y - 1) {
                y -= 1;
                continue;
            }

            let start = (y - 1) * self.width;
            self.cells[start..][..self.width].fill(None);

            // Walk upward from the row just above the cleared one, so the
            // destination slot below each cell is always vacant already.
            for index in (0..start).rev() {
                if let Some(mut cell) = self.cells[index].take() {
                    cell.shift_down();
                    self.cells[index + self.width] = Some(cell);
                }
            }
            cleared += 1;
        }
        cleared
    }

    /// Returns the field with color glyphs instead of `x`, one line per row.
    #[must_use]
    pub fn to_color_string(&self) -> String {
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            s.extend(
                row.iter()
                    .map(|cell| cell.map_or('.', |cell| cell.color().as_char())),
            );
            s.push('\n');
        }
        s
    }

    /// Creates a field from ASCII art, top row first.
    ///
    /// `.` is empty, `x` or `#` is a red cell, and a color glyph
    /// (see [`Color::as_char`]) is a cell of that color. Blank lines and
    /// surrounding whitespace are ignored. All cells belong to
    /// [`PieceId::PRESET`].
    ///
    /// # Panics
    ///
    /// Panics on an unknown character or rows of different widths.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.first().map_or(0, |line| line.chars().count());
        let mut field = Self::new(width, lines.len());

        for (y, line) in (0..).zip(&lines) {
            assert_eq!(
                line.chars().count(),
                width,
                "Each row must have exactly {width} cells, got {line:?} at row {y}"
            );
            for (x, ch) in (0..).zip(line.chars()) {
                let color = match ch {
                    '.' => continue,
                    'x' | '#' => Color::Red,
                    _ => Color::from_char(ch)
                        .unwrap_or_else(|| panic!("unknown cell {ch:?} at ({x}, {y})")),
                };
                field.place(&Cell::new(Position::new(x, y), color, PieceId::PRESET));
            }
        }
        field
    }
}

/// Debug dump: `.` for empty, `x` for occupied, one line per row.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                f.write_str(if cell.is_some() { "x" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only view of the field for a renderer.
///
/// Unlike [`Field`] it also knows which piece is currently falling.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    field: &'a Field,
    falling: Option<PieceId>,
}

/// What a renderer needs to know about one occupied coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub color: Color,
    pub falling: bool,
}

impl<'a> FieldView<'a> {
    #[must_use]
    pub const fn new(field: &'a Field, falling: Option<PieceId>) -> Self {
        Self { field, falling }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.field.width()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.field.height()
    }

    #[must_use]
    pub fn cell(&self, position: Position) -> Option<CellView> {
        self.field.get(position).map(|cell| self.describe(cell))
    }

    /// Returns an iterator over the rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Option<CellView>> + 'a> + 'a {
        let view = *self;
        self.field
            .rows()
            .map(move |row| row.iter().map(move |cell| cell.map(|cell| view.describe(&cell))))
    }

    fn describe(&self, cell: &Cell) -> CellView {
        CellView {
            color: cell.color(),
            falling: self.falling == Some(cell.piece()),
        }
    }
}
