use std::fmt;

use arrayvec::ArrayVec;

/// Largest cell count a piece family may use (hexominoes).
pub const MAX_PIECE_CELLS: usize = 6;

/// A polyomino at a specific position and orientation.
///
/// Pieces are immutable values: every transform returns a new `Piece` and leaves
/// `self` untouched. Because the shape is stored inline, a transformed copy never
/// shares cells with the piece it came from.
///
/// # Coordinate System
///
/// - `origin` is the piece's position on the board; x grows rightward, y downward
/// - `shape` holds the cell offsets relative to `origin`
/// - `rotation_center` is the pivot, in the same frame as `shape`, and may sit
///   between cells
///
/// # Example
///
/// ```
/// use polyfall_engine::{PieceFactory, PieceFamily, PieceKind};
///
/// let factory = PieceFactory::new(&PieceFamily::TETROMINO);
/// let piece = factory.create(PieceKind::T).unwrap();
/// let moved = piece.moved_by(1, 2);
/// assert_eq!(moved.origin().x(), piece.origin().x() + 1);
///
/// let back = piece.rotated_right().rotated_left();
/// assert_eq!(back.shape(), piece.shape());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: ArrayVec<(i32, i32), MAX_PIECE_CELLS>,
    color: PieceColor,
    rotation_center: RotationCenter,
    origin: PiecePosition,
}

impl Piece {
    /// Builds a piece from raw parts.
    ///
    /// # Panics
    ///
    /// Panics if `shape` has more than [`MAX_PIECE_CELLS`] cells.
    #[must_use]
    pub fn new(
        kind: PieceKind,
        shape: &[(i32, i32)],
        color: PieceColor,
        rotation_center: RotationCenter,
        origin: PiecePosition,
    ) -> Self {
        assert!(
            shape.len() <= MAX_PIECE_CELLS,
            "piece {kind} has {} cells, at most {MAX_PIECE_CELLS} are supported",
            shape.len()
        );
        Self {
            kind,
            shape: shape.iter().copied().collect(),
            color,
            rotation_center,
            origin,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> PieceColor {
        self.color
    }

    #[must_use]
    pub fn rotation_center(&self) -> RotationCenter {
        self.rotation_center
    }

    #[must_use]
    pub fn origin(&self) -> PiecePosition {
        self.origin
    }

    /// Cell offsets relative to [`Self::origin`].
    #[must_use]
    pub fn shape(&self) -> &[(i32, i32)] {
        &self.shape
    }

    /// Absolute board cells covered by this piece.
    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .iter()
            .map(move |&(dx, dy)| (self.origin.x + dx, self.origin.y + dy))
    }

    /// Smallest rectangle containing the shape, as `(min_x, min_y, max_x, max_y)`
    /// offsets. Used to lay out previews.
    #[must_use]
    pub fn shape_bounds(&self) -> (i32, i32, i32, i32) {
        self.shape.iter().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }

    #[must_use]
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        self.moved_to(PiecePosition::new(self.origin.x + dx, self.origin.y + dy))
    }

    #[must_use]
    pub fn moved_to(&self, origin: PiecePosition) -> Self {
        Self {
            origin,
            ..self.clone()
        }
    }

    /// Rotates the shape 90° clockwise about the rotation center.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        let center = self.rotation_center;
        Self {
            shape: self.shape.iter().map(|&c| center.rotate_right(c)).collect(),
            ..self.clone()
        }
    }

    /// Rotates the shape 90° counter-clockwise about the rotation center.
    #[must_use]
    pub fn rotated_left(&self) -> Self {
        let center = self.rotation_center;
        Self {
            shape: self.shape.iter().map(|&c| center.rotate_left(c)).collect(),
            ..self.clone()
        }
    }
}

/// Position of a piece's origin on the board.
///
/// Unlike board cells, positions are signed: a piece may hang above the top row
/// or be probed past either wall before the board rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

/// Pivot a shape rotates about.
///
/// Stored as doubled coordinates so half-cell pivots stay exact. The pivot must
/// satisfy `cx + cy ∈ ℤ`, otherwise a quarter turn would move cells off the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationCenter {
    x2: i32,
    y2: i32,
}

impl RotationCenter {
    /// Pivot at `(x2 / 2, y2 / 2)`.
    ///
    /// # Panics
    ///
    /// Panics if `x2 + y2` is odd.
    #[must_use]
    pub const fn from_halves(x2: i32, y2: i32) -> Self {
        assert!(
            (x2 + y2) % 2 == 0,
            "rotation center would move cells off the grid"
        );
        Self { x2, y2 }
    }

    /// Pivot on the center of cell `(x, y)`.
    #[must_use]
    pub const fn cell(x: i32, y: i32) -> Self {
        Self::from_halves(2 * x, 2 * y)
    }

    #[must_use]
    pub fn x(self) -> f64 {
        f64::from(self.x2) / 2.0
    }

    #[must_use]
    pub fn y(self) -> f64 {
        f64::from(self.y2) / 2.0
    }

    // (x, y) -> (cx - (y - cy), cy + (x - cx))
    fn rotate_right(self, (x, y): (i32, i32)) -> (i32, i32) {
        ((self.x2 + self.y2) / 2 - y, (self.y2 - self.x2) / 2 + x)
    }

    // (x, y) -> (cx + (y - cy), cy - (x - cx))
    fn rotate_left(self, (x, y): (i32, i32)) -> (i32, i32) {
        ((self.x2 - self.y2) / 2 + y, (self.x2 + self.y2) / 2 - x)
    }
}

/// Identifier of a piece type within its family.
///
/// Kinds are single characters. The associated constants cover the built-in
/// families; any other character is a valid but unregistered kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceKind(char);

impl PieceKind {
    pub const I: Self = Self('I');
    pub const O: Self = Self('O');
    pub const T: Self = Self('T');
    pub const S: Self = Self('S');
    pub const Z: Self = Self('Z');
    pub const J: Self = Self('J');
    pub const L: Self = Self('L');
    pub const F: Self = Self('F');
    pub const N: Self = Self('N');
    pub const P: Self = Self('P');
    pub const U: Self = Self('U');
    pub const V: Self = Self('V');
    pub const W: Self = Self('W');
    pub const X: Self = Self('X');
    pub const Y: Self = Self('Y');

    /// Returns the kind named by `c`.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), PieceKind::T);
    /// assert_eq!(PieceKind::from_char('T').as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Self {
        Self(c)
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display color of a piece. Opaque to the game rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PieceColor {
    #[display("cyan")]
    Cyan,
    #[display("yellow")]
    Yellow,
    #[display("purple")]
    Purple,
    #[display("green")]
    Green,
    #[display("red")]
    Red,
    #[display("blue")]
    Blue,
    #[display("orange")]
    Orange,
    #[display("pink")]
    Pink,
    #[display("brown")]
    Brown,
    #[display("lime")]
    Lime,
    #[display("navy")]
    Navy,
    #[display("teal")]
    Teal,
}
