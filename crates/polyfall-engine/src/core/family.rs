use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceColor, PieceKind, PiecePosition, RotationCenter};

/// Registered definition of one piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceTemplate {
    pub kind: PieceKind,
    pub shape: &'static [(i32, i32)],
    pub color: PieceColor,
    pub rotation_center: RotationCenter,
}

impl PieceTemplate {
    /// Instantiates the template at `origin`.
    #[must_use]
    pub fn instantiate(&self, origin: PiecePosition) -> Piece {
        Piece::new(
            self.kind,
            self.shape,
            self.color,
            self.rotation_center,
            origin,
        )
    }
}

/// A family of pieces sharing a cell count, e.g. the seven tetrominoes.
///
/// The family is the registry the factory builds pieces from: each kind maps to
/// its shape, color and rotation center, and every piece of the family spawns at
/// the same position.
///
/// # Example
///
/// ```
/// use polyfall_engine::{PieceFamily, PieceKind};
///
/// let family = &PieceFamily::TETROMINO;
/// assert_eq!(family.len(), 7);
/// assert_eq!(family.cell_count(), 4);
/// assert!(family.template(PieceKind::T).is_some());
/// assert!(family.template(PieceKind::X).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceFamily {
    name: &'static str,
    cell_count: usize,
    spawn_position: PiecePosition,
    templates: &'static [PieceTemplate],
}

impl PieceFamily {
    pub const TETROMINO: Self = Self {
        name: "tetromino",
        cell_count: 4,
        spawn_position: PiecePosition::new(4, 0),
        templates: &TETROMINO_TEMPLATES,
    };

    pub const PENTOMINO: Self = Self {
        name: "pentomino",
        cell_count: 5,
        spawn_position: PiecePosition::new(3, 0),
        templates: &PENTOMINO_TEMPLATES,
    };

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of cells every piece of this family occupies.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cell_count
    }

    #[must_use]
    pub const fn spawn_position(&self) -> PiecePosition {
        self.spawn_position
    }

    /// Number of registered kinds.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    #[must_use]
    pub const fn templates(&self) -> &'static [PieceTemplate] {
        self.templates
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.templates.iter().map(|t| t.kind)
    }

    #[must_use]
    pub fn template(&self, kind: PieceKind) -> Option<&'static PieceTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }
}

/// Built-in family selector, as it appears in configuration files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    #[default]
    Tetromino,
    Pentomino,
}

impl FamilyKind {
    #[must_use]
    pub fn family(self) -> &'static PieceFamily {
        match self {
            FamilyKind::Tetromino => &PieceFamily::TETROMINO,
            FamilyKind::Pentomino => &PieceFamily::PENTOMINO,
        }
    }
}

const fn template(
    kind: PieceKind,
    shape: &'static [(i32, i32)],
    color: PieceColor,
    rotation_center: RotationCenter,
) -> PieceTemplate {
    PieceTemplate {
        kind,
        shape,
        color,
        rotation_center,
    }
}

// Half-cell pivots keep the I and O pieces centered while turning.
const TETROMINO_TEMPLATES: [PieceTemplate; 7] = {
    use PieceColor::{Blue, Cyan, Green, Orange, Purple, Red, Yellow};
    const C11: RotationCenter = RotationCenter::cell(1, 1);
    [
        template(
            PieceKind::I,
            &[(0, 0), (1, 0), (2, 0), (3, 0)],
            Cyan,
            RotationCenter::from_halves(3, 1),
        ),
        template(
            PieceKind::O,
            &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Yellow,
            RotationCenter::from_halves(1, 1),
        ),
        template(PieceKind::T, &[(1, 0), (0, 1), (1, 1), (2, 1)], Purple, C11),
        template(PieceKind::S, &[(1, 0), (2, 0), (0, 1), (1, 1)], Green, C11),
        template(PieceKind::Z, &[(0, 0), (1, 0), (1, 1), (2, 1)], Red, C11),
        template(PieceKind::J, &[(0, 0), (0, 1), (1, 1), (2, 1)], Blue, C11),
        template(PieceKind::L, &[(2, 0), (0, 1), (1, 1), (2, 1)], Orange, C11),
    ]
};

const PENTOMINO_TEMPLATES: [PieceTemplate; 12] = {
    use PieceColor::{
        Blue, Brown, Cyan, Green, Lime, Navy, Orange, Pink, Purple, Red, Teal, Yellow,
    };
    const C11: RotationCenter = RotationCenter::cell(1, 1);
    const BAR: RotationCenter = RotationCenter::from_halves(3, 1);
    [
        template(PieceKind::F, &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)], Red, C11),
        template(
            PieceKind::I,
            &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
            Cyan,
            RotationCenter::cell(2, 0),
        ),
        template(PieceKind::L, &[(3, 0), (0, 1), (1, 1), (2, 1), (3, 1)], Orange, BAR),
        template(PieceKind::N, &[(0, 0), (1, 0), (1, 1), (2, 1), (3, 1)], Brown, BAR),
        template(PieceKind::P, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)], Pink, C11),
        template(PieceKind::T, &[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)], Purple, C11),
        template(PieceKind::U, &[(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)], Yellow, C11),
        template(PieceKind::V, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)], Blue, C11),
        template(PieceKind::W, &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)], Green, C11),
        template(PieceKind::X, &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)], Lime, C11),
        template(PieceKind::Y, &[(1, 0), (0, 1), (1, 1), (2, 1), (3, 1)], Navy, BAR),
        template(PieceKind::Z, &[(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)], Teal, C11),
    ]
};
