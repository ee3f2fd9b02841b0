use polyfall_engine::{Block, PieceColor};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Clear, Paragraph, Widget},
};

use crate::ui::widgets::style;

/// One board cell, drawn as a `WIDTH` x `HEIGHT` patch of terminal cells per
/// unit of block size.
#[derive(Debug, Clone, Copy)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn empty(show_dots: bool) -> Self {
        if show_dots {
            Self::new(style::EMPTY_DOT, ".")
        } else {
            Self::new(style::EMPTY, "")
        }
    }

    pub const fn ghost() -> Self {
        Self::new(style::GHOST, "[]")
    }

    pub const fn filled(color: PieceColor) -> Self {
        Self::new(style::piece(color), "")
    }

    pub const fn from_block(block: Block, show_dots: bool) -> Self {
        match block {
            Block::Empty => Self::empty(show_dots),
            Block::Fixed { color, .. } => Self::filled(color),
        }
    }

    /// Area of the block at grid position `(x, y)` inside `area`, clipped to it.
    pub fn cell_area(area: Rect, block_size: u16, x: u16, y: u16) -> Rect {
        let width = Self::WIDTH.saturating_mul(block_size);
        let height = Self::HEIGHT.saturating_mul(block_size);
        let cell = Rect::new(
            area.x.saturating_add(x.saturating_mul(width)),
            area.y.saturating_add(y.saturating_mul(height)),
            width,
            height,
        );
        cell.intersection(area)
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        if area.is_empty() {
            return;
        }
        // Overlays replace whatever was drawn below; Paragraph then styles the
        // whole area, not just the cells under the symbol.
        Clear.render(area, buf);
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_area_scales_with_block_size() {
        let area = Rect::new(1, 1, 40, 20);
        assert_eq!(BlockDisplay::cell_area(area, 1, 0, 0), Rect::new(1, 1, 2, 1));
        assert_eq!(BlockDisplay::cell_area(area, 1, 3, 2), Rect::new(7, 3, 2, 1));
        assert_eq!(BlockDisplay::cell_area(area, 2, 3, 2), Rect::new(13, 5, 4, 2));
    }

    #[test]
    fn test_cell_area_is_clipped() {
        let area = Rect::new(0, 0, 5, 1);
        assert_eq!(BlockDisplay::cell_area(area, 1, 2, 0), Rect::new(4, 0, 1, 1));
        assert!(BlockDisplay::cell_area(area, 1, 0, 3).is_empty());
    }
}
