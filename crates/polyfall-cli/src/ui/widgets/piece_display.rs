use polyfall_engine::Piece;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{BlockDisplay, cells};

/// Preview box for a single piece, drawn normalized and centered.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<&'a Piece>,
    box_blocks: u16,
    block_size: u16,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    /// Creates an empty preview `box_blocks` blocks on each side.
    pub fn new(box_blocks: usize) -> Self {
        Self {
            piece: None,
            box_blocks: cells(box_blocks),
            block_size: 1,
            block: None,
        }
    }

    pub fn piece(self, piece: Option<&'a Piece>) -> Self {
        Self { piece, ..self }
    }

    pub fn block_size(self, block_size: u16) -> Self {
        Self {
            block_size: block_size.max(1),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.box_blocks
            .saturating_mul(BlockDisplay::WIDTH)
            .saturating_mul(self.block_size)
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        self.box_blocks
            .saturating_mul(BlockDisplay::HEIGHT)
            .saturating_mul(self.block_size)
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        BlockDisplay::empty(false).render(area, buf);

        let Some(piece) = self.piece else {
            return;
        };
        let (min_x, min_y, max_x, max_y) = piece.shape_bounds();
        let piece_width = u16::try_from(max_x - min_x + 1).unwrap_or(0);
        let piece_height = u16::try_from(max_y - min_y + 1).unwrap_or(0);
        let piece_area = area.centered(
            Constraint::Length(
                piece_width
                    .saturating_mul(BlockDisplay::WIDTH)
                    .saturating_mul(self.block_size),
            ),
            Constraint::Length(
                piece_height
                    .saturating_mul(BlockDisplay::HEIGHT)
                    .saturating_mul(self.block_size),
            ),
        );

        let display = BlockDisplay::filled(piece.color());
        for &(x, y) in piece.shape() {
            let (Ok(col), Ok(row)) = (u16::try_from(x - min_x), u16::try_from(y - min_y)) else {
                continue;
            };
            display.render(
                BlockDisplay::cell_area(piece_area, self.block_size, col, row),
                buf,
            );
        }
    }
}
