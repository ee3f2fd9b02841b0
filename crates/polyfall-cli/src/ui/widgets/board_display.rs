use polyfall_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{BlockDisplay, cells};

/// The board with the ghost and the active piece drawn over it.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<&'a Piece>,
    current: Option<&'a Piece>,
    block_size: u16,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            current: None,
            block_size: 1,
            block: None,
        }
    }

    pub fn ghost(self, piece: &'a Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn current(self, piece: &'a Piece) -> Self {
        Self {
            current: Some(piece),
            ..self
        }
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
        cells(self.board.width())
            .saturating_mul(BlockDisplay::WIDTH)
            .saturating_mul(self.block_size)
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        cells(self.board.height())
            .saturating_mul(BlockDisplay::HEIGHT)
            .saturating_mul(self.block_size)
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    fn render_piece(&self, piece: &Piece, display: BlockDisplay, area: Rect, buf: &mut Buffer) {
        for (x, y) in piece.positions() {
            let (Ok(col), Ok(row)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            if usize::from(col) >= self.board.width() || usize::from(row) >= self.board.height() {
                continue;
            }
            display.render(BlockDisplay::cell_area(area, self.block_size, col, row), buf);
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (y, row) in (0..=u16::MAX).zip(self.board.rows()) {
            for (x, block) in (0..=u16::MAX).zip(row) {
                let cell = BlockDisplay::cell_area(area, self.block_size, x, y);
                BlockDisplay::from_block(*block, true).render(cell, buf);
            }
        }
        if let Some(ghost) = self.ghost {
            self.render_piece(ghost, BlockDisplay::ghost(), area, buf);
        }
        if let Some(current) = self.current {
            self.render_piece(current, BlockDisplay::filled(current.color()), area, buf);
        }
    }
}
