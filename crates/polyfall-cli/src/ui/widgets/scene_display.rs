use polyfall_engine::{GameManager, Playfield, Scene};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Color,
    text::{Line, Text},
    widgets::{Block, Clear, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, style};

/// Draws whatever the game manager's current scene shows.
#[derive(Debug)]
pub struct SceneDisplay<'a> {
    manager: &'a GameManager,
}

impl<'a> SceneDisplay<'a> {
    pub fn new(manager: &'a GameManager) -> Self {
        Self { manager }
    }

    fn block_size(&self) -> u16 {
        u16::try_from(self.manager.block_size()).unwrap_or(u16::MAX)
    }
}

impl Widget for SceneDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SceneDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        match self.manager.scene() {
            Scene::Menu => render_menu(area, buf),
            Scene::Play(field) => {
                render_playfield(&field, self.block_size(), style::PLAY_BORDER, area, buf);
            }
            Scene::GameOver(field) => {
                let board_area =
                    render_playfield(&field, self.block_size(), style::GAME_OVER_BORDER, area, buf);
                render_popup("GAME OVER!!", board_area, buf);
            }
        }
    }
}

fn render_menu(area: Rect, buf: &mut Buffer) {
    let text = Text::from(vec![
        Line::from("P O L Y F A L L").style(style::TITLE),
        Line::from(""),
        Line::from("Press Enter to start"),
    ])
    .style(style::DEFAULT)
    .centered();
    let area = area.centered(Constraint::Length(30), Constraint::Length(5));
    let block = Block::bordered().style(style::DEFAULT);
    let inner = block.inner(area);
    Clear.render(area, buf);
    block.render(area, buf);
    text.render(inner.centered_vertically(Constraint::Length(3)), buf);
}

/// Lays out the board with the NEXT and HOLD previews to its right.
///
/// Returns the board's area.
fn render_playfield(
    field: &Playfield<'_>,
    block_size: u16,
    border: Color,
    area: Rect,
    buf: &mut Buffer,
) -> Rect {
    let panel = |title: &'static str| {
        Block::bordered()
            .title(Line::from(title).centered())
            .border_style(border)
            .style(style::DEFAULT)
    };

    let board = BoardDisplay::new(field.board)
        .ghost(field.ghost)
        .current(field.current)
        .block_size(block_size)
        .block(Block::bordered().border_style(border).style(style::DEFAULT));
    // Every piece of a family has the same cell count, which bounds its extent.
    let box_blocks = field.next.shape().len();
    let next = PieceDisplay::new(box_blocks)
        .piece(Some(field.next))
        .block_size(block_size)
        .block(panel("NEXT"));
    let hold = PieceDisplay::new(box_blocks)
        .piece(field.hold)
        .block_size(block_size)
        .block(panel("HOLD"));

    let [board_column, side_column] = Layout::horizontal([
        Constraint::Length(board.width()),
        Constraint::Length(next.width()),
    ])
    .flex(Flex::Center)
    .areas(area);
    let [board_area] =
        Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
    let [next_area, hold_area] = Layout::vertical([
        Constraint::Length(next.height()),
        Constraint::Length(hold.height()),
    ])
    .areas(side_column);

    board.render(board_area, buf);
    next.render(next_area, buf);
    hold.render(hold_area, buf);
    board_area
}

fn render_popup(text: &str, board_area: Rect, buf: &mut Buffer) {
    let block = Block::new().style(style::GAME_OVER);
    let text = Text::styled(text, style::GAME_OVER).centered();
    let area = board_area.centered(Constraint::Length(board_area.width), Constraint::Length(3));
    let inner = block.inner(area);
    Clear.render(area, buf);
    block.render(area, buf);
    text.render(inner.centered_vertically(Constraint::Length(1)), buf);
}
