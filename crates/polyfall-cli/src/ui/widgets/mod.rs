use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{block_display::*, board_display::*, piece_display::*, scene_display::*};

mod block_display;
mod board_display;
mod piece_display;
mod scene_display;

mod color {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const PURPLE: Color = Color::Rgb(160, 32, 240);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 165, 0);
    pub const PINK: Color = Color::Rgb(255, 105, 180);
    pub const BROWN: Color = Color::Rgb(139, 69, 19);
    pub const LIME: Color = Color::Rgb(191, 255, 0);
    pub const NAVY: Color = Color::Rgb(0, 0, 128);
    pub const TEAL: Color = Color::Rgb(0, 128, 128);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use polyfall_engine::PieceColor;
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);
    pub const TITLE: Style = fg_bg(color::CYAN, color::BLACK);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);

    pub const PLAY_BORDER: Color = color::WHITE;
    pub const GAME_OVER_BORDER: Color = color::RED;

    #[must_use]
    pub const fn piece(color: PieceColor) -> Style {
        bg_only(match color {
            PieceColor::Cyan => color::CYAN,
            PieceColor::Yellow => color::YELLOW,
            PieceColor::Purple => color::PURPLE,
            PieceColor::Green => color::GREEN,
            PieceColor::Red => color::RED,
            PieceColor::Blue => color::BLUE,
            PieceColor::Orange => color::ORANGE,
            PieceColor::Pink => color::PINK,
            PieceColor::Brown => color::BROWN,
            PieceColor::Lime => color::LIME,
            PieceColor::Navy => color::NAVY,
            PieceColor::Teal => color::TEAL,
        })
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

/// Saturating conversion for grid sizes.
fn cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
