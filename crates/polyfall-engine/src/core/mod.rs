pub use self::{board::*, family::*, piece::*};

pub(crate) mod board;
pub(crate) mod family;
pub(crate) mod piece;
