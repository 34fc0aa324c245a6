pub mod game;

/// Logical play area, in pixels.
pub const BOARD_WIDTH: i32 = 360;
pub const BOARD_HEIGHT: i32 = 640;

pub const TITLE_TEXT: &str = "Flappy Bird";
pub const GAME_OVER_TEXT: &str = "Game Over";
