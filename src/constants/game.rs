use std::time::Duration;

use super::{BOARD_HEIGHT, BOARD_WIDTH};

pub const BIRD_X: i32 = BOARD_WIDTH / 8;
pub const BIRD_Y: i32 = BOARD_HEIGHT / 2;
pub const BIRD_WIDTH: i32 = 34;
pub const BIRD_HEIGHT: i32 = 24;

pub const PIPE_X: i32 = BOARD_WIDTH;
pub const PIPE_Y: i32 = 0;
pub const PIPE_WIDTH: i32 = 64;
pub const PIPE_HEIGHT: i32 = 512;
/// Vertical gap between the top and bottom pipe of a pair.
pub const OPENING_SPACE: i32 = BOARD_HEIGHT / 4;

/// Added to the bird's vertical velocity every tick.
pub const GRAVITY: i32 = 1;
/// Vertical velocity set (not added) by a jump.
pub const JUMP_VELOCITY: i32 = -9;
/// Horizontal pipe velocity per tick.
pub const PIPE_VELOCITY: i32 = -4;

/// Score is counted in halves: every pipe is worth one half.
pub const HALF_POINTS_PER_PIPE: u32 = 1;

pub const TICK_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 60);
pub const SPAWN_PERIOD: Duration = Duration::from_millis(1500);

const _: () = assert!(OPENING_SPACE > 0);
const _: () = assert!(PIPE_HEIGHT > 0 && PIPE_HEIGHT % 4 == 0);
const _: () = assert!(BIRD_WIDTH > 0 && BIRD_HEIGHT > 0 && PIPE_WIDTH > 0);
const _: () = assert!(PIPE_VELOCITY < 0 && GRAVITY > 0 && JUMP_VELOCITY < 0);
const _: () = assert!(!TICK_PERIOD.is_zero() && !SPAWN_PERIOD.is_zero());
