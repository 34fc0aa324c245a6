use std::{collections::VecDeque, fmt};

use tracing::trace;

use crate::{
    constants::{
        game::{GRAVITY, HALF_POINTS_PER_PIPE, JUMP_VELOCITY, PIPE_VELOCITY},
        BOARD_HEIGHT,
    },
    game::{bird::Bird, object::collides, pipe::Pipe},
};

/// Points are kept in halves so the per-pipe half point stays exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    half_points: u32,
}

impl Score {
    pub fn value(&self) -> f64 {
        f64::from(self.half_points) / 2.0
    }

    /// The score as shown on screen, fraction dropped.
    pub fn whole(&self) -> u32 {
        self.half_points / 2
    }

    fn add_half_points(&mut self, half_points: u32) {
        self.half_points += half_points;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.whole())
    }
}

/// Everything one run mutates. Created once and reset in place on every
/// (re)start.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub bird: Bird,
    pub velocity_y: i32,
    /// Oldest first.
    pub pipes: VecDeque<Pipe>,
    pub score: Score,
    pub game_over: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.bird.reset();
        self.velocity_y = 0;
        self.pipes.clear();
        self.score = Score::default();
        self.game_over = false;
    }

    pub fn jump(&mut self) {
        self.velocity_y = JUMP_VELOCITY;
    }

    /// Advances the run by one tick. Only flags `game_over`; the caller
    /// decides what happens next.
    pub fn step(&mut self) {
        self.velocity_y += GRAVITY;
        self.bird.fall(self.velocity_y);

        for pipe in self.pipes.iter_mut() {
            pipe.move_by(PIPE_VELOCITY);

            if !pipe.passed && self.bird.x > pipe.x + pipe.width {
                pipe.passed = true;
                self.score.add_half_points(HALF_POINTS_PER_PIPE);
                trace!("Passed pipe at x={}, score {}", pipe.x, self.score.value());
            }

            if collides(&self.bird, pipe) {
                self.game_over = true;
            }
        }

        if self.bird.y > BOARD_HEIGHT {
            self.game_over = true;
        }

        self.evict_offscreen();
    }

    /// Drops pipes that were already scored and have scrolled past the left
    /// edge.
    fn evict_offscreen(&mut self) {
        let before = self.pipes.len();
        self.pipes.retain(|pipe| !(pipe.passed && pipe.off_screen()));
        if self.pipes.len() != before {
            trace!("Evicted {} pipes", before - self.pipes.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        constants::game::{BIRD_X, BIRD_Y, PIPE_X},
        game::{pipe::PipeKind, spawner::pipe_pair},
    };

    /// A pipe far below the board so it can never touch the bird.
    fn harmless_pipe(x: i32) -> Pipe {
        Pipe::new(PipeKind::Bottom, x, BOARD_HEIGHT * 4)
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut session = Session::new();
        let mut expected_y = BIRD_Y;
        for k in 1..=10 {
            session.step();
            expected_y += k;
            assert_eq!(session.velocity_y, k);
            assert_eq!(session.bird.y, expected_y);
        }
        assert_eq!(session.bird.y, 320 + 55);
        assert!(!session.game_over);
    }

    #[test]
    fn test_bird_never_above_top() {
        let mut session = Session::new();
        for _ in 0..200 {
            session.jump();
            session.step();
            assert!(session.bird.y >= 0);
        }
        assert_eq!(session.bird.y, 0);
    }

    #[test]
    fn test_jump_sets_velocity() {
        let mut session = Session::new();
        for _ in 0..5 {
            session.step();
        }
        session.jump();
        assert_eq!(session.velocity_y, JUMP_VELOCITY);
        session.step();
        assert_eq!(session.velocity_y, JUMP_VELOCITY + GRAVITY);
    }

    #[test]
    fn test_pipes_scroll_at_constant_speed() {
        let mut session = Session::new();
        let (top, bottom) = pipe_pair(0.5);
        session.pipes.extend([top, bottom]);
        for _ in 0..90 {
            session.step();
        }
        assert_eq!(session.pipes[0].x, PIPE_X - 360);
        assert_eq!(session.pipes[0].x, 0);
        assert_eq!(session.pipes[1].x, 0);
    }

    #[test]
    fn test_passage_uses_strict_trailing_edge() {
        let mut session = Session::new();
        // After one step x = -10, trailing edge 54: 45 > 54 is false.
        session.pipes.push_back(harmless_pipe(-6));
        session.step();
        assert_eq!(session.pipes[0].x, -10);
        assert!(!session.pipes[0].passed);

        // Trailing edge exactly at the bird: 45 > 45 is false.
        session.reset();
        session.pipes.push_back(harmless_pipe(BIRD_X - 64 + 4));
        session.step();
        assert!(!session.pipes[0].passed);

        // Four pixels further: 45 > 41.
        session.step();
        assert!(session.pipes[0].passed);
        assert_eq!(session.score.value(), 0.5);
    }

    #[test]
    fn test_pair_scores_one_point_once() {
        let mut session = Session::new();
        session.pipes.push_back(harmless_pipe(-20));
        session.pipes.push_back(harmless_pipe(-20));
        session.step();
        assert_eq!(session.score.value(), 1.0);
        assert_eq!(session.score.whole(), 1);

        for _ in 0..3 {
            session.step();
        }
        assert_eq!(session.score.value(), 1.0);
    }

    #[test]
    fn test_single_pipe_shows_truncated_score() {
        let mut session = Session::new();
        session.pipes.push_back(harmless_pipe(-20));
        session.step();
        assert_eq!(session.score.value(), 0.5);
        assert_eq!(session.score.to_string(), "0");
    }

    #[test]
    fn test_collision_sets_game_over() {
        let mut session = Session::new();
        session.pipes.push_back(Pipe::new(PipeKind::Top, BIRD_X + 4, BIRD_Y - 100));
        session.step();
        assert!(session.game_over);
    }

    #[test]
    fn test_falling_out_sets_game_over() {
        let mut session = Session::new();
        let mut ticks = 0;
        while !session.game_over {
            session.step();
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!(session.bird.y > BOARD_HEIGHT);
        // 320 + k(k+1)/2 > 640 first holds at k = 25.
        assert_eq!(ticks, 25);
    }

    #[test]
    fn test_game_over_is_sticky_within_a_step() {
        let mut session = Session::new();
        session.pipes.push_back(Pipe::new(PipeKind::Top, BIRD_X + 4, BIRD_Y - 100));
        session.pipes.push_back(harmless_pipe(300));
        session.step();
        assert!(session.game_over);
    }

    #[test]
    fn test_offscreen_passed_pipes_are_evicted() {
        let mut session = Session::new();
        session.pipes.push_back(harmless_pipe(-60));
        session.pipes.push_back(harmless_pipe(200));
        session.step();
        // x = -64, right edge 0: passed but still on the boundary.
        assert_eq!(session.pipes.len(), 2);
        session.step();
        assert_eq!(session.pipes.len(), 1);
        assert_eq!(session.pipes[0].x, 192);
        assert_eq!(session.score.value(), 0.5);
    }

    #[test]
    fn test_reset() {
        let mut session = Session::new();
        session.pipes.push_back(harmless_pipe(0));
        session.jump();
        for _ in 0..30 {
            session.step();
        }
        session.reset();
        assert_eq!(session.bird, Bird::new());
        assert_eq!(session.velocity_y, 0);
        assert!(session.pipes.is_empty());
        assert_eq!(session.score, Score::default());
        assert!(!session.game_over);
    }
}
