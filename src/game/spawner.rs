use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    constants::game::{OPENING_SPACE, PIPE_HEIGHT, PIPE_X, PIPE_Y},
    game::pipe::{Pipe, PipeKind},
};

/// Places top/bottom pipe pairs at the right edge of the board.
#[derive(Debug)]
pub struct Spawner<R: Rng = StdRng> {
    rng: R,
}

impl Spawner<StdRng> {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(StdRng::seed_from_u64(seed)),
            None => Self::new(StdRng::from_entropy()),
        }
    }
}

impl<R: Rng> Spawner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn spawn(&mut self, pipes: &mut VecDeque<Pipe>) {
        let (top, bottom) = pipe_pair(self.rng.gen::<f64>());
        pipes.push_back(top);
        pipes.push_back(bottom);
    }
}

/// Builds a pair from one draw in `[0, 1)`. The top pipe's `y` lies in a
/// band `PIPE_HEIGHT / 2` tall starting `PIPE_HEIGHT / 4` above `PIPE_Y`; the
/// gap between the pair is always `OPENING_SPACE`.
pub fn pipe_pair(random: f64) -> (Pipe, Pipe) {
    debug_assert!((0.0..1.0).contains(&random));
    let top_y = (f64::from(PIPE_Y - PIPE_HEIGHT / 4) - random * f64::from(PIPE_HEIGHT / 2)) as i32;
    let top = Pipe::new(PipeKind::Top, PIPE_X, top_y);
    let bottom = Pipe::new(PipeKind::Bottom, PIPE_X, top_y + PIPE_HEIGHT + OPENING_SPACE);
    (top, bottom)
}
