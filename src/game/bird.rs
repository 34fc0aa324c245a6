use crate::{
    assets::AssetId,
    constants::game::{BIRD_HEIGHT, BIRD_WIDTH, BIRD_X, BIRD_Y},
    game::object::Object,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bird {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bird {
    pub fn new() -> Self {
        Self { x: BIRD_X, y: BIRD_Y, width: BIRD_WIDTH, height: BIRD_HEIGHT }
    }

    pub fn reset(&mut self) {
        self.y = BIRD_Y;
    }

    /// Moves vertically, never above the top of the board.
    pub fn fall(&mut self, velocity: i32) {
        self.y = (self.y + velocity).max(0);
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Object for Bird {
    fn get_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn get_pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn asset(&self) -> AssetId {
        AssetId::Bird
    }
}
