use crate::{
    assets::AssetId,
    constants::game::{PIPE_HEIGHT, PIPE_WIDTH},
    game::object::Object,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeKind {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipe {
    pub kind: PipeKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Set once the bird has moved past the trailing edge.
    pub passed: bool,
}

impl Pipe {
    pub fn new(kind: PipeKind, x: i32, y: i32) -> Self {
        Self { kind, x, y, width: PIPE_WIDTH, height: PIPE_HEIGHT, passed: false }
    }

    pub fn move_by(&mut self, dx: i32) {
        self.x += dx;
    }

    pub fn off_screen(&self) -> bool {
        self.x + self.width < 0
    }
}

impl Object for Pipe {
    fn get_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn get_pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn asset(&self) -> AssetId {
        match self.kind {
            PipeKind::Top => AssetId::TopPipe,
            PipeKind::Bottom => AssetId::BottomPipe,
        }
    }
}
