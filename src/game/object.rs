use crate::{
    assets::AssetId,
    game::{bird::Bird, pipe::Pipe},
};

/// Axis-aligned box in board pixels, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict overlap on both axes: boxes that only share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right() && self.right() > other.x && self.y < other.bottom() && self.bottom() > other.y
    }
}

pub trait Object {
    fn get_size(&self) -> (i32, i32);
    fn get_pos(&self) -> (i32, i32);
    fn asset(&self) -> AssetId;

    fn bounds(&self) -> Bounds {
        let (x, y) = self.get_pos();
        let (width, height) = self.get_size();
        Bounds::new(x, y, width, height)
    }

    fn collides_with<T: Object>(&self, other: &T) -> bool
    where
        Self: Sized,
    {
        self.bounds().intersects(&other.bounds())
    }
}

pub fn collides(bird: &Bird, pipe: &Pipe) -> bool {
    bird.collides_with(pipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pipe::PipeKind;

    fn bird_at(x: i32, y: i32) -> Bird {
        let mut bird = Bird::new();
        bird.x = x;
        bird.y = y;
        bird
    }

    fn pipe_at(x: i32, y: i32) -> Pipe {
        Pipe::new(PipeKind::Top, x, y)
    }

    #[test]
    fn test_overlap() {
        // Bird is 34x24, pipe 64x512.
        assert!(collides(&bird_at(45, 100), &pipe_at(60, 0)));
        assert!(collides(&bird_at(45, 100), &pipe_at(0, 0)));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        // bird right edge == pipe left edge
        assert!(!collides(&bird_at(45, 100), &pipe_at(79, 0)));
        // bird left edge == pipe right edge
        assert!(!collides(&bird_at(45, 100), &pipe_at(45 - 64, 0)));
        // bird top == pipe bottom
        assert!(!collides(&bird_at(45, 512), &pipe_at(40, 0)));
        // bird bottom == pipe top
        assert!(!collides(&bird_at(45, 100), &pipe_at(40, 124)));
    }

    #[test]
    fn test_one_pixel_overlap_collides() {
        assert!(collides(&bird_at(45, 100), &pipe_at(78, 0)));
        assert!(collides(&bird_at(45, 511), &pipe_at(40, 0)));
        assert!(collides(&bird_at(45, 100), &pipe_at(40, 123)));
    }

    #[test]
    fn test_separated_on_one_axis() {
        assert!(!collides(&bird_at(45, 100), &pipe_at(200, 0)));
        assert!(!collides(&bird_at(45, 600), &pipe_at(40, 0)));
    }

    #[test]
    fn test_symmetric() {
        let cases = [(45, 100, 60, 0), (45, 100, 79, 0), (45, 512, 40, 0), (10, 300, 30, 200)];
        for (bx, by, px, py) in cases {
            let bird = bird_at(bx, by);
            let pipe = pipe_at(px, py);
            assert_eq!(collides(&bird, &pipe), pipe.collides_with(&bird));
        }
    }
}
