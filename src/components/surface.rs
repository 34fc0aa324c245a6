use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::{
    assets::{AssetId, AssetStore},
    constants::{BOARD_HEIGHT, BOARD_WIDTH},
    game::object::Bounds,
};

const HALF_BLOCK: &str = "▀";

/// Text placed by its baseline in board pixels. Without an `x` the text is
/// centred horizontally.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    x: Option<i32>,
    y: i32,
    style: Style,
}

impl Label {
    pub fn centered(y: i32, text: impl Into<String>) -> Self {
        Self { text: text.into(), x: None, y, style: Style::default() }
    }

    pub fn at(x: i32, y: i32, text: impl Into<String>) -> Self {
        Self { text: text.into(), x: Some(x), y, style: Style::default() }
    }

    pub fn style(self, style: Style) -> Self {
        Self { style, ..self }
    }
}

/// Where the board lands inside a terminal area. Each cell shows two board
/// rows of pixels stacked vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    area: Rect,
    scale: f32,
    width: u16,
    height_px: u16,
    offset_x: u16,
    offset_y_px: u16,
}

impl Viewport {
    /// Largest aspect-preserving fit of the board into `area`, centred.
    pub fn fit(area: Rect) -> Option<Self> {
        let area_height_px = area.height.saturating_mul(2);
        let scale =
            (f32::from(area.width) / BOARD_WIDTH as f32).min(f32::from(area_height_px) / BOARD_HEIGHT as f32);
        let width = (BOARD_WIDTH as f32 * scale) as u16;
        let height_px = (BOARD_HEIGHT as f32 * scale) as u16;
        if width == 0 || height_px == 0 {
            return None;
        }
        Some(Self {
            area,
            scale,
            width,
            height_px,
            offset_x: (area.width - width) / 2,
            offset_y_px: (area_height_px - height_px) / 2,
        })
    }

    /// The cells the board covers.
    pub fn rect(&self) -> Rect {
        let top = self.offset_y_px / 2;
        let bottom = (self.offset_y_px + self.height_px).div_ceil(2);
        Rect::new(self.area.x + self.offset_x, self.area.y + top, self.width, bottom - top)
    }

    /// Board coordinates of the centre of a pixel, relative to the area.
    fn to_board(&self, col: u16, row_px: u16) -> Option<(f32, f32)> {
        if col < self.offset_x || col >= self.offset_x + self.width {
            return None;
        }
        if row_px < self.offset_y_px || row_px >= self.offset_y_px + self.height_px {
            return None;
        }
        let x = (f32::from(col - self.offset_x) + 0.5) / self.scale;
        let y = (f32::from(row_px - self.offset_y_px) + 0.5) / self.scale;
        Some((x, y))
    }

    fn row_of(&self, y: i32) -> u16 {
        let y_px = (y.clamp(0, BOARD_HEIGHT) as f32 * self.scale) as u16;
        let row = (self.offset_y_px + y_px.min(self.height_px.saturating_sub(1))) / 2;
        self.area.y + row
    }

    fn col_of(&self, x: i32) -> u16 {
        let x_px = (x.clamp(0, BOARD_WIDTH) as f32 * self.scale) as u16;
        self.area.x + self.offset_x + x_px.min(self.width.saturating_sub(1))
    }
}

/// One frame of the board: sprites in paint order, then text on top.
pub struct Surface<'a> {
    assets: &'a AssetStore,
    sprites: Vec<(AssetId, Bounds)>,
    labels: Vec<Label>,
}

impl<'a> Surface<'a> {
    pub fn new(assets: &'a AssetStore) -> Self {
        Self { assets, sprites: Vec::new(), labels: Vec::new() }
    }

    pub fn sprite(&mut self, id: AssetId, bounds: Bounds) {
        self.sprites.push((id, bounds));
    }

    pub fn label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Colour of the topmost opaque sprite at a board position.
    pub(crate) fn color_at(&self, x: f32, y: f32) -> Option<Color> {
        self.sprites.iter().rev().find_map(|(id, bounds)| {
            let sprite = self.assets.get(*id)?;
            let pixel = sprite.sample(
                x - bounds.x as f32,
                y - bounds.y as f32,
                bounds.width as f32,
                bounds.height as f32,
            )?;
            Some(Color::Rgb(pixel[0], pixel[1], pixel[2]))
        })
    }

    fn render_pixels(&self, viewport: &Viewport, area: Rect, buf: &mut Buffer) {
        let board = viewport.rect();
        for row in board.top()..board.bottom() {
            for col in board.left()..board.right() {
                let (rel_col, rel_row) = (col - area.x, row - area.y);
                let upper = viewport.to_board(rel_col, rel_row * 2).and_then(|(x, y)| self.color_at(x, y));
                let lower = viewport.to_board(rel_col, rel_row * 2 + 1).and_then(|(x, y)| self.color_at(x, y));
                if let Some(cell) = buf.cell_mut((col, row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(upper.unwrap_or(Color::Reset))
                        .set_bg(lower.unwrap_or(Color::Reset));
                }
            }
        }
    }

    fn render_labels(&self, viewport: &Viewport, buf: &mut Buffer) {
        let board = viewport.rect();
        for label in &self.labels {
            let text_width = label.text.chars().count() as u16;
            let col = match label.x {
                Some(x) => viewport.col_of(x),
                None => board.x + board.width.saturating_sub(text_width) / 2,
            };
            let row = viewport.row_of(label.y);
            let max_width = board.right().saturating_sub(col) as usize;
            buf.set_stringn(col, row, &label.text, max_width, label.style);
        }
    }
}

impl Widget for Surface<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let Some(viewport) = Viewport::fit(area) else {
            return;
        };
        self.render_pixels(&viewport, area, buf);
        self.render_labels(&viewport, buf);
    }
}
