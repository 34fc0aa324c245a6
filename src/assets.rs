use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{eyre, Result, WrapErr};
use image::{Rgba, RgbaImage};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum AssetId {
    Background,
    Bird,
    TopPipe,
    BottomPipe,
}

impl AssetId {
    pub fn file_name(&self) -> &'static str {
        match self {
            AssetId::Background => "flappybirdbg.png",
            AssetId::Bird => "flappybird.png",
            AssetId::TopPipe => "toppipe.png",
            AssetId::BottomPipe => "bottompipe.png",
        }
    }

    fn embedded(&self) -> &'static [u8] {
        match self {
            AssetId::Background => include_bytes!("../assets/flappybirdbg.png"),
            AssetId::Bird => include_bytes!("../assets/flappybird.png"),
            AssetId::TopPipe => include_bytes!("../assets/toppipe.png"),
            AssetId::BottomPipe => include_bytes!("../assets/bottompipe.png"),
        }
    }
}

/// A decoded image, drawn by the surface widget.
#[derive(Debug)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(eyre!("image has no pixels"));
        }
        Ok(Self { image })
    }

    /// Samples the sprite stretched over a `width` x `height` box, at
    /// `(u, v)` relative to the box origin. Transparent pixels yield `None`.
    pub fn sample(&self, u: f32, v: f32, width: f32, height: f32) -> Option<Rgba<u8>> {
        if u < 0.0 || v < 0.0 || u >= width || v >= height {
            return None;
        }
        let (w, h) = self.image.dimensions();
        let x = ((u / width * w as f32) as u32).min(w - 1);
        let y = ((v / height * h as f32) as u32).min(h - 1);
        let pixel = *self.image.get_pixel(x, y);
        (pixel[3] >= 128).then_some(pixel)
    }
}

pub struct AssetStore {
    sprites: HashMap<AssetId, Sprite>,
}

impl AssetStore {
    /// Decodes every asset once. Files found in `dir` replace the built-in
    /// artwork; unreadable overrides are logged and skipped.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut sprites = HashMap::new();
        for id in AssetId::iter() {
            let sprite = match dir.map(|dir| load_override(dir, id)) {
                Some(Ok(sprite)) => {
                    info!("Loaded {id} from asset directory");
                    sprite
                },
                Some(Err(e)) => {
                    warn!("Using built-in {}: {e:#}", id.file_name());
                    Sprite::decode(id.embedded()).wrap_err_with(|| format!("built-in {} is corrupt", id.file_name()))?
                },
                None => {
                    Sprite::decode(id.embedded()).wrap_err_with(|| format!("built-in {} is corrupt", id.file_name()))?
                },
            };
            sprites.insert(id, sprite);
        }
        Ok(Self { sprites })
    }

    pub fn get(&self, id: AssetId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }
}

fn load_override(dir: &Path, id: AssetId) -> Result<Sprite> {
    let path: PathBuf = dir.join(id.file_name());
    let bytes = std::fs::read(&path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Sprite::decode(&bytes).wrap_err_with(|| format!("failed to decode {}", path.display()))
}
