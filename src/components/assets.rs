use std::{collections::HashMap, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use image::{imageops::FilterType, RgbaImage};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::{
    config::GameSettings,
    constants::{assets, game},
    game::render::Sprite,
};

/// Sprite images, already scaled to the size they occupy in the world.
#[derive(Debug, Default)]
pub struct Assets {
    images: HashMap<Sprite, RgbaImage>,
}

impl Assets {
    /// Loads every sprite from `settings.assets_dir`. Any unreadable image is fatal.
    pub fn load(settings: &GameSettings) -> Result<Self> {
        let dir = settings.assets_dir.as_path();
        let images = Sprite::iter()
            .map(|sprite| {
                let (width, height) = sprite_size(sprite, settings);
                let image = load_and_scale(&dir.join(file_name(sprite)), width, height)?;
                Ok((sprite, image))
            })
            .collect::<Result<HashMap<_, _>>>()?;
        info!("Loaded {} sprites from {}", images.len(), dir.display());
        Ok(Self { images })
    }

    pub fn from_images(images: HashMap<Sprite, RgbaImage>) -> Self {
        Self { images }
    }

    pub fn get(&self, sprite: Sprite) -> Option<&RgbaImage> {
        self.images.get(&sprite)
    }
}

pub fn load_and_scale(path: &Path, width: u32, height: u32) -> Result<RgbaImage> {
    let image = image::open(path).wrap_err_with(|| format!("failed to load sprite {}", path.display()))?;
    debug!("{} is {}x{}, scaling to {width}x{height}", path.display(), image.width(), image.height());
    Ok(image::imageops::resize(&image.to_rgba8(), width, height, FilterType::Nearest))
}

fn file_name(sprite: Sprite) -> &'static str {
    match sprite {
        Sprite::Background => assets::BACKGROUND,
        Sprite::BirdUp => assets::BIRD_UP,
        Sprite::BirdMid => assets::BIRD_MID,
        Sprite::BirdDown => assets::BIRD_DOWN,
        Sprite::PipeTop => assets::PIPE_TOP,
        Sprite::PipeBottom => assets::PIPE_BOTTOM,
        Sprite::Ground => assets::GROUND,
        Sprite::StartGraphic => assets::START,
        Sprite::GameOverGraphic => assets::GAME_OVER,
    }
}

fn sprite_size(sprite: Sprite, settings: &GameSettings) -> (u32, u32) {
    let (width, height) = match sprite {
        Sprite::Background => (settings.window_width, settings.window_height),
        Sprite::BirdUp | Sprite::BirdMid | Sprite::BirdDown => (game::PLAYER_WIDTH, game::PLAYER_HEIGHT),
        Sprite::PipeTop | Sprite::PipeBottom => (game::PIPE_WIDTH, game::PIPE_HEIGHT),
        Sprite::Ground => {
            ((settings.window_width as f64 * game::GROUND_WIDTH_FACTOR) as i32, settings.ground_height)
        },
        Sprite::StartGraphic => (game::START_GRAPHIC_WIDTH, game::START_GRAPHIC_HEIGHT),
        Sprite::GameOverGraphic => (game::GAME_OVER_GRAPHIC_WIDTH, game::GAME_OVER_GRAPHIC_HEIGHT),
    };
    (width.max(1) as u32, height.max(1) as u32)
}
