use ratatui::style::Color;
use strum::{Display, EnumIter};

use crate::game::object::HitBox;

/// Every image the game draws. The renderer owns the pixels; the core only names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Sprite {
    Background,
    BirdUp,
    BirdMid,
    BirdDown,
    PipeTop,
    PipeBottom,
    Ground,
    StartGraphic,
    GameOverGraphic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    pub sprite: Sprite,
    pub hit_box: HitBox,
}

impl Drawable {
    pub fn new(sprite: Sprite, hit_box: HitBox) -> Self {
        Self { sprite, hit_box }
    }
}

/// Drawing surface the game renders onto once per tick.
pub trait Renderer {
    /// Starts a new frame by painting the background over the whole window.
    fn draw_background(&mut self);

    /// Draws entities in order, later entries on top.
    fn draw_entities(&mut self, entities: &[Drawable]);

    /// Draws `text` horizontally centred, with its top at world row `y`.
    fn draw_text(&mut self, text: &str, color: Color, y: i32);
}
