use serde::Deserialize;
use strum::{Display, EnumIter};
use tracing::{debug, info};

use crate::{
    action::GameAction,
    constants::game,
    game::{
        object::{HitBox, Object},
        render::{Drawable, Renderer, Sprite},
        World,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumIter)]
pub enum StageId {
    StartMenu,
    Running,
    Over,
}

impl StageId {
    pub fn index(self) -> usize {
        self as usize
    }
}

pub trait Stage {
    fn id(&self) -> StageId;

    /// Reacts to one input. Returns the stage to switch to, if any.
    fn handle_action(&mut self, action: GameAction, world: &mut World) -> Option<StageId>;

    /// Moves the world forward. Returns the stage to switch to, if any.
    fn advance(&mut self, elapsed_ms: u64, world: &mut World) -> Option<StageId>;

    fn draw(&self, world: &World, renderer: &mut dyn Renderer);
}

fn centred_graphic(window_width: i32, width: i32, height: i32) -> HitBox {
    HitBox::new(window_width / 2 - width / 2, game::GRAPHIC_Y, width, height)
}

#[derive(Debug)]
pub struct StartMenu {
    graphic: HitBox,
    prompt: Option<String>,
}

impl StartMenu {
    /// `prompt` names the key that begins a session; nothing is shown when it is unbound.
    pub fn new(window_width: i32, prompt: Option<String>) -> Self {
        Self {
            graphic: centred_graphic(window_width, game::START_GRAPHIC_WIDTH, game::START_GRAPHIC_HEIGHT),
            prompt,
        }
    }
}

impl Stage for StartMenu {
    fn id(&self) -> StageId {
        StageId::StartMenu
    }

    fn handle_action(&mut self, action: GameAction, _world: &mut World) -> Option<StageId> {
        match action {
            GameAction::Begin => Some(StageId::Running),
            _ => None,
        }
    }

    fn advance(&mut self, elapsed_ms: u64, world: &mut World) -> Option<StageId> {
        world.advance_grounds(elapsed_ms);
        None
    }

    fn draw(&self, world: &World, renderer: &mut dyn Renderer) {
        renderer.draw_background();

        let mut entities = world.ground_drawables();
        entities.push(Drawable::new(Sprite::StartGraphic, self.graphic));
        renderer.draw_entities(&entities);

        if let Some(prompt) = &self.prompt {
            renderer.draw_text(prompt, game::PROMPT_COLOR, game::PROMPT_Y);
        }
    }
}

#[derive(Debug, Default)]
pub struct Running;

impl Running {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Running {
    fn id(&self) -> StageId {
        StageId::Running
    }

    fn handle_action(&mut self, action: GameAction, world: &mut World) -> Option<StageId> {
        if action == GameAction::Jump {
            world.player.jump();
        }
        None
    }

    /// Every entity moves and every pass is scored before collisions decide the outcome.
    fn advance(&mut self, elapsed_ms: u64, world: &mut World) -> Option<StageId> {
        world.player.advance(elapsed_ms);

        let mut hit_ground = false;
        for ground in world.grounds.iter_mut() {
            ground.advance(elapsed_ms);
            hit_ground |= ground.collides_with(&world.player);
        }

        let midpoint = world.player.midpoint();
        let mut hit_pipe = false;
        for pipes in world.pipes.iter_mut() {
            pipes.advance(elapsed_ms, &mut world.rng);
            hit_pipe |= pipes.collides_with(&world.player);
            if pipes.passed_over_player(midpoint) {
                world.score.increment();
                debug!(score = world.score.value(), "passed a pipe");
            }
        }

        if hit_ground || hit_pipe {
            info!(score = world.score.value(), hit_ground, hit_pipe, "player crashed");
            Some(StageId::Over)
        } else {
            None
        }
    }

    fn draw(&self, world: &World, renderer: &mut dyn Renderer) {
        renderer.draw_background();

        let mut entities = world.pipe_drawables();
        entities.push(world.player_drawable());
        entities.extend(world.ground_drawables());
        renderer.draw_entities(&entities);

        renderer.draw_text(&world.score.value().to_string(), game::TEXT_COLOR, game::SCORE_Y);
    }
}

#[derive(Debug)]
pub struct Over {
    graphic: HitBox,
    prompt: Option<String>,
}

impl Over {
    pub fn new(window_width: i32, prompt: Option<String>) -> Self {
        Self {
            graphic: centred_graphic(window_width, game::GAME_OVER_GRAPHIC_WIDTH, game::GAME_OVER_GRAPHIC_HEIGHT),
            prompt,
        }
    }
}

impl Stage for Over {
    fn id(&self) -> StageId {
        StageId::Over
    }

    fn handle_action(&mut self, action: GameAction, world: &mut World) -> Option<StageId> {
        match action {
            GameAction::Restart => {
                world.restart();
                Some(StageId::Running)
            },
            _ => None,
        }
    }

    fn advance(&mut self, elapsed_ms: u64, world: &mut World) -> Option<StageId> {
        world.advance_grounds(elapsed_ms);
        None
    }

    fn draw(&self, world: &World, renderer: &mut dyn Renderer) {
        renderer.draw_background();

        let mut entities = world.pipe_drawables();
        entities.push(world.player_drawable());
        entities.extend(world.ground_drawables());
        entities.push(Drawable::new(Sprite::GameOverGraphic, self.graphic));
        renderer.draw_entities(&entities);

        renderer.draw_text(&format!("Score: {}", world.score.value()), game::TEXT_COLOR, game::SCORE_Y);
        if let Some(prompt) = &self.prompt {
            renderer.draw_text(prompt, game::PROMPT_COLOR, game::PROMPT_Y);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_stage_indices() {
        let indices: Vec<usize> = StageId::iter().map(StageId::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_graphics_are_centred() {
        assert_eq!(StartMenu::new(400, None).graphic, HitBox::new(112, 100, 176, 77));
        assert_eq!(Over::new(400, None).graphic, HitBox::new(104, 100, 192, 71));
    }
}
