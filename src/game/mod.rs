pub mod ground;
pub mod kinematics;
pub mod object;
pub mod pipes;
pub mod player;
pub mod render;
pub mod score;
pub mod stage;

use color_eyre::eyre::Result;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, trace};

use crate::{
    action::{Action, GameAction},
    config::{key_label, GameSettings, KeyBindings},
    game::{
        ground::Ground,
        object::Object,
        pipes::Pipes,
        player::{Player, Pose},
        render::{Drawable, Renderer, Sprite},
        score::Score,
        stage::{Over, Running, Stage, StageId, StartMenu},
    },
};

/// Everything the stages share. Owned by [`Game`] and lent to the active stage.
#[derive(Debug)]
pub struct World {
    pub player: Player,
    pub grounds: Vec<Ground>,
    pub pipes: Vec<Pipes>,
    pub score: Score,
    pub rng: StdRng,
}

impl World {
    pub fn new(settings: &GameSettings) -> Result<Self> {
        settings.validate()?;

        let mut rng = StdRng::seed_from_u64(settings.seed);
        let available_height = settings.window_height - settings.ground_height;
        let pipes = settings
            .pipe_phases
            .iter()
            .map(|phase| {
                Pipes::new(
                    available_height,
                    settings.window_width,
                    settings.pipe_gap,
                    settings.scroll_speed,
                    *phase,
                    &mut rng,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let grounds = settings
            .ground_phases
            .iter()
            .map(|phase| {
                Ground::new(
                    settings.window_width,
                    settings.window_height,
                    settings.ground_height,
                    settings.scroll_speed,
                    *phase,
                )
            })
            .collect();

        Ok(Self {
            player: Player::new(settings.window_width, settings.acceleration, settings.jump_velocity),
            grounds,
            pipes,
            score: Score::new(),
            rng,
        })
    }

    pub fn advance_grounds(&mut self, elapsed_ms: u64) {
        for ground in self.grounds.iter_mut() {
            ground.advance(elapsed_ms);
        }
    }

    /// New session: pipes back to their starting phases, score cleared, player re-centred.
    pub fn restart(&mut self) {
        for pipes in self.pipes.iter_mut() {
            pipes.reset(&mut self.rng);
        }
        self.score.reset();
        self.player.reset();
    }

    pub fn ground_drawables(&self) -> Vec<Drawable> {
        self.grounds.iter().map(|ground| Drawable::new(Sprite::Ground, ground.hit_box())).collect()
    }

    pub fn pipe_drawables(&self) -> Vec<Drawable> {
        self.pipes
            .iter()
            .flat_map(|pipes| {
                let [upper, lower] = pipes.hit_boxes();
                [Drawable::new(Sprite::PipeTop, upper), Drawable::new(Sprite::PipeBottom, lower)]
            })
            .collect()
    }

    pub fn player_drawable(&self) -> Drawable {
        let sprite = match self.player.pose() {
            Pose::Ascending => Sprite::BirdUp,
            Pose::Level => Sprite::BirdMid,
            Pose::Descending => Sprite::BirdDown,
        };
        Drawable::new(sprite, self.player.hit_box())
    }
}

/// The stage machine: StartMenu -> Running -> Over -> Running -> ...
pub struct Game {
    world: World,
    start_menu: StartMenu,
    running: Running,
    over: Over,
    active: StageId,
}

impl Game {
    /// Prompts on the menu screens name whichever keys `bindings` maps to begin and restart.
    pub fn new(settings: &GameSettings, bindings: &KeyBindings) -> Result<Self> {
        let prompt = |stage, action, verb| {
            bindings.key_for(stage, action).map(|key| format!("Press {} to {verb}", key_label(&key)))
        };
        Ok(Self {
            world: World::new(settings)?,
            start_menu: StartMenu::new(settings.window_width, prompt(StageId::StartMenu, GameAction::Begin, "start")),
            running: Running::new(),
            over: Over::new(settings.window_width, prompt(StageId::Over, GameAction::Restart, "restart")),
            active: StageId::StartMenu,
        })
    }

    fn with_active<T>(&mut self, f: impl FnOnce(&mut dyn Stage, &mut World) -> T) -> T {
        let Game { world, start_menu, running, over, active } = self;
        let stage: &mut dyn Stage = match active {
            StageId::StartMenu => start_menu,
            StageId::Running => running,
            StageId::Over => over,
        };
        debug_assert_eq!(stage.id(), *active);
        f(stage, world)
    }

    fn transition(&mut self, next: StageId) {
        info!(from = %self.active, to = %next, index = next.index(), "stage transition");
        self.active = next;
    }

    /// Feeds a batch of inputs to the active stage. Returns `false` once a quit is seen.
    pub fn handle_input(&mut self, actions: &[Action]) -> bool {
        for action in actions {
            match action {
                Action::Quit => {
                    info!(stage = %self.active, "quit requested");
                    return false;
                },
                Action::Game(game_action) => {
                    let game_action = *game_action;
                    if let Some(next) = self.with_active(|stage, world| stage.handle_action(game_action, world)) {
                        self.transition(next);
                    }
                },
                _ => {},
            }
        }
        true
    }

    /// Advances the active stage by `elapsed_ms` and renders it, unless the stage changed this tick.
    pub fn advance(&mut self, elapsed_ms: u64, renderer: &mut dyn Renderer) {
        trace!(elapsed_ms, stage = %self.active, "tick");
        let next = self.with_active(|stage, world| stage.advance(elapsed_ms, world));
        match next {
            Some(next) => self.transition(next),
            None => self.with_active(|stage, world| stage.draw(world, renderer)),
        }
    }

    pub fn stage(&self) -> StageId {
        self.active
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
