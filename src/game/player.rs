use crate::{
    constants::game,
    game::{
        kinematics::delta,
        object::{HitBox, Object},
    },
};

/// Sprite selection derived from the sign of the vertical velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Ascending,
    Level,
    Descending,
}

#[derive(Debug)]
pub struct Player {
    hit_box: HitBox,
    velocity: i32,
    acceleration: f64,
    jump_velocity: i32,
    window_width: i32,
}

impl Player {
    pub fn new(window_width: i32, acceleration: f64, jump_velocity: i32) -> Self {
        let mut player = Player {
            hit_box: HitBox::new(0, 0, game::PLAYER_WIDTH, game::PLAYER_HEIGHT),
            velocity: 0,
            acceleration,
            jump_velocity,
            window_width,
        };
        player.reset();
        player
    }

    pub fn jump(&mut self) {
        self.velocity = self.jump_velocity;
    }

    /// Semi-implicit Euler step: velocity first, then position with the new velocity.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.velocity += delta(self.acceleration, elapsed_ms);
        self.hit_box.y += delta(self.velocity as f64, elapsed_ms);
    }

    pub fn pose(&self) -> Pose {
        match self.velocity {
            v if v > 0 => Pose::Descending,
            0 => Pose::Level,
            _ => Pose::Ascending,
        }
    }

    pub fn reset(&mut self) {
        self.hit_box.x = self.window_width / 2 - self.hit_box.width / 2;
        self.hit_box.y = 0;
        self.velocity = 0;
    }

    #[cfg(test)]
    pub(crate) fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Horizontal midpoint of the window, which the player never leaves.
    pub fn midpoint(&self) -> i32 {
        self.window_width / 2
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, y: i32, velocity: i32) {
        self.hit_box.y = y;
        self.velocity = velocity;
    }
}

impl Object for Player {
    fn hit_box(&self) -> HitBox {
        self.hit_box
    }
}
