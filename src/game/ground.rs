use crate::{
    constants::game,
    game::{
        kinematics::delta,
        object::{HitBox, Object},
    },
};

/// One tile of the looping ground strip.
#[derive(Debug)]
pub struct Ground {
    hit_box: HitBox,
    speed: f64,
}

impl Ground {
    /// `start_phase` places the segment `start_phase` widths to the right of the origin.
    pub fn new(window_width: i32, window_height: i32, ground_height: i32, speed: f64, start_phase: f64) -> Self {
        let width = (window_width as f64 * game::GROUND_WIDTH_FACTOR) as i32;
        let mut ground =
            Ground { hit_box: HitBox::new(0, window_height - ground_height, width, ground_height), speed };
        ground.move_to_lateral_start(start_phase);
        ground
    }

    fn move_to_lateral_start(&mut self, phase: f64) {
        self.hit_box.x = (self.hit_box.width as f64 * phase) as i32;
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.hit_box.x -= delta(self.speed, elapsed_ms);
        if self.hit_box.x <= -self.hit_box.width {
            self.move_to_lateral_start(game::GROUND_REQUEUE_PHASE);
        }
    }
}

impl Object for Ground {
    fn hit_box(&self) -> HitBox {
        self.hit_box
    }
}
