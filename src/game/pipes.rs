use color_eyre::eyre::{ensure, Result};
use rand::Rng;
use tracing::trace;

use crate::{
    constants::game,
    game::{
        kinematics::delta,
        object::{HitBox, Object},
    },
};

/// An upper and a lower pipe separated by a vertical gap.
///
/// Pairs are never dropped during a session. Once a pair leaves the window on
/// the left it is recycled to the right with a freshly drawn gap.
#[derive(Debug)]
pub struct Pipes {
    upper: HitBox,
    lower: HitBox,
    previous_x: i32,
    gap: i32,
    gap_centre: i32,
    min_displacement: i32,
    range_for_centre: i32,
    window_width: i32,
    start_phase: f64,
    speed: f64,
}

impl Pipes {
    pub fn new<R: Rng + ?Sized>(
        available_height: i32,
        window_width: i32,
        gap: i32,
        speed: f64,
        start_phase: f64,
        rng: &mut R,
    ) -> Result<Self> {
        ensure!(gap > 0, "pipe gap must be positive, got {gap}");
        let min_displacement = (game::PIPE_MIN_DISPLACEMENT_RATIO * available_height as f64).floor() as i32;
        ensure!(
            gap + 2 * min_displacement <= available_height,
            "pipe gap {gap} does not fit in {available_height}px with a {min_displacement}px margin on each side"
        );

        let mut pipes = Pipes {
            upper: HitBox::new(0, 0, game::PIPE_WIDTH, game::PIPE_HEIGHT),
            lower: HitBox::new(0, 0, game::PIPE_WIDTH, game::PIPE_HEIGHT),
            previous_x: 0,
            gap,
            gap_centre: 0,
            min_displacement,
            range_for_centre: available_height - gap - 2 * min_displacement,
            window_width,
            start_phase,
            speed,
        };
        pipes.reset(rng);
        Ok(pipes)
    }

    /// Puts the pair back at the phase it was constructed with.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.recycle(rng, self.start_phase, 0);
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, elapsed_ms: u64, rng: &mut R) {
        self.previous_x = self.upper.x;

        let step = delta(self.speed, elapsed_ms);
        self.upper.x -= step;
        self.lower.x -= step;

        if self.upper.x <= -game::PIPE_WIDTH {
            self.recycle(rng, game::PIPE_RECYCLE_PHASE, game::PIPE_RECYCLE_WIDTH_OFFSET);
        }
    }

    /// Draws a new gap and moves the pair to `window_width * phase - WIDTH * width_offset`.
    pub fn recycle<R: Rng + ?Sized>(&mut self, rng: &mut R, phase: f64, width_offset: i32) {
        self.gap_centre = self.random_gap_centre(rng);

        self.upper.y = -game::PIPE_HEIGHT + (self.gap_centre - self.gap / 2);
        self.lower.y = self.upper.y + game::PIPE_HEIGHT + self.gap;

        let x = (self.window_width as f64 * phase) as i32 - game::PIPE_WIDTH * width_offset;
        self.upper.x = x;
        self.lower.x = x;
        self.previous_x = x;
        trace!(gap_centre = self.gap_centre, x, "recycled pipes");
    }

    fn random_gap_centre<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let offset = (self.range_for_centre as f64 * rng.gen::<f64>()).floor() as i32;
        self.min_displacement + self.gap / 2 + offset
    }

    /// True on the single tick in which the trailing edge crosses `midpoint`.
    ///
    /// A pair fast enough to jump past the midpoint within one tick is not counted.
    pub fn passed_over_player(&self, midpoint: i32) -> bool {
        self.previous_x + game::PIPE_WIDTH > midpoint && midpoint >= self.upper.x + game::PIPE_WIDTH
    }

    pub fn hit_boxes(&self) -> [HitBox; 2] {
        [self.upper, self.lower]
    }

    pub fn collides_with<T: Object + ?Sized>(&self, other: &T) -> bool {
        self.hit_boxes().iter().any(|hit_box| hit_box.collides_with(other))
    }
}

#[cfg(test)]
impl Pipes {
    pub(crate) fn x(&self) -> i32 {
        self.upper.x
    }

    pub(crate) fn previous_x(&self) -> i32 {
        self.previous_x
    }

    pub(crate) fn gap_centre(&self) -> i32 {
        self.gap_centre
    }

    pub(crate) fn min_displacement(&self) -> i32 {
        self.min_displacement
    }

    pub(crate) fn range_for_centre(&self) -> i32 {
        self.range_for_centre
    }

    pub(crate) fn set_x(&mut self, previous_x: i32, x: i32) {
        self.previous_x = previous_x;
        self.upper.x = x;
        self.lower.x = x;
    }
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;
    use pretty_assertions::assert_eq;
    use rand::{rngs::mock::StepRng, rngs::StdRng, SeedableRng};

    use super::*;

    // Every draw of `gen::<f64>()` yields 0.5.
    fn half_rng() -> StepRng {
        StepRng::new(1 << 63, 0)
    }

    fn pipes(available_height: i32, window_width: i32, phase: f64) -> Result<Pipes> {
        Pipes::new(available_height, window_width, game::PIPE_GAP, game::SCROLL_SPEED, phase, &mut half_rng())
    }

    #[test]
    fn test_new_calculates_limits() -> Result<()> {
        let pipes = pipes(400, 200, 1.5)?;
        assert_eq!(pipes.min_displacement(), 80);
        assert_eq!(pipes.range_for_centre(), 140);
        Ok(())
    }

    #[test]
    fn test_new_places_pair() -> Result<()> {
        let pipes = pipes(400, 200, 1.5)?;
        let [upper, lower] = pipes.hit_boxes();
        assert_eq!(pipes.gap_centre(), 200);
        assert_eq!(upper, HitBox::new(300, -650, 52, 800));
        assert_eq!(lower, HitBox::new(300, 250, 52, 800));
        assert_eq!(pipes.previous_x(), 300);
        Ok(())
    }

    #[test]
    fn test_new_rejects_oversized_gap() {
        let result = Pipes::new(150, 400, 100, game::SCROLL_SPEED, 1.0, &mut half_rng());
        assert!(result.is_err());

        let result = Pipes::new(400, 400, 0, game::SCROLL_SPEED, 1.0, &mut half_rng());
        assert!(result.is_err());
    }

    #[test]
    fn test_new_accepts_gap_that_exactly_fits() -> Result<()> {
        // min displacement 50, 150 + 2 * 50 == 250
        let pipes = Pipes::new(250, 400, 150, game::SCROLL_SPEED, 1.0, &mut half_rng())?;
        assert_eq!(pipes.range_for_centre(), 0);
        Ok(())
    }

    #[test]
    fn test_advance_moves_both_boxes_left() -> Result<()> {
        let mut rng = half_rng();
        let mut pipes = Pipes::new(400, 200, game::PIPE_GAP, 20.0, 1.5, &mut rng)?;
        pipes.set_x(100, 100);

        pipes.advance(1000, &mut rng);

        let [upper, lower] = pipes.hit_boxes();
        assert_eq!(upper.x, 80);
        assert_eq!(lower.x, 80);
        assert_eq!(pipes.previous_x(), 100);
        Ok(())
    }

    #[test]
    fn test_advance_recycles_when_out_of_window() -> Result<()> {
        let mut rng = half_rng();
        let mut pipes = Pipes::new(400, 200, game::PIPE_GAP, 2000.0, 1.5, &mut rng)?;
        pipes.set_x(100, 100);

        pipes.advance(1000, &mut rng);

        // 200 * 1.5 - 52
        assert_eq!(pipes.x(), 248);
        Ok(())
    }

    #[test]
    fn test_gap_invariant_after_every_recycle() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(game::SEED);
        let mut pipes = Pipes::new(500, 400, game::PIPE_GAP, game::SCROLL_SPEED, 1.0, &mut rng)?;
        for _ in 0..1000 {
            pipes.recycle(&mut rng, game::PIPE_RECYCLE_PHASE, game::PIPE_RECYCLE_WIDTH_OFFSET);
            let [upper, lower] = pipes.hit_boxes();
            assert_eq!(upper.y + game::PIPE_HEIGHT + game::PIPE_GAP, lower.y);
            assert_eq!(upper.x, lower.x);
        }
        Ok(())
    }

    #[test]
    fn test_gap_invariant_holds_for_odd_gap() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pipes = Pipes::new(500, 400, 101, game::SCROLL_SPEED, 1.0, &mut rng)?;
        for _ in 0..100 {
            pipes.recycle(&mut rng, 1.5, 1);
            let [upper, lower] = pipes.hit_boxes();
            assert_eq!(upper.y + upper.height + 101, lower.y);
        }
        Ok(())
    }

    #[test]
    fn test_gap_centre_stays_in_bounds() -> Result<()> {
        let available_height = 500;
        let mut rng = StdRng::seed_from_u64(game::SEED);
        let mut pipes = Pipes::new(available_height, 400, game::PIPE_GAP, game::SCROLL_SPEED, 1.0, &mut rng)?;
        let min = pipes.min_displacement();
        let lowest = min + game::PIPE_GAP / 2;
        let highest = available_height - min - game::PIPE_GAP / 2;
        for _ in 0..1000 {
            pipes.recycle(&mut rng, 1.5, 1);
            assert!(pipes.gap_centre() >= lowest);
            assert!(pipes.gap_centre() < highest);
        }
        Ok(())
    }

    #[test]
    fn test_same_seed_draws_same_gaps() -> Result<()> {
        let draw = |seed: u64| -> Result<Vec<i32>> {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pipes = Pipes::new(500, 400, game::PIPE_GAP, game::SCROLL_SPEED, 1.0, &mut rng)?;
            Ok((0..20)
                .map(|_| {
                    pipes.recycle(&mut rng, 1.5, 1);
                    pipes.gap_centre()
                })
                .collect())
        };
        assert_eq!(draw(1)?, draw(1)?);
        Ok(())
    }

    #[test]
    fn test_passed_over_player_when_just_passed() -> Result<()> {
        let mut pipes = pipes(400, 300, 1.5)?;
        pipes.set_x(102, 98);
        assert!(pipes.passed_over_player(150));
        Ok(())
    }

    #[test]
    fn test_passed_over_player_false_when_already_passed() -> Result<()> {
        let mut pipes = pipes(400, 200, 1.5)?;
        pipes.set_x(98, 96);
        assert!(!pipes.passed_over_player(150));
        Ok(())
    }

    #[test]
    fn test_passed_over_player_false_when_not_reached() -> Result<()> {
        let mut pipes = pipes(400, 200, 1.5)?;
        pipes.set_x(104, 102);
        assert!(!pipes.passed_over_player(150));
        Ok(())
    }

    #[test]
    fn test_passed_over_player_uses_trailing_edge() -> Result<()> {
        let mut pipes = pipes(400, 200, 1.5)?;
        pipes.set_x(102, 98);
        assert!(!pipes.passed_over_player(100));
        Ok(())
    }

    #[test]
    fn test_pass_fires_once_while_scrolling() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(game::SEED);
        let mut pipes = Pipes::new(500, 400, game::PIPE_GAP, game::SCROLL_SPEED, 1.0, &mut rng)?;
        let mut passes = 0;
        // 400 px at 1 px per tick brings the trailing edge past the midpoint exactly once
        for _ in 0..400 {
            pipes.advance(16, &mut rng);
            if pipes.passed_over_player(200) {
                passes += 1;
            }
        }
        assert_eq!(passes, 1);
        Ok(())
    }

    #[test]
    fn test_collides_with_either_box() -> Result<()> {
        let pipes = pipes(400, 200, 1.5)?;
        assert!(pipes.collides_with(&HitBox::new(300, 0, 20, 20)));
        assert!(pipes.collides_with(&HitBox::new(300, 260, 20, 20)));
        assert!(!pipes.collides_with(&HitBox::new(300, 190, 20, 20)));
        Ok(())
    }
}
