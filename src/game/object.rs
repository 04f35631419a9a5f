/// Axis-aligned box in world pixels. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl HitBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// First column past the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// First row past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

pub trait Object {
    fn hit_box(&self) -> HitBox;

    fn get_pos(&self) -> (i32, i32) {
        let hit_box = self.hit_box();
        (hit_box.x, hit_box.y)
    }

    fn get_size(&self) -> (i32, i32) {
        let hit_box = self.hit_box();
        (hit_box.width, hit_box.height)
    }

    /// Overlap test on both axes. Boxes that only touch along an edge do not collide.
    fn collides_with<T: Object + ?Sized>(&self, other: &T) -> bool {
        let this = self.hit_box();
        let other = other.hit_box();

        if this.width <= 0 || this.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }

        interval_sec(this.y, this.bottom() - 1, other.y, other.bottom() - 1)
            && interval_sec(this.x, this.right() - 1, other.x, other.right() - 1)
    }
}

impl Object for HitBox {
    fn hit_box(&self) -> HitBox {
        *self
    }
}

fn interval_sec(l1: i32, r1: i32, l2: i32, r2: i32) -> bool {
    !(r1 < l2 || l1 > r2)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_edges() {
        let hit_box = HitBox::new(-10, 500, 420, 100);
        assert_eq!(hit_box.right(), 410);
        assert_eq!(hit_box.bottom(), 600);
    }

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = HitBox::new(0, 0, 20, 20);
        let b = HitBox::new(10, 15, 20, 20);
        assert!(a.collides_with(&b));
        assert!(b.collides_with(&a));
    }

    #[test]
    fn test_contained_box_collides() {
        let outer = HitBox::new(0, -800, 52, 900);
        let inner = HitBox::new(10, 0, 20, 20);
        assert!(outer.collides_with(&inner));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = HitBox::new(0, 0, 20, 20);
        assert!(!a.collides_with(&HitBox::new(20, 0, 20, 20)));
        assert!(!a.collides_with(&HitBox::new(0, 20, 20, 20)));
        assert!(!a.collides_with(&HitBox::new(-20, -20, 20, 20)));
    }

    #[test]
    fn test_separated_on_one_axis_does_not_collide() {
        let a = HitBox::new(0, 0, 20, 20);
        assert!(!a.collides_with(&HitBox::new(5, 100, 20, 20)));
        assert!(!a.collides_with(&HitBox::new(100, 5, 20, 20)));
    }
}
