/// Axis-aligned box in surface coordinates. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive overlap: touching edges count as a hit.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn touching_edges_overlap_but_do_not_intersect() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn separated_boxes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(0.0, 10.5, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn contains_is_inclusive() {
        let card = Aabb::new(100.0, 100.0, 120.0, 120.0);
        assert!(card.contains(100.0, 220.0));
        assert!(!card.contains(99.9, 150.0));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Aabb::new(ax, ay, aw, ah);
            let b = Aabb::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            if a.intersects(&b) {
                prop_assert!(a.overlaps(&b));
            }
        }

        #[test]
        fn clamp_stays_in_range(v in -1e6f32..1e6, lo in -100.0f32..0.0, hi in 0.0f32..100.0) {
            let c = clamp(v, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }
    }
}
