use cgmath::*;

pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// Moves `value` toward `target` by at most `max_delta`, never passing it.
pub fn approach(value: f32, target: f32, max_delta: f32) -> f32 {
    if value < target {
        (value + max_delta).min(target)
    } else if value > target {
        (value - max_delta).max(target)
    } else {
        target
    }
}

/// Axis-aligned rectangle in world space. World space is y-down, so `top()` is
/// `origin.y` and `bottom()` is `origin.y + extent.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub origin: Point2<f32>,
    pub extent: Vector2<f32>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            origin: point2(0.0, 0.0),
            extent: vec2(0.0, 0.0),
        }
    }
}

impl Bounds {
    pub fn new(origin: Point2<f32>, extent: Vector2<f32>) -> Self {
        Self { origin, extent }
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }
    pub fn right(&self) -> f32 {
        self.origin.x + self.extent.x
    }
    pub fn top(&self) -> f32 {
        self.origin.y
    }
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.extent.y
    }
    pub fn center(&self) -> Point2<f32> {
        self.origin + self.extent * 0.5
    }
}
