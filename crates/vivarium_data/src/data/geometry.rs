use serde::{Deserialize, Serialize};

/// World position of a creature or resource.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_sq(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_sq(other).sqrt()
    }

    #[must_use]
    pub fn offset(&self, velocity: Velocity, dt: f64) -> Position {
        Position {
            x: self.x + velocity.vx * dt,
            y: self.y + velocity.vy * dt,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Displacement per second. Also used for the separation force.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { vx: 0.0, vy: 0.0 };

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.vx == 0.0 && self.vy == 0.0
    }
}

/// Axis-aligned arena rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Rect {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 60.0,
        }
    }
}

impl Rect {
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }

    #[must_use]
    pub fn center(&self) -> Position {
        Position {
            x: (self.min_x + self.max_x) * 0.5,
            y: (self.min_y + self.max_y) * 0.5,
        }
    }

    /// Shrinks the rectangle by `margin` on every side. An axis narrower than
    /// twice the margin collapses onto its center line.
    #[must_use]
    pub fn deflate(&self, margin: f64) -> Rect {
        let margin = margin.max(0.0);
        let center = self.center();
        let (min_x, max_x) = if self.width() >= margin * 2.0 {
            (self.min_x + margin, self.max_x - margin)
        } else {
            (center.x, center.x)
        };
        let (min_y, max_y) = if self.height() >= margin * 2.0 {
            (self.min_y + margin, self.max_y - margin)
        } else {
            (center.y, center.y)
        };
        Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[must_use]
    pub fn contains(&self, p: &Position) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Nearest point inside the rectangle. Non-finite coordinates snap to the center.
    #[must_use]
    pub fn clamp(&self, p: &Position) -> Position {
        let center = self.center();
        let x = if p.x.is_finite() {
            p.x.clamp(self.min_x, self.max_x)
        } else {
            center.x
        };
        let y = if p.y.is_finite() {
            p.y.clamp(self.min_y, self.max_y)
        } else {
            center.y
        };
        Position { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_keeps_center_for_narrow_rect() {
        let r = Rect {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 2.0,
            max_y: 10.0,
        };
        let d = r.deflate(1.5);
        assert_eq!(d.min_x, 1.0);
        assert_eq!(d.max_x, 1.0);
        assert_eq!(d.min_y, 1.5);
        assert_eq!(d.max_y, 8.5);
    }

    #[test]
    fn test_clamp_handles_nan() {
        let r = Rect::default();
        let p = r.clamp(&Position::new(f64::NAN, 500.0));
        assert_eq!(p.x, 50.0);
        assert_eq!(p.y, 60.0);
    }
}
