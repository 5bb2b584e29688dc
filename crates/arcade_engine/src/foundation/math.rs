//! Math utilities and types
//!
//! Provides the 2D vector type used by every simulation module. The vector is
//! a plain value: all operations return new instances.

pub use nalgebra::Vector2;

/// 2D vector type (double precision, value semantics)
pub type Vec2 = Vector2<f64>;

/// Lengths below this are treated as zero when normalizing
pub const NORMALIZE_EPSILON: f64 = 1e-6;

/// Extension trait adding the 2D-specific operations nalgebra does not name
pub trait Vec2Ext {
    /// Perpendicular vector `(-y, x)`, i.e. rotated a quarter turn counter-clockwise
    fn normal(&self) -> Vec2;

    /// Unit vector in the same direction, or the zero vector when the length is below
    /// [`NORMALIZE_EPSILON`]. Never divides by a near-zero length.
    fn normalized_or_zero(&self) -> Vec2;

    /// Rotate counter-clockwise around the origin by `angle` radians
    fn rotated(&self, angle: f64) -> Vec2;

    /// Linear interpolation towards `target`
    fn lerp_to(&self, target: &Vec2, t: f64) -> Vec2;

    /// Angle of the vector in radians, measured from +X
    fn heading(&self) -> f64;
}

impl Vec2Ext for Vec2 {
    fn normal(&self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    fn normalized_or_zero(&self) -> Vec2 {
        let length = self.magnitude();
        if length < NORMALIZE_EPSILON {
            Vec2::zeros()
        } else {
            self / length
        }
    }

    fn rotated(&self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }

    fn lerp_to(&self, target: &Vec2, t: f64) -> Vec2 {
        self + (target - self) * t
    }

    fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Unit vector pointing along `angle` radians
pub fn from_heading(angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos, sin)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// 2 * Pi
    pub const TAU: f64 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f64 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f64 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f64 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * constants::DEG_TO_RAD
    }

    /// Wrap an angle into `[0, TAU)`
    pub fn wrap_angle(angle: f64) -> f64 {
        angle.rem_euclid(constants::TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_is_perpendicular() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.normal(), Vec2::new(-4.0, 3.0));
        assert_relative_eq!(v.dot(&v.normal()), 0.0);
    }

    #[test]
    fn test_normalized_or_zero() {
        let v = Vec2::new(3.0, 4.0).normalized_or_zero();
        assert_relative_eq!(v.magnitude(), 1.0);

        let tiny = Vec2::new(1e-9, -1e-9).normalized_or_zero();
        assert_eq!(tiny, Vec2::zeros());
    }

    #[test]
    fn test_rotation_preserves_magnitude() {
        let v = Vec2::new(2.0, 0.0);
        let r = v.rotated(constants::HALF_PI);
        assert_relative_eq!(r, Vec2::new(0.0, 2.0), epsilon = 1e-12);

        let odd = Vec2::new(-1.5, 7.25);
        assert_relative_eq!(odd.rotated(1.234).magnitude(), odd.magnitude(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rotation_is_exact() {
        let v = Vec2::new(5.0, -5.0);
        assert_eq!(v.rotated(0.0), v);
    }

    #[test]
    fn test_lerp() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, -4.0);
        assert_eq!(a.lerp_to(&b, 0.5), Vec2::new(5.0, -2.0));
        assert_eq!(a.lerp_to(&b, 1.0), b);
    }

    #[test]
    fn test_heading_round_trip() {
        let dir = from_heading(1.0);
        assert_relative_eq!(dir.heading(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(utils::wrap_angle(-constants::HALF_PI), 3.0 * constants::HALF_PI);
    }
}
