use serde::{Deserialize, Serialize};

/// A point in field coordinates, in meters.
///
/// The field origin is the center spot; `x` points toward the opponent goal.
/// Most comparisons in the harness are made on the ground plane, see
/// [`Position::ground`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a position on the ground plane (`z = 0`).
    #[must_use]
    pub const fn on_ground(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// Returns this position projected onto the ground plane.
    #[must_use]
    pub const fn ground(self) -> Self {
        Self::on_ground(self.x, self.y)
    }

    /// Euclidean distance in three dimensions.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance between the ground-plane projections of both positions.
    ///
    /// ```
    /// use skillfit_engine::Position;
    ///
    /// let a = Position::new(0.0, 0.0, 0.5);
    /// let b = Position::new(3.0, 4.0, 0.0);
    /// assert_eq!(a.ground_distance_to(b), 5.0);
    /// ```
    #[must_use]
    pub fn ground_distance_to(self, other: Self) -> f64 {
        self.ground().distance_to(other.ground())
    }

    /// Bearing of this position seen from the origin, in degrees in `(-180, 180]`.
    #[must_use]
    pub fn bearing_deg(self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }
}

/// Position plus heading, used both as a beam target and as observed ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    /// Heading in degrees, counter-clockwise from the `x` axis.
    pub heading_deg: f64,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Position, heading_deg: f64) -> Self {
        Self {
            position,
            heading_deg,
        }
    }

    #[must_use]
    pub const fn on_ground(x: f64, y: f64, heading_deg: f64) -> Self {
        Self::new(Position::on_ground(x, y), heading_deg)
    }
}

/// Normalizes an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Absolute difference between two headings, taking wrap-around into account.
#[must_use]
pub fn heading_error_deg(observed: f64, desired: f64) -> f64 {
    normalize_deg(observed - desired).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_distance_ignores_height() {
        let a = Position::new(1.0, 1.0, 0.3);
        let b = Position::new(1.0, 1.0, 0.0);
        assert_eq!(a.ground_distance_to(b), 0.0);
        assert!((a.distance_to(b) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_heading_error_wraps() {
        assert!((heading_error_deg(359.0, 0.0) - 1.0).abs() < 1e-9);
        assert!((heading_error_deg(-179.0, 179.0) - 2.0).abs() < 1e-9);
        assert!((heading_error_deg(10.0, -10.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing() {
        assert!((Position::on_ground(0.0, 2.0).bearing_deg() - 90.0).abs() < 1e-9);
        assert_eq!(Position::on_ground(2.0, 0.0).bearing_deg(), 0.0);
    }
}
