//! Math types and glam re-exports.
//!
//! glam is the one vector/matrix type used across the engine. Conversions to
//! other representations (GPU upload, physics) happen through explicit
//! functions at those boundaries rather than implicit casts.
//!
//! Besides the re-exports this module holds the quad corner generator that
//! every rectangle and sprite goes through on its way into a batch.

pub use glam::{BVec2, IVec2, Mat4, Vec2, Vec3};

/// Corner order used for every quad: bottom-left, bottom-right, top-right,
/// top-left. Indices `[0, 1, 2, 2, 3, 0]` over this order form two
/// counter-clockwise triangles.
pub type QuadCorners = [Vec2; 4];

/// Corners of an axis-aligned rectangle centered at `center`.
pub fn quad_corners(center: Vec2, size: Vec2) -> QuadCorners {
    let half = size * 0.5;
    [
        Vec2::new(center.x - half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
        Vec2::new(center.x - half.x, center.y + half.y),
    ]
}

/// Corners of a rectangle centered at `center`, rotated counter-clockwise by
/// `rotation_degrees` about its own center.
pub fn rotated_quad_corners(center: Vec2, size: Vec2, rotation_degrees: f32) -> QuadCorners {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    let half = size * 0.5;
    let rotate = |local: Vec2| {
        Vec2::new(
            local.x * cos - local.y * sin,
            local.x * sin + local.y * cos,
        ) + center
    };
    [
        rotate(Vec2::new(-half.x, -half.y)),
        rotate(Vec2::new(half.x, -half.y)),
        rotate(Vec2::new(half.x, half.y)),
        rotate(Vec2::new(-half.x, half.y)),
    ]
}

/// Rotate `point` counter-clockwise about the origin.
pub fn rotate_degrees(point: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(point)
}

/// Unit vector pointing along `degrees` (0 = +X, counter-clockwise).
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Linear interpolation. `t` is not clamped; values outside `[0, 1]`
/// extrapolate.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Move `current` toward `target` by at most `max_distance`.
pub fn move_towards_vec2(current: Vec2, target: Vec2, max_distance: f32) -> Vec2 {
    let delta = target - current;
    let distance_sq = delta.length_squared();
    if distance_sq == 0.0 || (max_distance >= 0.0 && distance_sq <= max_distance * max_distance) {
        return target;
    }
    current + delta / distance_sq.sqrt() * max_distance
}

/// A rectangle stored as center and size, in world or screen units.
///
/// Also used for normalized texture regions (UV space), where `(0, 0)` is the
/// bottom-left of the image and `(1, 1)` the top-right.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// The full texture, `(0,0)` to `(1,1)`.
    pub const UNIT: Self = Self {
        center: Vec2::splat(0.5),
        size: Vec2::ONE,
    };

    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Build from min/max bounds.
    pub fn from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        let size = Vec2::new(max_x - min_x, max_y - min_y);
        Self {
            center: Vec2::new(min_x, min_y) + size * 0.5,
            size,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::UNIT
    }
}

/// An integer rectangle in pixel coordinates, stored as min/max bounds.
///
/// Used to pick a sub-region of a texture (sprite sheets and atlases). Pixel
/// rows count up from the bottom of the image, matching UV space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RectInt {
    pub min: IVec2,
    pub max: IVec2,
}

impl RectInt {
    pub fn from_bounds(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min: IVec2::new(min_x, min_y),
            max: IVec2::new(max_x, max_y),
        }
    }

    /// Build from a min corner and a size.
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::from_bounds(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Normalize against texture dimensions, producing a UV-space [`Rect`].
    pub fn normalized(&self, texture_width: u32, texture_height: u32) -> Rect {
        let w = texture_width.max(1) as f32;
        let h = texture_height.max(1) as f32;
        Rect::from_bounds(
            self.min.x as f32 / w,
            self.min.y as f32 / h,
            self.max.x as f32 / w,
            self.max.y as f32 / h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!(a.abs_diff_eq(b, EPS), "expected {b:?}, got {a:?}");
    }

    #[test]
    fn axis_aligned_corners_wind_counter_clockwise() {
        let c = quad_corners(Vec2::new(10.0, 20.0), Vec2::new(4.0, 2.0));
        assert_eq!(c[0], Vec2::new(8.0, 19.0));
        assert_eq!(c[1], Vec2::new(12.0, 19.0));
        assert_eq!(c[2], Vec2::new(12.0, 21.0));
        assert_eq!(c[3], Vec2::new(8.0, 21.0));
    }

    #[test]
    fn zero_rotation_matches_axis_aligned() {
        let center = Vec2::new(-3.0, 7.5);
        let size = Vec2::new(5.0, 1.5);
        let plain = quad_corners(center, size);
        let rotated = rotated_quad_corners(center, size, 0.0);
        for (a, b) in plain.iter().zip(rotated.iter()) {
            assert_close(*b, *a);
        }
    }

    #[test]
    fn quarter_turn_rotates_corners_counter_clockwise() {
        let plain = quad_corners(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let rotated = rotated_quad_corners(Vec2::ZERO, Vec2::new(2.0, 2.0), 90.0);
        for (p, r) in plain.iter().zip(rotated.iter()) {
            assert_close(*r, rotate_degrees(*p, 90.0));
        }
        // Bottom-left (-1,-1) turns into (1,-1).
        assert_close(rotated[0], Vec2::new(1.0, -1.0));
    }

    #[test]
    fn rotation_is_about_the_center() {
        let center = Vec2::new(5.0, -2.0);
        let corners = rotated_quad_corners(center, Vec2::new(3.0, 1.0), 37.0);
        let centroid = corners.iter().copied().sum::<Vec2>() / 4.0;
        assert_close(centroid, center);
    }

    #[test]
    fn move_towards_stops_at_target() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_towards(0.0, -1.0, 0.5), -0.5);
        let v = move_towards_vec2(Vec2::ZERO, Vec2::new(3.0, 4.0), 1.0);
        assert_close(v, Vec2::new(0.6, 0.8));
        assert_eq!(move_towards_vec2(Vec2::ONE, Vec2::ONE, 1.0), Vec2::ONE);
    }

    #[test]
    fn rect_bounds_and_containment() {
        let r = Rect::from_bounds(0.0, 0.0, 4.0, 2.0);
        assert_eq!(r.center, Vec2::new(2.0, 1.0));
        assert!(r.contains(Vec2::new(4.0, 2.0)));
        assert!(!r.contains(Vec2::new(4.1, 1.0)));
        assert!(r.overlaps(&Rect::new(Vec2::new(5.0, 1.0), Vec2::new(2.5, 1.0))));
    }

    #[test]
    fn pixel_region_normalizes_to_uv() {
        let region = RectInt::from_origin_size(16, 0, 16, 32);
        let uv = region.normalized(64, 32);
        assert_close(uv.min(), Vec2::new(0.25, 0.0));
        assert_close(uv.max(), Vec2::new(0.5, 1.0));
    }
}
