//! Continuous-space geometry for picking and dragging.
//!
//! Pieces move through continuous space and only meet the discrete grid at
//! snap time, so the interaction layer needs three primitives: a pointer
//! ray, a fixed drag-plane to intersect it with, and ray/AABB tests for
//! hit-testing piece cells. Rotation commands additionally need the
//! camera-relative axis collapse that keeps 90° steps grid-aligned.

use glam::Vec3;

/// A pointer ray: origin plus normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// An infinite plane defined by a normal and a point on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
        }
    }

    /// Intersects a ray with the plane.
    ///
    /// Returns the distance along the ray, or `None` when the ray is
    /// parallel to the plane or the intersection lies behind the origin.
    /// Both are transient conditions the caller skips, not errors.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin) / denom;
        (t >= 0.0).then_some(t)
    }
}

/// Ray/AABB intersection using the slab method.
///
/// Returns the entry distance along the ray (`>= 0`), or `None` when the
/// ray misses the box or the box lies entirely behind the origin.
pub fn ray_aabb_intersect(ray: &Ray, aabb_min: Vec3, aabb_max: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < 1e-10 {
            // parallel to this slab: must already be inside it
            if origin < aabb_min[axis] || origin > aabb_max[axis] {
                return None;
            }
        } else {
            let t1 = (aabb_min[axis] - origin) / dir;
            let t2 = (aabb_max[axis] - origin) / dir;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
    }

    if t_max < t_min || t_max < 0.0 {
        return None;
    }
    // entry point, clamped to the origin when it starts inside the box
    Some(t_min.max(0.0))
}

/// Collapses a direction onto the world axis with the largest magnitude
/// component, keeping its sign.
///
/// This is how rotation commands stay camera-relative yet grid-aligned:
/// the viewer's up/right vectors are collapsed to ±X, ±Y or ±Z before
/// being used as 90° rotation axes. Ties fall through to the z axis.
pub fn dominant_world_axis(direction: Vec3) -> Vec3 {
    let abs = direction.abs();
    if abs.x > abs.y && abs.x > abs.z {
        Vec3::new(direction.x.signum(), 0.0, 0.0)
    } else if abs.y > abs.x && abs.y > abs.z {
        Vec3::new(0.0, direction.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, direction.z.signum())
    }
}

/// The viewer's orientation, read-only to the core.
///
/// Supplied per frame by the host; used for the drag-plane normal and the
/// camera-relative rotation axes.
#[derive(Debug, Clone, Copy)]
pub struct ViewerBasis {
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

impl ViewerBasis {
    pub fn new(forward: Vec3, up: Vec3, right: Vec3) -> Self {
        Self { forward, up, right }
    }

    /// A viewer looking straight down -Z with +Y up.
    pub fn looking_down_neg_z() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
        }
    }

    /// Grid-aligned yaw axis derived from the viewer's up vector.
    pub fn yaw_axis(&self) -> Vec3 {
        dominant_world_axis(self.up)
    }

    /// Grid-aligned pitch axis derived from the viewer's right vector.
    pub fn pitch_axis(&self) -> Vec3 {
        dominant_world_axis(self.right)
    }
}
