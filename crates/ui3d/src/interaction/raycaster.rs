//! UI Raycasting - Detect controller rays hitting interactive targets

use glam::{Mat4, Vec3};
use raypanel_core::{InteractiveRegistry, NodeId, SceneGraph, Shape};

/// Length of the visual ray segment when nothing is hit
pub const DEFAULT_RAY_LENGTH: f32 = 5.0;

/// A world-space ray with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Node whose shape was struck (may be a sub-part of a target)
    pub node: NodeId,
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// World-space hit position
    pub position: Vec3,
}

/// Axis-aligned bounding box in 3D space
#[derive(Debug, Clone, Copy)]
pub struct UIAABB {
    /// Minimum corner of the box
    pub min: Vec3,
    /// Maximum corner of the box
    pub max: Vec3,
}

impl UIAABB {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Test if a ray intersects this AABB
    /// Returns distance to intersection point if hit
    pub fn ray_intersection(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = Vec3::new(1.0 / ray_dir.x, 1.0 / ray_dir.y, 1.0 / ray_dir.z);

        let t1 = (self.min.x - ray_origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray_origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray_origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray_origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray_origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray_origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // If tmax < 0, ray is intersecting AABB but entire AABB is behind us
        if tmax < 0.0 {
            return None;
        }

        // If tmin > tmax, ray doesn't intersect AABB
        if tmin > tmax {
            return None;
        }

        // If tmin < 0, we're inside the AABB
        let distance = if tmin < 0.0 { tmax } else { tmin };

        Some(distance)
    }
}

/// Ray from a controller's world transform.
///
/// Origin is the translation; direction is local -Z rotated by the pose's
/// rotation only, so translation and scale never affect it.
pub fn controller_ray(pose: &Mat4) -> Ray {
    let (_, rotation, translation) = pose.to_scale_rotation_translation();
    Ray::new(translation, rotation * Vec3::NEG_Z)
}

/// Distance along `ray` to `shape` placed by `world`, if it is hit.
///
/// The ray is moved into the shape's local space, so rotated and scaled
/// parts are handled; the returned distance is in world units.
pub fn intersect_shape(ray: &Ray, world: &Mat4, shape: &Shape) -> Option<f32> {
    let det = world.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inverse = world.inverse();
    let origin = inverse.transform_point3(ray.origin);
    let dir = inverse.transform_vector3(ray.direction);

    match *shape {
        Shape::Cuboid { half_extents } => {
            UIAABB::new(-half_extents, half_extents).ray_intersection(origin, dir)
        }
        Shape::Quad { half_size } => {
            // Ray parallel to plane
            if dir.z.abs() < 1e-6 {
                return None;
            }
            let t = -origin.z / dir.z;
            // Intersection behind ray origin
            if t < 0.0 {
                return None;
            }
            let hit = origin + dir * t;
            (hit.x.abs() <= half_size.x && hit.y.abs() <= half_size.y).then_some(t)
        }
    }
}

/// Nearest hit among all registered targets and their descendants.
///
/// Read-only: neither the scene nor the registry is modified.
pub fn cast_ray(ray: &Ray, scene: &SceneGraph, registry: &InteractiveRegistry) -> Option<RayHit> {
    let mut closest: Option<RayHit> = None;

    for &root in registry.all() {
        for node_id in scene.descendants(root) {
            let Some(node) = scene.node(node_id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let Some(shape) = node.shape else {
                continue;
            };
            let Some(world) = scene.world_matrix(node_id) else {
                continue;
            };

            if let Some(distance) = intersect_shape(ray, &world, &shape) {
                let nearer = closest.map_or(true, |hit| distance < hit.distance);
                if distance > 0.0 && nearer {
                    closest = Some(RayHit {
                        node: node_id,
                        distance,
                        position: ray.at(distance),
                    });
                }
            }
        }
    }

    closest
}

/// Length of the visual ray segment: stops at the struck surface.
pub fn ray_length(hit: Option<&RayHit>, default_length: f32) -> f32 {
    hit.map_or(default_length, |hit| hit.distance)
}
