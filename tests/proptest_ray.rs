use glam::{Mat4, Quat, Vec3};
use proptest::prelude::*;
use raypanel_core::{InteractiveRegistry, SceneGraph, Transform};
use raypanel_ui3d::{cast_ray, controller_ray, Ray};

fn vec3(range: f32) -> impl Strategy<Value = Vec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn rotation() -> impl Strategy<Value = Quat> {
    (-3.1f32..3.1, -1.5f32..1.5, -3.1f32..3.1)
        .prop_map(|(yaw, pitch, roll)| Quat::from_euler(glam::EulerRot::YXZ, yaw, pitch, roll))
}

proptest! {
    #[test]
    fn ray_direction_ignores_translation(rotation in rotation(), a in vec3(50.0), b in vec3(50.0)) {
        let first = controller_ray(&Mat4::from_rotation_translation(rotation, a));
        let second = controller_ray(&Mat4::from_rotation_translation(rotation, b));
        prop_assert!((first.direction - second.direction).length() < 1e-4);
        prop_assert!((first.direction.length() - 1.0).abs() < 1e-4);
        prop_assert!((first.origin - a).length() < 1e-3);
    }

    #[test]
    fn empty_registry_never_hits(origin in vec3(10.0), direction in vec3(1.0)) {
        let mut scene = SceneGraph::new();
        scene.spawn(scene.root(), "group", Transform::default());
        let registry = InteractiveRegistry::new();
        prop_assert!(cast_ray(&Ray::new(origin, direction), &scene, &registry).is_none());
    }
}
