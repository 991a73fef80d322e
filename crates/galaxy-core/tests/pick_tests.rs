// Ray construction and the sphere hit test used for planet and gift picking.

use galaxy_core::pick::{ray_sphere, screen_to_world_ray};
use galaxy_core::state::Camera;
use glam::Vec3;

#[test]
fn ray_sphere_intersection_basic() {
    // Ray from origin pointing in +Z direction
    let ray_origin = Vec3::ZERO;
    let ray_dir = Vec3::new(0.0, 0.0, 1.0);

    // Sphere at (0, 0, 5) with radius 2
    let center = Vec3::new(0.0, 0.0, 5.0);
    let result = ray_sphere(ray_origin, ray_dir, center, 2.0);
    assert!(result.is_some());

    let t = result.unwrap();
    assert!(t > 0.0);
    assert!((t - 3.0).abs() < 1e-4);
}

#[test]
fn ray_sphere_intersection_miss() {
    let ray_origin = Vec3::ZERO;
    let ray_dir = Vec3::new(1.0, 0.0, 0.0);
    let center = Vec3::new(0.0, 0.0, 5.0);
    assert!(ray_sphere(ray_origin, ray_dir, center, 2.0).is_none());
}

#[test]
fn ray_sphere_intersection_tangent() {
    let ray_origin = Vec3::ZERO;
    let ray_dir = Vec3::new(0.0, 0.0, 1.0);
    // Sphere edge exactly on the ray line
    let center = Vec3::new(2.0, 0.0, 5.0);
    let result = ray_sphere(ray_origin, ray_dir, center, 2.0);
    assert!(result.is_some());
    assert!(result.unwrap() > 0.0);
}

#[test]
fn ray_sphere_behind_origin_is_rejected() {
    let ray_origin = Vec3::ZERO;
    let ray_dir = Vec3::new(0.0, 0.0, 1.0);
    let center = Vec3::new(0.0, 0.0, -5.0);
    assert!(ray_sphere(ray_origin, ray_dir, center, 2.0).is_none());
}

#[test]
fn center_screen_ray_points_at_the_look_target() {
    let camera = Camera::default();
    let (ro, rd) = screen_to_world_ray(&camera, 400.0, 300.0, 800.0, 600.0);
    assert_eq!(ro, camera.eye);
    let expected = (camera.target - camera.eye).normalize();
    assert!(rd.dot(expected) > 0.9999, "rd {rd:?} vs {expected:?}");
}

#[test]
fn center_screen_click_hits_the_planet() {
    let camera = Camera::default();
    let (ro, rd) = screen_to_world_ray(&camera, 400.0, 300.0, 800.0, 600.0);
    let hit = ray_sphere(ro, rd, Vec3::ZERO, 10.0);
    assert!(hit.is_some());
}

#[test]
fn corner_click_misses_the_planet() {
    let camera = Camera::default();
    let (ro, rd) = screen_to_world_ray(&camera, 5.0, 5.0, 800.0, 600.0);
    assert!(ray_sphere(ro, rd, Vec3::ZERO, 10.0).is_none());
}
