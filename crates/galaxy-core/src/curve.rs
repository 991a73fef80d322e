//! Cubic Bezier paths for shooting stars.

use glam::Vec3;
use rand::Rng;

/// A cubic Bezier curve evaluated by arc parameter in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct CubicBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl CubicBezier {
    pub fn point(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }
}

/// Build a random left-to-right sweep across the scene. The start sits on the
/// far left, the end well past the right edge, and the two control points are
/// offset from their respective endpoints so the sweep bows gently.
pub fn random_star_curve(rng: &mut impl Rng) -> CubicBezier {
    let start = Vec3::new(
        -200.0 + rng.gen::<f32>() * 100.0,
        -100.0 + rng.gen::<f32>() * 200.0,
        -100.0 + rng.gen::<f32>() * 200.0,
    );
    let end = Vec3::new(
        600.0 + rng.gen::<f32>() * 200.0,
        start.y - 100.0 + rng.gen::<f32>() * 200.0,
        start.z - 100.0 + rng.gen::<f32>() * 200.0,
    );
    let control1 = Vec3::new(
        start.x + 200.0 + rng.gen::<f32>() * 100.0,
        start.y - 50.0 + rng.gen::<f32>() * 100.0,
        start.z - 50.0 + rng.gen::<f32>() * 100.0,
    );
    let control2 = Vec3::new(
        end.x - 200.0 + rng.gen::<f32>() * 100.0,
        end.y - 50.0 + rng.gen::<f32>() * 100.0,
        end.z - 50.0 + rng.gen::<f32>() * 100.0,
    );
    CubicBezier {
        p0: start,
        p1: control1,
        p2: control2,
        p3: end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn curve_hits_its_endpoints() {
        let curve = CubicBezier {
            p0: Vec3::new(-1.0, 2.0, 3.0),
            p1: Vec3::new(10.0, -5.0, 0.0),
            p2: Vec3::new(-4.0, 8.0, 1.0),
            p3: Vec3::new(7.0, 7.0, -7.0),
        };
        assert_eq!(curve.point(0.0), curve.p0);
        assert_eq!(curve.point(1.0), curve.p3);
    }

    #[test]
    fn out_of_range_parameters_clamp_to_the_endpoints() {
        let mut rng = StdRng::seed_from_u64(9);
        let curve = random_star_curve(&mut rng);
        assert_eq!(curve.point(-0.5), curve.point(0.0));
        assert_eq!(curve.point(1.5), curve.point(1.0));
    }

    #[test]
    fn star_curves_sweep_left_to_right() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..50 {
            let curve = random_star_curve(&mut rng);
            assert!(curve.p0.x < -100.0);
            assert!(curve.p3.x >= 600.0);
        }
    }
}
