//! Point-cloud generation and the distance-based LOD switch.
//!
//! The background galaxy, the starfield, and the photo heart clusters are all
//! plain position+color buffers; the frontends turn them into whatever point
//! primitive their renderer offers. Each photo cluster pairs two color sets
//! over one shared geometry: a white, opaque, depth-tested "near" look for
//! close-up legibility and a graded, additive, non-depth-writing "far" glow.

use glam::{Mat4, Quat, Vec3};
use rand::Rng;

use crate::constants::{FREEZE_DISTANCE, LOD_NEAR_DISTANCE};

/// Spiral-arm galaxy tuning, shared by the background cloud and the photo
/// clusters so both trace the same arms.
#[derive(Clone, Debug)]
pub struct GalaxyParams {
    pub count: usize,
    pub arms: u32,
    pub radius: f32,
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: [f32; 3],
    pub outside_color: [f32; 3],
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            arms: 6,
            radius: 100.0,
            spin: 0.5,
            randomness: 0.2,
            randomness_power: 20.0,
            inside_color: [0.102, 0.102, 0.102],
            outside_color: [0.2, 0.2, 0.2],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PointSet {
    pub positions: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
}

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Sample one point on a spiral arm: radius biased hard toward the rim by
/// `randomness_power`, jittered around the arm line.
fn arm_point(params: &GalaxyParams, index: usize, rng: &mut impl Rng) -> (Vec3, f32) {
    let radius = rng.gen::<f32>().powf(params.randomness_power) * params.radius;
    let branch =
        (index as u32 % params.arms) as f32 / params.arms as f32 * std::f32::consts::TAU;
    let spin = radius * params.spin;
    let jitter = Vec3::new(
        (rng.gen::<f32>() - 0.5) * params.randomness * radius,
        (rng.gen::<f32>() - 0.5) * params.randomness * radius * 0.5,
        (rng.gen::<f32>() - 0.5) * params.randomness * radius,
    );
    let angle = branch + spin;
    (
        Vec3::new(
            angle.cos() * radius + jitter.x,
            jitter.y,
            angle.sin() * radius + jitter.z,
        ),
        radius,
    )
}

/// The dim background spiral. Points inside radius 30 are thinned to 30% so
/// the planet sits in a visible gap.
pub fn generate_galaxy(params: &GalaxyParams, rng: &mut impl Rng) -> PointSet {
    let mut set = PointSet::default();
    for i in 0..params.count {
        let (pos, radius) = arm_point(params, i, rng);
        if radius < 30.0 && rng.gen::<f32>() < 0.7 {
            continue;
        }
        let base = lerp3([0.165; 3], [0.25; 3], radius / params.radius);
        let gain = 0.1 + 0.1 * rng.gen::<f32>();
        set.positions.push(pos);
        set.colors
            .push([base[0] * gain, base[1] * gain, base[2] * gain]);
    }
    set
}

/// Uniformly scattered stars inside a cube of the given edge length.
pub fn generate_starfield(count: usize, extent: f32, rng: &mut impl Rng) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
            )
        })
        .collect()
}

/// One soft additive glow blob.
#[derive(Clone, Debug)]
pub struct NebulaSprite {
    pub position: Vec3,
    pub color: [f32; 3],
    pub scale: f32,
}

pub fn generate_nebulae(count: usize, spread: f32, rng: &mut impl Rng) -> Vec<NebulaSprite> {
    (0..count)
        .map(|_| NebulaSprite {
            position: Vec3::new(
                (rng.gen::<f32>() - 0.5) * spread,
                (rng.gen::<f32>() - 0.5) * spread,
                (rng.gen::<f32>() - 0.5) * spread,
            ),
            color: crate::effects::hsl_to_rgb(rng.gen::<f32>(), 0.8, 0.5),
            scale: 100.0,
        })
        .collect()
}

/// Points per photo cluster: densest with a single image, thinning linearly
/// down to the floor at nine or more.
pub fn points_per_cluster(num_images: usize) -> usize {
    const MAX_DENSITY: usize = 15_000;
    const MIN_DENSITY: usize = 4_000;
    const SCALE_CEILING: usize = 9;
    if num_images <= 1 {
        MAX_DENSITY
    } else if num_images >= SCALE_CEILING {
        MIN_DENSITY
    } else {
        let t = (num_images - 1) as f32 / (SCALE_CEILING - 1) as f32;
        (MAX_DENSITY as f32 * (1.0 - t) + MIN_DENSITY as f32 * t) as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LodRep {
    Near,
    Far,
}

/// Float/rotate/pulse parameters, active only beyond the freeze distance.
#[derive(Clone, Debug)]
struct CloudAnim {
    float_speed: f32,
    float_amplitude: f32,
    rotation_rate: Vec3,
    pulse_speed: f32,
    base_scale: f32,
}

/// A photo heart cluster: one local geometry recentered on its centroid, two
/// color sets, exactly one representation active at a time.
#[derive(Clone, Debug)]
pub struct PhotoCloud {
    /// Centroid of the generated points; the local geometry is recentered
    /// around the origin and the cloud's world position starts here.
    pub anchor: Vec3,
    pub points: Vec<Vec3>,
    pub near_colors: Vec<[f32; 3]>,
    pub far_colors: Vec<[f32; 3]>,
    pub rep: LodRep,
    pub position: Vec3,
    pub base_rotation: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    /// Source image this cluster is textured from; loading is the frontend's
    /// problem and failure just leaves the cluster untextured.
    pub image: String,
    anim: CloudAnim,
}

impl PhotoCloud {
    /// Re-evaluate the near/far choice from the camera position. Returns
    /// whether the representation changed; repeated calls with an unchanged
    /// camera are no-ops.
    pub fn update_lod(&mut self, camera: Vec3) -> bool {
        let near_sq = LOD_NEAR_DISTANCE * LOD_NEAR_DISTANCE;
        let mut close = false;
        for p in &self.points {
            if (*p + self.position).distance_squared(camera) < near_sq {
                close = true;
                break;
            }
        }
        let desired = if close { LodRep::Near } else { LodRep::Far };
        if desired == self.rep {
            false
        } else {
            self.rep = desired;
            true
        }
    }

    /// Drift, spin, and pulse when the camera is far out; snap back to the
    /// rest pose when it comes inside the freeze distance.
    pub fn animate(&mut self, time: f64, camera_origin_distance: f32) {
        if camera_origin_distance <= FREEZE_DISTANCE {
            self.position = self.anchor;
            self.rotation = self.base_rotation;
            self.scale = self.anim.base_scale;
            return;
        }
        let t = time as f32;
        self.position.y =
            self.anchor.y + (t * self.anim.float_speed).sin() * self.anim.float_amplitude;
        self.rotation += self.anim.rotation_rate;
        self.scale = self.anim.base_scale * ((t * self.anim.pulse_speed).sin() * 0.2 + 1.0);
    }

    /// Model transform for the active representation.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(
                glam::EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            self.position,
        )
    }
}

/// Build every photo cluster plus its perpendicular twin. Clusters reuse the
/// spiral-arm distribution but reject the inner radius entirely, then get
/// recentered on their centroid so they float as a unit.
pub fn build_photo_clouds(
    images: &[String],
    params: &GalaxyParams,
    rng: &mut impl Rng,
) -> Vec<PhotoCloud> {
    let per_cluster = {
        let density = points_per_cluster(images.len());
        if density * images.len() > params.count {
            params.count / images.len().max(1)
        } else {
            density
        }
    };
    log::info!(
        "building {} photo clusters at {} points each",
        images.len(),
        per_cluster
    );

    let mut clouds = Vec::with_capacity(images.len() * 2);
    for (group, image) in images.iter().enumerate() {
        let mut points = Vec::with_capacity(per_cluster);
        let mut near_colors = Vec::with_capacity(per_cluster);
        let mut far_colors = Vec::with_capacity(per_cluster);
        for i in 0..per_cluster {
            let (pos, radius) = arm_point(params, group * per_cluster + i, rng);
            if radius < 30.0 {
                continue;
            }
            points.push(pos);
            near_colors.push([1.0, 1.0, 1.0]);
            let graded = lerp3(params.inside_color, params.outside_color, radius / params.radius);
            let gain = 0.7 + 0.3 * rng.gen::<f32>();
            far_colors.push([graded[0] * gain, graded[1] * gain, graded[2] * gain]);
        }
        if points.is_empty() {
            continue;
        }

        let centroid = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        for p in &mut points {
            *p -= centroid;
        }

        let anim = CloudAnim {
            float_speed: rng.gen::<f32>() * 0.02 + 0.01,
            float_amplitude: rng.gen::<f32>() * 2.0 + 1.0,
            rotation_rate: Vec3::new(
                (rng.gen::<f32>() - 0.5) * 0.01,
                (rng.gen::<f32>() - 0.5) * 0.01,
                (rng.gen::<f32>() - 0.5) * 0.01,
            ),
            pulse_speed: rng.gen::<f32>() * 0.03 + 0.02,
            base_scale: 1.0,
        };

        let primary = PhotoCloud {
            anchor: centroid,
            points,
            near_colors,
            far_colors,
            rep: LodRep::Far,
            position: centroid,
            base_rotation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            image: image.clone(),
            anim,
        };
        // Perpendicular twin sharing geometry and animation parameters.
        let mut twin = primary.clone();
        twin.base_rotation = Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        twin.rotation = twin.base_rotation;
        clouds.push(primary);
        clouds.push(twin);
    }
    clouds
}
