//! Transient visual effects and their pure factories.
//!
//! Every effect is a tagged variant carrying only the fields its kind needs,
//! dispatched by exhaustive matching. Factories take an RNG and return a fully
//! configured entity; inserting it into a live collection is the caller's job.

use glam::Vec3;
use rand::Rng;

use crate::constants::*;
use crate::curve::{random_star_curve, CubicBezier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Firework,
    Confetti,
    Sparkle,
    FloatingHeart,
    ShootingStar,
    Banner,
    Spaceship,
    Alien,
}

/// One firework spark.
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: [f32; 3],
    pub opacity: f32,
}

/// One confetti flake: a flat quad with a per-axis spin rate.
#[derive(Clone, Debug)]
pub struct Flake {
    pub position: Vec3,
    pub velocity: Vec3,
    pub spin: Vec3,
    pub rotation: Vec3,
    pub color: [f32; 3],
    pub opacity: f32,
}

/// One sparkle mote with a pulse-phase offset so motes twinkle out of step.
#[derive(Clone, Debug)]
pub struct Mote {
    pub position: Vec3,
    pub velocity: Vec3,
    pub pulse_phase: f32,
    pub color: [f32; 3],
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct HeartState {
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub rotation_rate: Vec3,
    pub float_speed: f32,
    pub float_amplitude: f32,
    pub pulse_speed: f32,
    pub base_scale: f32,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct StarState {
    pub curve: CubicBezier,
    pub arc: f32,
    pub speed: f32,
    pub trail: Vec<Vec3>,
    pub head_opacity: f32,
}

/// A visiting ship drifting inside its flight box.
#[derive(Clone, Debug)]
pub struct SpaceshipState {
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub rotation_rate: Vec3,
    pub engine_glow: f32,
}

/// A waving alien bobbing on its float oscillator.
#[derive(Clone, Debug)]
pub struct AlienState {
    pub velocity: Vec3,
    pub float_speed: f32,
    pub float_amplitude: f32,
    pub wave_speed: f32,
    pub wave_angle: f32,
}

#[derive(Clone, Debug)]
pub struct BannerState {
    pub velocity: Vec3,
    pub roll: f32,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub enum EffectData {
    Firework(Vec<Particle>),
    Confetti(Vec<Flake>),
    Sparkle(Vec<Mote>),
    Heart(HeartState),
    ShootingStar(StarState),
    Banner(BannerState),
    Spaceship(SpaceshipState),
    Alien(AlienState),
}

/// A transient visual actor. `age` increases by exactly one per frame and is
/// written only inside [`step_effect`]; composite kinds share the parent's
/// age and lifetime.
#[derive(Clone, Debug)]
pub struct EffectEntity {
    pub position: Vec3,
    pub age: u32,
    pub max_age: u32,
    pub data: EffectData,
}

impl EffectEntity {
    pub fn kind(&self) -> EffectKind {
        match &self.data {
            EffectData::Firework(_) => EffectKind::Firework,
            EffectData::Confetti(_) => EffectKind::Confetti,
            EffectData::Sparkle(_) => EffectKind::Sparkle,
            EffectData::Heart(_) => EffectKind::FloatingHeart,
            EffectData::ShootingStar(_) => EffectKind::ShootingStar,
            EffectData::Banner(_) => EffectKind::Banner,
            EffectData::Spaceship(_) => EffectKind::Spaceship,
            EffectData::Alien(_) => EffectKind::Alien,
        }
    }

    /// Whether the generic age-based termination applies and has been hit.
    /// Shooting stars terminate on their arc parameter instead; spaceships
    /// and aliens never expire, they just bounce inside their box.
    pub fn expired(&self) -> bool {
        match &self.data {
            EffectData::ShootingStar(star) => star.arc > 1.0,
            EffectData::Spaceship(_) | EffectData::Alien(_) => false,
            _ => self.age >= self.max_age,
        }
    }
}

#[inline]
fn centered(rng: &mut impl Rng, spread: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * spread
}

/// Standard HSL to RGB, hue in `[0, 1)`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h * 6.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m]
}

/// A burst of 25 sparks with upward-biased velocities, spawned high above the
/// galaxy plane.
pub fn firework(rng: &mut impl Rng) -> EffectEntity {
    let center = Vec3::new(
        centered(rng, 200.0),
        rng.gen::<f32>() * 100.0 + 50.0,
        centered(rng, 200.0),
    );
    let children = (0..25)
        .map(|_| Particle {
            position: center + Vec3::new(centered(rng, 50.0), centered(rng, 50.0), centered(rng, 50.0)),
            velocity: Vec3::new(centered(rng, 2.0), rng.gen::<f32>() * 3.0 + 1.0, centered(rng, 2.0)),
            color: hsl_to_rgb(rng.gen::<f32>(), 1.0, 0.5),
            opacity: 1.0,
        })
        .collect();
    EffectEntity {
        position: center,
        age: 0,
        max_age: FIREWORK_MAX_AGE,
        data: EffectData::Firework(children),
    }
}

/// 50 falling flakes with random per-axis spin.
pub fn confetti(rng: &mut impl Rng) -> EffectEntity {
    let center = Vec3::new(
        centered(rng, 200.0),
        rng.gen::<f32>() * 100.0 + 50.0,
        centered(rng, 200.0),
    );
    let children = (0..50)
        .map(|_| Flake {
            position: center + Vec3::new(centered(rng, 40.0), centered(rng, 40.0), centered(rng, 40.0)),
            velocity: Vec3::new(
                centered(rng, 0.5),
                -(rng.gen::<f32>() * 0.3 + 0.1),
                centered(rng, 0.5),
            ),
            spin: Vec3::new(
                rng.gen::<f32>() * 0.1,
                rng.gen::<f32>() * 0.1,
                rng.gen::<f32>() * 0.1,
            ),
            rotation: Vec3::ZERO,
            color: hsl_to_rgb(rng.gen::<f32>(), 1.0, 0.6),
            opacity: 0.8,
        })
        .collect();
    EffectEntity {
        position: center,
        age: 0,
        max_age: CONFETTI_MAX_AGE,
        data: EffectData::Confetti(children),
    }
}

/// 40 twinkling motes drifting isotropically.
pub fn sparkle(rng: &mut impl Rng) -> EffectEntity {
    let center = Vec3::new(centered(rng, 200.0), centered(rng, 200.0), centered(rng, 200.0));
    let children = (0..40)
        .map(|_| Mote {
            position: center + Vec3::new(centered(rng, 60.0), centered(rng, 60.0), centered(rng, 60.0)),
            velocity: Vec3::new(centered(rng, 0.3), centered(rng, 0.3), centered(rng, 0.3)),
            pulse_phase: rng.gen::<f32>() * std::f32::consts::TAU,
            color: hsl_to_rgb(rng.gen::<f32>() * 0.1 + 0.5, 1.0, 0.8),
            opacity: 1.0,
        })
        .collect();
    EffectEntity {
        position: center,
        age: 0,
        max_age: SPARKLE_MAX_AGE,
        data: EffectData::Sparkle(children),
    }
}

/// A single drifting heart sprite with float and pulse oscillators.
pub fn floating_heart(rng: &mut impl Rng) -> EffectEntity {
    let scale = 4.0 + rng.gen::<f32>() * 4.0;
    EffectEntity {
        position: Vec3::new(centered(rng, 800.0), centered(rng, 800.0), centered(rng, 800.0)),
        age: 0,
        max_age: HEART_MIN_AGE + rng.gen_range(0..(HEART_MAX_AGE - HEART_MIN_AGE)),
        data: EffectData::Heart(HeartState {
            velocity: Vec3::new(centered(rng, 0.2), centered(rng, 0.2), centered(rng, 0.2)),
            rotation: Vec3::ZERO,
            rotation_rate: Vec3::new(centered(rng, 0.01), centered(rng, 0.01), centered(rng, 0.01)),
            float_speed: rng.gen::<f32>() * 0.01 + 0.005,
            float_amplitude: rng.gen::<f32>() * 0.3 + 0.2,
            pulse_speed: rng.gen::<f32>() * 0.015 + 0.01,
            base_scale: scale,
            scale,
            opacity: 1.0,
        }),
    }
}

/// A head sprite swept along a random Bezier curve, trailing a polyline that
/// resamples the curve behind the head every frame.
pub fn shooting_star(rng: &mut impl Rng) -> EffectEntity {
    let curve = random_star_curve(rng);
    let trail = (0..STAR_TRAIL_LENGTH)
        .map(|i| curve.point(i as f32 / (STAR_TRAIL_LENGTH - 1) as f32))
        .collect();
    let head = curve.point(0.0);
    EffectEntity {
        position: head,
        age: 0,
        max_age: STAR_ENVELOPE_FRAMES,
        data: EffectData::ShootingStar(StarState {
            curve,
            arc: 0.0,
            speed: 0.001 + rng.gen::<f32>() * 0.001,
            trail,
            head_opacity: 0.0,
        }),
    }
}

/// A celebratory text plane that rises with a slight gravity bias.
pub fn banner(rng: &mut impl Rng) -> EffectEntity {
    EffectEntity {
        position: Vec3::new(
            centered(rng, 150.0),
            rng.gen::<f32>() * 80.0 + 20.0,
            centered(rng, 150.0),
        ),
        age: 0,
        max_age: BANNER_MAX_AGE,
        data: EffectData::Banner(BannerState {
            velocity: Vec3::new(0.0, 0.5, 0.0),
            roll: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }),
    }
}

/// A ship drifting through a ±300 box with a pulsing engine glow.
pub fn spaceship(rng: &mut impl Rng) -> EffectEntity {
    EffectEntity {
        position: Vec3::new(centered(rng, 600.0), centered(rng, 600.0), centered(rng, 600.0)),
        age: 0,
        max_age: u32::MAX,
        data: EffectData::Spaceship(SpaceshipState {
            velocity: Vec3::new(centered(rng, 0.3), centered(rng, 0.3), centered(rng, 0.3)),
            rotation: Vec3::ZERO,
            rotation_rate: Vec3::new(
                centered(rng, 0.02),
                centered(rng, 0.02),
                centered(rng, 0.02),
            ),
            engine_glow: 0.7,
        }),
    }
}

/// A waving alien drifting through a ±250 box.
pub fn alien(rng: &mut impl Rng) -> EffectEntity {
    EffectEntity {
        position: Vec3::new(centered(rng, 500.0), centered(rng, 500.0), centered(rng, 500.0)),
        age: 0,
        max_age: u32::MAX,
        data: EffectData::Alien(AlienState {
            velocity: Vec3::new(centered(rng, 0.2), centered(rng, 0.2), centered(rng, 0.2)),
            float_speed: rng.gen::<f32>() * 0.01 + 0.005,
            float_amplitude: rng.gen::<f32>() + 0.5,
            wave_speed: rng.gen::<f32>() * 0.02 + 0.01,
            wave_angle: 0.0,
        }),
    }
}

/// Advance one entity by one frame: bump its age, then apply kind-specific
/// kinematics. Removal is the owning collection's job.
pub fn step_effect(entity: &mut EffectEntity, time: f64) {
    entity.age += 1;
    let t = time as f32;
    let life_ratio = entity.age as f32 / entity.max_age as f32;
    match &mut entity.data {
        EffectData::Firework(children) => {
            let color = hsl_to_rgb(t * 0.5 + entity.age as f32 * 0.1, 1.0, 0.5);
            for p in children {
                p.position += p.velocity;
                p.velocity.y -= FIREWORK_GRAVITY;
                p.opacity = 1.0 - life_ratio;
                p.color = color;
            }
        }
        EffectData::Confetti(children) => {
            for f in children {
                f.position += f.velocity;
                f.velocity.y -= CONFETTI_GRAVITY;
                f.rotation += f.spin;
                f.opacity = 0.8 * (1.0 - life_ratio);
            }
        }
        EffectData::Sparkle(children) => {
            for m in children {
                m.position += m.velocity;
                m.opacity = ((t * 4.0 + m.pulse_phase).sin() * 0.5 + 0.5) * (1.0 - life_ratio);
                m.color = hsl_to_rgb(t * 0.3 + m.pulse_phase, 1.0, 0.8);
            }
        }
        EffectData::Heart(heart) => {
            entity.position += heart.velocity;
            heart.rotation += heart.rotation_rate;
            entity.position.y += (t * heart.float_speed).sin() * heart.float_amplitude * 0.01;
            heart.scale = heart.base_scale * ((t * heart.pulse_speed).sin() * 0.2 + 1.0);
            if life_ratio > HEART_FADE_FRACTION {
                heart.opacity =
                    1.0 - (life_ratio - HEART_FADE_FRACTION) / (1.0 - HEART_FADE_FRACTION);
            }
            // Bounded reflection, each axis independently.
            for axis in 0..3 {
                if entity.position[axis].abs() > HEART_BOUND {
                    heart.velocity[axis] = -heart.velocity[axis];
                }
            }
        }
        EffectData::ShootingStar(star) => {
            star.arc += star.speed;
            if star.arc > 1.0 {
                return; // expired; the collection removes it this frame
            }
            let head = star.curve.point(star.arc);
            entity.position = head;
            star.trail[0] = head;
            for j in 1..star.trail.len() {
                let back = (star.arc - j as f32 * STAR_TRAIL_SPACING).max(0.0);
                star.trail[j] = star.curve.point(back);
            }
            // Fade in over the first 30 frames, out over the last 30 of the
            // envelope; the envelope does not terminate the star.
            let age = entity.age;
            star.head_opacity = if age < STAR_RAMP_FRAMES {
                age as f32 / STAR_RAMP_FRAMES as f32
            } else if age > STAR_ENVELOPE_FRAMES.saturating_sub(STAR_RAMP_FRAMES) {
                (STAR_ENVELOPE_FRAMES.saturating_sub(age) as f32) / STAR_RAMP_FRAMES as f32
            } else {
                1.0
            }
            .clamp(0.0, 1.0);
        }
        EffectData::Spaceship(ship) => {
            entity.position += ship.velocity;
            ship.rotation += ship.rotation_rate;
            ship.engine_glow = (t * 10.0).sin() * 0.3 + 0.7;
            for axis in 0..3 {
                if entity.position[axis].abs() > SPACESHIP_BOUND {
                    ship.velocity[axis] = -ship.velocity[axis];
                }
            }
        }
        EffectData::Alien(alien) => {
            entity.position += alien.velocity;
            entity.position.y +=
                (t * alien.float_speed).sin() * alien.float_amplitude * 0.01;
            alien.wave_angle = (t * alien.wave_speed).sin() * 0.3;
            for axis in 0..3 {
                if entity.position[axis].abs() > ALIEN_BOUND {
                    alien.velocity[axis] = -alien.velocity[axis];
                }
            }
        }
        EffectData::Banner(b) => {
            entity.position += b.velocity;
            b.velocity.y -= BANNER_GRAVITY;
            b.roll = (t * 2.0).sin() * 0.1;
            b.scale = 1.0 + (t * 3.0).sin() * 0.1;
            b.opacity = 1.0 - life_ratio;
        }
    }
}
