//! Per-frame lifecycle management for every live effect.
//!
//! Three collections, one owner each: ambient bursts (fireworks, confetti,
//! sparkles, banners), floating hearts, and shooting stars. An entity is
//! removed only inside its own collection's update pass, on the exact frame
//! its termination predicate fires. Two spawn paths keep density roughly
//! stationary without a fixed pool: an expiry-triggered respawn chain, and an
//! independent ambient roll whose rates rise while the camera is roomed out.

use rand::Rng;

use crate::constants::*;
use crate::effects::{self, EffectData, EffectEntity, EffectKind};

#[derive(Default)]
pub struct EffectSystem {
    pub ambient: Vec<EffectEntity>,
    pub hearts: Vec<EffectEntity>,
    pub stars: Vec<EffectEntity>,
    /// Spaceships and aliens. Persistent, never expire, capped per kind.
    pub visitors: Vec<EffectEntity>,
}

impl EffectSystem {
    /// Populate the startup state: a dense heart field, one shooting star,
    /// and the initial visitor flotilla.
    pub fn seed(&mut self, rng: &mut impl Rng) {
        self.hearts
            .extend((0..HEART_SEED_COUNT).map(|_| effects::floating_heart(rng)));
        self.stars.push(effects::shooting_star(rng));
        self.visitors
            .extend((0..SPACESHIP_SEED_COUNT).map(|_| effects::spaceship(rng)));
        self.visitors
            .extend((0..ALIEN_SEED_COUNT).map(|_| effects::alien(rng)));
        log::debug!(
            "seeded {} hearts, {} shooting stars, {} visitors",
            self.hearts.len(),
            self.stars.len(),
            self.visitors.len()
        );
    }

    pub fn live_count(&self) -> usize {
        self.ambient.len() + self.hearts.len() + self.stars.len() + self.visitors.len()
    }

    /// Advance every live entity by one frame and run both spawn paths.
    pub fn update(&mut self, time: f64, room_out: bool, rng: &mut impl Rng) {
        self.update_ambient(time, rng);
        self.update_hearts(time, rng);
        self.update_stars(time, rng);
        self.update_visitors(time, rng);
        self.ambient_spawns(room_out, rng);
    }

    fn update_ambient(&mut self, time: f64, rng: &mut impl Rng) {
        let mut respawned: Vec<EffectEntity> = Vec::new();
        let mut i = 0;
        while i < self.ambient.len() {
            let entity = &mut self.ambient[i];
            effects::step_effect(entity, time);
            if entity.expired() {
                self.ambient.swap_remove(i);
                if let Some(replacement) = respawn_roll(rng) {
                    respawned.push(replacement);
                }
                continue;
            }
            i += 1;
        }
        self.ambient.append(&mut respawned);
    }

    fn update_hearts(&mut self, time: f64, rng: &mut impl Rng) {
        let mut i = 0;
        while i < self.hearts.len() {
            let heart = &mut self.hearts[i];
            effects::step_effect(heart, time);
            if heart.expired() {
                self.hearts.swap_remove(i);
                continue;
            }
            i += 1;
        }
        if self.hearts.len() < HEART_CAP && rng.gen::<f32>() < HEART_SPAWN_RATE {
            self.hearts.push(effects::floating_heart(rng));
        }
    }

    fn update_stars(&mut self, time: f64, rng: &mut impl Rng) {
        let mut i = 0;
        while i < self.stars.len() {
            let star = &mut self.stars[i];
            effects::step_effect(star, time);
            if star.expired() {
                self.stars.swap_remove(i);
                continue;
            }
            i += 1;
        }
        if self.stars.len() < STAR_CAP && rng.gen::<f32>() < STAR_SPAWN_RATE {
            self.stars.push(effects::shooting_star(rng));
        }
    }

    fn update_visitors(&mut self, time: f64, rng: &mut impl Rng) {
        for visitor in &mut self.visitors {
            effects::step_effect(visitor, time);
        }
        if self.count_of(EffectKind::Spaceship) < SPACESHIP_CAP
            && rng.gen::<f32>() < SPACESHIP_SPAWN_RATE
        {
            self.visitors.push(effects::spaceship(rng));
        }
        if self.count_of(EffectKind::Alien) < ALIEN_CAP && rng.gen::<f32>() < ALIEN_SPAWN_RATE {
            self.visitors.push(effects::alien(rng));
        }
    }

    /// Independent per-frame spawn rolls; push-only, never blocking.
    fn ambient_spawns(&mut self, room_out: bool, rng: &mut impl Rng) {
        let idx = usize::from(room_out);
        if rng.gen::<f32>() < FIREWORK_RATES[idx] {
            self.ambient.push(effects::firework(rng));
        }
        if rng.gen::<f32>() < CONFETTI_RATES[idx] {
            self.ambient.push(effects::confetti(rng));
        }
        if rng.gen::<f32>() < SPARKLE_RATES[idx] {
            self.ambient.push(effects::sparkle(rng));
        }
        if rng.gen::<f32>() < BANNER_RATES[idx] {
            self.ambient.push(effects::banner(rng));
        }
    }

    pub fn count_of(&self, kind: EffectKind) -> usize {
        let bucket: &[EffectEntity] = match kind {
            EffectKind::FloatingHeart => &self.hearts,
            EffectKind::ShootingStar => &self.stars,
            EffectKind::Spaceship | EffectKind::Alien => &self.visitors,
            _ => &self.ambient,
        };
        bucket.iter().filter(|e| e.kind() == kind).count()
    }
}

/// Expiry-triggered replacement, rolled as an ordered chain so at most one
/// entity replaces the one that just left.
fn respawn_roll(rng: &mut impl Rng) -> Option<EffectEntity> {
    if rng.gen::<f32>() < RESPAWN_FIREWORK {
        Some(effects::firework(rng))
    } else if rng.gen::<f32>() < RESPAWN_CONFETTI {
        Some(effects::confetti(rng))
    } else if rng.gen::<f32>() < RESPAWN_SPARKLE {
        Some(effects::sparkle(rng))
    } else if rng.gen::<f32>() < RESPAWN_BANNER {
        Some(effects::banner(rng))
    } else {
        None
    }
}

/// True when the entity still drives per-child kinematics, used by frontends
/// to skip drawing fully faded bursts.
pub fn is_visible(entity: &EffectEntity) -> bool {
    match &entity.data {
        EffectData::Heart(h) => h.opacity > 0.0,
        EffectData::ShootingStar(s) => s.arc <= 1.0,
        _ => entity.age < entity.max_age,
    }
}
