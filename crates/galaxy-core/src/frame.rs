//! The per-frame entry point: one `Galaxy` owns every manager and advances
//! them in a fixed order.
//!
//! Frontends call `frame` once per animation tick with the wall clock in
//! seconds, feed pointer clicks through `click`, and drain popup requests
//! after each frame. Nothing here blocks; spawning is push-only.

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::cloud::{
    build_photo_clouds, generate_galaxy, generate_nebulae, generate_starfield, GalaxyParams,
    NebulaSprite, PhotoCloud, PointSet,
};
use crate::constants::*;
use crate::gifts::{GiftSystem, PopupRequest};
use crate::lifecycle::EffectSystem;
use crate::music::{MusicBackend, MusicManager, NullBackend};
use crate::pick::{ray_sphere, screen_to_world_ray};
use crate::planet::{build_text_rings, HintIcon, Planet, TextRing};
use crate::state::{Camera, OrbitState, SceneFlags};
use crate::tour::{CameraTour, TourEvent};

/// Scene inputs the embedder can override. The defaults mirror the fixed
/// local asset list used when no external data is supplied.
#[derive(Clone, Debug)]
pub struct GalaxyConfig {
    pub images: Vec<String>,
    pub ring_texts: Vec<String>,
    pub seed: u64,
    pub galaxy: GalaxyParams,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            images: (1..=6).map(|i| format!("image/{i}.jpg")).collect(),
            ring_texts: vec![
                "HAPPY BIRTHDAY".to_string(),
                "SHINE BRIGHT TONIGHT".to_string(),
                "MAKE A WISH".to_string(),
                "FOREVER YOUNG".to_string(),
            ],
            seed: 42,
            galaxy: GalaxyParams::default(),
        }
    }
}

/// The whole simulation. All state lives here; there are no globals.
pub struct Galaxy {
    pub flags: SceneFlags,
    pub camera: Camera,
    pub orbit: OrbitState,
    pub effects: EffectSystem,
    pub gifts: GiftSystem,
    pub tour: CameraTour,
    pub planet: Planet,
    pub rings: Vec<TextRing>,
    pub hint: HintIcon,
    pub galaxy_points: PointSet,
    pub clouds: Vec<PhotoCloud>,
    pub starfield: Vec<Vec3>,
    pub nebulae: Vec<NebulaSprite>,
    pub music: MusicManager,
    rng: StdRng,
    popups: Vec<PopupRequest>,
    /// Deadlines for the staggered gift drops scheduled after the tour.
    gift_spawns: SmallVec<[f64; 4]>,
}

impl Galaxy {
    pub fn new(config: GalaxyConfig, music: Box<dyn MusicBackend>) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let galaxy_points = generate_galaxy(&config.galaxy, &mut rng);
        let clouds = build_photo_clouds(&config.images, &config.galaxy, &mut rng);
        let starfield = generate_starfield(STARFIELD_COUNT, STARFIELD_EXTENT, &mut rng);
        let nebulae = generate_nebulae(NEBULA_COUNT, NEBULA_SPREAD, &mut rng);
        let mut effects = EffectSystem::default();
        effects.seed(&mut rng);
        log::info!(
            "scene built: {} galaxy points, {} photo clouds, {} stars",
            galaxy_points.positions.len(),
            clouds.len(),
            starfield.len()
        );
        Self {
            flags: SceneFlags::default(),
            camera: Camera::default(),
            orbit: OrbitState::default(),
            effects,
            gifts: GiftSystem::default(),
            tour: CameraTour::default(),
            planet: Planet::default(),
            rings: build_text_rings(&config.ring_texts),
            hint: HintIcon::default(),
            galaxy_points,
            clouds,
            starfield,
            nebulae,
            music: MusicManager::new(music),
            rng,
            popups: Vec::new(),
            gift_spawns: SmallVec::new(),
        }
    }

    /// Simulation without an audio device, for tests and headless runs.
    pub fn headless(config: GalaxyConfig) -> Self {
        Self::new(config, Box::<NullBackend>::default())
    }

    /// Fraction of the starfield buffer the renderer should draw.
    pub fn starfield_draw_fraction(&self) -> f32 {
        if self.flags.intro_started {
            1.0
        } else {
            STARFIELD_IDLE_FRACTION
        }
    }

    /// Advance one frame. `time` is wall-clock seconds from any monotonic
    /// origin; only deltas and scheduled deadlines depend on it.
    pub fn frame(&mut self, time: f64) {
        self.hint.update(time);
        self.planet.update(time);

        let cam_origin_dist = self.camera.eye.length();
        for cloud in &mut self.clouds {
            cloud.animate(time, cam_origin_dist);
        }

        self.effects
            .update(time, self.flags.room_out, &mut self.rng);

        self.gifts.update(time, &mut self.popups);

        for ring in &mut self.rings {
            ring.update(time);
        }

        if self.tour.active() {
            if let Some(TourEvent::Finished) = self.tour.step(&mut self.camera) {
                self.orbit.enabled = true;
                self.orbit.target = self.camera.target;
                for i in 0..GIFT_COUNT {
                    self.gift_spawns
                        .push(time + GIFT_SPAWN_DELAY_SEC + i as f64 * GIFT_SPAWN_STAGGER_SEC);
                }
            }
            self.flags.room_out = self.tour.room_out;
        } else if self.orbit.enabled && self.orbit.auto_rotate {
            let spin = Quat::from_rotation_y(AUTO_ROTATE_RAD_PER_FRAME);
            self.camera.eye = self.orbit.target + spin * (self.camera.eye - self.orbit.target);
        }

        if self.flags.room_out && self.rng.gen::<f32>() < CHIRP_RATE {
            self.music.chirp();
        }

        self.flags.step_fade();

        let eye = self.camera.eye;
        for cloud in &mut self.clouds {
            cloud.update_lod(eye);
        }

        let due: SmallVec<[f64; 4]> = {
            let mut due = SmallVec::new();
            self.gift_spawns.retain(|&mut deadline| {
                if deadline <= time {
                    due.push(deadline);
                    false
                } else {
                    true
                }
            });
            due
        };
        for _ in due {
            self.gifts.spawn(&mut self.rng);
        }
    }

    /// Resolve a pointer click. Before the intro the only target is the
    /// planet; afterwards, gifts first, photo clusters second.
    pub fn click(&mut self, sx: f32, sy: f32, width: f32, height: f32, now: f64) {
        self.camera.aspect = width / height.max(1.0);
        let (ro, rd) = screen_to_world_ray(&self.camera, sx, sy, width, height);

        if !self.flags.intro_started {
            if ray_sphere(ro, rd, Vec3::ZERO, self.planet.radius).is_some() {
                self.start_intro();
            }
            return;
        }

        let mut best: Option<(f32, u32)> = None;
        for gift in self.gifts.iter() {
            if let Some(t) = ray_sphere(ro, rd, gift.position, GIFT_PICK_RADIUS) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, gift.id));
                }
            }
        }
        if let Some((_, id)) = best {
            if let Some(popup) = self.gifts.click(id, now) {
                self.popups.push(popup);
            }
            return;
        }

        if self.orbit.enabled {
            for cloud in &self.clouds {
                if ray_sphere(ro, rd, cloud.position, 10.0).is_some() {
                    self.orbit.target = cloud.position;
                    self.camera.target = cloud.position;
                    log::debug!("orbit retargeted to photo cluster at {:?}", cloud.position);
                    break;
                }
            }
        }
    }

    fn start_intro(&mut self) {
        self.flags.intro_started = true;
        self.hint.dismiss();
        self.music.start();
        self.tour.begin(&self.camera);
        log::info!("intro started");
    }

    /// Accept button of a dual-button popup. Tokens are single-use.
    pub fn accept_popup(&mut self, token: u32, now: f64) {
        if let Some(popup) = self.gifts.accept(token, now) {
            self.popups.push(popup);
        }
    }

    /// Popup requests produced since the last drain, in emission order.
    pub fn drain_popups(&mut self) -> Vec<PopupRequest> {
        std::mem::take(&mut self.popups)
    }
}
