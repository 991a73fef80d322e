use glam::Vec3;

// Shared tuning constants for the simulation. Frame-rate dependent values
// assume the nominal 60 fps tick the frontends drive.

// Scene layout
pub const PLANET_RADIUS: f32 = 10.0;
pub const CAMERA_START: [f32; 3] = [0.0, 20.0, 30.0]; // pre-intro eye position
pub const STARFIELD_COUNT: usize = 20_000;
pub const STARFIELD_EXTENT: f32 = 900.0; // cube edge length
pub const STARFIELD_IDLE_FRACTION: f32 = 0.1; // draw range before the intro
pub const NEBULA_COUNT: usize = 15;
pub const NEBULA_SPREAD: f32 = 175.0;

// Level of detail
pub const LOD_NEAR_DISTANCE: f32 = 10.0; // any point closer => near representation
pub const FREEZE_DISTANCE: f32 = 80.0; // camera within this of origin => rest pose

// Ambient spawn probabilities per frame (idle, room-out)
pub const FIREWORK_RATES: [f32; 2] = [0.005, 0.015];
pub const CONFETTI_RATES: [f32; 2] = [0.003, 0.01];
pub const SPARKLE_RATES: [f32; 2] = [0.002, 0.008];
pub const BANNER_RATES: [f32; 2] = [0.02, 0.03];

// Expiry-triggered respawn chain, rolled in order
pub const RESPAWN_FIREWORK: f32 = 0.15;
pub const RESPAWN_CONFETTI: f32 = 0.15;
pub const RESPAWN_SPARKLE: f32 = 0.15;
pub const RESPAWN_BANNER: f32 = 0.25;

// Per-kind lifetimes in frames
pub const FIREWORK_MAX_AGE: u32 = 300;
pub const CONFETTI_MAX_AGE: u32 = 350;
pub const SPARKLE_MAX_AGE: u32 = 500;
pub const BANNER_MAX_AGE: u32 = 400;
pub const HEART_MIN_AGE: u32 = 2000;
pub const HEART_MAX_AGE: u32 = 5000;

// Per-frame gravity applied to the vertical velocity component
pub const FIREWORK_GRAVITY: f32 = 0.02;
pub const CONFETTI_GRAVITY: f32 = 0.015;
pub const BANNER_GRAVITY: f32 = 0.01;

// Floating hearts
pub const HEART_CAP: usize = 2000;
pub const HEART_SEED_COUNT: usize = 1200;
pub const HEART_SPAWN_RATE: f32 = 0.1;
pub const HEART_BOUND: f32 = 400.0; // reflection wall per axis
pub const HEART_FADE_FRACTION: f32 = 0.8; // fade out past this fraction of max_age

// Visiting spaceships and aliens: persistent, bounded, capped
pub const SPACESHIP_CAP: usize = 8;
pub const SPACESHIP_SEED_COUNT: usize = 4;
pub const SPACESHIP_SPAWN_RATE: f32 = 0.005;
pub const SPACESHIP_BOUND: f32 = 300.0;
pub const ALIEN_CAP: usize = 6;
pub const ALIEN_SEED_COUNT: usize = 3;
pub const ALIEN_SPAWN_RATE: f32 = 0.003;
pub const ALIEN_BOUND: f32 = 250.0;

// Shooting stars
pub const STAR_CAP: usize = 3;
pub const STAR_SPAWN_RATE: f32 = 0.02;
pub const STAR_TRAIL_LENGTH: usize = 100;
pub const STAR_TRAIL_SPACING: f32 = 0.01; // arc-parameter gap between trail samples
pub const STAR_ENVELOPE_FRAMES: u32 = 300; // opacity envelope, not a removal condition
pub const STAR_RAMP_FRAMES: u32 = 30;

// Camera tour
pub const TOUR_APPROACH_LEGS: [f32; 3] = [0.4, 0.8, 0.6];
pub const TOUR_APPROACH_STEP: f32 = 0.0008;
pub const TOUR_APPROACH_END: [f32; 3] = [-40.0, 100.0, 100.0];
pub const TOUR_MID_Z: f32 = 160.0; // second waypoint depth during the approach
pub const TOUR_ROOM_OUT_POS: [f32; 3] = [0.0, 40.0, 180.0];
pub const TOUR_ROOM_OUT_DURATION: f32 = 0.8;
pub const TOUR_ROOM_OUT_FLAG_AT: f32 = 0.05; // eased progress that raises room_out
pub const TOUR_ROOM_IN_POS: [f32; 3] = [-1.272_258_5, 0.628_708_85, 40.0];
pub const TOUR_ROOM_IN_TARGET: [f32; 3] = [0.0, 10.0, 0.0];
pub const TOUR_ROOM_IN_DURATION: f32 = 0.7;
pub const TOUR_EASED_STEP: f32 = 0.0015; // room-out and room-in increment

// Gifts
pub const GIFT_COUNT: usize = 3;
pub const GIFT_SLOT_DEGREES: f32 = 120.0;
pub const GIFT_SPAWN_DELAY_SEC: f64 = 2.0; // after the tour completes
pub const GIFT_SPAWN_STAGGER_SEC: f64 = 0.3;
pub const GIFT_REMOVE_DELAY_SEC: f64 = 1.0; // after a successful open
pub const GIFT_FLASH_SEC: f64 = 0.2;
pub const GIFT_FOLLOW_UP_DELAY_SEC: f64 = 6.5;
pub const GIFT_PICK_RADIUS: f32 = 4.0; // bounding sphere for ray tests

// Global fade once the intro starts
pub const FADE_START: f32 = 0.1;
pub const FADE_STEP: f32 = 0.025;

// Idle orbit
pub const AUTO_ROTATE_RAD_PER_FRAME: f32 = 0.000_87; // ~0.5 deg/s at 60 fps

// Room-out audio chirp
pub const CHIRP_RATE: f32 = 0.005;
pub const CHIRP_START_HZ: f32 = 800.0;
pub const CHIRP_END_HZ: f32 = 200.0;
pub const CHIRP_SECONDS: f32 = 0.3;

#[inline]
pub fn camera_start_vec3() -> Vec3 {
    Vec3::from(CAMERA_START)
}
