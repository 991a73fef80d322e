// End-to-end runs of the frame driver: intro click, the full camera tour,
// gift scheduling, and the global fade.

use galaxy_core::constants::{
    STARFIELD_COUNT, STARFIELD_IDLE_FRACTION, TOUR_APPROACH_END, TOUR_ROOM_IN_POS,
    TOUR_ROOM_IN_TARGET,
};
use galaxy_core::tour::TourPhase;
use galaxy_core::{Galaxy, GalaxyConfig};
use glam::Vec3;

fn small_config() -> GalaxyConfig {
    // Trim the point budget so tour-length runs stay quick.
    let mut config = GalaxyConfig::default();
    config.galaxy.count = 2_000;
    config.images = vec!["image/1.jpg".to_string(), "image/2.jpg".to_string()];
    config
}

/// Drive frames at a nominal 60 fps until the predicate holds.
fn run_until(
    galaxy: &mut Galaxy,
    start_frame: &mut u64,
    cap: u64,
    pred: impl Fn(&Galaxy) -> bool,
) {
    for _ in 0..cap {
        if pred(galaxy) {
            return;
        }
        *start_frame += 1;
        galaxy.frame(*start_frame as f64 / 60.0);
    }
    panic!("predicate not reached within {cap} frames");
}

#[test]
fn clicking_the_planet_starts_the_intro_once() {
    let mut galaxy = Galaxy::headless(small_config());
    assert!(!galaxy.flags.intro_started);
    assert!(galaxy.hint.visible);
    assert!((galaxy.starfield_draw_fraction() - STARFIELD_IDLE_FRACTION).abs() < 1e-6);

    // Corner click misses the planet entirely.
    galaxy.click(5.0, 5.0, 800.0, 600.0, 0.1);
    assert!(!galaxy.flags.intro_started);

    // Center click hits it: latch flips, hint goes away, music starts, the
    // tour arms, the starfield opens up.
    galaxy.click(400.0, 300.0, 800.0, 600.0, 0.2);
    assert!(galaxy.flags.intro_started);
    assert!(!galaxy.hint.visible);
    assert!(galaxy.music.playing);
    assert!(galaxy.tour.active());
    assert_eq!(galaxy.starfield_draw_fraction(), 1.0);
    assert_eq!(galaxy.starfield.len(), STARFIELD_COUNT);
}

#[test]
fn fade_ramps_to_full_after_the_intro() {
    let mut galaxy = Galaxy::headless(small_config());
    galaxy.frame(0.0);
    let idle = galaxy.flags.fade_opacity;
    galaxy.frame(1.0 / 60.0);
    assert_eq!(galaxy.flags.fade_opacity, idle, "no fade before the intro");

    galaxy.click(400.0, 300.0, 800.0, 600.0, 0.1);
    let mut frame = 0u64;
    run_until(&mut galaxy, &mut frame, 100, |g| {
        g.flags.fade_opacity >= 1.0
    });
    assert_eq!(galaxy.flags.fade_opacity, 1.0);
}

#[test]
fn full_tour_reaches_the_close_in_pose_and_drops_three_gifts() {
    let mut galaxy = Galaxy::headless(small_config());
    galaxy.click(400.0, 300.0, 800.0, 600.0, 0.0);

    let mut frame = 0u64;
    let mut saw_room_out = false;
    let mut saw_overview = false;
    for _ in 0..6_000 {
        frame += 1;
        galaxy.frame(frame as f64 / 60.0);
        saw_room_out |= galaxy.flags.room_out;
        saw_overview |= galaxy.camera.eye == Vec3::from(TOUR_APPROACH_END);
        if galaxy.tour.phase == TourPhase::Done {
            break;
        }
        assert!(!galaxy.orbit.enabled, "orbit locked while the tour runs");
    }
    assert_eq!(galaxy.tour.phase, TourPhase::Done);
    assert!(saw_overview, "approach must pass through its end waypoint");
    assert!(saw_room_out, "room-out flag must rise mid-tour");
    assert!(!galaxy.flags.room_out, "flag cleared when the tour ends");
    assert!(galaxy.orbit.enabled);
    assert_eq!(galaxy.camera.eye, Vec3::from(TOUR_ROOM_IN_POS));
    assert_eq!(galaxy.camera.target, Vec3::from(TOUR_ROOM_IN_TARGET));

    // Gifts drop staggered, roughly two to three seconds later.
    assert!(galaxy.gifts.is_empty());
    run_until(&mut galaxy, &mut frame, 400, |g| g.gifts.len() == 3);
}

#[test]
fn auto_rotate_orbits_the_camera_after_the_tour() {
    let mut galaxy = Galaxy::headless(small_config());
    galaxy.click(400.0, 300.0, 800.0, 600.0, 0.0);
    let mut frame = 0u64;
    run_until(&mut galaxy, &mut frame, 6_000, |g| {
        g.tour.phase == TourPhase::Done
    });

    let before = galaxy.camera.eye;
    let dist_before = (before - galaxy.orbit.target).length();
    for _ in 0..120 {
        frame += 1;
        galaxy.frame(frame as f64 / 60.0);
    }
    let after = galaxy.camera.eye;
    assert_ne!(before, after, "idle camera should drift");
    let dist_after = (after - galaxy.orbit.target).length();
    assert!(
        (dist_before - dist_after).abs() < 0.01,
        "auto-rotate must keep the orbit radius"
    );
}

#[test]
fn popup_queue_drains_in_emission_order() {
    let mut galaxy = Galaxy::headless(small_config());
    galaxy.click(400.0, 300.0, 800.0, 600.0, 0.0);
    let mut frame = 0u64;
    run_until(&mut galaxy, &mut frame, 6_400, |g| g.gifts.len() == 3);
    galaxy.drain_popups();

    // Click straight at a gift by aiming the camera at it first.
    let gift_pos = galaxy.gifts.iter().next().unwrap().position;
    galaxy.camera.target = gift_pos;
    galaxy.orbit.auto_rotate = false;
    let now = frame as f64 / 60.0;
    galaxy.click(400.0, 300.0, 800.0, 600.0, now);
    let popups = galaxy.drain_popups();
    assert_eq!(popups.len(), 1);
    assert_eq!(popups[0].accept_token, None, "first open is immediate");
    assert!(galaxy.drain_popups().is_empty(), "drain empties the queue");
}
