//! Scripted camera tour: approach, room-out, room-in, then hand the camera
//! back to orbit control.
//!
//! Each phase carries its own progress accumulator so progress is trivially
//! monotone within a phase and resets on transition. Transitions snap the
//! camera to the phase's end waypoint before the next phase takes over, which
//! keeps the path exact regardless of the per-frame increment.

use glam::Vec3;

use crate::constants::{
    TOUR_APPROACH_END, TOUR_APPROACH_LEGS, TOUR_APPROACH_STEP, TOUR_EASED_STEP, TOUR_MID_Z,
    TOUR_ROOM_IN_DURATION, TOUR_ROOM_IN_POS, TOUR_ROOM_IN_TARGET, TOUR_ROOM_OUT_DURATION,
    TOUR_ROOM_OUT_FLAG_AT, TOUR_ROOM_OUT_POS,
};
use crate::state::Camera;

/// Cosine ease-in-out over [0, 1].
#[inline]
pub fn ease(t: f32) -> f32 {
    0.5 - 0.5 * (t.clamp(0.0, 1.0) * std::f32::consts::PI).cos()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TourPhase {
    Idle,
    /// Three-leg zoom toward the overview waypoint.
    Approach { progress: f32 },
    /// Eased pull-back that raises the room-out flag.
    RoomOut { progress: f32 },
    /// Eased dive to the final close-in pose.
    RoomIn { progress: f32 },
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourEvent {
    /// Room-in completed; orbit control may resume and gifts get scheduled.
    Finished,
}

#[derive(Clone, Debug)]
pub struct CameraTour {
    pub phase: TourPhase,
    /// Camera eye at the moment the tour began; anchors the approach legs.
    start: Vec3,
    /// Owned here, mirrored into the scene flags by the frame driver.
    pub room_out: bool,
}

impl Default for CameraTour {
    fn default() -> Self {
        Self {
            phase: TourPhase::Idle,
            start: Vec3::ZERO,
            room_out: false,
        }
    }
}

impl CameraTour {
    /// Arm the tour from the camera's current pose. Only valid once, from
    /// `Idle`; later calls are ignored so a stray click cannot replay it.
    pub fn begin(&mut self, camera: &Camera) {
        if self.phase != TourPhase::Idle {
            return;
        }
        self.start = camera.eye;
        self.phase = TourPhase::Approach { progress: 0.0 };
        log::info!("camera tour started from {:?}", camera.eye);
    }

    pub fn active(&self) -> bool {
        matches!(
            self.phase,
            TourPhase::Approach { .. } | TourPhase::RoomOut { .. } | TourPhase::RoomIn { .. }
        )
    }

    /// Advance one frame, moving the camera. Returns an event on the frame a
    /// terminal transition happens.
    pub fn step(&mut self, camera: &mut Camera) -> Option<TourEvent> {
        match self.phase {
            TourPhase::Idle | TourPhase::Done => None,
            TourPhase::Approach { progress } => {
                let progress = progress + TOUR_APPROACH_STEP;
                let total: f32 = TOUR_APPROACH_LEGS.iter().sum();
                let w1 = Vec3::new(self.start.x, 0.0, self.start.z);
                let w2 = Vec3::new(self.start.x, 0.0, TOUR_MID_Z);
                let end = Vec3::from(TOUR_APPROACH_END);
                if progress >= total {
                    camera.eye = end;
                    camera.target = Vec3::ZERO;
                    self.phase = TourPhase::RoomOut { progress: 0.0 };
                    return None;
                }
                let [l1, l2, _] = TOUR_APPROACH_LEGS;
                camera.eye = if progress < l1 {
                    self.start.lerp(w1, progress / l1)
                } else if progress < l1 + l2 {
                    w1.lerp(w2, (progress - l1) / l2)
                } else {
                    w2.lerp(end, ease((progress - l1 - l2) / TOUR_APPROACH_LEGS[2]))
                };
                camera.target = Vec3::ZERO;
                self.phase = TourPhase::Approach { progress };
                None
            }
            TourPhase::RoomOut { progress } => {
                let progress = progress + TOUR_EASED_STEP;
                let from = Vec3::from(TOUR_APPROACH_END);
                let to = Vec3::from(TOUR_ROOM_OUT_POS);
                if progress >= TOUR_ROOM_OUT_DURATION {
                    camera.eye = to;
                    camera.target = Vec3::ZERO;
                    self.phase = TourPhase::RoomIn { progress: 0.0 };
                    return None;
                }
                let eased = ease(progress / TOUR_ROOM_OUT_DURATION);
                if eased > TOUR_ROOM_OUT_FLAG_AT && !self.room_out {
                    self.room_out = true;
                    log::info!("room-out reached, raising ambient spawn rates");
                }
                camera.eye = from.lerp(to, eased);
                camera.target = Vec3::ZERO;
                self.phase = TourPhase::RoomOut { progress };
                None
            }
            TourPhase::RoomIn { progress } => {
                let progress = progress + TOUR_EASED_STEP;
                let from = Vec3::from(TOUR_ROOM_OUT_POS);
                let to = Vec3::from(TOUR_ROOM_IN_POS);
                let look = Vec3::from(TOUR_ROOM_IN_TARGET);
                if progress >= TOUR_ROOM_IN_DURATION {
                    camera.eye = to;
                    camera.target = look;
                    self.room_out = false;
                    self.phase = TourPhase::Done;
                    log::info!("camera tour finished");
                    return Some(TourEvent::Finished);
                }
                let eased = ease(progress / TOUR_ROOM_IN_DURATION);
                camera.eye = from.lerp(to, eased);
                camera.target = Vec3::ZERO.lerp(look, eased);
                self.phase = TourPhase::RoomIn { progress };
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until<F: Fn(&CameraTour) -> bool>(
        tour: &mut CameraTour,
        camera: &mut Camera,
        pred: F,
        cap: u32,
    ) -> u32 {
        for frame in 0..cap {
            if pred(tour) {
                return frame;
            }
            tour.step(camera);
        }
        panic!("predicate not reached in {cap} frames");
    }

    #[test]
    fn phases_run_strictly_in_sequence() {
        let mut camera = Camera::default();
        let mut tour = CameraTour::default();
        tour.begin(&camera);
        assert!(matches!(tour.phase, TourPhase::Approach { .. }));
        run_until(
            &mut tour,
            &mut camera,
            |t| matches!(t.phase, TourPhase::RoomOut { .. }),
            5000,
        );
        run_until(
            &mut tour,
            &mut camera,
            |t| matches!(t.phase, TourPhase::RoomIn { .. }),
            2000,
        );
        run_until(&mut tour, &mut camera, |t| t.phase == TourPhase::Done, 2000);
    }

    #[test]
    fn approach_ends_exactly_at_overview_waypoint() {
        let mut camera = Camera::default();
        let mut tour = CameraTour::default();
        tour.begin(&camera);
        run_until(
            &mut tour,
            &mut camera,
            |t| matches!(t.phase, TourPhase::RoomOut { .. }),
            5000,
        );
        assert_eq!(camera.eye, Vec3::from(TOUR_APPROACH_END));
    }

    #[test]
    fn room_out_flag_follows_eased_progress() {
        let mut camera = Camera::default();
        let mut tour = CameraTour::default();
        tour.begin(&camera);
        run_until(
            &mut tour,
            &mut camera,
            |t| matches!(t.phase, TourPhase::RoomOut { .. }),
            5000,
        );
        // The flag trips once eased progress clears the threshold, a few
        // dozen frames into the phase, and holds until room-in completes.
        assert!(!tour.room_out);
        let frames = run_until(&mut tour, &mut camera, |t| t.room_out, 2000);
        assert!(frames > 10);
        let mut finished = false;
        for _ in 0..2000 {
            if tour.step(&mut camera) == Some(TourEvent::Finished) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert!(!tour.room_out);
        assert_eq!(camera.eye, Vec3::from(TOUR_ROOM_IN_POS));
        assert_eq!(camera.target, Vec3::from(TOUR_ROOM_IN_TARGET));
    }

    #[test]
    fn begin_is_one_shot() {
        let mut camera = Camera::default();
        let mut tour = CameraTour::default();
        tour.begin(&camera);
        tour.step(&mut camera);
        let phase = tour.phase;
        tour.begin(&camera);
        assert_eq!(tour.phase, phase);
    }

    #[test]
    fn progress_is_monotone_within_a_phase() {
        let mut camera = Camera::default();
        let mut tour = CameraTour::default();
        tour.begin(&camera);
        let mut last = 0.0;
        for _ in 0..200 {
            tour.step(&mut camera);
            match tour.phase {
                TourPhase::Approach { progress } => {
                    assert!(progress > last);
                    last = progress;
                }
                _ => panic!("left approach too early"),
            }
        }
    }
}
