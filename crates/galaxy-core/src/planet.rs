//! The central planet, its orbiting text rings, and the pre-intro hint icon.
//!
//! The planet itself is mostly a shader concern; the core only advances the
//! storm time uniform and keeps the click target sphere. Text rings carry a
//! full wobble pose per ring so the frontends can place each glyph along the
//! ring circumference themselves.

use glam::Vec3;

use crate::constants::PLANET_RADIUS;

/// Click target and storm-shader clock for the planet at the origin.
#[derive(Clone, Debug)]
pub struct Planet {
    pub radius: f32,
    /// Time uniform for the surface storm shader, advanced at half speed so
    /// the bands drift slower than the scene clock.
    pub storm_time: f32,
}

impl Default for Planet {
    fn default() -> Self {
        Self {
            radius: PLANET_RADIUS,
            storm_time: 0.0,
        }
    }
}

impl Planet {
    pub fn update(&mut self, time: f64) {
        self.storm_time = time as f32 * 0.5;
    }
}

/// One ring of text orbiting the planet. The spin accumulates per frame; the
/// tilt, roll, and pitch wobble are pure functions of the clock so they stay
/// phase-locked across pause-free playback.
#[derive(Clone, Debug)]
pub struct TextRing {
    pub text: String,
    pub radius: f32,
    /// Accumulated spin about Y, radians.
    pub angle: f32,
    /// Fixed X tilt distributing the rings over a half turn.
    pub base_tilt: f32,
    pub tilt: f32,
    pub roll: f32,
    pub pitch: f32,
    pub opacity: f32,
    wobble_phase: f32,
}

impl TextRing {
    pub fn update(&mut self, time: f64) {
        let t = time as f32 + self.wobble_phase;
        self.angle += 0.003;
        self.tilt = self.base_tilt + (t * 0.35).sin() * 0.25;
        self.roll = (t * 0.28).sin() * 0.18;
        self.pitch = (t * 0.22).cos() * 0.12;
        // Pulse between 0.7 and 1.0.
        self.opacity = 0.85 + (t * 0.5).sin() * 0.15;
    }
}

/// Build the ring set from the configured texts: radius 11 + 5·i, base X
/// tilts spread evenly over π.
pub fn build_text_rings(texts: &[String]) -> Vec<TextRing> {
    let n = texts.len().max(1) as f32;
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| TextRing {
            text: text.clone(),
            radius: PLANET_RADIUS + 1.0 + 5.0 * i as f32,
            angle: 0.0,
            base_tilt: i as f32 / n * std::f32::consts::PI,
            tilt: 0.0,
            roll: 0.0,
            pitch: 0.0,
            opacity: 1.0,
            wobble_phase: i as f32 * 1.7,
        })
        .collect()
}

/// The tap-here affordance shown until the first successful planet click. It
/// nudges toward the planet on a sine and pulses a halo ring behind itself.
#[derive(Clone, Debug)]
pub struct HintIcon {
    pub visible: bool,
    pub position: Vec3,
    pub halo_scale: f32,
    pub halo_opacity: f32,
    base_position: Vec3,
}

impl Default for HintIcon {
    fn default() -> Self {
        let base = Vec3::new(0.0, PLANET_RADIUS + 6.0, 0.0);
        Self {
            visible: true,
            position: base,
            halo_scale: 1.0,
            halo_opacity: 0.6,
            base_position: base,
        }
    }
}

impl HintIcon {
    pub fn update(&mut self, time: f64) {
        if !self.visible {
            return;
        }
        let t = time as f32;
        // Tap toward the planet.
        self.position = self.base_position + Vec3::new(0.0, (t * 2.5).sin() * 1.5 - 1.5, 0.0);
        self.halo_scale = 1.0 + (t * 2.5).sin().abs() * 0.4;
        self.halo_opacity = 0.3 + (t * 2.5).sin().abs() * 0.3;
    }

    /// Hide for good once the intro starts.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_opacity_stays_in_pulse_band() {
        let mut rings = build_text_rings(&[String::from("a"), String::from("b")]);
        for f in 0..600 {
            for ring in &mut rings {
                ring.update(f as f64 / 60.0);
                assert!(ring.opacity >= 0.7 - 1e-5 && ring.opacity <= 1.0 + 1e-5);
            }
        }
    }

    #[test]
    fn ring_spin_accumulates() {
        let mut rings = build_text_rings(&[String::from("hi")]);
        for f in 0..100 {
            rings[0].update(f as f64 / 60.0);
        }
        assert!((rings[0].angle - 0.3).abs() < 1e-4);
    }

    #[test]
    fn hint_icon_stops_moving_after_dismiss() {
        let mut icon = HintIcon::default();
        icon.update(1.0);
        icon.dismiss();
        let frozen = icon.position;
        icon.update(2.0);
        assert_eq!(icon.position, frozen);
        assert!(!icon.visible);
    }

    #[test]
    fn rings_spread_tilts_over_half_turn() {
        let rings = build_text_rings(&[
            String::from("a"),
            String::from("b"),
            String::from("c"),
            String::from("d"),
        ]);
        assert_eq!(rings[0].base_tilt, 0.0);
        assert!((rings[2].base_tilt - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((rings[1].radius - 16.0).abs() < 1e-6);
    }
}
