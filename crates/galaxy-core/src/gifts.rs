//! Collectible gift sprites and the scripted click flow.
//!
//! Gifts never expire on their own; they leave the scene only after a
//! successful open, a second later. The first open is immediate; the second
//! and third go through a dual-button popup whose accept callback fires at
//! most once. Rewards come out in a fixed order regardless of which box is
//! clicked.

use fnv::FnvHashMap;
use glam::Vec3;
use rand::Rng;
use smallvec::SmallVec;

use crate::constants::*;

pub const REWARD_MESSAGES: [&str; 3] = [
    "Better luck next time!",
    "Missed again! The real gift is still out there.",
    "No gift here either... keep searching.",
];
const PROMPT_SECOND: &str = "You took too long to reply! Answer faster to open this one.";
const PROMPT_THIRD: &str = "Hmm, not quite sincere enough yet. Keep your promise first!";
const FOLLOW_UP: &str =
    "Aww, don't be upset! Your star is still hiding somewhere in this galaxy. Look closely!";

/// A request for the popup collaborator. `accept_token`, when present, asks
/// for a two-button display; passing the token back through
/// [`GiftSystem::accept`] runs the deferred open. Plain messages auto-dismiss
/// on the collaborator's side.
#[derive(Clone, Debug, PartialEq)]
pub struct PopupRequest {
    pub message: String,
    pub accept_token: Option<u32>,
}

impl PopupRequest {
    fn plain(message: &str) -> Self {
        Self {
            message: message.to_string(),
            accept_token: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GiftBox {
    pub id: u32,
    pub position: Vec3,
    pub base_y: f32,
    pub rotation_y: f32,
    pub roll: f32,
    pub scale: f32,
    pub clicked: bool,
    float_speed: f32,
    rotation_rate: f32,
    flash_until: f64,
}

#[derive(Clone, Copy, Debug)]
enum Timed {
    Remove(u32),
    FollowUp,
}

#[derive(Default)]
pub struct GiftSystem {
    boxes: FnvHashMap<u32, GiftBox>,
    next_id: u32,
    spawned_total: u32,
    opened: u32,
    pending_accept: Option<u32>,
    timed: SmallVec<[(f64, Timed); 4]>,
}

impl GiftSystem {
    /// Place one gift at the next 120-degree slot around the planet.
    pub fn spawn(&mut self, rng: &mut impl Rng) -> u32 {
        let angle = (self.spawned_total as f32 * GIFT_SLOT_DEGREES).to_radians();
        let radius = 30.0 + rng.gen::<f32>() * 10.0;
        let y = 15.0 + rng.gen::<f32>() * 10.0;
        let id = self.next_id;
        self.next_id += 1;
        self.spawned_total += 1;
        self.boxes.insert(
            id,
            GiftBox {
                id,
                position: Vec3::new(angle.cos() * radius, y, angle.sin() * radius),
                base_y: y,
                rotation_y: rng.gen::<f32>() * std::f32::consts::TAU,
                roll: rng.gen::<f32>() * 0.2 - 0.1,
                scale: 1.0,
                clicked: false,
                float_speed: 0.02 + rng.gen::<f32>() * 0.03,
                rotation_rate: 0.01 + rng.gen::<f32>() * 0.02,
                flash_until: 0.0,
            },
        );
        log::debug!("gift {id} placed at slot {}", self.spawned_total - 1);
        id
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&GiftBox> {
        self.boxes.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GiftBox> {
        self.boxes.values()
    }

    /// Handle a resolved click on a box. Returns the popup to display, if any.
    pub fn click(&mut self, id: u32, now: f64) -> Option<PopupRequest> {
        let gift = self.boxes.get(&id)?;
        if gift.clicked {
            return None;
        }
        match self.opened {
            0 => Some(self.open(id, now)),
            1 => {
                self.pending_accept = Some(id);
                Some(PopupRequest {
                    message: PROMPT_SECOND.to_string(),
                    accept_token: Some(id),
                })
            }
            2 => {
                self.pending_accept = Some(id);
                Some(PopupRequest {
                    message: PROMPT_THIRD.to_string(),
                    accept_token: Some(id),
                })
            }
            _ => None,
        }
    }

    /// Accept callback for a dual-button popup. Invoked at most once per
    /// token; stale or repeated tokens are ignored.
    pub fn accept(&mut self, token: u32, now: f64) -> Option<PopupRequest> {
        if self.pending_accept != Some(token) {
            return None;
        }
        self.pending_accept = None;
        Some(self.open(token, now))
    }

    fn open(&mut self, id: u32, now: f64) -> PopupRequest {
        let slot = self.opened.min(2) as usize;
        self.opened += 1;
        if let Some(gift) = self.boxes.get_mut(&id) {
            gift.clicked = true;
            gift.flash_until = now + GIFT_FLASH_SEC;
        }
        self.timed.push((now + GIFT_REMOVE_DELAY_SEC, Timed::Remove(id)));
        if self.opened == 3 {
            self.timed
                .push((now + GIFT_FOLLOW_UP_DELAY_SEC, Timed::FollowUp));
        }
        PopupRequest::plain(REWARD_MESSAGES[slot])
    }

    /// Per-frame bobbing, spin, and pulse, plus any due timed actions.
    pub fn update(&mut self, now: f64, out_popups: &mut Vec<PopupRequest>) {
        let t = now as f32;
        for gift in self.boxes.values_mut() {
            gift.position.y = gift.base_y + (t * gift.float_speed).sin() * 2.0;
            gift.rotation_y += gift.rotation_rate;
            gift.roll = (t * 2.0).sin() * 0.1;
            gift.scale = if now < gift.flash_until {
                1.5
            } else {
                1.0 + (t * 3.0).sin() * 0.1
            };
        }
        let mut i = 0;
        while i < self.timed.len() {
            if self.timed[i].0 > now {
                i += 1;
                continue;
            }
            match self.timed.swap_remove(i).1 {
                Timed::Remove(id) => {
                    self.boxes.remove(&id);
                }
                Timed::FollowUp => out_popups.push(PopupRequest::plain(FOLLOW_UP)),
            }
        }
    }
}
