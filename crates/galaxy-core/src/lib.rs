pub mod cloud;
pub mod constants;
pub mod curve;
pub mod effects;
pub mod frame;
pub mod gifts;
pub mod lifecycle;
pub mod music;
pub mod pick;
pub mod planet;
pub mod state;
pub mod tour;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use frame::*;
pub use music::*;
pub use state::*;
