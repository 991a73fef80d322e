//! Music playback contract and its mute-on-rejection policy.
//!
//! The core never touches an audio device; frontends supply a backend. The
//! one policy that lives here: an autoplay rejection mutes the manager and is
//! never retried, matching how browsers punish un-gestured playback.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MusicError {
    /// The platform refused to start playback without a user gesture.
    #[error("autoplay blocked by the platform")]
    AutoplayBlocked,
    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// Playback collaborator implemented per frontend.
pub trait MusicBackend {
    fn play(&mut self) -> Result<(), MusicError>;
    fn pause(&mut self);
    /// Fire one descending chirp; best effort, errors are the backend's to log.
    fn chirp(&mut self);
}

/// Backend for headless runs and tests.
#[derive(Default)]
pub struct NullBackend {
    pub play_calls: u32,
    pub chirps: u32,
    pub reject_play: bool,
}

impl MusicBackend for NullBackend {
    fn play(&mut self) -> Result<(), MusicError> {
        self.play_calls += 1;
        if self.reject_play {
            Err(MusicError::AutoplayBlocked)
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {}

    fn chirp(&mut self) {
        self.chirps += 1;
    }
}

pub struct MusicManager {
    backend: Box<dyn MusicBackend>,
    pub playing: bool,
    pub muted: bool,
    started: bool,
}

impl MusicManager {
    pub fn new(backend: Box<dyn MusicBackend>) -> Self {
        Self {
            backend,
            playing: false,
            muted: false,
            started: false,
        }
    }

    /// Start playback once. A rejection flips the manager to muted; later
    /// calls are no-ops either way.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        match self.backend.play() {
            Ok(()) => {
                self.playing = true;
                log::info!("music playing");
            }
            Err(err) => {
                self.muted = true;
                log::warn!("music start failed, staying muted: {err}");
            }
        }
    }

    pub fn chirp(&mut self) {
        if !self.muted {
            self.backend.chirp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingBackend {
        plays: Rc<Cell<u32>>,
        reject: bool,
    }

    impl MusicBackend for CountingBackend {
        fn play(&mut self) -> Result<(), MusicError> {
            self.plays.set(self.plays.get() + 1);
            if self.reject {
                Err(MusicError::AutoplayBlocked)
            } else {
                Ok(())
            }
        }
        fn pause(&mut self) {}
        fn chirp(&mut self) {}
    }

    #[test]
    fn rejection_mutes_and_never_retries() {
        let plays = Rc::new(Cell::new(0));
        let mut m = MusicManager::new(Box::new(CountingBackend {
            plays: plays.clone(),
            reject: true,
        }));
        m.start();
        assert!(m.muted);
        assert!(!m.playing);
        m.start();
        m.start();
        assert_eq!(plays.get(), 1);
    }

    #[test]
    fn successful_start_plays() {
        let mut m = MusicManager::new(Box::<NullBackend>::default());
        m.start();
        assert!(m.playing);
        assert!(!m.muted);
    }

    #[test]
    fn muted_manager_swallows_chirps() {
        let mut backend = NullBackend::default();
        backend.reject_play = true;
        let mut m = MusicManager::new(Box::new(backend));
        m.start();
        m.chirp();
        m.chirp();
        // No panic is the contract; chirps route nowhere while muted.
        assert!(m.muted);
    }
}
