use std::cell::RefCell;
use std::rc::Rc;

use crate::host::{MediaHandle, PlaybackError};

#[derive(Debug, Clone, PartialEq)]
pub struct MediaState {
    pub paused: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub muted: bool,
    /// Refuse `play()` until a call with this cleared.
    pub autoplay_blocked: bool,
    pub play_attempts: u32,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            paused: true,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            autoplay_blocked: false,
            play_attempts: 0,
        }
    }
}

/// Media element double. Clones share state, so a test can keep one clone
/// while the page owns another.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMedia {
    state: Rc<RefCell<MediaState>>,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(self, seconds: f64) -> Self {
        self.state.borrow_mut().duration = seconds;
        self
    }

    pub fn blocked(self) -> Self {
        self.state.borrow_mut().autoplay_blocked = true;
        self
    }

    /// Lift the autoplay block, as a user gesture would.
    pub fn unblock(&self) {
        self.state.borrow_mut().autoplay_blocked = false;
    }

    pub fn snapshot(&self) -> MediaState {
        self.state.borrow().clone()
    }
}

impl MediaHandle for HeadlessMedia {
    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.borrow_mut();
        state.play_attempts += 1;
        if state.autoplay_blocked {
            return Err(PlaybackError::Blocked);
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.state.borrow_mut().current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn is_muted(&self) -> bool {
        self.state.borrow().muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }
}
