use clinic_queue_infra::IAudioCue;
use tracing::warn;

/// Plays the notification cue of one dashboard.
///
/// The cue is held from activation until `release`, at most one playback
/// is started per call.
pub struct Notifier {
    cue: Box<dyn IAudioCue>,
    released: bool,
}

impl Notifier {
    pub fn new(cue: Box<dyn IAudioCue>) -> Self {
        Self {
            cue,
            released: false,
        }
    }

    /// Restarts the cue from the beginning if `has_new_triggers`.
    /// Returns whether playback was started. Playback failures never
    /// leave this function.
    pub fn notify(&mut self, has_new_triggers: bool) -> bool {
        if !has_new_triggers || self.released {
            return false;
        }
        self.cue.rewind();
        match self.cue.play() {
            Ok(()) => true,
            Err(e) => {
                warn!("Unable to play the notification sound: {}", e);
                false
            }
        }
    }

    pub fn release(&mut self) {
        if !self.released {
            self.cue.stop();
            self.released = true;
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.release();
    }
}
